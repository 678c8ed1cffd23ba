//! YAML output for parameter records
//!
//! The document is written by hand so that `description` and `constraints`
//! are always double-quoted and the remaining fields stay plain scalars
//! wherever YAML allows it.

use crate::error::WriteError;
use archparam_domain::ParameterRecord;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::info;

/// Render records as a YAML document with a top-level `parameters` list
pub fn render_parameters(records: &[ParameterRecord]) -> String {
    if records.is_empty() {
        return "parameters: []\n".to_string();
    }

    let mut out = String::from("parameters:\n");
    for record in records {
        out.push_str(&format!("  - name: {}\n", scalar(record.name())));
        out.push_str(&format!("    description: \"{}\"\n", escape_quoted(record.description())));
        out.push_str(&format!("    type: {}\n", scalar(record.param_type())));
        out.push_str(&format!("    constraints: \"{}\"\n", escape_quoted(record.constraints())));
        out.push_str(&format!("    source: {}\n", scalar(record.source())));
        if record.keywords().is_empty() {
            out.push_str("    keywords: []\n");
        } else {
            out.push_str("    keywords:\n");
            for keyword in record.keywords() {
                out.push_str(&format!("      - {}\n", scalar(keyword)));
            }
        }
        out.push('\n');
    }
    out
}

/// Write records to `output_path`, creating parent directories
///
/// Overwrites any existing file. Returns the number of records written.
pub fn write_parameters(
    records: &[ParameterRecord],
    output_path: impl AsRef<Path>,
) -> Result<usize, WriteError> {
    let output_path = output_path.as_ref();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(output_path, render_parameters(records)).map_err(|source| WriteError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!("Saved {} parameters to {}", records.len(), output_path.display());
    Ok(records.len())
}

/// Escape text for a YAML double-quoted scalar
fn escape_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if needs_unicode_escape(c) => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Characters a YAML document may not carry raw, plus the Unicode line breaks
fn needs_unicode_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{FEFF}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Emit `text` as a plain scalar when that is unambiguous, quoted otherwise
fn scalar(text: &str) -> Cow<'_, str> {
    if is_plain_safe(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("\"{}\"", escape_quoted(text)))
    }
}

fn is_plain_safe(text: &str) -> bool {
    let mut chars = text.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if text.ends_with(' ') {
        return false;
    }
    if !text
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | '/' | '(' | ')' | '+'))
    {
        return false;
    }
    !matches!(
        text.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "yes" | "no" | "on" | "off" | "y" | "n"
    )
}
