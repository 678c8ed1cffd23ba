//! LLM prompt engineering for parameter extraction

/// Words that signal an implementation-defined or optional aspect
pub const PARAMETER_KEYWORDS: [&str; 7] = [
    "may",
    "might",
    "should",
    "optional",
    "optionally",
    "implementation-specific",
    "implementation-defined",
];

/// Builds prompts for the LLM to extract architectural parameters
pub struct PromptBuilder<'a> {
    snippet: &'a str,
    source: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(snippet: &'a str, source: &'a str) -> Self {
        Self { snippet, source }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and definition
        prompt.push_str(ROLE_AND_DEFINITION);
        prompt.push_str("\n- Indicated by words like: ");
        let quoted: Vec<String> = PARAMETER_KEYWORDS
            .iter()
            .map(|keyword| format!("\"{}\"", keyword))
            .collect();
        prompt.push_str(&quoted.join(", "));
        prompt.push_str("\n\n");

        // 2. The snippet, verbatim
        prompt.push_str(&format!("SNIPPET SOURCE: {}\n\n", self.source));
        prompt.push_str("SNIPPET TEXT:\n");
        prompt.push_str(self.snippet);
        prompt.push_str("\n\n");

        // 3. Extraction rules and output contract
        prompt.push_str(EXTRACTION_RULES);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT);

        prompt
    }
}

const ROLE_AND_DEFINITION: &str = r#"You are an expert in RISC-V architecture specifications. Your task is to extract architectural parameters from the following specification snippet.

DEFINITION: An architectural parameter is an aspect of the implementation that is:
- Implementation-specific or implementation-defined
- Optional or configurable"#;

const EXTRACTION_RULES: &str = r#"INSTRUCTIONS:
1. Identify ONLY parameters explicitly mentioned or strongly implied in the text
2. For each parameter, extract:
   - A short, descriptive name
   - A detailed description (use exact quotes where possible)
   - The type (integer, boolean, size, enumeration, etc.)
   - Any constraints or requirements mentioned
   - The specific keywords that indicated this is a parameter
3. DO NOT invent parameters not mentioned in the text
4. DO NOT make assumptions beyond what the text states
5. If a sentence mentions multiple related parameters, separate them"#;

const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT (JSON):
Return a JSON array of objects, each with these fields:
- name: string
- description: string
- type: string
- constraints: string
- keywords: array of strings

EXAMPLE OUTPUT:
[
  {
    "name": "cache_block_size",
    "description": "The size of a cache block, which must be uniform throughout the system",
    "type": "size",
    "constraints": "Must be uniform throughout the system; power-of-two or NAPOT aligned",
    "keywords": ["implementation-specific", "shall"]
  }
]

Now extract the parameters from the snippet above. Return ONLY valid JSON, no additional text.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_source_and_snippet() {
        let prompt = PromptBuilder::new(
            "The PMP may support up to 64 entries.",
            "Privileged Spec 3.7",
        )
        .build();

        assert!(prompt.contains("SNIPPET SOURCE: Privileged Spec 3.7"));
        assert!(prompt.contains("SNIPPET TEXT:\nThe PMP may support up to 64 entries.\n"));
    }

    #[test]
    fn test_prompt_lists_every_keyword() {
        let prompt = PromptBuilder::new("text", "src").build();
        for keyword in PARAMETER_KEYWORDS {
            assert!(prompt.contains(&format!("\"{}\"", keyword)), "missing {}", keyword);
        }
    }

    #[test]
    fn test_prompt_states_rules_and_contract() {
        let prompt = PromptBuilder::new("text", "src").build();
        assert!(prompt.contains("ONLY parameters explicitly mentioned or strongly implied"));
        assert!(prompt.contains("DO NOT invent parameters"));
        assert!(prompt.contains("separate them"));
        assert!(prompt.contains("keywords: array of strings"));
        assert!(prompt.contains("\"name\": \"cache_block_size\""));
        assert!(prompt.trim_end().ends_with("Return ONLY valid JSON, no additional text."));
    }

    #[test]
    fn test_snippet_comes_before_instructions() {
        let prompt = PromptBuilder::new("UNIQUE_SNIPPET_MARKER", "src").build();
        let snippet_at = prompt.find("UNIQUE_SNIPPET_MARKER").unwrap();
        let rules_at = prompt.find("INSTRUCTIONS:").unwrap();
        assert!(snippet_at < rules_at);
    }

    #[test]
    fn test_empty_snippet_still_builds() {
        let prompt = PromptBuilder::new("", "").build();
        assert!(prompt.contains("SNIPPET TEXT:\n\n"));
        assert!(prompt.contains("OUTPUT FORMAT (JSON)"));
    }
}
