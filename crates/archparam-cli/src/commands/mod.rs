//! Command implementations.

pub mod extract;
pub mod models;

pub use self::extract::execute_extract;
pub use self::models::execute_models;
