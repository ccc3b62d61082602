#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod error;


pub use analyzer::{analyze, analyze_with_symbols};
pub use error::{SemanticError, SemanticErrorKind};
