//! Pipeline crate of the stepwise teaching compiler.
//!
//! Source text goes through [`lexer`], [`parser`], [`analyzer`],
//! [`compiler`] and [`encoder`], with a [`trace`] record after every phase
//! and [`suggestions`] at the end. [`api::Engine`] wires them together.

pub mod analyzer;
pub mod api;
pub mod compiler;
pub mod diagnostics;
pub mod encoder;
pub mod lexer;
pub mod parser;
pub mod suggestions;
pub mod trace;
pub mod visitor;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_pipeline() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
