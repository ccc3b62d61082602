//! Error collection shared by the parser and the semantic analyzer.

pub mod sink;

pub use sink::{ErrorSink, TraversalPolicy};
