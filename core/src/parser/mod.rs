mod ast;
pub mod error;
#[allow(clippy::module_inception)]
pub mod parser;
mod syntax;

pub use ast::{Expr, Program, Statement};
pub use error::{SyntaxError, SyntaxErrorKind};
pub use parser::{parse, parse_with_policy};
pub use syntax::{BinaryOp, Position, Span};
