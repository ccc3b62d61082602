//! Lexical analysis for stepwise source text.
//!
//! The scanner walks the source one character at a time, tracking 1-based
//! line and column numbers. It never stops at the first problem: every
//! lexical error in the input is collected alongside the tokens that could
//! be recognised.

mod error;
mod scanner;
mod token;

pub use error::{LexError, LexErrorKind};
pub use scanner::tokenize;
pub use token::{KEYWORDS, Token, TokenKind};
