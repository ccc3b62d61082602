use serde::Serialize;

use crate::parser::{Position, Span};

/// Reserved words. Everything else matching `[A-Za-z_][A-Za-z0-9_]*` is an identifier.
pub const KEYWORDS: &[&str] = &["print", "let"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Keyword,
    Operator,
    Punctuation,
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Punctuation => "PUNCTUATION",
        };
        f.write_str(name)
    }
}

/// A lexeme borrowed from the source.
///
/// For strings, `value` is the text between the quotes (no escape
/// processing); `span` still covers the quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    pub line: usize,
    pub column: usize,
    #[serde(skip)]
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, value: &'a str, at: Position, span: Span) -> Self {
        Self {
            kind,
            value,
            line: at.line,
            column: at.column,
            span,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value == keyword
    }

    pub fn is_punctuation(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.value == symbol
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Operator && self.value == symbol
    }
}
