use tracing::{debug, trace};

use crate::lexer::{KEYWORDS, LexError, LexErrorKind, Token, TokenKind};
use crate::parser::{Position, Span};

/// Scan `source` into tokens, collecting every lexical error on the way.
///
/// Whitespace and comments produce no tokens. An unterminated string or an
/// unexpected character records an error and scanning carries on after it.
pub fn tokenize(source: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    let mut scanner = Scanner::new(source);
    scanner.run();
    debug!(
        tokens = scanner.tokens.len(),
        errors = scanner.errors.len(),
        "lexical analysis finished"
    );
    (scanner.tokens, scanner.errors)
}

struct Scanner<'a> {
    source: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token<'a>>,
    errors: Vec<LexError>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, at: Position) {
        let value = &self.source[start..self.pos];
        trace!(%kind, value, line = at.line, column = at.column, "token");
        self.tokens
            .push(Token::new(kind, value, at, Span::new(start, self.pos)));
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;
            let at = self.here();

            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_second() == Some('/') => {
                    self.bump_while(|c| c != '\n');
                }
                '/' if self.peek_second() == Some('*') => {
                    self.skip_block_comment(start, at);
                }
                '"' => self.scan_string(start, at),
                '=' | '+' | '-' | '*' | '/' => {
                    self.bump();
                    self.push(TokenKind::Operator, start, at);
                }
                ';' | '(' | ')' | ',' | '{' | '}' => {
                    self.bump();
                    self.push(TokenKind::Punctuation, start, at);
                }
                c if c.is_ascii_digit() => {
                    self.bump_while(|c| c.is_ascii_digit());
                    self.push(TokenKind::Number, start, at);
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    let word = &self.source[start..self.pos];
                    let kind = if KEYWORDS.contains(&word) {
                        TokenKind::Keyword
                    } else {
                        TokenKind::Identifier
                    };
                    self.push(kind, start, at);
                }
                other => {
                    self.bump();
                    self.errors.push(LexError::new(
                        LexErrorKind::UnexpectedCharacter {
                            ch: other,
                            line: at.line,
                            column: at.column,
                        },
                        Span::new(start, self.pos),
                    ));
                }
            }
        }
    }

    fn skip_block_comment(&mut self, start: usize, at: Position) {
        // Opening "/*".
        self.bump();
        self.bump();
        loop {
            match self.peek() {
                Some('*') if self.peek_second() == Some('/') => {
                    self.bump();
                    self.bump();
                    return;
                }
                Some(_) => {
                    self.bump();
                }
                None => {
                    self.errors.push(LexError::new(
                        LexErrorKind::UnclosedComment {
                            line: at.line,
                            column: at.column,
                        },
                        Span::new(start, self.pos),
                    ));
                    return;
                }
            }
        }
    }

    fn scan_string(&mut self, start: usize, at: Position) {
        // Opening quote.
        self.bump();
        let content_start = self.pos;
        loop {
            match self.peek() {
                Some('"') => {
                    let value = &self.source[content_start..self.pos];
                    self.bump();
                    trace!(value, line = at.line, column = at.column, "string token");
                    self.tokens.push(Token::new(
                        TokenKind::String,
                        value,
                        at,
                        Span::new(start, self.pos),
                    ));
                    return;
                }
                Some(_) => {
                    self.bump();
                }
                None => {
                    self.errors.push(LexError::new(
                        LexErrorKind::UnterminatedString {
                            line: at.line,
                            column: at.column,
                        },
                        Span::new(start, self.pos),
                    ));
                    return;
                }
            }
        }
    }
}
