use bumpalo::Bump;
use tracing::debug;

use crate::diagnostics::{ErrorSink, TraversalPolicy};
use crate::lexer::{KEYWORDS, Token, TokenKind};
use crate::parser::{BinaryOp, Expr, Program, Span, Statement, SyntaxError, SyntaxErrorKind};

/// Parse a token stream into a program.
///
/// Statement-level problems are not recovered from: the first one is
/// reported and no further statements are consumed. Malformed expressions
/// become [`Expr::Error`] nodes inside otherwise valid statements.
///
/// Grammar:
///
/// ```text
/// statement  := printStmt | letStmt
/// printStmt  := 'print' expression ';'
/// letStmt    := 'let' IDENTIFIER '=' expression ';'
/// expression := primary ( ('+'|'-'|'*'|'/') primary )*
/// primary    := NUMBER | STRING | IDENTIFIER | '(' expression ')'
/// ```
///
/// All four operators share one precedence level and associate to the
/// left, so `1 + 2 * 3` means `(1 + 2) * 3`.
pub fn parse<'a>(arena: &'a Bump, tokens: &[Token<'a>]) -> (Program<'a>, Vec<SyntaxError>) {
    parse_with_policy(arena, tokens, TraversalPolicy::StopOnFirstError)
}

/// Like [`parse`], with an explicit error policy. Under
/// [`TraversalPolicy::CollectAll`] the parser skips past the next `;` after
/// each statement error and keeps going.
pub fn parse_with_policy<'a>(
    arena: &'a Bump,
    tokens: &[Token<'a>],
    policy: TraversalPolicy,
) -> (Program<'a>, Vec<SyntaxError>) {
    let mut parser = Parser {
        arena,
        tokens,
        pos: 0,
        errors: ErrorSink::new(policy),
    };
    let statements = parser.parse_program();
    let errors = parser.errors.into_errors();
    debug!(
        statements = statements.len(),
        errors = errors.len(),
        "syntax analysis finished"
    );
    let program = Program {
        statements: arena.alloc_slice_fill_iter(statements),
    };
    (program, errors)
}

struct Parser<'a, 't> {
    arena: &'a Bump,
    tokens: &'t [Token<'a>],
    pos: usize,
    errors: ErrorSink<SyntaxError>,
}

impl<'a, 't> Parser<'a, 't> {
    fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Empty span just past the last token.
    fn end_span(&self) -> Span {
        let end = self.tokens.last().map_or(0, |t| t.span.0.end);
        Span::new(end, end)
    }

    fn parse_program(&mut self) -> Vec<Statement<'a>> {
        let mut statements = Vec::new();

        while let Some(token) = self.peek() {
            // Stray semicolons between statements are allowed.
            if token.is_punctuation(";") {
                self.pos += 1;
                continue;
            }

            match self.statement(token) {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    if self.errors.report(err).is_break() {
                        break;
                    }
                    self.synchronize();
                }
            }
        }

        statements
    }

    /// Skip to just past the next `;`.
    fn synchronize(&mut self) {
        while let Some(token) = self.advance() {
            if token.is_punctuation(";") {
                break;
            }
        }
    }

    fn statement(&mut self, token: &'t Token<'a>) -> Result<Statement<'a>, SyntaxError> {
        if token.is_keyword("print") {
            self.pos += 1;
            self.print_statement(token)
        } else if token.is_keyword("let") {
            self.pos += 1;
            self.let_statement(token)
        } else {
            // Leave the offending token in place; nothing after it is parsed.
            Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken {
                    found: token.value.to_string(),
                    line: token.line,
                    column: token.column,
                },
                token.span.clone(),
            )
            .with_help(keyword_hint(token)))
        }
    }

    fn print_statement(&mut self, keyword: &'t Token<'a>) -> Result<Statement<'a>, SyntaxError> {
        let expression = self.expression();
        let end = self.expect_semicolon("print", keyword)?;
        Ok(Statement::Print {
            expression,
            span: Span::combine(&keyword.span, &end),
        })
    }

    fn let_statement(&mut self, keyword: &'t Token<'a>) -> Result<Statement<'a>, SyntaxError> {
        let name = match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => {
                self.pos += 1;
                token
            }
            Some(token) => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedIdentifier {
                        line: token.line,
                        column: token.column,
                    },
                    token.span.clone(),
                ));
            }
            None => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedIdentifier {
                        line: keyword.line,
                        column: keyword.column,
                    },
                    self.end_span(),
                ));
            }
        };

        match self.peek() {
            Some(token) if token.is_operator("=") => self.pos += 1,
            other => {
                let (line, column, span) = match other {
                    Some(token) => (token.line, token.column, token.span.clone()),
                    None => (name.line, name.column, self.end_span()),
                };
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedAssignment {
                        name: name.value.to_string(),
                        line,
                        column,
                    },
                    span,
                ));
            }
        }

        let expression = self.expression();
        let end = self.expect_semicolon("let", keyword)?;
        Ok(Statement::Let {
            name: name.value,
            expression,
            name_span: name.span.clone(),
            span: Span::combine(&keyword.span, &end),
        })
    }

    fn expect_semicolon(
        &mut self,
        statement: &'static str,
        keyword: &Token<'a>,
    ) -> Result<Span, SyntaxError> {
        match self.peek() {
            Some(token) if token.is_punctuation(";") => {
                self.pos += 1;
                Ok(token.span.clone())
            }
            other => Err(SyntaxError::new(
                SyntaxErrorKind::MissingSemicolon {
                    statement,
                    line: keyword.line,
                },
                other.map_or_else(|| self.end_span(), |t| t.span.clone()),
            )),
        }
    }

    fn expression(&mut self) -> &'a Expr<'a> {
        let mut left = self.primary();

        while let Some(operator) = self.peek_operator() {
            self.pos += 1;
            let right = self.primary();
            left = self.arena.alloc(Expr::Binary {
                operator,
                left,
                right,
            });
        }

        left
    }

    fn peek_operator(&self) -> Option<BinaryOp> {
        let token = self.peek()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        BinaryOp::from_symbol(token.value)
    }

    fn primary(&mut self) -> &'a Expr<'a> {
        let Some(token) = self.peek() else {
            return self.error_expr("Unexpected end of input", self.end_span());
        };

        match token.kind {
            TokenKind::Number => {
                self.pos += 1;
                // Digits only, so parsing can only fail on overflow.
                let value = token.value.parse::<i64>().unwrap_or(i64::MAX);
                self.arena.alloc(Expr::Number {
                    value,
                    token: token.clone(),
                })
            }
            TokenKind::String => {
                self.pos += 1;
                self.arena.alloc(Expr::Str {
                    token: token.clone(),
                })
            }
            TokenKind::Identifier => {
                self.pos += 1;
                self.arena.alloc(Expr::Ident {
                    name: token.value,
                    token: token.clone(),
                })
            }
            TokenKind::Punctuation if token.value == "(" => {
                self.pos += 1;
                let inner = self.expression();
                match self.peek() {
                    Some(close) if close.is_punctuation(")") => {
                        self.pos += 1;
                        inner
                    }
                    _ => {
                        let span = Span::combine(&token.span, &inner.span());
                        self.error_expr("Missing closing parenthesis", span)
                    }
                }
            }
            _ => {
                // A `;` still terminates the statement.
                if !token.is_punctuation(";") {
                    self.pos += 1;
                }
                let message = format!("Unexpected token: {}", token.value);
                self.error_expr(&message, token.span.clone())
            }
        }
    }

    fn error_expr(&self, message: &str, span: Span) -> &'a Expr<'a> {
        self.arena.alloc(Expr::Error {
            message: self.arena.alloc_str(message),
            span,
        })
    }
}

/// Suggest a keyword for an identifier that looks like a misspelling of one.
fn keyword_hint(token: &Token<'_>) -> Option<String> {
    if token.kind != TokenKind::Identifier || token.value.chars().count() < 2 {
        return None;
    }
    KEYWORDS
        .iter()
        .map(|keyword| (edit_distance(token.value, keyword), keyword))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, keyword)| format!("did you mean '{}'?", keyword))
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        core::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
