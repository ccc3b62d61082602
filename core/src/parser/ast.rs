use serde::Serialize;

use crate::lexer::Token;
use crate::parser::{BinaryOp, Span};

/// A parsed program: statements in source order, allocated in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Program<'a> {
    pub statements: &'a [Statement<'a>],
}

impl<'a> Program<'a> {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'a, Statement<'a>> {
        self.statements.iter()
    }
}

impl Default for Program<'_> {
    fn default() -> Self {
        Self { statements: &[] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement<'a> {
    Print {
        expression: &'a Expr<'a>,
        #[serde(skip)]
        span: Span,
    },
    #[serde(rename = "VariableDeclaration")]
    Let {
        name: &'a str,
        expression: &'a Expr<'a>,
        #[serde(skip)]
        name_span: Span,
        #[serde(skip)]
        span: Span,
    },
}

impl<'a> Statement<'a> {
    pub fn expression(&self) -> &'a Expr<'a> {
        match self {
            Statement::Print { expression, .. } | Statement::Let { expression, .. } => expression,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::Print { span, .. } | Statement::Let { span, .. } => span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr<'a> {
    #[serde(rename = "NumberLiteral")]
    Number { value: i64, token: Token<'a> },
    #[serde(rename = "StringLiteral")]
    Str { token: Token<'a> },
    #[serde(rename = "Identifier")]
    Ident { name: &'a str, token: Token<'a> },
    #[serde(rename = "BinaryExpression")]
    Binary {
        operator: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    /// A malformed expression. Kept in the tree and reported by the
    /// semantic analyzer rather than aborting the parse.
    #[serde(rename = "ParseError")]
    Error {
        message: &'a str,
        #[serde(skip)]
        span: Span,
    },
}

impl<'a> Expr<'a> {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { token, .. } | Expr::Str { token } | Expr::Ident { token, .. } => {
                token.span.clone()
            }
            Expr::Binary { left, right, .. } => Span::combine(&left.span(), &right.span()),
            Expr::Error { span, .. } => span.clone(),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Expr::Binary { .. })
    }
}
