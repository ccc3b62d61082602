//! Expression visitor used by every pass that walks expressions.
//!
//! The semantic analyzer, the constant folder and the register-threaded
//! evaluator all implement [`ExprVisitor`]; [`walk_expr`] does the
//! dispatch. Implementations decide themselves whether and in which order
//! to recurse into the operands of a binary expression.

use crate::lexer::Token;
use crate::parser::{BinaryOp, Expr, Span};

/// Visitor over one expression node.
///
/// `Output` can be `()` for side-effect passes (error collection), a value
/// for evaluation (`i64` immediates) or a location (a register).
pub trait ExprVisitor<'a> {
    type Output;

    fn visit_number(&mut self, value: i64, token: &Token<'a>) -> Self::Output;

    fn visit_string(&mut self, token: &Token<'a>) -> Self::Output;

    fn visit_identifier(&mut self, name: &'a str, token: &Token<'a>) -> Self::Output;

    fn visit_binary(
        &mut self,
        operator: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Self::Output;

    fn visit_error(&mut self, message: &'a str, span: &Span) -> Self::Output;
}

/// Dispatch `expr` to the matching visitor method.
pub fn walk_expr<'a, V>(visitor: &mut V, expr: &'a Expr<'a>) -> V::Output
where
    V: ExprVisitor<'a> + ?Sized,
{
    match expr {
        Expr::Number { value, token } => visitor.visit_number(*value, token),
        Expr::Str { token } => visitor.visit_string(token),
        Expr::Ident { name, token } => visitor.visit_identifier(*name, token),
        Expr::Binary {
            operator,
            left,
            right,
        } => visitor.visit_binary(*operator, left, right),
        Expr::Error { message, span } => visitor.visit_error(*message, span),
    }
}
