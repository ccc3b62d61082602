use bumpalo::Bump;
use hashbrown::{DefaultHashBuilder, HashMap};
use tracing::{debug, trace};

use crate::analyzer::{SemanticError, SemanticErrorKind};
use crate::diagnostics::{ErrorSink, TraversalPolicy};
use crate::lexer::Token;
use crate::parser::{BinaryOp, Expr, Program, Span, Statement};
use crate::visitor::{ExprVisitor, walk_expr};

/// Check declarations and identifier uses across the whole program.
///
/// Every statement is visited regardless of earlier errors; errors come
/// back in source order.
pub fn analyze<'a>(arena: &'a Bump, program: Program<'a>) -> Vec<SemanticError> {
    analyze_with_symbols(arena, program).0
}

/// Like [`analyze`], also returning the declared names in declaration order.
pub fn analyze_with_symbols<'a>(
    arena: &'a Bump,
    program: Program<'a>,
) -> (Vec<SemanticError>, Vec<&'a str>) {
    let mut analyzer = Analyzer {
        symbols: HashMap::new_in(arena),
        declared: Vec::new(),
        errors: ErrorSink::new(TraversalPolicy::CollectAll),
    };

    for statement in program.iter() {
        analyzer.statement(statement);
    }

    let errors = analyzer.errors.into_errors();
    debug!(
        statements = program.len(),
        declared = analyzer.declared.len(),
        errors = errors.len(),
        "semantic analysis finished"
    );
    (errors, analyzer.declared)
}

struct Analyzer<'a> {
    /// Name to the span of its first declaration.
    symbols: HashMap<&'a str, Span, DefaultHashBuilder, &'a Bump>,
    declared: Vec<&'a str>,
    errors: ErrorSink<SemanticError>,
}

impl<'a> Analyzer<'a> {
    fn statement(&mut self, statement: &'a Statement<'a>) {
        match statement {
            Statement::Print { expression, .. } => walk_expr(self, *expression),
            Statement::Let {
                name,
                expression,
                name_span,
                ..
            } => {
                walk_expr(self, *expression);
                self.declare(*name, name_span);
            }
        }
    }

    fn declare(&mut self, name: &'a str, span: &Span) {
        if let Some(first) = self.symbols.get(name) {
            let kind = SemanticErrorKind::AlreadyDeclared {
                name: name.to_string(),
                first: first.clone(),
            };
            self.report(kind, span.clone());
            return;
        }
        trace!(name, "declared");
        self.symbols.insert(name, span.clone());
        self.declared.push(name);
    }

    fn report(&mut self, kind: SemanticErrorKind, span: Span) {
        // CollectAll never breaks.
        let _ = self.errors.report(SemanticError::new(kind, span));
    }
}

impl<'a> ExprVisitor<'a> for Analyzer<'a> {
    type Output = ();

    fn visit_number(&mut self, _value: i64, _token: &Token<'a>) {}

    fn visit_string(&mut self, _token: &Token<'a>) {}

    fn visit_identifier(&mut self, name: &'a str, token: &Token<'a>) {
        if !self.symbols.contains_key(name) {
            let kind = SemanticErrorKind::NotDeclared {
                name: name.to_string(),
            };
            self.report(kind, token.span.clone());
        }
    }

    fn visit_binary(&mut self, _operator: BinaryOp, left: &'a Expr<'a>, right: &'a Expr<'a>) {
        walk_expr(self, left);
        walk_expr(self, right);
    }

    fn visit_error(&mut self, message: &'a str, span: &Span) {
        let kind = SemanticErrorKind::InvalidExpression {
            message: message.to_string(),
        };
        self.report(kind, span.clone());
    }
}
