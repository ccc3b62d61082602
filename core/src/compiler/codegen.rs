use bumpalo::Bump;
use hashbrown::{DefaultHashBuilder, HashMap};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::compiler::{CodegenError, Instruction, Register};
use crate::lexer::Token;
use crate::parser::{BinaryOp, Expr, Program, Span, Statement};
use crate::visitor::{ExprVisitor, walk_expr};

/// Value every identifier folds to, whatever was declared.
pub const IDENTIFIER_PLACEHOLDER: i64 = 42;

/// How an expression is turned into something an instruction can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Collapse to a single immediate; no registers, no instructions.
    Fold,
    /// Route values through registers, emitting `MOV` and arithmetic.
    Registers,
}

impl EvalMode {
    /// Binary expressions are threaded through registers, anything else folds.
    pub fn for_print(expr: &Expr<'_>) -> Self {
        if expr.is_binary() {
            EvalMode::Registers
        } else {
            EvalMode::Fold
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Immediate(i64),
    Register(Register),
}

/// Output of code generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assembly {
    pub instructions: Vec<Instruction>,
    /// Registers handed out by the allocation counter.
    pub registers_used: u32,
}

impl Assembly {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().map(|i| i.to_string()).collect()
    }
}

/// Generate assembly for a program that passed semantic analysis.
///
/// Declarations and non-arithmetic prints are constant folded. A print whose
/// expression is a binary expression is evaluated through registers and
/// followed by `OUT` of the register holding the result.
pub fn generate<'a>(arena: &'a Bump, program: Program<'a>) -> Result<Assembly, CodegenError> {
    let mut generator = Generator::new(arena);
    for statement in program.iter() {
        generator.statement(statement)?;
    }
    let assembly = generator.finish();
    debug!(
        instructions = assembly.instructions.len(),
        registers = assembly.registers_used,
        "code generation finished"
    );
    Ok(assembly)
}

/// Per-invocation code generation state.
pub struct Generator<'a> {
    next_register: u32,
    registers: HashMap<&'a str, Register, DefaultHashBuilder, &'a Bump>,
    instructions: Vec<Instruction>,
}

impl<'a> Generator<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            next_register: 1,
            registers: HashMap::new_in(arena),
            instructions: Vec::new(),
        }
    }

    pub fn statement(&mut self, statement: &'a Statement<'a>) -> Result<(), CodegenError> {
        match statement {
            Statement::Let {
                name, expression, ..
            } => {
                let dst = self.allocate()?;
                match self.evaluate(*expression, EvalMode::Fold)? {
                    Operand::Immediate(imm) => {
                        self.emit(Instruction::Mov { dst, imm });
                        self.registers.insert(*name, dst);
                    }
                    Operand::Register(src) => {
                        self.registers.insert(*name, src);
                    }
                }
            }
            Statement::Print { expression, .. } => {
                let mode = EvalMode::for_print(expression);
                match self.evaluate(*expression, mode)? {
                    Operand::Register(src) => self.emit(Instruction::Out { src }),
                    Operand::Immediate(imm) => {
                        // Always R1, independent of the allocation counter.
                        let dst = Register(1);
                        self.emit(Instruction::Mov { dst, imm });
                        self.emit(Instruction::Out { src: dst });
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluate `expr` with the given strategy.
    pub fn evaluate(&mut self, expr: &'a Expr<'a>, mode: EvalMode) -> Result<Operand, CodegenError> {
        match mode {
            EvalMode::Fold => ConstantFolder.fold(expr).map(Operand::Immediate),
            EvalMode::Registers => walk_expr(self, expr).map(Operand::Register),
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn finish(self) -> Assembly {
        Assembly {
            instructions: self.instructions,
            registers_used: self.next_register - 1,
        }
    }

    fn allocate(&mut self) -> Result<Register, CodegenError> {
        let register = Register(self.next_register);
        self.next_register = self
            .next_register
            .checked_add(1)
            .ok_or(CodegenError::RegistersExhausted)?;
        Ok(register)
    }

    fn emit(&mut self, instruction: Instruction) {
        trace!(%instruction, "emit");
        self.instructions.push(instruction);
    }

    fn load(&mut self, imm: i64) -> Result<Register, CodegenError> {
        let dst = self.allocate()?;
        self.emit(Instruction::Mov { dst, imm });
        Ok(dst)
    }
}

/// Register-threaded evaluation.
impl<'a> ExprVisitor<'a> for Generator<'a> {
    type Output = Result<Register, CodegenError>;

    fn visit_number(&mut self, value: i64, _token: &Token<'a>) -> Self::Output {
        self.load(value)
    }

    fn visit_string(&mut self, token: &Token<'a>) -> Self::Output {
        self.load(string_length(token))
    }

    fn visit_identifier(&mut self, name: &'a str, _token: &Token<'a>) -> Self::Output {
        if let Some(register) = self.registers.get(name) {
            return Ok(*register);
        }
        // Not bound and never loaded.
        let register = self.allocate()?;
        warn!(name, %register, "undeclared identifier uses an uninitialized register");
        Ok(register)
    }

    fn visit_binary(
        &mut self,
        operator: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Self::Output {
        let dst = walk_expr(self, left)?;
        let src = walk_expr(self, right)?;
        self.emit(Instruction::Arith {
            op: operator.into(),
            dst,
            src,
        });
        Ok(dst)
    }

    fn visit_error(&mut self, message: &'a str, span: &Span) -> Self::Output {
        Err(malformed(message, span))
    }
}

/// Folds an expression to an immediate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantFolder;

impl ConstantFolder {
    pub fn fold<'a>(mut self, expr: &'a Expr<'a>) -> Result<i64, CodegenError> {
        walk_expr(&mut self, expr)
    }
}

impl<'a> ExprVisitor<'a> for ConstantFolder {
    type Output = Result<i64, CodegenError>;

    fn visit_number(&mut self, value: i64, _token: &Token<'a>) -> Self::Output {
        Ok(value)
    }

    fn visit_string(&mut self, token: &Token<'a>) -> Self::Output {
        Ok(string_length(token))
    }

    fn visit_identifier(&mut self, _name: &'a str, _token: &Token<'a>) -> Self::Output {
        Ok(IDENTIFIER_PLACEHOLDER)
    }

    fn visit_binary(
        &mut self,
        operator: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> Self::Output {
        let left = walk_expr(self, left)?;
        let right = walk_expr(self, right)?;
        Ok(operator.apply(left, right))
    }

    fn visit_error(&mut self, message: &'a str, span: &Span) -> Self::Output {
        Err(malformed(message, span))
    }
}

fn string_length(token: &Token<'_>) -> i64 {
    i64::try_from(token.value.chars().count()).unwrap_or(i64::MAX)
}

fn malformed(message: &str, span: &Span) -> CodegenError {
    CodegenError::MalformedExpression {
        message: message.to_string(),
        span: span.clone(),
    }
}
