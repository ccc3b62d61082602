//! Assembly generation for the register machine.

pub mod codegen;
pub mod error;
pub mod instruction;

#[cfg(test)]
mod codegen_test;

pub use codegen::{
    Assembly, ConstantFolder, EvalMode, Generator, IDENTIFIER_PLACEHOLDER, Operand, generate,
};
pub use error::CodegenError;
pub use instruction::{ArithOp, Instruction, ParseInstructionError, Register};
