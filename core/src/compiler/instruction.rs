//! Assembly instructions of the target register machine.
//!
//! Instructions are produced structurally by the code generator and carried
//! as-is to the encoder. They also round-trip through their textual form
//! (`MOV R1, 7`, `ADD R1, R2`, `OUT R1`) so that hand-written assembly can
//! be encoded with [`crate::encoder::encode_lines`].

use core::fmt;
use core::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::parser::BinaryOp;

/// A numbered register. Numbering starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(pub u32);

impl Register {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl FromStr for Register {
    type Err = ParseInstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('R')
            .ok_or_else(|| ParseInstructionError::BadRegister(s.to_string()))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseInstructionError::BadRegister(s.to_string()));
        }
        digits
            .parse()
            .map(Register)
            .map_err(|_| ParseInstructionError::BadRegister(s.to_string()))
    }
}

/// Two-register arithmetic mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            ArithOp::Add => "ADD",
            ArithOp::Sub => "SUB",
            ArithOp::Mul => "MUL",
            ArithOp::Div => "DIV",
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "ADD" => Some(ArithOp::Add),
            "SUB" => Some(ArithOp::Sub),
            "MUL" => Some(ArithOp::Mul),
            "DIV" => Some(ArithOp::Div),
            _ => None,
        }
    }
}

impl From<BinaryOp> for ArithOp {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => ArithOp::Add,
            BinaryOp::Sub => ArithOp::Sub,
            BinaryOp::Mul => ArithOp::Mul,
            BinaryOp::Div => ArithOp::Div,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `MOV Rdst, imm`
    Mov { dst: Register, imm: i64 },
    /// `OP Rdst, Rsrc`; the result stays in `dst`.
    Arith {
        op: ArithOp,
        dst: Register,
        src: Register,
    },
    /// `OUT Rsrc`
    Out { src: Register },
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Mov { .. } => "MOV",
            Instruction::Arith { op, .. } => op.mnemonic(),
            Instruction::Out { .. } => "OUT",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Mov { dst, imm } => write!(f, "MOV {}, {}", dst, imm),
            Instruction::Arith { op, dst, src } => {
                write!(f, "{} {}, {}", op.mnemonic(), dst, src)
            }
            Instruction::Out { src } => write!(f, "OUT {}", src),
        }
    }
}

impl Serialize for Instruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseInstructionError {
    #[error("empty line")]
    Empty,
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),
    #[error("malformed operands '{0}'")]
    BadOperands(String),
    #[error("invalid register '{0}'")]
    BadRegister(String),
    #[error("invalid immediate '{0}'")]
    BadImmediate(String),
}

impl FromStr for Instruction {
    type Err = ParseInstructionError;

    /// Accepts `MOV Rn, imm`, `ADD|SUB|MUL|DIV Rn, Rm` and `OUT Rn`,
    /// with any amount of surrounding whitespace.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (mnemonic, operands) = match line.split_once(char::is_whitespace) {
            Some((mnemonic, rest)) => (mnemonic, rest.trim()),
            None if line.is_empty() => return Err(ParseInstructionError::Empty),
            None => (line, ""),
        };

        let pair = || {
            operands
                .split_once(',')
                .map(|(a, b)| (a.trim(), b.trim()))
                .ok_or_else(|| ParseInstructionError::BadOperands(operands.to_string()))
        };

        match mnemonic {
            "MOV" => {
                let (dst, imm) = pair()?;
                let imm = parse_immediate(imm)?;
                Ok(Instruction::Mov {
                    dst: dst.parse()?,
                    imm,
                })
            }
            "OUT" => Ok(Instruction::Out {
                src: operands.parse()?,
            }),
            other => {
                let op = ArithOp::from_mnemonic(other)
                    .ok_or_else(|| ParseInstructionError::UnknownMnemonic(other.to_string()))?;
                let (dst, src) = pair()?;
                Ok(Instruction::Arith {
                    op,
                    dst: dst.parse()?,
                    src: src.parse()?,
                })
            }
        }
    }
}

fn parse_immediate(text: &str) -> Result<i64, ParseInstructionError> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseInstructionError::BadImmediate(text.to_string()));
    }
    text.parse()
        .map_err(|_| ParseInstructionError::BadImmediate(text.to_string()))
}
