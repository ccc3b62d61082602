//! Fixed-width binary encoding of assembly instructions.
//!
//! Every instruction becomes one word of three 4-bit fields: opcode, first
//! operand, second operand. Operands outside `0..=15` are clamped.

use core::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::compiler::Instruction;

const FIELD_MAX: i64 = 0b1111;

/// Opcode used for mnemonics without an assigned encoding.
pub const UNKNOWN_OPCODE: u8 = 0b1111;

pub fn opcode(mnemonic: &str) -> u8 {
    match mnemonic {
        "MOV" => 0b0001,
        "OUT" => 0b0010,
        "ADD" => 0b0011,
        "SUB" => 0b0100,
        "MUL" => 0b0101,
        "DIV" => 0b0110,
        _ => UNKNOWN_OPCODE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MachineWord {
    pub opcode: u8,
    pub operand1: u8,
    pub operand2: u8,
}

impl MachineWord {
    pub fn new(opcode: u8, operand1: i64, operand2: i64) -> Self {
        Self {
            opcode: opcode & 0b1111,
            operand1: clamp(operand1),
            operand2: clamp(operand2),
        }
    }

    pub fn from_instruction(instruction: &Instruction) -> Self {
        let code = opcode(instruction.mnemonic());
        match *instruction {
            Instruction::Mov { dst, imm } => Self::new(code, dst.index().into(), imm),
            Instruction::Arith { dst, src, .. } => {
                Self::new(code, dst.index().into(), src.index().into())
            }
            Instruction::Out { src } => Self::new(code, src.index().into(), 0),
        }
    }
}

fn clamp(value: i64) -> u8 {
    // In range after the clamp, so the cast is lossless.
    value.clamp(0, FIELD_MAX) as u8
}

impl fmt::Display for MachineWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04b} {:04b} {:04b}",
            self.opcode, self.operand1, self.operand2
        )
    }
}

impl Serialize for MachineWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Encode structured instructions, one word each.
pub fn encode(instructions: &[Instruction]) -> Vec<MachineWord> {
    let words: Vec<MachineWord> = instructions
        .iter()
        .map(|instruction| {
            let word = MachineWord::from_instruction(instruction);
            trace!(%instruction, %word, "encoded");
            word
        })
        .collect();
    debug!(words = words.len(), "machine code generation finished");
    words
}

/// Encode textual assembly. Lines that are not `MOV Rn, imm`,
/// `ADD|SUB|MUL|DIV Rn, Rm` or `OUT Rn` are dropped.
pub fn encode_lines<I, S>(lines: I) -> Vec<MachineWord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let instructions: Vec<Instruction> = lines
        .into_iter()
        .filter_map(|line| match line.as_ref().parse::<Instruction>() {
            Ok(instruction) => Some(instruction),
            Err(err) => {
                trace!(line = line.as_ref(), %err, "skipping line");
                None
            }
        })
        .collect();
    encode(&instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{ArithOp, Register};
    use pretty_assertions::assert_eq;

    fn text(words: &[MachineWord]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_scenario_words() {
        let words = encode_lines(["MOV R1, 7", "MOV R2, 66", "ADD R1, R2", "OUT R1"]);
        assert_eq!(
            text(&words),
            vec![
                "0001 0001 0111",
                "0001 0010 1111",
                "0011 0001 0010",
                "0010 0001 0000"
            ]
        );
    }

    #[test]
    fn test_structured_and_textual_paths_agree() {
        let instructions = vec![
            Instruction::Mov {
                dst: Register(3),
                imm: -4,
            },
            Instruction::Arith {
                op: ArithOp::Div,
                dst: Register(3),
                src: Register(20),
            },
            Instruction::Out { src: Register(3) },
        ];
        let lines: Vec<String> = instructions.iter().map(|i| i.to_string()).collect();
        assert_eq!(encode(&instructions), encode_lines(&lines));
        assert_eq!(
            text(&encode(&instructions)),
            vec!["0001 0011 0000", "0110 0011 1111", "0010 0011 0000"]
        );
    }

    #[test]
    fn test_unrecognized_lines_are_dropped() {
        let words = encode_lines(["; comment", "", "JMP R1", "SUB R2, R1", "MOV R1"]);
        assert_eq!(text(&words), vec!["0100 0010 0001"]);
    }

    #[test]
    fn test_encoding_is_repeatable() {
        let lines = ["MOV R1, 9", "MUL R1, R1", "OUT R1"];
        assert_eq!(encode_lines(lines), encode_lines(lines));
    }

    #[test]
    fn test_opcode_table() {
        assert_eq!(opcode("MOV"), 1);
        assert_eq!(opcode("DIV"), 6);
        assert_eq!(opcode("NOP"), UNKNOWN_OPCODE);
        assert_eq!(opcode(ArithOp::Mul.mnemonic()), 5);
    }

    #[test]
    fn test_word_serializes_as_text() {
        let word = MachineWord::new(2, 1, 0);
        assert_eq!(serde_json::to_string(&word).unwrap(), "\"0010 0001 0000\"");
    }
}
