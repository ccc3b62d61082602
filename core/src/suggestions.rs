//! Advisory messages shown after a successful compilation.

use crate::compiler::Instruction;
use crate::parser::{Program, Statement};

pub const EMPTY_PROGRAM: &str = "Try writing some code! For example: print \"Hello World!\";";
pub const NO_ASSEMBLY: &str =
    "Your code doesn't generate any assembly instructions. Add a print statement to see output.";
pub const UNPRINTED_VARIABLES: &str =
    "You declared variables but didn't print them. Try adding: print <variable>;";

/// Heuristic suggestions for a compiled program, in a fixed order.
pub fn suggest(program: Program<'_>, assembly: &[Instruction]) -> Vec<String> {
    let mut suggestions = Vec::new();

    if program.is_empty() {
        suggestions.push(EMPTY_PROGRAM.to_string());
    } else if assembly.is_empty() {
        suggestions.push(NO_ASSEMBLY.to_string());
    }

    let declares = program
        .iter()
        .any(|s| matches!(s, Statement::Let { .. }));
    let prints = program
        .iter()
        .any(|s| matches!(s, Statement::Print { .. }));
    if declares && !prints {
        suggestions.push(UNPRINTED_VARIABLES.to_string());
    }

    suggestions
}
