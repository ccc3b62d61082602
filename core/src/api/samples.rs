//! Built-in example programs offered to front ends.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "hello",
        description: "Print a string; only its length reaches the machine",
        source: "print \"Hello World!\";\n",
    },
    Sample {
        name: "variables",
        description: "Declare two variables and print their sum",
        source: "let x = 7;\nlet y = 66;\nprint (x + y);\n",
    },
    Sample {
        name: "arithmetic",
        description: "Operators chain left to right with equal precedence",
        source: "// (1 + 2) * 3\nprint 1 + 2 * 3;\nlet folded = 10 / 0;\n",
    },
    Sample {
        name: "comments",
        description: "Line and block comments are skipped",
        source: "/* totals */\nlet total = 4; // four\nprint total * 2;\n",
    },
    Sample {
        name: "semantic-error",
        description: "Using a variable that was never declared",
        source: "let a = 1;\nprint a + b;\n",
    },
    Sample {
        name: "syntax-error",
        description: "A missing semicolon stops the parser",
        source: "let a = 1\nprint a;\n",
    },
];

/// All built-in samples, in display order.
pub fn samples() -> &'static [Sample] {
    SAMPLES
}

/// Look up a sample by name.
pub fn sample(name: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.name == name)
}
