#![allow(dead_code)]

use bumpalo::Bump;
use once_cell::sync::Lazy;
use stepwise::{Engine, EngineOptions};

pub struct Scenario {
    pub name: &'static str,
    pub source: &'static str,
    /// `None` on success, otherwise the `error` field of the result.
    pub error: Option<&'static str>,
    pub errors: Vec<&'static str>,
    pub assembly: Vec<&'static str>,
    pub machine_code: Vec<&'static str>,
    pub suggestions: Vec<&'static str>,
}

pub static SCENARIOS: Lazy<Vec<Scenario>> = Lazy::new(|| {
    vec![
        Scenario {
            name: "declare_and_add",
            source: "let x = 7;\nlet y = 66;\nprint (x + y);",
            error: None,
            errors: vec![],
            assembly: vec!["MOV R1, 7", "MOV R2, 66", "ADD R1, R2", "OUT R1"],
            machine_code: vec![
                "0001 0001 0111",
                "0001 0010 1111",
                "0011 0001 0010",
                "0010 0001 0000",
            ],
            suggestions: vec![],
        },
        Scenario {
            name: "redeclaration",
            source: "let x=1; let x=2;",
            error: Some("Semantic Analysis Failed"),
            errors: vec!["Variable 'x' is already declared"],
            assembly: vec![],
            machine_code: vec![],
            suggestions: vec![],
        },
        Scenario {
            name: "undeclared",
            source: "print y;",
            error: Some("Semantic Analysis Failed"),
            errors: vec!["Variable 'y' is not declared"],
            assembly: vec![],
            machine_code: vec![],
            suggestions: vec![],
        },
        Scenario {
            name: "empty",
            source: "",
            error: None,
            errors: vec![],
            assembly: vec![],
            machine_code: vec![],
            suggestions: vec!["Try writing some code! For example: print \"Hello World!\";"],
        },
        Scenario {
            name: "string_length",
            source: "print \"hi\";",
            error: None,
            errors: vec![],
            assembly: vec!["MOV R1, 2", "OUT R1"],
            machine_code: vec!["0001 0001 0010", "0010 0001 0000"],
            suggestions: vec![],
        },
        Scenario {
            name: "unexpected_character",
            source: "let a = 1 # 2;\nprint $;",
            error: Some("Lexical Analysis Failed"),
            errors: vec![
                "Unexpected character '#' at line 1, col 11",
                "Unexpected character '$' at line 2, col 7",
            ],
            assembly: vec![],
            machine_code: vec![],
            suggestions: vec![],
        },
        Scenario {
            name: "missing_semicolon",
            source: "let a = 1\nprint a;",
            error: Some("Syntax Analysis Failed"),
            errors: vec!["Missing ';' after let statement at line 1"],
            assembly: vec![],
            machine_code: vec![],
            suggestions: vec![],
        },
        Scenario {
            name: "unused_declaration",
            source: "let total = 4 * 5;",
            error: None,
            errors: vec![],
            assembly: vec!["MOV R1, 20"],
            machine_code: vec!["0001 0001 1111"],
            suggestions: vec!["You declared variables but didn't print them. Try adding: print <variable>;"],
        },
    ]
});

/// Compile `source` and return the wire-shape JSON.
pub fn compile_json(source: &str) -> serde_json::Value {
    let engine = Engine::new(EngineOptions::default());
    let arena = Bump::new();
    let result = engine.compile(&arena, source);
    let json = serde_json::to_value(&result).expect("result serializes");
    json
}

/// Compile `source`, which must succeed, and return its assembly lines.
pub fn assemble(source: &str) -> Vec<String> {
    let engine = Engine::new(EngineOptions::default());
    let arena = Bump::new();
    let program = engine
        .compile(&arena, source)
        .into_result()
        .unwrap_or_else(|e| panic!("{:?} failed: {}", source, e));
    program.assembly_lines()
}

#[allow(unused_macros)]
macro_rules! test_case {
    ($name:ident, input: $input:expr, assembly: [$($line:expr),* $(,)?] $(,)?) => {
        #[test]
        fn $name() {
            let expected: Vec<&str> = vec![$($line),*];
            pretty_assertions::assert_eq!(cases::assemble($input), expected);
        }
    };
}
