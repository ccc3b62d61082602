//! Parallel compilations through one shared engine must not see each
//! other's trace, symbol table or register counter.

use bumpalo::Bump;
use stepwise_core::api::{CompileOptions, Engine, EngineOptions, InMemoryStore};
use stepwise_core::trace::Stage;

fn program(i: usize) -> String {
    // Each program declares a different number of variables.
    let mut source = String::new();
    for n in 0..=i % 5 {
        source.push_str(&format!("let v{} = {};\n", n, n + i));
    }
    source.push_str("print (v0 + 1);\n");
    source
}

fn expected_assembly(i: usize) -> Vec<String> {
    let count = i % 5 + 1;
    let mut lines: Vec<String> = (0..count)
        .map(|n| format!("MOV R{}, {}", n + 1, n + i))
        .collect();
    lines.push(format!("MOV R{}, 1", count + 1));
    lines.push(format!("ADD R1, R{}", count + 1));
    lines.push("OUT R1".to_string());
    lines
}

#[test]
fn test_parallel_compilations_are_isolated() {
    let store = InMemoryStore::new();
    let engine = Engine::new(EngineOptions::default()).with_store(&store);
    let options = CompileOptions {
        save: true,
        ..CompileOptions::default()
    };

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let engine = &engine;
            scope.spawn(move || {
                for round in 0..25 {
                    let i = worker * 25 + round;
                    let source = program(i);
                    let arena = Bump::new();
                    let result = engine.compile_with(&arena, &source, options);

                    let stages: Vec<Stage> = result.steps.iter().map(|s| s.stage).collect();
                    assert_eq!(
                        stages,
                        vec![
                            Stage::LexicalAnalysis,
                            Stage::SyntaxAnalysis,
                            Stage::SemanticAnalysis,
                            Stage::CodeGeneration,
                            Stage::MachineCodeGeneration,
                            Stage::Suggestions,
                            Stage::Persistence,
                        ]
                    );

                    let compiled = result.into_result().expect("compilation failed");
                    assert_eq!(compiled.assembly_lines(), expected_assembly(i));
                    assert!(compiled.saved.is_some());
                }
            });
        }
    });

    assert_eq!(store.len(), 200);
}

#[test]
fn test_failures_do_not_leak_into_later_compilations() {
    let engine = Engine::new(EngineOptions::default());

    let arena = Bump::new();
    let failed = engine.compile(&arena, "let x = 1; let x = 2;");
    assert!(!failed.is_success());
    assert_eq!(failed.steps.len(), 3);

    let arena = Bump::new();
    let ok = engine.compile(&arena, "let x = 3; print x;");
    assert!(ok.is_success());
    assert_eq!(ok.steps.len(), 6);
    assert_eq!(
        ok.program().unwrap().assembly_lines(),
        vec!["MOV R1, 3", "MOV R1, 42", "OUT R1"]
    );
}
