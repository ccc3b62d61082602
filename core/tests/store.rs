use bumpalo::Bump;
use stepwise_core::api::{
    CompilationSnapshot, CompilationStore, CompileOptions, Engine, EngineOptions, InMemoryStore,
    Outcome, RecordId, StoreError,
};
use stepwise_core::trace::Stage;

fn saving() -> CompileOptions {
    CompileOptions {
        save: true,
        ..CompileOptions::default()
    }
}

#[test]
fn test_successful_compilation_is_saved() {
    let store = InMemoryStore::new();
    let engine = Engine::new(EngineOptions::default()).with_store(&store);
    let arena = Bump::new();

    let result = engine.compile_with(&arena, "let x = 7;\nprint x;", saving());
    let last = result.steps.last().unwrap();
    assert_eq!(last.stage, Stage::Persistence);
    assert_eq!(last.message, "Saved compilation #1");

    let compiled = result.into_result().unwrap();
    assert_eq!(compiled.saved, Some(RecordId(1)));

    let stored = store.get(RecordId(1)).unwrap();
    assert_eq!(stored.source, "let x = 7;\nprint x;");
    assert_eq!(stored.document["assembly"][0], "MOV R1, 7");
    assert_eq!(stored.document["machine_code"][0], "0001 0001 0111");
    assert_eq!(stored.document["ast"][0]["type"], "VariableDeclaration");
    assert_eq!(
        stored.document["compilation_steps"]
            .as_array()
            .unwrap()
            .len(),
        6
    );
}

#[test]
fn test_nothing_is_saved_unless_requested_or_successful() {
    let store = InMemoryStore::new();
    let engine = Engine::new(EngineOptions::default()).with_store(&store);
    let arena = Bump::new();

    assert!(engine.compile(&arena, "print 1;").is_success());
    let failed = engine.compile_with(&arena, "print nope;", saving());
    assert!(!failed.is_success());
    assert!(store.is_empty());
}

#[test]
fn test_save_without_store_still_succeeds() {
    let engine = Engine::new(EngineOptions::default());
    let arena = Bump::new();
    let result = engine.compile_with(&arena, "print 1;", saving());
    assert!(result.is_success());
    assert!(result.steps.iter().all(|s| s.stage != Stage::Persistence));
}

#[test]
fn test_history_is_most_recent_first() {
    let store = InMemoryStore::new();
    let engine = Engine::new(EngineOptions::default()).with_store(&store);
    let arena = Bump::new();
    for source in ["print 1;", "print 2;", "print 3;"] {
        assert!(engine.compile_with(&arena, source, saving()).is_success());
    }
    let sources: Vec<String> = store.history().into_iter().map(|r| r.source).collect();
    assert_eq!(sources, vec!["print 3;", "print 2;", "print 1;"]);
}

struct BrokenStore;

impl CompilationStore for BrokenStore {
    fn save(&self, _snapshot: &CompilationSnapshot<'_, '_>) -> Result<RecordId, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

#[test]
fn test_store_failure_is_a_fault_with_partial_trace() {
    let store = BrokenStore;
    let engine = Engine::new(EngineOptions::default()).with_store(&store);
    let arena = Bump::new();
    let result = engine.compile_with(&arena, "print 1;", saving());

    match &result.outcome {
        Outcome::Fault(message) => assert_eq!(message, "store unavailable: disk full"),
        other => panic!("expected fault, got {:?}", other),
    }
    assert_eq!(result.steps.len(), 6);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Compilation failed: store unavailable: disk full");
    assert_eq!(json["compilation_steps"].as_array().unwrap().len(), 6);
    assert!(json.get("data").is_none());
}
