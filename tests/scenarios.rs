mod cases;

use cases::{SCENARIOS, compile_json};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_scenarios() {
    for scenario in SCENARIOS.iter() {
        let json = compile_json(scenario.source);
        let data = &json["data"];

        match scenario.error {
            None => {
                assert_eq!(json["success"], true, "{}", scenario.name);
                assert_eq!(strings(&data["assembly"]), scenario.assembly, "{}", scenario.name);
                assert_eq!(
                    strings(&data["machine_code"]),
                    scenario.machine_code,
                    "{}",
                    scenario.name
                );
                assert_eq!(
                    strings(&data["ai_suggestions"]),
                    scenario.suggestions,
                    "{}",
                    scenario.name
                );
            }
            Some(error) => {
                assert_eq!(json["success"], false, "{}", scenario.name);
                assert_eq!(json["error"], error, "{}", scenario.name);
                assert_eq!(strings(&data["errors"]), scenario.errors, "{}", scenario.name);
                assert!(data.get("assembly").is_none(), "{}", scenario.name);
            }
        }
    }
}

#[test]
fn test_declare_and_add_tokens_and_ast() {
    let json = compile_json("let x = 7;\nlet y = 66;\nprint (x + y);");
    let tokens = json["data"]["tokens"].as_array().unwrap();

    let lets = tokens
        .iter()
        .filter(|t| t["kind"] == "KEYWORD" && t["value"] == "let")
        .count();
    assert_eq!(lets, 2);
    let identifiers: Vec<&str> = tokens
        .iter()
        .filter(|t| t["kind"] == "IDENTIFIER")
        .filter_map(|t| t["value"].as_str())
        .collect();
    assert_eq!(identifiers, vec!["x", "y", "x", "y"]);

    let ast = json["data"]["ast"].as_array().unwrap();
    assert_eq!(ast.len(), 3);
    assert_eq!(ast[0]["type"], "VariableDeclaration");
    assert_eq!(ast[1]["type"], "VariableDeclaration");
    assert_eq!(ast[2]["type"], "Print");
    assert_eq!(ast[2]["expression"]["type"], "BinaryExpression");
    assert_eq!(ast[2]["expression"]["operator"], "+");
    assert_eq!(ast[2]["expression"]["left"]["name"], "x");
    assert_eq!(ast[2]["expression"]["right"]["name"], "y");
}

#[test]
fn test_trace_stops_at_failing_phase() {
    let stages = |source: &str| -> Vec<String> {
        compile_json(source)["data"]["compilation_steps"]
            .as_array()
            .unwrap()
            .iter()
            .map(|step| step["stage"].as_str().unwrap().to_string())
            .collect()
    };

    assert_eq!(stages("print @;"), vec!["lexical_analysis"]);
    assert_eq!(stages("print 1"), vec!["lexical_analysis", "syntax_analysis"]);
    assert_eq!(
        stages("print z;"),
        vec!["lexical_analysis", "syntax_analysis", "semantic_analysis"]
    );
    assert_eq!(
        stages("print 1;"),
        vec![
            "lexical_analysis",
            "syntax_analysis",
            "semantic_analysis",
            "code_generation",
            "machine_code_generation",
            "suggestions",
        ]
    );
}

#[test]
fn test_trace_records_have_timestamps_and_payloads() {
    let json = compile_json("let a = 1; print a + 2;");
    let steps = json["data"]["compilation_steps"].as_array().unwrap();
    for step in steps {
        assert!(step["timestamp"].as_str().is_some_and(|t| t.contains('T')));
        assert!(step["message"].is_string());
    }
    assert_eq!(steps[0]["payload"]["token_count"], 10);
    assert_eq!(steps[2]["payload"]["declared"][0], "a");
    assert_eq!(steps[3]["payload"]["registers_used"], 2);
    assert_eq!(steps[4]["payload"]["word_count"], 4);
}

#[test]
fn test_parse_error_node_fails_semantic_phase() {
    let json = compile_json("print (1 + 2;");
    assert_eq!(json["error"], "Semantic Analysis Failed");
    assert_eq!(
        strings(&json["data"]["errors"]),
        vec!["Missing closing parenthesis"]
    );
}

#[test]
fn test_missing_operand_before_semicolon_fails_semantic_phase() {
    for (source, errors) in [
        ("print ;", vec!["Unexpected token: ;"]),
        ("print 1 +;", vec!["Unexpected token: ;"]),
        ("let x = (;", vec!["Missing closing parenthesis"]),
    ] {
        let json = compile_json(source);
        assert_eq!(json["error"], "Semantic Analysis Failed", "{}", source);
        assert_eq!(strings(&json["data"]["errors"]), errors, "{}", source);
    }
}

#[test]
fn test_semantic_errors_are_exhaustive_and_ordered() {
    let json = compile_json("print a;\nlet b = c + a;\nprint d * b;");
    assert_eq!(
        strings(&json["data"]["errors"]),
        vec![
            "Variable 'a' is not declared",
            "Variable 'c' is not declared",
            "Variable 'a' is not declared",
            "Variable 'd' is not declared",
        ]
    );
}

#[test]
fn test_parser_stops_at_first_statement_error() {
    let json = compile_json("print 1;\n= 2;\nprint 3\nlet;");
    assert_eq!(json["error"], "Syntax Analysis Failed");
    assert_eq!(
        strings(&json["data"]["errors"]),
        vec!["Unexpected token '=' at line 2, col 1"]
    );
}
