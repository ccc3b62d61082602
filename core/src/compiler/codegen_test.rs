use super::*;
use crate::lexer::tokenize;
use crate::parser::{Expr, parse};
use bumpalo::Bump;
use indoc::indoc;
use pretty_assertions::assert_eq;

fn assemble(source: &str) -> Vec<String> {
    let arena = Bump::new();
    let source: &str = arena.alloc_str(source);
    let (tokens, _) = tokenize(source);
    let (program, errors) = parse(&arena, &tokens);
    assert!(errors.is_empty(), "parsing failed: {:?}", errors);
    let lines = generate(&arena, program)
        .expect("code generation failed")
        .lines();
    lines
}

fn first_expression<'a>(arena: &'a Bump, source: &'a str) -> &'a Expr<'a> {
    let (tokens, _) = tokenize(source);
    let (program, _) = parse(arena, &tokens);
    program.statements[0].expression()
}

#[test]
fn test_declarations_then_binary_print() {
    crate::test_utils::init_test_logging();
    let source = indoc! {"
        let x = 7;
        let y = 66;
        print (x + y);
    "};
    assert_eq!(
        assemble(source),
        vec!["MOV R1, 7", "MOV R2, 66", "ADD R1, R2", "OUT R1"]
    );
}

#[test]
fn test_string_print_folds_to_length() {
    assert_eq!(assemble(r#"print "hi";"#), vec!["MOV R1, 2", "OUT R1"]);
}

#[test]
fn test_empty_program_emits_nothing() {
    assert!(assemble("").is_empty());
}

#[test]
fn test_non_binary_print_always_uses_r1() {
    let source = indoc! {"
        let a = 1;
        let b = 2;
        print b;
        print 5;
    "};
    assert_eq!(
        assemble(source),
        vec!["MOV R1, 1", "MOV R2, 2", "MOV R1, 42", "OUT R1", "MOV R1, 5", "OUT R1"]
    );
}

#[test]
fn test_declaration_folds_with_flat_precedence() {
    assert_eq!(assemble("let v = 1 + 2 * 3;"), vec!["MOV R1, 9"]);
}

#[test]
fn test_declaration_folds_identifiers_to_placeholder() {
    assert_eq!(
        assemble("let a = 3; let b = a + 1;"),
        vec!["MOV R1, 3", "MOV R2, 43"]
    );
}

#[test]
fn test_division_by_zero_folds_to_zero() {
    assert_eq!(assemble("let z = 10 / 0;"), vec!["MOV R1, 0"]);
    assert_eq!(assemble("let t = 7 / 2;"), vec!["MOV R1, 3"]);
    assert_eq!(assemble("let n = 1 - 5;"), vec!["MOV R1, -4"]);
}

#[test]
fn test_binary_print_loads_literals_into_fresh_registers() {
    assert_eq!(
        assemble(r#"let x = 5; print x * 2 - "abc";"#),
        vec![
            "MOV R1, 5",
            "MOV R2, 2",
            "MUL R1, R2",
            "MOV R3, 3",
            "SUB R1, R3",
            "OUT R1",
        ]
    );
}

#[test]
fn test_undeclared_identifier_gets_uninitialized_register() {
    crate::test_utils::init_test_logging();
    // Only reachable when semantic analysis is skipped.
    assert_eq!(
        assemble("print ghost + 1;"),
        vec!["MOV R2, 1", "ADD R1, R2", "OUT R1"]
    );
}

#[test]
fn test_registers_used() {
    let arena = Bump::new();
    let (tokens, _) = tokenize("let a = 1; print 2; print a + 3;");
    let (program, _) = parse(&arena, &tokens);
    let assembly = generate(&arena, program).unwrap();
    assert_eq!(assembly.registers_used, 2);
}

#[test]
fn test_evaluation_modes_differ_for_identifiers() {
    let arena = Bump::new();
    let (tokens, _) = tokenize("let x = 7; print x;");
    let (program, _) = parse(&arena, &tokens);

    let mut generator = Generator::new(&arena);
    generator.statement(&program.statements[0]).unwrap();
    let x = program.statements[1].expression();

    assert_eq!(
        generator.evaluate(x, EvalMode::Fold),
        Ok(Operand::Immediate(IDENTIFIER_PLACEHOLDER))
    );
    assert_eq!(
        generator.evaluate(x, EvalMode::Registers),
        Ok(Operand::Register(Register(1)))
    );
    assert_eq!(generator.instructions().len(), 1);
}

#[test]
fn test_print_mode_follows_expression_shape() {
    let arena = Bump::new();
    let binary = first_expression(&arena, "print 1 + 2;");
    let grouped = first_expression(&arena, "print (1 + 2);");
    let number = first_expression(&arena, "print 3;");

    assert_eq!(EvalMode::for_print(binary), EvalMode::Registers);
    assert_eq!(EvalMode::for_print(grouped), EvalMode::Registers);
    assert_eq!(EvalMode::for_print(number), EvalMode::Fold);
}

#[test]
fn test_folder_on_nested_groups() {
    let arena = Bump::new();
    let expr = first_expression(&arena, "print (2 + 3) * (10 - 4) / 5;");
    assert_eq!(ConstantFolder.fold(expr), Ok(6));
}

#[test]
fn test_malformed_expression_is_a_fault() {
    let arena = Bump::new();
    let (tokens, _) = tokenize("print (1 + 2;");
    let (program, _) = parse(&arena, &tokens);
    let err = generate(&arena, program).unwrap_err();
    assert!(matches!(err, CodegenError::MalformedExpression { .. }));
    assert_eq!(
        err.to_string(),
        "cannot generate code for malformed expression: Missing closing parenthesis"
    );
}
