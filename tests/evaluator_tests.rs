// tests/evaluator_tests.rs

use hcl_read::{EvalError, EvaluationFailure, TypedValue, evaluate};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

fn eval(expr: &str) -> Result<TypedValue, EvalError> {
    evaluate(&format!("v = {}\n", expr), "v", false)
}

fn value(expr: &str) -> TypedValue {
    eval(expr).unwrap()
}

fn failure(expr: &str) -> EvaluationFailure {
    match eval(expr) {
        Err(EvalError::Evaluation { failure, .. }) => failure,
        other => panic!("Expected evaluation failure for {}, got {:?}", expr, other),
    }
}

fn num(text: &str) -> TypedValue {
    TypedValue::Number(Decimal::from_str(text).unwrap())
}

fn string(s: &str) -> TypedValue {
    TypedValue::String(s.to_string())
}

fn object(pairs: Vec<(&str, TypedValue)>) -> TypedValue {
    TypedValue::Object(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(value("null"), TypedValue::Null);
    assert_eq!(value("true"), TypedValue::Bool(true));
    assert_eq!(value("3.14"), num("3.14"));
    assert_eq!(value("\"n1-standard-4\""), string("n1-standard-4"));
}

#[test]
fn test_number_precision_is_kept() {
    assert_eq!(value("0.1 + 0.2"), num("0.3"));
}

#[test]
fn test_numbers_outside_decimal_range() {
    assert_eq!(value("1e30"), TypedValue::RawNumber("1e30".to_string()));
    assert_eq!(value("-1e-30"), TypedValue::RawNumber("-1e-30".to_string()));
    assert_eq!(
        value("123456789012345678901234567890"),
        TypedValue::RawNumber("123456789012345678901234567890".to_string())
    );
    assert_eq!(value("\"n=${1e30}\""), string("n=1e30"));
}

#[test]
fn test_arithmetic_on_out_of_range_number_fails() {
    assert_eq!(
        failure("1e30 * 2"),
        EvaluationFailure::NumberOutOfRange("1e30".to_string(), "*".to_string())
    );
    assert_eq!(
        evaluate("v = 1e30 * 2\n", "v", true).unwrap(),
        string("1e30 * 2")
    );
}

#[test]
fn test_heredoc() {
    let source = "v = <<-EOT\n    line one\n    line two\n  EOT\n";
    assert_eq!(
        evaluate(source, "v", false).unwrap(),
        string("line one\nline two\n")
    );
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_keyword_object_keys() {
    assert_eq!(
        value("{ null = 1, true = 2 }"),
        object(vec![("null", num("1")), ("true", num("2"))])
    );
}

#[test]
fn test_tuple_and_object() {
    assert_eq!(
        value("[\"a\", 1, false]"),
        TypedValue::List(vec![string("a"), num("1"), TypedValue::Bool(false)])
    );
    assert_eq!(
        value("{ env = \"prod\", \"tier\" = 2 }"),
        object(vec![("env", string("prod")), ("tier", num("2"))])
    );
}

#[test]
fn test_index_and_attribute_access() {
    assert_eq!(value("[10, 20, 30][1]"), num("20"));
    assert_eq!(value("[10, 20, 30].2"), num("30"));
    assert_eq!(value("{ a = { b = \"deep\" } }.a.b"), string("deep"));
    assert_eq!(value("{ a = 1 }[\"a\"]"), num("1"));
}

#[test]
fn test_splat() {
    assert_eq!(
        value("[{ name = \"a\" }, { name = \"b\" }][*].name"),
        TypedValue::List(vec![string("a"), string("b")])
    );
    assert_eq!(value("null[*]"), TypedValue::List(vec![]));
}

#[test]
fn test_for_expressions() {
    assert_eq!(
        value("[for n in [1, 2, 3] : n * 2 if n != 2]"),
        TypedValue::List(vec![num("2"), num("6")])
    );
    assert_eq!(
        value("{for i, s in [\"a\", \"b\"] : s => i}"),
        object(vec![("a", num("0")), ("b", num("1"))])
    );
    assert_eq!(
        value("{for s in [\"x\", \"y\", \"x\"] : s => s...}"),
        object(vec![
            ("x", TypedValue::List(vec![string("x"), string("x")])),
            ("y", TypedValue::List(vec![string("y")])),
        ])
    );
}

#[test]
fn test_for_duplicate_key() {
    assert_eq!(
        failure("{for s in [\"x\", \"x\"] : s => s}"),
        EvaluationFailure::DuplicateKey("x".to_string())
    );
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_arithmetic_and_logic() {
    assert_eq!(value("2 + 3 * 4"), num("14"));
    assert_eq!(value("-(7 % 4)"), num("-3"));
    assert_eq!(value("1 < 2 && !false"), TypedValue::Bool(true));
    assert_eq!(value("\"5\" + 1"), num("6"));
    assert_eq!(value("3 > 2 ? \"yes\" : \"no\""), string("yes"));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(failure("1 / 0"), EvaluationFailure::DivisionByZero);
}

#[test]
fn test_type_errors() {
    assert!(matches!(failure("true + 1"), EvaluationFailure::TypeError(_)));
    assert!(matches!(failure("[1][5]"), EvaluationFailure::AccessError(_)));
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_interpolation() {
    assert_eq!(value("\"pool-${1 + 1}\""), string("pool-2"));
    assert_eq!(value("\"$${literal}\""), string("${literal}"));
}

#[test]
fn test_lone_interpolation_keeps_type() {
    assert_eq!(
        value("\"${[1, 2]}\""),
        TypedValue::List(vec![num("1"), num("2")])
    );
}

#[test]
fn test_strip_markers() {
    assert_eq!(value("\"a   ${~ \"b\" ~}   c\""), string("abc"));
}

#[test]
fn test_if_directive() {
    assert_eq!(value("\"%{ if 1 < 2 }yes%{ else }no%{ endif }\""), string("yes"));
    assert_eq!(value("\"[%{ if false }x%{ endif }]\""), string("[]"));
}

#[test]
fn test_for_directive() {
    assert_eq!(
        value("\"%{ for s in [\"a\", \"b\"] }${s};%{ endfor }\""),
        string("a;b;")
    );
    assert_eq!(
        value("\"%{ for k, v in { a = 1, b = 2 } }${k}=${v} %{ endfor }\""),
        string("a=1 b=2 ")
    );
}

#[test]
fn test_directives_in_heredoc() {
    let source = "v = <<EOT\n%{ for z in [\"a\", \"b\"] ~}\nzone ${z}\n%{ endfor ~}\nEOT\n";
    assert_eq!(
        evaluate(source, "v", false).unwrap(),
        string("zone a\nzone b\n")
    );
}

#[test]
fn test_directive_with_variable_falls_back() {
    let source = "v = \"%{ if var.on }x%{ endif }\"\n";
    assert!(matches!(
        evaluate(source, "v", false),
        Err(EvalError::Evaluation {
            failure: EvaluationFailure::UnknownVariable(_),
            ..
        })
    ));
    assert_eq!(
        evaluate(source, "v", true).unwrap(),
        string("\"%{ if var.on }x%{ endif }\"")
    );
}

// ============================================================================
// Context-free evaluation and fallback
// ============================================================================

#[test]
fn test_variables_and_functions_fail() {
    assert_eq!(
        failure("var.region"),
        EvaluationFailure::UnknownVariable("var".to_string())
    );
    assert_eq!(
        failure("upper(\"a\")"),
        EvaluationFailure::FunctionCall("upper".to_string())
    );
}

#[test]
fn test_fallback_returns_exact_expression_source() {
    let source = "v = merge(\n  local.a,\n  local.b,\n)\n";
    assert_eq!(
        evaluate(source, "v", true).unwrap(),
        string("merge(\n  local.a,\n  local.b,\n)")
    );
}

#[test]
fn test_fallback_leaves_valid_values_alone() {
    assert_eq!(evaluate("v = 5\n", "v", true).unwrap(), num("5"));
}

#[test]
fn test_syntax_failure_ignores_fallback() {
    for fallback in [true, false] {
        assert!(matches!(
            evaluate("v = [1, \n", "v", fallback),
            Err(EvalError::Syntax(_))
        ));
    }
}

#[test]
fn test_attribute_not_found() {
    assert_eq!(
        evaluate("v = 1\n", "w", false),
        Err(EvalError::AttributeNotFound("w".to_string()))
    );
}
