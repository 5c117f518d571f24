//! Input shapes, options and failure modes of the top-level entry points.

mod common;

use common::*;
use insta::assert_snapshot;
use pgdeparse::{deparse, deparse_str, deparse_with, DeparseError, DeparseOptions, Deparser};
use serde_json::{json, Value};

fn select_one() -> Value {
    json!({"SelectStmt": {"targetList": [target(int(1))]}})
}

fn users_query() -> Value {
    json!({"SelectStmt": {
        "targetList": [target(col(&["id"])), target(col(&["name"]))],
        "fromClause": [table("users")],
        "whereClause": col(&["active"])
    }})
}

fn nested_not(levels: usize) -> Value {
    let mut expr = col(&["flag"]);
    for _ in 0..levels {
        expr = json!({"BoolExpr": {"boolop": "NOT_EXPR", "args": [expr]}});
    }
    json!({"SelectStmt": {"targetList": [target(expr)]}})
}

#[test]
fn test_json_text_input() {
    let text = r#"{"SelectStmt": {"targetList": [{"ResTarget": {"val": {"A_Const": {"ival": {"ival": 1}}}}}]}}"#;
    assert_eq!(deparse_str(text).unwrap(), "SELECT 1");
}

#[test]
fn test_invalid_json_text() {
    let err = deparse_str("{\"SelectStmt\": ").unwrap_err();
    assert!(matches!(err, DeparseError::InvalidJson(_)));
}

#[test]
fn test_version_envelope() {
    let tree = json!({
        "version": 170004,
        "stmts": [
            {"stmt": select_one(), "stmt_len": 8},
            {"stmt": users_query(), "stmt_location": 9}
        ]
    });
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    SELECT 1;

    SELECT id, name FROM users WHERE active
    ");
}

#[test]
fn test_empty_envelope() {
    assert_eq!(deparse(&json!({"version": 170004, "stmts": []})).unwrap(), "");
}

#[test]
fn test_tagged_raw_stmt() {
    let tree = json!({"RawStmt": {"stmt": select_one(), "stmt_len": 8}});
    assert_eq!(deparse(&tree).unwrap(), "SELECT 1;");
}

#[test]
fn test_statement_array() {
    let sql = deparse(&json!([select_one(), users_query()])).unwrap();
    assert_eq!(sql, "SELECT 1\n\nSELECT id, name FROM users WHERE active");
}

#[test]
fn test_pretty_layout_from_toml() {
    let options = DeparseOptions::from_toml_str(
        r#"
pretty = true
tab = "    "
"#,
    )
    .unwrap();
    let sql = deparse_with(&users_query(), &options).unwrap();
    assert_snapshot!(sql, @r"
    SELECT
        id, name
    FROM
        users
    WHERE
        active
    ");
}

#[test]
fn test_layout_never_changes_tokens() {
    let compact = deparse(&users_query()).unwrap();
    let pretty = deparse_with(&users_query(), &DeparseOptions::pretty()).unwrap();
    let words = |s: &str| s.split_whitespace().map(str::to_string).collect::<Vec<_>>();
    assert_eq!(words(&compact), words(&pretty));
}

#[test]
fn test_custom_statement_separator() {
    let options = DeparseOptions::default().with_newline("\r\n");
    let sql = deparse_with(&json!([select_one(), select_one()]), &options).unwrap();
    assert_eq!(sql, "SELECT 1\r\n\r\nSELECT 1");
}

#[test]
fn test_depth_limit() {
    let err = deparse(&nested_not(300)).unwrap_err();
    assert!(matches!(err, DeparseError::DepthLimitExceeded { limit: 256 }));

    let options = DeparseOptions::default().with_max_depth(512);
    let sql = deparse_with(&nested_not(300), &options).unwrap();
    assert!(sql.ends_with("NOT flag"));
}

#[test]
fn test_default_depth_on_small_thread() {
    let sql = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| deparse(&nested_not(250)))
        .unwrap()
        .join()
        .unwrap()
        .unwrap();
    assert!(sql.starts_with("SELECT NOT NOT"));
    assert!(sql.ends_with("NOT flag"));
}

#[test]
fn test_depth_limit_on_small_thread() {
    let err = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| deparse(&nested_not(2000)))
        .unwrap()
        .join()
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, DeparseError::DepthLimitExceeded { limit: 256 }));
}

fn sum_chain(terms: usize) -> Value {
    let mut expr = col(&["c0"]);
    for i in 1..terms {
        expr = binary("+", expr, col(&[&format!("c{i}")]));
    }
    json!({"SelectStmt": {"targetList": [target(expr)]}})
}

#[test]
fn test_text_and_value_inputs_agree_on_deep_trees() {
    let tree = sum_chain(70);
    let from_value = deparse(&tree).unwrap();
    let from_text = deparse_str(&tree.to_string()).unwrap();
    assert_eq!(from_value, from_text);
    let opening = format!("SELECT {}c0 + c1) + c2)", "(".repeat(68));
    assert!(from_value.starts_with(&opening));
    assert!(from_value.ends_with(") + c69"));
}

#[test]
fn test_deep_text_hits_depth_limit() {
    let err = deparse_str(&nested_not(300).to_string()).unwrap_err();
    assert!(matches!(err, DeparseError::DepthLimitExceeded { limit: 256 }));
}

#[test]
fn test_unknown_node_kind() {
    let err = deparse(&json!({"XmlSerialize": {}})).unwrap_err();
    assert!(matches!(
        err,
        DeparseError::UnhandledNodeKind { ref kind } if kind == "XmlSerialize"
    ));
}

#[test]
fn test_breadcrumbs_to_failure() {
    let tree = json!({"SelectStmt": {
        "targetList": [target(int(1))],
        "fromClause": [table("t")],
        "whereClause": {"BoolExpr": {"boolop": "AND_EXPR", "args": [
            col(&["a"]),
            {"NullTest": {"arg": col(&["b"]), "nulltesttype": "IS_SOMETIMES_NULL"}}
        ]}}
    }});
    let err = deparse(&tree).unwrap_err();
    assert_eq!(err.breadcrumbs(), vec!["SelectStmt", "BoolExpr", "NullTest"]);
    assert!(matches!(
        err.root_cause(),
        DeparseError::UnhandledVariant { node: "NullTest", value } if value == "IS_SOMETIMES_NULL"
    ));
}

#[test]
fn test_shared_deparser_across_threads() {
    let deparser = Deparser::default();
    let inputs = vec![select_one(), users_query(), json!([select_one(), select_one()])];
    let expected: Vec<String> = inputs
        .iter()
        .map(|input| deparser.deparse_value(input).unwrap())
        .collect();

    let shared = &deparser;
    let rendered: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || shared.deparse_value(input).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(rendered, expected);
}
