//! Fixture builders shared by the deparse integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Validates that a SQL string parses under the PostgreSQL dialect.
pub fn validate_sql(sql: &str) -> Result<(), String> {
    Parser::parse_sql(&PostgreSqlDialect {}, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL: {}\nSQL: {}", e, sql))
}

pub fn name(s: &str) -> Value {
    json!({"String": {"sval": s}})
}

pub fn col(parts: &[&str]) -> Value {
    let fields: Vec<Value> = parts.iter().map(|p| name(p)).collect();
    json!({"ColumnRef": {"fields": fields}})
}

pub fn star() -> Value {
    json!({"ColumnRef": {"fields": [{"A_Star": {}}]}})
}

pub fn int(n: i64) -> Value {
    json!({"A_Const": {"ival": {"ival": n}}})
}

pub fn text(s: &str) -> Value {
    json!({"A_Const": {"sval": {"sval": s}}})
}

pub fn target(val: Value) -> Value {
    json!({"ResTarget": {"val": val}})
}

pub fn table(relname: &str) -> Value {
    json!({"RangeVar": {"relname": relname, "inh": true, "relpersistence": "p"}})
}

pub fn binary(op: &str, left: Value, right: Value) -> Value {
    json!({"A_Expr": {"kind": "AEXPR_OP", "name": [name(op)], "lexpr": left, "rexpr": right}})
}

pub fn type_name(t: &str) -> Value {
    json!({"names": [name("pg_catalog"), name(t)]})
}
