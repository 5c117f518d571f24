//! Properties that make rendered SQL safe to feed back into the parser.
//!
//! These check the halves separately: parser-shaped trees and their
//! canonical forms must render identically, and every identifier must come
//! out in a form the lexer reads back as the same name. The full trip
//! through PostgreSQL's parser lives in `parser_roundtrip_test.rs`.

mod common;

use common::*;
use pgdeparse::ast::canonicalize;
use pgdeparse::sql::{encode_numeric_typmod, is_plain_identifier, quote_identifier};
use pgdeparse::deparse;
use serde_json::{json, Value};

/// A tree as the parser emits it: locations, defaulted enumerators and
/// explicit inheritance flags.
fn parser_shaped() -> Value {
    json!({"version": 170004, "stmts": [{"stmt": {"SelectStmt": {
        "targetList": [{"ResTarget": {
            "val": {"ColumnRef": {"fields": [{"String": {"sval": "email"}}], "location": 7}},
            "location": 7
        }}],
        "fromClause": [{"RangeVar": {
            "relname": "users",
            "inh": true,
            "relpersistence": "p",
            "location": 18
        }}],
        "sortClause": [{"SortBy": {
            "node": {"ColumnRef": {"fields": [{"String": {"sval": "email"}}], "location": 33}},
            "sortby_dir": "SORTBY_DEFAULT",
            "sortby_nulls": "SORTBY_NULLS_DEFAULT",
            "location": -1
        }}],
        "limitOption": "LIMIT_OPTION_DEFAULT",
        "op": "SETOP_NONE"
    }}, "stmt_location": 0}]})
}

/// The same statement written by hand with nothing but the essentials.
fn minimal() -> Value {
    json!({"version": 170004, "stmts": [{"stmt": {"SelectStmt": {
        "targetList": [target(col(&["email"]))],
        "fromClause": [{"RangeVar": {"relname": "users"}}],
        "sortClause": [{"SortBy": {"node": col(&["email"])}}],
        "limitOption": "LIMIT_OPTION_DEFAULT",
        "op": "SETOP_NONE"
    }}}]})
}

#[test]
fn test_canonical_forms_match() {
    assert_eq!(canonicalize(&parser_shaped()), canonicalize(&minimal()));
}

#[test]
fn test_canonical_form_renders_the_same() {
    let sql = deparse(&parser_shaped()).unwrap();
    assert_eq!(sql, "SELECT email FROM users ORDER BY email");
    assert_eq!(deparse(&canonicalize(&parser_shaped())).unwrap(), sql);
    assert_eq!(deparse(&minimal()).unwrap(), sql);
    validate_sql(&sql).unwrap();
}

#[test]
fn test_legacy_string_spelling_renders_the_same() {
    let legacy = json!({"SelectStmt": {
        "targetList": [{"ResTarget": {"val": {"ColumnRef": {"fields": [{"String": {"str": "email"}}]}}}}],
        "fromClause": [table("users")]
    }});
    let current = json!({"SelectStmt": {
        "targetList": [target(col(&["email"]))],
        "fromClause": [table("users")]
    }});
    assert_eq!(canonicalize(&legacy), canonicalize(&current));
    assert_eq!(deparse(&legacy).unwrap(), deparse(&current).unwrap());
}

#[test]
fn test_identifiers_read_back_unchanged() {
    let names = [
        "users", "Users", "user name", "_tmp", "9lives", "ÄÖ", "say\"hi\"", "a.b",
    ];
    for name in names {
        let rendered = deparse(&json!({"SelectStmt": {
            "targetList": [target(col(&[name]))]
        }}))
        .unwrap();
        let ident = rendered.strip_prefix("SELECT ").unwrap();
        assert_eq!(ident, quote_identifier(name));

        // Plain names must already be in folded form; everything else is
        // delimited with inner quotes doubled.
        if is_plain_identifier(name) {
            assert_eq!(ident, name);
            assert_eq!(ident, ident.to_lowercase());
        } else {
            let inner = &ident[1..ident.len() - 1];
            assert!(ident.starts_with('"') && ident.ends_with('"'));
            assert_eq!(inner.replace("\"\"", "\""), name);
        }
    }
}

#[test]
fn test_string_literals_read_back_unchanged() {
    for value in ["", "plain", "O'Brien", "''", "line\nbreak", "back\\slash"] {
        let rendered = deparse(&json!({"SelectStmt": {"targetList": [target(text(value))]}})).unwrap();
        let literal = rendered.strip_prefix("SELECT ").unwrap();
        assert!(literal.starts_with('\'') && literal.ends_with('\''));
        assert_eq!(literal[1..literal.len() - 1].replace("''", "'"), value);
    }
}

#[test]
fn test_packed_numeric_modifier_renders_source_spelling() {
    let cases = [((10, 2), "numeric(10,2)"), ((38, 10), "numeric(38,10)"), ((5, 0), "numeric(5)")];
    for ((precision, scale), spelling) in cases {
        let cast = json!({"TypeCast": {
            "arg": col(&["amount"]),
            "typeName": {
                "names": [name("pg_catalog"), name("numeric")],
                "typemod": encode_numeric_typmod(precision, scale)
            }
        }});
        let sql = deparse(&json!({"SelectStmt": {"targetList": [target(cast)]}})).unwrap();
        assert_eq!(sql, format!("SELECT amount::{spelling}"));
    }
}
