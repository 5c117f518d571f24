//! INSERT, UPDATE and DELETE rendered end to end.

mod common;

use common::*;
use insta::assert_snapshot;
use pgdeparse::{deparse, DeparseError};
use serde_json::json;

#[test]
fn test_insert_values() {
    let tree = json!({"InsertStmt": {
        "relation": {"relname": "items", "inh": true, "relpersistence": "p"},
        "cols": [{"ResTarget": {"name": "id"}}, {"ResTarget": {"name": "label"}}],
        "selectStmt": {"SelectStmt": {"valuesLists": [[int(1), text("thing")]]}}
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"INSERT INTO items (id, label) VALUES (1, 'thing')");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_insert_select_with_returning() {
    let tree = json!({"InsertStmt": {
        "relation": {"relname": "archive", "schemaname": "history"},
        "selectStmt": {"SelectStmt": {
            "targetList": [target(star())],
            "fromClause": [table("events")]
        }},
        "returningList": [target(col(&["id"]))]
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"INSERT INTO history.archive SELECT * FROM events RETURNING id");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_upsert() {
    let tree = json!({"InsertStmt": {
        "relation": {"relname": "settings"},
        "cols": [{"ResTarget": {"name": "key"}}, {"ResTarget": {"name": "value"}}],
        "selectStmt": {"SelectStmt": {"valuesLists": [[text("theme"), text("dark")]]}},
        "onConflictClause": {
            "action": "ONCONFLICT_UPDATE",
            "infer": {"indexElems": [{"IndexElem": {"name": "key"}}]},
            "targetList": [{"ResTarget": {"name": "value", "val": col(&["excluded", "value"])}}]
        }
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(
        sql,
        @"INSERT INTO settings (key, value) VALUES ('theme', 'dark') ON CONFLICT (key) DO UPDATE SET value = excluded.value"
    );
}

#[test]
fn test_update_with_where() {
    let tree = json!({"UpdateStmt": {
        "relation": {"relname": "users"},
        "targetList": [
            {"ResTarget": {"name": "name", "val": text("Bob")}},
            {"ResTarget": {"name": "visits", "val": binary("+", col(&["visits"]), int(1))}}
        ],
        "whereClause": binary("=", col(&["id"]), int(7))
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"UPDATE users SET name = 'Bob', visits = visits + 1 WHERE id = 7");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_delete_with_where() {
    let tree = json!({"DeleteStmt": {
        "relation": {"relname": "sessions"},
        "whereClause": {"NullTest": {"arg": col(&["user_id"]), "nulltesttype": "IS_NULL"}}
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"DELETE FROM sessions WHERE user_id IS NULL");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_writing_cte() {
    let moved = json!({"DeleteStmt": {
        "relation": {"relname": "queue"},
        "returningList": [target(star())]
    }});
    let tree = json!({"InsertStmt": {
        "withClause": {"ctes": [{"CommonTableExpr": {"ctename": "moved", "ctequery": moved}}]},
        "relation": {"relname": "done"},
        "selectStmt": {"SelectStmt": {"targetList": [target(star())], "fromClause": [table("moved")]}}
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(
        sql,
        @"WITH moved AS (DELETE FROM queue RETURNING *) INSERT INTO done SELECT * FROM moved"
    );
}

#[test]
fn test_insert_without_relation_is_malformed() {
    let tree = json!({"InsertStmt": {
        "selectStmt": {"SelectStmt": {"valuesLists": [[int(1)]]}}
    }});
    let err = deparse(&tree).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        DeparseError::MalformedPayload { node, .. } if node == "InsertStmt"
    ));
}
