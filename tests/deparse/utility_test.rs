//! Maintenance, session, transaction and privilege statements.

mod common;

use common::*;
use insta::assert_snapshot;
use pgdeparse::{deparse, DeparseError};
use serde_json::{json, Value};

fn def(name: &str, arg: Value) -> Value {
    json!({"DefElem": {"defname": name, "arg": arg}})
}

#[test]
fn test_vacuum_full() {
    let tree = json!({"VacuumStmt": {
        "options": [{"DefElem": {"defname": "full", "defaction": "DEFELEM_UNSPEC"}}],
        "rels": [{"VacuumRelation": {"relation": {"relname": "users", "inh": true, "relpersistence": "p"}}}],
        "is_vacuumcmd": true
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"VACUUM (FULL) users");
}

#[test]
fn test_grant_select_on_table() {
    let tree = json!({"GrantStmt": {
        "is_grant": true,
        "targtype": "ACL_TARGET_OBJECT",
        "objtype": "OBJECT_TABLE",
        "objects": [{"RangeVar": {"relname": "users", "inh": true, "relpersistence": "p"}}],
        "privileges": [{"AccessPriv": {"priv_name": "select"}}],
        "grantees": [{"RoleSpec": {"roletype": "ROLESPEC_CSTRING", "rolename": "bob"}}],
        "behavior": "DROP_RESTRICT"
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"GRANT SELECT ON TABLE users TO bob");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_role_membership() {
    let tree = json!({"GrantRoleStmt": {
        "granted_roles": [{"AccessPriv": {"priv_name": "app_authenticated"}}],
        "grantee_roles": [{"RoleSpec": {"roletype": "ROLESPEC_CSTRING", "rolename": "app_user"}}],
        "is_grant": true
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"GRANT APP_AUTHENTICATED TO app_user");
}

#[test]
fn test_transaction_block() {
    let tree = json!([
        {"TransactionStmt": {
            "kind": "TRANS_STMT_BEGIN",
            "options": [def("transaction_isolation", text("serializable"))]
        }},
        {"TransactionStmt": {"kind": "TRANS_STMT_SAVEPOINT", "savepoint_name": "before_update"}},
        {"TransactionStmt": {"kind": "TRANS_STMT_ROLLBACK_TO", "savepoint_name": "before_update"}},
        {"TransactionStmt": {"kind": "TRANS_STMT_COMMIT"}}
    ]);
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    BEGIN ISOLATION LEVEL SERIALIZABLE

    SAVEPOINT before_update

    ROLLBACK TO SAVEPOINT before_update

    COMMIT
    ");
}

#[test]
fn test_session_settings() {
    let tree = json!([
        {"VariableSetStmt": {
            "kind": "VAR_SET_VALUE",
            "name": "search_path",
            "args": [text("tenant_42"), text("public")]
        }},
        {"VariableSetStmt": {"kind": "VAR_SET_VALUE", "name": "app.user_id", "args": [int(42)], "is_local": true}},
        {"VariableShowStmt": {"name": "search_path"}},
        {"VariableSetStmt": {"kind": "VAR_RESET_ALL"}}
    ]);
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    SET search_path TO 'tenant_42', 'public'

    SET LOCAL app.user_id TO 42

    SHOW search_path

    RESET ALL
    ");
}

#[test]
fn test_copy_from_stdin() {
    let tree = json!({"CopyStmt": {
        "relation": {"relname": "imports"},
        "is_from": true,
        "options": [
            def("format", json!({"String": {"sval": "csv"}})),
            def("delimiter", json!({"String": {"sval": ";"}}))
        ]
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"COPY imports FROM STDIN WITH (FORMAT 'csv', DELIMITER ';')");
}

#[test]
fn test_explain_analyze() {
    let tree = json!({"ExplainStmt": {
        "query": {"SelectStmt": {"targetList": [target(star())], "fromClause": [table("users")]}},
        "options": [def("analyze", json!({"Boolean": {"boolval": true}}))]
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"EXPLAIN (ANALYZE true) SELECT * FROM users");
}

#[test]
fn test_lock_and_notify() {
    let tree = json!([
        {"LockStmt": {"relations": [table("accounts")], "mode": 8, "nowait": true}},
        {"NotifyStmt": {"conditionname": "jobs", "payload": "ready"}},
        {"UnlistenStmt": {}}
    ]);
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    LOCK TABLE accounts IN ACCESS EXCLUSIVE MODE NOWAIT

    NOTIFY jobs, 'ready'

    UNLISTEN *
    ");
}

#[test]
fn test_unknown_transaction_kind() {
    let tree = json!({"TransactionStmt": {"kind": "TRANS_STMT_PAUSE"}});
    let err = deparse(&tree).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        DeparseError::UnhandledVariant { node: "TransactionStmt", value } if value == "TRANS_STMT_PAUSE"
    ));
}
