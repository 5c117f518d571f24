//! Schema-changing statements rendered end to end.

mod common;

use common::*;
use insta::assert_snapshot;
use pgdeparse::{deparse, DeparseError};
use serde_json::json;

#[test]
fn test_drop_index_concurrently() {
    let tree = json!({"DropStmt": {
        "objects": [[name("idx_users_name")]],
        "removeType": "OBJECT_INDEX",
        "behavior": "DROP_CASCADE",
        "missing_ok": true,
        "concurrent": true
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"DROP INDEX CONCURRENTLY IF EXISTS idx_users_name CASCADE");
}

#[test]
fn test_create_table_with_table_constraints() {
    let tree = json!({"CreateStmt": {
        "relation": {"relname": "memberships", "schemaname": "app"},
        "tableElts": [
            {"ColumnDef": {"colname": "team_id", "typeName": type_name("int8"), "is_local": true}},
            {"ColumnDef": {"colname": "user_id", "typeName": type_name("int8"), "is_local": true}},
            {"ColumnDef": {
                "colname": "role",
                "typeName": {"names": [name("text")]},
                "constraints": [
                    {"Constraint": {"contype": "CONSTR_NOTNULL"}},
                    {"Constraint": {"contype": "CONSTR_DEFAULT", "raw_expr": text("member")}}
                ]
            }},
            {"ColumnDef": {
                "colname": "joined_at",
                "typeName": type_name("timestamptz"),
                "constraints": [{"Constraint": {
                    "contype": "CONSTR_DEFAULT",
                    "raw_expr": {"FuncCall": {"funcname": [name("now")]}}
                }}]
            }},
            {"Constraint": {
                "contype": "CONSTR_PRIMARY",
                "conname": "memberships_pkey",
                "keys": [name("team_id"), name("user_id")]
            }},
            {"Constraint": {
                "contype": "CONSTR_FOREIGN",
                "fk_attrs": [name("team_id")],
                "pktable": {"relname": "teams", "schemaname": "app"},
                "pk_attrs": [name("id")],
                "fk_del_action": "c"
            }}
        ]
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(
        sql,
        @"CREATE TABLE app.memberships (team_id bigint, user_id bigint, role text NOT NULL DEFAULT 'member', joined_at timestamp with time zone DEFAULT now(), CONSTRAINT memberships_pkey PRIMARY KEY (team_id, user_id), FOREIGN KEY (team_id) REFERENCES app.teams (id) ON DELETE CASCADE)"
    );
}

#[test]
fn test_add_constraint_then_validate() {
    let tree = json!([
        {"AlterTableStmt": {
            "relation": {"relname": "orders"},
            "objtype": "OBJECT_TABLE",
            "cmds": [{"AlterTableCmd": {
                "subtype": "AT_AddConstraint",
                "def": {"Constraint": {
                    "contype": "CONSTR_CHECK",
                    "conname": "positive_total",
                    "raw_expr": binary(">", col(&["total"]), int(0)),
                    "skip_validation": true
                }}
            }}]
        }},
        {"AlterTableStmt": {
            "relation": {"relname": "orders"},
            "objtype": "OBJECT_TABLE",
            "cmds": [{"AlterTableCmd": {"subtype": "AT_ValidateConstraint", "name": "positive_total"}}]
        }}
    ]);
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    ALTER TABLE orders ADD CONSTRAINT positive_total CHECK (total > 0) NOT VALID

    ALTER TABLE orders VALIDATE CONSTRAINT positive_total
    ");
}

#[test]
fn test_row_level_security_setup() {
    let tree = json!({"version": 170004, "stmts": [
        {"stmt": {"AlterTableStmt": {
            "relation": {"relname": "documents"},
            "objtype": "OBJECT_TABLE",
            "cmds": [{"AlterTableCmd": {"subtype": "AT_EnableRowSecurity"}}]
        }}, "stmt_len": 46},
        {"stmt": {"CreatePolicyStmt": {
            "policy_name": "tenant_isolation",
            "table": {"relname": "documents"},
            "cmd_name": "all",
            "permissive": true,
            "roles": [{"RoleSpec": {"roletype": "ROLESPEC_CSTRING", "rolename": "app_user"}}],
            "qual": binary("=", col(&["tenant_id"]), json!({"FuncCall": {
                "funcname": [name("current_setting")],
                "args": [text("app.tenant_id")]
            }}))
        }}, "stmt_location": 47, "stmt_len": 110}
    ]});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    ALTER TABLE documents ENABLE ROW LEVEL SECURITY;

    CREATE POLICY tenant_isolation ON documents TO app_user USING (tenant_id = current_setting('app.tenant_id'));
    ");
}

#[test]
fn test_index_and_view() {
    let tree = json!([
        {"IndexStmt": {
            "idxname": "users_email_key",
            "relation": {"relname": "users"},
            "accessMethod": "btree",
            "indexParams": [{"IndexElem": {"name": "email"}}],
            "unique": true,
            "if_not_exists": true
        }},
        {"ViewStmt": {
            "view": {"relname": "user_emails"},
            "query": {"SelectStmt": {
                "targetList": [target(col(&["id"])), target(col(&["email"]))],
                "fromClause": [table("users")]
            }}
        }}
    ]);
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)

    CREATE VIEW user_emails AS SELECT id, email FROM users
    ");
}

#[test]
fn test_unknown_object_type() {
    let tree = json!({"DropStmt": {"objects": [[name("x")]], "removeType": "OBJECT_GADGET"}});
    let err = deparse(&tree).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        DeparseError::UnhandledVariant { node: "DropStmt", value } if value == "OBJECT_GADGET"
    ));
    assert_eq!(err.breadcrumbs(), vec!["DropStmt"]);
}

#[test]
fn test_unknown_alter_subtype_names_its_path() {
    let tree = json!({"AlterTableStmt": {
        "relation": {"relname": "t"},
        "cmds": [{"AlterTableCmd": {"subtype": "AT_SplitPartitionIntoThree"}}]
    }});
    let err = deparse(&tree).unwrap_err();
    assert_eq!(err.breadcrumbs(), vec!["AlterTableStmt", "AlterTableCmd"]);
    assert_snapshot!(
        err.to_string(),
        @"error deparsing AlterTableStmt: error deparsing AlterTableCmd: unhandled AlterTableCmd variant: AT_SplitPartitionIntoThree"
    );
}

fn function(name_parts: &[&str], args: &[&str]) -> serde_json::Value {
    let objname: Vec<_> = name_parts.iter().map(|p| name(p)).collect();
    let objargs: Vec<_> = args.iter().map(|t| json!({"TypeName": type_name(t)})).collect();
    json!({"ObjectWithArgs": {"objname": objname, "objargs": objargs}})
}

fn role(rolename: &str) -> serde_json::Value {
    json!({"RoleSpec": {"roletype": "ROLESPEC_CSTRING", "rolename": rolename, "location": -1}})
}

#[test]
fn test_generic_alter_batch() {
    let tree = json!({"version": 170004, "stmts": [
        {"stmt": {"RenameStmt": {
            "renameType": "OBJECT_FUNCTION",
            "relationType": "OBJECT_ACCESS_METHOD",
            "object": function(&["alt_func1"], &["int4"]),
            "newname": "alt_func2",
            "behavior": "DROP_RESTRICT"
        }}},
        {"stmt": {"AlterOwnerStmt": {
            "objectType": "OBJECT_FUNCTION",
            "object": function(&["alt_func2"], &["int4"]),
            "newowner": role("regress_alter_generic_user2")
        }}},
        {"stmt": {"AlterObjectSchemaStmt": {
            "objectType": "OBJECT_FUNCTION",
            "object": function(&["alt_func2"], &["int4"]),
            "newschema": "alt_nsp2"
        }}},
        {"stmt": {"RenameStmt": {
            "renameType": "OBJECT_AGGREGATE",
            "relationType": "OBJECT_ACCESS_METHOD",
            "object": function(&["alt_agg1"], &["int4"]),
            "newname": "alt_agg2",
            "behavior": "DROP_RESTRICT"
        }}},
        {"stmt": {"RenameStmt": {
            "renameType": "OBJECT_CONVERSION",
            "relationType": "OBJECT_ACCESS_METHOD",
            "object": {"List": {"items": [name("alt_conv1")]}},
            "newname": "alt_conv2",
            "behavior": "DROP_RESTRICT"
        }}},
        {"stmt": {"AlterOwnerStmt": {
            "objectType": "OBJECT_LANGUAGE",
            "object": name("alt_lang1"),
            "newowner": role("regress_alter_generic_user2")
        }}},
        {"stmt": {"RenameStmt": {
            "renameType": "OBJECT_OPFAMILY",
            "relationType": "OBJECT_ACCESS_METHOD",
            "object": {"List": {"items": [name("hash"), name("alt_opf1")]}},
            "newname": "alt_opf2",
            "behavior": "DROP_RESTRICT"
        }}},
        {"stmt": {"AlterObjectSchemaStmt": {
            "objectType": "OBJECT_TSCONFIGURATION",
            "object": {"List": {"items": [name("alt_ts_conf1")]}},
            "newschema": "alt_nsp2"
        }}}
    ]});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    ALTER FUNCTION alt_func1(int) RENAME TO alt_func2;

    ALTER FUNCTION alt_func2(int) OWNER TO regress_alter_generic_user2;

    ALTER FUNCTION alt_func2(int) SET SCHEMA alt_nsp2;

    ALTER AGGREGATE alt_agg1(int) RENAME TO alt_agg2;

    ALTER CONVERSION alt_conv1 RENAME TO alt_conv2;

    ALTER LANGUAGE alt_lang1 OWNER TO regress_alter_generic_user2;

    ALTER OPERATOR FAMILY alt_opf1 USING hash RENAME TO alt_opf2;

    ALTER TEXT SEARCH CONFIGURATION alt_ts_conf1 SET SCHEMA alt_nsp2;
    ");
}

#[test]
fn test_rename_column_and_table() {
    let tree = json!([
        {"RenameStmt": {
            "renameType": "OBJECT_COLUMN",
            "relationType": "OBJECT_TABLE",
            "relation": table("accounts"),
            "subname": "email",
            "newname": "contact_email",
            "behavior": "DROP_RESTRICT"
        }},
        {"RenameStmt": {
            "renameType": "OBJECT_TABLE",
            "relationType": "OBJECT_ACCESS_METHOD",
            "relation": table("accounts"),
            "newname": "customers",
            "behavior": "DROP_RESTRICT",
            "missing_ok": true
        }}
    ]);
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r"
    ALTER TABLE accounts RENAME COLUMN email TO contact_email

    ALTER TABLE IF EXISTS accounts RENAME TO customers
    ");
    for statement in sql.split("\n\n") {
        validate_sql(statement).unwrap();
    }
}

#[test]
fn test_alter_function_attributes_end_to_end() {
    let tree = json!({"AlterFunctionStmt": {
        "objtype": "OBJECT_FUNCTION",
        "func": function(&["alt_func2"], &["int4"]),
        "actions": [
            {"DefElem": {"defname": "volatility", "arg": name("stable"), "defaction": "DEFELEM_UNSPEC"}},
            {"DefElem": {"defname": "leakproof", "arg": {"Boolean": {"boolval": true}}}},
            {"DefElem": {"defname": "rows", "arg": {"Integer": {"ival": 10}}}}
        ]
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"ALTER FUNCTION alt_func2(int) STABLE LEAKPROOF ROWS 10");
}

#[test]
fn test_owner_change_of_sub_object_fails() {
    let tree = json!({"AlterOwnerStmt": {
        "objectType": "OBJECT_TABCONSTRAINT",
        "object": {"List": {"items": [name("t"), name("c")]}},
        "newowner": role("bob")
    }});
    let err = deparse(&tree).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        DeparseError::UnhandledVariant { node: "AlterOwnerStmt", value } if value == "OBJECT_TABCONSTRAINT"
    ));
    assert_eq!(err.breadcrumbs(), vec!["AlterOwnerStmt"]);
}
