//! Rendered SQL fed back through the PostgreSQL parser.
//!
//! Each case pairs a parse tree with SQL that PostgreSQL reads as the same
//! tree. The rendered text and the source text are both parsed with
//! `pg_query` and deparsed by libpg_query, so any difference between the two
//! trees (locations aside) shows up as a difference in the canonical text.

mod common;

use common::*;
use pgdeparse::deparse;
use serde_json::{json, Value};

/// SQL as libpg_query writes it back after parsing.
fn canonical(sql: &str) -> String {
    let parsed = pg_query::parse(sql).unwrap_or_else(|e| panic!("{e}\nSQL: {sql}"));
    pg_query::deparse(&parsed.protobuf).unwrap_or_else(|e| panic!("{e}\nSQL: {sql}"))
}

fn assert_round_trip(tree: Value, source: &str) {
    let rendered = deparse(&tree).unwrap_or_else(|e| panic!("{e}\nsource: {source}"));
    assert_eq!(
        canonical(&rendered),
        canonical(source),
        "rendered `{rendered}` does not re-parse to the tree of `{source}`"
    );
}

fn role(rolename: &str) -> Value {
    json!({"RoleSpec": {"roletype": "ROLESPEC_CSTRING", "rolename": rolename}})
}

fn def(name: &str, arg: Value) -> Value {
    json!({"DefElem": {"defname": name, "arg": arg}})
}

fn integer(n: i64) -> Value {
    json!({"Integer": {"ival": n}})
}

fn function(name_parts: &[&str], args: &[&str]) -> Value {
    let objname: Vec<_> = name_parts.iter().map(|p| name(p)).collect();
    let objargs: Vec<_> = args.iter().map(|t| json!({"TypeName": type_name(t)})).collect();
    json!({"ObjectWithArgs": {"objname": objname, "objargs": objargs}})
}

#[test]
fn test_select() {
    let tree = json!({"version": 170004, "stmts": [{"stmt": {"SelectStmt": {
        "targetList": [
            {"ResTarget": {"val": col(&["id"]), "location": 7}},
            {"ResTarget": {"val": col(&["email"]), "location": 11}}
        ],
        "fromClause": [{"RangeVar": {"relname": "users", "inh": true, "relpersistence": "p", "location": 22}}],
        "whereClause": binary("=", col(&["id"]), int(1)),
        "sortClause": [{"SortBy": {
            "node": col(&["email"]),
            "sortby_dir": "SORTBY_DESC",
            "sortby_nulls": "SORTBY_NULLS_DEFAULT",
            "location": -1
        }}],
        "limitCount": int(10),
        "limitOption": "LIMIT_OPTION_COUNT",
        "op": "SETOP_NONE"
    }}, "stmt_location": 0}]});
    assert_round_trip(
        tree,
        "select id, email from users where (id = 1) order by email desc limit 10",
    );
}

#[test]
fn test_select_with_join_and_grouping() {
    let tree = json!({"SelectStmt": {
        "targetList": [
            target(col(&["u", "id"])),
            target(json!({"FuncCall": {"funcname": [name("count")], "agg_star": true}}))
        ],
        "fromClause": [{"JoinExpr": {
            "jointype": "JOIN_LEFT",
            "larg": {"RangeVar": {"relname": "users", "inh": true, "relpersistence": "p", "alias": {"aliasname": "u"}}},
            "rarg": {"RangeVar": {"relname": "orders", "inh": true, "relpersistence": "p", "alias": {"aliasname": "o"}}},
            "quals": binary("=", col(&["o", "user_id"]), col(&["u", "id"]))
        }}],
        "groupClause": [col(&["u", "id"])],
        "limitOption": "LIMIT_OPTION_DEFAULT",
        "op": "SETOP_NONE"
    }});
    assert_round_trip(
        tree,
        "SELECT u.id, count(*) FROM users AS u LEFT JOIN orders o ON o.user_id = u.id GROUP BY u.id",
    );
}

#[test]
fn test_insert_update_delete() {
    assert_round_trip(
        json!({"InsertStmt": {
            "relation": table("items"),
            "cols": [{"ResTarget": {"name": "id"}}, {"ResTarget": {"name": "label"}}],
            "selectStmt": {"SelectStmt": {"valuesLists": [[int(1), text("thing")]]}},
            "returningList": [target(col(&["id"]))]
        }}),
        "insert into items (id, label) values (1, 'thing') returning id",
    );
    assert_round_trip(
        json!({"UpdateStmt": {
            "relation": table("users"),
            "targetList": [
                {"ResTarget": {"name": "name", "val": text("Bob")}},
                {"ResTarget": {"name": "visits", "val": binary("+", col(&["visits"]), int(1))}}
            ],
            "whereClause": binary("=", col(&["id"]), int(7))
        }}),
        "UPDATE users SET name = 'Bob', visits = (visits + 1) WHERE id = 7",
    );
    assert_round_trip(
        json!({"DeleteStmt": {
            "relation": table("sessions"),
            "whereClause": {"NullTest": {"arg": col(&["user_id"]), "nulltesttype": "IS_NULL"}}
        }}),
        "DELETE FROM sessions WHERE user_id IS NULL",
    );
}

#[test]
fn test_create_table_and_index() {
    assert_round_trip(
        json!({"CreateStmt": {
            "relation": {"relname": "memberships", "schemaname": "app", "inh": true, "relpersistence": "p"},
            "tableElts": [
                {"ColumnDef": {"colname": "team_id", "typeName": type_name("int8"), "is_local": true}},
                {"ColumnDef": {
                    "colname": "role",
                    "typeName": {"names": [name("text")]},
                    "is_local": true,
                    "constraints": [
                        {"Constraint": {"contype": "CONSTR_NOTNULL"}},
                        {"Constraint": {"contype": "CONSTR_DEFAULT", "raw_expr": text("member")}}
                    ]
                }},
                {"Constraint": {
                    "contype": "CONSTR_PRIMARY",
                    "conname": "memberships_pkey",
                    "keys": [name("team_id")]
                }}
            ],
            "oncommit": "ONCOMMIT_NOOP"
        }}),
        "create table app.memberships (team_id bigint, role text not null default 'member', \
         constraint memberships_pkey primary key (team_id))",
    );
    assert_round_trip(
        json!({"IndexStmt": {
            "idxname": "users_email_key",
            "relation": table("users"),
            "accessMethod": "btree",
            "indexParams": [{"IndexElem": {"name": "email"}}],
            "unique": true,
            "if_not_exists": true
        }}),
        "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users USING btree (email)",
    );
}

#[test]
fn test_grant_and_policy() {
    assert_round_trip(
        json!({"GrantStmt": {
            "is_grant": true,
            "targtype": "ACL_TARGET_OBJECT",
            "objtype": "OBJECT_TABLE",
            "objects": [table("users")],
            "privileges": [{"AccessPriv": {"priv_name": "select"}}],
            "grantees": [role("bob")],
            "behavior": "DROP_RESTRICT"
        }}),
        "grant select on users to bob",
    );
    let tree = json!({"version": 170004, "stmts": [
        {"stmt": {"AlterTableStmt": {
            "relation": table("documents"),
            "objtype": "OBJECT_TABLE",
            "cmds": [{"AlterTableCmd": {"subtype": "AT_EnableRowSecurity", "behavior": "DROP_RESTRICT"}}]
        }}, "stmt_len": 46},
        {"stmt": {"CreatePolicyStmt": {
            "policy_name": "tenant_isolation",
            "table": table("documents"),
            "cmd_name": "all",
            "permissive": true,
            "roles": [role("app_user")],
            "qual": binary("=", col(&["tenant_id"]), json!({"FuncCall": {
                "funcname": [name("current_setting")],
                "args": [text("app.tenant_id")]
            }}))
        }}, "stmt_location": 47, "stmt_len": 110}
    ]});
    assert_round_trip(
        tree,
        "ALTER TABLE documents ENABLE ROW LEVEL SECURITY; \
         CREATE POLICY tenant_isolation ON documents FOR ALL TO app_user \
         USING (tenant_id = current_setting('app.tenant_id'))",
    );
}

#[test]
fn test_sequences() {
    assert_round_trip(
        json!({"CreateSeqStmt": {
            "sequence": table("order_seq"),
            "options": [
                def("as", json!({"TypeName": type_name("int8")})),
                def("increment", integer(5)),
                def("start", integer(100)),
                {"DefElem": {"defname": "minvalue"}},
                def("cache", integer(10)),
                def("cycle", json!({"Boolean": {"boolval": false}})),
                def("owned_by", json!({"List": {"items": [name("orders"), name("id")]}}))
            ],
            "if_not_exists": true
        }}),
        "create sequence if not exists order_seq as bigint increment 5 start 100 \
         no minvalue cache 10 no cycle owned by orders.id",
    );
    assert_round_trip(
        json!({"AlterSeqStmt": {
            "sequence": table("order_seq"),
            "options": [def("restart", integer(1)), def("maxvalue", integer(1000))],
            "missing_ok": true
        }}),
        "ALTER SEQUENCE IF EXISTS order_seq RESTART 1 MAXVALUE 1000",
    );
}

#[test]
fn test_transaction_and_settings() {
    assert_round_trip(
        json!({"TransactionStmt": {
            "kind": "TRANS_STMT_BEGIN",
            "options": [def("transaction_isolation", text("serializable"))]
        }}),
        "BEGIN ISOLATION LEVEL SERIALIZABLE",
    );
    assert_round_trip(
        json!({"TransactionStmt": {"kind": "TRANS_STMT_SAVEPOINT", "savepoint_name": "before_update"}}),
        "SAVEPOINT before_update",
    );
    assert_round_trip(
        json!({"TransactionStmt": {"kind": "TRANS_STMT_ROLLBACK_TO", "savepoint_name": "before_update"}}),
        "rollback to before_update",
    );
    assert_round_trip(json!({"TransactionStmt": {"kind": "TRANS_STMT_COMMIT"}}), "commit");
    assert_round_trip(
        json!({"VariableSetStmt": {
            "kind": "VAR_SET_VALUE",
            "name": "search_path",
            "args": [text("tenant_42"), text("public")]
        }}),
        "SET search_path = tenant_42, public",
    );
    assert_round_trip(
        json!({"VariableSetStmt": {
            "kind": "VAR_SET_VALUE",
            "name": "statement_timeout",
            "args": [int(5000)],
            "is_local": true
        }}),
        "SET LOCAL statement_timeout TO 5000",
    );
}

#[test]
fn test_generic_alter_statements() {
    assert_round_trip(
        json!({"RenameStmt": {
            "renameType": "OBJECT_FUNCTION",
            "relationType": "OBJECT_ACCESS_METHOD",
            "object": function(&["alt_func1"], &["int4"]),
            "newname": "alt_func2",
            "behavior": "DROP_RESTRICT"
        }}),
        "ALTER FUNCTION alt_func1(integer) RENAME TO alt_func2",
    );
    assert_round_trip(
        json!({"RenameStmt": {
            "renameType": "OBJECT_COLUMN",
            "relationType": "OBJECT_TABLE",
            "relation": table("accounts"),
            "subname": "email",
            "newname": "contact_email",
            "behavior": "DROP_RESTRICT"
        }}),
        "alter table accounts rename email to contact_email",
    );
    assert_round_trip(
        json!({"RenameStmt": {
            "renameType": "OBJECT_OPFAMILY",
            "relationType": "OBJECT_ACCESS_METHOD",
            "object": {"List": {"items": [name("hash"), name("alt_opf1")]}},
            "newname": "alt_opf2",
            "behavior": "DROP_RESTRICT"
        }}),
        "ALTER OPERATOR FAMILY alt_opf1 USING hash RENAME TO alt_opf2",
    );
    assert_round_trip(
        json!({"AlterOwnerStmt": {
            "objectType": "OBJECT_SCHEMA",
            "object": name("alt_nsp1"),
            "newowner": role("regress_alter_generic_user2")
        }}),
        "ALTER SCHEMA alt_nsp1 OWNER TO regress_alter_generic_user2",
    );
    assert_round_trip(
        json!({"AlterObjectSchemaStmt": {
            "objectType": "OBJECT_TABLE",
            "relation": table("events"),
            "newschema": "archive",
            "missing_ok": true
        }}),
        "ALTER TABLE IF EXISTS events SET SCHEMA archive",
    );
    assert_round_trip(
        json!({"AlterFunctionStmt": {
            "objtype": "OBJECT_FUNCTION",
            "func": function(&["alt_func2"], &["int4"]),
            "actions": [
                def("volatility", name("immutable")),
                def("strict", json!({"Boolean": {"boolval": true}})),
                def("cost", integer(5))
            ]
        }}),
        "ALTER FUNCTION alt_func2(int) IMMUTABLE RETURNS NULL ON NULL INPUT COST 5",
    );
}
