//! End-to-end rendering of queries through the public entry points.

mod common;

use common::*;
use insta::assert_snapshot;
use pgdeparse::deparse;
use serde_json::json;

#[test]
fn test_select_constant() {
    let tree = json!({"SelectStmt": {"targetList": [target(int(1))]}});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"SELECT 1");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_select_star_with_string_filter() {
    let tree = json!({"SelectStmt": {
        "targetList": [target(star())],
        "fromClause": [table("users")],
        "whereClause": binary("=", col(&["name"]), text("Alice"))
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"SELECT * FROM users WHERE name = 'Alice'");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_join_with_aliases_and_ordering() {
    let tree = json!({"SelectStmt": {
        "targetList": [
            target(col(&["u", "name"])),
            {"ResTarget": {"name": "order_count", "val": {"FuncCall": {
                "funcname": [name("count")],
                "args": [col(&["o", "id"])]
            }}}}
        ],
        "fromClause": [{"JoinExpr": {
            "jointype": "JOIN_LEFT",
            "larg": {"RangeVar": {"relname": "users", "inh": true, "alias": {"aliasname": "u"}}},
            "rarg": {"RangeVar": {"relname": "orders", "inh": true, "alias": {"aliasname": "o"}}},
            "quals": binary("=", col(&["o", "user_id"]), col(&["u", "id"]))
        }}],
        "groupClause": [col(&["u", "name"])],
        "sortClause": [{"SortBy": {
            "node": col(&["order_count"]),
            "sortby_dir": "SORTBY_DESC",
            "sortby_nulls": "SORTBY_NULLS_DEFAULT"
        }}],
        "limitCount": int(10),
        "limitOption": "LIMIT_OPTION_COUNT"
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(
        sql,
        @"SELECT u.name, count(o.id) AS order_count FROM users AS u LEFT JOIN orders AS o ON o.user_id = u.id GROUP BY u.name ORDER BY order_count DESC LIMIT 10"
    );
    validate_sql(&sql).unwrap();
}

#[test]
fn test_common_table_expression() {
    let recent = json!({"SelectStmt": {
        "targetList": [target(col(&["id"]))],
        "fromClause": [table("events")],
        "whereClause": binary(">", col(&["id"]), int(100))
    }});
    let tree = json!({"SelectStmt": {
        "withClause": {"ctes": [{"CommonTableExpr": {"ctename": "recent", "ctequery": recent}}]},
        "targetList": [target(col(&["id"]))],
        "fromClause": [table("recent")]
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(
        sql,
        @"WITH recent AS (SELECT id FROM events WHERE id > 100) SELECT id FROM recent"
    );
    validate_sql(&sql).unwrap();
}

#[test]
fn test_union_all_of_selects() {
    let arm = |relname: &str| {
        json!({"SelectStmt": {"targetList": [target(col(&["id"]))], "fromClause": [table(relname)]}})
    };
    let tree = json!({"SelectStmt": {
        "op": "SETOP_UNION",
        "all": true,
        "larg": arm("staff"),
        "rarg": arm("contractors")
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"SELECT id FROM staff UNION ALL SELECT id FROM contractors");
    validate_sql(&sql).unwrap();
}

#[test]
fn test_subquery_in_from_and_where() {
    let inner = json!({"SelectStmt": {
        "targetList": [target(col(&["user_id"]))],
        "fromClause": [table("bans")]
    }});
    let tree = json!({"SelectStmt": {
        "targetList": [target(col(&["s", "id"]))],
        "fromClause": [{"RangeSubselect": {
            "subquery": {"SelectStmt": {"targetList": [target(col(&["id"]))], "fromClause": [table("users")]}},
            "alias": {"aliasname": "s"}
        }}],
        "whereClause": {"SubLink": {
            "subLinkType": "ANY_SUBLINK",
            "testexpr": col(&["s", "id"]),
            "subselect": inner
        }}
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(
        sql,
        @"SELECT s.id FROM (SELECT id FROM users) AS s WHERE s.id IN (SELECT user_id FROM bans)"
    );
}

#[test]
fn test_quoted_identifiers_and_literals() {
    let tree = json!({"SelectStmt": {
        "targetList": [{"ResTarget": {"name": "Label", "val": text("it's")}}],
        "fromClause": [{"RangeVar": {"schemaname": "Sales", "relname": "Orders", "inh": true}}]
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @r#"SELECT 'it''s' AS "Label" FROM "Sales"."Orders""#);
}

#[test]
fn test_cast_and_case() {
    let tree = json!({"SelectStmt": {"targetList": [
        target(json!({"TypeCast": {"arg": text("42"), "typeName": type_name("int4")}})),
        target(json!({"CaseExpr": {
            "args": [{"CaseWhen": {
                "expr": {"NullTest": {"arg": col(&["email"]), "nulltesttype": "IS_NULL"}},
                "result": text("missing")
            }}],
            "defresult": col(&["email"])
        }}))
    ], "fromClause": [table("users")]}});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(
        sql,
        @"SELECT '42'::int, CASE WHEN email IS NULL THEN 'missing' ELSE email END FROM users"
    );
}

#[test]
fn test_parameters() {
    let tree = json!({"SelectStmt": {
        "targetList": [target(star())],
        "fromClause": [table("users")],
        "whereClause": {"BoolExpr": {"boolop": "AND_EXPR", "args": [
            binary("=", col(&["id"]), json!({"ParamRef": {"number": 1}})),
            binary("<>", col(&["status"]), json!({"ParamRef": {"number": 2}}))
        ]}}
    }});
    let sql = deparse(&tree).unwrap();
    assert_snapshot!(sql, @"SELECT * FROM users WHERE id = $1 AND status <> $2");
}
