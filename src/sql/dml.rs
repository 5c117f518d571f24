//! INSERT, UPDATE and DELETE.

use super::context::Context;
use super::deparser::{Deparse, Deparser};
use super::expr::indirection;
use super::token::{Token, TokenStream};
use crate::ast::*;
use crate::error::{DeparseError, Result};

/// Assignments of `UPDATE ... SET` and `ON CONFLICT DO UPDATE SET`.
///
/// A multi-column assignment `(a, b) = src` arrives as one target per column,
/// each holding a `MultiAssignRef` to the shared source; the group is folded
/// back into a single assignment.
pub(crate) fn assignments(
    dp: &Deparser,
    targets: &[Node],
    owner: &'static str,
    ctx: Context,
) -> Result<TokenStream> {
    if targets.is_empty() {
        return Err(DeparseError::missing(owner, "targetList"));
    }

    let mut parts = Vec::with_capacity(targets.len());
    let mut i = 0;
    while i < targets.len() {
        if let Node::ResTarget(first) = &targets[i] {
            if let Some(source @ Node::MultiAssignRef(multi)) = &first.val {
                let width = usize::try_from(multi.ncolumns).unwrap_or(0).max(1);
                let group = targets.get(i..i + width).ok_or_else(|| {
                    DeparseError::malformed(owner, "multi-column assignment is missing columns")
                })?;
                let columns = group
                    .iter()
                    .map(|target| match target {
                        Node::ResTarget(rt) => {
                            let mut ts = TokenStream::from(Token::Ident(rt.name.clone()));
                            ts.append(indirection(dp, &rt.indirection, ctx)?);
                            Ok(ts)
                        }
                        other => Err(DeparseError::malformed(
                            owner,
                            format!("expected a ResTarget, found {}", other.kind()),
                        )),
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut names = TokenStream::new();
                names.comma_separated(columns);
                let mut ts = TokenStream::new();
                ts.parenthesized(names)
                    .space()
                    .push(Token::Operator("=".into()))
                    .space()
                    .append(dp.node(source, ctx.operand())?);
                parts.push(ts);
                i += width;
                continue;
            }
        }
        parts.push(dp.node(&targets[i], ctx.in_update_assignment())?);
        i += 1;
    }

    let mut ts = TokenStream::new();
    ts.comma_separated(parts);
    Ok(ts)
}

fn returning(dp: &Deparser, ts: &mut TokenStream, list: &[Node], ctx: Context) -> Result<()> {
    if !list.is_empty() {
        ts.clause("RETURNING", dp.list(list, ctx.in_select_list())?);
    }
    Ok(())
}

fn with_prefix(dp: &Deparser, with: Option<&WithClause>, ctx: Context) -> Result<TokenStream> {
    match with {
        Some(with) => dp.render(with, ctx),
        None => Ok(TokenStream::new()),
    }
}

// =============================================================================
// INSERT
// =============================================================================

impl Deparse for InferClause {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        if !self.conname.is_empty() {
            ts.keyword("ON CONSTRAINT").space().ident(self.conname.clone());
            return Ok(ts);
        }
        ts.parenthesized(dp.required_list(&self.index_elems, "InferClause", "indexElems", ctx)?);
        if let Some(cond) = &self.where_clause {
            ts.then("WHERE").space().append(dp.node(cond, ctx)?);
        }
        Ok(ts)
    }
}

impl Deparse for OnConflictClause {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::from(Token::Keyword("ON CONFLICT"));
        if let Some(infer) = &self.infer {
            ts.space().append(dp.render(infer, ctx)?);
        }
        match self.action.as_ref() {
            Some(OnConflictAction::Nothing) => {
                ts.then("DO NOTHING");
            }
            Some(OnConflictAction::Update) => {
                ts.then("DO UPDATE SET")
                    .space()
                    .append(assignments(dp, &self.target_list, "OnConflictClause", ctx)?);
                if let Some(cond) = &self.where_clause {
                    ts.then("WHERE").space().append(dp.node(cond, ctx)?);
                }
            }
            Some(OnConflictAction::None) => {
                return Err(DeparseError::variant("OnConflictClause", "ONCONFLICT_NONE"))
            }
            Some(OnConflictAction::Unrecognized(value)) => {
                return Err(DeparseError::variant("OnConflictClause", value.clone()))
            }
            None => return Err(DeparseError::missing("OnConflictClause", "action")),
        }
        Ok(ts)
    }
}

impl Deparse for InsertStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = with_prefix(dp, self.with_clause.as_ref(), ctx)?;

        let mut target = dp.relation(self.relation.as_ref(), "InsertStmt", ctx)?;
        if !self.cols.is_empty() {
            target.space().parenthesized(dp.list(&self.cols, ctx)?);
        }
        ts.clause("INSERT INTO", target);

        match self.overriding.as_ref() {
            None | Some(OverridingKind::NotSet) => {}
            Some(OverridingKind::UserValue) => {
                ts.push(Token::Break).keyword("OVERRIDING USER VALUE");
            }
            Some(OverridingKind::SystemValue) => {
                ts.push(Token::Break).keyword("OVERRIDING SYSTEM VALUE");
            }
            Some(OverridingKind::Unrecognized(value)) => {
                return Err(DeparseError::variant("InsertStmt", value.clone()))
            }
        }

        ts.push(Token::Break);
        match &self.select_stmt {
            Some(select) => ts.append(dp.node(select, ctx)?),
            None => ts.keyword("DEFAULT VALUES"),
        };

        if let Some(conflict) = &self.on_conflict_clause {
            ts.push(Token::Break).append(dp.render(conflict, ctx)?);
        }
        returning(dp, &mut ts, &self.returning_list, ctx)?;
        Ok(ts)
    }
}

// =============================================================================
// UPDATE / DELETE
// =============================================================================

impl Deparse for UpdateStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = with_prefix(dp, self.with_clause.as_ref(), ctx)?;
        ts.clause("UPDATE", dp.relation(self.relation.as_ref(), "UpdateStmt", ctx)?);
        ts.clause("SET", assignments(dp, &self.target_list, "UpdateStmt", ctx)?);
        if !self.from_clause.is_empty() {
            ts.clause("FROM", dp.list(&self.from_clause, ctx.in_from_clause())?);
        }
        if let Some(cond) = &self.where_clause {
            ts.clause("WHERE", dp.node(cond, ctx)?);
        }
        returning(dp, &mut ts, &self.returning_list, ctx)?;
        Ok(ts)
    }
}

impl Deparse for DeleteStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = with_prefix(dp, self.with_clause.as_ref(), ctx)?;
        ts.clause("DELETE FROM", dp.relation(self.relation.as_ref(), "DeleteStmt", ctx)?);
        if !self.using_clause.is_empty() {
            ts.clause("USING", dp.list(&self.using_clause, ctx.in_from_clause())?);
        }
        if let Some(cond) = &self.where_clause {
            ts.clause("WHERE", dp.node(cond, ctx)?);
        }
        returning(dp, &mut ts, &self.returning_list, ctx)?;
        Ok(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::test_utils::validate_sql;
    use serde_json::{json, Value};

    fn render(value: Value) -> Result<String> {
        let node: Node = serde_json::from_value(value).unwrap();
        Deparser::default().deparse_node(&node)
    }

    fn col(name: &str) -> Value {
        json!({"ColumnRef": {"fields": [{"String": {"sval": name}}]}})
    }

    fn int(n: i64) -> Value {
        json!({"A_Const": {"ival": {"ival": n}}})
    }

    fn eq(l: Value, r: Value) -> Value {
        json!({"A_Expr": {"kind": "AEXPR_OP", "name": [{"String": {"sval": "="}}], "lexpr": l, "rexpr": r}})
    }

    #[test]
    fn test_insert_values() {
        let stmt = json!({"InsertStmt": {
            "relation": {"relname": "items", "inh": true, "relpersistence": "p"},
            "cols": [{"ResTarget": {"name": "id"}}, {"ResTarget": {"name": "label"}}],
            "selectStmt": {"SelectStmt": {"valuesLists": [[int(1), {"A_Const": {"sval": {"sval": "thing"}}}]]}}
        }});
        let sql = render(stmt).unwrap();
        assert_eq!(sql, "INSERT INTO items (id, label) VALUES (1, 'thing')");
        validate_sql(&sql).unwrap();
    }

    #[test]
    fn test_insert_default_values_returning() {
        let stmt = json!({"InsertStmt": {
            "relation": {"relname": "events"},
            "returningList": [{"ResTarget": {"val": col("id")}}]
        }});
        assert_eq!(
            render(stmt).unwrap(),
            "INSERT INTO events DEFAULT VALUES RETURNING id"
        );
    }

    #[test]
    fn test_insert_overriding_system_value() {
        let stmt = json!({"InsertStmt": {
            "relation": {"relname": "t"},
            "override": "OVERRIDING_SYSTEM_VALUE",
            "selectStmt": {"SelectStmt": {"valuesLists": [[int(1)]]}}
        }});
        assert_eq!(
            render(stmt).unwrap(),
            "INSERT INTO t OVERRIDING SYSTEM VALUE VALUES (1)"
        );
    }

    #[test]
    fn test_on_conflict_do_update() {
        let stmt = json!({"InsertStmt": {
            "relation": {"relname": "counters"},
            "cols": [{"ResTarget": {"name": "k"}}, {"ResTarget": {"name": "n"}}],
            "selectStmt": {"SelectStmt": {"valuesLists": [[{"A_Const": {"sval": {"sval": "a"}}}, int(1)]]}},
            "onConflictClause": {
                "action": "ONCONFLICT_UPDATE",
                "infer": {"indexElems": [{"IndexElem": {"name": "k"}}]},
                "targetList": [{"ResTarget": {"name": "n", "val": {"A_Expr": {
                    "kind": "AEXPR_OP",
                    "name": [{"String": {"sval": "+"}}],
                    "lexpr": {"ColumnRef": {"fields": [{"String": {"sval": "counters"}}, {"String": {"sval": "n"}}]}},
                    "rexpr": int(1)
                }}}}]
            }
        }});
        let sql = render(stmt).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO counters (k, n) VALUES ('a', 1) ON CONFLICT (k) DO UPDATE SET n = counters.n + 1"
        );
        validate_sql(&sql).unwrap();
    }

    #[test]
    fn test_on_conflict_on_constraint_do_nothing() {
        let stmt = json!({"InsertStmt": {
            "relation": {"relname": "t"},
            "selectStmt": {"SelectStmt": {"valuesLists": [[int(1)]]}},
            "onConflictClause": {"action": "ONCONFLICT_NOTHING", "infer": {"conname": "t_pkey"}}
        }});
        assert_eq!(
            render(stmt).unwrap(),
            "INSERT INTO t VALUES (1) ON CONFLICT ON CONSTRAINT t_pkey DO NOTHING"
        );
    }

    #[test]
    fn test_update_multi_assignment() {
        let source = json!({"RowExpr": {"args": [int(1), int(2)], "row_format": "COERCE_IMPLICIT_CAST"}});
        let stmt = json!({"UpdateStmt": {
            "relation": {"relname": "t"},
            "targetList": [
                {"ResTarget": {"name": "a", "val": {"MultiAssignRef": {"source": source, "colno": 1, "ncolumns": 2}}}},
                {"ResTarget": {"name": "b", "val": {"MultiAssignRef": {"colno": 2, "ncolumns": 2}}}},
                {"ResTarget": {"name": "c", "val": int(3)}}
            ],
            "whereClause": eq(col("id"), int(7))
        }});
        assert_eq!(
            render(stmt).unwrap(),
            "UPDATE t SET (a, b) = (1, 2), c = 3 WHERE id = 7"
        );
    }

    #[test]
    fn test_update_from_returning() {
        let stmt = json!({"UpdateStmt": {
            "relation": {"relname": "t"},
            "targetList": [{"ResTarget": {"name": "v", "val": {"ColumnRef": {"fields": [{"String": {"sval": "s"}}, {"String": {"sval": "v"}}]}}}}],
            "fromClause": [{"RangeVar": {"relname": "s"}}],
            "returningList": [{"ResTarget": {"val": {"ColumnRef": {"fields": [{"A_Star": {}}]}}}}]
        }});
        let sql = render(stmt).unwrap();
        assert_eq!(sql, "UPDATE t SET v = s.v FROM s RETURNING *");
        validate_sql(&sql).unwrap();
    }

    #[test]
    fn test_update_without_targets_is_malformed() {
        let err = render(json!({"UpdateStmt": {"relation": {"relname": "t"}}})).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            DeparseError::MalformedPayload { node, .. } if node == "UpdateStmt"
        ));
    }

    #[test]
    fn test_delete_using() {
        let stmt = json!({"DeleteStmt": {
            "relation": {"relname": "orders", "alias": {"aliasname": "o"}},
            "usingClause": [{"RangeVar": {"relname": "customers", "alias": {"aliasname": "c"}}}],
            "whereClause": eq(
                json!({"ColumnRef": {"fields": [{"String": {"sval": "o"}}, {"String": {"sval": "cid"}}]}}),
                json!({"ColumnRef": {"fields": [{"String": {"sval": "c"}}, {"String": {"sval": "id"}}]}})
            )
        }});
        assert_eq!(
            render(stmt).unwrap(),
            "DELETE FROM orders AS o USING customers AS c WHERE o.cid = c.id"
        );
    }

    #[test]
    fn test_delete_without_relation() {
        let err = render(json!({"DeleteStmt": {}})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error deparsing DeleteStmt: malformed DeleteStmt payload: missing required field `relation`"
        );
    }
}
