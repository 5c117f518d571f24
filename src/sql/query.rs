//! SELECT and its FROM-clause, WITH and locking constituents.

use super::context::Context;
use super::deparser::{ident_list, Deparse, Deparser};
use super::expr::operand;
use super::token::{Token, TokenStream};
use crate::ast::*;
use crate::error::{DeparseError, Result};

fn parens(inner: TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.parenthesized(inner);
    ts
}

/// ` (a, b)` after a name, or nothing for an empty list.
pub(crate) fn column_names(nodes: &[Node], owner: &'static str) -> Result<TokenStream> {
    let mut ts = TokenStream::new();
    if !nodes.is_empty() {
        ts.space().parenthesized(ident_list(nodes, owner)?);
    }
    Ok(ts)
}

/// `TEMPORARY`/`UNLOGGED` for a relation persistence code.
pub(crate) fn persistence_keyword(relpersistence: &str) -> Option<&'static str> {
    match relpersistence {
        "t" => Some("TEMPORARY"),
        "u" => Some("UNLOGGED"),
        _ => None,
    }
}

// =============================================================================
// FROM clause
// =============================================================================

impl Deparse for RangeVar {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        if self.relname.is_empty() {
            return Err(DeparseError::missing("RangeVar", "relname"));
        }
        let mut ts = TokenStream::new();
        if self.inh == Some(false) {
            ts.keyword("ONLY").space();
        }
        for part in [&self.catalogname, &self.schemaname] {
            if !part.is_empty() {
                ts.ident(part.clone()).push(Token::Dot);
            }
        }
        ts.ident(self.relname.clone());
        if let Some(alias) = &self.alias {
            ts.then("AS").space().append(dp.render(alias, ctx)?);
        }
        Ok(ts)
    }
}

impl Deparse for Alias {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        if self.aliasname.is_empty() {
            return Err(DeparseError::missing("Alias", "aliasname"));
        }
        let mut ts = TokenStream::from(Token::Ident(self.aliasname.clone()));
        ts.append(column_names(&self.colnames, "Alias")?);
        Ok(ts)
    }
}

impl Deparse for JoinExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let larg = dp.required(self.larg.as_ref(), "JoinExpr", "larg", ctx)?;
        let rarg = match &self.rarg {
            Some(node @ Node::JoinExpr(inner)) if inner.alias.is_none() => parens(dp.node(node, ctx)?),
            other => dp.required(other.as_ref(), "JoinExpr", "rarg", ctx)?,
        };

        let qualified = self.quals.is_some() || !self.using_clause.is_empty();
        let keyword = match self.jointype.as_ref() {
            None | Some(JoinType::Inner) if !qualified && !self.is_natural => "CROSS JOIN",
            None | Some(JoinType::Inner) => "JOIN",
            Some(JoinType::Left) => "LEFT JOIN",
            Some(JoinType::Full) => "FULL JOIN",
            Some(JoinType::Right) => "RIGHT JOIN",
            Some(JoinType::Unrecognized(value)) => {
                return Err(DeparseError::variant("JoinExpr", value.clone()))
            }
        };

        let mut ts = larg;
        ts.space();
        if self.is_natural {
            ts.keyword("NATURAL").space();
        }
        ts.keyword(keyword).space().append(rarg);
        if !self.using_clause.is_empty() {
            ts.then("USING")
                .space()
                .parenthesized(ident_list(&self.using_clause, "JoinExpr")?);
        } else if let Some(quals) = &self.quals {
            ts.then("ON").space().append(dp.node(quals, ctx.operand())?);
        }

        match &self.alias {
            Some(alias) => {
                let mut aliased = parens(ts);
                aliased.then("AS").space().append(dp.render(alias, ctx)?);
                Ok(aliased)
            }
            None => Ok(ts),
        }
    }
}

impl Deparse for RangeSubselect {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        if self.lateral {
            ts.keyword("LATERAL").space();
        }
        ts.parenthesized(dp.required(
            self.subquery.as_ref(),
            "RangeSubselect",
            "subquery",
            ctx.operand(),
        )?);
        if let Some(alias) = &self.alias {
            ts.then("AS").space().append(dp.render(alias, ctx)?);
        }
        Ok(ts)
    }
}

impl RangeFunction {
    /// One `call [AS (coldefs)]` entry of the function list.
    fn function(dp: &Deparser, entry: &Node, ctx: Context) -> Result<TokenStream> {
        let (call, coldefs) = match entry.items() {
            [call] => (call, None),
            [call, coldefs] => (call, Some(coldefs)),
            _ => return Err(DeparseError::malformed("RangeFunction", "bad function entry")),
        };
        let mut ts = dp.node(call, ctx)?;
        if let Some(Node::List(defs)) = coldefs {
            if !defs.items.is_empty() {
                ts.then("AS").space().parenthesized(dp.list(&defs.items, ctx)?);
            }
        }
        Ok(ts)
    }
}

impl Deparse for RangeFunction {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        if self.functions.is_empty() {
            return Err(DeparseError::missing("RangeFunction", "functions"));
        }
        let calls = self
            .functions
            .iter()
            .map(|entry| Self::function(dp, entry, ctx))
            .collect::<Result<Vec<_>>>()?;

        let mut ts = TokenStream::new();
        if self.lateral {
            ts.keyword("LATERAL").space();
        }
        if self.is_rowsfrom {
            let mut list = TokenStream::new();
            list.comma_separated(calls);
            ts.keyword("ROWS FROM").space().parenthesized(list);
        } else {
            ts.comma_separated(calls);
        }
        if self.ordinality {
            ts.then("WITH ORDINALITY");
        }

        match (&self.alias, self.coldeflist.is_empty()) {
            (Some(alias), true) => {
                ts.then("AS").space().append(dp.render(alias, ctx)?);
            }
            (Some(alias), false) => {
                ts.then("AS")
                    .space()
                    .ident(alias.aliasname.clone())
                    .space()
                    .parenthesized(dp.list(&self.coldeflist, ctx)?);
            }
            (None, false) => {
                ts.then("AS")
                    .space()
                    .parenthesized(dp.list(&self.coldeflist, ctx)?);
            }
            (None, true) => {}
        }
        Ok(ts)
    }
}

// =============================================================================
// WITH, INTO and locking
// =============================================================================

impl Deparse for WithClause {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctes = dp.required_list(&self.ctes, "WithClause", "ctes", ctx.operand())?;
        let mut ts = TokenStream::from(Token::Keyword("WITH"));
        if self.recursive {
            ts.then("RECURSIVE");
        }
        ts.space().append(ctes);
        Ok(ts)
    }
}

impl Deparse for CommonTableExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        if self.ctename.is_empty() {
            return Err(DeparseError::missing("CommonTableExpr", "ctename"));
        }
        let query = dp.required(self.ctequery.as_ref(), "CommonTableExpr", "ctequery", ctx)?;

        let mut ts = TokenStream::from(Token::Ident(self.ctename.clone()));
        ts.append(column_names(&self.aliascolnames, "CommonTableExpr")?)
            .then("AS");
        match self.ctematerialized.as_ref() {
            None | Some(CteMaterialize::Default) => {}
            Some(CteMaterialize::Always) => {
                ts.then("MATERIALIZED");
            }
            Some(CteMaterialize::Never) => {
                ts.then("NOT MATERIALIZED");
            }
            Some(CteMaterialize::Unrecognized(value)) => {
                return Err(DeparseError::variant("CommonTableExpr", value.clone()))
            }
        }
        ts.space().parenthesized(query);
        Ok(ts)
    }
}

impl Deparse for IntoClause {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let rel = self
            .rel
            .as_ref()
            .ok_or_else(|| DeparseError::missing("IntoClause", "rel"))?;
        let mut ts = TokenStream::new();
        if let Some(keyword) = persistence_keyword(&rel.relpersistence) {
            ts.keyword(keyword).space();
        }
        ts.append(dp.render(rel, ctx)?)
            .append(column_names(&self.col_names, "IntoClause")?);
        Ok(ts)
    }
}

impl Deparse for LockingClause {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let keyword = match self.strength.as_ref() {
            Some(LockClauseStrength::ForUpdate) => "FOR UPDATE",
            Some(LockClauseStrength::ForNoKeyUpdate) => "FOR NO KEY UPDATE",
            Some(LockClauseStrength::ForShare) => "FOR SHARE",
            Some(LockClauseStrength::ForKeyShare) => "FOR KEY SHARE",
            Some(LockClauseStrength::None) => {
                return Err(DeparseError::variant("LockingClause", "LCS_NONE"))
            }
            Some(LockClauseStrength::Unrecognized(value)) => {
                return Err(DeparseError::variant("LockingClause", value.clone()))
            }
            None => return Err(DeparseError::missing("LockingClause", "strength")),
        };

        let mut ts = TokenStream::from(Token::Keyword(keyword));
        if !self.locked_rels.is_empty() {
            ts.then("OF").space().append(dp.list(&self.locked_rels, ctx)?);
        }
        match self.wait_policy.as_ref() {
            None | Some(LockWaitPolicy::Block) => {}
            Some(LockWaitPolicy::Skip) => {
                ts.then("SKIP LOCKED");
            }
            Some(LockWaitPolicy::Error) => {
                ts.then("NOWAIT");
            }
            Some(LockWaitPolicy::Unrecognized(value)) => {
                return Err(DeparseError::variant("LockingClause", value.clone()))
            }
        }
        Ok(ts)
    }
}

// =============================================================================
// SELECT
// =============================================================================

impl SelectStmt {
    /// Whether this statement must be wrapped when used as an arm of `parent`.
    fn needs_parens_as_arm(&self, parent: &SelectStmt, is_left: bool) -> bool {
        if !self.sort_clause.is_empty()
            || self.limit_count.is_some()
            || self.limit_offset.is_some()
            || !self.locking_clause.is_empty()
            || self.with_clause.is_some()
        {
            return true;
        }
        if self.is_set_operation() {
            // Left-associative chains of one operator read the same unwrapped.
            return !(is_left && self.op == parent.op && self.all == parent.all);
        }
        false
    }

    fn arm(&self, dp: &Deparser, arm: &SelectStmt, is_left: bool, ctx: Context) -> Result<TokenStream> {
        let rendered = dp.render(arm, ctx)?;
        Ok(if arm.needs_parens_as_arm(self, is_left) {
            parens(rendered)
        } else {
            rendered
        })
    }

    fn set_operation(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let keyword = match (&self.op, self.all) {
            (Some(SetOperation::Union), false) => "UNION",
            (Some(SetOperation::Union), true) => "UNION ALL",
            (Some(SetOperation::Intersect), false) => "INTERSECT",
            (Some(SetOperation::Intersect), true) => "INTERSECT ALL",
            (Some(SetOperation::Except), false) => "EXCEPT",
            (Some(SetOperation::Except), true) => "EXCEPT ALL",
            _ => return Err(DeparseError::malformed("SelectStmt", "not a set operation")),
        };
        let larg = self
            .larg
            .as_deref()
            .ok_or_else(|| DeparseError::missing("SelectStmt", "larg"))?;
        let rarg = self
            .rarg
            .as_deref()
            .ok_or_else(|| DeparseError::missing("SelectStmt", "rarg"))?;

        let mut ts = self.arm(dp, larg, true, ctx)?;
        ts.push(Token::Break)
            .keyword(keyword)
            .push(Token::Break)
            .append(self.arm(dp, rarg, false, ctx)?);
        Ok(ts)
    }

    fn values(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let rows = self
            .values_lists
            .iter()
            .map(|row| Ok(parens(dp.list(row.items(), ctx)?)))
            .collect::<Result<Vec<_>>>()?;
        let mut ts = TokenStream::new();
        ts.comma_separated(rows);
        Ok(ts)
    }

    /// `SELECT ... FROM ... WHERE ... GROUP BY ... HAVING ... WINDOW ...`
    fn simple_select(&self, dp: &Deparser, ts: &mut TokenStream, ctx: Context) -> Result<()> {
        let targets = dp.list(&self.target_list, ctx.in_select_list())?;
        match &self.distinct_clause {
            Distinct::None => {
                ts.clause("SELECT", targets);
            }
            Distinct::All => {
                ts.clause("SELECT DISTINCT", targets);
            }
            Distinct::On(exprs) => {
                let mut body = parens(dp.list(exprs, ctx)?);
                if !targets.is_empty() {
                    body.space().append(targets);
                }
                ts.clause("SELECT DISTINCT ON", body);
            }
        }

        if let Some(into) = &self.into_clause {
            ts.clause("INTO", dp.render(into, ctx)?);
        }
        if !self.from_clause.is_empty() {
            ts.clause("FROM", dp.list(&self.from_clause, ctx.in_from_clause())?);
        }
        if let Some(cond) = &self.where_clause {
            ts.clause("WHERE", dp.node(cond, ctx)?);
        }
        if !self.group_clause.is_empty() {
            let keyword = if self.group_distinct {
                "GROUP BY DISTINCT"
            } else {
                "GROUP BY"
            };
            ts.clause(keyword, dp.list(&self.group_clause, ctx.in_group_clause())?);
        }
        if let Some(having) = &self.having_clause {
            ts.clause("HAVING", dp.node(having, ctx)?);
        }
        if !self.window_clause.is_empty() {
            ts.clause("WINDOW", dp.list(&self.window_clause, ctx)?);
        }
        Ok(())
    }

    /// ORDER BY, LIMIT/OFFSET or FETCH, and locking.
    fn trailing(&self, dp: &Deparser, ts: &mut TokenStream, ctx: Context) -> Result<()> {
        if !self.sort_clause.is_empty() {
            ts.clause("ORDER BY", dp.list(&self.sort_clause, ctx.in_sort_clause())?);
        }

        match self.limit_option.as_ref() {
            Some(LimitOption::WithTies) => {
                if let Some(offset) = &self.limit_offset {
                    let mut body = dp.node(offset, ctx)?;
                    body.then("ROWS");
                    ts.clause("OFFSET", body);
                }
                let count = self
                    .limit_count
                    .as_ref()
                    .ok_or_else(|| DeparseError::missing("SelectStmt", "limitCount"))?;
                let mut body = operand(dp, count, ctx)?;
                body.then("ROWS WITH TIES");
                ts.clause("FETCH FIRST", body);
            }
            None | Some(LimitOption::Default) | Some(LimitOption::Count) => {
                if let Some(count) = &self.limit_count {
                    let body = match count {
                        Node::AConst(c) if c.is_null() => TokenStream::from(Token::Keyword("ALL")),
                        other => dp.node(other, ctx)?,
                    };
                    ts.clause("LIMIT", body);
                }
                if let Some(offset) = &self.limit_offset {
                    ts.clause("OFFSET", dp.node(offset, ctx)?);
                }
            }
            Some(LimitOption::Unrecognized(value)) => {
                return Err(DeparseError::variant("SelectStmt", value.clone()))
            }
        }

        for lock in &self.locking_clause {
            ts.push(Token::Break).append(dp.node(lock, ctx)?);
        }
        Ok(())
    }
}

impl Deparse for SelectStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = TokenStream::new();
        if let Some(with) = &self.with_clause {
            ts.append(dp.render(with, ctx)?);
        }

        match &self.op {
            Some(SetOperation::Unrecognized(value)) => {
                return Err(DeparseError::variant("SelectStmt", value.clone()))
            }
            _ if self.is_set_operation() => {
                if !ts.is_empty() {
                    ts.push(Token::Break);
                }
                ts.append(self.set_operation(dp, ctx)?);
            }
            _ if !self.values_lists.is_empty() => {
                ts.clause("VALUES", self.values(dp, ctx)?);
            }
            _ => self.simple_select(dp, &mut ts, ctx)?,
        }

        self.trailing(dp, &mut ts, ctx)?;
        Ok(ts)
    }
}
