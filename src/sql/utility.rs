//! Utility statements: transaction control, maintenance, session variables,
//! COPY, LOCK and asynchronous notification.

use super::context::Context;
use super::deparser::{Deparse, Deparser};
use super::query::column_names;
use super::quote::is_plain_identifier;
use super::token::{Token, TokenStream};
use crate::ast::*;
use crate::error::{DeparseError, Result};

/// Render an option argument. Bare strings become quoted literals.
pub(crate) fn def_arg(dp: &Deparser, arg: &Node, ctx: Context) -> Result<TokenStream> {
    match arg {
        Node::String(_) => dp.node(arg, ctx.as_literal()),
        other => dp.node(other, ctx),
    }
}

impl Deparse for DefElem {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        if self.defname.is_empty() {
            return Err(DeparseError::missing("DefElem", "defname"));
        }
        let mut ts = TokenStream::new();
        if !self.defnamespace.is_empty() {
            ts.ident(self.defnamespace.clone()).push(Token::Dot);
        }
        ts.ident(self.defname.clone());
        if let Some(arg) = &self.arg {
            ts.space()
                .push(Token::Operator("=".into()))
                .space()
                .append(def_arg(dp, arg, ctx.operand())?);
        }
        Ok(ts)
    }
}

/// One `NAME value` entry of a parenthesized utility option list.
fn generic_option(dp: &Deparser, def: &DefElem, ctx: Context) -> Result<TokenStream> {
    let mut ts = TokenStream::new();
    if is_plain_identifier(&def.defname) {
        ts.push(Token::Raw(def.defname.to_uppercase()));
    } else {
        ts.ident(def.defname.clone());
    }
    match &def.arg {
        None => {}
        Some(Node::AStar(_)) => {
            ts.space().push(Token::Star);
        }
        Some(Node::List(list)) => {
            ts.space().parenthesized(dp.list(&list.items, ctx)?);
        }
        Some(arg) => {
            ts.space().append(def_arg(dp, arg, ctx)?);
        }
    }
    Ok(ts)
}

/// `(OPT [value], ...)`, or nothing for an empty list.
fn generic_options(dp: &Deparser, options: &[Node], owner: &'static str, ctx: Context) -> Result<TokenStream> {
    let parts = options
        .iter()
        .map(|node| match node {
            Node::DefElem(def) => generic_option(dp, def, ctx),
            other => Err(DeparseError::malformed(
                owner,
                format!("expected a DefElem option, found {}", other.kind()),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    let mut ts = TokenStream::new();
    if !parts.is_empty() {
        let mut list = TokenStream::new();
        list.comma_separated(parts);
        ts.parenthesized(list);
    }
    Ok(ts)
}

impl Deparse for RawStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        dp.required(self.stmt.as_ref(), "RawStmt", "stmt", ctx)
    }
}

// ============================================================================
// Transactions
// ============================================================================

fn const_text(node: &Node) -> Option<&str> {
    match node {
        Node::AConst(c) => match &c.value {
            ConstValue::String(s) => Some(s.as_str()),
            _ => None,
        },
        other => other.as_str(),
    }
}

fn const_flag(node: &Node) -> Option<bool> {
    match node {
        Node::AConst(c) => match c.value {
            ConstValue::Integer(n) => Some(n != 0),
            ConstValue::Boolean(b) => Some(b),
            _ => None,
        },
        Node::Integer(n) => Some(n.ival != 0),
        Node::Boolean(b) => Some(b.boolval),
        _ => None,
    }
}

/// One transaction mode, e.g. `ISOLATION LEVEL SERIALIZABLE` or `READ ONLY`.
fn transaction_mode(def: &DefElem, owner: &'static str) -> Result<TokenStream> {
    let arg = def
        .arg
        .as_ref()
        .ok_or_else(|| DeparseError::missing("DefElem", "arg"))?;
    let mut ts = TokenStream::new();
    match def.defname.as_str() {
        "transaction_isolation" => {
            let level = match const_text(arg) {
                Some("serializable") => "SERIALIZABLE",
                Some("repeatable read") => "REPEATABLE READ",
                Some("read committed") => "READ COMMITTED",
                Some("read uncommitted") => "READ UNCOMMITTED",
                Some(other) => return Err(DeparseError::variant(owner, other)),
                None => {
                    return Err(DeparseError::malformed(owner, "isolation level is not a string"))
                }
            };
            ts.keyword("ISOLATION LEVEL").then(level);
        }
        "transaction_read_only" => match const_flag(arg) {
            Some(true) => {
                ts.keyword("READ ONLY");
            }
            Some(false) => {
                ts.keyword("READ WRITE");
            }
            None => return Err(DeparseError::malformed(owner, "read-only flag is not a boolean")),
        },
        "transaction_deferrable" => match const_flag(arg) {
            Some(true) => {
                ts.keyword("DEFERRABLE");
            }
            Some(false) => {
                ts.keyword("NOT DEFERRABLE");
            }
            None => return Err(DeparseError::malformed(owner, "deferrable flag is not a boolean")),
        },
        other => return Err(DeparseError::variant(owner, other)),
    }
    Ok(ts)
}

fn transaction_modes(options: &[Node], owner: &'static str) -> Result<TokenStream> {
    let modes = options
        .iter()
        .map(|node| match node {
            Node::DefElem(def) => transaction_mode(def, owner),
            other => Err(DeparseError::malformed(
                owner,
                format!("expected a DefElem option, found {}", other.kind()),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    let mut ts = TokenStream::new();
    ts.comma_separated(modes);
    Ok(ts)
}

impl TransactionStmt {
    fn savepoint(&self) -> Result<String> {
        if self.savepoint_name.is_empty() {
            return Err(DeparseError::missing("TransactionStmt", "savepoint_name"));
        }
        Ok(self.savepoint_name.clone())
    }

    fn gid(&self) -> Result<String> {
        if self.gid.is_empty() {
            return Err(DeparseError::missing("TransactionStmt", "gid"));
        }
        Ok(self.gid.clone())
    }
}

impl Deparse for TransactionStmt {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        let kind = self
            .kind
            .as_ref()
            .ok_or_else(|| DeparseError::missing("TransactionStmt", "kind"))?;

        let mut ts = TokenStream::new();
        match kind {
            TransactionStmtKind::Begin | TransactionStmtKind::Start => {
                ts.keyword(if *kind == TransactionStmtKind::Begin {
                    "BEGIN"
                } else {
                    "START TRANSACTION"
                });
                if !self.options.is_empty() {
                    ts.space().append(transaction_modes(&self.options, "TransactionStmt")?);
                }
            }
            TransactionStmtKind::Commit | TransactionStmtKind::Rollback => {
                ts.keyword(if *kind == TransactionStmtKind::Commit {
                    "COMMIT"
                } else {
                    "ROLLBACK"
                });
                if self.chain {
                    ts.then("AND CHAIN");
                }
            }
            TransactionStmtKind::Savepoint => {
                ts.keyword("SAVEPOINT").space().ident(self.savepoint()?);
            }
            TransactionStmtKind::Release => {
                ts.keyword("RELEASE SAVEPOINT").space().ident(self.savepoint()?);
            }
            TransactionStmtKind::RollbackTo => {
                ts.keyword("ROLLBACK TO SAVEPOINT").space().ident(self.savepoint()?);
            }
            TransactionStmtKind::Prepare => {
                ts.keyword("PREPARE TRANSACTION").space().string(self.gid()?);
            }
            TransactionStmtKind::CommitPrepared => {
                ts.keyword("COMMIT PREPARED").space().string(self.gid()?);
            }
            TransactionStmtKind::RollbackPrepared => {
                ts.keyword("ROLLBACK PREPARED").space().string(self.gid()?);
            }
            TransactionStmtKind::Unrecognized(value) => {
                return Err(DeparseError::variant("TransactionStmt", value.clone()))
            }
        }
        Ok(ts)
    }
}

// ============================================================================
// VACUUM / ANALYZE / EXPLAIN
// ============================================================================

impl Deparse for VacuumRelation {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = dp.relation(self.relation.as_ref(), "VacuumRelation", ctx)?;
        ts.append(column_names(&self.va_cols, "VacuumRelation")?);
        Ok(ts)
    }
}

impl Deparse for VacuumStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = TokenStream::from(Token::Keyword(if self.is_vacuumcmd {
            "VACUUM"
        } else {
            "ANALYZE"
        }));
        let options = generic_options(dp, &self.options, "VacuumStmt", ctx)?;
        if !options.is_empty() {
            ts.space().append(options);
        }
        if !self.rels.is_empty() {
            ts.space().append(dp.list(&self.rels, ctx)?);
        }
        Ok(ts)
    }
}

impl Deparse for ExplainStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let query = dp.required(self.query.as_ref(), "ExplainStmt", "query", ctx)?;
        let mut ts = TokenStream::from(Token::Keyword("EXPLAIN"));
        let options = generic_options(dp, &self.options, "ExplainStmt", ctx)?;
        if !options.is_empty() {
            ts.space().append(options);
        }
        ts.space().append(query);
        Ok(ts)
    }
}

// ============================================================================
// Session variables
// ============================================================================

/// A possibly dotted configuration parameter name.
fn parameter_name(name: &str, owner: &'static str) -> Result<TokenStream> {
    if name.is_empty() {
        return Err(DeparseError::missing(owner, "name"));
    }
    let mut ts = TokenStream::new();
    ts.separated(
        name.split('.').map(|part| TokenStream::from(Token::Ident(part.to_string()))),
        &[Token::Dot],
    );
    Ok(ts)
}

impl Deparse for VariableSetStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let kind = self
            .kind
            .as_ref()
            .ok_or_else(|| DeparseError::missing("VariableSetStmt", "kind"))?;

        let mut ts = TokenStream::new();
        let set = |ts: &mut TokenStream| {
            ts.keyword("SET");
            if self.is_local {
                ts.then("LOCAL");
            }
        };
        match kind {
            VariableSetKind::SetValue => {
                set(&mut ts);
                ts.space()
                    .append(parameter_name(&self.name, "VariableSetStmt")?)
                    .then("TO")
                    .space()
                    .append(dp.required_list(
                        &self.args,
                        "VariableSetStmt",
                        "args",
                        ctx.operand().as_literal(),
                    )?);
            }
            VariableSetKind::SetDefault => {
                set(&mut ts);
                ts.space()
                    .append(parameter_name(&self.name, "VariableSetStmt")?)
                    .then("TO DEFAULT");
            }
            VariableSetKind::SetCurrent => {
                set(&mut ts);
                ts.space()
                    .append(parameter_name(&self.name, "VariableSetStmt")?)
                    .then("FROM CURRENT");
            }
            VariableSetKind::SetMulti => {
                set(&mut ts);
                match self.name.as_str() {
                    "TRANSACTION" => ts.then("TRANSACTION"),
                    "SESSION CHARACTERISTICS" => ts.then("SESSION CHARACTERISTICS AS TRANSACTION"),
                    other => return Err(DeparseError::variant("VariableSetStmt", other)),
                };
                ts.space().append(transaction_modes(&self.args, "VariableSetStmt")?);
            }
            VariableSetKind::Reset => {
                ts.keyword("RESET")
                    .space()
                    .append(parameter_name(&self.name, "VariableSetStmt")?);
            }
            VariableSetKind::ResetAll => {
                ts.keyword("RESET ALL");
            }
            VariableSetKind::Unrecognized(value) => {
                return Err(DeparseError::variant("VariableSetStmt", value.clone()))
            }
        }
        Ok(ts)
    }
}

impl Deparse for VariableShowStmt {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::from(Token::Keyword("SHOW"));
        if self.name == "all" {
            ts.then("ALL");
        } else {
            ts.space().append(parameter_name(&self.name, "VariableShowStmt")?);
        }
        Ok(ts)
    }
}

// ============================================================================
// COPY / LOCK / NOTIFY
// ============================================================================

impl Deparse for CopyStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = TokenStream::from(Token::Keyword("COPY"));
        match (&self.relation, &self.query) {
            (Some(relation), _) => {
                ts.space()
                    .append(dp.render(relation, ctx)?)
                    .append(column_names(&self.attlist, "CopyStmt")?);
            }
            (None, Some(query)) => {
                ts.space().parenthesized(dp.node(query, ctx)?);
            }
            (None, None) => return Err(DeparseError::missing("CopyStmt", "relation")),
        }

        ts.then(if self.is_from { "FROM" } else { "TO" });
        match (&self.filename, self.is_program) {
            (Some(command), true) => {
                ts.then("PROGRAM").space().string(command.clone());
            }
            (None, true) => return Err(DeparseError::missing("CopyStmt", "filename")),
            (Some(file), false) => {
                ts.space().string(file.clone());
            }
            (None, false) => {
                ts.then(if self.is_from { "STDIN" } else { "STDOUT" });
            }
        }

        let options = generic_options(dp, &self.options, "CopyStmt", ctx)?;
        if !options.is_empty() {
            ts.then("WITH").space().append(options);
        }
        if let Some(cond) = &self.where_clause {
            ts.then("WHERE").space().append(dp.node(cond, ctx)?);
        }
        Ok(ts)
    }
}

/// Table lock levels, indexed by mode number.
const LOCK_MODES: [&str; 8] = [
    "ACCESS SHARE",
    "ROW SHARE",
    "ROW EXCLUSIVE",
    "SHARE UPDATE EXCLUSIVE",
    "SHARE",
    "SHARE ROW EXCLUSIVE",
    "EXCLUSIVE",
    "ACCESS EXCLUSIVE",
];

impl Deparse for LockStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let relations = dp.required_list(&self.relations, "LockStmt", "relations", ctx.operand())?;
        let mode = usize::try_from(self.mode)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|i| LOCK_MODES.get(i).copied())
            .ok_or_else(|| DeparseError::variant("LockStmt", self.mode.to_string()))?;

        let mut ts = TokenStream::from(Token::Keyword("LOCK TABLE"));
        ts.space()
            .append(relations)
            .then("IN")
            .space()
            .keyword(mode)
            .then("MODE");
        if self.nowait {
            ts.then("NOWAIT");
        }
        Ok(ts)
    }
}

fn channel(name: &str, owner: &'static str) -> Result<TokenStream> {
    if name.is_empty() {
        return Err(DeparseError::missing(owner, "conditionname"));
    }
    Ok(Token::Ident(name.to_string()).into())
}

impl Deparse for NotifyStmt {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::from(Token::Keyword("NOTIFY"));
        ts.space().append(channel(&self.conditionname, "NotifyStmt")?);
        if let Some(payload) = &self.payload {
            ts.comma().space().string(payload.clone());
        }
        Ok(ts)
    }
}

impl Deparse for ListenStmt {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::from(Token::Keyword("LISTEN"));
        ts.space().append(channel(&self.conditionname, "ListenStmt")?);
        Ok(ts)
    }
}

impl Deparse for UnlistenStmt {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::from(Token::Keyword("UNLISTEN"));
        match self.conditionname.as_deref() {
            None | Some("") => ts.space().push(Token::Star),
            Some(name) => ts.space().ident(name.to_string()),
        };
        Ok(ts)
    }
}
