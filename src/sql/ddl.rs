//! DDL renderers.
//!
//! CREATE/ALTER/DROP for tables, indexes, views, sequences, schemas,
//! extensions and row-level security policies, plus the column and
//! constraint definitions they share.

use super::context::Context;
use super::deparser::{ident_list, qualified_name, strings, Deparse, Deparser};
use super::query::{column_names, persistence_keyword};
use super::quote::is_plain_identifier;
use super::token::{Token, TokenStream};
use crate::ast::*;
use crate::error::{DeparseError, Result};

/// Keyword naming an object type in DROP, ALTER and GRANT.
pub(crate) fn object_keyword(object: &ObjectType) -> Option<&'static str> {
    Some(match object {
        ObjectType::AccessMethod => "ACCESS METHOD",
        ObjectType::Aggregate => "AGGREGATE",
        ObjectType::Collation => "COLLATION",
        ObjectType::Conversion => "CONVERSION",
        ObjectType::Database => "DATABASE",
        ObjectType::Domain => "DOMAIN",
        ObjectType::EventTrigger => "EVENT TRIGGER",
        ObjectType::Extension => "EXTENSION",
        ObjectType::Fdw => "FOREIGN DATA WRAPPER",
        ObjectType::ForeignServer => "SERVER",
        ObjectType::ForeignTable => "FOREIGN TABLE",
        ObjectType::Function => "FUNCTION",
        ObjectType::Index => "INDEX",
        ObjectType::Language => "LANGUAGE",
        ObjectType::LargeObject => "LARGE OBJECT",
        ObjectType::MatView => "MATERIALIZED VIEW",
        ObjectType::OpClass => "OPERATOR CLASS",
        ObjectType::Operator => "OPERATOR",
        ObjectType::OpFamily => "OPERATOR FAMILY",
        ObjectType::ParameterAcl => "PARAMETER",
        ObjectType::Policy => "POLICY",
        ObjectType::Procedure => "PROCEDURE",
        ObjectType::Publication => "PUBLICATION",
        ObjectType::Role => "ROLE",
        ObjectType::Routine => "ROUTINE",
        ObjectType::Rule => "RULE",
        ObjectType::Schema => "SCHEMA",
        ObjectType::Sequence => "SEQUENCE",
        ObjectType::StatisticExt => "STATISTICS",
        ObjectType::Subscription => "SUBSCRIPTION",
        ObjectType::Table => "TABLE",
        ObjectType::Tablespace => "TABLESPACE",
        ObjectType::Trigger => "TRIGGER",
        ObjectType::TsConfiguration => "TEXT SEARCH CONFIGURATION",
        ObjectType::TsDictionary => "TEXT SEARCH DICTIONARY",
        ObjectType::TsParser => "TEXT SEARCH PARSER",
        ObjectType::TsTemplate => "TEXT SEARCH TEMPLATE",
        ObjectType::Type => "TYPE",
        ObjectType::View => "VIEW",
        // Sub-objects are only named through the object that holds them.
        ObjectType::Attribute
        | ObjectType::Column
        | ObjectType::DomConstraint
        | ObjectType::TabConstraint
        | ObjectType::Unrecognized(_) => return None,
    })
}

/// Append `CASCADE`/`RESTRICT` when a behavior is given.
pub(crate) fn drop_behavior(
    ts: &mut TokenStream,
    behavior: Option<&DropBehavior>,
    owner: &'static str,
) -> Result<()> {
    match behavior {
        None => {}
        Some(DropBehavior::Cascade) => {
            ts.then("CASCADE");
        }
        Some(DropBehavior::Restrict) => {
            ts.then("RESTRICT");
        }
        Some(DropBehavior::Unrecognized(value)) => {
            return Err(DeparseError::variant(owner, value.clone()))
        }
    }
    Ok(())
}

/// `(name = value, ...)` for storage and view options.
pub(crate) fn option_list(dp: &Deparser, options: &[Node], ctx: Context) -> Result<TokenStream> {
    let mut ts = TokenStream::new();
    ts.parenthesized(dp.list(options, ctx)?);
    Ok(ts)
}

/// A dotted name, a bare name, or any other object reference node.
pub(crate) fn object_name(dp: &Deparser, node: &Node, owner: &'static str, ctx: Context) -> Result<TokenStream> {
    match node {
        Node::List(list) => qualified_name(&list.items, owner),
        Node::String(s) => Ok(Token::Ident(s.sval.clone()).into()),
        other => dp.node(other, ctx),
    }
}

/// Keyword for `object`, or `UnhandledVariant` naming `owner`.
fn required_keyword(object: &ObjectType, owner: &'static str) -> Result<&'static str> {
    object_keyword(object).ok_or_else(|| DeparseError::variant(owner, object.as_tag().to_string()))
}

/// An object reference shaped by its object type.
///
/// Operator classes and families carry their access method first and render
/// as `name USING method`. An aggregate without arguments is `name(*)`.
pub(crate) fn object_reference(
    dp: &Deparser,
    object_type: &ObjectType,
    node: &Node,
    owner: &'static str,
    ctx: Context,
) -> Result<TokenStream> {
    match (object_type, node) {
        (ObjectType::OpClass | ObjectType::OpFamily, Node::List(list)) => {
            let Some((method, name)) = list.items.split_first() else {
                return Err(DeparseError::malformed(owner, "empty object name"));
            };
            let method = method
                .as_str()
                .ok_or_else(|| DeparseError::malformed(owner, "access method must be a name"))?;
            let mut ts = qualified_name(name, owner)?;
            ts.then("USING").space().ident(method.to_string());
            Ok(ts)
        }
        (ObjectType::Aggregate, Node::ObjectWithArgs(func))
            if func.objargs.is_empty() && !func.args_unspecified =>
        {
            let mut ts = qualified_name(&func.objname, owner)?;
            ts.parenthesized(TokenStream::from(Token::Star));
            Ok(ts)
        }
        (_, other) => object_name(dp, other, owner, ctx),
    }
}

/// `name ON table` for objects that live on a table.
fn object_on_table(node: &Node, owner: &'static str) -> Result<TokenStream> {
    let parts = strings(node.items(), owner)?;
    let Some((name, table)) = parts.split_last() else {
        return Err(DeparseError::malformed(owner, "empty object name"));
    };
    if table.is_empty() {
        return Err(DeparseError::malformed(owner, "object name lacks its table"));
    }
    let mut ts = TokenStream::from(Token::Ident(name.to_string()));
    ts.then("ON").space();
    ts.separated(
        table.iter().map(|p| TokenStream::from(Token::Ident(p.to_string()))),
        &[Token::Dot],
    );
    Ok(ts)
}

fn is_truthy(arg: Option<&Node>) -> bool {
    match arg {
        None => true,
        Some(Node::Boolean(b)) => b.boolval,
        Some(Node::Integer(n)) => n.ival != 0,
        Some(Node::String(s)) => matches!(s.sval.as_str(), "true" | "on" | "yes" | "1"),
        Some(_) => true,
    }
}

// =============================================================================
// Sequence options
// =============================================================================

fn sequence_option(dp: &Deparser, def: &DefElem, ctx: Context) -> Result<TokenStream> {
    let arg = def.arg.as_ref();
    let value = |field: &str| dp.required(arg, "DefElem", field, ctx);
    let mut ts = TokenStream::new();
    match def.defname.as_str() {
        "as" => {
            ts.keyword("AS").space().append(value("arg")?);
        }
        "increment" => {
            ts.keyword("INCREMENT BY").space().append(value("arg")?);
        }
        "start" => {
            ts.keyword("START WITH").space().append(value("arg")?);
        }
        "restart" => {
            ts.keyword("RESTART");
            if let Some(arg) = arg {
                ts.then("WITH").space().append(dp.node(arg, ctx)?);
            }
        }
        "minvalue" | "maxvalue" => {
            let keyword = if def.defname == "minvalue" { "MINVALUE" } else { "MAXVALUE" };
            match arg {
                Some(arg) => {
                    ts.keyword(keyword).space().append(dp.node(arg, ctx)?);
                }
                None => {
                    ts.keyword("NO").space().keyword(keyword);
                }
            }
        }
        "cache" => {
            ts.keyword("CACHE").space().append(value("arg")?);
        }
        "cycle" => {
            ts.keyword(if is_truthy(arg) { "CYCLE" } else { "NO CYCLE" });
        }
        "owned_by" => {
            let names = arg.map(Node::items).unwrap_or_default();
            match strings(names, "DefElem")?.as_slice() {
                ["none"] => ts.keyword("OWNED BY NONE"),
                _ => ts.keyword("OWNED BY").space().append(qualified_name(names, "DefElem")?),
            };
        }
        "sequence_name" => {
            let names = arg.map(Node::items).unwrap_or_default();
            ts.keyword("SEQUENCE NAME")
                .space()
                .append(qualified_name(names, "DefElem")?);
        }
        other => return Err(DeparseError::variant("DefElem", other)),
    }
    Ok(ts)
}

/// Space-separated sequence options.
fn sequence_options(dp: &Deparser, options: &[Node], ctx: Context) -> Result<TokenStream> {
    let parts = options
        .iter()
        .map(|node| match node {
            Node::DefElem(def) => sequence_option(dp, def, ctx),
            other => Err(DeparseError::malformed(
                "sequence options",
                format!("expected a DefElem, found {}", other.kind()),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    let mut ts = TokenStream::new();
    ts.separated(parts, &[Token::Space]);
    Ok(ts)
}

// =============================================================================
// Columns and constraints
// =============================================================================

impl Deparse for ColumnDef {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        if self.colname.is_empty() {
            return Err(DeparseError::missing("ColumnDef", "colname"));
        }
        let mut ts = TokenStream::from(Token::Ident(self.colname.clone()));
        if let Some(type_name) = &self.type_name {
            ts.space().append(dp.render(type_name, ctx)?);
        }
        if let Some(collate) = &self.coll_clause {
            ts.space().append(dp.render(collate, ctx)?);
        }
        for constraint in &self.constraints {
            ts.space().append(dp.node(constraint, ctx)?);
        }
        Ok(ts)
    }
}

fn fk_action(code: &str) -> Result<Option<&'static str>> {
    Ok(match code {
        "" | "a" => None,
        "r" => Some("RESTRICT"),
        "c" => Some("CASCADE"),
        "n" => Some("SET NULL"),
        "d" => Some("SET DEFAULT"),
        other => return Err(DeparseError::variant("Constraint", format!("action {other}"))),
    })
}

impl Constraint {
    fn expr(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        dp.required(self.raw_expr.as_ref(), "Constraint", "raw_expr", ctx.operand())
    }

    /// Key columns, INCLUDE, WITH and index tablespace of PRIMARY KEY/UNIQUE.
    fn index_parameters(&self, dp: &Deparser, ts: &mut TokenStream, ctx: Context) -> Result<()> {
        if !self.keys.is_empty() {
            ts.space().parenthesized(ident_list(&self.keys, "Constraint")?);
        }
        if !self.including.is_empty() {
            ts.then("INCLUDE")
                .space()
                .parenthesized(ident_list(&self.including, "Constraint")?);
        }
        if !self.options.is_empty() {
            ts.then("WITH").space().append(option_list(dp, &self.options, ctx)?);
        }
        if !self.indexspace.is_empty() {
            ts.then("USING INDEX TABLESPACE").space().ident(self.indexspace.clone());
        }
        Ok(())
    }

    fn foreign_key(&self, dp: &Deparser, ts: &mut TokenStream, ctx: Context) -> Result<()> {
        if !self.fk_attrs.is_empty() {
            ts.keyword("FOREIGN KEY")
                .space()
                .parenthesized(ident_list(&self.fk_attrs, "Constraint")?)
                .space();
        }
        let pktable = self
            .pktable
            .as_ref()
            .ok_or_else(|| DeparseError::missing("Constraint", "pktable"))?;
        ts.keyword("REFERENCES")
            .space()
            .append(dp.render(pktable, ctx)?)
            .append(column_names(&self.pk_attrs, "Constraint")?);
        match self.fk_matchtype.as_str() {
            "" | "s" => {}
            "f" => {
                ts.then("MATCH FULL");
            }
            "p" => {
                ts.then("MATCH PARTIAL");
            }
            other => return Err(DeparseError::variant("Constraint", format!("match {other}"))),
        }
        if let Some(action) = fk_action(&self.fk_del_action)? {
            ts.then("ON DELETE").then(action);
        }
        if let Some(action) = fk_action(&self.fk_upd_action)? {
            ts.then("ON UPDATE").then(action);
        }
        Ok(())
    }
}

impl Deparse for Constraint {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        if !self.conname.is_empty() {
            ts.keyword("CONSTRAINT").space().ident(self.conname.clone()).space();
        }

        let contype = self
            .contype
            .as_ref()
            .ok_or_else(|| DeparseError::missing("Constraint", "contype"))?;
        match contype {
            ConstrType::Null => {
                ts.keyword("NULL");
            }
            ConstrType::NotNull => {
                ts.keyword("NOT NULL");
            }
            ConstrType::Default => {
                ts.keyword("DEFAULT").space().append(self.expr(dp, ctx)?);
            }
            ConstrType::Identity => {
                let when = match self.generated_when.as_str() {
                    "a" | "" => "GENERATED ALWAYS AS IDENTITY",
                    "d" => "GENERATED BY DEFAULT AS IDENTITY",
                    other => {
                        return Err(DeparseError::variant("Constraint", format!("generated {other}")))
                    }
                };
                ts.keyword(when);
                if !self.options.is_empty() {
                    ts.space().parenthesized(sequence_options(dp, &self.options, ctx)?);
                }
            }
            ConstrType::Generated => {
                ts.keyword("GENERATED ALWAYS AS")
                    .space()
                    .parenthesized(self.expr(dp, ctx)?)
                    .then("STORED");
            }
            ConstrType::Check => {
                ts.keyword("CHECK").space().parenthesized(self.expr(dp, ctx)?);
                if self.is_no_inherit {
                    ts.then("NO INHERIT");
                }
            }
            ConstrType::Primary => {
                ts.keyword("PRIMARY KEY");
                self.index_parameters(dp, &mut ts, ctx)?;
            }
            ConstrType::Unique => {
                ts.keyword("UNIQUE");
                if self.nulls_not_distinct {
                    ts.then("NULLS NOT DISTINCT");
                }
                self.index_parameters(dp, &mut ts, ctx)?;
            }
            ConstrType::Foreign => self.foreign_key(dp, &mut ts, ctx)?,
            ConstrType::AttrDeferrable => {
                ts.keyword("DEFERRABLE");
            }
            ConstrType::AttrNotDeferrable => {
                ts.keyword("NOT DEFERRABLE");
            }
            ConstrType::AttrDeferred => {
                ts.keyword("INITIALLY DEFERRED");
            }
            ConstrType::AttrImmediate => {
                ts.keyword("INITIALLY IMMEDIATE");
            }
            ConstrType::Exclusion => {
                return Err(DeparseError::variant("Constraint", contype.as_tag().to_string()))
            }
            ConstrType::Unrecognized(value) => {
                return Err(DeparseError::variant("Constraint", value.clone()))
            }
        }

        if matches!(
            contype,
            ConstrType::Primary | ConstrType::Unique | ConstrType::Foreign | ConstrType::Check
        ) {
            if self.deferrable {
                ts.then("DEFERRABLE");
            }
            if self.initdeferred {
                ts.then("INITIALLY DEFERRED");
            }
            if self.skip_validation {
                ts.then("NOT VALID");
            }
        }
        Ok(ts)
    }
}

// =============================================================================
// CREATE TABLE
// =============================================================================

impl Deparse for PartitionSpec {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let strategy = match self.strategy.as_ref() {
            Some(PartitionStrategy::List) => "LIST",
            Some(PartitionStrategy::Range) => "RANGE",
            Some(PartitionStrategy::Hash) => "HASH",
            Some(PartitionStrategy::Unrecognized(value)) => {
                return Err(DeparseError::variant("PartitionSpec", value.clone()))
            }
            None => return Err(DeparseError::missing("PartitionSpec", "strategy")),
        };
        let mut ts = TokenStream::new();
        ts.keyword("PARTITION BY")
            .space()
            .keyword(strategy)
            .space()
            .parenthesized(dp.required_list(&self.part_params, "PartitionSpec", "partParams", ctx)?);
        Ok(ts)
    }
}

/// Column, `(expression)` or bare function call, used by index and
/// partition keys.
fn key_expression(
    dp: &Deparser,
    name: &str,
    expr: Option<&Node>,
    owner: &'static str,
    ctx: Context,
) -> Result<TokenStream> {
    match expr {
        Some(call @ Node::FuncCall(_)) => dp.node(call, ctx.operand()),
        Some(expr) => {
            let mut ts = TokenStream::new();
            ts.parenthesized(dp.node(expr, ctx.operand())?);
            Ok(ts)
        }
        None if name.is_empty() => Err(DeparseError::malformed(owner, "neither name nor expr")),
        None => Ok(Token::Ident(name.to_string()).into()),
    }
}

fn collation_and_opclass(
    ts: &mut TokenStream,
    collation: &[Node],
    opclass: &[Node],
    owner: &'static str,
) -> Result<()> {
    if !collation.is_empty() {
        ts.then("COLLATE").space().append(qualified_name(collation, owner)?);
    }
    if !opclass.is_empty() {
        ts.space().append(qualified_name(opclass, owner)?);
    }
    Ok(())
}

impl Deparse for PartitionElem {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = key_expression(dp, &self.name, self.expr.as_ref(), "PartitionElem", ctx)?;
        collation_and_opclass(&mut ts, &self.collation, &self.opclass, "PartitionElem")?;
        Ok(ts)
    }
}

impl Deparse for CreateStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let relation = self
            .relation
            .as_ref()
            .ok_or_else(|| DeparseError::missing("CreateStmt", "relation"))?;

        let mut ts = TokenStream::from(Token::Keyword("CREATE"));
        if let Some(keyword) = persistence_keyword(&relation.relpersistence) {
            ts.then(keyword);
        }
        ts.then("TABLE");
        if self.if_not_exists {
            ts.then("IF NOT EXISTS");
        }
        ts.space()
            .append(dp.render(relation, ctx)?)
            .space()
            .parenthesized(dp.list(&self.table_elts, ctx)?);

        if !self.inh_relations.is_empty() {
            ts.then("INHERITS")
                .space()
                .parenthesized(dp.list(&self.inh_relations, ctx)?);
        }
        if let Some(spec) = &self.partspec {
            ts.space().append(dp.render(spec, ctx)?);
        }
        if !self.options.is_empty() {
            ts.then("WITH").space().append(option_list(dp, &self.options, ctx)?);
        }
        match self.oncommit.as_ref() {
            None | Some(OnCommitAction::Noop) => {}
            Some(OnCommitAction::PreserveRows) => {
                ts.then("ON COMMIT PRESERVE ROWS");
            }
            Some(OnCommitAction::DeleteRows) => {
                ts.then("ON COMMIT DELETE ROWS");
            }
            Some(OnCommitAction::Drop) => {
                ts.then("ON COMMIT DROP");
            }
            Some(OnCommitAction::Unrecognized(value)) => {
                return Err(DeparseError::variant("CreateStmt", value.clone()))
            }
        }
        if !self.tablespacename.is_empty() {
            ts.then("TABLESPACE").space().ident(self.tablespacename.clone());
        }
        Ok(ts)
    }
}

// =============================================================================
// ALTER TABLE
// =============================================================================

impl AlterTableCmd {
    fn column(&self) -> Result<TokenStream> {
        if self.name.is_empty() {
            return Err(DeparseError::missing("AlterTableCmd", "name"));
        }
        let mut ts = TokenStream::from(Token::Keyword("ALTER COLUMN"));
        ts.space().ident(self.name.clone());
        Ok(ts)
    }

    fn def(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        dp.required(self.def.as_ref(), "AlterTableCmd", "def", ctx)
    }

    fn named(&self, keyword: &'static str) -> Result<TokenStream> {
        if self.name.is_empty() {
            return Err(DeparseError::missing("AlterTableCmd", "name"));
        }
        let mut ts = TokenStream::from(Token::Keyword(keyword));
        if self.missing_ok {
            ts.then("IF EXISTS");
        }
        ts.space().ident(self.name.clone());
        Ok(ts)
    }
}

impl Deparse for AlterTableCmd {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let subtype = self
            .subtype
            .as_ref()
            .ok_or_else(|| DeparseError::missing("AlterTableCmd", "subtype"))?;

        let mut ts = TokenStream::new();
        match subtype {
            AlterTableType::AddColumn => {
                ts.keyword("ADD COLUMN");
                if self.missing_ok {
                    ts.then("IF NOT EXISTS");
                }
                ts.space().append(self.def(dp, ctx)?);
            }
            AlterTableType::ColumnDefault => {
                ts.append(self.column()?);
                match &self.def {
                    Some(expr) => {
                        ts.then("SET DEFAULT").space().append(dp.node(expr, ctx)?);
                    }
                    None => {
                        ts.then("DROP DEFAULT");
                    }
                }
            }
            AlterTableType::DropNotNull => {
                ts.append(self.column()?).then("DROP NOT NULL");
            }
            AlterTableType::SetNotNull => {
                ts.append(self.column()?).then("SET NOT NULL");
            }
            AlterTableType::SetStatistics => {
                ts.append(self.column()?)
                    .then("SET STATISTICS")
                    .space()
                    .append(self.def(dp, ctx)?);
            }
            AlterTableType::DropColumn => {
                ts.append(self.named("DROP COLUMN")?);
                drop_behavior(&mut ts, self.behavior.as_ref(), "AlterTableCmd")?;
            }
            AlterTableType::AlterColumnType => {
                let Some(Node::ColumnDef(def)) = &self.def else {
                    return Err(DeparseError::missing("AlterTableCmd", "def"));
                };
                let type_name = def
                    .type_name
                    .as_ref()
                    .ok_or_else(|| DeparseError::missing("ColumnDef", "typeName"))?;
                ts.append(self.column()?)
                    .then("TYPE")
                    .space()
                    .append(dp.render(type_name, ctx)?);
                if let Some(collate) = &def.coll_clause {
                    ts.space().append(dp.render(collate, ctx)?);
                }
                if let Some(using) = &def.raw_default {
                    ts.then("USING").space().append(dp.node(using, ctx)?);
                }
            }
            AlterTableType::AddConstraint => {
                ts.keyword("ADD").space().append(self.def(dp, ctx)?);
            }
            AlterTableType::ValidateConstraint => {
                if self.name.is_empty() {
                    return Err(DeparseError::missing("AlterTableCmd", "name"));
                }
                ts.keyword("VALIDATE CONSTRAINT").space().ident(self.name.clone());
            }
            AlterTableType::DropConstraint => {
                ts.append(self.named("DROP CONSTRAINT")?);
                drop_behavior(&mut ts, self.behavior.as_ref(), "AlterTableCmd")?;
            }
            AlterTableType::ChangeOwner => {
                let owner = self
                    .newowner
                    .as_ref()
                    .ok_or_else(|| DeparseError::missing("AlterTableCmd", "newowner"))?;
                ts.keyword("OWNER TO").space().append(dp.render(owner, ctx)?);
            }
            AlterTableType::SetRelOptions => {
                let options = self.def.as_ref().map(Node::items).unwrap_or_default();
                ts.keyword("SET").space().append(option_list(dp, options, ctx)?);
            }
            AlterTableType::ResetRelOptions => {
                let options = self.def.as_ref().map(Node::items).unwrap_or_default();
                let names = options
                    .iter()
                    .map(|node| match node {
                        Node::DefElem(def) => Ok(TokenStream::from(Token::Ident(def.defname.clone()))),
                        other => dp.node(other, ctx),
                    })
                    .collect::<Result<Vec<_>>>()?;
                let mut list = TokenStream::new();
                list.comma_separated(names);
                ts.keyword("RESET").space().parenthesized(list);
            }
            AlterTableType::SetTableSpace => {
                ts.keyword("SET TABLESPACE").space().ident(self.name.clone());
            }
            AlterTableType::EnableRowSecurity => {
                ts.keyword("ENABLE ROW LEVEL SECURITY");
            }
            AlterTableType::DisableRowSecurity => {
                ts.keyword("DISABLE ROW LEVEL SECURITY");
            }
            AlterTableType::ForceRowSecurity => {
                ts.keyword("FORCE ROW LEVEL SECURITY");
            }
            AlterTableType::NoForceRowSecurity => {
                ts.keyword("NO FORCE ROW LEVEL SECURITY");
            }
            AlterTableType::Unrecognized(value) => {
                return Err(DeparseError::variant("AlterTableCmd", value.clone()))
            }
        }
        Ok(ts)
    }
}

impl Deparse for AlterTableStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let keyword = match self.objtype.as_ref() {
            None => "TABLE",
            Some(objtype) => object_keyword(objtype)
                .ok_or_else(|| DeparseError::variant("AlterTableStmt", objtype.as_tag().to_string()))?,
        };
        let mut ts = TokenStream::from(Token::Keyword("ALTER"));
        ts.then(keyword);
        if self.missing_ok {
            ts.then("IF EXISTS");
        }
        ts.space()
            .append(dp.relation(self.relation.as_ref(), "AlterTableStmt", ctx)?)
            .space()
            .append(dp.required_list(&self.cmds, "AlterTableStmt", "cmds", ctx)?);
        Ok(ts)
    }
}

// =============================================================================
// DROP / TRUNCATE
// =============================================================================

impl Deparse for DropStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let remove_type = self
            .remove_type
            .as_ref()
            .ok_or_else(|| DeparseError::missing("DropStmt", "removeType"))?;
        let keyword = object_keyword(remove_type)
            .ok_or_else(|| DeparseError::variant("DropStmt", remove_type.as_tag().to_string()))?;
        if self.objects.is_empty() {
            return Err(DeparseError::missing("DropStmt", "objects"));
        }

        let on_table = matches!(
            remove_type,
            ObjectType::Policy | ObjectType::Trigger | ObjectType::Rule
        );
        let objects = self
            .objects
            .iter()
            .map(|object| {
                if on_table {
                    object_on_table(object, "DropStmt")
                } else {
                    object_reference(dp, remove_type, object, "DropStmt", ctx)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let mut ts = TokenStream::from(Token::Keyword("DROP"));
        ts.then(keyword);
        if self.concurrent {
            ts.then("CONCURRENTLY");
        }
        if self.missing_ok {
            ts.then("IF EXISTS");
        }
        ts.space().comma_separated(objects);
        drop_behavior(&mut ts, self.behavior.as_ref(), "DropStmt")?;
        Ok(ts)
    }
}

impl Deparse for TruncateStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let relations =
            dp.required_list(&self.relations, "TruncateStmt", "relations", ctx.operand())?;
        let mut ts = TokenStream::from(Token::Keyword("TRUNCATE"));
        ts.space().append(relations);
        if self.restart_seqs {
            ts.then("RESTART IDENTITY");
        }
        drop_behavior(&mut ts, self.behavior.as_ref(), "TruncateStmt")?;
        Ok(ts)
    }
}

// =============================================================================
// CREATE INDEX
// =============================================================================

impl Deparse for IndexElem {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = key_expression(dp, &self.name, self.expr.as_ref(), "IndexElem", ctx)?;
        collation_and_opclass(&mut ts, &self.collation, &self.opclass, "IndexElem")?;
        match self.ordering.as_ref() {
            None | Some(SortByDir::Default) => {}
            Some(SortByDir::Asc) => {
                ts.then("ASC");
            }
            Some(SortByDir::Desc) => {
                ts.then("DESC");
            }
            Some(other) => return Err(DeparseError::variant("IndexElem", other.as_tag().to_string())),
        }
        match self.nulls_ordering.as_ref() {
            None | Some(SortByNulls::Default) => {}
            Some(SortByNulls::First) => {
                ts.then("NULLS FIRST");
            }
            Some(SortByNulls::Last) => {
                ts.then("NULLS LAST");
            }
            Some(SortByNulls::Unrecognized(value)) => {
                return Err(DeparseError::variant("IndexElem", value.clone()))
            }
        }
        Ok(ts)
    }
}

impl Deparse for IndexStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = TokenStream::from(Token::Keyword("CREATE"));
        if self.unique {
            ts.then("UNIQUE");
        }
        ts.then("INDEX");
        if self.concurrent {
            ts.then("CONCURRENTLY");
        }
        if self.if_not_exists {
            ts.then("IF NOT EXISTS");
        }
        if !self.idxname.is_empty() {
            ts.space().ident(self.idxname.clone());
        }
        ts.then("ON")
            .space()
            .append(dp.relation(self.relation.as_ref(), "IndexStmt", ctx)?);

        // btree is what the parser fills in when USING is absent.
        if !self.access_method.is_empty() && self.access_method != "btree" {
            ts.then("USING").space();
            if is_plain_identifier(&self.access_method) {
                ts.push(Token::Raw(self.access_method.to_uppercase()));
            } else {
                ts.ident(self.access_method.clone());
            }
        }

        ts.space().parenthesized(dp.required_list(
            &self.index_params,
            "IndexStmt",
            "indexParams",
            ctx,
        )?);
        if !self.index_including_params.is_empty() {
            ts.then("INCLUDE")
                .space()
                .parenthesized(dp.list(&self.index_including_params, ctx)?);
        }
        if self.nulls_not_distinct {
            ts.then("NULLS NOT DISTINCT");
        }
        if !self.options.is_empty() {
            ts.then("WITH").space().append(option_list(dp, &self.options, ctx)?);
        }
        if !self.table_space.is_empty() {
            ts.then("TABLESPACE").space().ident(self.table_space.clone());
        }
        if let Some(cond) = &self.where_clause {
            ts.then("WHERE").space().append(dp.node(cond, ctx)?);
        }
        Ok(ts)
    }
}

// =============================================================================
// Schemas, views, sequences, extensions
// =============================================================================

impl Deparse for CreateSchemaStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::from(Token::Keyword("CREATE SCHEMA"));
        if self.if_not_exists {
            ts.then("IF NOT EXISTS");
        }
        if !self.schemaname.is_empty() {
            ts.space().ident(self.schemaname.clone());
        }
        if let Some(role) = &self.authrole {
            ts.then("AUTHORIZATION").space().append(dp.render(role, ctx)?);
        }
        if self.schemaname.is_empty() && self.authrole.is_none() {
            return Err(DeparseError::missing("CreateSchemaStmt", "schemaname"));
        }
        for element in &self.schema_elts {
            ts.space().append(dp.node(element, ctx.operand())?);
        }
        Ok(ts)
    }
}

impl Deparse for ViewStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| DeparseError::missing("ViewStmt", "view"))?;
        let query = dp.required(self.query.as_ref(), "ViewStmt", "query", ctx)?;

        let mut ts = TokenStream::from(Token::Keyword("CREATE"));
        if self.replace {
            ts.then("OR REPLACE");
        }
        if let Some(keyword) = persistence_keyword(&view.relpersistence) {
            ts.then(keyword);
        }
        ts.then("VIEW")
            .space()
            .append(dp.render(view, ctx)?)
            .append(column_names(&self.aliases, "ViewStmt")?);
        if !self.options.is_empty() {
            ts.then("WITH").space().append(option_list(dp, &self.options, ctx)?);
        }
        ts.then("AS").space().append(query);
        match self.with_check_option.as_ref() {
            None | Some(ViewCheckOption::NoCheck) => {}
            Some(ViewCheckOption::Local) => {
                ts.then("WITH LOCAL CHECK OPTION");
            }
            Some(ViewCheckOption::Cascaded) => {
                ts.then("WITH CHECK OPTION");
            }
            Some(ViewCheckOption::Unrecognized(value)) => {
                return Err(DeparseError::variant("ViewStmt", value.clone()))
            }
        }
        Ok(ts)
    }
}

impl Deparse for CreateSeqStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let sequence = self
            .sequence
            .as_ref()
            .ok_or_else(|| DeparseError::missing("CreateSeqStmt", "sequence"))?;
        let mut ts = TokenStream::from(Token::Keyword("CREATE"));
        if let Some(keyword) = persistence_keyword(&sequence.relpersistence) {
            ts.then(keyword);
        }
        ts.then("SEQUENCE");
        if self.if_not_exists {
            ts.then("IF NOT EXISTS");
        }
        ts.space().append(dp.render(sequence, ctx)?);
        if !self.options.is_empty() {
            ts.space().append(sequence_options(dp, &self.options, ctx)?);
        }
        Ok(ts)
    }
}

impl Deparse for AlterSeqStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let sequence = self
            .sequence
            .as_ref()
            .ok_or_else(|| DeparseError::missing("AlterSeqStmt", "sequence"))?;
        if self.options.is_empty() {
            return Err(DeparseError::missing("AlterSeqStmt", "options"));
        }
        let mut ts = TokenStream::from(Token::Keyword("ALTER SEQUENCE"));
        if self.missing_ok {
            ts.then("IF EXISTS");
        }
        ts.space()
            .append(dp.render(sequence, ctx)?)
            .space()
            .append(sequence_options(dp, &self.options, ctx)?);
        Ok(ts)
    }
}

impl Deparse for CreateExtensionStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        if self.extname.is_empty() {
            return Err(DeparseError::missing("CreateExtensionStmt", "extname"));
        }
        let mut ts = TokenStream::from(Token::Keyword("CREATE EXTENSION"));
        if self.if_not_exists {
            ts.then("IF NOT EXISTS");
        }
        ts.space().ident(self.extname.clone());

        for option in &self.options {
            let Node::DefElem(def) = option else {
                return Err(DeparseError::malformed(
                    "CreateExtensionStmt",
                    format!("expected a DefElem, found {}", option.kind()),
                ));
            };
            match def.defname.as_str() {
                "schema" => {
                    let schema = def
                        .arg
                        .as_ref()
                        .and_then(Node::as_str)
                        .ok_or_else(|| DeparseError::missing("DefElem", "arg"))?;
                    ts.then("SCHEMA").space().ident(schema.to_string());
                }
                "new_version" => {
                    let version = dp.required(def.arg.as_ref(), "DefElem", "arg", ctx.as_literal())?;
                    ts.then("VERSION").space().append(version);
                }
                "cascade" => {
                    if is_truthy(def.arg.as_ref()) {
                        ts.then("CASCADE");
                    }
                }
                other => return Err(DeparseError::variant("DefElem", other)),
            }
        }
        Ok(ts)
    }
}

// =============================================================================
// Generic ALTER: RENAME, OWNER TO, SET SCHEMA, function attributes
// =============================================================================

/// The object an ALTER applies to: a relation, another object, or a bare name.
fn alter_target(
    dp: &Deparser,
    object_type: &ObjectType,
    relation: Option<&RangeVar>,
    object: Option<&Node>,
    name: &str,
    owner: &'static str,
    ctx: Context,
) -> Result<TokenStream> {
    match (relation, object) {
        (Some(relation), _) => dp.render(relation, ctx),
        (None, Some(object)) => object_reference(dp, object_type, object, owner, ctx),
        (None, None) if !name.is_empty() => Ok(Token::Ident(name.to_string()).into()),
        (None, None) => Err(DeparseError::missing(owner, "object")),
    }
}

impl RenameStmt {
    fn rename_type(&self) -> Result<&ObjectType> {
        self.rename_type
            .as_ref()
            .ok_or_else(|| DeparseError::missing("RenameStmt", "renameType"))
    }

    fn subname(&self) -> Result<TokenStream> {
        if self.subname.is_empty() {
            return Err(DeparseError::missing("RenameStmt", "subname"));
        }
        Ok(Token::Ident(self.subname.clone()).into())
    }

    /// `ALTER <keyword> [IF EXISTS]`.
    fn head(&self, keyword: &'static str) -> TokenStream {
        let mut ts = TokenStream::from(Token::Keyword("ALTER"));
        ts.then(keyword);
        if self.missing_ok {
            ts.then("IF EXISTS");
        }
        ts
    }
}

impl Deparse for RenameStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let rename_type = self.rename_type()?;
        if self.newname.is_empty() {
            return Err(DeparseError::missing("RenameStmt", "newname"));
        }
        let relation = || dp.relation(self.relation.as_ref(), "RenameStmt", ctx);

        let mut ts = match rename_type {
            ObjectType::Column | ObjectType::Attribute => {
                let holder = match self.relation_type.as_ref() {
                    None => "TABLE",
                    Some(holder) => required_keyword(holder, "RenameStmt")?,
                };
                let noun = if *rename_type == ObjectType::Attribute {
                    "ATTRIBUTE"
                } else {
                    "COLUMN"
                };
                let mut ts = self.head(holder);
                ts.space().append(relation()?).then("RENAME").then(noun).space();
                ts.append(self.subname()?);
                ts
            }
            ObjectType::TabConstraint => {
                let mut ts = self.head("TABLE");
                ts.space().append(relation()?).then("RENAME CONSTRAINT").space();
                ts.append(self.subname()?);
                ts
            }
            ObjectType::DomConstraint => {
                let domain = self
                    .object
                    .as_ref()
                    .ok_or_else(|| DeparseError::missing("RenameStmt", "object"))?;
                let mut ts = self.head("DOMAIN");
                ts.space()
                    .append(object_name(dp, domain, "RenameStmt", ctx)?)
                    .then("RENAME CONSTRAINT")
                    .space()
                    .append(self.subname()?);
                ts
            }
            ObjectType::Policy | ObjectType::Trigger | ObjectType::Rule => {
                let mut ts = self.head(required_keyword(rename_type, "RenameStmt")?);
                ts.space()
                    .append(self.subname()?)
                    .then("ON")
                    .space()
                    .append(relation()?)
                    .then("RENAME");
                ts
            }
            other => {
                let mut ts = self.head(required_keyword(other, "RenameStmt")?);
                ts.space()
                    .append(alter_target(
                        dp,
                        other,
                        self.relation.as_ref(),
                        self.object.as_ref(),
                        &self.subname,
                        "RenameStmt",
                        ctx,
                    )?)
                    .then("RENAME");
                ts
            }
        };
        ts.then("TO").space().ident(self.newname.clone());
        if *rename_type == ObjectType::Attribute {
            drop_behavior(&mut ts, self.behavior.as_ref(), "RenameStmt")?;
        }
        Ok(ts)
    }
}

impl Deparse for AlterOwnerStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let object_type = self
            .object_type
            .as_ref()
            .ok_or_else(|| DeparseError::missing("AlterOwnerStmt", "objectType"))?;
        let newowner = self
            .newowner
            .as_ref()
            .ok_or_else(|| DeparseError::missing("AlterOwnerStmt", "newowner"))?;

        let mut ts = TokenStream::from(Token::Keyword("ALTER"));
        ts.then(required_keyword(object_type, "AlterOwnerStmt")?)
            .space()
            .append(alter_target(
                dp,
                object_type,
                self.relation.as_ref(),
                self.object.as_ref(),
                "",
                "AlterOwnerStmt",
                ctx,
            )?)
            .then("OWNER TO")
            .space()
            .append(dp.render(newowner, ctx)?);
        Ok(ts)
    }
}

impl Deparse for AlterObjectSchemaStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let object_type = self
            .object_type
            .as_ref()
            .ok_or_else(|| DeparseError::missing("AlterObjectSchemaStmt", "objectType"))?;
        if self.newschema.is_empty() {
            return Err(DeparseError::missing("AlterObjectSchemaStmt", "newschema"));
        }

        let mut ts = TokenStream::from(Token::Keyword("ALTER"));
        ts.then(required_keyword(object_type, "AlterObjectSchemaStmt")?);
        if self.missing_ok {
            ts.then("IF EXISTS");
        }
        ts.space()
            .append(alter_target(
                dp,
                object_type,
                self.relation.as_ref(),
                self.object.as_ref(),
                "",
                "AlterObjectSchemaStmt",
                ctx,
            )?)
            .then("SET SCHEMA")
            .space()
            .ident(self.newschema.clone());
        Ok(ts)
    }
}

/// One attribute of `ALTER FUNCTION`.
fn function_action(dp: &Deparser, def: &DefElem, ctx: Context) -> Result<TokenStream> {
    let arg = def.arg.as_ref();
    let word = |field: &str| {
        arg.and_then(Node::as_str)
            .map(str::to_uppercase)
            .ok_or_else(|| DeparseError::missing("DefElem", field))
    };
    let mut ts = TokenStream::new();
    match def.defname.as_str() {
        "volatility" => {
            ts.push(Token::Raw(word("arg")?));
        }
        "parallel" => {
            ts.keyword("PARALLEL").space().push(Token::Raw(word("arg")?));
        }
        "strict" => {
            ts.keyword(if is_truthy(arg) { "STRICT" } else { "CALLED ON NULL INPUT" });
        }
        "security" => {
            ts.keyword(if is_truthy(arg) { "SECURITY DEFINER" } else { "SECURITY INVOKER" });
        }
        "leakproof" => {
            ts.keyword(if is_truthy(arg) { "LEAKPROOF" } else { "NOT LEAKPROOF" });
        }
        "cost" | "rows" => {
            let keyword = if def.defname == "cost" { "COST" } else { "ROWS" };
            ts.keyword(keyword)
                .space()
                .append(dp.required(arg, "DefElem", "arg", ctx)?);
        }
        "support" => {
            let names = arg.map(Node::items).unwrap_or_default();
            ts.keyword("SUPPORT").space().append(qualified_name(names, "DefElem")?);
        }
        "set" => {
            ts.append(dp.required(arg, "DefElem", "arg", ctx)?);
        }
        other => return Err(DeparseError::variant("DefElem", other)),
    }
    Ok(ts)
}

impl Deparse for AlterFunctionStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let keyword = match self.objtype.as_ref() {
            None => "FUNCTION",
            Some(
                objtype @ (ObjectType::Function | ObjectType::Procedure | ObjectType::Routine),
            ) => required_keyword(objtype, "AlterFunctionStmt")?,
            Some(other) => {
                return Err(DeparseError::variant("AlterFunctionStmt", other.as_tag().to_string()))
            }
        };
        let func = self
            .func
            .as_ref()
            .ok_or_else(|| DeparseError::missing("AlterFunctionStmt", "func"))?;
        if self.actions.is_empty() {
            return Err(DeparseError::missing("AlterFunctionStmt", "actions"));
        }
        let actions = self
            .actions
            .iter()
            .map(|node| match node {
                Node::DefElem(def) => function_action(dp, def, ctx),
                other => Err(DeparseError::malformed(
                    "AlterFunctionStmt",
                    format!("expected a DefElem, found {}", other.kind()),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut ts = TokenStream::from(Token::Keyword("ALTER"));
        ts.then(keyword).space().append(dp.render(func, ctx)?).space();
        ts.separated(actions, &[Token::Space]);
        Ok(ts)
    }
}

// =============================================================================
// Row-level security policies
// =============================================================================

fn policy_command(cmd: &str) -> Result<Option<&'static str>> {
    Ok(match cmd {
        "" | "all" => None,
        "select" => Some("SELECT"),
        "insert" => Some("INSERT"),
        "update" => Some("UPDATE"),
        "delete" => Some("DELETE"),
        other => return Err(DeparseError::variant("CreatePolicyStmt", other)),
    })
}

/// `TO roles`, `USING (qual)` and `WITH CHECK (expr)` shared by CREATE and
/// ALTER POLICY.
fn policy_tail(
    dp: &Deparser,
    ts: &mut TokenStream,
    roles: &[Node],
    qual: Option<&Node>,
    with_check: Option<&Node>,
    ctx: Context,
) -> Result<()> {
    if !roles.is_empty() {
        ts.then("TO").space().append(dp.list(roles, ctx)?);
    }
    if let Some(qual) = qual {
        ts.then("USING").space().parenthesized(dp.node(qual, ctx)?);
    }
    if let Some(check) = with_check {
        ts.then("WITH CHECK").space().parenthesized(dp.node(check, ctx)?);
    }
    Ok(())
}

fn policy_head(
    dp: &Deparser,
    keyword: &'static str,
    name: &str,
    table: Option<&RangeVar>,
    owner: &'static str,
    ctx: Context,
) -> Result<TokenStream> {
    if name.is_empty() {
        return Err(DeparseError::missing(owner, "policy_name"));
    }
    let table = table.ok_or_else(|| DeparseError::missing(owner, "table"))?;
    let mut ts = TokenStream::from(Token::Keyword(keyword));
    ts.space()
        .ident(name.to_string())
        .then("ON")
        .space()
        .append(dp.render(table, ctx)?);
    Ok(ts)
}

impl Deparse for CreatePolicyStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = policy_head(
            dp,
            "CREATE POLICY",
            &self.policy_name,
            self.table.as_ref(),
            "CreatePolicyStmt",
            ctx,
        )?;
        if self.permissive == Some(false) {
            ts.then("AS RESTRICTIVE");
        }
        if let Some(cmd) = policy_command(&self.cmd_name)? {
            ts.then("FOR").then(cmd);
        }
        policy_tail(
            dp,
            &mut ts,
            &self.roles,
            self.qual.as_ref(),
            self.with_check.as_ref(),
            ctx,
        )?;
        Ok(ts)
    }
}

impl Deparse for AlterPolicyStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = policy_head(
            dp,
            "ALTER POLICY",
            &self.policy_name,
            self.table.as_ref(),
            "AlterPolicyStmt",
            ctx,
        )?;
        policy_tail(
            dp,
            &mut ts,
            &self.roles,
            self.qual.as_ref(),
            self.with_check.as_ref(),
            ctx,
        )?;
        Ok(ts)
    }
}
