//! Node dispatch and the public deparser.
//!
//! Every payload type implements [`Deparse`]. [`Deparser::node`] routes a
//! [`Node`] to its payload with one exhaustive match, so a node kind added to
//! the model without a renderer does not compile. Every render goes through
//! [`Deparser::render`], which enforces the depth limit and tags errors with
//! the kind of the node that failed.

use serde_json::Value;
use tracing::{debug, trace};

use super::context::Context;
use super::token::{Layout, Token, TokenStream};
use crate::ast::{self, Node, RangeVar, Statement, Tagged};
use crate::config::DeparseOptions;
use crate::error::{DeparseError, Result};

/// JSON levels allowed per node level before input is refused unread.
const JSON_LEVELS_PER_NODE: usize = 3;

/// Render a payload to tokens.
pub trait Deparse {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream>;
}

/// Renders parse trees back to SQL text.
///
/// A `Deparser` holds only its options; it is `Send + Sync` and may render
/// many statements concurrently.
#[derive(Debug, Clone, Default)]
pub struct Deparser {
    options: DeparseOptions,
}

impl Deparser {
    pub fn new(options: DeparseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DeparseOptions {
        &self.options
    }

    /// Render any accepted input shape.
    pub fn deparse_value(&self, input: &Value) -> Result<String> {
        let limit = self.options.max_depth;
        if ast::json_depth(input) > limit.saturating_mul(JSON_LEVELS_PER_NODE) {
            return Err(DeparseError::DepthLimitExceeded { limit });
        }
        let statements = ast::parse_statements(input)?;
        self.deparse_statements(&statements)
    }

    /// Render any accepted input shape given as JSON text.
    ///
    /// Nesting is checked against the depth limit before the text is parsed.
    pub fn deparse_json(&self, json: &str) -> Result<String> {
        let limit = self.options.max_depth;
        if ast::text_depth(json) > limit.saturating_mul(JSON_LEVELS_PER_NODE) {
            return Err(DeparseError::DepthLimitExceeded { limit });
        }
        let value = ast::read_json(json).map_err(DeparseError::InvalidJson)?;
        self.deparse_value(&value)
    }

    /// Render a single node as one top-level statement.
    pub fn deparse_node(&self, node: &Node) -> Result<String> {
        let statement = Statement::from_node(node.clone())?;
        self.deparse_statements(std::slice::from_ref(&statement))
    }

    /// Render statements, separated by a blank line.
    pub fn deparse_statements(&self, statements: &[Statement]) -> Result<String> {
        let layout = Layout::new(&self.options);
        let separator = layout.newline().repeat(2);

        let mut rendered = Vec::with_capacity(statements.len());
        for (index, statement) in statements.iter().enumerate() {
            debug!(index, kind = statement.node.kind(), "deparsing statement");
            let mut ts = self.node(&statement.node, Context::new())?;
            if statement.terminated {
                ts.push(Token::Semicolon);
            }
            rendered.push(ts.serialize(&layout));
        }
        Ok(rendered.join(&separator))
    }

    /// Render `payload` one level below `ctx`.
    pub fn render<T: Deparse + Tagged>(&self, payload: &T, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.descend();
        let limit = self.options.max_depth;
        if ctx.depth > limit {
            return Err(DeparseError::DepthLimitExceeded { limit });
        }
        trace!(kind = T::TAG, depth = ctx.depth, "render");
        stacker::maybe_grow(ast::RED_ZONE, ast::STACK_SEGMENT, || {
            payload.to_tokens(self, ctx).map_err(|err| match err {
                DeparseError::DepthLimitExceeded { .. } => err,
                err => err.within(T::TAG),
            })
        })
    }

    /// Dispatch a node to its renderer.
    pub fn node(&self, node: &Node, ctx: Context) -> Result<TokenStream> {
        match node {
            Node::String(n) => self.render(n.as_ref(), ctx),
            Node::Integer(n) => self.render(n.as_ref(), ctx),
            Node::Float(n) => self.render(n.as_ref(), ctx),
            Node::Boolean(n) => self.render(n.as_ref(), ctx),
            Node::BitString(n) => self.render(n.as_ref(), ctx),
            Node::Null(n) => self.render(n.as_ref(), ctx),
            Node::List(n) => self.render(n.as_ref(), ctx),
            Node::AStar(n) => self.render(n.as_ref(), ctx),

            Node::AConst(n) => self.render(n.as_ref(), ctx),
            Node::ColumnRef(n) => self.render(n.as_ref(), ctx),
            Node::ParamRef(n) => self.render(n.as_ref(), ctx),
            Node::AExpr(n) => self.render(n.as_ref(), ctx),
            Node::BoolExpr(n) => self.render(n.as_ref(), ctx),
            Node::NullTest(n) => self.render(n.as_ref(), ctx),
            Node::BooleanTest(n) => self.render(n.as_ref(), ctx),
            Node::FuncCall(n) => self.render(n.as_ref(), ctx),
            Node::WindowDef(n) => self.render(n.as_ref(), ctx),
            Node::TypeCast(n) => self.render(n.as_ref(), ctx),
            Node::TypeName(n) => self.render(n.as_ref(), ctx),
            Node::CaseExpr(n) => self.render(n.as_ref(), ctx),
            Node::CaseWhen(n) => self.render(n.as_ref(), ctx),
            Node::CoalesceExpr(n) => self.render(n.as_ref(), ctx),
            Node::MinMaxExpr(n) => self.render(n.as_ref(), ctx),
            Node::RowExpr(n) => self.render(n.as_ref(), ctx),
            Node::AArrayExpr(n) => self.render(n.as_ref(), ctx),
            Node::AIndirection(n) => self.render(n.as_ref(), ctx),
            Node::AIndices(n) => self.render(n.as_ref(), ctx),
            Node::SubLink(n) => self.render(n.as_ref(), ctx),
            Node::SqlValueFunction(n) => self.render(n.as_ref(), ctx),
            Node::NamedArgExpr(n) => self.render(n.as_ref(), ctx),
            Node::CollateClause(n) => self.render(n.as_ref(), ctx),
            Node::SetToDefault(n) => self.render(n.as_ref(), ctx),
            Node::GroupingSet(n) => self.render(n.as_ref(), ctx),
            Node::GroupingFunc(n) => self.render(n.as_ref(), ctx),
            Node::SortBy(n) => self.render(n.as_ref(), ctx),
            Node::ResTarget(n) => self.render(n.as_ref(), ctx),
            Node::MultiAssignRef(n) => self.render(n.as_ref(), ctx),

            Node::OpExpr(n) => self.render(n.as_ref(), ctx),
            Node::Aggref(n) => self.render(n.as_ref(), ctx),
            Node::WindowFunc(n) => self.render(n.as_ref(), ctx),
            Node::TargetEntry(n) => self.render(n.as_ref(), ctx),

            Node::RangeVar(n) => self.render(n.as_ref(), ctx),
            Node::Alias(n) => self.render(n.as_ref(), ctx),
            Node::JoinExpr(n) => self.render(n.as_ref(), ctx),
            Node::RangeSubselect(n) => self.render(n.as_ref(), ctx),
            Node::RangeFunction(n) => self.render(n.as_ref(), ctx),

            Node::WithClause(n) => self.render(n.as_ref(), ctx),
            Node::CommonTableExpr(n) => self.render(n.as_ref(), ctx),
            Node::OnConflictClause(n) => self.render(n.as_ref(), ctx),
            Node::InferClause(n) => self.render(n.as_ref(), ctx),
            Node::IndexElem(n) => self.render(n.as_ref(), ctx),
            Node::LockingClause(n) => self.render(n.as_ref(), ctx),
            Node::IntoClause(n) => self.render(n.as_ref(), ctx),
            Node::DefElem(n) => self.render(n.as_ref(), ctx),
            Node::RoleSpec(n) => self.render(n.as_ref(), ctx),
            Node::AccessPriv(n) => self.render(n.as_ref(), ctx),
            Node::ObjectWithArgs(n) => self.render(n.as_ref(), ctx),
            Node::PartitionSpec(n) => self.render(n.as_ref(), ctx),
            Node::PartitionElem(n) => self.render(n.as_ref(), ctx),
            Node::ColumnDef(n) => self.render(n.as_ref(), ctx),
            Node::Constraint(n) => self.render(n.as_ref(), ctx),
            Node::VacuumRelation(n) => self.render(n.as_ref(), ctx),
            Node::AlterTableCmd(n) => self.render(n.as_ref(), ctx),

            Node::RawStmt(n) => self.render(n.as_ref(), ctx),
            Node::SelectStmt(n) => self.render(n.as_ref(), ctx),
            Node::InsertStmt(n) => self.render(n.as_ref(), ctx),
            Node::UpdateStmt(n) => self.render(n.as_ref(), ctx),
            Node::DeleteStmt(n) => self.render(n.as_ref(), ctx),
            Node::CreateStmt(n) => self.render(n.as_ref(), ctx),
            Node::AlterTableStmt(n) => self.render(n.as_ref(), ctx),
            Node::DropStmt(n) => self.render(n.as_ref(), ctx),
            Node::TruncateStmt(n) => self.render(n.as_ref(), ctx),
            Node::IndexStmt(n) => self.render(n.as_ref(), ctx),
            Node::CreateSchemaStmt(n) => self.render(n.as_ref(), ctx),
            Node::ViewStmt(n) => self.render(n.as_ref(), ctx),
            Node::CreateSeqStmt(n) => self.render(n.as_ref(), ctx),
            Node::AlterSeqStmt(n) => self.render(n.as_ref(), ctx),
            Node::RenameStmt(n) => self.render(n.as_ref(), ctx),
            Node::AlterOwnerStmt(n) => self.render(n.as_ref(), ctx),
            Node::AlterObjectSchemaStmt(n) => self.render(n.as_ref(), ctx),
            Node::AlterFunctionStmt(n) => self.render(n.as_ref(), ctx),
            Node::CreateExtensionStmt(n) => self.render(n.as_ref(), ctx),
            Node::CreatePolicyStmt(n) => self.render(n.as_ref(), ctx),
            Node::AlterPolicyStmt(n) => self.render(n.as_ref(), ctx),
            Node::GrantStmt(n) => self.render(n.as_ref(), ctx),
            Node::GrantRoleStmt(n) => self.render(n.as_ref(), ctx),
            Node::AlterDefaultPrivilegesStmt(n) => self.render(n.as_ref(), ctx),
            Node::TransactionStmt(n) => self.render(n.as_ref(), ctx),
            Node::VacuumStmt(n) => self.render(n.as_ref(), ctx),
            Node::ExplainStmt(n) => self.render(n.as_ref(), ctx),
            Node::VariableSetStmt(n) => self.render(n.as_ref(), ctx),
            Node::VariableShowStmt(n) => self.render(n.as_ref(), ctx),
            Node::CopyStmt(n) => self.render(n.as_ref(), ctx),
            Node::LockStmt(n) => self.render(n.as_ref(), ctx),
            Node::NotifyStmt(n) => self.render(n.as_ref(), ctx),
            Node::ListenStmt(n) => self.render(n.as_ref(), ctx),
            Node::UnlistenStmt(n) => self.render(n.as_ref(), ctx),
        }
    }

    // ========================================================================
    // Helpers shared by the renderers
    // ========================================================================

    /// Render an optional node.
    pub(crate) fn opt_node(&self, node: Option<&Node>, ctx: Context) -> Result<Option<TokenStream>> {
        node.map(|n| self.node(n, ctx)).transpose()
    }

    /// Render a node the grammar requires.
    pub(crate) fn required(
        &self,
        node: Option<&Node>,
        owner: &'static str,
        field: &str,
        ctx: Context,
    ) -> Result<TokenStream> {
        match node {
            Some(n) => self.node(n, ctx),
            None => Err(DeparseError::missing(owner, field)),
        }
    }

    /// Render a required relation.
    pub(crate) fn relation(
        &self,
        relation: Option<&RangeVar>,
        owner: &'static str,
        ctx: Context,
    ) -> Result<TokenStream> {
        match relation {
            Some(rv) => self.render(rv, ctx),
            None => Err(DeparseError::missing(owner, "relation")),
        }
    }

    /// Render each node.
    pub(crate) fn each(&self, nodes: &[Node], ctx: Context) -> Result<Vec<TokenStream>> {
        nodes.iter().map(|n| self.node(n, ctx)).collect()
    }

    /// Render nodes separated by `, `.
    pub(crate) fn list(&self, nodes: &[Node], ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.comma_separated(self.each(nodes, ctx)?);
        Ok(ts)
    }

    /// Render a list the grammar requires to be non-empty.
    pub(crate) fn required_list(
        &self,
        nodes: &[Node],
        owner: &'static str,
        field: &str,
        ctx: Context,
    ) -> Result<TokenStream> {
        if nodes.is_empty() {
            return Err(DeparseError::missing(owner, field));
        }
        self.list(nodes, ctx)
    }

    /// Serialize tokens on one line, for text embedded in other tokens.
    pub(crate) fn inline(&self, ts: &TokenStream) -> String {
        ts.serialize(&Layout::compact())
    }
}

/// The texts of a sequence of `String` nodes.
pub(crate) fn strings<'a>(nodes: &'a [Node], owner: &'static str) -> Result<Vec<&'a str>> {
    nodes
        .iter()
        .map(|n| {
            n.as_str().ok_or_else(|| {
                DeparseError::malformed(owner, format!("expected a name, found {}", n.kind()))
            })
        })
        .collect()
}

/// Dot-joined identifiers, e.g. `schema.table` or `pg_catalog.count`.
pub(crate) fn qualified_name(nodes: &[Node], owner: &'static str) -> Result<TokenStream> {
    if nodes.is_empty() {
        return Err(DeparseError::malformed(owner, "empty qualified name"));
    }
    let mut ts = TokenStream::new();
    ts.separated(
        strings(nodes, owner)?
            .into_iter()
            .map(|part| TokenStream::from(Token::Ident(part.to_string()))),
        &[Token::Dot],
    );
    Ok(ts)
}

/// Comma-separated identifiers, e.g. a column list.
pub(crate) fn ident_list(nodes: &[Node], owner: &'static str) -> Result<TokenStream> {
    let mut ts = TokenStream::new();
    ts.comma_separated(
        strings(nodes, owner)?
            .into_iter()
            .map(|name| TokenStream::from(Token::Ident(name.to_string()))),
    );
    Ok(ts)
}
