//! Expression renderers.
//!
//! Covers value nodes, constants, operators, boolean connectives, function
//! calls with their window specifications, casts, constructors and sublinks,
//! plus the analyzed-tree nodes that name operators and functions by OID.

use super::catalog;
use super::context::Context;
use super::deparser::{qualified_name, strings, Deparse, Deparser};
use super::quote::{quote_bit_string, quote_identifier};
use super::token::{Token, TokenStream};
use super::types::{decode_typmod, interval_fields, resolve_type_name, INTERVAL_FULL_RANGE};
use crate::ast::*;
use crate::error::{DeparseError, Result};

/// Window frame option bits.
mod frame {
    pub const NONDEFAULT: i32 = 0x1;
    pub const RANGE: i32 = 0x2;
    pub const ROWS: i32 = 0x4;
    pub const GROUPS: i32 = 0x8;
    pub const BETWEEN: i32 = 0x10;
    pub const START_UNBOUNDED_PRECEDING: i32 = 0x20;
    pub const END_UNBOUNDED_FOLLOWING: i32 = 0x100;
    pub const START_CURRENT_ROW: i32 = 0x200;
    pub const END_CURRENT_ROW: i32 = 0x400;
    pub const START_OFFSET_PRECEDING: i32 = 0x800;
    pub const END_OFFSET_PRECEDING: i32 = 0x1000;
    pub const START_OFFSET_FOLLOWING: i32 = 0x2000;
    pub const END_OFFSET_FOLLOWING: i32 = 0x4000;
    pub const EXCLUDE_CURRENT_ROW: i32 = 0x8000;
    pub const EXCLUDE_GROUP: i32 = 0x10000;
    pub const EXCLUDE_TIES: i32 = 0x20000;
}

fn parens(inner: TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.parenthesized(inner);
    ts
}

/// Render an operator operand. Compound expressions are parenthesized so
/// precedence survives re-parsing.
pub(crate) fn operand(dp: &Deparser, node: &Node, ctx: Context) -> Result<TokenStream> {
    let ctx = ctx.operand();
    match node {
        Node::AExpr(_)
        | Node::BoolExpr(_)
        | Node::NullTest(_)
        | Node::BooleanTest(_)
        | Node::OpExpr(_) => Ok(parens(dp.node(node, ctx)?)),
        _ => dp.node(node, ctx),
    }
}

/// Render an argument of a boolean connective.
fn bool_arg(dp: &Deparser, node: &Node, ctx: Context) -> Result<TokenStream> {
    match node {
        Node::BoolExpr(_) => dp.node(node, ctx.operand().in_boolean_expr()),
        _ => dp.node(node, ctx.operand()),
    }
}

/// An operator name: a bare symbol, or `OPERATOR(schema.sym)` when qualified.
pub(crate) fn operator(name: &[Node], owner: &'static str) -> Result<Token> {
    let parts = strings(name, owner)?;
    match parts.as_slice() {
        [] => Err(DeparseError::missing(owner, "name")),
        [symbol] => Ok(Token::Operator(symbol.to_string())),
        [schema @ .., symbol] => {
            let schema: Vec<String> = schema.iter().map(|s| quote_identifier(s)).collect();
            Ok(Token::Operator(format!(
                "OPERATOR({}.{symbol})",
                schema.join(".")
            )))
        }
    }
}

/// Subscripts and field selections trailing an expression or target.
pub(crate) fn indirection(dp: &Deparser, nodes: &[Node], ctx: Context) -> Result<TokenStream> {
    let mut ts = TokenStream::new();
    for node in nodes {
        match node {
            Node::String(s) => {
                ts.push(Token::Dot).ident(s.sval.clone());
            }
            Node::AStar(_) => {
                ts.push(Token::Dot).push(Token::Star);
            }
            Node::AIndices(_) => {
                ts.append(dp.node(node, ctx.operand())?);
            }
            other => {
                return Err(DeparseError::malformed(
                    "indirection",
                    format!("unexpected {} node", other.kind()),
                ))
            }
        }
    }
    Ok(ts)
}

// ============================================================================
// Values and constants
// ============================================================================

impl Deparse for StringValue {
    fn to_tokens(&self, _dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        Ok(if ctx.literal {
            Token::LitString(self.sval.clone())
        } else {
            Token::Ident(self.sval.clone())
        }
        .into())
    }
}

impl Deparse for IntegerValue {
    fn to_tokens(&self, _dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        Ok(if ctx.literal {
            Token::LitString(self.ival.to_string())
        } else {
            Token::LitInt(self.ival)
        }
        .into())
    }
}

impl Deparse for FloatValue {
    fn to_tokens(&self, _dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        Ok(if ctx.literal {
            Token::LitString(self.fval.clone())
        } else {
            Token::Number(self.fval.clone())
        }
        .into())
    }
}

impl Deparse for BooleanValue {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        Ok(Token::Keyword(if self.boolval { "true" } else { "false" }).into())
    }
}

impl Deparse for BitStringValue {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        Ok(Token::Raw(quote_bit_string(&self.bsval)).into())
    }
}

impl Deparse for NullValue {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        Ok(Token::Keyword("NULL").into())
    }
}

impl Deparse for List {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        dp.list(&self.items, ctx)
    }
}

impl Deparse for AStar {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        Ok(Token::Star.into())
    }
}

/// A constant keeps the literal kind it was parsed with, in literal context
/// too. `5000` and `'5000'` parse to different constants, so quoting a
/// numeric constant would change the tree a re-parse produces. Literal
/// context only affects the untyped value nodes above.
impl Deparse for AConst {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        Ok(match &self.value {
            ConstValue::Integer(n) => Token::LitInt(*n),
            ConstValue::Float(text) => Token::Number(text.clone()),
            ConstValue::String(s) => Token::LitString(s.clone()),
            ConstValue::Boolean(b) => Token::Keyword(if *b { "true" } else { "false" }),
            ConstValue::BitString(bits) => Token::Raw(quote_bit_string(bits)),
            ConstValue::Null => Token::Keyword("NULL"),
        }
        .into())
    }
}

// ============================================================================
// References
// ============================================================================

impl Deparse for ColumnRef {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        if self.fields.is_empty() {
            return Err(DeparseError::missing("ColumnRef", "fields"));
        }
        let mut ts = TokenStream::new();
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                ts.push(Token::Dot);
            }
            match field {
                Node::String(s) => ts.ident(s.sval.clone()),
                Node::AStar(_) => ts.push(Token::Star),
                other => {
                    return Err(DeparseError::malformed(
                        "ColumnRef",
                        format!("unexpected {} field", other.kind()),
                    ))
                }
            };
        }
        Ok(ts)
    }
}

impl Deparse for ParamRef {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        Ok(Token::Raw(format!("${}", self.number)).into())
    }
}

// ============================================================================
// Operators and predicates
// ============================================================================

impl AExpr {
    fn left(&self) -> Result<&Node> {
        self.lexpr
            .as_ref()
            .ok_or_else(|| DeparseError::missing("A_Expr", "lexpr"))
    }

    fn right(&self) -> Result<&Node> {
        self.rexpr
            .as_ref()
            .ok_or_else(|| DeparseError::missing("A_Expr", "rexpr"))
    }

    fn symbol(&self) -> Result<&str> {
        strings(&self.name, "A_Expr")?
            .last()
            .copied()
            .ok_or_else(|| DeparseError::missing("A_Expr", "name"))
    }
}

/// Pattern of a LIKE-family predicate, unfolding the escape function the
/// parser wraps around `pattern ESCAPE char`.
fn pattern(dp: &Deparser, node: &Node, ctx: Context) -> Result<TokenStream> {
    if let Node::FuncCall(call) = node {
        let name = strings(&call.funcname, "FuncCall")?;
        if matches!(name.last(), Some(&("like_escape" | "similar_to_escape"))) {
            let mut ts = TokenStream::new();
            match call.args.as_slice() {
                [pat] => {
                    ts.append(operand(dp, pat, ctx)?);
                }
                [pat, escape] => {
                    ts.append(operand(dp, pat, ctx)?)
                        .then("ESCAPE")
                        .space()
                        .append(operand(dp, escape, ctx)?);
                }
                _ => return Err(DeparseError::malformed("FuncCall", "bad escape arguments")),
            }
            return Ok(ts);
        }
    }
    operand(dp, node, ctx)
}

impl Deparse for AExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let kind = self.kind.as_ref().unwrap_or(&AExprKind::Op);
        let mut ts = TokenStream::new();
        match kind {
            AExprKind::Op => {
                let op = operator(&self.name, "A_Expr")?;
                let right = operand(dp, self.right()?, ctx)?;
                match &self.lexpr {
                    Some(left) => {
                        ts.append(operand(dp, left, ctx)?).space().push(op).space().append(right);
                    }
                    None => {
                        ts.push(op).space().append(right);
                    }
                }
            }
            AExprKind::OpAny | AExprKind::OpAll => {
                let quantifier = if *kind == AExprKind::OpAny { "ANY" } else { "ALL" };
                ts.append(operand(dp, self.left()?, ctx)?)
                    .space()
                    .push(operator(&self.name, "A_Expr")?)
                    .space()
                    .keyword(quantifier)
                    .space()
                    .parenthesized(dp.node(self.right()?, ctx.operand())?);
            }
            AExprKind::Distinct | AExprKind::NotDistinct => {
                let keyword = if *kind == AExprKind::Distinct {
                    "IS DISTINCT FROM"
                } else {
                    "IS NOT DISTINCT FROM"
                };
                ts.append(operand(dp, self.left()?, ctx)?)
                    .then(keyword)
                    .space()
                    .append(operand(dp, self.right()?, ctx)?);
            }
            AExprKind::NullIf => {
                let mut args = TokenStream::new();
                args.append(dp.node(self.left()?, ctx.operand())?)
                    .comma()
                    .space()
                    .append(dp.node(self.right()?, ctx.operand())?);
                ts.keyword("NULLIF").parenthesized(args);
            }
            AExprKind::In => {
                let keyword = match self.symbol()? {
                    "=" => "IN",
                    "<>" => "NOT IN",
                    other => return Err(DeparseError::variant("A_Expr", format!("IN {other}"))),
                };
                ts.append(operand(dp, self.left()?, ctx)?)
                    .then(keyword)
                    .space()
                    .parenthesized(dp.list(self.right()?.items(), ctx.operand())?);
            }
            AExprKind::Like | AExprKind::ILike | AExprKind::Similar => {
                let negated = self.symbol()?.starts_with('!');
                let keyword = match (kind, negated) {
                    (AExprKind::Like, false) => "LIKE",
                    (AExprKind::Like, true) => "NOT LIKE",
                    (AExprKind::ILike, false) => "ILIKE",
                    (AExprKind::ILike, true) => "NOT ILIKE",
                    (_, false) => "SIMILAR TO",
                    (_, true) => "NOT SIMILAR TO",
                };
                ts.append(operand(dp, self.left()?, ctx)?)
                    .then(keyword)
                    .space()
                    .append(pattern(dp, self.right()?, ctx)?);
            }
            AExprKind::Between
            | AExprKind::NotBetween
            | AExprKind::BetweenSym
            | AExprKind::NotBetweenSym => {
                let keyword = match kind {
                    AExprKind::Between => "BETWEEN",
                    AExprKind::NotBetween => "NOT BETWEEN",
                    AExprKind::BetweenSym => "BETWEEN SYMMETRIC",
                    _ => "NOT BETWEEN SYMMETRIC",
                };
                let [low, high] = self.right()?.items() else {
                    return Err(DeparseError::malformed("A_Expr", "BETWEEN needs two bounds"));
                };
                ts.append(operand(dp, self.left()?, ctx)?)
                    .then(keyword)
                    .space()
                    .append(operand(dp, low, ctx)?)
                    .then("AND")
                    .space()
                    .append(operand(dp, high, ctx)?);
            }
            AExprKind::Unrecognized(value) => {
                return Err(DeparseError::variant("A_Expr", value.clone()))
            }
        }
        Ok(ts)
    }
}

impl Deparse for BoolExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let op = self
            .boolop
            .as_ref()
            .ok_or_else(|| DeparseError::missing("BoolExpr", "boolop"))?;
        let separator = match op {
            BoolExprType::And => "AND",
            BoolExprType::Or => "OR",
            BoolExprType::Not => {
                let [arg] = self.args.as_slice() else {
                    return Err(DeparseError::malformed("BoolExpr", "NOT takes one argument"));
                };
                let mut ts = TokenStream::new();
                ts.keyword("NOT").space().append(bool_arg(dp, arg, ctx)?);
                return Ok(ts);
            }
            BoolExprType::Unrecognized(value) => {
                return Err(DeparseError::variant("BoolExpr", value.clone()))
            }
        };
        if self.args.is_empty() {
            return Err(DeparseError::missing("BoolExpr", "args"));
        }

        let args = self
            .args
            .iter()
            .map(|arg| bool_arg(dp, arg, ctx))
            .collect::<Result<Vec<_>>>()?;
        let mut body = TokenStream::new();
        body.separated(
            args,
            &[Token::Space, Token::Keyword(separator), Token::Space],
        );

        Ok(if ctx.inside_boolean_expr {
            parens(body)
        } else {
            body
        })
    }
}

impl Deparse for NullTest {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let arg = self
            .arg
            .as_ref()
            .ok_or_else(|| DeparseError::missing("NullTest", "arg"))?;
        let keyword = match self.nulltesttype.as_ref() {
            Some(NullTestType::IsNull) => "IS NULL",
            Some(NullTestType::IsNotNull) => "IS NOT NULL",
            Some(NullTestType::Unrecognized(value)) => {
                return Err(DeparseError::variant("NullTest", value.clone()))
            }
            None => return Err(DeparseError::missing("NullTest", "nulltesttype")),
        };
        let mut ts = operand(dp, arg, ctx)?;
        ts.then(keyword);
        Ok(ts)
    }
}

impl Deparse for BooleanTest {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let arg = self
            .arg
            .as_ref()
            .ok_or_else(|| DeparseError::missing("BooleanTest", "arg"))?;
        let keyword = match self.booltesttype.as_ref() {
            Some(BoolTestType::IsTrue) => "IS TRUE",
            Some(BoolTestType::IsNotTrue) => "IS NOT TRUE",
            Some(BoolTestType::IsFalse) => "IS FALSE",
            Some(BoolTestType::IsNotFalse) => "IS NOT FALSE",
            Some(BoolTestType::IsUnknown) => "IS UNKNOWN",
            Some(BoolTestType::IsNotUnknown) => "IS NOT UNKNOWN",
            Some(BoolTestType::Unrecognized(value)) => {
                return Err(DeparseError::variant("BooleanTest", value.clone()))
            }
            None => return Err(DeparseError::missing("BooleanTest", "booltesttype")),
        };
        let mut ts = operand(dp, arg, ctx)?;
        ts.then(keyword);
        Ok(ts)
    }
}

// ============================================================================
// Function calls and windows
// ============================================================================

impl Deparse for FuncCall {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut args = TokenStream::new();
        if self.agg_star {
            args.push(Token::Star);
        } else {
            if self.agg_distinct {
                args.keyword("DISTINCT").space();
            }
            let rendered = dp.each(&self.args, ctx)?;
            let last = rendered.len().saturating_sub(1);
            args.comma_separated(rendered.into_iter().enumerate().map(|(i, arg)| {
                if self.func_variadic && i == last {
                    let mut variadic = TokenStream::new();
                    variadic.keyword("VARIADIC").space().append(arg);
                    variadic
                } else {
                    arg
                }
            }));
            if !self.agg_order.is_empty() && !self.agg_within_group {
                args.then("ORDER BY")
                    .space()
                    .append(dp.list(&self.agg_order, ctx.in_sort_clause())?);
            }
        }

        let mut ts = qualified_name(&self.funcname, "FuncCall")?;
        ts.parenthesized(args);

        if self.agg_within_group {
            let mut order = TokenStream::new();
            order
                .keyword("ORDER BY")
                .space()
                .append(dp.list(&self.agg_order, ctx.in_sort_clause())?);
            ts.then("WITHIN GROUP").space().parenthesized(order);
        }
        if let Some(filter) = &self.agg_filter {
            let mut cond = TokenStream::new();
            cond.keyword("WHERE").space().append(dp.node(filter, ctx)?);
            ts.then("FILTER").space().parenthesized(cond);
        }
        if let Some(over) = &self.over {
            ts.then("OVER").space().append(over_clause(dp, over, ctx)?);
        }
        Ok(ts)
    }
}

/// Target of `OVER`: a window name or an inline specification.
fn over_clause(dp: &Deparser, def: &WindowDef, ctx: Context) -> Result<TokenStream> {
    if !def.name.is_empty() {
        return Ok(Token::Ident(def.name.clone()).into());
    }
    Ok(parens(window_spec(dp, def, ctx)?))
}

/// Body of a window specification, without parentheses.
pub(crate) fn window_spec(dp: &Deparser, def: &WindowDef, ctx: Context) -> Result<TokenStream> {
    let ctx = ctx.operand();
    let mut parts = Vec::new();
    if !def.refname.is_empty() {
        parts.push(TokenStream::from(Token::Ident(def.refname.clone())));
    }
    if !def.partition_clause.is_empty() {
        let mut ts = TokenStream::new();
        ts.keyword("PARTITION BY")
            .space()
            .append(dp.list(&def.partition_clause, ctx)?);
        parts.push(ts);
    }
    if !def.order_clause.is_empty() {
        let mut ts = TokenStream::new();
        ts.keyword("ORDER BY")
            .space()
            .append(dp.list(&def.order_clause, ctx.in_sort_clause())?);
        parts.push(ts);
    }
    if let Some(frame) = frame_clause(dp, def, ctx)? {
        parts.push(frame);
    }
    let mut ts = TokenStream::new();
    ts.separated(parts, &[Token::Space]);
    Ok(ts)
}

fn frame_bound(
    dp: &Deparser,
    def: &WindowDef,
    start: bool,
    ctx: Context,
) -> Result<TokenStream> {
    let opts = def.frame_options;
    let (unbounded, current, preceding, following, offset) = if start {
        (
            (frame::START_UNBOUNDED_PRECEDING, "UNBOUNDED PRECEDING"),
            frame::START_CURRENT_ROW,
            frame::START_OFFSET_PRECEDING,
            frame::START_OFFSET_FOLLOWING,
            def.start_offset.as_ref(),
        )
    } else {
        (
            (frame::END_UNBOUNDED_FOLLOWING, "UNBOUNDED FOLLOWING"),
            frame::END_CURRENT_ROW,
            frame::END_OFFSET_PRECEDING,
            frame::END_OFFSET_FOLLOWING,
            def.end_offset.as_ref(),
        )
    };

    let mut ts = TokenStream::new();
    if opts & unbounded.0 != 0 {
        ts.keyword(unbounded.1);
    } else if opts & current != 0 {
        ts.keyword("CURRENT ROW");
    } else if opts & (preceding | following) != 0 {
        let field = if start { "startOffset" } else { "endOffset" };
        let offset = dp.required(offset, "WindowDef", field, ctx)?;
        let direction = if opts & preceding != 0 { "PRECEDING" } else { "FOLLOWING" };
        ts.append(offset).then(direction);
    } else {
        return Err(DeparseError::variant("WindowDef", format!("frameOptions {opts}")));
    }
    Ok(ts)
}

fn frame_clause(dp: &Deparser, def: &WindowDef, ctx: Context) -> Result<Option<TokenStream>> {
    let opts = def.frame_options;
    if opts & frame::NONDEFAULT == 0 {
        return Ok(None);
    }
    let mode = if opts & frame::RANGE != 0 {
        "RANGE"
    } else if opts & frame::ROWS != 0 {
        "ROWS"
    } else if opts & frame::GROUPS != 0 {
        "GROUPS"
    } else {
        return Err(DeparseError::variant("WindowDef", format!("frameOptions {opts}")));
    };

    let mut ts = TokenStream::new();
    ts.keyword(mode).space();
    if opts & frame::BETWEEN != 0 {
        ts.keyword("BETWEEN")
            .space()
            .append(frame_bound(dp, def, true, ctx)?)
            .then("AND")
            .space()
            .append(frame_bound(dp, def, false, ctx)?);
    } else {
        ts.append(frame_bound(dp, def, true, ctx)?);
    }

    if opts & frame::EXCLUDE_CURRENT_ROW != 0 {
        ts.then("EXCLUDE CURRENT ROW");
    } else if opts & frame::EXCLUDE_GROUP != 0 {
        ts.then("EXCLUDE GROUP");
    } else if opts & frame::EXCLUDE_TIES != 0 {
        ts.then("EXCLUDE TIES");
    }
    Ok(Some(ts))
}

impl Deparse for WindowDef {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let spec = parens(window_spec(dp, self, ctx)?);
        if self.name.is_empty() {
            return Ok(spec);
        }
        let mut ts = TokenStream::new();
        ts.ident(self.name.clone()).then("AS").space().append(spec);
        Ok(ts)
    }
}

// ============================================================================
// Types and casts
// ============================================================================

fn is_negative_number(node: &Node) -> bool {
    match node {
        Node::AConst(c) => match &c.value {
            ConstValue::Integer(n) => *n < 0,
            ConstValue::Float(text) => text.starts_with('-'),
            _ => false,
        },
        Node::Integer(n) => n.ival < 0,
        Node::Float(f) => f.fval.starts_with('-'),
        _ => false,
    }
}

impl Deparse for TypeCast {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let arg = self
            .arg
            .as_ref()
            .ok_or_else(|| DeparseError::missing("TypeCast", "arg"))?;
        let type_name = self
            .type_name
            .as_ref()
            .ok_or_else(|| DeparseError::missing("TypeCast", "typeName"))?;

        // `true`/`false` arrive as 't'/'f' cast to boolean.
        if let Node::AConst(c) = arg {
            if let ConstValue::String(s) = &c.value {
                let names = strings(&type_name.names, "TypeName")?;
                if names == ["pg_catalog", "bool"] && (s == "t" || s == "f") {
                    return Ok(Token::Keyword(if s == "t" { "true" } else { "false" }).into());
                }
            }
        }

        let compound = matches!(
            arg,
            Node::AExpr(_)
                | Node::BoolExpr(_)
                | Node::NullTest(_)
                | Node::BooleanTest(_)
                | Node::OpExpr(_)
                | Node::CollateClause(_)
        ) || is_negative_number(arg);
        let rendered = dp.node(arg, ctx)?;
        let mut ts = if compound { parens(rendered) } else { rendered };
        ts.push(Token::DoubleColon).append(dp.render(type_name, ctx)?);
        Ok(ts)
    }
}

fn integer_of(node: &Node) -> Option<i64> {
    match node {
        Node::AConst(c) => match c.value {
            ConstValue::Integer(n) => Some(n),
            _ => None,
        },
        Node::Integer(n) => Some(n.ival),
        _ => None,
    }
}

impl TypeName {
    /// Interval modifiers: a range mask then an optional precision.
    fn interval_text(&self, names: &[&str]) -> Result<String> {
        let mask = self.typmods.first().and_then(integer_of);
        let precision = self.typmods.get(1).and_then(integer_of);
        let precision_text = precision.map(|p| p.to_string());
        match mask {
            None | Some(INTERVAL_FULL_RANGE) => {
                Ok(resolve_type_name(names, precision_text.as_deref()))
            }
            Some(mask) => {
                let fields = interval_fields(mask)
                    .ok_or_else(|| DeparseError::variant("TypeName", format!("interval {mask}")))?;
                let mut text = format!("{} {fields}", resolve_type_name(names, None));
                if let Some(p) = precision_text {
                    text.push_str(&format!("({p})"));
                }
                Ok(text)
            }
        }
    }
}

impl Deparse for TypeName {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let names = strings(&self.names, "TypeName")?;
        let Some(base) = names.last() else {
            return Err(DeparseError::missing("TypeName", "names"));
        };

        if self.pct_type {
            let quoted: Vec<String> = names.iter().map(|n| quote_identifier(n)).collect();
            return Ok(Token::Raw(format!("{}%TYPE", quoted.join("."))).into());
        }

        let is_interval = *base == "interval" && names.len() <= 2;
        let mut text = if is_interval && !self.typmods.is_empty() {
            self.interval_text(&names)?
        } else if !self.typmods.is_empty() {
            let modifier = dp.list(&self.typmods, ctx.operand())?;
            resolve_type_name(&names, Some(dp.inline(&modifier).as_str()))
        } else {
            let modifier = self.typemod.and_then(|m| decode_typmod(base, m));
            resolve_type_name(&names, modifier.as_deref())
        };

        for bound in &self.array_bounds {
            match integer_of(bound) {
                Some(n) if n >= 0 => text.push_str(&format!("[{n}]")),
                Some(_) => text.push_str("[]"),
                None => {
                    return Err(DeparseError::malformed(
                        "TypeName",
                        format!("array bound must be an integer, found {}", bound.kind()),
                    ))
                }
            }
        }
        if self.setof {
            text.insert_str(0, "SETOF ");
        }
        Ok(Token::Raw(text).into())
    }
}

impl Deparse for CollateClause {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        if let Some(arg) = &self.arg {
            ts.append(operand(dp, arg, ctx)?).space();
        }
        ts.keyword("COLLATE")
            .space()
            .append(qualified_name(&self.collname, "CollateClause")?);
        Ok(ts)
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Deparse for CaseExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        if self.args.is_empty() {
            return Err(DeparseError::missing("CaseExpr", "args"));
        }
        let mut ts = TokenStream::new();
        ts.keyword("CASE");
        if let Some(arg) = &self.arg {
            ts.space().append(dp.node(arg, ctx)?);
        }
        for when in &self.args {
            ts.space().append(dp.node(when, ctx)?);
        }
        if let Some(default) = &self.defresult {
            ts.then("ELSE").space().append(dp.node(default, ctx)?);
        }
        ts.then("END");
        Ok(ts)
    }
}

impl Deparse for CaseWhen {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = TokenStream::new();
        ts.keyword("WHEN")
            .space()
            .append(dp.required(self.expr.as_ref(), "CaseWhen", "expr", ctx)?)
            .then("THEN")
            .space()
            .append(dp.required(self.result.as_ref(), "CaseWhen", "result", ctx)?);
        Ok(ts)
    }
}

impl Deparse for CoalesceExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.keyword("COALESCE")
            .parenthesized(dp.required_list(&self.args, "CoalesceExpr", "args", ctx.operand())?);
        Ok(ts)
    }
}

impl Deparse for MinMaxExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let keyword = match self.op.as_ref() {
            Some(MinMaxOp::Greatest) => "GREATEST",
            Some(MinMaxOp::Least) => "LEAST",
            Some(MinMaxOp::Unrecognized(value)) => {
                return Err(DeparseError::variant("MinMaxExpr", value.clone()))
            }
            None => return Err(DeparseError::missing("MinMaxExpr", "op")),
        };
        let mut ts = TokenStream::new();
        ts.keyword(keyword)
            .parenthesized(dp.required_list(&self.args, "MinMaxExpr", "args", ctx.operand())?);
        Ok(ts)
    }
}

impl Deparse for RowExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let args = dp.list(&self.args, ctx.operand())?;
        let implicit = self.row_format == Some(CoercionForm::ImplicitCast) && self.args.len() > 1;
        let mut ts = TokenStream::new();
        if !implicit {
            ts.keyword("ROW");
        }
        ts.parenthesized(args);
        Ok(ts)
    }
}

impl Deparse for AArrayExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.keyword("ARRAY")
            .push(Token::LBracket)
            .append(dp.list(&self.elements, ctx.operand())?)
            .push(Token::RBracket);
        Ok(ts)
    }
}

impl Deparse for AIndirection {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let arg = self
            .arg
            .as_ref()
            .ok_or_else(|| DeparseError::missing("A_Indirection", "arg"))?;
        let subscripts_only = self.indirection.iter().all(|n| matches!(n, Node::AIndices(_)));
        let bare = matches!(arg, Node::ColumnRef(_) | Node::ParamRef(_)) && subscripts_only;
        let rendered = dp.node(arg, ctx)?;
        let mut ts = if bare { rendered } else { parens(rendered) };
        ts.append(indirection(dp, &self.indirection, ctx)?);
        Ok(ts)
    }
}

impl Deparse for AIndices {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = TokenStream::new();
        ts.push(Token::LBracket);
        if let Some(lower) = dp.opt_node(self.lidx.as_ref(), ctx)? {
            ts.append(lower);
        }
        if self.is_slice {
            ts.push(Token::Colon);
        }
        if let Some(upper) = dp.opt_node(self.uidx.as_ref(), ctx)? {
            ts.append(upper);
        }
        ts.push(Token::RBracket);
        Ok(ts)
    }
}

impl Deparse for SubLink {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let subselect = dp.required(self.subselect.as_ref(), "SubLink", "subselect", ctx)?;
        let test = || -> Result<TokenStream> {
            let expr = self
                .testexpr
                .as_ref()
                .ok_or_else(|| DeparseError::missing("SubLink", "testexpr"))?;
            operand(dp, expr, ctx)
        };

        let mut ts = TokenStream::new();
        match self.sub_link_type.as_ref() {
            Some(SubLinkType::Exists) => {
                ts.keyword("EXISTS").space().parenthesized(subselect);
            }
            Some(SubLinkType::Any) if self.oper_name.is_empty() => {
                ts.append(test()?).then("IN").space().parenthesized(subselect);
            }
            Some(SubLinkType::Any) | Some(SubLinkType::All) => {
                let quantifier = if self.sub_link_type == Some(SubLinkType::Any) {
                    "ANY"
                } else {
                    "ALL"
                };
                ts.append(test()?)
                    .space()
                    .push(operator(&self.oper_name, "SubLink")?)
                    .space()
                    .keyword(quantifier)
                    .space()
                    .parenthesized(subselect);
            }
            Some(SubLinkType::RowCompare) => {
                ts.append(test()?)
                    .space()
                    .push(operator(&self.oper_name, "SubLink")?)
                    .space()
                    .parenthesized(subselect);
            }
            Some(SubLinkType::Expr) | Some(SubLinkType::MultiExpr) => {
                ts.parenthesized(subselect);
            }
            Some(SubLinkType::Array) => {
                ts.keyword("ARRAY").parenthesized(subselect);
            }
            Some(SubLinkType::Cte) => return Err(DeparseError::variant("SubLink", "CTE_SUBLINK")),
            Some(SubLinkType::Unrecognized(value)) => {
                return Err(DeparseError::variant("SubLink", value.clone()))
            }
            None => return Err(DeparseError::missing("SubLink", "subLinkType")),
        }
        Ok(ts)
    }
}

impl Deparse for SqlValueFunction {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        use SqlValueFunctionOp as Op;
        let (keyword, takes_precision) = match self.op.as_ref() {
            Some(Op::CurrentDate) => ("CURRENT_DATE", false),
            Some(Op::CurrentTime) => ("CURRENT_TIME", false),
            Some(Op::CurrentTimeN) => ("CURRENT_TIME", true),
            Some(Op::CurrentTimestamp) => ("CURRENT_TIMESTAMP", false),
            Some(Op::CurrentTimestampN) => ("CURRENT_TIMESTAMP", true),
            Some(Op::LocalTime) => ("LOCALTIME", false),
            Some(Op::LocalTimeN) => ("LOCALTIME", true),
            Some(Op::LocalTimestamp) => ("LOCALTIMESTAMP", false),
            Some(Op::LocalTimestampN) => ("LOCALTIMESTAMP", true),
            Some(Op::CurrentRole) => ("CURRENT_ROLE", false),
            Some(Op::CurrentUser) => ("CURRENT_USER", false),
            Some(Op::User) => ("USER", false),
            Some(Op::SessionUser) => ("SESSION_USER", false),
            Some(Op::CurrentCatalog) => ("CURRENT_CATALOG", false),
            Some(Op::CurrentSchema) => ("CURRENT_SCHEMA", false),
            Some(Op::Unrecognized(value)) => {
                return Err(DeparseError::variant("SQLValueFunction", value.clone()))
            }
            None => return Err(DeparseError::missing("SQLValueFunction", "op")),
        };
        let mut ts = TokenStream::from(Token::Keyword(keyword));
        if takes_precision {
            let precision = self
                .typmod
                .ok_or_else(|| DeparseError::missing("SQLValueFunction", "typmod"))?;
            ts.lparen().push(Token::LitInt(i64::from(precision))).rparen();
        }
        Ok(ts)
    }
}

impl Deparse for NamedArgExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.ident(self.name.clone())
            .space()
            .push(Token::Operator("=>".into()))
            .space()
            .append(dp.required(self.arg.as_ref(), "NamedArgExpr", "arg", ctx.operand())?);
        Ok(ts)
    }
}

impl Deparse for SetToDefault {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        Ok(Token::Keyword("DEFAULT").into())
    }
}

/// A grouping element; multi-column groups are parenthesized.
fn grouping_item(dp: &Deparser, node: &Node, ctx: Context) -> Result<TokenStream> {
    match node {
        Node::List(list) => Ok(parens(dp.list(&list.items, ctx)?)),
        other => dp.node(other, ctx),
    }
}

impl Deparse for GroupingSet {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut content = TokenStream::new();
        content.comma_separated(
            self.content
                .iter()
                .map(|n| grouping_item(dp, n, ctx))
                .collect::<Result<Vec<_>>>()?,
        );

        let mut ts = TokenStream::new();
        match self.kind.as_ref() {
            Some(GroupingSetKind::Empty) => {
                ts.lparen().rparen();
            }
            Some(GroupingSetKind::Simple) => {
                ts.parenthesized(content);
            }
            Some(GroupingSetKind::Rollup) => {
                ts.keyword("ROLLUP").space().parenthesized(content);
            }
            Some(GroupingSetKind::Cube) => {
                ts.keyword("CUBE").space().parenthesized(content);
            }
            Some(GroupingSetKind::Sets) => {
                ts.keyword("GROUPING SETS").space().parenthesized(content);
            }
            Some(GroupingSetKind::Unrecognized(value)) => {
                return Err(DeparseError::variant("GroupingSet", value.clone()))
            }
            None => return Err(DeparseError::missing("GroupingSet", "kind")),
        }
        Ok(ts)
    }
}

impl Deparse for GroupingFunc {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.keyword("GROUPING")
            .parenthesized(dp.required_list(&self.args, "GroupingFunc", "args", ctx.operand())?);
        Ok(ts)
    }
}

// ============================================================================
// Targets and sort keys
// ============================================================================

impl Deparse for SortBy {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = dp.required(self.node.as_ref(), "SortBy", "node", ctx.operand())?;
        match self.sortby_dir.as_ref() {
            None | Some(SortByDir::Default) => {}
            Some(SortByDir::Asc) => {
                ts.then("ASC");
            }
            Some(SortByDir::Desc) => {
                ts.then("DESC");
            }
            Some(SortByDir::Using) => {
                ts.then("USING")
                    .space()
                    .push(operator(&self.use_op, "SortBy")?);
            }
            Some(SortByDir::Unrecognized(value)) => {
                return Err(DeparseError::variant("SortBy", value.clone()))
            }
        }
        match self.sortby_nulls.as_ref() {
            None | Some(SortByNulls::Default) => {}
            Some(SortByNulls::First) => {
                ts.then("NULLS FIRST");
            }
            Some(SortByNulls::Last) => {
                ts.then("NULLS LAST");
            }
            Some(SortByNulls::Unrecognized(value)) => {
                return Err(DeparseError::variant("SortBy", value.clone()))
            }
        }
        Ok(ts)
    }
}

impl Deparse for ResTarget {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        if ctx.inside_update_assignment {
            if self.name.is_empty() {
                return Err(DeparseError::missing("ResTarget", "name"));
            }
            ts.ident(self.name.clone())
                .append(indirection(dp, &self.indirection, ctx)?)
                .space()
                .push(Token::Operator("=".into()))
                .space()
                .append(dp.required(self.val.as_ref(), "ResTarget", "val", ctx.operand())?);
            return Ok(ts);
        }

        match &self.val {
            Some(val) => {
                ts.append(dp.node(val, ctx.operand())?);
                if !self.name.is_empty() {
                    ts.then("AS").space().ident(self.name.clone());
                }
            }
            None if self.name.is_empty() => {
                return Err(DeparseError::malformed("ResTarget", "neither name nor val"))
            }
            None => {
                ts.ident(self.name.clone())
                    .append(indirection(dp, &self.indirection, ctx)?);
            }
        }
        Ok(ts)
    }
}

impl Deparse for MultiAssignRef {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        dp.required(self.source.as_ref(), "MultiAssignRef", "source", ctx.operand())
    }
}

// ============================================================================
// Analyzed-tree nodes
// ============================================================================

impl Deparse for OpExpr {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let op = Token::Operator(catalog::operator_symbol(self.opno).to_string());
        let mut ts = TokenStream::new();
        match self.args.as_slice() {
            [right] => {
                ts.push(op).space().append(operand(dp, right, ctx)?);
            }
            [left, right] => {
                ts.append(operand(dp, left, ctx)?)
                    .space()
                    .push(op)
                    .space()
                    .append(operand(dp, right, ctx)?);
            }
            _ => return Err(DeparseError::malformed("OpExpr", "expected one or two arguments")),
        }
        Ok(ts)
    }
}

fn filter_clause(dp: &Deparser, filter: Option<&Node>, ctx: Context) -> Result<TokenStream> {
    let mut ts = TokenStream::new();
    if let Some(filter) = filter {
        let mut cond = TokenStream::new();
        cond.keyword("WHERE").space().append(dp.node(filter, ctx)?);
        ts.then("FILTER").space().parenthesized(cond);
    }
    Ok(ts)
}

impl Deparse for Aggref {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let name = catalog::aggregate_name(self.aggfnoid)
            .ok_or_else(|| DeparseError::variant("Aggref", self.aggfnoid.to_string()))?;
        let mut ts = TokenStream::from(Token::Ident(name.to_string()));
        if self.aggstar {
            ts.lparen().push(Token::Star).rparen();
        } else {
            ts.parenthesized(dp.list(&self.args, ctx)?);
        }
        ts.append(filter_clause(dp, self.aggfilter.as_ref(), ctx)?);
        Ok(ts)
    }
}

/// The window itself is not recoverable from an analyzed call; it renders
/// over the whole partition.
impl Deparse for WindowFunc {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let name = catalog::window_function_name(self.winfnoid)
            .or_else(|| catalog::aggregate_name(self.winfnoid))
            .ok_or_else(|| DeparseError::variant("WindowFunc", self.winfnoid.to_string()))?;
        let mut ts = TokenStream::from(Token::Ident(name.to_string()));
        if self.winstar {
            ts.lparen().push(Token::Star).rparen();
        } else {
            ts.parenthesized(dp.list(&self.args, ctx)?);
        }
        ts.append(filter_clause(dp, self.aggfilter.as_ref(), ctx)?);
        ts.then("OVER").space().lparen().rparen();
        Ok(ts)
    }
}

impl Deparse for TargetEntry {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let mut ts = dp.required(self.expr.as_ref(), "TargetEntry", "expr", ctx.operand())?;
        if ctx.inside_select_list && !self.resname.is_empty() {
            ts.then("AS").space().ident(self.resname.clone());
        }
        Ok(ts)
    }
}
