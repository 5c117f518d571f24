//! Expression payloads.

use serde::Deserialize;

use super::enums::*;
use super::{node_list, wrapped, Node};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnRef {
    #[serde(deserialize_with = "node_list")]
    pub fields: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParamRef {
    pub number: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AExpr {
    pub kind: Option<AExprKind>,
    #[serde(deserialize_with = "node_list")]
    pub name: Vec<Node>,
    pub lexpr: Option<Node>,
    pub rexpr: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoolExpr {
    pub boolop: Option<BoolExprType>,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NullTest {
    pub arg: Option<Node>,
    pub nulltesttype: Option<NullTestType>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BooleanTest {
    pub arg: Option<Node>,
    pub booltesttype: Option<BoolTestType>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FuncCall {
    #[serde(deserialize_with = "node_list")]
    pub funcname: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub agg_order: Vec<Node>,
    pub agg_filter: Option<Node>,
    #[serde(deserialize_with = "wrapped")]
    pub over: Option<WindowDef>,
    pub agg_within_group: bool,
    pub agg_star: bool,
    pub agg_distinct: bool,
    pub func_variadic: bool,
    pub funcformat: Option<CoercionForm>,
}

/// A window specification, either inline in `OVER` or named in `WINDOW`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowDef {
    pub name: String,
    pub refname: String,
    #[serde(rename = "partitionClause", deserialize_with = "node_list")]
    pub partition_clause: Vec<Node>,
    #[serde(rename = "orderClause", deserialize_with = "node_list")]
    pub order_clause: Vec<Node>,
    #[serde(rename = "frameOptions")]
    pub frame_options: i32,
    #[serde(rename = "startOffset")]
    pub start_offset: Option<Node>,
    #[serde(rename = "endOffset")]
    pub end_offset: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypeCast {
    pub arg: Option<Node>,
    #[serde(rename = "typeName", deserialize_with = "wrapped")]
    pub type_name: Option<TypeName>,
}

/// A type reference, as written in casts and column definitions.
///
/// `typemod` is the packed modifier of analyzed trees; `typmods` the
/// modifier list of raw parse trees. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypeName {
    #[serde(deserialize_with = "node_list")]
    pub names: Vec<Node>,
    pub setof: bool,
    pub pct_type: bool,
    #[serde(deserialize_with = "node_list")]
    pub typmods: Vec<Node>,
    pub typemod: Option<i32>,
    #[serde(rename = "arrayBounds", deserialize_with = "node_list")]
    pub array_bounds: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaseExpr {
    pub arg: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
    pub defresult: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaseWhen {
    pub expr: Option<Node>,
    pub result: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoalesceExpr {
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinMaxExpr {
    pub op: Option<MinMaxOp>,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RowExpr {
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
    pub row_format: Option<CoercionForm>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AArrayExpr {
    #[serde(deserialize_with = "node_list")]
    pub elements: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AIndirection {
    pub arg: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub indirection: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AIndices {
    pub is_slice: bool,
    pub lidx: Option<Node>,
    pub uidx: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubLink {
    #[serde(rename = "subLinkType")]
    pub sub_link_type: Option<SubLinkType>,
    pub testexpr: Option<Node>,
    #[serde(rename = "operName", deserialize_with = "node_list")]
    pub oper_name: Vec<Node>,
    pub subselect: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SqlValueFunction {
    pub op: Option<SqlValueFunctionOp>,
    pub typmod: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NamedArgExpr {
    pub arg: Option<Node>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollateClause {
    pub arg: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub collname: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetToDefault {}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupingSet {
    pub kind: Option<GroupingSetKind>,
    #[serde(deserialize_with = "node_list")]
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupingFunc {
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SortBy {
    pub node: Option<Node>,
    pub sortby_dir: Option<SortByDir>,
    pub sortby_nulls: Option<SortByNulls>,
    #[serde(rename = "useOp", deserialize_with = "node_list")]
    pub use_op: Vec<Node>,
}

/// A target: select-list item, insert column, or update assignment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResTarget {
    pub name: String,
    #[serde(deserialize_with = "node_list")]
    pub indirection: Vec<Node>,
    pub val: Option<Node>,
}

/// One column of `SET (a, b) = source`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MultiAssignRef {
    pub source: Option<Node>,
    pub colno: i32,
    pub ncolumns: i32,
}

// ============================================================================
// Analyzed-tree nodes
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpExpr {
    pub opno: u32,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Aggref {
    pub aggfnoid: u32,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
    pub aggstar: bool,
    pub aggfilter: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowFunc {
    pub winfnoid: u32,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
    pub winstar: bool,
    pub aggfilter: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TargetEntry {
    pub expr: Option<Node>,
    pub resname: String,
}
