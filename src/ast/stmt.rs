//! Statement, FROM-clause and clause payloads.

use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

use super::enums::*;
use super::{node_list, wrapped, wrapped_box, CollateClause, Node, TypeName};

// ============================================================================
// FROM clause
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RangeVar {
    pub catalogname: String,
    pub schemaname: String,
    pub relname: String,
    /// `Some(false)` means `ONLY`; absent means the default (inherit).
    pub inh: Option<bool>,
    pub relpersistence: String,
    #[serde(deserialize_with = "wrapped")]
    pub alias: Option<Alias>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Alias {
    pub aliasname: String,
    #[serde(deserialize_with = "node_list")]
    pub colnames: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JoinExpr {
    pub jointype: Option<JoinType>,
    #[serde(rename = "isNatural")]
    pub is_natural: bool,
    pub larg: Option<Node>,
    pub rarg: Option<Node>,
    #[serde(rename = "usingClause", deserialize_with = "node_list")]
    pub using_clause: Vec<Node>,
    pub quals: Option<Node>,
    #[serde(deserialize_with = "wrapped")]
    pub alias: Option<Alias>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RangeSubselect {
    pub lateral: bool,
    pub subquery: Option<Node>,
    #[serde(deserialize_with = "wrapped")]
    pub alias: Option<Alias>,
}

/// A function in FROM. Each entry of `functions` is a two-item list of the
/// call and its column definition list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RangeFunction {
    pub lateral: bool,
    pub ordinality: bool,
    pub is_rowsfrom: bool,
    #[serde(deserialize_with = "node_list")]
    pub functions: Vec<Node>,
    #[serde(deserialize_with = "wrapped")]
    pub alias: Option<Alias>,
    #[serde(deserialize_with = "node_list")]
    pub coldeflist: Vec<Node>,
}

// ============================================================================
// Clauses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WithClause {
    #[serde(deserialize_with = "node_list")]
    pub ctes: Vec<Node>,
    pub recursive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommonTableExpr {
    pub ctename: String,
    #[serde(deserialize_with = "node_list")]
    pub aliascolnames: Vec<Node>,
    pub ctematerialized: Option<CteMaterialize>,
    pub ctequery: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OnConflictClause {
    pub action: Option<OnConflictAction>,
    #[serde(deserialize_with = "wrapped")]
    pub infer: Option<InferClause>,
    #[serde(rename = "targetList", deserialize_with = "node_list")]
    pub target_list: Vec<Node>,
    #[serde(rename = "whereClause")]
    pub where_clause: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InferClause {
    #[serde(rename = "indexElems", deserialize_with = "node_list")]
    pub index_elems: Vec<Node>,
    #[serde(rename = "whereClause")]
    pub where_clause: Option<Node>,
    pub conname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndexElem {
    pub name: String,
    pub expr: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub collation: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub opclass: Vec<Node>,
    pub ordering: Option<SortByDir>,
    pub nulls_ordering: Option<SortByNulls>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LockingClause {
    #[serde(rename = "lockedRels", deserialize_with = "node_list")]
    pub locked_rels: Vec<Node>,
    pub strength: Option<LockClauseStrength>,
    #[serde(rename = "waitPolicy")]
    pub wait_policy: Option<LockWaitPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntoClause {
    #[serde(deserialize_with = "wrapped")]
    pub rel: Option<RangeVar>,
    #[serde(rename = "colNames", deserialize_with = "node_list")]
    pub col_names: Vec<Node>,
}

/// A generic `name [= value]` option.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefElem {
    pub defnamespace: String,
    pub defname: String,
    pub arg: Option<Node>,
    pub defaction: Option<DefElemAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoleSpec {
    pub roletype: Option<RoleSpecType>,
    pub rolename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccessPriv {
    pub priv_name: String,
    #[serde(deserialize_with = "node_list")]
    pub cols: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObjectWithArgs {
    #[serde(deserialize_with = "node_list")]
    pub objname: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub objargs: Vec<Node>,
    pub args_unspecified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartitionSpec {
    pub strategy: Option<PartitionStrategy>,
    #[serde(rename = "partParams", deserialize_with = "node_list")]
    pub part_params: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartitionElem {
    pub name: String,
    pub expr: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub collation: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub opclass: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnDef {
    pub colname: String,
    #[serde(rename = "typeName", deserialize_with = "wrapped")]
    pub type_name: Option<TypeName>,
    #[serde(deserialize_with = "node_list")]
    pub constraints: Vec<Node>,
    #[serde(rename = "collClause", deserialize_with = "wrapped")]
    pub coll_clause: Option<CollateClause>,
    /// `USING` expression of `ALTER COLUMN ... TYPE`.
    pub raw_default: Option<Node>,
}

/// Column or table constraint. Foreign-key actions and match types are the
/// single-letter codes of the catalog (`a`, `r`, `c`, `n`, `d` / `f`, `p`, `s`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Constraint {
    pub contype: Option<ConstrType>,
    pub conname: String,
    pub deferrable: bool,
    pub initdeferred: bool,
    pub skip_validation: bool,
    pub is_no_inherit: bool,
    pub raw_expr: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub keys: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub including: Vec<Node>,
    pub nulls_not_distinct: bool,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    pub indexname: String,
    pub indexspace: String,
    #[serde(deserialize_with = "wrapped")]
    pub pktable: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub fk_attrs: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub pk_attrs: Vec<Node>,
    pub fk_matchtype: String,
    pub fk_upd_action: String,
    pub fk_del_action: String,
    pub generated_when: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VacuumRelation {
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub va_cols: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterTableCmd {
    pub subtype: Option<AlterTableType>,
    pub name: String,
    #[serde(deserialize_with = "wrapped")]
    pub newowner: Option<RoleSpec>,
    pub def: Option<Node>,
    pub behavior: Option<DropBehavior>,
    pub missing_ok: bool,
}

// ============================================================================
// Statements
// ============================================================================

/// Raw statement envelope. A present `stmt_len` requests a trailing `;`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawStmt {
    pub stmt: Option<Node>,
    pub stmt_len: Option<i32>,
}

/// `DISTINCT` flavor of a select.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Distinct {
    #[default]
    None,
    /// Plain `DISTINCT`, encoded as a list holding one empty element.
    All,
    On(Vec<Node>),
}

fn distinct_clause<'de, D>(deserializer: D) -> Result<Distinct, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let items = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(Distinct::None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return match Node::from_json(other).map_err(D::Error::custom)? {
                Node::List(list) if list.items.is_empty() => Ok(Distinct::None),
                Node::List(list) => Ok(Distinct::On(list.items)),
                node => Ok(Distinct::On(vec![node])),
            }
        }
    };
    if items.is_empty() {
        return Ok(Distinct::None);
    }
    let is_blank = |v: &Value| v.is_null() || v.as_object().is_some_and(|m| m.is_empty());
    if items.iter().all(is_blank) {
        return Ok(Distinct::All);
    }
    items
        .into_iter()
        .map(Node::from_json)
        .collect::<Result<Vec<_>, _>>()
        .map(Distinct::On)
        .map_err(D::Error::custom)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectStmt {
    #[serde(rename = "distinctClause", deserialize_with = "distinct_clause")]
    pub distinct_clause: Distinct,
    #[serde(rename = "intoClause", deserialize_with = "wrapped")]
    pub into_clause: Option<IntoClause>,
    #[serde(rename = "targetList", deserialize_with = "node_list")]
    pub target_list: Vec<Node>,
    #[serde(rename = "fromClause", deserialize_with = "node_list")]
    pub from_clause: Vec<Node>,
    #[serde(rename = "whereClause")]
    pub where_clause: Option<Node>,
    #[serde(rename = "groupClause", deserialize_with = "node_list")]
    pub group_clause: Vec<Node>,
    #[serde(rename = "groupDistinct")]
    pub group_distinct: bool,
    #[serde(rename = "havingClause")]
    pub having_clause: Option<Node>,
    #[serde(rename = "windowClause", deserialize_with = "node_list")]
    pub window_clause: Vec<Node>,
    #[serde(rename = "valuesLists", deserialize_with = "node_list")]
    pub values_lists: Vec<Node>,
    #[serde(rename = "sortClause", deserialize_with = "node_list")]
    pub sort_clause: Vec<Node>,
    #[serde(rename = "limitOffset")]
    pub limit_offset: Option<Node>,
    #[serde(rename = "limitCount")]
    pub limit_count: Option<Node>,
    #[serde(rename = "limitOption")]
    pub limit_option: Option<LimitOption>,
    #[serde(rename = "lockingClause", deserialize_with = "node_list")]
    pub locking_clause: Vec<Node>,
    #[serde(rename = "withClause", deserialize_with = "wrapped")]
    pub with_clause: Option<WithClause>,
    pub op: Option<SetOperation>,
    pub all: bool,
    #[serde(deserialize_with = "wrapped_box")]
    pub larg: Option<Box<SelectStmt>>,
    #[serde(deserialize_with = "wrapped_box")]
    pub rarg: Option<Box<SelectStmt>>,
}

impl SelectStmt {
    /// Whether this select combines two arms with a set operator.
    pub fn is_set_operation(&self) -> bool {
        matches!(
            self.op,
            Some(SetOperation::Union | SetOperation::Intersect | SetOperation::Except)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsertStmt {
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub cols: Vec<Node>,
    #[serde(rename = "selectStmt")]
    pub select_stmt: Option<Node>,
    #[serde(rename = "onConflictClause", deserialize_with = "wrapped")]
    pub on_conflict_clause: Option<OnConflictClause>,
    #[serde(rename = "returningList", deserialize_with = "node_list")]
    pub returning_list: Vec<Node>,
    #[serde(rename = "withClause", deserialize_with = "wrapped")]
    pub with_clause: Option<WithClause>,
    #[serde(rename = "override")]
    pub overriding: Option<OverridingKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateStmt {
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    #[serde(rename = "targetList", deserialize_with = "node_list")]
    pub target_list: Vec<Node>,
    #[serde(rename = "whereClause")]
    pub where_clause: Option<Node>,
    #[serde(rename = "fromClause", deserialize_with = "node_list")]
    pub from_clause: Vec<Node>,
    #[serde(rename = "returningList", deserialize_with = "node_list")]
    pub returning_list: Vec<Node>,
    #[serde(rename = "withClause", deserialize_with = "wrapped")]
    pub with_clause: Option<WithClause>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeleteStmt {
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    #[serde(rename = "usingClause", deserialize_with = "node_list")]
    pub using_clause: Vec<Node>,
    #[serde(rename = "whereClause")]
    pub where_clause: Option<Node>,
    #[serde(rename = "returningList", deserialize_with = "node_list")]
    pub returning_list: Vec<Node>,
    #[serde(rename = "withClause", deserialize_with = "wrapped")]
    pub with_clause: Option<WithClause>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateStmt {
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    #[serde(rename = "tableElts", deserialize_with = "node_list")]
    pub table_elts: Vec<Node>,
    #[serde(rename = "inhRelations", deserialize_with = "node_list")]
    pub inh_relations: Vec<Node>,
    #[serde(deserialize_with = "wrapped")]
    pub partspec: Option<PartitionSpec>,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    pub oncommit: Option<OnCommitAction>,
    pub tablespacename: String,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterTableStmt {
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub cmds: Vec<Node>,
    #[serde(alias = "relkind")]
    pub objtype: Option<ObjectType>,
    pub missing_ok: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DropStmt {
    #[serde(deserialize_with = "node_list")]
    pub objects: Vec<Node>,
    #[serde(rename = "removeType")]
    pub remove_type: Option<ObjectType>,
    pub behavior: Option<DropBehavior>,
    pub missing_ok: bool,
    pub concurrent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TruncateStmt {
    #[serde(deserialize_with = "node_list")]
    pub relations: Vec<Node>,
    pub restart_seqs: bool,
    pub behavior: Option<DropBehavior>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndexStmt {
    pub idxname: String,
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    #[serde(rename = "accessMethod")]
    pub access_method: String,
    #[serde(rename = "tableSpace")]
    pub table_space: String,
    #[serde(rename = "indexParams", deserialize_with = "node_list")]
    pub index_params: Vec<Node>,
    #[serde(rename = "indexIncludingParams", deserialize_with = "node_list")]
    pub index_including_params: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    #[serde(rename = "whereClause")]
    pub where_clause: Option<Node>,
    pub unique: bool,
    pub nulls_not_distinct: bool,
    pub concurrent: bool,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateSchemaStmt {
    pub schemaname: String,
    #[serde(deserialize_with = "wrapped")]
    pub authrole: Option<RoleSpec>,
    #[serde(rename = "schemaElts", deserialize_with = "node_list")]
    pub schema_elts: Vec<Node>,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewStmt {
    #[serde(deserialize_with = "wrapped")]
    pub view: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub aliases: Vec<Node>,
    pub query: Option<Node>,
    pub replace: bool,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    #[serde(rename = "withCheckOption")]
    pub with_check_option: Option<ViewCheckOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateSeqStmt {
    #[serde(deserialize_with = "wrapped")]
    pub sequence: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterSeqStmt {
    #[serde(deserialize_with = "wrapped")]
    pub sequence: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    pub missing_ok: bool,
}

/// `ALTER ... RENAME`. The target is `relation` for relations and the
/// columns or constraints on them, `object` for other named objects, and
/// `subname` alone for databases, schemas, roles and tablespaces.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenameStmt {
    #[serde(rename = "renameType")]
    pub rename_type: Option<ObjectType>,
    #[serde(rename = "relationType")]
    pub relation_type: Option<ObjectType>,
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    pub object: Option<Node>,
    pub subname: String,
    pub newname: String,
    pub behavior: Option<DropBehavior>,
    pub missing_ok: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterOwnerStmt {
    #[serde(rename = "objectType")]
    pub object_type: Option<ObjectType>,
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    pub object: Option<Node>,
    #[serde(deserialize_with = "wrapped")]
    pub newowner: Option<RoleSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterObjectSchemaStmt {
    #[serde(rename = "objectType")]
    pub object_type: Option<ObjectType>,
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    pub object: Option<Node>,
    pub newschema: String,
    pub missing_ok: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterFunctionStmt {
    pub objtype: Option<ObjectType>,
    #[serde(deserialize_with = "wrapped")]
    pub func: Option<ObjectWithArgs>,
    #[serde(deserialize_with = "node_list")]
    pub actions: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateExtensionStmt {
    pub extname: String,
    pub if_not_exists: bool,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreatePolicyStmt {
    pub policy_name: String,
    #[serde(deserialize_with = "wrapped")]
    pub table: Option<RangeVar>,
    pub cmd_name: String,
    /// Only an explicit `false` makes the policy restrictive.
    pub permissive: Option<bool>,
    #[serde(deserialize_with = "node_list")]
    pub roles: Vec<Node>,
    pub qual: Option<Node>,
    pub with_check: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterPolicyStmt {
    pub policy_name: String,
    #[serde(deserialize_with = "wrapped")]
    pub table: Option<RangeVar>,
    #[serde(deserialize_with = "node_list")]
    pub roles: Vec<Node>,
    pub qual: Option<Node>,
    pub with_check: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrantStmt {
    pub is_grant: bool,
    pub targtype: Option<GrantTargetType>,
    pub objtype: Option<ObjectType>,
    #[serde(deserialize_with = "node_list")]
    pub objects: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub privileges: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub grantees: Vec<Node>,
    pub grant_option: bool,
    #[serde(deserialize_with = "wrapped")]
    pub grantor: Option<RoleSpec>,
    pub behavior: Option<DropBehavior>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrantRoleStmt {
    #[serde(deserialize_with = "node_list")]
    pub granted_roles: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub grantee_roles: Vec<Node>,
    pub is_grant: bool,
    /// Grant options (`admin`, `inherit`, `set`) as `DefElem`s.
    #[serde(deserialize_with = "node_list")]
    pub opt: Vec<Node>,
    /// Older trees carry the admin option as a flag.
    pub admin_opt: bool,
    #[serde(deserialize_with = "wrapped")]
    pub grantor: Option<RoleSpec>,
    pub behavior: Option<DropBehavior>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlterDefaultPrivilegesStmt {
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    #[serde(deserialize_with = "wrapped")]
    pub action: Option<GrantStmt>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransactionStmt {
    pub kind: Option<TransactionStmtKind>,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    pub savepoint_name: String,
    pub gid: String,
    pub chain: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VacuumStmt {
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    #[serde(deserialize_with = "node_list")]
    pub rels: Vec<Node>,
    pub is_vacuumcmd: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplainStmt {
    pub query: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VariableSetStmt {
    pub kind: Option<VariableSetKind>,
    pub name: String,
    #[serde(deserialize_with = "node_list")]
    pub args: Vec<Node>,
    pub is_local: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VariableShowStmt {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CopyStmt {
    #[serde(deserialize_with = "wrapped")]
    pub relation: Option<RangeVar>,
    pub query: Option<Node>,
    #[serde(deserialize_with = "node_list")]
    pub attlist: Vec<Node>,
    pub is_from: bool,
    pub is_program: bool,
    pub filename: Option<String>,
    #[serde(deserialize_with = "node_list")]
    pub options: Vec<Node>,
    #[serde(rename = "whereClause")]
    pub where_clause: Option<Node>,
}

/// `LOCK TABLE`. `mode` is the lock level, 1 (access share) to 8
/// (access exclusive).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LockStmt {
    #[serde(deserialize_with = "node_list")]
    pub relations: Vec<Node>,
    pub mode: i32,
    pub nowait: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotifyStmt {
    pub conditionname: String,
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListenStmt {
    pub conditionname: String,
}

/// `UNLISTEN`; an absent channel means `*`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnlistenStmt {
    pub conditionname: Option<String>,
}
