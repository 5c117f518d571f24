//! Parse-tree node model and the JSON ingestion boundary.
//!
//! A parse tree arrives as JSON in which every node is a single-key object,
//! `{"Tag": {payload}}`. Several dialects of that encoding exist in the wild:
//!
//! - range variables and raw statements stored bare (payload without tag)
//! - typed fields whose payload is sometimes tagged, sometimes bare
//! - node sequences as plain arrays or as `{"List": {"items": [...]}}`
//! - value nodes spelled `str` (legacy) or `sval`/`fval`/`bsval` (current)
//!
//! Everything is normalized here, so renderers only ever see [`Node`].
//!
//! ```text
//!   JSON  ──► ingest (envelopes, tag scan) ──► Node ──► sql::Deparser
//! ```

mod canonical;
mod enums;
mod expr;
mod ingest;
mod stmt;
mod values;

pub use canonical::canonicalize;
pub use enums::*;
pub use expr::*;
pub use ingest::{json_depth, parse_statements, read_json, text_depth, Statement};
pub use stmt::*;
pub use values::*;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Payload types that have a node tag.
pub trait Tagged {
    /// The tag as it appears in the input.
    const TAG: &'static str;
}

/// Failure while turning JSON into nodes.
#[derive(Debug, thiserror::Error)]
pub(crate) enum IngestError {
    #[error("unhandled node kind: {0}")]
    UnknownTag(String),

    #[error("{tag}: {source}")]
    Payload {
        tag: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Shape(String),
}

macro_rules! nodes {
    ($($variant:ident($payload:ident) = $tag:literal,)*) => {
        /// A parse-tree node, one variant per supported node kind.
        ///
        /// Adding a variant here will cause compile errors everywhere
        /// it needs to be handled (exhaustive matching).
        #[derive(Debug, Clone, PartialEq)]
        pub enum Node {
            $($variant(Box<$payload>),)*
        }

        $(
            impl Tagged for $payload {
                const TAG: &'static str = $tag;
            }

            impl From<$payload> for Node {
                fn from(payload: $payload) -> Self {
                    Node::$variant(Box::new(payload))
                }
            }
        )*

        impl Node {
            /// Every tag this crate can ingest.
            pub const KINDS: &'static [&'static str] = &[$($tag,)*];

            /// The node's tag as it appears in the input.
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Node::$variant(_) => $tag,)*
                }
            }

            fn from_tagged(tag: &str, payload: Value) -> Result<Node, IngestError> {
                match tag {
                    $($tag => from_payload::<$payload>(payload)
                        .map(|p| Node::$variant(Box::new(p)))
                        .map_err(|source| IngestError::Payload { tag: $tag, source }),)*
                    other => Err(IngestError::UnknownTag(other.to_string())),
                }
            }
        }
    };
}

nodes! {
    // Values
    String(StringValue) = "String",
    Integer(IntegerValue) = "Integer",
    Float(FloatValue) = "Float",
    Boolean(BooleanValue) = "Boolean",
    BitString(BitStringValue) = "BitString",
    Null(NullValue) = "Null",
    List(List) = "List",
    AStar(AStar) = "A_Star",

    // Expressions
    AConst(AConst) = "A_Const",
    ColumnRef(ColumnRef) = "ColumnRef",
    ParamRef(ParamRef) = "ParamRef",
    AExpr(AExpr) = "A_Expr",
    BoolExpr(BoolExpr) = "BoolExpr",
    NullTest(NullTest) = "NullTest",
    BooleanTest(BooleanTest) = "BooleanTest",
    FuncCall(FuncCall) = "FuncCall",
    WindowDef(WindowDef) = "WindowDef",
    TypeCast(TypeCast) = "TypeCast",
    TypeName(TypeName) = "TypeName",
    CaseExpr(CaseExpr) = "CaseExpr",
    CaseWhen(CaseWhen) = "CaseWhen",
    CoalesceExpr(CoalesceExpr) = "CoalesceExpr",
    MinMaxExpr(MinMaxExpr) = "MinMaxExpr",
    RowExpr(RowExpr) = "RowExpr",
    AArrayExpr(AArrayExpr) = "A_ArrayExpr",
    AIndirection(AIndirection) = "A_Indirection",
    AIndices(AIndices) = "A_Indices",
    SubLink(SubLink) = "SubLink",
    SqlValueFunction(SqlValueFunction) = "SQLValueFunction",
    NamedArgExpr(NamedArgExpr) = "NamedArgExpr",
    CollateClause(CollateClause) = "CollateClause",
    SetToDefault(SetToDefault) = "SetToDefault",
    GroupingSet(GroupingSet) = "GroupingSet",
    GroupingFunc(GroupingFunc) = "GroupingFunc",
    SortBy(SortBy) = "SortBy",
    ResTarget(ResTarget) = "ResTarget",
    MultiAssignRef(MultiAssignRef) = "MultiAssignRef",

    // Analyzed-tree expressions
    OpExpr(OpExpr) = "OpExpr",
    Aggref(Aggref) = "Aggref",
    WindowFunc(WindowFunc) = "WindowFunc",
    TargetEntry(TargetEntry) = "TargetEntry",

    // FROM clause
    RangeVar(RangeVar) = "RangeVar",
    Alias(Alias) = "Alias",
    JoinExpr(JoinExpr) = "JoinExpr",
    RangeSubselect(RangeSubselect) = "RangeSubselect",
    RangeFunction(RangeFunction) = "RangeFunction",

    // Clauses
    WithClause(WithClause) = "WithClause",
    CommonTableExpr(CommonTableExpr) = "CommonTableExpr",
    OnConflictClause(OnConflictClause) = "OnConflictClause",
    InferClause(InferClause) = "InferClause",
    IndexElem(IndexElem) = "IndexElem",
    LockingClause(LockingClause) = "LockingClause",
    IntoClause(IntoClause) = "IntoClause",
    DefElem(DefElem) = "DefElem",
    RoleSpec(RoleSpec) = "RoleSpec",
    AccessPriv(AccessPriv) = "AccessPriv",
    ObjectWithArgs(ObjectWithArgs) = "ObjectWithArgs",
    PartitionSpec(PartitionSpec) = "PartitionSpec",
    PartitionElem(PartitionElem) = "PartitionElem",
    ColumnDef(ColumnDef) = "ColumnDef",
    Constraint(Constraint) = "Constraint",
    VacuumRelation(VacuumRelation) = "VacuumRelation",
    AlterTableCmd(AlterTableCmd) = "AlterTableCmd",

    // Statements
    RawStmt(RawStmt) = "RawStmt",
    SelectStmt(SelectStmt) = "SelectStmt",
    InsertStmt(InsertStmt) = "InsertStmt",
    UpdateStmt(UpdateStmt) = "UpdateStmt",
    DeleteStmt(DeleteStmt) = "DeleteStmt",
    CreateStmt(CreateStmt) = "CreateStmt",
    AlterTableStmt(AlterTableStmt) = "AlterTableStmt",
    DropStmt(DropStmt) = "DropStmt",
    TruncateStmt(TruncateStmt) = "TruncateStmt",
    IndexStmt(IndexStmt) = "IndexStmt",
    CreateSchemaStmt(CreateSchemaStmt) = "CreateSchemaStmt",
    ViewStmt(ViewStmt) = "ViewStmt",
    CreateSeqStmt(CreateSeqStmt) = "CreateSeqStmt",
    AlterSeqStmt(AlterSeqStmt) = "AlterSeqStmt",
    RenameStmt(RenameStmt) = "RenameStmt",
    AlterOwnerStmt(AlterOwnerStmt) = "AlterOwnerStmt",
    AlterObjectSchemaStmt(AlterObjectSchemaStmt) = "AlterObjectSchemaStmt",
    AlterFunctionStmt(AlterFunctionStmt) = "AlterFunctionStmt",
    CreateExtensionStmt(CreateExtensionStmt) = "CreateExtensionStmt",
    CreatePolicyStmt(CreatePolicyStmt) = "CreatePolicyStmt",
    AlterPolicyStmt(AlterPolicyStmt) = "AlterPolicyStmt",
    GrantStmt(GrantStmt) = "GrantStmt",
    GrantRoleStmt(GrantRoleStmt) = "GrantRoleStmt",
    AlterDefaultPrivilegesStmt(AlterDefaultPrivilegesStmt) = "AlterDefaultPrivilegesStmt",
    TransactionStmt(TransactionStmt) = "TransactionStmt",
    VacuumStmt(VacuumStmt) = "VacuumStmt",
    ExplainStmt(ExplainStmt) = "ExplainStmt",
    VariableSetStmt(VariableSetStmt) = "VariableSetStmt",
    VariableShowStmt(VariableShowStmt) = "VariableShowStmt",
    CopyStmt(CopyStmt) = "CopyStmt",
    LockStmt(LockStmt) = "LockStmt",
    NotifyStmt(NotifyStmt) = "NotifyStmt",
    ListenStmt(ListenStmt) = "ListenStmt",
    UnlistenStmt(UnlistenStmt) = "UnlistenStmt",
}

impl Node {
    /// Build a node from any accepted JSON shape.
    pub(crate) fn from_json(value: Value) -> Result<Node, IngestError> {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || Node::from_json_inner(value))
    }

    fn from_json_inner(value: Value) -> Result<Node, IngestError> {
        match value {
            Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(Node::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(List { items }.into())
            }
            // NULL list elements are written as `{}`.
            Value::Object(map) if map.is_empty() => Ok(NullValue {}.into()),
            Value::Object(mut map) => {
                if let Some(tag) = single_tag(&map) {
                    let payload = match map.remove(&tag) {
                        Some(Value::Null) | None => Value::Object(Map::new()),
                        Some(payload) => payload,
                    };
                    return Node::from_tagged(&tag, payload);
                }
                if map.contains_key("relname") {
                    return Node::from_tagged(RangeVar::TAG, Value::Object(map));
                }
                if map.contains_key("stmt") {
                    return Node::from_tagged(RawStmt::TAG, Value::Object(map));
                }
                let fields: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(IngestError::Shape(format!(
                    "untagged node with fields [{}]",
                    fields.join(", ")
                )))
            }
            Value::Null => Err(IngestError::Shape("null where a node was expected".into())),
            other => Err(IngestError::Shape(format!(
                "expected a node, found {other}"
            ))),
        }
    }

    /// Sequence view: a `List` yields its items, anything else itself.
    pub fn items(&self) -> &[Node] {
        match self {
            Node::List(list) => &list.items,
            other => std::slice::from_ref(other),
        }
    }

    /// The text of a `String` node.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(&s.sval),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Node::from_json(value).map_err(de::Error::custom)
    }
}

/// The key of a single-key object whose key looks like a node tag.
pub(crate) fn single_tag(map: &Map<String, Value>) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    map.keys()
        .next()
        .filter(|k| k.starts_with(|c: char| c.is_ascii_uppercase()))
        .cloned()
}

// ============================================================================
// Field-level normalization
// ============================================================================

/// Stack that must remain before descending into a child node.
pub(crate) const RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment allocated once the red zone is reached.
pub(crate) const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Deserialize a payload object.
///
/// Fields set to `null` are dropped first, so they take the same defaults as
/// absent ones. Every nested deserialize call may grow the stack.
pub(crate) fn from_payload<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    let value = match value {
        Value::Object(mut map) => {
            map.retain(|_, field| !field.is_null());
            Value::Object(map)
        }
        other => other,
    };
    let mut deserializer = serde_stacker::Deserializer::new(value);
    deserializer.red_zone = RED_ZONE;
    deserializer.stack_size = STACK_SEGMENT;
    T::deserialize(deserializer)
}

/// A node sequence: array, `List` container, single node, null, or absent.
pub(crate) fn node_list<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Node>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Node::List(list)) => list.items,
        Some(node) => vec![node],
    })
}

/// A typed payload that may arrive tagged (`{"RangeVar": {...}}`) or bare.
pub(crate) fn wrapped<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Tagged,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(mut map)) if map.len() == 1 && map.contains_key(T::TAG) => {
            let inner = match map.remove(T::TAG) {
                Some(Value::Null) | None => Value::Object(Map::new()),
                Some(inner) => inner,
            };
            from_payload(inner)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("{}: {e}", T::TAG)))
        }
        Some(value) => from_payload(value)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("{}: {e}", T::TAG))),
    }
}

/// [`wrapped`] for recursive positions that need a box.
pub(crate) fn wrapped_box<'de, D, T>(deserializer: D) -> Result<Option<Box<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Tagged,
{
    wrapped::<D, T>(deserializer).map(|v| v.map(Box::new))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tagged_node() {
        let n = node(json!({"String": {"sval": "users"}}));
        assert_eq!(n.kind(), "String");
        assert_eq!(n.as_str(), Some("users"));
    }

    #[test]
    fn test_legacy_string_spelling() {
        let legacy = node(json!({"String": {"str": "users"}}));
        let current = node(json!({"String": {"sval": "users"}}));
        assert_eq!(legacy, current);
    }

    #[test]
    fn test_bare_range_var() {
        let n = node(json!({"relname": "users", "inh": true}));
        match n {
            Node::RangeVar(rv) => assert_eq!(rv.relname, "users"),
            other => panic!("expected RangeVar, got {}", other.kind()),
        }
    }

    #[test]
    fn test_bare_array_is_list() {
        let n = node(json!([{"String": {"sval": "a"}}, {"String": {"sval": "b"}}]));
        assert_eq!(n.kind(), "List");
        assert_eq!(n.items().len(), 2);
    }

    #[test]
    fn test_list_container_unwraps_into_sequence() {
        let cref: ColumnRef = serde_json::from_value(json!({
            "fields": {"List": {"items": [{"String": {"sval": "id"}}]}}
        }))
        .unwrap();
        assert_eq!(cref.fields.len(), 1);
    }

    #[test]
    fn test_absent_sequence_is_empty() {
        let cref: ColumnRef = serde_json::from_value(json!({})).unwrap();
        assert!(cref.fields.is_empty());
    }

    #[test]
    fn test_wrapped_field_accepts_both_shapes() {
        let bare: InsertStmt =
            serde_json::from_value(json!({"relation": {"relname": "items"}})).unwrap();
        let tagged: InsertStmt =
            serde_json::from_value(json!({"relation": {"RangeVar": {"relname": "items"}}}))
                .unwrap();
        assert_eq!(bare.relation, tagged.relation);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = serde_json::from_value::<Node>(json!({"FrobnicateStmt": {}})).unwrap_err();
        assert!(err.to_string().contains("FrobnicateStmt"));
    }

    #[test]
    fn test_null_payload_is_empty() {
        let n = node(json!({"A_Star": null}));
        assert_eq!(n.kind(), "A_Star");
    }

    #[test]
    fn test_empty_object_is_null() {
        let n = node(json!([{"FuncCall": {"funcname": [{"String": {"sval": "f"}}]}}, {}]));
        assert_eq!(n.items()[1].kind(), "Null");
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let rv: RangeVar = from_payload(json!({
            "catalogname": null,
            "schemaname": null,
            "relname": "s",
            "inh": null,
            "relpersistence": null,
            "alias": null
        }))
        .unwrap();
        assert_eq!(rv.schemaname, "");
        assert_eq!(rv.relname, "s");
        assert_eq!(rv.inh, None);
        assert_eq!(rv.alias, None);
    }

    #[test]
    fn test_null_fields_inside_wrapped_payload() {
        let n = node(json!({"CreateSeqStmt": {"sequence": {"RangeVar": {
            "schemaname": null,
            "relname": "s",
            "inh": true,
            "relpersistence": "p"
        }}}}));
        match n {
            Node::CreateSeqStmt(stmt) => {
                let sequence = stmt.sequence.unwrap();
                assert_eq!(sequence.relname, "s");
                assert_eq!(sequence.schemaname, "");
            }
            other => panic!("expected CreateSeqStmt, got {}", other.kind()),
        }
    }

    #[test]
    fn test_kinds_are_unique() {
        let mut kinds = Node::KINDS.to_vec();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), Node::KINDS.len());
    }

    #[test]
    fn test_node_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Node>();
    }
}
