//! Closed enumerators carried by node payloads.
//!
//! Each enum keeps values it does not recognize as `Unrecognized`, so the
//! renderer that switches on it can fail with the exact offending value.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

macro_rules! pg_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $tag:literal $(| $alias:literal)*,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)*
            /// A value outside the known set, kept verbatim.
            Unrecognized(String),
        }

        impl $name {
            /// Map an input tag to its variant.
            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $($tag $(| $alias)* => $name::$variant,)*
                    other => $name::Unrecognized(other.to_string()),
                }
            }

            /// The canonical input tag.
            pub fn as_tag(&self) -> &str {
                match self {
                    $($name::$variant => $tag,)*
                    $name::Unrecognized(value) => value,
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(match Value::deserialize(deserializer)? {
                    Value::String(tag) => $name::from_tag(&tag),
                    other => $name::Unrecognized(other.to_string()),
                })
            }
        }
    };
}

pg_enum! {
    /// `DROP`/`TRUNCATE`/`REVOKE` behavior.
    DropBehavior {
        Restrict = "DROP_RESTRICT",
        Cascade = "DROP_CASCADE",
    }
}

pg_enum! {
    /// Object kinds named by DDL and DCL statements.
    ObjectType {
        AccessMethod = "OBJECT_ACCESS_METHOD",
        Aggregate = "OBJECT_AGGREGATE",
        Attribute = "OBJECT_ATTRIBUTE",
        Collation = "OBJECT_COLLATION",
        Column = "OBJECT_COLUMN",
        Conversion = "OBJECT_CONVERSION",
        Database = "OBJECT_DATABASE",
        Domain = "OBJECT_DOMAIN",
        DomConstraint = "OBJECT_DOMCONSTRAINT",
        EventTrigger = "OBJECT_EVENT_TRIGGER",
        Extension = "OBJECT_EXTENSION",
        Fdw = "OBJECT_FDW",
        ForeignServer = "OBJECT_FOREIGN_SERVER",
        ForeignTable = "OBJECT_FOREIGN_TABLE",
        Function = "OBJECT_FUNCTION",
        Index = "OBJECT_INDEX",
        Language = "OBJECT_LANGUAGE",
        LargeObject = "OBJECT_LARGEOBJECT",
        MatView = "OBJECT_MATVIEW",
        OpClass = "OBJECT_OPCLASS",
        Operator = "OBJECT_OPERATOR",
        OpFamily = "OBJECT_OPFAMILY",
        ParameterAcl = "OBJECT_PARAMETER_ACL",
        Policy = "OBJECT_POLICY",
        Procedure = "OBJECT_PROCEDURE",
        Publication = "OBJECT_PUBLICATION",
        Role = "OBJECT_ROLE",
        Routine = "OBJECT_ROUTINE",
        Rule = "OBJECT_RULE",
        Schema = "OBJECT_SCHEMA",
        Sequence = "OBJECT_SEQUENCE",
        StatisticExt = "OBJECT_STATISTIC_EXT",
        Subscription = "OBJECT_SUBSCRIPTION",
        TabConstraint = "OBJECT_TABCONSTRAINT",
        Table = "OBJECT_TABLE",
        Tablespace = "OBJECT_TABLESPACE",
        Trigger = "OBJECT_TRIGGER",
        TsConfiguration = "OBJECT_TSCONFIGURATION",
        TsDictionary = "OBJECT_TSDICTIONARY",
        TsParser = "OBJECT_TSPARSER",
        TsTemplate = "OBJECT_TSTEMPLATE",
        Type = "OBJECT_TYPE",
        View = "OBJECT_VIEW",
    }
}

pg_enum! {
    SetOperation {
        None = "SETOP_NONE",
        Union = "SETOP_UNION",
        Intersect = "SETOP_INTERSECT",
        Except = "SETOP_EXCEPT",
    }
}

pg_enum! {
    LimitOption {
        Default = "LIMIT_OPTION_DEFAULT",
        Count = "LIMIT_OPTION_COUNT",
        WithTies = "LIMIT_OPTION_WITH_TIES",
    }
}

pg_enum! {
    /// Sub-kinds of `A_Expr`.
    AExprKind {
        Op = "AEXPR_OP",
        OpAny = "AEXPR_OP_ANY",
        OpAll = "AEXPR_OP_ALL",
        Distinct = "AEXPR_DISTINCT",
        NotDistinct = "AEXPR_NOT_DISTINCT",
        NullIf = "AEXPR_NULLIF",
        In = "AEXPR_IN",
        Like = "AEXPR_LIKE",
        ILike = "AEXPR_ILIKE",
        Similar = "AEXPR_SIMILAR",
        Between = "AEXPR_BETWEEN",
        NotBetween = "AEXPR_NOT_BETWEEN",
        BetweenSym = "AEXPR_BETWEEN_SYM",
        NotBetweenSym = "AEXPR_NOT_BETWEEN_SYM",
    }
}

pg_enum! {
    BoolExprType {
        And = "AND_EXPR",
        Or = "OR_EXPR",
        Not = "NOT_EXPR",
    }
}

pg_enum! {
    NullTestType {
        IsNull = "IS_NULL",
        IsNotNull = "IS_NOT_NULL",
    }
}

pg_enum! {
    BoolTestType {
        IsTrue = "IS_TRUE",
        IsNotTrue = "IS_NOT_TRUE",
        IsFalse = "IS_FALSE",
        IsNotFalse = "IS_NOT_FALSE",
        IsUnknown = "IS_UNKNOWN",
        IsNotUnknown = "IS_NOT_UNKNOWN",
    }
}

pg_enum! {
    SubLinkType {
        Exists = "EXISTS_SUBLINK",
        All = "ALL_SUBLINK",
        Any = "ANY_SUBLINK",
        RowCompare = "ROWCOMPARE_SUBLINK",
        Expr = "EXPR_SUBLINK",
        MultiExpr = "MULTIEXPR_SUBLINK",
        Array = "ARRAY_SUBLINK",
        Cte = "CTE_SUBLINK",
    }
}

pg_enum! {
    MinMaxOp {
        Greatest = "IS_GREATEST",
        Least = "IS_LEAST",
    }
}

pg_enum! {
    CoercionForm {
        ExplicitCall = "COERCE_EXPLICIT_CALL",
        ExplicitCast = "COERCE_EXPLICIT_CAST",
        ImplicitCast = "COERCE_IMPLICIT_CAST",
        SqlSyntax = "COERCE_SQL_SYNTAX",
    }
}

pg_enum! {
    SqlValueFunctionOp {
        CurrentDate = "SVFOP_CURRENT_DATE",
        CurrentTime = "SVFOP_CURRENT_TIME",
        CurrentTimeN = "SVFOP_CURRENT_TIME_N",
        CurrentTimestamp = "SVFOP_CURRENT_TIMESTAMP",
        CurrentTimestampN = "SVFOP_CURRENT_TIMESTAMP_N",
        LocalTime = "SVFOP_LOCALTIME",
        LocalTimeN = "SVFOP_LOCALTIME_N",
        LocalTimestamp = "SVFOP_LOCALTIMESTAMP",
        LocalTimestampN = "SVFOP_LOCALTIMESTAMP_N",
        CurrentRole = "SVFOP_CURRENT_ROLE",
        CurrentUser = "SVFOP_CURRENT_USER",
        User = "SVFOP_USER",
        SessionUser = "SVFOP_SESSION_USER",
        CurrentCatalog = "SVFOP_CURRENT_CATALOG",
        CurrentSchema = "SVFOP_CURRENT_SCHEMA",
    }
}

pg_enum! {
    GroupingSetKind {
        Empty = "GROUPING_SET_EMPTY",
        Simple = "GROUPING_SET_SIMPLE",
        Rollup = "GROUPING_SET_ROLLUP",
        Cube = "GROUPING_SET_CUBE",
        Sets = "GROUPING_SET_SETS",
    }
}

pg_enum! {
    SortByDir {
        Default = "SORTBY_DEFAULT",
        Asc = "SORTBY_ASC",
        Desc = "SORTBY_DESC",
        Using = "SORTBY_USING",
    }
}

pg_enum! {
    SortByNulls {
        Default = "SORTBY_NULLS_DEFAULT",
        First = "SORTBY_NULLS_FIRST",
        Last = "SORTBY_NULLS_LAST",
    }
}

pg_enum! {
    JoinType {
        Inner = "JOIN_INNER",
        Left = "JOIN_LEFT",
        Full = "JOIN_FULL",
        Right = "JOIN_RIGHT",
    }
}

pg_enum! {
    CteMaterialize {
        Default = "CTEMaterializeDefault",
        Always = "CTEMaterializeAlways",
        Never = "CTEMaterializeNever",
    }
}

pg_enum! {
    OnConflictAction {
        None = "ONCONFLICT_NONE",
        Nothing = "ONCONFLICT_NOTHING",
        Update = "ONCONFLICT_UPDATE",
    }
}

pg_enum! {
    OverridingKind {
        NotSet = "OVERRIDING_NOT_SET",
        UserValue = "OVERRIDING_USER_VALUE",
        SystemValue = "OVERRIDING_SYSTEM_VALUE",
    }
}

pg_enum! {
    LockClauseStrength {
        None = "LCS_NONE",
        ForKeyShare = "LCS_FORKEYSHARE",
        ForShare = "LCS_FORSHARE",
        ForNoKeyUpdate = "LCS_FORNOKEYUPDATE",
        ForUpdate = "LCS_FORUPDATE",
    }
}

pg_enum! {
    LockWaitPolicy {
        Block = "LockWaitBlock",
        Skip = "LockWaitSkip",
        Error = "LockWaitError",
    }
}

pg_enum! {
    GrantTargetType {
        Object = "ACL_TARGET_OBJECT",
        AllInSchema = "ACL_TARGET_ALL_IN_SCHEMA",
        Defaults = "ACL_TARGET_DEFAULTS",
    }
}

pg_enum! {
    RoleSpecType {
        CString = "ROLESPEC_CSTRING",
        CurrentRole = "ROLESPEC_CURRENT_ROLE",
        CurrentUser = "ROLESPEC_CURRENT_USER",
        SessionUser = "ROLESPEC_SESSION_USER",
        Public = "ROLESPEC_PUBLIC",
    }
}

pg_enum! {
    TransactionStmtKind {
        Begin = "TRANS_STMT_BEGIN",
        Start = "TRANS_STMT_START",
        Commit = "TRANS_STMT_COMMIT",
        Rollback = "TRANS_STMT_ROLLBACK",
        Savepoint = "TRANS_STMT_SAVEPOINT",
        Release = "TRANS_STMT_RELEASE",
        RollbackTo = "TRANS_STMT_ROLLBACK_TO",
        Prepare = "TRANS_STMT_PREPARE",
        CommitPrepared = "TRANS_STMT_COMMIT_PREPARED",
        RollbackPrepared = "TRANS_STMT_ROLLBACK_PREPARED",
    }
}

pg_enum! {
    VariableSetKind {
        SetValue = "VAR_SET_VALUE",
        SetDefault = "VAR_SET_DEFAULT",
        SetCurrent = "VAR_SET_CURRENT",
        SetMulti = "VAR_SET_MULTI",
        Reset = "VAR_RESET",
        ResetAll = "VAR_RESET_ALL",
    }
}

pg_enum! {
    ConstrType {
        Null = "CONSTR_NULL",
        NotNull = "CONSTR_NOTNULL",
        Default = "CONSTR_DEFAULT",
        Identity = "CONSTR_IDENTITY",
        Generated = "CONSTR_GENERATED",
        Check = "CONSTR_CHECK",
        Primary = "CONSTR_PRIMARY",
        Unique = "CONSTR_UNIQUE",
        Exclusion = "CONSTR_EXCLUSION",
        Foreign = "CONSTR_FOREIGN",
        AttrDeferrable = "CONSTR_ATTR_DEFERRABLE",
        AttrNotDeferrable = "CONSTR_ATTR_NOT_DEFERRABLE",
        AttrDeferred = "CONSTR_ATTR_DEFERRED",
        AttrImmediate = "CONSTR_ATTR_IMMEDIATE",
    }
}

pg_enum! {
    /// `ALTER TABLE` sub-commands.
    AlterTableType {
        AddColumn = "AT_AddColumn",
        ColumnDefault = "AT_ColumnDefault",
        DropNotNull = "AT_DropNotNull",
        SetNotNull = "AT_SetNotNull",
        SetStatistics = "AT_SetStatistics",
        DropColumn = "AT_DropColumn",
        AlterColumnType = "AT_AlterColumnType",
        AddConstraint = "AT_AddConstraint",
        ValidateConstraint = "AT_ValidateConstraint",
        DropConstraint = "AT_DropConstraint",
        ChangeOwner = "AT_ChangeOwner",
        SetRelOptions = "AT_SetRelOptions",
        ResetRelOptions = "AT_ResetRelOptions",
        SetTableSpace = "AT_SetTableSpace",
        EnableRowSecurity = "AT_EnableRowSecurity",
        DisableRowSecurity = "AT_DisableRowSecurity",
        ForceRowSecurity = "AT_ForceRowSecurity",
        NoForceRowSecurity = "AT_NoForceRowSecurity",
    }
}

pg_enum! {
    OnCommitAction {
        Noop = "ONCOMMIT_NOOP",
        PreserveRows = "ONCOMMIT_PRESERVE_ROWS",
        DeleteRows = "ONCOMMIT_DELETE_ROWS",
        Drop = "ONCOMMIT_DROP",
    }
}

pg_enum! {
    ViewCheckOption {
        NoCheck = "NO_CHECK_OPTION",
        Local = "LOCAL_CHECK_OPTION",
        Cascaded = "CASCADED_CHECK_OPTION",
    }
}

pg_enum! {
    PartitionStrategy {
        List = "PARTITION_STRATEGY_LIST" | "list",
        Range = "PARTITION_STRATEGY_RANGE" | "range",
        Hash = "PARTITION_STRATEGY_HASH" | "hash",
    }
}

pg_enum! {
    DefElemAction {
        Unspec = "DEFELEM_UNSPEC",
        Set = "DEFELEM_SET",
        Add = "DEFELEM_ADD",
        Drop = "DEFELEM_DROP",
    }
}
