//! Well-known operator and function identifiers.
//!
//! Analyzed trees name operators, aggregates and window functions by catalog
//! OID instead of by text. Only the handful of built-ins below are resolved;
//! there is no live catalog behind this table.

use tracing::warn;

/// `(oid, symbol)` pairs for built-in operators.
const OPERATORS: &[(u32, &str)] = &[
    // bool
    (91, "="),
    // int4
    (96, "="),
    (518, "<>"),
    (97, "<"),
    (521, ">"),
    (523, "<="),
    (525, ">="),
    (551, "+"),
    (555, "-"),
    (514, "*"),
    (528, "/"),
    (530, "%"),
    // int8
    (410, "="),
    (411, "<>"),
    (412, "<"),
    (413, ">"),
    (414, "<="),
    (415, ">="),
    (684, "+"),
    (685, "-"),
    (686, "*"),
    (687, "/"),
    // text and the LIKE family
    (98, "="),
    (531, "<>"),
    (654, "||"),
    (1209, "~~"),
    (1210, "!~~"),
    (1627, "~~*"),
    (1628, "!~~*"),
    // float8
    (670, "="),
    (671, "<>"),
    (672, "<"),
    (673, "<="),
    (674, ">"),
    (675, ">="),
    // numeric
    (1752, "="),
    (1753, "<>"),
    (1754, "<"),
    (1755, "<="),
    (1756, ">"),
    (1757, ">="),
    (1758, "+"),
    (1759, "-"),
    (1760, "*"),
    (1761, "/"),
];

/// `(oid, name)` pairs for built-in aggregates.
const AGGREGATES: &[(u32, &str)] = &[
    (2803, "count"),
    (2147, "count"),
    (2107, "sum"),
    (2108, "sum"),
    (2100, "avg"),
    (2101, "avg"),
    (2115, "max"),
    (2116, "max"),
    (2131, "min"),
    (2132, "min"),
];

/// `(oid, name)` pairs for built-in window functions.
const WINDOW_FUNCTIONS: &[(u32, &str)] = &[
    (3100, "row_number"),
    (3101, "rank"),
    (3102, "dense_rank"),
    (3103, "percent_rank"),
    (3104, "cume_dist"),
    (3105, "ntile"),
    (3106, "lag"),
    (3109, "lead"),
    (3112, "first_value"),
    (3113, "last_value"),
    (3114, "nth_value"),
];

fn lookup(table: &[(u32, &'static str)], oid: u32) -> Option<&'static str> {
    table.iter().find(|(id, _)| *id == oid).map(|(_, name)| *name)
}

/// Symbol of an operator OID. Unknown OIDs fall back to `=`.
pub fn operator_symbol(opno: u32) -> &'static str {
    lookup(OPERATORS, opno).unwrap_or_else(|| {
        warn!(opno, "unknown operator OID, rendering as `=`");
        "="
    })
}

pub fn aggregate_name(oid: u32) -> Option<&'static str> {
    lookup(AGGREGATES, oid)
}

pub fn window_function_name(oid: u32) -> Option<&'static str> {
    lookup(WINDOW_FUNCTIONS, oid)
}
