//! Type-name resolution and type-modifier decoding.
//!
//! Turns a possibly schema-qualified type name plus an optional modifier into
//! the short SQL spelling (`varchar(20)`, `numeric(10,2)`, `int`, ...). The
//! alias table below is a fixed constant rather than a catalog lookup; changes
//! to it change output and must come with tests.

use super::quote::quote_identifier;

/// Length header counted into character-type modifiers.
pub const VARHDRSZ: i32 = 4;

/// Modifier value meaning "none".
pub const NO_TYPMOD: i32 = -1;

/// Interval range mask meaning "all fields".
pub const INTERVAL_FULL_RANGE: i64 = 0x7FFF;

/// Short spelling of a `pg_catalog` type.
struct CatalogAlias {
    name: &'static str,
    spelling: &'static str,
    /// Trailing words placed after the modifier.
    suffix: &'static str,
}

const CATALOG_ALIASES: &[CatalogAlias] = &[
    alias("bool", "boolean", ""),
    alias("int2", "smallint", ""),
    alias("int4", "int", ""),
    alias("int8", "bigint", ""),
    alias("float4", "real", ""),
    alias("float8", "double precision", ""),
    alias("numeric", "numeric", ""),
    alias("varchar", "varchar", ""),
    alias("timestamp", "timestamp", ""),
    alias("timestamptz", "timestamp", " with time zone"),
    alias("time", "time", ""),
    alias("timetz", "time", " with time zone"),
    alias("interval", "interval", ""),
    alias("bit", "bit", ""),
    alias("varbit", "bit varying", ""),
];

const fn alias(name: &'static str, spelling: &'static str, suffix: &'static str) -> CatalogAlias {
    CatalogAlias {
        name,
        spelling,
        suffix,
    }
}

/// Resolve a type name and its rendered modifier to SQL text.
///
/// Rules, in priority order:
/// 1. unqualified `char` is the quoted internal type `"char"`
/// 2. `pg_catalog.char` keeps its schema: `pg_catalog."char"`
/// 3. other `pg_catalog` names go through the alias table; `bpchar` becomes
///    `char` only when it has a length
/// 4. anything else is quoted per part and dot-joined
pub fn resolve_type_name(names: &[&str], modifier: Option<&str>) -> String {
    let paren = modifier.map(|m| format!("({m})")).unwrap_or_default();
    match names {
        ["char"] => format!("\"char\"{paren}"),
        ["pg_catalog", "char"] => format!("pg_catalog.\"char\"{paren}"),
        ["pg_catalog", "bpchar"] if modifier.is_some() => format!("char{paren}"),
        ["pg_catalog", name] => match CATALOG_ALIASES.iter().find(|a| a.name == *name) {
            Some(a) => format!("{}{paren}{}", a.spelling, a.suffix),
            None => format!("pg_catalog.{}{paren}", quote_identifier(name)),
        },
        parts => {
            let qualified: Vec<String> = parts.iter().map(|p| quote_identifier(p)).collect();
            format!("{}{paren}", qualified.join("."))
        }
    }
}

/// Decode a packed modifier for the base type `type_name` (the last name part).
///
/// `None` when the modifier is absent (`-1`) or the type has no known packing.
pub fn decode_typmod(type_name: &str, typmod: i32) -> Option<String> {
    if typmod < 0 {
        return None;
    }
    match type_name {
        "numeric" | "decimal" => decode_numeric_typmod(typmod).map(|(precision, scale)| {
            if scale == 0 {
                precision.to_string()
            } else {
                format!("{precision},{scale}")
            }
        }),
        "varchar" | "bpchar" | "char" => {
            (typmod >= VARHDRSZ).then(|| (typmod - VARHDRSZ).to_string())
        }
        "time" | "timetz" | "timestamp" | "timestamptz" | "interval" | "bit" | "varbit" => {
            Some(typmod.to_string())
        }
        _ => None,
    }
}

/// Split a numeric modifier into `(precision, scale)`.
pub fn decode_numeric_typmod(typmod: i32) -> Option<(u16, u16)> {
    if typmod < VARHDRSZ {
        return None;
    }
    let packed = typmod - VARHDRSZ;
    let precision = ((packed >> 16) & 0xFFFF) as u16;
    let scale = (packed & 0xFFFF) as u16;
    Some((precision, scale))
}

/// Pack `(precision, scale)` the way the server stores a numeric modifier.
pub fn encode_numeric_typmod(precision: u16, scale: u16) -> i32 {
    ((i32::from(precision) << 16) | i32::from(scale)) + VARHDRSZ
}

/// Field keywords for an interval range mask.
pub fn interval_fields(mask: i64) -> Option<&'static str> {
    const MONTH: i64 = 1 << 1;
    const YEAR: i64 = 1 << 2;
    const DAY: i64 = 1 << 3;
    const HOUR: i64 = 1 << 10;
    const MINUTE: i64 = 1 << 11;
    const SECOND: i64 = 1 << 12;

    Some(match mask {
        YEAR => "year",
        MONTH => "month",
        DAY => "day",
        HOUR => "hour",
        MINUTE => "minute",
        SECOND => "second",
        m if m == YEAR | MONTH => "year to month",
        m if m == DAY | HOUR => "day to hour",
        m if m == DAY | HOUR | MINUTE => "day to minute",
        m if m == DAY | HOUR | MINUTE | SECOND => "day to second",
        m if m == HOUR | MINUTE => "hour to minute",
        m if m == HOUR | MINUTE | SECOND => "hour to second",
        m if m == MINUTE | SECOND => "minute to second",
        _ => return None,
    })
}
