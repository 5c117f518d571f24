//! Tree canonicalization for structural comparison.
//!
//! Two trees that differ only in source offsets, default-valued enumerators
//! or legacy field spellings compare equal after [`canonicalize`]. Used to
//! check that re-parsing rendered SQL yields the tree it came from.

use serde_json::{Map, Value};

const OFFSET_FIELDS: &[&str] = &["location", "stmt_location", "stmt_len"];

/// Strip cosmetic fields from a JSON parse tree.
pub fn canonicalize(value: &Value) -> Value {
    canonical(value, None)
}

fn canonical(value: &Value, tag: Option<&str>) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| canonical(v, None)).collect()),
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some((key, inner)) = map.iter().next() {
                    if key.starts_with(|c: char| c.is_ascii_uppercase()) {
                        let mut out = Map::new();
                        out.insert(key.clone(), canonical(inner, Some(key)));
                        return Value::Object(out);
                    }
                }
            }
            let kind = tag.or_else(|| map.contains_key("relname").then_some("RangeVar"));
            let mut out = Map::new();
            for (field, inner) in map {
                if OFFSET_FIELDS.contains(&field.as_str()) || is_default(kind, field, inner) {
                    continue;
                }
                out.insert(renamed(kind, field).to_string(), canonical(inner, None));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn is_default(kind: Option<&str>, field: &str, value: &Value) -> bool {
    match (kind, field) {
        (Some("RangeVar"), "inh") => value == &Value::Bool(true),
        (Some("RangeVar"), "relpersistence") => value == "p",
        (Some("IndexElem"), "ordering") | (Some("SortBy"), "sortby_dir") => {
            value == "SORTBY_DEFAULT"
        }
        (Some("IndexElem"), "nulls_ordering") | (Some("SortBy"), "sortby_nulls") => {
            value == "SORTBY_NULLS_DEFAULT"
        }
        (Some("DefElem"), "defaction") => value == "DEFELEM_UNSPEC",
        _ => false,
    }
}

fn renamed<'a>(kind: Option<&str>, field: &'a str) -> &'a str {
    match (kind, field) {
        (Some("String"), "str") => "sval",
        (Some("Float"), "str") => "fval",
        (Some("BitString"), "str") => "bsval",
        _ => field,
    }
}
