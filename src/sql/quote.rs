//! Identifier and literal quoting.

use regex::Regex;
use std::sync::LazyLock;

/// Identifiers that survive case folding unchanged.
static PLAIN_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// Whether `ident` can be written without delimiters.
pub fn is_plain_identifier(ident: &str) -> bool {
    PLAIN_IDENT.is_match(ident)
}

/// Quote an identifier with double quotes when it is not plain.
pub fn quote_identifier(ident: &str) -> String {
    if is_plain_identifier(ident) {
        ident.to_string()
    } else {
        quote_double(ident)
    }
}

/// Always delimit an identifier.
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a string literal with single quotes (standard SQL).
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a bit-string constant.
///
/// The parser keeps the radix as a leading `b` or `x`; a body without one is
/// binary.
pub fn quote_bit_string(bits: &str) -> String {
    match bits.split_at_checked(1) {
        Some(("b" | "B", body)) => format!("B'{body}'"),
        Some(("x" | "X", body)) => format!("X'{body}'"),
        _ => format!("B'{bits}'"),
    }
}
