//! SQL rendering.
//!
//! - [`deparser`] - the [`Deparser`] facade and node dispatch
//! - [`token`] - tokens and layout-aware serialization
//! - [`context`] - the per-call rendering context
//! - [`quote`] - identifier and literal quoting
//! - [`types`] - type-name resolution and typmod decoding
//! - [`catalog`] - well-known operator and function identifiers
//! - [`expr`] - expression renderers
//! - [`query`] - SELECT and the FROM clause
//! - [`dml`] - INSERT, UPDATE, DELETE
//! - [`ddl`] - CREATE, ALTER, DROP, TRUNCATE
//! - [`dcl`] - GRANT, REVOKE
//! - [`utility`] - transactions, maintenance, session, COPY, LOCK, NOTIFY

pub mod catalog;
pub mod context;
pub mod dcl;
pub mod ddl;
pub mod deparser;
pub mod dml;
pub mod expr;
pub mod query;
pub mod quote;
pub mod token;
pub mod types;
pub mod utility;

#[cfg(test)]
pub mod test_utils;

pub use context::Context;
pub use deparser::{Deparse, Deparser};
pub use quote::{is_plain_identifier, quote_identifier, quote_string};
pub use token::{Layout, Token, TokenStream};
pub use types::{decode_numeric_typmod, encode_numeric_typmod, resolve_type_name};
