//! # pgdeparse
//!
//! Renders PostgreSQL parse trees, in their JSON encoding, back to SQL text.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 JSON parse tree (serde_json)             │
//! │   bare node, node array, RawStmt, {version, stmts}       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [ast: ingestion]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Node (closed enum, one per kind)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql: Deparser dispatch]
//! ┌─────────────────────────────────────────────────────────┐
//! │        TokenStream (keywords, idents, literals)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Layout from DeparseOptions]
//! ┌─────────────────────────────────────────────────────────┐
//! │                       SQL text                           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//!
//! let tree = json!({"SelectStmt": {"targetList": [
//!     {"ResTarget": {"val": {"A_Const": {"ival": {"ival": 1}}}}}
//! ]}});
//! assert_eq!(pgdeparse::deparse(&tree).unwrap(), "SELECT 1");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod sql;

use serde_json::Value;

pub use config::DeparseOptions;
pub use error::{DeparseError, Result};
pub use sql::Deparser;

/// Render a parse tree with default options.
pub fn deparse(tree: &Value) -> Result<String> {
    Deparser::default().deparse_value(tree)
}

/// Render a parse tree given as JSON text.
pub fn deparse_str(json: &str) -> Result<String> {
    Deparser::default().deparse_json(json)
}

/// Render a parse tree with explicit options.
pub fn deparse_with(tree: &Value, options: &DeparseOptions) -> Result<String> {
    Deparser::new(options.clone()).deparse_value(tree)
}

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::ast::{canonicalize, Node, Statement};
    pub use crate::config::{DeparseOptions, OptionsError};
    pub use crate::error::{DeparseError, Result};
    pub use crate::sql::{Context, Deparse, Deparser, TokenStream};
    pub use crate::{deparse, deparse_str, deparse_with};
}
