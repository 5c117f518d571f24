//! Configuration module for the deparser.
//!
//! Handles whitespace layout options and the recursion limit.

mod options;

pub use options::{DeparseOptions, OptionsError};
