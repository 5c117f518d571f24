//! TOML-based deparser options.
//!
//! Options only affect whitespace; token content never changes.
//!
//! Example configuration:
//! ```toml
//! pretty = true
//! newline = "\n"
//! tab = "    "
//! max_depth = 512
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for options loading.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("Options file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read options file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse options: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid option `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Whitespace and safety knobs for the deparser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeparseOptions {
    /// Line break between major clauses in pretty mode, and between statements.
    pub newline: String,

    /// Indent unit for clause bodies on continuation lines.
    pub tab: String,

    /// Break major clauses onto their own lines.
    pub pretty: bool,

    /// Deepest node nesting accepted before rendering is refused.
    pub max_depth: usize,
}

impl Default for DeparseOptions {
    fn default() -> Self {
        Self {
            newline: "\n".to_string(),
            tab: "  ".to_string(),
            pretty: false,
            max_depth: 256,
        }
    }
}

impl DeparseOptions {
    /// Single-line output with default limits.
    pub fn compact() -> Self {
        Self::default()
    }

    /// Multi-line output, one major clause per line.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    #[must_use]
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = tab.into();
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        let options: DeparseOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OptionsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject whitespace options that would change token content.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.newline.is_empty() || !self.newline.chars().all(char::is_whitespace) {
            return Err(OptionsError::Invalid {
                name: "newline",
                reason: "must be non-empty whitespace".to_string(),
            });
        }
        if !self.tab.chars().all(|c| c == ' ' || c == '\t') {
            return Err(OptionsError::Invalid {
                name: "tab",
                reason: "must contain only spaces or tabs".to_string(),
            });
        }
        if self.max_depth == 0 {
            return Err(OptionsError::Invalid {
                name: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
