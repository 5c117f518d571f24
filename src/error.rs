//! Deparser error types.

use thiserror::Error;

/// Result type for deparse operations.
pub type Result<T> = std::result::Result<T, DeparseError>;

/// Errors raised while turning a parse tree back into SQL.
///
/// Every error is fatal for the render call that produced it; there is no
/// partial output. Errors raised below a node are wrapped in
/// [`DeparseError::Nested`] on the way up, so the displayed message reads as a
/// breadcrumb trail (`error deparsing SelectStmt: error deparsing A_Expr: ...`).
#[derive(Error, Debug)]
pub enum DeparseError {
    /// A node tag with no renderer.
    #[error("unhandled node kind: {kind}")]
    UnhandledNodeKind {
        /// The offending tag.
        kind: String,
    },

    /// A known node kind carrying an enumerator value outside its known set.
    #[error("unhandled {node} variant: {value}")]
    UnhandledVariant {
        /// Node kind that owns the enumerator.
        node: &'static str,
        /// The enumerator value as it appeared in the input.
        value: String,
    },

    /// A required constituent is absent or structurally wrong.
    #[error("malformed {node} payload: {detail}")]
    MalformedPayload {
        /// Node kind whose payload is broken.
        node: String,
        /// What is wrong with it.
        detail: String,
    },

    /// The tree nests deeper than the configured limit.
    #[error("node tree exceeds maximum depth of {limit}")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The input text is not JSON.
    #[error("invalid JSON input: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// An error raised while rendering a child of `node`.
    #[error("error deparsing {node}: {source}")]
    Nested {
        /// Kind of the enclosing node.
        node: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<DeparseError>,
    },
}

impl DeparseError {
    pub(crate) fn malformed(node: impl Into<String>, detail: impl Into<String>) -> Self {
        DeparseError::MalformedPayload {
            node: node.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn missing(node: &'static str, field: &str) -> Self {
        DeparseError::MalformedPayload {
            node: node.to_string(),
            detail: format!("missing required field `{field}`"),
        }
    }

    pub(crate) fn variant(node: &'static str, value: impl Into<String>) -> Self {
        DeparseError::UnhandledVariant {
            node,
            value: value.into(),
        }
    }

    /// Wrap `self` with the kind of the node whose render failed.
    pub(crate) fn within(self, node: &'static str) -> Self {
        DeparseError::Nested {
            node,
            source: Box::new(self),
        }
    }

    /// The innermost error, past every breadcrumb.
    pub fn root_cause(&self) -> &DeparseError {
        let mut current = self;
        while let DeparseError::Nested { source, .. } = current {
            current = source;
        }
        current
    }

    /// Node kinds from outermost to innermost.
    pub fn breadcrumbs(&self) -> Vec<&'static str> {
        let mut trail = Vec::new();
        let mut current = self;
        while let DeparseError::Nested { node, source } = current {
            trail.push(*node);
            current = source;
        }
        trail
    }
}
