//! Envelope handling for top-level input.
//!
//! Accepted shapes:
//! - a single node (`{"SelectStmt": {...}}`)
//! - a `RawStmt` envelope, tagged or bare (`{"stmt": ..., "stmt_len": 9}`)
//! - an array of any of the above
//! - a version envelope (`{"version": 170004, "stmts": [...]}`)

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use super::{single_tag, IngestError, Node, RED_ZONE, STACK_SEGMENT};
use crate::error::{DeparseError, Result};

/// One top-level statement ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub node: Node,
    /// Append `;` after the rendered text.
    pub terminated: bool,
}

impl Statement {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            terminated: false,
        }
    }

    /// Peel any `RawStmt` envelopes off `node`.
    pub fn from_node(node: Node) -> Result<Self> {
        let mut terminated = false;
        let mut node = node;
        while let Node::RawStmt(raw) = node {
            terminated |= raw.stmt_len.is_some();
            node = raw
                .stmt
                .ok_or_else(|| DeparseError::missing("RawStmt", "stmt"))?;
        }
        Ok(Self { node, terminated })
    }
}

/// Turn any accepted input shape into top-level statements.
pub fn parse_statements(input: &Value) -> Result<Vec<Statement>> {
    let elements: Vec<&Value> = match input {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) if single_tag(map).is_none() && map.contains_key("stmts") => {
            if let Some(version) = map.get("version") {
                trace!(%version, "unwrapping version envelope");
            }
            match map.get("stmts") {
                Some(Value::Array(items)) => items.iter().collect(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(DeparseError::malformed(
                        "version envelope",
                        format!("`stmts` must be an array, found {other}"),
                    ))
                }
            }
        }
        other => vec![other],
    };

    elements
        .into_iter()
        .map(|element| {
            scan_tags(element)?;
            let node = Node::from_json(element.clone()).map_err(into_deparse_error)?;
            Statement::from_node(node)
        })
        .collect()
}

/// Nesting depth of a JSON value, measured without recursion.
pub fn json_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 1usize)];
    while let Some((value, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        match value {
            Value::Array(items) => stack.extend(items.iter().map(|v| (v, depth + 1))),
            Value::Object(map) => stack.extend(map.values().map(|v| (v, depth + 1))),
            _ => {}
        }
    }
    deepest
}

/// Nesting depth of JSON text, counted over brackets outside strings.
///
/// Malformed text still yields a depth; the parser reports the syntax error.
pub fn text_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    // Scalars sit one level below their container, as in `json_depth`.
    deepest + 1
}

/// Parse JSON text without serde_json's fixed recursion limit.
///
/// Callers bound the nesting with [`text_depth`] first.
pub fn read_json(text: &str) -> serde_json::Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let mut stacked = serde_stacker::Deserializer::new(&mut deserializer);
    stacked.red_zone = RED_ZONE;
    stacked.stack_size = STACK_SEGMENT;
    let value = Value::deserialize(stacked)?;
    deserializer.end()?;
    Ok(value)
}

/// Fail on the first tag with no node kind, with a breadcrumb to it.
fn scan_tags(value: &Value) -> Result<()> {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || scan_tags_inner(value))
}

fn scan_tags_inner(value: &Value) -> Result<()> {
    match value {
        Value::Array(items) => items.iter().try_for_each(scan_tags),
        Value::Object(map) => match single_tag(map) {
            Some(tag) => {
                let Some(kind) = Node::KINDS.iter().copied().find(|k| *k == tag) else {
                    return Err(DeparseError::UnhandledNodeKind { kind: tag });
                };
                map.values()
                    .try_for_each(scan_tags)
                    .map_err(|e| e.within(kind))
            }
            None => map.values().try_for_each(scan_tags),
        },
        _ => Ok(()),
    }
}

pub(crate) fn into_deparse_error(err: IngestError) -> DeparseError {
    match err {
        IngestError::UnknownTag(kind) => DeparseError::UnhandledNodeKind { kind },
        IngestError::Payload { tag, source } => DeparseError::malformed(tag, source.to_string()),
        IngestError::Shape(detail) => DeparseError::malformed("node", detail),
    }
}
