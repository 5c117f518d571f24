//! Positional render context.
//!
//! A [`Context`] is a small `Copy` value handed down every render call. A
//! child context is derived with the `in_*`/`as_*` methods, which return a new
//! value; siblings never observe each other's flags.

/// Flags describing where in its parent a node is being rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    /// Operand of a boolean connective; nested AND/OR must parenthesize.
    pub inside_boolean_expr: bool,
    /// Target of `UPDATE ... SET`; targets render as `name = value`.
    pub inside_update_assignment: bool,
    pub inside_select_list: bool,
    pub inside_from_clause: bool,
    pub inside_group_clause: bool,
    pub inside_sort_clause: bool,
    /// Values render as quoted string literals whatever their node kind.
    pub literal: bool,
    /// Number of dispatches above this one.
    pub depth: usize,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_boolean_expr(self) -> Self {
        Self {
            inside_boolean_expr: true,
            ..self
        }
    }

    #[must_use]
    pub fn in_update_assignment(self) -> Self {
        Self {
            inside_update_assignment: true,
            ..self
        }
    }

    #[must_use]
    pub fn in_select_list(self) -> Self {
        Self {
            inside_select_list: true,
            ..self
        }
    }

    #[must_use]
    pub fn in_from_clause(self) -> Self {
        Self {
            inside_from_clause: true,
            ..self
        }
    }

    #[must_use]
    pub fn in_group_clause(self) -> Self {
        Self {
            inside_group_clause: true,
            ..self
        }
    }

    #[must_use]
    pub fn in_sort_clause(self) -> Self {
        Self {
            inside_sort_clause: true,
            ..self
        }
    }

    #[must_use]
    pub fn as_literal(self) -> Self {
        Self {
            literal: true,
            ..self
        }
    }

    /// Context for an expression operand: positional flags are dropped, only
    /// depth carries over.
    #[must_use]
    pub fn operand(self) -> Self {
        Self {
            depth: self.depth,
            ..Self::default()
        }
    }

    #[must_use]
    pub(crate) fn descend(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}
