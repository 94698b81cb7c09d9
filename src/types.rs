//! Type-safe wrappers for AST node identifiers and control-point indices.
//!
//! Both are plain indices at runtime, but confusing one for the other is an
//! easy mistake in the equation builder, so each gets its own newtype.

use std::fmt;

/// Identifier of an AST node, assigned at parse time.
///
/// Node ids are stable for the lifetime of the analysis and key the
/// diagnostics map: every warning refers to the node that produced it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a control point in the invariant vector.
///
/// # Invariants
///
/// - Control point 0 is the program entry.
/// - An action emitted at position `i` of the action list writes control
///   point `i + 1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CpId(usize);

impl CpId {
    pub fn new(index: usize) -> Self {
        CpId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// The control point written by the action following this one.
    pub fn next(self) -> Self {
        CpId(self.0 + 1)
    }

    pub fn is_entry(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
