//! User-facing findings about the analyzed program.
//!
//! Diagnostics never abort the analysis: they accumulate in a map keyed by
//! the AST node that produced them and are reported after the fixed point is
//! reached. Re-running an action overwrites its previous finding, so the
//! entry surviving at the fixed point is the authoritative one.

use std::collections::HashMap;
use std::fmt;

use crate::types::NodeId;

/// A finding about the program under analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// The divisor is exactly `{0}`.
    DivisionByZero,
    /// The divisor may be zero but holds other values too.
    PossibleDivisionByZero,
    /// A post-condition evaluates to false on the inferred invariant.
    AssertionFailed,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Diagnostic::DivisionByZero => "division by zero",
            Diagnostic::PossibleDivisionByZero => "possible division by zero",
            Diagnostic::AssertionFailed => "assertion failed",
        };
        write!(f, "{}", s)
    }
}

/// Sink collecting diagnostics during solving, one per originating AST node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: HashMap<NodeId, Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding, replacing any earlier one for the same node.
    pub fn insert(&mut self, node: NodeId, diagnostic: Diagnostic) {
        self.entries.insert(node, diagnostic);
    }

    pub fn get(&self, node: NodeId) -> Option<Diagnostic> {
        self.entries.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by node id, for deterministic reporting.
    pub fn sorted(&self) -> Vec<(NodeId, Diagnostic)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(&id, &d)| (id, d)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// True if any finding of the given kind was recorded.
    pub fn any(&self, diagnostic: Diagnostic) -> bool {
        self.entries.values().any(|&d| d == diagnostic)
    }
}
