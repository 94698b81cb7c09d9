//! Per-control-point abstract environments.
//!
//! An [`Invariant`] maps each declared variable to the union of intervals it
//! may hold when execution reaches the control point. A variable absent from
//! the map is not declared there; a variable bound to ⊥ means the control
//! point is unreachable.

use std::collections::HashMap;
use std::fmt;

use crate::disjoint::DisjointIntervals;

/// Abstract environment at one control point.
///
/// The `is_initial` flag marks the entry control point: actions reading it
/// must run even though its map is empty, which is how reachability is seeded
/// into the otherwise all-⊥ initial vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invariant {
    bindings: HashMap<String, DisjointIntervals>,
    is_initial: bool,
}

impl Invariant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn set_initial(&mut self, flag: bool) {
        self.is_initial = flag;
    }

    pub fn get(&self, var: &str) -> Option<&DisjointIntervals> {
        self.bindings.get(var)
    }

    pub fn set(&mut self, var: impl Into<String>, value: DisjointIntervals) {
        self.bindings.insert(var.into(), value);
    }

    pub fn contains(&self, var: &str) -> bool {
        self.bindings.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Variable names in sorted order, for deterministic output.
    pub fn sorted_vars(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        vars.sort_unstable();
        vars
    }

    /// Joins two environments variable-wise. A variable missing on one side
    /// counts as ⊥ there, so the result binds the union of both variable
    /// sets.
    pub fn join(&self, other: &Invariant) -> Invariant {
        let mut result = Invariant::new();
        for (var, value) in &self.bindings {
            match other.bindings.get(var) {
                Some(other_value) => result.set(var.clone(), value.join(other_value)),
                None => result.set(var.clone(), value.clone()),
            }
        }
        for (var, value) in &other.bindings {
            if !self.contains(var) {
                result.set(var.clone(), value.clone());
            }
        }
        result
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return writeln!(f, "No assignments.");
        }
        for var in self.sorted_vars() {
            writeln!(f, "{} -> {}", var, self.bindings[var])?;
        }
        Ok(())
    }
}
