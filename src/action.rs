//! Control-point actions: the compiled equation system.
//!
//! The equation builder lowers the program into a list of actions, each
//! annotated with the control point it reads and the one it writes. The
//! solver runs the whole list once per iteration against a double-buffered
//! invariant vector: every action reads the previous vector `P` and writes
//! the next vector `N`, so actions within one iteration cannot observe each
//! other's output.
//!
//! An action whose input invariant carries no bindings is skipped unless that
//! invariant is the initial one. Reachability thus spreads from the entry
//! point one action per iteration instead of ⊥ being propagated eagerly.

use crate::ast::LogicOp;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::disjoint::DisjointIntervals;
use crate::expr::{BoolExpr, Expr};
use crate::invariant::Invariant;
use crate::types::{CpId, NodeId};

/// One node of the equation system. Immutable once emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `int v;` — bind `v` to ⊤ in a copy of the input.
    Declaration { var: String, input: CpId, output: CpId },
    /// `v = e;` — bind `v` to the value of `e` in a copy of the input.
    ///
    /// `declares` is set for the assignment a pre-condition compiles to: it
    /// constrains an ambient input that has no `int` declaration, so the
    /// binding is inserted rather than required to exist.
    Assignment {
        var: String,
        expr: Expr,
        declares: bool,
        input: CpId,
        output: CpId,
    },
    /// Branch refinement: narrow `v` to the values satisfying `v op e`.
    Filter {
        op: LogicOp,
        var: String,
        expr: Expr,
        input: CpId,
        output: CpId,
    },
    /// Post-condition check; records `assertion failed` against `node` when
    /// the condition is not provable.
    Assertion {
        condition: BoolExpr,
        node: NodeId,
        input: CpId,
        output: CpId,
    },
    /// Merge point: the join of all input invariants.
    Join { output: CpId, inputs: Vec<CpId> },
}

impl Action {
    /// Runs the action: reads `prev`, writes one slot of `next`.
    pub fn execute(&self, prev: &[Invariant], next: &mut [Invariant], diagnostics: &mut Diagnostics) {
        if let Action::Join { output, inputs } = self {
            assert!(output.index() < next.len(), "control point {} out of range", output);
            let mut joined = Invariant::new();
            for &cp in inputs {
                assert!(cp.index() < prev.len(), "control point {} out of range", cp);
                joined = joined.join(&prev[cp.index()]);
            }
            next[output.index()] = joined;
            return;
        }

        let (input, output) = self.edge();
        assert!(input.index() < prev.len(), "control point {} out of range", input);
        assert!(output.index() < next.len(), "control point {} out of range", output);

        let source = &prev[input.index()];
        if source.is_empty() && !source.is_initial() {
            // Not yet reached; leave the output slot at ⊥.
            return;
        }

        let result = match self {
            Action::Declaration { var, .. } => {
                let mut out = source.clone();
                assert!(!out.contains(var), "variable `{}` declared twice", var);
                out.set(var.clone(), DisjointIntervals::top());
                out
            }
            Action::Assignment { var, expr, declares, .. } => {
                let mut out = source.clone();
                if !declares {
                    assert!(out.contains(var), "assignment to undeclared variable `{}`", var);
                }
                let value = expr.eval(source, diagnostics);
                out.set(var.clone(), value);
                out
            }
            Action::Filter { op, var, expr, .. } => {
                let mut out = source.clone();
                let rhs = expr.eval(source, diagnostics);
                let mut value = out
                    .get(var)
                    .unwrap_or_else(|| panic!("filter on undeclared variable `{}`", var))
                    .clone();
                value.filter(*op, &rhs);
                out.set(var.clone(), value);
                out
            }
            Action::Assertion { condition, node, .. } => {
                if !condition.eval(source, diagnostics) {
                    diagnostics.insert(*node, Diagnostic::AssertionFailed);
                }
                source.clone()
            }
            Action::Join { .. } => unreachable!("handled above"),
        };
        next[output.index()] = result;
    }

    /// The (input, output) control points of a non-join action.
    fn edge(&self) -> (CpId, CpId) {
        match self {
            Action::Declaration { input, output, .. }
            | Action::Assignment { input, output, .. }
            | Action::Filter { input, output, .. }
            | Action::Assertion { input, output, .. } => (*input, *output),
            Action::Join { .. } => unreachable!("joins have multiple inputs"),
        }
    }
}
