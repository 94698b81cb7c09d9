//! Compiled expressions, evaluated against an environment.
//!
//! The equation builder lowers the arithmetic subtrees of the AST into these
//! owning trees once; each tree is then owned by exactly one action and
//! re-evaluated every solver iteration. Division is where diagnostics
//! originate: the evaluation inspects the divisor's abstract value and
//! records a finding keyed by the division node.

use crate::ast::{BinOp, LogicOp};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::disjoint::DisjointIntervals;
use crate::interval::Interval;
use crate::invariant::Invariant;
use crate::types::NodeId;

/// Arithmetic expression over interval unions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A fixed interval, independent of the environment. Integer literals
    /// are single points; pre-conditions contribute genuine ranges.
    Const(Interval),
    /// The current value of a variable.
    Var(String),
    /// Binary arithmetic; `node` is the originating AST node, used to key
    /// division diagnostics.
    Binary {
        op: BinOp,
        node: NodeId,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn constant(value: i64) -> Self {
        Expr::Const(Interval::constant(value))
    }

    /// Evaluates the expression in `env`.
    ///
    /// # Panics
    ///
    /// Panics if a variable is read before its declaration; the equation
    /// builder only emits expressions over declared variables, so such a read
    /// is an analyzer bug, not a program-under-analysis error.
    pub fn eval(&self, env: &Invariant, diagnostics: &mut Diagnostics) -> DisjointIntervals {
        match self {
            Expr::Const(interval) => DisjointIntervals::from(*interval),
            Expr::Var(name) => env
                .get(name)
                .unwrap_or_else(|| panic!("variable `{}` read before declaration", name))
                .clone(),
            Expr::Binary { op, node, left, right } => {
                let lval = left.eval(env, diagnostics);
                let rval = right.eval(env, diagnostics);
                match op {
                    BinOp::Add => &lval + &rval,
                    BinOp::Sub => &lval - &rval,
                    BinOp::Mul => &lval * &rval,
                    BinOp::Div => {
                        if rval == DisjointIntervals::constant(0) {
                            diagnostics.insert(*node, Diagnostic::DivisionByZero);
                        } else if rval.contains(0) {
                            diagnostics.insert(*node, Diagnostic::PossibleDivisionByZero);
                        }
                        &lval / &rval
                    }
                }
            }
        }
    }
}

/// Comparison of two expressions, evaluated to a truth value over the
/// abstract environment.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolExpr {
    pub op: LogicOp,
    pub left: Expr,
    pub right: Expr,
}

impl BoolExpr {
    /// Whether the comparison holds for the evaluated sides.
    ///
    /// The underlying union comparisons are conservative bound checks, so a
    /// `false` here means "not provable", which the assertion action reports.
    pub fn eval(&self, env: &Invariant, diagnostics: &mut Diagnostics) -> bool {
        let lval = self.left.eval(env, diagnostics);
        let rval = self.right.eval(env, diagnostics);
        match self.op {
            LogicOp::Lt => lval.lt(&rval),
            LogicOp::Le => lval.le(&rval),
            LogicOp::Gt => lval.gt(&rval),
            LogicOp::Ge => lval.ge(&rval),
            LogicOp::Eq => lval == rval,
            LogicOp::Ne => lval != rval,
        }
    }
}
