//! # interval-analyzer: Abstract Interpretation over Interval Unions
//!
//! **`interval-analyzer`** is a static analyzer for a mini imperative language over
//! scalar integer variables. It computes an over-approximating invariant at every
//! control point of the program and flags operations that may go wrong on some
//! execution: divisions by zero and failing post-conditions.
//!
//! ## How it works
//!
//! The analyzer is a classic abstract interpreter in the style of Cousot & Cousot:
//! instead of running the program on concrete values, it runs it on **abstract
//! values** that stand for whole sets of integers, covering every execution at once.
//!
//! The abstract values are **disjoint interval unions** ([`DisjointIntervals`]): a
//! canonical, ordered collection of non-overlapping, non-adjacent integer intervals.
//! `x != 5` leaves a hole (`[0, 4] U [6, 10]`); control-flow merges collapse to a
//! single hull so that loops converge.
//!
//! The pipeline has three stages:
//!
//! 1. **Parse** ([`parser`]): the source text becomes a syntax tree whose nodes
//!    carry stable ids.
//! 2. **Compile** ([`equations`]): one walk over the tree emits a list of
//!    control-point [`Action`]s — declarations, assignments, comparison filters,
//!    assertions, and joins — forming an equational system over the invariant
//!    vector.
//! 3. **Solve** ([`solver`]): Kleene iteration runs the action list against a
//!    double-buffered invariant vector until it stabilizes, widening interval
//!    bounds that escape the program's constant envelope so that every loop
//!    terminates.
//!
//! ## Example
//!
//! ```rust
//! use interval_analyzer::{parse, EquationBuilder, Solver};
//!
//! let ast = parse("int x; x = 0; while (x < 10) { x = x + 1; }").unwrap();
//! let program = EquationBuilder::build(&ast);
//! let analysis = Solver::new(program).solve();
//!
//! // After the loop exit filter, x is exactly 10.
//! let exit = analysis.invariants.last().unwrap();
//! assert_eq!(exit.get("x").unwrap().to_string(), "[10, 10]");
//! assert!(analysis.diagnostics.is_empty());
//! ```
//!
//! ## Core Components
//!
//! - **[`interval`]**: single closed intervals with ±∞ bounds and corner-based
//!   arithmetic.
//! - **[`disjoint`]**: the canonical interval-union domain with join, meet,
//!   arithmetic, and comparison filters.
//! - **[`invariant`]**: the per-control-point environment mapping variables to
//!   unions.
//! - **[`equations`]**: the AST-to-action compiler.
//! - **[`solver`]**: the fixed-point engine.
//! - **[`report`]**: the textual output consumed by the CLI.

pub mod action;
pub mod ast;
pub mod diagnostics;
pub mod disjoint;
pub mod equations;
pub mod expr;
pub mod interval;
pub mod invariant;
pub mod parser;
pub mod report;
pub mod solver;
pub mod types;

// Re-exports for convenience
pub use action::Action;
pub use ast::{AstNode, BinOp, LogicOp, NodeKind};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use disjoint::DisjointIntervals;
pub use equations::{Envelope, EquationBuilder, Program};
pub use expr::{BoolExpr, Expr};
pub use interval::{Bound, Interval};
pub use invariant::Invariant;
pub use parser::parse;
pub use solver::{Analysis, Solver};
pub use types::{CpId, NodeId};
