//! Compilation of the syntax tree into the equation system.
//!
//! The builder walks the AST once and emits the action list in program
//! order. Control points are implicit in list positions: the action at
//! position `i` reads some earlier control point and writes point `i + 1`,
//! with point 0 reserved for the program entry. Loops need one forward
//! reference (the head join reads the end of a body that is not yet
//! emitted), handled by reserving a slot and back-patching it once the body
//! has been walked.
//!
//! While walking, the builder also records the envelope of integer constants
//! appearing in the program; the solver widens any interval bound that
//! escapes this envelope (see [`crate::solver`]).

use log::debug;

use crate::action::Action;
use crate::ast::{AstNode, LogicOp, NodeKind};
use crate::disjoint::DisjointIntervals;
use crate::expr::{BoolExpr, Expr};
use crate::interval::Interval;
use crate::types::CpId;

/// Envelope of the integer constants observed in a program.
///
/// Bounds growing past this range during solving can only come from loop
/// iteration, never from program text, so the solver is free to push them to
/// ±∞ without losing any constant-relative precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Envelope {
    bounds: Option<(i64, i64)>,
}

impl Envelope {
    pub fn observe(&mut self, constant: i64) {
        self.bounds = Some(match self.bounds {
            None => (constant, constant),
            Some((low, high)) => (low.min(constant), high.max(constant)),
        });
    }

    pub fn bounds(&self) -> Option<(i64, i64)> {
        self.bounds
    }

    /// Widens every bound of `value` lying outside the envelope to the
    /// matching infinity. With no observed constants there is nothing to
    /// measure growth against, and nothing to widen.
    pub fn widen(&self, value: &DisjointIntervals) -> DisjointIntervals {
        match self.bounds {
            Some((low, high)) => value.widen_outside(low, high),
            None => value.clone(),
        }
    }
}

/// The compiled program: the action list, the number of control points, and
/// the constant envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub actions: Vec<Action>,
    pub control_points: usize,
    pub envelope: Envelope,
}

/// Slot of the action list under construction. Loop heads are reserved
/// first and patched after their body is emitted.
#[derive(Debug)]
enum Slot {
    Emitted(Action),
    Reserved,
}

/// Walks the AST and emits the equation system.
#[derive(Debug, Default)]
pub struct EquationBuilder {
    slots: Vec<Slot>,
    envelope: Envelope,
}

impl EquationBuilder {
    /// Compiles a program tree into its equation system.
    ///
    /// # Panics
    ///
    /// Panics on trees violating the analyzer's restrictions: branch
    /// conditions must compare a variable against an integer constant, and
    /// declaration/assignment targets must be variables. These are contract
    /// violations of the parser, not user errors.
    pub fn build(root: &AstNode) -> Program {
        let mut builder = EquationBuilder::default();
        builder.emit(root);

        let control_points = builder.slots.len() + 1;
        let actions: Vec<Action> = builder
            .slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Slot::Emitted(action) => action,
                Slot::Reserved => panic!("reserved join slot {} was never patched", i),
            })
            .collect();

        debug!("compiled {} actions over {} control points", actions.len(), control_points);
        Program {
            actions,
            control_points,
            envelope: builder.envelope,
        }
    }

    /// The control point holding the current state, i.e. the output of the
    /// most recently emitted action (or the entry point).
    fn current(&self) -> CpId {
        CpId::new(self.slots.len())
    }

    fn push(&mut self, action: Action) {
        debug!("emit [{}] {:?}", self.slots.len(), action);
        self.slots.push(Slot::Emitted(action));
    }

    fn reserve(&mut self) -> usize {
        self.slots.push(Slot::Reserved);
        self.slots.len() - 1
    }

    fn patch(&mut self, slot: usize, action: Action) {
        match self.slots[slot] {
            Slot::Reserved => {
                debug!("patch [{}] {:?}", slot, action);
                self.slots[slot] = Slot::Emitted(action);
            }
            Slot::Emitted(_) => panic!("slot {} is already emitted", slot),
        }
    }

    fn emit(&mut self, node: &AstNode) {
        match &node.kind {
            NodeKind::Sequence(items) => {
                for item in items {
                    self.emit(item);
                }
            }

            NodeKind::Declaration(var_node) => {
                let var = var_node
                    .variable_name()
                    .expect("declaration child must be a variable");
                let input = self.current();
                self.push(Action::Declaration {
                    var: var.to_string(),
                    input,
                    output: input.next(),
                });
            }

            NodeKind::Assignment(target, rhs) => {
                let var = target
                    .variable_name()
                    .expect("assignment target must be a variable");
                let expr = self.compile_expr(rhs);
                let input = self.current();
                self.push(Action::Assignment {
                    var: var.to_string(),
                    expr,
                    declares: false,
                    input,
                    output: input.next(),
                });
            }

            NodeKind::PreCondition(parts) => {
                let (var, low, high) = destructure_precondition(parts);
                self.envelope.observe(low);
                self.envelope.observe(high);
                let input = self.current();
                self.push(Action::Assignment {
                    var,
                    expr: Expr::Const(Interval::finite(low, high)),
                    declares: true,
                    input,
                    output: input.next(),
                });
            }

            NodeKind::PostCondition(parts) => {
                for part in parts {
                    let condition = self.compile_bool(part);
                    let input = self.current();
                    self.push(Action::Assertion {
                        condition,
                        node: node.id,
                        input,
                        output: input.next(),
                    });
                }
            }

            NodeKind::IfElse {
                condition,
                then_branch,
                else_branch,
            } => {
                let (op, var, rhs) = self.branch_condition(condition);
                let pre = self.current();
                self.push(Action::Filter {
                    op,
                    var: var.clone(),
                    expr: rhs.clone(),
                    input: pre,
                    output: pre.next(),
                });
                self.emit(then_branch);
                let then_end = self.current();

                match else_branch {
                    Some(else_branch) => {
                        self.push(Action::Filter {
                            op: op.opposite(),
                            var,
                            expr: rhs,
                            input: pre,
                            output: then_end.next(),
                        });
                        self.emit(else_branch);
                        let else_end = self.current();
                        self.push(Action::Join {
                            output: else_end.next(),
                            inputs: vec![then_end, else_end],
                        });
                    }
                    None => {
                        // The missing else branch contributes the pre-state
                        // directly to the merge.
                        self.push(Action::Join {
                            output: then_end.next(),
                            inputs: vec![pre, then_end],
                        });
                    }
                }
            }

            NodeKind::While { condition, body } => {
                let (op, var, rhs) = self.branch_condition(condition);
                let pre = self.current();

                // The loop head joins the pre-state with the end of a body
                // that is not emitted yet; reserve its slot now.
                let head_slot = self.reserve();
                let head = self.current();

                self.push(Action::Filter {
                    op,
                    var: var.clone(),
                    expr: rhs.clone(),
                    input: head,
                    output: head.next(),
                });
                self.emit(body);
                let body_end = self.current();

                self.patch(
                    head_slot,
                    Action::Join {
                        output: head,
                        inputs: vec![pre, body_end],
                    },
                );

                // Exit edge: the negated condition applied to the head.
                self.push(Action::Filter {
                    op: op.opposite(),
                    var,
                    expr: rhs,
                    input: head,
                    output: body_end.next(),
                });
            }

            NodeKind::Variable(_)
            | NodeKind::Integer(_)
            | NodeKind::Arithmetic(..)
            | NodeKind::Logic(..) => {
                panic!("{:?} cannot appear at statement position", node.kind)
            }
        }
    }

    /// Destructures a branch condition into its comparison, variable, and
    /// constant right-hand side.
    fn branch_condition(&mut self, condition: &AstNode) -> (LogicOp, String, Expr) {
        if let NodeKind::Logic(op, left, right) = &condition.kind {
            if let (Some(var), NodeKind::Integer(c)) = (left.variable_name(), &right.kind) {
                self.envelope.observe(*c);
                return (*op, var.to_string(), Expr::constant(*c));
            }
        }
        panic!("branch condition must compare a variable against an integer constant");
    }

    fn compile_expr(&mut self, node: &AstNode) -> Expr {
        match &node.kind {
            NodeKind::Integer(n) => {
                self.envelope.observe(*n);
                Expr::constant(*n)
            }
            NodeKind::Variable(name) => Expr::Var(name.clone()),
            NodeKind::Arithmetic(op, left, right) => Expr::Binary {
                op: *op,
                node: node.id,
                left: Box::new(self.compile_expr(left)),
                right: Box::new(self.compile_expr(right)),
            },
            _ => panic!("expected an arithmetic expression, found {:?}", node.kind),
        }
    }

    fn compile_bool(&mut self, node: &AstNode) -> BoolExpr {
        match &node.kind {
            NodeKind::Logic(op, left, right) => BoolExpr {
                op: *op,
                left: self.compile_expr(left),
                right: self.compile_expr(right),
            },
            _ => panic!("expected a comparison, found {:?}", node.kind),
        }
    }
}

/// Extracts `(variable, low, high)` from the two comparison children of a
/// pre-condition, which the parser emits as `(>=, lo, v)` and `(<=, hi, v)`.
fn destructure_precondition(parts: &[AstNode]) -> (String, i64, i64) {
    let bound = |part: &AstNode, expected: LogicOp| -> (i64, String) {
        if let NodeKind::Logic(op, left, right) = &part.kind {
            if *op == expected {
                if let (NodeKind::Integer(c), Some(var)) = (&left.kind, right.variable_name()) {
                    return (*c, var.to_string());
                }
            }
        }
        panic!("malformed pre-condition: expected `{} constant variable`", expected);
    };

    match parts {
        [low_part, high_part] => {
            let (low, var) = bound(low_part, LogicOp::Ge);
            let (high, other) = bound(high_part, LogicOp::Le);
            assert_eq!(var, other, "pre-condition bounds must constrain the same variable");
            (var, low, high)
        }
        _ => panic!("pre-condition must carry exactly two comparisons"),
    }
}
