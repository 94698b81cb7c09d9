//! Kleene fixed-point iteration over the compiled equation system.
//!
//! The solver keeps one invariant per control point and repeatedly runs the
//! whole action list until the vector stops changing. Each iteration writes
//! into a fresh vector, so an action never observes output produced in the
//! same iteration.
//!
//! # Termination
//!
//! Filters clamp values to program constants and every join collapses to a
//! hull, so in most programs the ascending chain stalls by itself. Loops
//! that keep growing a bound (`while (x >= 0) { x = x + 1; }`) would not
//! converge, which is where widening comes in: past `widening_threshold`
//! iterations, any interval bound that has escaped the program's constant
//! envelope is pushed to the matching infinity. Bounds inside the envelope
//! are left alone, so loop invariants bounded by program constants keep
//! their precise limits.

use log::{debug, warn};

use crate::diagnostics::Diagnostics;
use crate::equations::Program;
use crate::invariant::Invariant;

/// Result of a solver run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// One invariant per control point, in control-point order.
    pub invariants: Vec<Invariant>,
    /// Findings accumulated across all iterations; last write per node wins.
    pub diagnostics: Diagnostics,
    /// Number of iterations until the fixed point (or the safety cut-off).
    pub iterations: usize,
}

/// Fixed-point solver for a compiled [`Program`].
#[derive(Debug)]
pub struct Solver {
    program: Program,
    /// Iterations before envelope widening kicks in.
    pub widening_threshold: usize,
    /// Hard stop; reaching it is logged as a warning and means the analysis
    /// results are a (still sound) snapshot, not a fixed point.
    pub max_iterations: usize,
}

impl Solver {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            widening_threshold: 32,
            max_iterations: 1000,
        }
    }

    /// Iterates the action list until two consecutive invariant vectors are
    /// structurally equal.
    pub fn solve(&self) -> Analysis {
        let n = self.program.control_points;
        let mut invariants = initial_vector(n);
        let mut diagnostics = Diagnostics::new();
        let mut iterations = 0;

        loop {
            let mut next = initial_vector(n);
            for action in &self.program.actions {
                action.execute(&invariants, &mut next, &mut diagnostics);
            }

            if iterations >= self.widening_threshold {
                self.widen(&mut next);
            }
            iterations += 1;
            debug!("solver step {}", iterations);

            let stable = next == invariants;
            invariants = next;
            if stable {
                debug!("fixed point reached after {} iterations", iterations);
                break;
            }
            if iterations >= self.max_iterations {
                warn!("no fixed point after {} iterations, stopping", self.max_iterations);
                break;
            }
        }

        Analysis {
            invariants,
            diagnostics,
            iterations,
        }
    }

    /// Pushes every bound outside the constant envelope to ±∞.
    fn widen(&self, invariants: &mut [Invariant]) {
        let envelope = self.program.envelope;
        for invariant in invariants.iter_mut() {
            let vars: Vec<String> = invariant.sorted_vars().iter().map(|v| v.to_string()).collect();
            for var in vars {
                let widened = match invariant.get(&var) {
                    Some(value) => {
                        let widened = envelope.widen(value);
                        if widened == *value {
                            continue;
                        }
                        widened
                    }
                    None => continue,
                };
                invariant.set(var, widened);
            }
        }
    }
}

fn initial_vector(n: usize) -> Vec<Invariant> {
    let mut invariants = vec![Invariant::new(); n];
    invariants[0].set_initial(true);
    invariants
}
