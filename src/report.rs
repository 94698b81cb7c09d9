//! Textual rendering of analysis results.
//!
//! One block per control point listing the inferred variable ranges,
//! followed by a recap of all warnings keyed by AST node id.

use std::fmt::{self, Write};

use crate::diagnostics::Diagnostics;
use crate::invariant::Invariant;
use crate::solver::Analysis;

const RECAP_HEADER: &str = "--------- WARNINGS/ERRORS RECAP ---------";
const RECAP_FOOTER: &str = "-----------------------------------------";

/// Writes the `Control point <i>` blocks.
pub fn write_invariants(out: &mut impl Write, invariants: &[Invariant]) -> fmt::Result {
    for (cp, invariant) in invariants.iter().enumerate() {
        writeln!(out, "Control point {}", cp)?;
        write!(out, "{}", invariant)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Writes the warnings recap.
pub fn write_diagnostics(out: &mut impl Write, diagnostics: &Diagnostics) -> fmt::Result {
    writeln!(out, "{}", RECAP_HEADER)?;
    for (node, diagnostic) in diagnostics.sorted() {
        writeln!(out, "AST node id: {}: {}", node, diagnostic)?;
    }
    writeln!(out, "{}", RECAP_FOOTER)
}

/// Renders a complete analysis report.
pub fn render(analysis: &Analysis) -> String {
    let mut out = String::new();
    write_invariants(&mut out, &analysis.invariants).expect("writing to a string cannot fail");
    write_diagnostics(&mut out, &analysis.diagnostics).expect("writing to a string cannot fail");
    out
}
