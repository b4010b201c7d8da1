use crate::engine::{Diagnostic, Verdict};
use std::fmt::Write;

/// Human-readable summary: every diagnostic in order, then the verdict.
pub fn render_report(diagnostics: &[Diagnostic], verdict: Verdict) -> String {
    let mut out = String::new();
    if diagnostics.is_empty() {
        out.push_str("No issues found.\n");
    } else {
        let _ = writeln!(out, "{} issue(s) found:", diagnostics.len());
        for (i, diagnostic) in diagnostics.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, diagnostic);
        }
    }
    let _ = writeln!(out, "{}", verdict);
    out
}
