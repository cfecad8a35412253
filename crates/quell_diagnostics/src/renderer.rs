//! Rendering of surviving diagnostics for terminal output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a compact rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[error.unreported-exceptional-condition]: unreported exception
///   --> bytes 104..131
/// ```
pub struct TerminalRenderer;

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        // Header line: severity[code]: message
        out.push_str(&format!(
            "{}[{}]: {}\n",
            diag.severity, diag.code, diag.message
        ));

        // Location line, omitted for diagnostics without a source position
        if !diag.span.is_dummy() {
            out.push_str(&format!(
                "  --> bytes {}..{}\n",
                diag.span.start, diag.span.end
            ));
        }

        out
    }
}
