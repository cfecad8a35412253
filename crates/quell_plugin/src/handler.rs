//! The chain handler that applies the rule table to reported diagnostics.

use crate::config::Mode;
use quell_chain::{Handler, Outcome};
use quell_diagnostics::{Diagnostic, TerminalSink};
use quell_rules::{Action, RuleTable};

/// The diagnostic-code family this layer targets.
///
/// The host guarantees this family is stably named; no other assumption is
/// made about the set of codes the host can emit.
pub const UNREPORTED_FAMILY: &str = "error.unreported-exceptional-condition";

/// Code of the note emitted when a diagnostic code cannot be classified.
const UNCLASSIFIABLE_NOTE: &str = "note.quell.unclassifiable-code";

/// Builds the rule table for a plugin mode: the targeted family is demoted
/// or suppressed, everything else passes through.
pub fn default_rules(mode: Mode) -> RuleTable {
    let action = match mode {
        Mode::Warn => Action::DemoteToWarning,
        Mode::NoWarn => Action::Suppress,
    };
    RuleTable::new().with_rule(UNREPORTED_FAMILY, action)
}

/// A chain handler that classifies each diagnostic against a rule table.
///
/// Suppressed diagnostics are consumed; demoted diagnostics are replaced by
/// a warning delivered straight to the terminal sink; everything else is
/// delegated unchanged to the previously installed handler.
pub struct ReclassifyHandler {
    rules: RuleTable,
}

impl ReclassifyHandler {
    /// Creates a handler with the default rule table for `mode`.
    pub fn for_mode(mode: Mode) -> Self {
        Self::with_rules(default_rules(mode))
    }

    /// Creates a handler with an explicit rule table.
    pub fn with_rules(rules: RuleTable) -> Self {
        Self { rules }
    }

    fn demote(diag: &Diagnostic) -> Diagnostic {
        let message = match diag.args.first() {
            Some(exc) => {
                format!("unreported exception {exc} not caught or declared to be thrown")
            }
            None => diag.message.clone(),
        };
        Diagnostic::warning(diag.code.clone(), message, diag.span)
            .with_args(diag.args.clone())
    }
}

impl Handler for ReclassifyHandler {
    fn name(&self) -> &'static str {
        "reclassify"
    }

    fn handle(&self, diag: Diagnostic, terminal: &dyn TerminalSink) -> Outcome {
        match self.rules.try_classify(&diag.code) {
            Ok(Action::Suppress) => Outcome::Handled,
            Ok(Action::DemoteToWarning) => {
                terminal.accept(Self::demote(&diag));
                Outcome::Handled
            }
            Ok(Action::PassThrough) => Outcome::Delegate(diag),
            Err(err) => {
                // Classification failure degrades to pass-through, surfaced
                // as a note rather than silently dropped or escalated.
                terminal.accept(Diagnostic::note(
                    UNCLASSIFIABLE_NOTE,
                    format!("{err}; passing it through unchanged"),
                    diag.span,
                ));
                Outcome::Delegate(diag)
            }
        }
    }
}
