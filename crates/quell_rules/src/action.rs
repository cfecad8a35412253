//! Reclassification actions applied to matched diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the layer does with a diagnostic whose code matched a rule prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Drop the diagnostic entirely; nothing reaches the terminal sink.
    Suppress,
    /// Replace the diagnostic with a warning-severity counterpart.
    DemoteToWarning,
    /// Leave the diagnostic untouched and delegate it down the chain.
    PassThrough,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Suppress => write!(f, "suppress"),
            Action::DemoteToWarning => write!(f, "demote-to-warning"),
            Action::PassThrough => write!(f, "pass-through"),
        }
    }
}
