//! Ordered prefix-rule table with longest-prefix-match classification.

use crate::action::Action;
use quell_diagnostics::code;
use serde::{Deserialize, Serialize};

/// A single reclassification rule: a code prefix and the action to apply.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleEntry {
    /// The hierarchical code prefix this rule matches, at segment boundaries.
    pub prefix: String,
    /// The action applied to diagnostics whose code matches the prefix.
    pub action: Action,
}

impl RuleEntry {
    /// Creates a new rule entry.
    pub fn new(prefix: impl Into<String>, action: Action) -> Self {
        Self {
            prefix: prefix.into(),
            action,
        }
    }
}

/// A diagnostic code that could not be parsed for classification.
#[derive(Debug, thiserror::Error)]
#[error("malformed diagnostic code '{code}'")]
pub struct MalformedCode {
    /// The raw code string that failed to parse.
    pub code: String,
}

/// An ordered table of reclassification rules.
///
/// Classification is a pure function of the diagnostic code and the table
/// contents: the longest matching prefix wins, ties go to the earliest
/// entry, and codes with no matching entry resolve to
/// [`Action::PassThrough`].
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
}

impl RuleTable {
    /// Creates an empty rule table (everything passes through).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule entry to the table.
    pub fn push(&mut self, entry: RuleEntry) {
        self.entries.push(entry);
    }

    /// Appends a rule entry, builder style.
    pub fn with_rule(mut self, prefix: impl Into<String>, action: Action) -> Self {
        self.push(RuleEntry::new(prefix, action));
        self
    }

    /// Returns the number of rules in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table contains no rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classifies a diagnostic code, distinguishing malformed codes.
    ///
    /// Returns `Err` when the code is not a well-formed hierarchical code;
    /// callers that need the total function should use
    /// [`classify`](Self::classify) instead.
    pub fn try_classify(&self, diag_code: &str) -> Result<Action, MalformedCode> {
        if !code::is_well_formed(diag_code) {
            return Err(MalformedCode {
                code: diag_code.to_string(),
            });
        }
        // Longest matching prefix wins; ties keep the earliest entry.
        let mut best: Option<&RuleEntry> = None;
        for entry in &self.entries {
            if code::prefix_matches(&entry.prefix, diag_code)
                && best.is_none_or(|b| entry.prefix.len() > b.prefix.len())
            {
                best = Some(entry);
            }
        }
        Ok(best.map_or(Action::PassThrough, |entry| entry.action))
    }

    /// Classifies a diagnostic code, treating malformed codes as pass-through.
    ///
    /// The layer must never invent new severities for diagnostics it does
    /// not understand.
    pub fn classify(&self, diag_code: &str) -> Action {
        self.try_classify(diag_code)
            .unwrap_or(Action::PassThrough)
    }
}
