//! Structured diagnostic values emitted by analysis passes.

use crate::severity::Severity;
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A structured diagnostic reported by an analysis pass.
///
/// Diagnostics are immutable values: created at the moment a condition is
/// detected, never mutated afterwards, and consumed by the first handler
/// that fully handles them or by the terminal sink.
///
/// The `code` is a hierarchical dot-separated string supplied by the host
/// (see [`crate::code`]); it is stored raw because the layer must tolerate
/// codes it cannot parse.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The hierarchical code identifying the kind of diagnostic.
    pub code: String,
    /// The pre-formatted diagnostic message.
    pub message: String,
    /// The source location where the condition was detected.
    pub span: Span,
    /// Ordered arguments used to format replacement messages
    /// (e.g. the offending exception type name).
    pub args: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code, message, and span.
    pub fn error(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    /// Creates a new warning diagnostic with the given code, message, and span.
    pub fn warning(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, code, message, span)
    }

    /// Creates a new note diagnostic with the given code, message, and span.
    pub fn note(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Note, code, message, span)
    }

    fn new(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            span,
            args: Vec::new(),
        }
    }

    /// Appends a message argument to this diagnostic.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Replaces the argument list of this diagnostic.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}
