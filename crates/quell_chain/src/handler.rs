//! The handler trait implemented by chain interceptors.

use quell_diagnostics::{Diagnostic, TerminalSink};

/// The result of offering a diagnostic to a handler.
pub enum Outcome {
    /// The handler fully handled the diagnostic; nothing further happens.
    /// Replacement diagnostics, if any, were delivered to the terminal sink
    /// before returning.
    Handled,
    /// The handler did not handle the diagnostic; the chain delegates it
    /// unchanged to the handler installed before this one.
    Delegate(Diagnostic),
}

/// A diagnostic interceptor installable on a [`HandlerChain`].
///
/// [`HandlerChain`]: crate::HandlerChain
pub trait Handler: Send + Sync {
    /// A stable identity for this handler implementation.
    ///
    /// Installing a handler whose name equals the active node's name updates
    /// that node in place instead of stacking a duplicate layer.
    fn name(&self) -> &'static str;

    /// Offers a diagnostic to this handler.
    ///
    /// The terminal sink is provided so a handler that replaces a diagnostic
    /// (e.g. demoting an error to a warning) can deliver the replacement
    /// directly, without re-entering the chain.
    ///
    /// Implementations must not install or uninstall chain handlers from
    /// within this call; reports are synchronous and the chain is locked
    /// while one is in flight.
    fn handle(&self, diag: Diagnostic, terminal: &dyn TerminalSink) -> Outcome;
}
