//! Per-compilation context state.

use quell_chain::HandlerChain;
use quell_diagnostics::TerminalSink;
use quell_registry::{ComponentRegistry, RegistryError};
use std::sync::Arc;

/// Well-known component kinds used by the synthetic pipeline.
pub mod kind {
    /// The shared diagnostic sink (a [`HandlerChain`](quell_chain::HandlerChain)).
    pub const SINK: &str = "sink";
    /// The type-attribution analysis pass.
    pub const ATTR_PASS: &str = "attr-pass";
    /// The flow-analysis pass.
    pub const FLOW_PASS: &str = "flow-pass";
}

/// State owned by one compilation context.
///
/// Each context owns an independent registry rooted at its own sink chain;
/// nothing here is shared across contexts, and everything is torn down when
/// the context is dropped.
pub struct CompileContext {
    registry: ComponentRegistry,
    privileged: bool,
}

impl CompileContext {
    /// Creates a context whose sink chain bottoms out at `terminal`.
    ///
    /// `privileged` controls whether the host grants plugins the privileged
    /// slot-patching capability.
    pub fn new(terminal: Box<dyn TerminalSink>, privileged: bool) -> Self {
        let registry = ComponentRegistry::new();
        registry.register(kind::SINK, Arc::new(HandlerChain::new(terminal)));
        Self {
            registry,
            privileged,
        }
    }

    /// Returns the context's component registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Returns `true` if the host grants privileged component access.
    pub fn grants_privileged_access(&self) -> bool {
        self.privileged
    }

    /// Returns the current sink chain registered for this context.
    pub fn sink(&self) -> Result<Arc<HandlerChain>, RegistryError> {
        self.registry.lookup_as::<HandlerChain>(kind::SINK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quell_diagnostics::{Diagnostic, DiagnosticSink, Span};

    #[test]
    fn context_owns_an_independent_sink_chain() {
        let terminal = Arc::new(DiagnosticSink::new());
        let ctx = CompileContext::new(Box::new(Arc::clone(&terminal)), false);
        assert!(!ctx.grants_privileged_access());

        let chain = ctx.sink().unwrap();
        chain.report(Diagnostic::error("error.x", "m", Span::DUMMY));
        assert_eq!(terminal.error_count(), 1);
    }

    #[test]
    fn contexts_do_not_share_registries() {
        let a = CompileContext::new(Box::new(DiagnosticSink::new()), false);
        let b = CompileContext::new(Box::new(DiagnosticSink::new()), false);
        assert!(!Arc::ptr_eq(&a.sink().unwrap(), &b.sink().unwrap()));
    }
}
