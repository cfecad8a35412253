//! Analysis passes that pin the shared sink at construction time.

use crate::context::{kind, CompileContext};
use quell_chain::HandlerChain;
use quell_diagnostics::Diagnostic;
use quell_registry::{Component, PatchError, Patchable, RegistryError};
use std::any::Any;
use std::sync::{Arc, Mutex};

/// An analysis pass holding a pinned reference to the diagnostic sink.
///
/// The reference is captured once, when the pass is constructed, by a fresh
/// registry lookup; the pass never re-reads the registry afterwards. This
/// reproduces the aliasing hazard the reclassification layer exists to
/// solve: rebinding the registry entry does not change what an
/// already-constructed pass observes.
pub struct AnalysisPass {
    kind: &'static str,
    sink: Mutex<Arc<HandlerChain>>,
    patchable: bool,
}

impl AnalysisPass {
    /// Constructs a pass, pinning the sink currently registered in `ctx`,
    /// and registers the pass under its own kind.
    ///
    /// `patchable` controls whether the pass grants the privileged
    /// slot-patching capability; real hosts contain both kinds of holders.
    pub fn construct(
        pass_kind: &'static str,
        ctx: &CompileContext,
        patchable: bool,
    ) -> Result<Arc<Self>, RegistryError> {
        let sink = ctx.registry().lookup_as::<HandlerChain>(kind::SINK)?;
        let pass = Arc::new(Self {
            kind: pass_kind,
            sink: Mutex::new(sink),
            patchable,
        });
        ctx.registry().register(pass_kind, Arc::clone(&pass) as Arc<dyn Component>);
        Ok(pass)
    }

    /// Returns the kind this pass is registered under.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Emits a diagnostic through the pass's pinned sink reference.
    pub fn emit(&self, diag: Diagnostic) {
        let sink = Arc::clone(&self.sink.lock().unwrap());
        sink.report(diag);
    }

    /// Returns the sink instance this pass currently observes.
    pub fn pinned_sink(&self) -> Arc<HandlerChain> {
        Arc::clone(&self.sink.lock().unwrap())
    }
}

impl Component for AnalysisPass {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_patchable(&self) -> Option<&dyn Patchable> {
        self.patchable.then_some(self as &dyn Patchable)
    }
}

impl Patchable for AnalysisPass {
    fn patch_slot(&self, slot: &str, value: Arc<dyn Any + Send + Sync>) -> Result<(), PatchError> {
        if slot != kind::SINK {
            return Err(PatchError::UnknownSlot(slot.to_string()));
        }
        let chain = value
            .downcast::<HandlerChain>()
            .map_err(|_| PatchError::TypeMismatch(slot.to_string()))?;
        *self.sink.lock().unwrap() = chain;
        Ok(())
    }
}
