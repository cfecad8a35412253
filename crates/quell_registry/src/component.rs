//! The component trait and the privileged slot-patching capability.

use quell_chain::HandlerChain;
use quell_diagnostics::DiagnosticSink;
use std::any::Any;
use std::sync::Arc;

/// Errors from patching a named slot on a live component.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The component stores nothing under the given slot name.
    #[error("component has no slot named '{0}'")]
    UnknownSlot(String),
    /// The slot exists but holds a component of a different type.
    #[error("slot '{0}' holds a component of a different type")]
    TypeMismatch(String),
}

/// Privileged read/overwrite of a named slot on a live component.
///
/// This is the one narrow operation the layer requires from the host's
/// introspection facility: given a live component and a slot name, overwrite
/// the stored reference. Components that do not grant this capability simply
/// do not implement the trait.
pub trait Patchable {
    /// Overwrites the component's `slot` with `value`.
    fn patch_slot(&self, slot: &str, value: Arc<dyn Any + Send + Sync>) -> Result<(), PatchError>;
}

/// A singleton component registered in a [`ComponentRegistry`].
///
/// [`ComponentRegistry`]: crate::ComponentRegistry
pub trait Component: Any + Send + Sync {
    /// Upcasts to [`Any`] for typed lookup.
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Returns the slot-patching capability, if this component grants it.
    fn as_patchable(&self) -> Option<&dyn Patchable> {
        None
    }
}

impl Component for HandlerChain {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Component for DiagnosticSink {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
