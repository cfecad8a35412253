//! The per-context component map and the invasive rebind operation.

use crate::component::{Component, PatchError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Errors from registry lookup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The component's construction phase has not run yet.
    #[error("component '{0}' has not been constructed yet")]
    NotConstructed(&'static str),
    /// The component exists but is not of the requested type.
    #[error("component '{0}' is not of the requested type")]
    WrongType(&'static str),
}

/// Why one holder could not be patched during a rebind.
#[derive(Debug, thiserror::Error)]
pub enum RebindFailure {
    /// The holder has not been constructed in this context.
    #[error("holder not constructed")]
    NotConstructed,
    /// The holder does not grant the privileged patch capability.
    #[error("privileged access to holder unavailable")]
    CapabilityUnavailable,
    /// The holder's slot rejected the patch.
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// The per-holder outcome of [`ComponentRegistry::rebind_pinned`].
///
/// A partial rebind is reported, never silently absorbed: diagnostics routed
/// through un-patched holders keep observing the old instance, and callers
/// decide whether degraded mode is acceptable.
#[derive(Debug, Default)]
pub struct RebindReport {
    /// Holder kinds whose pinned reference now points at the new instance.
    pub patched: Vec<&'static str>,
    /// Holder kinds that could not be patched, with the reason for each.
    pub failed: Vec<(&'static str, RebindFailure)>,
}

impl RebindReport {
    /// Returns `true` if every requested holder was patched.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns the kinds of the holders that could not be patched.
    pub fn unpatched(&self) -> Vec<&'static str> {
        self.failed.iter().map(|(kind, _)| *kind).collect()
    }
}

/// Registry of singleton components for one compilation context.
///
/// At most one live instance exists per kind. Replacing an entry affects
/// only readers that perform a fresh lookup afterwards; references pinned
/// before the replacement keep pointing at the old instance. That hazard is
/// the registry's defining contract, not a simplification — callers that
/// need "always current" semantics must re-read instead of caching.
pub struct ComponentRegistry {
    entries: Mutex<BTreeMap<&'static str, Arc<dyn Component>>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Inserts or overwrites the live instance for `kind`.
    ///
    /// Overwriting does not notify, and does not attempt to locate, existing
    /// pinned references.
    pub fn register(&self, kind: &'static str, instance: Arc<dyn Component>) {
        self.entries.lock().unwrap().insert(kind, instance);
    }

    /// Returns the current live instance for `kind`.
    pub fn lookup(&self, kind: &'static str) -> Result<Arc<dyn Component>, RegistryError> {
        self.entries
            .lock()
            .unwrap()
            .get(kind)
            .cloned()
            .ok_or(RegistryError::NotConstructed(kind))
    }

    /// Returns the current live instance for `kind`, downcast to `T`.
    pub fn lookup_as<T: Component>(&self, kind: &'static str) -> Result<Arc<T>, RegistryError> {
        let instance = self.lookup(kind)?;
        instance
            .as_any_arc()
            .downcast::<T>()
            .map_err(|_| RegistryError::WrongType(kind))
    }

    /// Returns `true` if a component is registered under `kind`.
    pub fn contains(&self, kind: &'static str) -> bool {
        self.entries.lock().unwrap().contains_key(kind)
    }

    /// Enumerates the kinds of all live singleton components.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries.lock().unwrap().keys().copied().collect()
    }

    /// Rebinds `kind` to `new_instance` and patches already-pinned holders.
    ///
    /// The registry entry is overwritten first, so components constructed
    /// after this call observe the new instance through normal lookup. Then,
    /// for every kind in `holder_kinds`, the holder's slot named `kind` is
    /// overwritten through its [`Patchable`](crate::Patchable) capability.
    /// Holders that cannot be patched are reported individually; the rebind
    /// proceeds for the rest rather than failing as a whole.
    pub fn rebind_pinned(
        &self,
        kind: &'static str,
        new_instance: Arc<dyn Component>,
        holder_kinds: &[&'static str],
    ) -> RebindReport {
        let value = Arc::clone(&new_instance).as_any_arc();
        self.register(kind, new_instance);

        let mut report = RebindReport::default();
        for &holder_kind in holder_kinds {
            let holder = match self.lookup(holder_kind) {
                Ok(holder) => holder,
                Err(_) => {
                    report
                        .failed
                        .push((holder_kind, RebindFailure::NotConstructed));
                    continue;
                }
            };
            let Some(patchable) = holder.as_patchable() else {
                report
                    .failed
                    .push((holder_kind, RebindFailure::CapabilityUnavailable));
                continue;
            };
            match patchable.patch_slot(kind, Arc::clone(&value)) {
                Ok(()) => report.patched.push(holder_kind),
                Err(err) => report.failed.push((holder_kind, err.into())),
            }
        }
        report
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
