//! Per-context registry of singleton components with late rebinding.
//!
//! A [`ComponentRegistry`] maps component kinds to the live singleton
//! instance for one compilation context. Replacing an entry does not update
//! references already pinned by readers that cached the old instance; the
//! invasive [`rebind_pinned`](ComponentRegistry::rebind_pinned) operation
//! patches those pinned references through the narrow [`Patchable`]
//! capability, reporting per-holder failures instead of failing wholesale.

#![warn(missing_docs)]

mod component;
mod registry;

pub use component::{Component, PatchError, Patchable};
pub use registry::{ComponentRegistry, RebindFailure, RebindReport, RegistryError};
