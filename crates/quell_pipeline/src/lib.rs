//! Synthetic compilation pipeline used to host and exercise the
//! reclassification layer.
//!
//! The real host is an existing compiler whose phase sequencing and pass
//! construction cannot be modified. This crate reproduces the contracts that
//! layer needs from such a host: ordered lifecycle [`Phase`]s with
//! [`PipelineEvent`]s, a [`Plugin`] registration protocol, a per-context
//! [`CompileContext`] owning the component registry, and [`AnalysisPass`]es
//! that pin a direct reference to the shared diagnostic sink at construction
//! time. The [`Pipeline`] drives a scripted compilation and journals
//! construction and emission order so tests can verify attachment timing.

#![warn(missing_docs)]

mod context;
mod pass;
mod phase;
mod pipeline;
mod plugin;

pub use context::{kind, CompileContext};
pub use pass::AnalysisPass;
pub use phase::{Phase, PipelineEvent};
pub use pipeline::{JournalEntry, PassSpec, Pipeline, PipelineError, ScriptEntry};
pub use plugin::{EventListener, Plugin, PluginError};
