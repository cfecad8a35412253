//! The plugin registration protocol exposed to external layers.

use crate::context::CompileContext;
use crate::phase::PipelineEvent;
use crate::pipeline::Pipeline;

/// Errors a plugin may raise during initialization.
///
/// Both variants are fatal: they are reported to the invoking host before
/// any registry mutation occurs, and the plugin is not attached.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// A plugin argument was not recognized.
    #[error("invalid plugin configuration: {0}")]
    Configuration(String),
    /// The host does not grant a capability the plugin requires.
    #[error("required host capability unavailable: {0}")]
    CapabilityUnavailable(&'static str),
}

/// A named unit attachable to a pipeline with one entry point.
///
/// `init` is invoked once per compilation context, before the pipeline
/// starts delivering lifecycle events.
pub trait Plugin {
    /// The plugin's stable name.
    fn name(&self) -> &str;

    /// Initializes the plugin against a pipeline, registering whatever
    /// listeners it needs. Configuration and capability errors fail fast
    /// here, before any context state is mutated.
    fn init(&self, pipeline: &mut Pipeline, args: &[String]) -> Result<(), PluginError>;
}

/// A listener receiving lifecycle events while the pipeline runs.
pub trait EventListener: Send + Sync {
    /// Called for every lifecycle event, in registration order.
    fn on_event(&self, event: &PipelineEvent, ctx: &CompileContext);
}
