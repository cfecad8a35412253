//! The plugin entry point and attachment strategies.

use crate::config::Mode;
use crate::handler::{default_rules, ReclassifyHandler};
use crate::scheduler::{AttachmentScheduler, Decision, TriggerPolicy};
use quell_chain::{HandlerChain, InstallToken};
use quell_pipeline::{kind, CompileContext, EventListener, Pipeline, PipelineEvent, Plugin, PluginError};
use quell_registry::Component;
use quell_rules::{RuleEntry, RuleTable};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

/// How the layer takes effect once the scheduler fires.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Strategy {
    /// Install a handler on the existing sink chain. Non-invasive: pinned
    /// references keep pointing at the same chain, whose behavior changes.
    #[default]
    InstallHandler,
    /// Construct a replacement sink bottoming out into the current one and
    /// overwrite every already-constructed holder's pinned reference.
    /// Requires the privileged patch capability from the host.
    ReplaceSink,
}

/// The reclassification plugin.
///
/// One instance serves one compilation context; `init` is its single entry
/// point, invoked by the host before lifecycle events start flowing.
pub struct ReclassifyPlugin {
    policy: TriggerPolicy,
    strategy: Strategy,
    extra_rules: Vec<RuleEntry>,
}

impl ReclassifyPlugin {
    /// Creates a plugin with the default policy and strategy.
    pub fn new() -> Self {
        Self {
            policy: TriggerPolicy::default(),
            strategy: Strategy::default(),
            extra_rules: Vec::new(),
        }
    }

    /// Overrides the trigger policy.
    pub fn with_policy(mut self, policy: TriggerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the attachment strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Appends rule entries applied after the built-in family rule.
    pub fn with_extra_rules(mut self, rules: Vec<RuleEntry>) -> Self {
        self.extra_rules = rules;
        self
    }

    fn rules_for(&self, mode: Mode) -> RuleTable {
        let mut rules = default_rules(mode);
        for entry in &self.extra_rules {
            rules.push(entry.clone());
        }
        rules
    }
}

impl Default for ReclassifyPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ReclassifyPlugin {
    fn name(&self) -> &str {
        "quell"
    }

    fn init(&self, pipeline: &mut Pipeline, args: &[String]) -> Result<(), PluginError> {
        // Configuration and capability errors are fatal, raised before any
        // registry mutation.
        let mode = Mode::parse_args(args)?;
        if self.strategy == Strategy::ReplaceSink
            && !pipeline.context().grants_privileged_access()
        {
            return Err(PluginError::CapabilityUnavailable(
                "privileged component slot patching",
            ));
        }

        debug!(%mode, policy = ?self.policy, strategy = ?self.strategy, "quell initialized");
        pipeline.add_listener(Box::new(AttachListener {
            scheduler: Mutex::new(AttachmentScheduler::new(self.policy)),
            strategy: self.strategy,
            rules: self.rules_for(mode),
            token: Mutex::new(None),
            installed_sink: Mutex::new(None),
        }));
        Ok(())
    }
}

/// The lifecycle listener that performs the attachment.
struct AttachListener {
    scheduler: Mutex<AttachmentScheduler>,
    strategy: Strategy,
    rules: RuleTable,
    /// Token of the handler installed on the sink chain, if any.
    token: Mutex<Option<InstallToken>>,
    /// The replacement chain installed by the invasive strategy, if any.
    installed_sink: Mutex<Option<Arc<HandlerChain>>>,
}

impl EventListener for AttachListener {
    fn on_event(&self, event: &PipelineEvent, ctx: &CompileContext) {
        let decision = self.scheduler.lock().unwrap().observe(event);
        match decision {
            Decision::Stay => {}
            Decision::Attach => self.attach(ctx),
            Decision::Reassert => self.reassert(ctx),
        }
    }
}

impl AttachListener {
    fn handler(&self) -> Box<ReclassifyHandler> {
        Box::new(ReclassifyHandler::with_rules(self.rules.clone()))
    }

    /// Performs the attachment. Failures are logged, never propagated: the
    /// layer must not cause a harder failure than the diagnostics it
    /// softens, so an unattachable context compiles with its original
    /// behavior.
    fn attach(&self, ctx: &CompileContext) {
        match self.strategy {
            Strategy::InstallHandler => {
                let chain = match ctx.sink() {
                    Ok(chain) => chain,
                    Err(err) => {
                        error!(%err, "cannot attach: sink not available");
                        return;
                    }
                };
                let token = chain.install(self.handler());
                *self.token.lock().unwrap() = Some(token);
                debug!(?token, "installed reclassify handler");
            }
            Strategy::ReplaceSink => {
                let old = match ctx.sink() {
                    Ok(chain) => chain,
                    Err(err) => {
                        error!(%err, "cannot attach: sink not available");
                        return;
                    }
                };
                let replacement = Arc::new(HandlerChain::new(Box::new(old)));
                let token = replacement.install(self.handler());
                *self.token.lock().unwrap() = Some(token);

                // Patch every live holder except the sink entry itself.
                let holders: Vec<&'static str> = ctx
                    .registry()
                    .kinds()
                    .into_iter()
                    .filter(|k| *k != kind::SINK)
                    .collect();
                let report = ctx.registry().rebind_pinned(
                    kind::SINK,
                    Arc::clone(&replacement) as Arc<dyn Component>,
                    &holders,
                );
                if report.is_complete() {
                    debug!(patched = ?report.patched, "replacement sink rebound");
                } else {
                    // Degraded mode: diagnostics observed through un-patched
                    // holders are not reclassified.
                    warn!(
                        unpatched = ?report.unpatched(),
                        "partial rebind; continuing in degraded mode"
                    );
                }
                *self.installed_sink.lock().unwrap() = Some(replacement);
            }
        }
    }

    /// Re-asserts a previous attachment against whatever the host's own
    /// initialization may have installed in between.
    fn reassert(&self, ctx: &CompileContext) {
        match self.strategy {
            // Install is idempotent by handler name: if our handler is still
            // active this reconfigures it in place, otherwise it stacks on
            // top of whatever displaced it.
            Strategy::InstallHandler => self.attach(ctx),
            Strategy::ReplaceSink => {
                let current = match ctx.sink() {
                    Ok(chain) => chain,
                    Err(err) => {
                        error!(%err, "cannot re-assert: sink not available");
                        return;
                    }
                };
                let ours = self.installed_sink.lock().unwrap().clone();
                match ours {
                    Some(ours) if Arc::ptr_eq(&ours, &current) => {
                        debug!("re-assert: replacement sink still in place");
                    }
                    _ => self.attach(ctx),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quell_diagnostics::DiagnosticSink;

    #[test]
    fn invalid_argument_fails_init() {
        let mut pipeline = Pipeline::new(Box::new(DiagnosticSink::new()), false);
        let plugin = ReclassifyPlugin::new();
        let err = pipeline
            .register_plugin(&plugin, &["silence".to_string()])
            .unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
    }

    #[test]
    fn replace_sink_requires_privileged_access() {
        let mut pipeline = Pipeline::new(Box::new(DiagnosticSink::new()), false);
        let plugin = ReclassifyPlugin::new().with_strategy(Strategy::ReplaceSink);
        let err = pipeline.register_plugin(&plugin, &[]).unwrap_err();
        assert!(matches!(err, PluginError::CapabilityUnavailable(_)));
    }

    #[test]
    fn install_strategy_needs_no_privilege() {
        let mut pipeline = Pipeline::new(Box::new(DiagnosticSink::new()), false);
        let plugin = ReclassifyPlugin::new();
        pipeline.register_plugin(&plugin, &[]).unwrap();
    }
}
