//! The scripted synthetic pipeline driver.

use crate::context::{kind, CompileContext};
use crate::pass::AnalysisPass;
use crate::phase::{Phase, PipelineEvent};
use crate::plugin::{EventListener, Plugin, PluginError};
use quell_diagnostics::{Diagnostic, TerminalSink};
use quell_registry::RegistryError;
use std::sync::Mutex;
use tracing::debug;

/// Declares when a pass is constructed and whether it grants patching.
#[derive(Clone, Copy, Debug)]
pub struct PassSpec {
    /// The kind the pass registers under.
    pub kind: &'static str,
    /// The phase at whose start the pass is constructed.
    pub constructed_in: Phase,
    /// Whether the pass grants the privileged slot-patching capability.
    pub patchable: bool,
}

/// One scripted diagnostic: which pass emits it, and during which phase.
#[derive(Clone, Debug)]
pub struct ScriptEntry {
    /// The phase during which the diagnostic is emitted.
    pub phase: Phase,
    /// The kind of the pass that emits it.
    pub via: &'static str,
    /// The diagnostic to emit.
    pub diagnostic: Diagnostic,
}

impl ScriptEntry {
    /// Creates a script entry.
    pub fn new(phase: Phase, via: &'static str, diagnostic: Diagnostic) -> Self {
        Self {
            phase,
            via,
            diagnostic,
        }
    }
}

/// An entry in the pipeline's instrumentation journal.
///
/// The journal records, in order, every delivered event, pass construction,
/// and diagnostic emission, so tests can verify that attachment happened
/// after all relevant holders existed and before the first targeted
/// diagnostic was emitted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum JournalEntry {
    /// A lifecycle event was delivered to listeners.
    Event(PipelineEvent),
    /// A pass of the given kind was constructed.
    PassConstructed(&'static str),
    /// A diagnostic with the given code was emitted during the given phase.
    Emitted(String, Phase),
}

/// Errors from driving the synthetic pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A script entry referenced a pass that is not constructed in time.
    #[error("script references pass that does not exist: {0}")]
    UnknownPass(#[from] RegistryError),
}

/// A synthetic compilation: a context, listeners, pass specs, and a script.
///
/// Runs each phase strictly in order, constructing passes and emitting the
/// scripted diagnostics through them, and delivering lifecycle events to
/// listeners before and after each phase.
pub struct Pipeline {
    ctx: CompileContext,
    listeners: Vec<Box<dyn EventListener>>,
    passes: Vec<PassSpec>,
    script: Vec<ScriptEntry>,
    journal: Mutex<Vec<JournalEntry>>,
}

impl Pipeline {
    /// Creates a pipeline whose sink chain bottoms out at `terminal`.
    pub fn new(terminal: Box<dyn TerminalSink>, privileged: bool) -> Self {
        Self {
            ctx: CompileContext::new(terminal, privileged),
            listeners: Vec::new(),
            passes: vec![
                PassSpec {
                    kind: kind::ATTR_PASS,
                    constructed_in: Phase::EnterSymbols,
                    patchable: true,
                },
                PassSpec {
                    kind: kind::FLOW_PASS,
                    constructed_in: Phase::AttributeTypes,
                    patchable: true,
                },
            ],
            script: Vec::new(),
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the default pass specs.
    pub fn with_passes(mut self, passes: Vec<PassSpec>) -> Self {
        self.passes = passes;
        self
    }

    /// Appends a scripted diagnostic emission.
    pub fn with_diagnostic(mut self, entry: ScriptEntry) -> Self {
        self.script.push(entry);
        self
    }

    /// Returns the compilation context.
    pub fn context(&self) -> &CompileContext {
        &self.ctx
    }

    /// Registers a plugin by invoking its `init` entry point.
    pub fn register_plugin(
        &mut self,
        plugin: &dyn Plugin,
        args: &[String],
    ) -> Result<(), PluginError> {
        debug!(plugin = plugin.name(), "registering plugin");
        plugin.init(self, args)
    }

    /// Adds a lifecycle event listener.
    pub fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Runs the compilation: all phases in order, events around each.
    pub fn run(&mut self) -> Result<(), PipelineError> {
        self.dispatch(PipelineEvent::ContextCreated);
        for phase in Phase::ALL {
            self.dispatch(PipelineEvent::PhaseStarted(phase));
            self.run_phase(phase)?;
            self.dispatch(PipelineEvent::PhaseFinished(phase));
        }
        Ok(())
    }

    /// Returns a copy of the instrumentation journal.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.journal.lock().unwrap().clone()
    }

    fn dispatch(&self, event: PipelineEvent) {
        self.journal
            .lock()
            .unwrap()
            .push(JournalEntry::Event(event));
        for listener in &self.listeners {
            listener.on_event(&event, &self.ctx);
        }
    }

    fn run_phase(&mut self, phase: Phase) -> Result<(), PipelineError> {
        debug!(%phase, "running phase");
        for spec in &self.passes {
            if spec.constructed_in == phase {
                AnalysisPass::construct(spec.kind, &self.ctx, spec.patchable)?;
                self.journal
                    .lock()
                    .unwrap()
                    .push(JournalEntry::PassConstructed(spec.kind));
            }
        }
        for entry in &self.script {
            if entry.phase == phase {
                let pass = self
                    .ctx
                    .registry()
                    .lookup_as::<AnalysisPass>(entry.via)?;
                pass.emit(entry.diagnostic.clone());
                self.journal.lock().unwrap().push(JournalEntry::Emitted(
                    entry.diagnostic.code.clone(),
                    phase,
                ));
            }
        }
        Ok(())
    }
}
