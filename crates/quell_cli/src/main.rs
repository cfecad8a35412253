//! quell CLI — runs a demo compilation with the reclassification plugin
//! attached and renders the diagnostics that survive.
//!
//! The demo compiles a fixed synthetic program whose flow analysis reports
//! two unreported checked exceptions. Without the plugin those are hard
//! errors; under `--mode warn` they become warnings, and under
//! `--mode nowarn` they disappear.

#![warn(missing_docs)]

mod config;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use quell_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, Span, TerminalRenderer,
};
use quell_pipeline::{kind, Phase, Pipeline, ScriptEntry};
use quell_plugin::{Mode, ReclassifyPlugin, Strategy, TriggerPolicy};

use crate::config::FileConfig;

/// quell — soften unreported-exception diagnostics in a compilation pipeline.
#[derive(Parser, Debug)]
#[command(name = "quell", version, about = "Diagnostic reclassification demo")]
struct Cli {
    /// Plugin mode; overrides the configuration file.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// When the plugin attaches to the pipeline.
    #[arg(long, value_enum, default_value_t = PolicyArg::Late)]
    policy: PolicyArg,

    /// How the plugin takes effect once attached.
    #[arg(long, value_enum, default_value_t = StrategyArg::InstallHandler)]
    strategy: StrategyArg,

    /// Output format for surviving diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Path to a `quell.toml` configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose (debug-level) output.
    #[arg(short, long)]
    verbose: bool,
}

/// CLI counterpart of [`Mode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Demote unreported-exception errors to warnings.
    Warn,
    /// Suppress unreported-exception errors entirely.
    Nowarn,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Warn => Mode::Warn,
            ModeArg::Nowarn => Mode::NoWarn,
        }
    }
}

/// CLI counterpart of [`TriggerPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Attach at context creation.
    Eager,
    /// Attach eagerly, re-assert before flow analysis.
    EagerReassert,
    /// Attach on the event preceding flow analysis (default).
    Late,
}

impl From<PolicyArg> for TriggerPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Eager => TriggerPolicy::Eager,
            PolicyArg::EagerReassert => TriggerPolicy::EagerReassert,
            PolicyArg::Late => TriggerPolicy::LateEvent,
        }
    }
}

/// CLI counterpart of [`Strategy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Install a handler on the existing sink chain (default).
    InstallHandler,
    /// Replace the sink and patch pinned references (privileged).
    ReplaceSink,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::InstallHandler => Strategy::InstallHandler,
            StrategyArg::ReplaceSink => Strategy::ReplaceSink,
        }
    }
}

/// Output format for surviving diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// A JSON array of diagnostic values.
    Json,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    match run(&cli) {
        Ok(had_errors) => process::exit(if had_errors { 1 } else { 0 }),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let mode = match cli.mode {
        Some(arg) => Mode::from(arg),
        None => file_config.mode()?.unwrap_or_default(),
    };

    let terminal = Arc::new(DiagnosticSink::new());
    let privileged = cli.strategy == StrategyArg::ReplaceSink;
    let mut pipeline = demo_pipeline(Arc::clone(&terminal), privileged);

    let plugin = ReclassifyPlugin::new()
        .with_policy(cli.policy.into())
        .with_strategy(cli.strategy.into())
        .with_extra_rules(file_config.rules);
    pipeline.register_plugin(&plugin, &[mode.to_string()])?;
    pipeline.run()?;

    let diagnostics = terminal.take_all();
    match cli.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer;
            for diag in &diagnostics {
                print!("{}", renderer.render(diag));
            }
            println!(
                "{} diagnostic(s), {} error(s)",
                diagnostics.len(),
                terminal.error_count()
            );
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        }
    }

    Ok(terminal.has_errors())
}

/// The fixed synthetic compilation the demo runs.
///
/// Two unreported checked exceptions surface during flow analysis, plus an
/// unused-variable warning during type attribution to show untargeted
/// diagnostics passing through.
fn demo_pipeline(terminal: Arc<DiagnosticSink>, privileged: bool) -> Pipeline {
    Pipeline::new(Box::new(terminal), privileged)
        .with_diagnostic(ScriptEntry::new(
            Phase::AttributeTypes,
            kind::ATTR_PASS,
            Diagnostic::warning("warning.unused-variable", "unused variable 'tmp'", Span::new(58, 61)),
        ))
        .with_diagnostic(ScriptEntry::new(
            Phase::CheckFlow,
            kind::FLOW_PASS,
            Diagnostic::error(
                "error.unreported-exceptional-condition",
                "unreported exception not caught or declared",
                Span::new(104, 131),
            )
            .with_arg("IOException"),
        ))
        .with_diagnostic(ScriptEntry::new(
            Phase::CheckFlow,
            kind::FLOW_PASS,
            Diagnostic::error(
                "error.unreported-exceptional-condition",
                "unreported exception not caught or declared",
                Span::new(212, 240),
            )
            .with_arg("SQLException"),
        ))
}
