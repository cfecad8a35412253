//! End-to-end scenarios against the synthetic pipeline.

use quell_diagnostics::{Diagnostic, DiagnosticSink, Severity, Span};
use quell_pipeline::{
    kind, JournalEntry, PassSpec, Phase, Pipeline, PipelineEvent, ScriptEntry,
};
use quell_plugin::{ReclassifyPlugin, Strategy, TriggerPolicy, UNREPORTED_FAMILY};
use std::sync::Arc;

fn unreported(exception: &str) -> Diagnostic {
    Diagnostic::error(
        UNREPORTED_FAMILY,
        "unreported exception not caught or declared",
        Span::new(104, 131),
    )
    .with_arg(exception)
}

fn missing_semicolon() -> Diagnostic {
    Diagnostic::error("error.syntax.missing-semicolon", "expected ';'", Span::new(42, 43))
}

/// A pipeline scripted with one targeted diagnostic and one unrelated error.
fn scripted_pipeline(terminal: &Arc<DiagnosticSink>, privileged: bool) -> Pipeline {
    Pipeline::new(Box::new(Arc::clone(terminal)), privileged)
        .with_diagnostic(ScriptEntry::new(
            Phase::CheckFlow,
            kind::FLOW_PASS,
            unreported("IOException"),
        ))
        .with_diagnostic(ScriptEntry::new(
            Phase::CheckFlow,
            kind::ATTR_PASS,
            missing_semicolon(),
        ))
}

#[test]
fn warn_is_the_default_and_demotes() {
    let terminal = Arc::new(DiagnosticSink::new());
    let mut pipeline = scripted_pipeline(&terminal, false);
    pipeline
        .register_plugin(&ReclassifyPlugin::new(), &[])
        .unwrap();
    pipeline.run().unwrap();

    let all = terminal.take_all();
    assert_eq!(all.len(), 2);

    let warning = all.iter().find(|d| d.severity == Severity::Warning).unwrap();
    assert_eq!(warning.code, UNREPORTED_FAMILY);
    assert_eq!(
        warning.message,
        "unreported exception IOException not caught or declared to be thrown"
    );

    // The unrelated error reaches the terminal unchanged.
    let error = all.iter().find(|d| d.severity == Severity::Error).unwrap();
    assert_eq!(error.code, "error.syntax.missing-semicolon");
    assert_eq!(error.message, "expected ';'");
    assert_eq!(terminal.error_count(), 1);
}

#[test]
fn nowarn_suppresses_without_replacement() {
    let terminal = Arc::new(DiagnosticSink::new());
    let mut pipeline = scripted_pipeline(&terminal, false);
    pipeline
        .register_plugin(&ReclassifyPlugin::new(), &["nowarn".to_string()])
        .unwrap();
    pipeline.run().unwrap();

    // The targeted diagnostic vanishes entirely; no warning or note replaces it.
    let all = terminal.take_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].code, "error.syntax.missing-semicolon");
    assert_eq!(all[0].severity, Severity::Error);
}

#[test]
fn without_plugin_the_error_is_untouched() {
    let terminal = Arc::new(DiagnosticSink::new());
    let mut pipeline = scripted_pipeline(&terminal, false);
    pipeline.run().unwrap();

    assert_eq!(terminal.error_count(), 2);
    let all = terminal.take_all();
    assert!(all.iter().any(|d| d.code == UNREPORTED_FAMILY && d.severity == Severity::Error));
}

#[test]
fn every_policy_attaches_before_first_targeted_diagnostic() {
    for policy in [
        TriggerPolicy::Eager,
        TriggerPolicy::EagerReassert,
        TriggerPolicy::LateEvent,
    ] {
        let terminal = Arc::new(DiagnosticSink::new());
        let mut pipeline = scripted_pipeline(&terminal, false);
        pipeline
            .register_plugin(&ReclassifyPlugin::new().with_policy(policy), &[])
            .unwrap();
        pipeline.run().unwrap();

        let warnings = terminal
            .take_all()
            .into_iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        assert_eq!(warnings, 1, "policy {policy:?} missed the diagnostic");
    }
}

#[test]
fn late_trigger_fires_after_holders_exist_and_before_emission() {
    let terminal = Arc::new(DiagnosticSink::new());
    let mut pipeline = scripted_pipeline(&terminal, false);
    pipeline
        .register_plugin(
            &ReclassifyPlugin::new().with_policy(TriggerPolicy::LateEvent),
            &[],
        )
        .unwrap();
    pipeline.run().unwrap();

    let journal = pipeline.journal();
    let trigger = journal
        .iter()
        .position(|e| *e == JournalEntry::Event(PipelineEvent::PhaseStarted(Phase::CheckFlow)))
        .unwrap();
    let last_construction = journal
        .iter()
        .rposition(|e| matches!(e, JournalEntry::PassConstructed(_)))
        .unwrap();
    let first_targeted_emission = journal
        .iter()
        .position(|e| matches!(e, JournalEntry::Emitted(code, _) if code == UNREPORTED_FAMILY))
        .unwrap();

    // The trigger event never fires before all holders are constructed, and
    // never after the first targeted diagnostic could have been emitted.
    assert!(last_construction < trigger);
    assert!(trigger < first_targeted_emission);

    // And the demotion proves attachment preceded emission.
    assert_eq!(terminal.error_count(), 1);
}

#[test]
fn reassert_does_not_stack_a_second_handler() {
    let terminal = Arc::new(DiagnosticSink::new());
    let mut pipeline = scripted_pipeline(&terminal, false);
    pipeline
        .register_plugin(
            &ReclassifyPlugin::new().with_policy(TriggerPolicy::EagerReassert),
            &[],
        )
        .unwrap();
    pipeline.run().unwrap();

    // Exactly one non-terminal node despite attach + re-assert, and the
    // diagnostic was classified exactly once.
    assert_eq!(pipeline.context().sink().unwrap().depth(), 1);
    let warnings = terminal
        .take_all()
        .into_iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    assert_eq!(warnings, 1);
}

#[test]
fn replace_sink_strategy_reclassifies_through_patched_holders() {
    let terminal = Arc::new(DiagnosticSink::new());
    let mut pipeline = scripted_pipeline(&terminal, true);
    pipeline
        .register_plugin(
            &ReclassifyPlugin::new().with_strategy(Strategy::ReplaceSink),
            &[],
        )
        .unwrap();
    pipeline.run().unwrap();

    let all = terminal.take_all();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|d| d.severity == Severity::Warning));
    assert_eq!(terminal.error_count(), 1);
}

#[test]
fn partial_rebind_leaves_unpatched_holders_unreclassified() {
    let terminal = Arc::new(DiagnosticSink::new());
    let mut pipeline = Pipeline::new(Box::new(Arc::clone(&terminal)), true)
        .with_passes(vec![
            PassSpec {
                kind: kind::ATTR_PASS,
                constructed_in: Phase::EnterSymbols,
                patchable: true,
            },
            // This holder denies the privileged capability.
            PassSpec {
                kind: kind::FLOW_PASS,
                constructed_in: Phase::AttributeTypes,
                patchable: false,
            },
        ])
        .with_diagnostic(ScriptEntry::new(
            Phase::CheckFlow,
            kind::ATTR_PASS,
            unreported("SQLException"),
        ))
        .with_diagnostic(ScriptEntry::new(
            Phase::CheckFlow,
            kind::FLOW_PASS,
            unreported("IOException"),
        ));
    pipeline
        .register_plugin(
            &ReclassifyPlugin::new().with_strategy(Strategy::ReplaceSink),
            &[],
        )
        .unwrap();
    pipeline.run().unwrap();

    // Degraded mode: the diagnostic routed through the patched holder is
    // demoted, the one through the un-patched holder is not.
    let all = terminal.take_all();
    assert_eq!(all.len(), 2);
    let demoted = all.iter().find(|d| d.severity == Severity::Warning).unwrap();
    assert!(demoted.message.contains("SQLException"));
    let untouched = all.iter().find(|d| d.severity == Severity::Error).unwrap();
    assert!(untouched.args.contains(&"IOException".to_string()));
}

#[test]
fn contexts_are_independent() {
    let softened = Arc::new(DiagnosticSink::new());
    let mut with_plugin = scripted_pipeline(&softened, false);
    with_plugin
        .register_plugin(&ReclassifyPlugin::new(), &[])
        .unwrap();

    let untouched = Arc::new(DiagnosticSink::new());
    let mut without_plugin = scripted_pipeline(&untouched, false);

    with_plugin.run().unwrap();
    without_plugin.run().unwrap();

    assert_eq!(softened.error_count(), 1);
    assert_eq!(untouched.error_count(), 2);
}
