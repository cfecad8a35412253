//! Decides the moment the layer attaches to the pipeline.

use quell_pipeline::{Phase, PipelineEvent};

/// The lifecycle phase whose start event triggers late attachment.
///
/// `PhaseStarted(CheckFlow)` is the event immediately preceding the first
/// phase that can emit the targeted diagnostics: it is delivered after all
/// relevant passes are constructed and before the phase body runs.
pub const TRIGGER_PHASE: Phase = Phase::CheckFlow;

/// When the scheduler fires the attach decision.
///
/// Listed in increasing order of robustness; [`LateEvent`](TriggerPolicy::LateEvent)
/// is the default.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TriggerPolicy {
    /// Attach at context creation, before any pass exists. Cheapest, but
    /// unsafe if the host's own initialization later overwrites the
    /// registry entry — a race the scheduler cannot see.
    Eager,
    /// Attach at context creation, then re-assert ownership immediately
    /// before the first phase that can emit the targeted diagnostics.
    EagerReassert,
    /// Attach only on the event immediately preceding the first phase that
    /// can emit the targeted diagnostics, after all relevant passes are
    /// guaranteed constructed.
    #[default]
    LateEvent,
}

/// Whether the layer has attached to the current context.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttachState {
    /// Not yet attached.
    Unattached,
    /// Attached; the trigger will not fire again.
    Attached,
}

/// What the plugin should do in response to an observed event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Decision {
    /// Nothing to do for this event.
    Stay,
    /// Perform the attachment now.
    Attach,
    /// Re-assert a previously performed attachment.
    Reassert,
}

/// State machine mapping lifecycle events to attach decisions.
///
/// Attachment fires at most once per context: replaying the triggering
/// event yields [`Decision::Stay`] once the state is
/// [`AttachState::Attached`], and a re-assert fires at most once as well.
#[derive(Debug)]
pub struct AttachmentScheduler {
    policy: TriggerPolicy,
    state: AttachState,
    reasserted: bool,
}

impl AttachmentScheduler {
    /// Creates a scheduler with the given trigger policy.
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            policy,
            state: AttachState::Unattached,
            reasserted: false,
        }
    }

    /// Returns the current attach state.
    pub fn state(&self) -> AttachState {
        self.state
    }

    /// Observes a lifecycle event and returns the decision for it.
    pub fn observe(&mut self, event: &PipelineEvent) -> Decision {
        match (self.policy, event, self.state) {
            (
                TriggerPolicy::Eager | TriggerPolicy::EagerReassert,
                PipelineEvent::ContextCreated,
                AttachState::Unattached,
            ) => {
                self.state = AttachState::Attached;
                Decision::Attach
            }
            (
                TriggerPolicy::EagerReassert,
                PipelineEvent::PhaseStarted(TRIGGER_PHASE),
                AttachState::Attached,
            ) if !self.reasserted => {
                self.reasserted = true;
                Decision::Reassert
            }
            (
                TriggerPolicy::LateEvent,
                PipelineEvent::PhaseStarted(TRIGGER_PHASE),
                AttachState::Unattached,
            ) => {
                self.state = AttachState::Attached;
                Decision::Attach
            }
            _ => Decision::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(policy: TriggerPolicy) -> Vec<(PipelineEvent, Decision)> {
        let mut scheduler = AttachmentScheduler::new(policy);
        let mut events = vec![PipelineEvent::ContextCreated];
        for phase in Phase::ALL {
            events.push(PipelineEvent::PhaseStarted(phase));
            events.push(PipelineEvent::PhaseFinished(phase));
        }
        events
            .into_iter()
            .map(|e| (e, scheduler.observe(&e)))
            .collect()
    }

    fn decisions(policy: TriggerPolicy) -> Vec<Decision> {
        drive(policy)
            .into_iter()
            .map(|(_, d)| d)
            .filter(|d| *d != Decision::Stay)
            .collect()
    }

    #[test]
    fn late_event_attaches_once_at_trigger_phase() {
        let log = drive(TriggerPolicy::LateEvent);
        let attaches: Vec<_> = log
            .iter()
            .filter(|(_, d)| *d == Decision::Attach)
            .collect();
        assert_eq!(attaches.len(), 1);
        assert_eq!(
            attaches[0].0,
            PipelineEvent::PhaseStarted(Phase::CheckFlow)
        );
    }

    #[test]
    fn eager_attaches_at_context_creation() {
        let log = drive(TriggerPolicy::Eager);
        assert_eq!(log[0].1, Decision::Attach);
        assert_eq!(decisions(TriggerPolicy::Eager), vec![Decision::Attach]);
    }

    #[test]
    fn eager_reassert_attaches_then_reasserts() {
        assert_eq!(
            decisions(TriggerPolicy::EagerReassert),
            vec![Decision::Attach, Decision::Reassert]
        );
    }

    #[test]
    fn replayed_trigger_does_not_reattach() {
        let mut scheduler = AttachmentScheduler::new(TriggerPolicy::LateEvent);
        let trigger = PipelineEvent::PhaseStarted(Phase::CheckFlow);
        assert_eq!(scheduler.observe(&trigger), Decision::Attach);
        assert_eq!(scheduler.observe(&trigger), Decision::Stay);
        assert_eq!(scheduler.state(), AttachState::Attached);
    }

    #[test]
    fn unrelated_events_stay() {
        let mut scheduler = AttachmentScheduler::new(TriggerPolicy::LateEvent);
        assert_eq!(
            scheduler.observe(&PipelineEvent::ContextCreated),
            Decision::Stay
        );
        assert_eq!(
            scheduler.observe(&PipelineEvent::PhaseStarted(Phase::Parse)),
            Decision::Stay
        );
        assert_eq!(scheduler.state(), AttachState::Unattached);
    }
}
