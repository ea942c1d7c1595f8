//! Contact intake controller.
//!
//! Owns the record, the error map and the lifecycle phase of one mounted form.
//! Transitions:
//!
//! ```text
//! Idle --submit(invalid)--> Idle (errors published, focus signalled)
//! Idle --submit(valid)--> Submitting --sink ok--> Success --reset--> Idle
//!                                    \--sink err--> Failed --retry--> Idle
//! ```
//!
//! The controller is a cloneable handle. State sits behind a mutex that is
//! never held across an await, so `set_field` stays callable while a submit
//! is suspended on the sink or the clock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::core::focus::focus_target;
use crate::core::types::{ErrorMap, Field, FormSnapshot, Phase, SubmissionRecord};
use crate::core::validator::validate_record;
use crate::io::clock::Clock;
use crate::io::config::IntakeConfig;
use crate::io::sink::SubmissionSink;

/// Delays applied by [`IntakeController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Simulated round trip after the sink accepted the record.
    pub submit_delay: Duration,
    /// Wait between entering `Success` and clearing the record.
    pub clear_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(1000),
            clear_delay: Duration::from_millis(500),
        }
    }
}

impl From<&IntakeConfig> for Timings {
    fn from(cfg: &IntakeConfig) -> Self {
        Self {
            submit_delay: cfg.submit_delay(),
            clear_delay: cfg.clear_delay(),
        }
    }
}

/// Change notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IntakeEvent {
    FieldChanged { field: Field, error_cleared: bool },
    ErrorsPublished { errors: ErrorMap, focus: Field },
    PhaseChanged { phase: Phase },
    RecordCleared,
}

/// Result of one [`IntakeController::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid { errors: ErrorMap, focus: Field },
    /// The sink accepted the record.
    Delivered,
    /// The sink returned an error.
    Failed { reason: String },
    /// A cycle is in flight or finished; call `reset` first.
    Rejected { phase: Phase },
}

#[derive(Debug, Default)]
struct State {
    form: FormSnapshot,
    /// Bumped by every submit and reset; a pending clear only applies to the
    /// cycle that scheduled it.
    generation: u64,
}

pub struct IntakeController<S, C> {
    state: Arc<Mutex<State>>,
    sink: Arc<S>,
    clock: Arc<C>,
    timings: Timings,
    events: broadcast::Sender<IntakeEvent>,
}

impl<S, C> Clone for IntakeController<S, C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            sink: Arc::clone(&self.sink),
            clock: Arc::clone(&self.clock),
            timings: self.timings,
            events: self.events.clone(),
        }
    }
}

impl<S: SubmissionSink, C: Clock> IntakeController<S, C> {
    pub fn new(sink: S, clock: C, timings: Timings) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            sink: Arc::new(sink),
            clock: Arc::new(clock),
            timings,
            events,
        }
    }

    /// Receive every change made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<IntakeEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.lock().form.clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock().form.phase.clone()
    }

    /// Overwrite one field. A stale error for that field is dropped at once,
    /// whatever the new value is.
    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        let error_cleared = {
            let mut state = self.lock();
            state.form.record.set(field, value);
            state.form.errors.remove(field).is_some()
        };
        if error_cleared {
            debug!(%field, "cleared stale error on edit");
        }
        self.emit(IntakeEvent::FieldChanged {
            field,
            error_cleared,
        });
    }

    /// Validate and, if valid, hand the record to the sink.
    ///
    /// Accepted from `Idle` and `Failed`. Suspends twice on the clock: once
    /// for the simulated round trip and once before clearing the record after
    /// success. The phase stays `Success` while the record is cleared.
    #[instrument(skip_all)]
    pub async fn submit(&self) -> SubmitOutcome {
        let (record, generation) = {
            let mut state = self.lock();
            if matches!(state.form.phase, Phase::Submitting | Phase::Success) {
                let phase = state.form.phase.clone();
                warn!(%phase, "submit ignored while a cycle is active");
                return SubmitOutcome::Rejected { phase };
            }

            let errors = validate_record(&state.form.record);
            if let Some(focus) = focus_target(&errors) {
                let left_failed = state.form.phase != Phase::Idle;
                state.form.phase = Phase::Idle;
                state.form.errors = errors.clone();
                state.form.focus = Some(focus);
                drop(state);

                debug!(count = errors.len(), %focus, "submission rejected by validation");
                if left_failed {
                    self.emit(IntakeEvent::PhaseChanged { phase: Phase::Idle });
                }
                self.emit(IntakeEvent::ErrorsPublished {
                    errors: errors.clone(),
                    focus,
                });
                return SubmitOutcome::Invalid { errors, focus };
            }

            state.form.errors = ErrorMap::new();
            state.form.focus = None;
            state.form.phase = Phase::Submitting;
            state.generation += 1;
            (state.form.record.clone(), state.generation)
        };
        self.emit(IntakeEvent::PhaseChanged {
            phase: Phase::Submitting,
        });

        info!("submitting contact request");
        let delivery = self.sink.deliver(&record).await;
        self.clock.sleep(self.timings.submit_delay).await;

        if let Err(err) = delivery {
            let reason = format!("{err:#}");
            warn!(%reason, "submission sink failed");
            let phase = Phase::Failed {
                reason: reason.clone(),
            };
            self.lock().form.phase = phase.clone();
            self.emit(IntakeEvent::PhaseChanged { phase });
            return SubmitOutcome::Failed { reason };
        }

        self.lock().form.phase = Phase::Success;
        self.emit(IntakeEvent::PhaseChanged {
            phase: Phase::Success,
        });
        info!("contact request delivered");

        self.clock.sleep(self.timings.clear_delay).await;
        let cleared = {
            let mut state = self.lock();
            let current = state.generation == generation;
            if current {
                state.form.record.clear();
            }
            current
        };
        if cleared {
            self.emit(IntakeEvent::RecordCleared);
        } else {
            debug!("skipped post-success clear; form was reset meanwhile");
        }

        SubmitOutcome::Delivered
    }

    /// "Send another message": return to an empty `Idle` form.
    ///
    /// No-op in `Idle` and `Submitting`. From `Failed` the kept record is
    /// discarded; use [`retry`](Self::retry) to keep it.
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            if matches!(state.form.phase, Phase::Idle | Phase::Submitting) {
                return;
            }
            state.form = FormSnapshot::default();
            state.generation += 1;
        }
        debug!("form reset");
        self.emit(IntakeEvent::PhaseChanged { phase: Phase::Idle });
    }

    /// Leave `Failed` for `Idle`, keeping the record for another attempt.
    pub fn retry(&self) {
        {
            let mut state = self.lock();
            if !matches!(state.form.phase, Phase::Failed { .. }) {
                return;
            }
            state.form.phase = Phase::Idle;
        }
        self.emit(IntakeEvent::PhaseChanged { phase: Phase::Idle });
    }

    /// Current record, for callers that only need the values.
    pub fn record(&self) -> SubmissionRecord {
        self.lock().form.record.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: IntakeEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validator::{EMAIL_INVALID, MESSAGE_TOO_SHORT};
    use crate::test_support::{
        FailingSink, RecordingClock, RecordingSink, fill, record, valid_record,
    };

    fn controller() -> (
        IntakeController<RecordingSink, RecordingClock>,
        RecordingSink,
        RecordingClock,
    ) {
        let sink = RecordingSink::default();
        let clock = RecordingClock::default();
        let ctrl = IntakeController::new(sink.clone(), clock.clone(), Timings::default());
        (ctrl, sink, clock)
    }

    #[tokio::test]
    async fn invalid_submit_publishes_errors_and_focus() {
        let (ctrl, sink, clock) = controller();
        fill(&ctrl, &record("Ann", "ann@example", "new-website", "short"));

        let outcome = ctrl.submit().await;
        let SubmitOutcome::Invalid { errors, focus } = outcome else {
            panic!("expected invalid outcome, got {outcome:?}");
        };
        assert_eq!(focus, Field::Email);
        assert_eq!(errors.get(Field::Email), Some(EMAIL_INVALID));
        assert_eq!(errors.get(Field::Message), Some(MESSAGE_TOO_SHORT));
        assert_eq!(errors.len(), 2);

        let snapshot = ctrl.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.errors, errors);
        assert_eq!(snapshot.focus, Some(Field::Email));
        assert!(sink.delivered().is_empty());
        assert!(clock.slept().is_empty());
    }

    #[tokio::test]
    async fn valid_submit_delivers_once_and_clears_record() {
        let (ctrl, sink, clock) = controller();
        let input = valid_record();
        fill(&ctrl, &input);

        assert_eq!(ctrl.submit().await, SubmitOutcome::Delivered);

        assert_eq!(sink.delivered(), vec![input]);
        assert_eq!(
            clock.slept(),
            vec![Duration::from_millis(1000), Duration::from_millis(500)]
        );
        let snapshot = ctrl.snapshot();
        assert_eq!(snapshot.phase, Phase::Success);
        assert!(snapshot.record.is_empty());
        assert!(snapshot.errors.is_empty());
    }

    #[tokio::test]
    async fn editing_a_field_drops_its_error_unconditionally() {
        let (ctrl, _, _) = controller();
        ctrl.set_field(Field::Email, "bad");
        ctrl.submit().await;
        assert!(ctrl.snapshot().errors.contains(Field::Email));

        ctrl.set_field(Field::Email, "still typing");
        let errors = ctrl.snapshot().errors;
        assert!(!errors.contains(Field::Email));
        assert!(errors.contains(Field::Name));
    }

    #[tokio::test]
    async fn reset_in_idle_changes_nothing() {
        let (ctrl, _, _) = controller();
        ctrl.set_field(Field::Name, "Ann");
        ctrl.submit().await;
        let before = ctrl.snapshot();

        ctrl.reset();
        assert_eq!(ctrl.snapshot(), before);
    }

    #[tokio::test]
    async fn submit_and_reset_returns_to_initial_state() {
        let (ctrl, _, _) = controller();
        fill(&ctrl, &valid_record());
        ctrl.submit().await;

        ctrl.reset();
        assert_eq!(ctrl.snapshot(), FormSnapshot::default());
    }

    #[tokio::test]
    async fn submit_after_success_is_rejected() {
        let (ctrl, sink, _) = controller();
        fill(&ctrl, &valid_record());
        ctrl.submit().await;
        fill(&ctrl, &valid_record());

        assert_eq!(
            ctrl.submit().await,
            SubmitOutcome::Rejected {
                phase: Phase::Success
            }
        );
        assert_eq!(sink.delivered().len(), 1);
    }

    #[tokio::test]
    async fn sink_failure_keeps_record_for_retry() {
        let clock = RecordingClock::default();
        let ctrl = IntakeController::new(
            FailingSink::new("outbox unavailable"),
            clock.clone(),
            Timings::default(),
        );
        let input = valid_record();
        fill(&ctrl, &input);

        let outcome = ctrl.submit().await;
        assert!(
            matches!(&outcome, SubmitOutcome::Failed { reason } if reason.contains("outbox unavailable"))
        );
        let snapshot = ctrl.snapshot();
        assert!(matches!(snapshot.phase, Phase::Failed { .. }));
        assert_eq!(snapshot.record, input);
        // No clear delay after a failure.
        assert_eq!(clock.slept(), vec![Duration::from_millis(1000)]);

        ctrl.retry();
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.record(), input);
    }

    #[tokio::test]
    async fn reset_from_failed_discards_record() {
        let ctrl = IntakeController::new(
            FailingSink::new("down"),
            RecordingClock::default(),
            Timings::default(),
        );
        fill(&ctrl, &valid_record());
        ctrl.submit().await;

        ctrl.reset();
        assert_eq!(ctrl.snapshot(), FormSnapshot::default());
    }

    #[tokio::test]
    async fn invalid_submit_from_failed_returns_to_idle() {
        let ctrl = IntakeController::new(
            FailingSink::new("down"),
            RecordingClock::default(),
            Timings::default(),
        );
        fill(&ctrl, &valid_record());
        ctrl.submit().await;
        ctrl.set_field(Field::Name, " ");

        let outcome = ctrl.submit().await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Invalid {
                focus: Field::Name,
                ..
            }
        ));
        assert_eq!(ctrl.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn retry_outside_failed_is_noop() {
        let (ctrl, _, _) = controller();
        ctrl.set_field(Field::Message, "draft");
        ctrl.retry();
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.record().message, "draft");
    }

    #[tokio::test]
    async fn events_announce_focus_and_cleared_errors() {
        let (ctrl, _, _) = controller();
        fill(&ctrl, &record("Ann", "ann@example", "new-website", "short"));
        let mut rx = ctrl.subscribe();

        ctrl.submit().await;
        let event = rx.try_recv().expect("errors event");
        let IntakeEvent::ErrorsPublished { errors, focus } = event else {
            panic!("expected errors event, got {event:?}");
        };
        assert_eq!(focus, Field::Email);
        assert!(errors.contains(Field::Message));

        ctrl.set_field(Field::Email, "still typing");
        assert_eq!(
            rx.try_recv().expect("field event"),
            IntakeEvent::FieldChanged {
                field: Field::Email,
                error_cleared: true
            }
        );

        ctrl.set_field(Field::Name, "Bea");
        assert_eq!(
            rx.try_recv().expect("field event"),
            IntakeEvent::FieldChanged {
                field: Field::Name,
                error_cleared: false
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn events_trace_the_success_cycle() {
        let (ctrl, _, _) = controller();
        fill(&ctrl, &valid_record());
        let mut rx = ctrl.subscribe();

        ctrl.submit().await;
        ctrl.reset();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                IntakeEvent::PhaseChanged {
                    phase: Phase::Submitting
                },
                IntakeEvent::PhaseChanged {
                    phase: Phase::Success
                },
                IntakeEvent::RecordCleared,
                IntakeEvent::PhaseChanged { phase: Phase::Idle },
            ]
        );
    }
}
