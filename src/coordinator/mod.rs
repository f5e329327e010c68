// src/coordinator/mod.rs
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::models::{AnalysisRequest, AnalysisResult, GenerationOutcome, GenerationPreferences};
use crate::service::{self, PasswordService, ServiceError};
use crate::utils::describe_secret;

pub mod timer;

pub use timer::TimerSlot;

/// Completions posted back by spawned requests and timers.
#[derive(Debug)]
pub enum CoordinatorEvent {
    DebounceElapsed { timer_id: u64 },
    GenerationCompleted(GenerationOutcome),
    AnalysisCompleted { seq: u64, outcome: service::Result<AnalysisResult> },
}

/// What the controller should render after an event has been handled.
#[derive(Debug)]
pub enum CoordinatorUpdate {
    Generation(GenerationOutcome),
    Analysis(service::Result<AnalysisResult>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Input was empty: nothing is sent and the display resets now.
    Reset,
    /// A debounce timer is waiting for the input to go quiet.
    Scheduled,
    /// A request went out immediately with this sequence number.
    Fired(u64),
}

// Reports the generation outcome exactly once. If the task holding it ends
// without reporting (dropped or panicked), a failure is reported instead so
// the busy flag is always released.
struct GenerationTicket {
    events: Option<UnboundedSender<CoordinatorEvent>>,
}

impl GenerationTicket {
    fn new(events: UnboundedSender<CoordinatorEvent>) -> Self {
        Self { events: Some(events) }
    }

    fn complete(mut self, outcome: GenerationOutcome) {
        if let Some(events) = self.events.take() {
            let _ = events.send(CoordinatorEvent::GenerationCompleted(outcome));
        }
    }
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        if let Some(events) = self.events.take() {
            warn!("Generation task ended without reporting an outcome");
            let _ = events.send(CoordinatorEvent::GenerationCompleted(Err(ServiceError::Abandoned)));
        }
    }
}

// Same guarantee for one analysis request, keyed by its sequence number so
// an abandoned request still goes through the last-fired-wins check.
struct AnalysisTicket {
    seq: u64,
    events: Option<UnboundedSender<CoordinatorEvent>>,
}

impl AnalysisTicket {
    fn new(seq: u64, events: UnboundedSender<CoordinatorEvent>) -> Self {
        Self { seq, events: Some(events) }
    }

    fn complete(mut self, outcome: service::Result<AnalysisResult>) {
        if let Some(events) = self.events.take() {
            let _ = events.send(CoordinatorEvent::AnalysisCompleted { seq: self.seq, outcome });
        }
    }
}

impl Drop for AnalysisTicket {
    fn drop(&mut self) {
        if let Some(events) = self.events.take() {
            warn!("Analysis #{} ended without reporting an outcome", self.seq);
            let _ = events.send(CoordinatorEvent::AnalysisCompleted {
                seq: self.seq,
                outcome: Err(ServiceError::Abandoned),
            });
        }
    }
}

/// Owns request timing and ordering for both flows.
///
/// Generation is mutually exclusive: a trigger while a request is outstanding
/// is dropped. Analysis is debounced and last-fired-wins: every request gets a
/// sequence number and only the response to the latest one is passed on.
pub struct RequestCoordinator {
    service: Arc<dyn PasswordService>,
    events: UnboundedSender<CoordinatorEvent>,
    quiet_period: Duration,

    generating: bool,

    debounce: TimerSlot,
    pending_input: Option<String>,
    latest_seq: u64,
    analyses_in_flight: usize,
}

impl RequestCoordinator {
    pub fn new(
        service: Arc<dyn PasswordService>,
        events: UnboundedSender<CoordinatorEvent>,
        quiet_period: Duration,
    ) -> Self {
        Self {
            service,
            events,
            quiet_period,
            generating: false,
            debounce: TimerSlot::new(),
            pending_input: None,
            latest_seq: 0,
            analyses_in_flight: 0,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn has_pending_analysis(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn analyses_in_flight(&self) -> usize {
        self.analyses_in_flight
    }

    /// Start a generation request unless one is already in flight.
    ///
    /// Returns false when the trigger was dropped.
    pub fn request_generation(&mut self, preferences: GenerationPreferences) -> bool {
        if self.generating {
            debug!("Generate trigger ignored: a request is already in flight");
            return false;
        }
        self.generating = true;

        debug!(
            "Requesting generation: length {}, {} character classes",
            preferences.length,
            preferences.selected_classes()
        );
        let ticket = GenerationTicket::new(self.events.clone());
        let request = self.service.generate(preferences);
        tokio::spawn(async move {
            let outcome = request.await;
            ticket.complete(outcome);
        });
        true
    }

    /// Record a keystroke in the analyzer. Fires only after the input has been
    /// quiet for the full window; empty input resets synchronously.
    pub fn schedule_analysis(&mut self, raw_input: &str) -> ScheduleOutcome {
        if raw_input.is_empty() {
            self.reset_analysis();
            return ScheduleOutcome::Reset;
        }

        self.pending_input = Some(raw_input.to_string());
        let events = self.events.clone();
        let timer_id = self.debounce.schedule(self.quiet_period, move |timer_id| {
            let _ = events.send(CoordinatorEvent::DebounceElapsed { timer_id });
        });
        debug!("Analysis debounce timer {} scheduled for {}", timer_id, describe_secret(raw_input));
        ScheduleOutcome::Scheduled
    }

    /// Fire an analysis right away, bypassing and cancelling the debounce window.
    pub fn analyze_now(&mut self, raw_input: &str) -> ScheduleOutcome {
        self.debounce.cancel();
        self.pending_input = None;

        if raw_input.is_empty() {
            self.reset_analysis();
            return ScheduleOutcome::Reset;
        }
        ScheduleOutcome::Fired(self.fire_analysis(raw_input.to_string()))
    }

    /// Drop any pending timer and invalidate every in-flight analysis, so a
    /// late response cannot overwrite the neutral display.
    pub fn reset_analysis(&mut self) {
        if self.debounce.cancel() {
            debug!("Pending analysis cancelled by reset");
        }
        self.pending_input = None;
        self.latest_seq += 1;
    }

    fn fire_analysis(&mut self, password: String) -> u64 {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.analyses_in_flight += 1;
        debug!("Firing analysis #{} for {}", seq, describe_secret(&password));

        let ticket = AnalysisTicket::new(seq, self.events.clone());
        let request = self.service.analyze(AnalysisRequest { password });
        tokio::spawn(async move {
            let outcome = request.await;
            ticket.complete(outcome);
        });
        seq
    }

    /// Apply a completion. Returns what, if anything, should be rendered.
    pub fn handle_event(&mut self, event: CoordinatorEvent) -> Option<CoordinatorUpdate> {
        match event {
            CoordinatorEvent::GenerationCompleted(outcome) => {
                self.generating = false;
                if let Err(e) = &outcome {
                    warn!("Password generation failed: {}", e);
                }
                Some(CoordinatorUpdate::Generation(outcome))
            }
            CoordinatorEvent::DebounceElapsed { timer_id } => {
                if !self.debounce.take_if_live(timer_id) {
                    debug!("Ignoring expiry of superseded debounce timer {}", timer_id);
                    return None;
                }
                if let Some(password) = self.pending_input.take() {
                    self.fire_analysis(password);
                }
                None
            }
            CoordinatorEvent::AnalysisCompleted { seq, outcome } => {
                self.analyses_in_flight = self.analyses_in_flight.saturating_sub(1);
                if seq != self.latest_seq {
                    debug!("Discarding stale analysis #{} (latest is #{})", seq, self.latest_seq);
                    return None;
                }
                if let Err(e) = &outcome {
                    warn!("Password analysis #{} failed: {}", seq, e);
                }
                Some(CoordinatorUpdate::Analysis(outcome))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StrengthLabel;
    use crate::service::testing::{sample_result, CrashingService, ScriptedService};
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::Instant;

    const QUIET: Duration = Duration::from_millis(300);

    fn coordinator(service: &Arc<ScriptedService>) -> (RequestCoordinator, UnboundedReceiver<CoordinatorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let service: Arc<dyn PasswordService> = service.clone();
        (RequestCoordinator::new(service, tx, QUIET), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_generate_triggers_issue_one_request() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        assert!(coordinator.request_generation(GenerationPreferences::default()));
        assert!(coordinator.is_generating());
        for _ in 0..5 {
            assert!(!coordinator.request_generation(GenerationPreferences::default()));
        }
        assert_eq!(service.generation_requests().len(), 1);

        service.complete_generation(0, Ok("s3cret!Pass".to_string()));
        let update = coordinator.handle_event(rx.recv().await.unwrap());
        assert!(matches!(update, Some(CoordinatorUpdate::Generation(Ok(ref p))) if p == "s3cret!Pass"));
        assert!(!coordinator.is_generating());

        assert!(coordinator.request_generation(GenerationPreferences::default()));
        assert_eq!(service.generation_requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_generation_releases_busy_flag() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        coordinator.request_generation(GenerationPreferences::default());
        service.complete_generation(0, Err(ServiceError::Status(500)));

        let update = coordinator.handle_event(rx.recv().await.unwrap());
        assert!(matches!(update, Some(CoordinatorUpdate::Generation(Err(ServiceError::Status(500))))));
        assert!(!coordinator.is_generating());
        assert!(coordinator.request_generation(GenerationPreferences::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn crashed_generation_releases_busy_flag() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = RequestCoordinator::new(Arc::new(CrashingService), tx, QUIET);

        assert!(coordinator.request_generation(GenerationPreferences::default()));
        let update = coordinator.handle_event(rx.recv().await.unwrap());
        assert!(matches!(update, Some(CoordinatorUpdate::Generation(Err(ServiceError::Abandoned)))));
        assert!(!coordinator.is_generating());
        assert!(coordinator.request_generation(GenerationPreferences::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn crashed_analysis_is_reported_as_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = RequestCoordinator::new(Arc::new(CrashingService), tx, QUIET);

        assert!(matches!(coordinator.analyze_now("abc"), ScheduleOutcome::Fired(_)));
        assert_eq!(coordinator.analyses_in_flight(), 1);

        let update = coordinator.handle_event(rx.recv().await.unwrap());
        assert!(matches!(update, Some(CoordinatorUpdate::Analysis(Err(ServiceError::Abandoned)))));
        assert_eq!(coordinator.analyses_in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn crashed_stale_analysis_is_still_discarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = RequestCoordinator::new(Arc::new(CrashingService), tx, QUIET);

        coordinator.analyze_now("abc");
        coordinator.reset_analysis();

        assert!(coordinator.handle_event(rx.recv().await.unwrap()).is_none());
        assert_eq!(coordinator.analyses_in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_input_fires_one_request_with_last_value() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        for value in ["p", "pa", "pas"] {
            assert_eq!(coordinator.schedule_analysis(value), ScheduleOutcome::Scheduled);
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(service.analysis_requests().is_empty());
        }
        let last_input = Instant::now() - Duration::from_millis(50);

        let event = rx.recv().await.unwrap();
        assert!(Instant::now() - last_input >= QUIET);
        assert!(coordinator.handle_event(event).is_none());
        assert_eq!(service.analysis_requests(), vec!["pas".to_string()]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(service.analysis_requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_resets_without_request() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        coordinator.schedule_analysis("a");
        assert_eq!(coordinator.schedule_analysis(""), ScheduleOutcome::Reset);
        assert!(!coordinator.has_pending_analysis());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert!(service.analysis_requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn analyze_now_bypasses_debounce() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        coordinator.schedule_analysis("abc");
        let outcome = coordinator.analyze_now("abcd");
        assert!(matches!(outcome, ScheduleOutcome::Fired(_)));
        assert_eq!(service.analysis_requests(), vec!["abcd".to_string()]);
        assert!(!coordinator.has_pending_analysis());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(service.analysis_requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn analyze_now_with_empty_input_resets() {
        let service = ScriptedService::new();
        let (mut coordinator, _rx) = coordinator(&service);

        assert_eq!(coordinator.analyze_now(""), ScheduleOutcome::Reset);
        assert!(service.analysis_requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn older_response_arriving_late_is_discarded() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        coordinator.analyze_now("a");
        coordinator.analyze_now("ab");
        assert_eq!(coordinator.analyses_in_flight(), 2);

        service.complete_analysis(1, Ok(sample_result(StrengthLabel::Weak, 35)));
        let fresh = coordinator.handle_event(rx.recv().await.unwrap());
        assert!(matches!(fresh, Some(CoordinatorUpdate::Analysis(Ok(_)))));

        service.complete_analysis(0, Ok(sample_result(StrengthLabel::VeryWeak, 5)));
        let stale = coordinator.handle_event(rx.recv().await.unwrap());
        assert!(stale.is_none());
        assert_eq!(coordinator.analyses_in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_invalidates_in_flight_analysis() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        coordinator.analyze_now("abc");
        coordinator.schedule_analysis("");

        service.complete_analysis(0, Ok(sample_result(StrengthLabel::Strong, 80)));
        assert!(coordinator.handle_event(rx.recv().await.unwrap()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn analysis_failure_is_passed_on() {
        let service = ScriptedService::new();
        let (mut coordinator, mut rx) = coordinator(&service);

        coordinator.analyze_now("abc");
        service.complete_analysis(0, Err(ServiceError::Status(502)));

        let update = coordinator.handle_event(rx.recv().await.unwrap());
        assert!(matches!(update, Some(CoordinatorUpdate::Analysis(Err(ServiceError::Status(502))))));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_timer_expiry_is_ignored() {
        let service = ScriptedService::new();
        let (mut coordinator, _rx) = coordinator(&service);

        coordinator.schedule_analysis("abc");
        assert!(coordinator.handle_event(CoordinatorEvent::DebounceElapsed { timer_id: 999 }).is_none());
        assert!(service.analysis_requests().is_empty());
        assert!(coordinator.has_pending_analysis());
    }
}
