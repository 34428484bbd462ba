//! Analysis status poller
//!
//! Follows one technology's analysis until every component has reached a
//! terminal state. The poller is a small state machine driven by a single
//! owned timer:
//!
//! ```text
//! Idle --start--> Fetching --non-terminal--> Scheduled --timer--> Fetching
//!                    |                                              |
//!                    +--terminal--> Idle          stop() --> Stopped
//! ```
//!
//! Fetch failures keep the last good snapshot, record the error and retry
//! after a fixed backoff. Every cycle carries an epoch; `stop` and `refetch`
//! bump it so results from superseded fetches are dropped instead of applied.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use techlens_core::domain::{AnalysisStatus, TechnologyId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Anything that can produce the current analysis status of a technology
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    async fn fetch_status(&self, technology_id: &TechnologyId) -> Result<AnalysisStatus>;
}

#[async_trait]
impl<T: StatusSource + ?Sized> StatusSource for Arc<T> {
    async fn fetch_status(&self, technology_id: &TechnologyId) -> Result<AnalysisStatus> {
        (**self).fetch_status(technology_id).await
    }
}

/// Timing rules for the poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Floor applied to the backend's recommendation
    pub min_interval: Duration,

    /// Delay used when the backend sends no recommendation
    pub default_interval: Duration,

    /// Delay after a failed fetch, regardless of any recommendation
    pub failure_backoff: Duration,
}

impl PollSettings {
    /// Delay before the poll that follows `status`
    pub fn next_interval(&self, status: &AnalysisStatus) -> Duration {
        status
            .polling_recommendation
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_interval)
            .max(self.min_interval)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_interval.is_zero() || self.failure_backoff.is_zero() {
            return Err(crate::ClientError::InvalidConfig(
                "poll intervals must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(15_000),
            default_interval: Duration::from_millis(18_000),
            failure_backoff: Duration::from_millis(30_000),
        }
    }
}

/// Where the poll loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Not started, disabled, or finished because every component is terminal
    Idle,
    /// A status request is in flight
    Fetching,
    /// Waiting for the timer to fire the next request
    Scheduled,
    /// Torn down with `stop`
    Stopped,
}

/// Everything a consumer needs to render the poller's state
#[derive(Debug, Clone, PartialEq)]
pub struct PollerView {
    pub phase: PollPhase,
    pub snapshot: Option<AnalysisStatus>,
    pub error: Option<String>,
    pub loading: bool,
    pub next_delay: Option<Duration>,
    /// Number of fetches whose result was applied
    pub fetch_count: u64,
}

impl PollerView {
    pub fn is_polling(&self) -> bool {
        matches!(self.phase, PollPhase::Fetching | PollPhase::Scheduled)
    }

    /// True once the loop ended on its own or was stopped
    pub fn is_settled(&self) -> bool {
        match self.phase {
            PollPhase::Stopped => true,
            PollPhase::Idle => !self.loading,
            PollPhase::Fetching | PollPhase::Scheduled => false,
        }
    }
}

impl Default for PollerView {
    fn default() -> Self {
        Self {
            phase: PollPhase::Idle,
            snapshot: None,
            error: None,
            loading: true,
            next_delay: None,
            fetch_count: 0,
        }
    }
}

struct Control {
    technology_id: Option<TechnologyId>,
    enabled: bool,
    epoch: u64,
    timer: Option<JoinHandle<()>>,
    view: PollerView,
}

impl Control {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Shared<S> {
    source: S,
    settings: PollSettings,
    control: Mutex<Control>,
    updates: watch::Sender<PollerView>,
}

impl<S: StatusSource> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, control: &Control) {
        self.updates.send_replace(control.view.clone());
    }

    /// Issues a fetch for the given epoch on its own task
    fn spawn_fetch(self: &Arc<Self>, technology_id: TechnologyId, epoch: u64) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            shared.fetch(technology_id, epoch).await;
        });
    }

    async fn fetch(self: &Arc<Self>, technology_id: TechnologyId, epoch: u64) {
        debug!(id = %technology_id, epoch, "Polling analysis status");
        let result = self.source.fetch_status(&technology_id).await;
        self.apply(epoch, result);
    }

    /// Applies a fetch result and decides whether to poll again
    fn apply(self: &Arc<Self>, epoch: u64, result: Result<AnalysisStatus>) {
        let mut control = self.lock();
        if control.epoch != epoch || control.view.phase == PollPhase::Stopped {
            debug!(epoch, current = control.epoch, "Discarding superseded status result");
            return;
        }

        control.view.loading = false;
        control.view.fetch_count += 1;

        let delay = match result {
            Ok(status) => {
                control.view.error = None;
                let delay = if status.is_terminal() {
                    info!(id = %status.technology_id, overall = %status.overall, "Analysis finished");
                    None
                } else {
                    Some(self.settings.next_interval(&status))
                };
                control.view.snapshot = Some(status);
                delay
            }
            Err(e) => {
                warn!(
                    "Status poll failed, retrying in {:?}: {}",
                    self.settings.failure_backoff, e
                );
                control.view.error = Some(e.to_string());
                Some(self.settings.failure_backoff)
            }
        };

        match delay {
            Some(delay) => self.schedule(&mut control, delay),
            None => {
                control.cancel_timer();
                control.view.phase = PollPhase::Idle;
                control.view.next_delay = None;
            }
        }
        self.publish(&control);
    }

    /// Replaces the pending timer with one that fires after `delay`
    fn schedule(self: &Arc<Self>, control: &mut Control, delay: Duration) {
        control.cancel_timer();
        control.view.phase = PollPhase::Scheduled;
        control.view.next_delay = Some(delay);

        let shared = Arc::clone(self);
        let epoch = control.epoch;
        control.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.fire(epoch).await;
        }));
    }

    async fn fire(self: &Arc<Self>, epoch: u64) {
        let technology_id = {
            let mut control = self.lock();
            if control.epoch != epoch || control.view.phase != PollPhase::Scheduled {
                return;
            }
            // Detach from the timer slot so cancelling later never aborts this fetch.
            control.timer = None;
            control.view.phase = PollPhase::Fetching;
            control.view.next_delay = None;
            self.publish(&control);
            match control.technology_id.clone() {
                Some(id) => id,
                None => return,
            }
        };

        self.fetch(technology_id, epoch).await;
    }

    fn stop(&self) {
        let mut control = self.lock();
        control.cancel_timer();
        control.enabled = false;
        if control.view.phase != PollPhase::Stopped {
            control.epoch += 1;
            control.view.phase = PollPhase::Stopped;
            control.view.next_delay = None;
            debug!("Status poller stopped");
            self.publish(&control);
        }
    }
}

/// Polls a [`StatusSource`] until every analysis component is terminal
///
/// Must be used from within a Tokio runtime. Dropping the poller stops it.
///
/// # Example
/// ```no_run
/// # use techlens_client::{AnalysisClient, ClientConfig, PollSettings, StatusPoller};
/// # async fn example() -> anyhow::Result<()> {
/// let client = AnalysisClient::new(ClientConfig::default())?;
/// let poller = StatusPoller::new(client, PollSettings::default());
/// poller.start("42", true);
///
/// let view = poller.settled().await;
/// if let Some(status) = view.snapshot {
///     println!("{} of {} stages complete", status.progress().complete, status.progress().total);
/// }
/// # Ok(())
/// # }
/// ```
pub struct StatusPoller<S: StatusSource> {
    shared: Arc<Shared<S>>,
}

impl<S: StatusSource> StatusPoller<S> {
    pub fn new(source: S, settings: PollSettings) -> Self {
        let (updates, _) = watch::channel(PollerView::default());
        Self {
            shared: Arc::new(Shared {
                source,
                settings,
                control: Mutex::new(Control {
                    technology_id: None,
                    enabled: false,
                    epoch: 0,
                    timer: None,
                    view: PollerView::default(),
                }),
                updates,
            }),
        }
    }

    /// Begins tracking a technology
    ///
    /// Issues one fetch immediately. With `enabled == false` nothing is
    /// requested and the poller keeps reporting a loading state. Calling
    /// `start` while a poll loop is active does nothing.
    pub fn start(&self, technology_id: impl Into<TechnologyId>, enabled: bool) {
        let technology_id = technology_id.into();
        let mut control = self.shared.lock();

        if control.enabled && control.view.is_polling() {
            debug!(id = %technology_id, "Poller already running, ignoring start");
            return;
        }

        if control.technology_id.as_ref() != Some(&technology_id) {
            control.view.snapshot = None;
            control.view.error = None;
            control.view.fetch_count = 0;
        }
        control.technology_id = Some(technology_id.clone());
        control.cancel_timer();
        control.epoch += 1;
        control.view.next_delay = None;
        control.view.loading = control.view.snapshot.is_none();

        if !enabled {
            control.enabled = false;
            control.view.phase = PollPhase::Idle;
            control.view.loading = true;
            self.shared.publish(&control);
            return;
        }

        info!(id = %technology_id, "Starting status poller");
        control.enabled = true;
        control.view.phase = PollPhase::Fetching;
        let epoch = control.epoch;
        self.shared.publish(&control);
        drop(control);

        self.shared.spawn_fetch(technology_id, epoch);
    }

    /// Cancels any pending poll and fetches immediately
    ///
    /// The loop resumes afterwards if the result is not terminal. Does
    /// nothing unless the poller has been started with `enabled == true`.
    pub fn refetch(&self) {
        let mut control = self.shared.lock();
        let technology_id = match (&control.technology_id, control.enabled) {
            (Some(id), true) => id.clone(),
            _ => {
                debug!("Poller not enabled, ignoring refetch");
                return;
            }
        };

        control.cancel_timer();
        control.epoch += 1;
        control.view.loading = true;
        control.view.phase = PollPhase::Fetching;
        control.view.next_delay = None;
        let epoch = control.epoch;
        self.shared.publish(&control);
        drop(control);

        self.shared.spawn_fetch(technology_id, epoch);
    }

    /// Cancels any pending poll and discards in-flight results
    ///
    /// Safe to call repeatedly.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Latest known status, `None` before the first successful fetch
    pub fn snapshot(&self) -> Option<AnalysisStatus> {
        self.shared.lock().view.snapshot.clone()
    }

    /// Message of the most recent failed fetch, cleared by the next success
    pub fn error(&self) -> Option<String> {
        self.shared.lock().view.error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().view.loading
    }

    pub fn is_polling(&self) -> bool {
        self.shared.lock().view.is_polling()
    }

    pub fn phase(&self) -> PollPhase {
        self.shared.lock().view.phase
    }

    /// Delay of the currently scheduled poll
    pub fn next_delay(&self) -> Option<Duration> {
        self.shared.lock().view.next_delay
    }

    pub fn settings(&self) -> &PollSettings {
        &self.shared.settings
    }

    /// Receives a fresh [`PollerView`] after every state change
    pub fn subscribe(&self) -> watch::Receiver<PollerView> {
        self.shared.updates.subscribe()
    }

    /// Waits until the loop has finished or been stopped
    pub async fn settled(&self) -> PollerView {
        let mut updates = self.subscribe();
        match updates.wait_for(PollerView::is_settled).await {
            Ok(view) => view.clone(),
            // The sender lives in `self`, so it cannot close while we wait.
            Err(_) => self.shared.lock().view.clone(),
        }
    }
}

impl<S: StatusSource> Drop for StatusPoller<S> {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use techlens_core::domain::{ComponentState, ComponentStatus, PollingRecommendation};
    use tokio::sync::Notify;
    use tokio::time::Instant;

    #[derive(Clone)]
    enum Step {
        Status(AnalysisStatus),
        Fail(&'static str),
    }

    /// Replays a script of responses; the last step repeats forever
    struct ScriptedSource {
        steps: std::sync::Mutex<VecDeque<Step>>,
        calls: AtomicUsize,
        gate: Option<Notify>,
    }

    impl ScriptedSource {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: std::sync::Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
                gate: None,
            })
        }

        fn gated(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: std::sync::Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
                gate: Some(Notify::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_status(&self, _technology_id: &TechnologyId) -> Result<AnalysisStatus> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let step = {
                let mut steps = self.steps.lock().unwrap();
                if steps.len() > 1 {
                    steps.pop_front().unwrap()
                } else {
                    steps.front().cloned().unwrap()
                }
            };
            match step {
                Step::Status(status) => Ok(status),
                Step::Fail(msg) => Err(ClientError::api_error(503, msg)),
            }
        }
    }

    fn status(components: &[(&str, ComponentStatus)], interval_ms: Option<u64>) -> AnalysisStatus {
        let components: BTreeMap<String, ComponentState> = components
            .iter()
            .map(|(key, status)| (key.to_string(), ComponentState::new(status.clone())))
            .collect();
        AnalysisStatus {
            technology_id: TechnologyId::from("12"),
            components,
            overall: "processing".to_string(),
            polling_recommendation: PollingRecommendation { interval_ms },
        }
    }

    fn processing(interval_ms: Option<u64>) -> Step {
        Step::Status(status(
            &[("a", ComponentStatus::Complete), ("b", ComponentStatus::Processing)],
            interval_ms,
        ))
    }

    async fn wait_for_fetches(rx: &mut watch::Receiver<PollerView>, count: u64) -> PollerView {
        rx.wait_for(|v| v.fetch_count >= count).await.unwrap().clone()
    }

    #[test]
    fn test_next_interval_rules() {
        let settings = PollSettings::default();
        let interval = |ms| settings.next_interval(&status(&[], ms));

        assert_eq!(interval(Some(5_000)), Duration::from_secs(15));
        assert_eq!(interval(Some(40_000)), Duration::from_secs(40));
        assert_eq!(interval(None), Duration::from_secs(18));
        assert!(settings.validate().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedules_at_clamped_floor() {
        let source = ScriptedSource::new(vec![processing(Some(5_000))]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();
        let started = Instant::now();

        poller.start("12", true);
        let view = wait_for_fetches(&mut rx, 1).await;
        assert_eq!(view.phase, PollPhase::Scheduled);
        assert_eq!(view.next_delay, Some(Duration::from_secs(15)));
        assert!(!view.loading);
        assert!(poller.is_polling());

        wait_for_fetches(&mut rx, 2).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(15) && elapsed < Duration::from_secs(16));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_status_stops_polling() {
        let mut done = status(
            &[("a", ComponentStatus::Complete), ("b", ComponentStatus::Error)],
            None,
        );
        done.components.get_mut("b").unwrap().error_message = Some("x".to_string());

        let source = ScriptedSource::new(vec![Step::Status(done)]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();

        poller.start("12", true);
        let view = wait_for_fetches(&mut rx, 1).await;
        assert_eq!(view.phase, PollPhase::Idle);
        assert!(!poller.is_polling());
        assert_eq!(poller.next_delay(), None);
        assert_eq!(poller.snapshot().unwrap().error_message("b"), Some("x"));

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_terminal() {
        let source = ScriptedSource::new(vec![
            processing(None),
            processing(Some(20_000)),
            Step::Status(status(&[("a", ComponentStatus::Complete)], None)),
        ]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();
        let started = Instant::now();

        poller.start("12", true);
        let view = wait_for_fetches(&mut rx, 1).await;
        assert_eq!(view.next_delay, Some(Duration::from_secs(18)));

        let view = wait_for_fetches(&mut rx, 2).await;
        assert_eq!(view.next_delay, Some(Duration::from_secs(20)));

        let view = wait_for_fetches(&mut rx, 3).await;
        assert_eq!(view.phase, PollPhase::Idle);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(38) && elapsed < Duration::from_secs(39));

        let settled = poller.settled().await;
        assert!(settled.snapshot.unwrap().is_terminal());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_snapshot_and_backs_off() {
        let first = processing(Some(20_000));
        let source = ScriptedSource::new(vec![first.clone(), Step::Fail("backend unavailable")]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();

        poller.start("12", true);
        let before = wait_for_fetches(&mut rx, 1).await.snapshot.unwrap();

        let view = wait_for_fetches(&mut rx, 2).await;
        assert_eq!(view.snapshot.as_ref(), Some(&before));
        assert_eq!(view.next_delay, Some(Duration::from_secs(30)));
        assert_eq!(view.phase, PollPhase::Scheduled);
        assert!(poller.error().unwrap().contains("backend unavailable"));
        assert_eq!(poller.snapshot(), Some(before));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_clears_error() {
        let source = ScriptedSource::new(vec![
            Step::Fail("timeout"),
            Step::Status(status(&[("a", ComponentStatus::Complete)], None)),
        ]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();

        poller.start("12", true);
        let view = wait_for_fetches(&mut rx, 1).await;
        assert!(view.snapshot.is_none());
        assert!(view.error.is_some());
        assert!(!view.loading);

        let view = wait_for_fetches(&mut rx, 2).await;
        assert!(view.error.is_none());
        assert_eq!(view.phase, PollPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_keeps_one_loop() {
        let source = ScriptedSource::new(vec![processing(None)]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();

        poller.start("12", true);
        poller.start("12", true);
        wait_for_fetches(&mut rx, 1).await;
        poller.start("12", true);
        assert_eq!(source.calls(), 1);

        wait_for_fetches(&mut rx, 2).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_cancels_pending_timer() {
        let source = ScriptedSource::new(vec![processing(Some(20_000))]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();
        let started = Instant::now();

        poller.start("12", true);
        wait_for_fetches(&mut rx, 1).await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        poller.refetch();
        assert!(poller.is_loading());
        let view = wait_for_fetches(&mut rx, 2).await;
        assert_eq!(view.next_delay, Some(Duration::from_secs(20)));
        assert!(!view.loading);

        // The cancelled timer would have fired at 20s.
        tokio::time::sleep_until(started + Duration::from_secs(25)).await;
        assert_eq!(source.calls(), 2);

        wait_for_fetches(&mut rx, 3).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_in_flight_result() {
        let source = ScriptedSource::gated(vec![processing(None)]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());

        poller.start("12", true);
        tokio::task::yield_now().await;
        assert_eq!(source.calls(), 1);

        poller.stop();
        poller.stop();
        source.release();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(poller.snapshot(), None);
        assert_eq!(poller.phase(), PollPhase::Stopped);
        assert!(!poller.is_polling());
        assert_eq!(poller.next_delay(), None);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_scheduled_poll() {
        let source = ScriptedSource::new(vec![processing(None)]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
        let mut rx = poller.subscribe();

        poller.start("12", true);
        wait_for_fetches(&mut rx, 1).await;
        poller.stop();

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls(), 1);
        assert!(poller.snapshot().is_some());
        assert_eq!(poller.settled().await.phase, PollPhase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_start_makes_no_requests() {
        let source = ScriptedSource::new(vec![processing(None)]);
        let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());

        poller.start("12", false);
        poller.refetch();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(source.calls(), 0);
        assert!(poller.is_loading());
        assert!(!poller.is_polling());
        assert_eq!(poller.phase(), PollPhase::Idle);

        let mut rx = poller.subscribe();
        poller.start("12", true);
        wait_for_fetches(&mut rx, 1).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let source = ScriptedSource::new(vec![processing(None)]);
        {
            let poller = StatusPoller::new(Arc::clone(&source), PollSettings::default());
            let mut rx = poller.subscribe();
            poller.start("12", true);
            wait_for_fetches(&mut rx, 1).await;
        }
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls(), 1);
    }
}
