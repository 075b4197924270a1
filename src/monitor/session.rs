use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{info, warn};

use super::series::RollingSeries;
use super::thresholds::AlertThresholds;
use crate::types::{AlertEvent, AlertStatus, OperatorMetadata, Reading, Sample, SessionState, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("monitoring session is not running")]
    NotRunning,
}

/// Owned copy of the session's buffers for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub x: RollingSeries,
    pub y: RollingSeries,
    pub z: RollingSeries,
    pub state: SessionState,
    pub alert_count: u32,
    pub next_timestamp: u64,
}

impl SessionSnapshot {
    pub fn latest(&self) -> Option<Sample> {
        let (timestamp, x) = self.x.last()?;
        let (_, y) = self.y.last()?;
        let (_, z) = self.z.last()?;
        Some(Sample::new(timestamp, Reading::new(x, y, z)))
    }

    /// Horizontal chart bounds: the visible window scrolls once more than
    /// `window` samples have arrived.
    pub fn x_bounds(&self, window: usize) -> (f64, f64) {
        match (self.x.first(), self.x.last()) {
            (Some((first, _)), Some((last, _))) => {
                let min = first as f64;
                let max = (window as u64).max(last + 1) as f64;
                (min, max)
            }
            _ => (0.0, window as f64),
        }
    }
}

/// Identifies one start-to-stop period of a session.
///
/// Producers record against the run they were started for, so a worker left
/// over from an earlier run cannot write into a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

#[derive(Debug)]
struct SessionInner {
    x: RollingSeries,
    y: RollingSeries,
    z: RollingSeries,
    next_timestamp: u64,
    alert_count: u32,
    alert_suppressed: bool,
    running: bool,
    run: RunId,
}

impl SessionInner {
    fn new(capacity: usize) -> Self {
        Self {
            x: RollingSeries::new(capacity),
            y: RollingSeries::new(capacity),
            z: RollingSeries::new(capacity),
            next_timestamp: 0,
            alert_count: 0,
            alert_suppressed: false,
            running: false,
            run: RunId(0),
        }
    }

    fn reset(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.next_timestamp = 0;
        self.alert_count = 0;
        self.alert_suppressed = false;
    }

    fn state(&self) -> SessionState {
        if !self.running {
            SessionState::Idle
        } else if self.alert_suppressed {
            SessionState::AlertPending
        } else {
            SessionState::Running
        }
    }
}

/// Rolling acceleration history with latched threshold alerts.
///
/// Shared between the producer thread (which calls [`ingest`](Self::ingest))
/// and the presentation layer (which calls [`snapshot`](Self::snapshot)).
/// All state sits behind a single lock; every method is a short critical
/// section and nothing is held across I/O.
///
/// Samples offered while the session is idle are rejected with
/// [`SessionError::NotRunning`] and leave the session untouched.
#[derive(Debug)]
pub struct MonitorSession {
    thresholds: AlertThresholds,
    inner: Mutex<SessionInner>,
}

impl Default for MonitorSession {
    fn default() -> Self {
        Self::new(super::MAX_POINTS, AlertThresholds::default())
    }
}

impl MonitorSession {
    pub fn new(capacity: usize, thresholds: AlertThresholds) -> Self {
        Self {
            thresholds,
            inner: Mutex::new(SessionInner::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // 数据本身在任何时刻都是一致的，锁中毒时继续使用
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Clears history and counters and begins accepting samples.
    ///
    /// Returns `false` without touching anything if already running.
    pub fn start(&self) -> bool {
        self.start_run().is_some()
    }

    /// Like [`start`](Self::start), but returns the id of the new run, or
    /// `None` if a run is already in progress.
    pub fn start_run(&self) -> Option<RunId> {
        let mut inner = self.lock();
        if inner.running {
            return None;
        }
        inner.reset();
        inner.running = true;
        inner.run = RunId(inner.run.0 + 1);
        info!("Monitoring session started (run {})", inner.run.0);
        Some(inner.run)
    }

    /// Stops accepting samples. History and the alert counter are kept until
    /// the next [`start`](Self::start).
    pub fn stop(&self) {
        Self::stop_locked(&mut self.lock());
    }

    /// Stops the session only if `run` is still the current run.
    pub fn stop_run(&self, run: RunId) {
        let mut inner = self.lock();
        if inner.run == run {
            Self::stop_locked(&mut inner);
        }
    }

    fn stop_locked(inner: &mut SessionInner) {
        if inner.running {
            inner.running = false;
            info!(
                "Monitoring session stopped after {} samples, {} alerts",
                inner.next_timestamp, inner.alert_count
            );
        }
    }

    pub fn ingest(&self, x: f64, y: f64, z: f64) -> Result<AlertStatus, SessionError> {
        let event = self.record(Reading::new(x, y, z))?;
        Ok(if event.is_some() {
            AlertStatus::AlertRaised
        } else {
            AlertStatus::NoAlert
        })
    }

    /// Same as [`ingest`](Self::ingest), but hands back the stamped sample
    /// and the counter when an alert fires.
    pub fn record(&self, reading: Reading) -> Result<Option<AlertEvent>, SessionError> {
        let mut inner = self.lock();
        if !inner.running {
            return Err(SessionError::NotRunning);
        }
        Ok(self.record_locked(&mut inner, reading))
    }

    /// Records a reading on behalf of the producer of `run`. Rejected once
    /// that run has been stopped, even if a newer run is active.
    pub fn record_for(&self, run: RunId, reading: Reading) -> Result<Option<AlertEvent>, SessionError> {
        let mut inner = self.lock();
        if !inner.running || inner.run != run {
            return Err(SessionError::NotRunning);
        }
        Ok(self.record_locked(&mut inner, reading))
    }

    fn record_locked(&self, inner: &mut SessionInner, reading: Reading) -> Option<AlertEvent> {
        let sample = Sample::new(inner.next_timestamp, reading);
        inner.x.push(sample.timestamp, reading.x);
        inner.y.push(sample.timestamp, reading.y);
        inner.z.push(sample.timestamp, reading.z);
        inner.next_timestamp += 1;

        match self.evaluate_locked(inner, &reading) {
            AlertStatus::AlertRaised => Some(AlertEvent {
                sample,
                alert_count: inner.alert_count,
            }),
            AlertStatus::NoAlert => None,
        }
    }

    /// Checks a reading against the thresholds, honouring the alert latch.
    ///
    /// Counts and latches on a breach. Has no effect while idle.
    pub fn evaluate_alert(&self, x: f64, y: f64, z: f64) -> AlertStatus {
        let mut inner = self.lock();
        if !inner.running {
            return AlertStatus::NoAlert;
        }
        self.evaluate_locked(&mut inner, &Reading::new(x, y, z))
    }

    fn evaluate_locked(&self, inner: &mut SessionInner, reading: &Reading) -> AlertStatus {
        if inner.alert_suppressed || self.thresholds.within_limits(reading) {
            return AlertStatus::NoAlert;
        }

        inner.alert_suppressed = true;
        inner.alert_count += 1;
        warn!(
            "Dangerous vibration: x={:.3} y={:.3} z={:.3} (alert #{})",
            reading.x, reading.y, reading.z, inner.alert_count
        );
        AlertStatus::AlertRaised
    }

    /// Releases the alert latch so the next breach alerts again.
    pub fn acknowledge_and_continue(&self) {
        self.lock().alert_suppressed = false;
    }

    /// Releases the latch, stops the session and reports the alert count.
    pub fn acknowledge_and_stop(&self, metadata: OperatorMetadata) -> SessionSummary {
        let mut inner = self.lock();
        inner.alert_suppressed = false;
        Self::stop_locked(&mut inner);
        SessionSummary::new(metadata, inner.alert_count)
    }

    /// Builds a summary from the current alert count without changing state.
    pub fn summarize(&self, metadata: OperatorMetadata) -> SessionSummary {
        SessionSummary::new(metadata, self.alert_count())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            x: inner.x.clone(),
            y: inner.y.clone(),
            z: inner.z.clone(),
            state: inner.state(),
            alert_count: inner.alert_count,
            next_timestamp: inner.next_timestamp,
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    pub fn alert_count(&self) -> u32 {
        self.lock().alert_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MAX_POINTS;
    use std::sync::Arc;
    use std::thread;

    fn running_session() -> MonitorSession {
        let session = MonitorSession::default();
        assert!(session.start());
        session
    }

    #[test]
    fn ingest_while_idle_is_rejected() {
        let session = MonitorSession::default();
        assert_eq!(session.ingest(0.0, 0.0, -9.8), Err(SessionError::NotRunning));
        assert_eq!(session.snapshot().next_timestamp, 0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let session = running_session();
        session.ingest(0.0, 0.0, -9.8).unwrap();
        assert!(!session.start());
        assert_eq!(session.snapshot().x.len(), 1);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let session = running_session();
        assert_eq!(session.ingest(1.5, 0.0, -9.8), Ok(AlertStatus::NoAlert));
        assert_eq!(session.ingest(1.5001, 0.0, -9.8), Ok(AlertStatus::AlertRaised));
    }

    #[test]
    fn z_alert_is_relative_to_gravity() {
        let session = running_session();
        assert_eq!(session.ingest(0.0, 0.0, -9.8), Ok(AlertStatus::NoAlert));
        assert_eq!(session.ingest(0.0, 0.0, -6.0), Ok(AlertStatus::AlertRaised));
    }

    #[test]
    fn latch_suppresses_alerts_until_acknowledged() {
        let session = running_session();
        assert_eq!(session.ingest(3.0, 0.0, -9.8), Ok(AlertStatus::AlertRaised));
        assert_eq!(session.state(), SessionState::AlertPending);

        for _ in 0..20 {
            assert_eq!(session.ingest(3.0, 3.0, 0.0), Ok(AlertStatus::NoAlert));
        }
        assert_eq!(session.alert_count(), 1);

        session.acknowledge_and_continue();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.ingest(0.0, -2.0, -9.8), Ok(AlertStatus::AlertRaised));
        assert_eq!(session.alert_count(), 2);
    }

    #[test]
    fn history_is_bounded_to_most_recent_samples() {
        let session = running_session();
        for i in 0..150 {
            session.ingest(i as f64 * 0.001, 0.0, -9.8).unwrap();
        }

        let snapshot = session.snapshot();
        let expected: Vec<u64> = (50..150).collect();
        for series in [&snapshot.x, &snapshot.y, &snapshot.z] {
            assert_eq!(series.len(), MAX_POINTS);
            assert_eq!(series.timestamps(), expected);
        }
        assert_eq!(snapshot.next_timestamp, 150);
        assert_eq!(snapshot.x_bounds(MAX_POINTS), (50.0, 150.0));
    }

    #[test]
    fn restart_resets_history_and_counters() {
        let session = running_session();
        session.ingest(5.0, 0.0, -9.8).unwrap();
        session.stop();
        assert_eq!(session.alert_count(), 1);

        assert!(session.start());
        let snapshot = session.snapshot();
        assert!(snapshot.x.is_empty());
        assert_eq!(snapshot.alert_count, 0);
        assert_eq!(snapshot.state, SessionState::Running);
        assert_eq!(session.ingest(0.0, 0.0, -9.8), Ok(AlertStatus::NoAlert));
        assert_eq!(session.snapshot().x.first(), Some((0, 0.0)));
    }

    #[test]
    fn acknowledge_and_stop_reports_alerts_since_start() {
        let session = running_session();
        let mut raised = 0;
        for i in 0..30 {
            let x = if i % 3 == 0 { 2.0 } else { 0.1 };
            if session.ingest(x, 0.0, -9.8).unwrap().is_raised() {
                raised += 1;
                session.acknowledge_and_continue();
            }
        }
        assert_eq!(raised, 10);

        let metadata = OperatorMetadata {
            name: "Luis".to_string(),
            ..Default::default()
        };
        let summary = session.acknowledge_and_stop(metadata.clone());
        assert_eq!(summary.alert_count, raised);
        assert_eq!(summary.metadata, metadata);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.ingest(0.0, 0.0, -9.8), Err(SessionError::NotRunning));
    }

    #[test]
    fn record_reports_the_stamped_sample() {
        let session = running_session();
        assert_eq!(session.record(Reading::new(0.0, 0.0, -9.8)), Ok(None));

        let event = session.record(Reading::new(0.0, 0.0, -5.0)).unwrap().unwrap();
        assert_eq!(event.sample, Sample::new(1, Reading::new(0.0, 0.0, -5.0)));
        assert_eq!(event.alert_count, 1);
    }

    #[test]
    fn stale_run_cannot_record_or_stop_a_newer_run() {
        let session = MonitorSession::default();
        let first = session.start_run().unwrap();
        assert_eq!(session.start_run(), None);
        session.stop();

        let second = session.start_run().unwrap();
        assert_ne!(first, second);
        assert_eq!(
            session.record_for(first, Reading::new(5.0, 0.0, -9.8)),
            Err(SessionError::NotRunning)
        );
        session.stop_run(first);
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.snapshot().x.is_empty());
        assert_eq!(session.alert_count(), 0);

        assert_eq!(session.record_for(second, Reading::new(0.0, 0.0, -9.8)), Ok(None));
        session.stop_run(second);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn evaluate_alert_does_not_touch_history() {
        let session = running_session();
        assert_eq!(session.evaluate_alert(0.0, 4.0, -9.8), AlertStatus::AlertRaised);
        assert_eq!(session.evaluate_alert(0.0, 4.0, -9.8), AlertStatus::NoAlert);
        assert!(session.snapshot().x.is_empty());
        assert_eq!(session.alert_count(), 1);
    }

    #[test]
    fn snapshot_while_ingesting_from_another_thread() {
        let session = Arc::new(running_session());
        let producer = {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    session.ingest(0.0, 0.0, -9.8).unwrap();
                }
            })
        };

        for _ in 0..200 {
            let snapshot = session.snapshot();
            assert!(snapshot.x.len() <= MAX_POINTS);
            assert_eq!(snapshot.x.timestamps(), snapshot.z.timestamps());
            let ts = snapshot.x.timestamps();
            assert!(ts.windows(2).all(|w| w[0] < w[1]));
        }

        producer.join().unwrap();
        assert_eq!(session.snapshot().next_timestamp, 2_000);
    }

    #[test]
    fn latest_sample_and_empty_bounds() {
        let session = running_session();
        assert_eq!(session.snapshot().latest(), None);
        assert_eq!(session.snapshot().x_bounds(100), (0.0, 100.0));

        session.ingest(0.25, -0.5, -9.6).unwrap();
        let latest = session.snapshot().latest().unwrap();
        assert_eq!(latest, Sample::new(0, Reading::new(0.25, -0.5, -9.6)));
        assert_eq!(session.snapshot().x_bounds(100), (0.0, 100.0));
    }
}
