use super::Sample;

/// Result of evaluating the latest sample against the thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertStatus {
    AlertRaised,
    NoAlert,
}

impl AlertStatus {
    pub fn is_raised(self) -> bool {
        matches!(self, AlertStatus::AlertRaised)
    }
}

/// Delivered to the presentation layer when an alert is raised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlertEvent {
    pub sample: Sample,
    /// Alert counter after this alert was counted.
    pub alert_count: u32,
}

/// Lifecycle of a monitoring session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    /// Running, with an alert waiting for operator acknowledgment.
    AlertPending,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "Stopped",
            SessionState::Running => "Monitoring",
            SessionState::AlertPending => "Alert pending",
        }
    }
}
