use std::path::PathBuf;

use chrono::Local;
use crossbeam_channel::{bounded, Receiver, Sender};
use lathe_watch::{Acquisition, AcquisitionEvent, AlertEvent, OperatorMetadata, SessionSummary};

// 应用状态管理模块

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Monitoring,
    Summary,
}

/// 监测状态
#[derive(Debug, Default)]
pub struct MonitoringState {
    pub acquisition: Option<Acquisition>,
    pub source_status: String,
    /// Alert waiting for the operator to continue or stop.
    pub pending_alert: Option<AlertEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Saved(PathBuf),
    Failed(String),
}

/// 摘要状态
#[derive(Debug, Default)]
pub struct SummaryState {
    pub summary: Option<SessionSummary>,
    pub export_status: Option<ExportStatus>,
}

/// Channel between the acquisition thread and the UI.
#[derive(Debug)]
pub struct EventChannel {
    pub sender: Sender<AcquisitionEvent>,
    pub receiver: Receiver<AcquisitionEvent>,
}

/// 统一的应用状态管理
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub metadata: OperatorMetadata,
    pub monitoring: MonitoringState,
    pub summary: SummaryState,
    pub events: EventChannel,
}

impl AppState {
    pub fn new(event_capacity: usize) -> Self {
        let (sender, receiver) = bounded(event_capacity);
        let metadata = OperatorMetadata {
            date: Local::now().format("%Y-%m-%d").to_string(),
            ..Default::default()
        };

        Self {
            screen: Screen::Setup,
            metadata,
            monitoring: MonitoringState::default(),
            summary: SummaryState::default(),
            events: EventChannel { sender, receiver },
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring.acquisition.is_some()
    }

    /// Drops events left over from a previous run.
    pub fn discard_stale_events(&mut self) {
        while self.events.receiver.try_recv().is_ok() {}
    }
}
