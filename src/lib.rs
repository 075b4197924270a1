//! Vibration monitoring core for a lathe-mounted accelerometer.
//!
//! The library is UI independent: a producer (`acquisition`) pulls readings
//! from a device or a synthetic generator and feeds a shared
//! [`MonitorSession`], which keeps the rolling history and raises alerts.
//! Presentation layers poll [`MonitorSession::snapshot`].

pub mod acquisition;
pub mod config;
pub mod device;
pub mod logger;
pub mod monitor;
pub mod report;
pub mod types;

pub use acquisition::{Acquisition, AcquisitionEvent, SourceMode, StopOutcome};
pub use config::{AppConfig, ConfigError, ConfigManager};
pub use monitor::{AlertThresholds, MonitorSession, RollingSeries, RunId, SessionError, SessionSnapshot};
pub use types::{AlertEvent, AlertStatus, OperatorMetadata, Reading, Sample, SessionState, SessionSummary};
