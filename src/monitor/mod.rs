pub mod series;
pub mod session;
pub mod thresholds;

pub use series::{RollingSeries, MAX_POINTS};
pub use session::{MonitorSession, RunId, SessionError, SessionSnapshot};
pub use thresholds::AlertThresholds;
