pub mod sample;
pub mod alert;
pub mod summary;

pub use sample::{Reading, Sample};
pub use alert::{AlertEvent, AlertStatus, SessionState};
pub use summary::{OperatorMetadata, SessionSummary};
