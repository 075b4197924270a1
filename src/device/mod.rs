pub mod client;
pub mod parser;
pub mod synthetic;

pub use client::{DeviceClient, DeviceError, ReadOutcome};
pub use parser::{parse_reading, LineFramer};
pub use synthetic::SyntheticGenerator;
