pub mod export;
pub mod monitoring;

pub use export::ExportHandler;
pub use monitoring::MonitoringHandler;
