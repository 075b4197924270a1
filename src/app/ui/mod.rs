pub mod alert_dialog;
pub mod monitor_panel;
pub mod setup_panel;
pub mod status_bar;
pub mod summary_panel;

pub use alert_dialog::render_alert_dialog;
pub use monitor_panel::render_monitor_panel;
pub use setup_panel::render_setup_panel;
pub use status_bar::render_status_bar;
pub use summary_panel::render_summary_panel;
