use lathe_watch::report;

use crate::app::app_core::MonitorApp;
use crate::app::state::{ExportStatus, Screen};

pub struct ExportHandler;

impl ExportHandler {
    pub fn export_summary(app: &mut MonitorApp) {
        let Some(summary) = &app.state.summary.summary else {
            app.state.summary.export_status = Some(ExportStatus::Failed("No summary to export".to_string()));
            return;
        };

        let path = app.config.get_config().report_path();
        app.state.summary.export_status = Some(match report::export_summary(summary, &path) {
            Ok(path) => ExportStatus::Saved(path),
            Err(e) => ExportStatus::Failed(e.to_string()),
        });
    }

    pub fn back_to_setup(app: &mut MonitorApp) {
        app.state.summary.export_status = None;
        app.state.screen = Screen::Setup;
    }
}
