use std::sync::Arc;

use lathe_watch::Acquisition;
use log::{error, info};

use crate::app::app_core::MonitorApp;
use crate::app::state::Screen;

pub struct MonitoringHandler;

impl MonitoringHandler {
    pub fn start(app: &mut MonitorApp) {
        if app.state.is_monitoring() {
            return;
        }

        app.state.discard_stale_events();
        app.state.monitoring.pending_alert = None;
        app.state.monitoring.source_status = "Connecting...".to_string();

        match Acquisition::start(
            Arc::clone(&app.session),
            app.config.get_config(),
            app.state.events.sender.clone(),
        ) {
            Ok(acquisition) => {
                info!("Monitoring started ({:?})", acquisition.mode());
                app.state.monitoring.acquisition = Some(acquisition);
                app.state.screen = Screen::Monitoring;
            }
            Err(e) => {
                error!("Failed to start monitoring: {}", e);
                app.state.monitoring.source_status = format!("Failed to start monitoring: {}", e);
            }
        }
    }

    fn stop_acquisition(app: &mut MonitorApp) {
        if let Some(acquisition) = app.state.monitoring.acquisition.take() {
            acquisition.stop();
        }
        app.session.stop();
        app.state.monitoring.pending_alert = None;
    }

    /// Operator left the monitoring screen without asking for a report.
    pub fn stop_and_go_back(app: &mut MonitorApp) {
        Self::stop_acquisition(app);
        app.state.screen = Screen::Setup;
    }

    /// Operator stopped without an alert but wants the summary anyway.
    pub fn stop_and_summarize(app: &mut MonitorApp) {
        Self::stop_acquisition(app);
        let summary = app.session.summarize(app.state.metadata.clone());
        Self::show_summary(app, summary);
    }

    /// "Continue" on the alert dialog.
    pub fn continue_after_alert(app: &mut MonitorApp) {
        app.session.acknowledge_and_continue();
        app.state.monitoring.pending_alert = None;
    }

    /// "Stop measurement" on the alert dialog.
    pub fn stop_after_alert(app: &mut MonitorApp) {
        let summary = app.session.acknowledge_and_stop(app.state.metadata.clone());
        Self::stop_acquisition(app);
        Self::show_summary(app, summary);
    }

    fn show_summary(app: &mut MonitorApp, summary: lathe_watch::SessionSummary) {
        info!("Session finished with {} alerts", summary.alert_count);
        app.state.summary.summary = Some(summary);
        app.state.summary.export_status = None;
        app.state.screen = Screen::Summary;
    }
}
