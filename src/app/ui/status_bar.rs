use eframe::egui;
use lathe_watch::SessionState;

use crate::app::app_core::MonitorApp;

pub fn render_status_bar(app: &mut MonitorApp, ctx: &egui::Context) {
    let snapshot_state = app.session.state();
    let alert_count = app.session.alert_count();

    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Status:");

                let status_color = match snapshot_state {
                    SessionState::Idle => egui::Color32::from_rgb(150, 0, 0),            // 红色
                    SessionState::Running => egui::Color32::from_rgb(0, 150, 0),         // 绿色
                    SessionState::AlertPending => egui::Color32::from_rgb(255, 165, 0),  // 橙色
                };
                ui.colored_label(status_color, snapshot_state.label());

                ui.separator();

                if app.state.monitoring.source_status.is_empty() {
                    ui.label(format!("Device: {}", app.config.get_config().device.address()));
                } else {
                    ui.label(&app.state.monitoring.source_status);
                }

                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(200, 160, 0),
                    format!("Alerts detected: {}", alert_count),
                );
            });
            ui.add_space(5.0);
        });
}
