use eframe::egui;

use crate::app::app_core::MonitorApp;
use crate::app::handlers::MonitoringHandler;

pub fn render_alert_dialog(app: &mut MonitorApp, ctx: &egui::Context) {
    let Some(alert) = app.state.monitoring.pending_alert else {
        return;
    };

    egui::Window::new("Dangerous vibration alert!")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(420.0)
        .show(ctx, |ui| {
            ui.colored_label(
                egui::Color32::from_rgb(220, 0, 0),
                egui::RichText::new("High vibration levels detected. Check the lathe.").size(18.0),
            );
            ui.add_space(5.0);
            ui.monospace(format!(
                "sample #{}: x={:+.3} y={:+.3} z={:+.3}",
                alert.sample.timestamp, alert.sample.x, alert.sample.y, alert.sample.z
            ));
            ui.label(format!("Alert {} of this session", alert.alert_count));
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                let resume = egui::Button::new("Continue").fill(egui::Color32::from_rgb(0, 180, 0));
                if ui.add(resume).clicked() {
                    MonitoringHandler::continue_after_alert(app);
                }

                let stop = egui::Button::new("Stop measurement").fill(egui::Color32::from_rgb(180, 0, 0));
                if ui.add(stop).clicked() {
                    MonitoringHandler::stop_after_alert(app);
                }
            });
        });
}
