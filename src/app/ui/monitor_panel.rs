use eframe::egui;

use crate::app::app_core::MonitorApp;
use crate::app::handlers::MonitoringHandler;
use crate::plotter::VibrationPlot;

pub fn render_monitor_panel(app: &mut MonitorApp, ctx: &egui::Context) {
    // 每次刷新都从会话复制一份快照
    let snapshot = app.session.snapshot();
    let window = app.config.get_config().monitor.max_points;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading(egui::RichText::new("Real-time vibration monitoring").size(28.0).strong());
        ui.add_space(10.0);

        VibrationPlot::ui(ui, &snapshot, &app.config.get_config().plot, window);

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("Alerts detected: {}", snapshot.alert_count))
                    .size(20.0)
                    .color(egui::Color32::from_rgb(200, 160, 0)),
            );
            ui.separator();
            match snapshot.latest() {
                Some(sample) => ui.monospace(format!(
                    "#{:<6} x={:+.3} y={:+.3} z={:+.3}",
                    sample.timestamp, sample.x, sample.y, sample.z
                )),
                None => ui.label("waiting for data..."),
            };
        });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let back = egui::Button::new(egui::RichText::new("Back").size(20.0))
                .fill(egui::Color32::from_rgb(230, 50, 50));
            if ui.add(back).clicked() {
                MonitoringHandler::stop_and_go_back(app);
            }

            if ui.button(egui::RichText::new("Stop and summarize").size(20.0)).clicked() {
                MonitoringHandler::stop_and_summarize(app);
            }
        });
    });
}
