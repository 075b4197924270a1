use eframe::egui;

use crate::app::app_core::MonitorApp;
use crate::app::handlers::MonitoringHandler;

pub fn render_setup_panel(app: &mut MonitorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(egui::RichText::new("Lathe vibration analysis").size(32.0).strong());
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("Fill in every field to complete the lathe status report")
                    .size(18.0),
            );
        });
        ui.add_space(20.0);

        let metadata = &mut app.state.metadata;
        egui::Grid::new("operator_form")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                let fields: [(&str, &mut String, &str); 6] = [
                    ("Name", &mut metadata.name, "Name..."),
                    ("Operation", &mut metadata.operation, "Operation..."),
                    ("Material", &mut metadata.material, "Material..."),
                    ("Date", &mut metadata.date, "Date..."),
                    ("Tool", &mut metadata.tool, "Tool..."),
                    ("Cutting speed", &mut metadata.cutting_speed, "Cutting speed..."),
                ];
                for (label, value, hint) in fields {
                    ui.label(label);
                    ui.add(
                        egui::TextEdit::singleline(value)
                            .hint_text(hint)
                            .desired_width(400.0),
                    );
                    ui.end_row();
                }
            });

        ui.add_space(10.0);
        let missing = app.state.metadata.missing_fields();
        if !missing.is_empty() {
            ui.colored_label(
                egui::Color32::from_rgb(200, 120, 0),
                format!("Missing: {}", missing.join(", ")),
            );
        }

        if !app.state.monitoring.source_status.is_empty() && !app.state.is_monitoring() {
            ui.label(&app.state.monitoring.source_status);
        }

        ui.add_space(20.0);
        let start = egui::Button::new(egui::RichText::new("Start vibration monitoring").size(22.0))
            .fill(egui::Color32::from_rgb(50, 180, 50))
            .min_size(egui::vec2(360.0, 50.0));
        if ui.add(start).clicked() {
            MonitoringHandler::start(app);
        }
    });
}
