use eframe::egui;

use crate::app::app_core::MonitorApp;
use crate::app::handlers::ExportHandler;
use crate::app::state::ExportStatus;

pub fn render_summary_panel(app: &mut MonitorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading(egui::RichText::new("Measurement summary").size(28.0).strong());
        ui.add_space(15.0);

        match &app.state.summary.summary {
            Some(summary) => {
                ui.label(egui::RichText::new(summary.to_string()).size(18.0));
            }
            None => {
                ui.colored_label(egui::Color32::GRAY, "No summary available");
            }
        }

        ui.add_space(15.0);
        match &app.state.summary.export_status {
            Some(ExportStatus::Saved(path)) => {
                ui.colored_label(
                    egui::Color32::from_rgb(0, 150, 100),
                    format!("File {} saved successfully.", path.display()),
                );
            }
            Some(ExportStatus::Failed(message)) => {
                ui.colored_label(
                    egui::Color32::from_rgb(200, 0, 0),
                    format!("Could not save the file:\n{}", message),
                );
            }
            None => {}
        }

        ui.add_space(15.0);
        ui.horizontal(|ui| {
            let export = egui::Button::new(egui::RichText::new("📤 Export to TXT").size(20.0))
                .fill(egui::Color32::from_rgb(50, 130, 230));
            if ui.add(export).clicked() {
                ExportHandler::export_summary(app);
            }

            let back = egui::Button::new(egui::RichText::new("Back to start").size(20.0))
                .fill(egui::Color32::from_rgb(50, 180, 50));
            if ui.add(back).clicked() {
                ExportHandler::back_to_setup(app);
            }
        });
    });
}
