use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};
use lathe_watch::config::PlotConfig;
use lathe_watch::monitor::RollingSeries;
use lathe_watch::SessionSnapshot;

/// 格式化数字为固定宽度的 y 轴标签
fn format_fixed_width_y_label(value: f64) -> String {
    if value.abs() >= 10.0 {
        format!("{:-6.1}", value)
    } else {
        format!("{:-6.2}", value)
    }
}

fn color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Live chart of the three acceleration axes.
pub struct VibrationPlot;

impl VibrationPlot {
    /// Vertical bounds covering every axis, with 5% padding.
    pub fn y_bounds(snapshot: &SessionSnapshot) -> (f64, f64) {
        let (y_min, y_max) = [&snapshot.x, &snapshot.y, &snapshot.z]
            .into_iter()
            .filter_map(RollingSeries::value_range)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (lo, hi)| {
                (min.min(lo), max.max(hi))
            });

        if !y_min.is_finite() || !y_max.is_finite() {
            return (-2.0, 2.0);
        }

        let range = (y_max - y_min).max(0.1);
        (y_min - range * 0.05, y_max + range * 0.05)
    }

    pub fn ui(ui: &mut egui::Ui, snapshot: &SessionSnapshot, config: &PlotConfig, window: usize) {
        let (x_min, x_max) = snapshot.x_bounds(window);
        let (y_min, y_max) = Self::y_bounds(snapshot);

        Plot::new("vibration_plot")
            .height(config.plot_height)
            .legend(Legend::default())
            .x_axis_label("Time (samples)")
            .y_axis_label("Acceleration (g)")
            .y_axis_formatter(|v, _| format_fixed_width_y_label(v.value))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));

                let axes = [
                    ("ACC X", &snapshot.x, config.colors.x_axis),
                    ("ACC Y", &snapshot.y, config.colors.y_axis),
                    ("ACC Z", &snapshot.z, config.colors.z_axis),
                ];
                for (name, series, rgb) in axes {
                    if series.is_empty() {
                        continue;
                    }
                    plot_ui.line(
                        Line::new(name, PlotPoints::from(series.plot_points()))
                            .color(color(rgb))
                            .width(1.5),
                    );
                }
            });
    }
}
