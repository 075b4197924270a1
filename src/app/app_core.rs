use std::sync::Arc;
use std::time::Duration;

use eframe::{egui, Frame};
use lathe_watch::config::ConfigManager;
use lathe_watch::MonitorSession;
use log::info;

use super::state::{AppState, Screen};

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct MonitorApp {
    // 统一的状态管理
    pub state: AppState,

    // 配置管理
    pub config: ConfigManager,

    /// Shared with the acquisition thread.
    pub session: Arc<MonitorSession>,
}

impl MonitorApp {
    pub fn new(config: ConfigManager) -> Self {
        let monitor = &config.get_config().monitor;
        let session = Arc::new(MonitorSession::new(monitor.max_points, monitor.thresholds));

        info!(
            "Ready. Device {}, alert limits x={} y={} z offset={}",
            config.get_config().device.address(),
            monitor.thresholds.x_max,
            monitor.thresholds.y_max,
            monitor.thresholds.z_offset_max
        );

        Self {
            state: AppState::new(EVENT_CHANNEL_CAPACITY),
            config,
            session,
        }
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 处理采集线程事件
        self.handle_acquisition_events();

        crate::app::ui::render_status_bar(self, ctx);
        match self.state.screen {
            Screen::Setup => crate::app::ui::render_setup_panel(self, ctx),
            Screen::Monitoring => {
                crate::app::ui::render_monitor_panel(self, ctx);
                crate::app::ui::render_alert_dialog(self, ctx);
            }
            Screen::Summary => crate::app::ui::render_summary_panel(self, ctx),
        }

        let refresh = self.config.get_config().window.refresh_interval_ms;
        ctx.request_repaint_after(Duration::from_millis(refresh));
    }
}

impl Drop for MonitorApp {
    fn drop(&mut self) {
        if let Some(acquisition) = self.state.monitoring.acquisition.take() {
            info!("Window closing, stopping acquisition");
            acquisition.stop();
        }
    }
}
