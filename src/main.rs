mod app;
mod plotter;

use eframe::egui;
use lathe_watch::config::{ConfigManager, DEFAULT_CONFIG_FILE};
use lathe_watch::logger;
use log::{error, info};

use app::MonitorApp;

fn main() {
    logger::init_logger();
    info!("Application starting");

    let config = ConfigManager::load_or_default(DEFAULT_CONFIG_FILE);
    match config.config_path() {
        Some(path) => info!("Using configuration from {}", path.display()),
        None => info!("Using default configuration"),
    }
    let window = config.get_config().window.clone();

    let options = eframe::NativeOptions {
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred, // 硬件加速优先模式
        renderer: eframe::Renderer::Glow,
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_resizable(true),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        &window.title,
        options,
        Box::new(|_cc| Ok(Box::new(MonitorApp::new(config)))),
    ) {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }

    info!("Application closed");
}
