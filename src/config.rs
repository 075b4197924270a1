use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use crate::monitor::{AlertThresholds, MAX_POINTS};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lathe_watch.toml";

/// Application configuration.
///
/// Every section has defaults, so a partial (or missing) file is fine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub device: DeviceConfig,
    pub synthetic: SyntheticConfig,
    pub monitor: MonitorConfig,
    pub plot: PlotConfig,
    pub report: ReportConfig,
}

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// How often the chart is redrawn from a fresh snapshot.
    pub refresh_interval_ms: u64,
}

/// Accelerometer connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Upper bound on waiting for the reader thread when stopping.
    pub shutdown_timeout_ms: u64,
}

/// Fallback generator used when the device is unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub interval_ms: u64,
    pub xy_min: f64,
    pub xy_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub max_points: usize,
    pub thresholds: AlertThresholds,
}

/// 绘图配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub plot_height: f32,
    pub colors: PlotColors,
}

/// 绘图颜色配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotColors {
    pub x_axis: [u8; 3],
    pub y_axis: [u8; 3],
    pub z_axis: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 760.0,
            title: "LatheWatch - Vibration Monitor".to_string(),
            refresh_interval_ms: 100,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 12345,
            connect_timeout_ms: 1000,
            read_timeout_ms: 1000,
            shutdown_timeout_ms: 1000,
        }
    }
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            interval_ms: 50,
            xy_min: -2.0,
            xy_max: 2.0,
            z_min: -9.5,
            z_max: -9.0,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_points: MAX_POINTS,
            thresholds: AlertThresholds::default(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            plot_height: 420.0,
            colors: PlotColors::default(),
        }
    }
}

impl Default for PlotColors {
    fn default() -> Self {
        Self {
            x_axis: [255, 0, 0],    // 红色
            y_axis: [0, 170, 0],    // 绿色
            z_axis: [0, 0, 255],    // 蓝色
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "resumen_vibracion.txt".to_string(),
        }
    }
}

impl DeviceConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl SyntheticConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// Applies `LATHE_DEVICE_HOST` / `LATHE_DEVICE_PORT`, reading `.env` first.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        dotenv::dotenv().ok();

        if let Ok(host) = env::var("LATHE_DEVICE_HOST") {
            self.device.host = host;
        }
        if let Ok(port) = env::var("LATHE_DEVICE_PORT") {
            self.device.port = port.parse::<u16>().map_err(|e| {
                ConfigError::ValidationError(format!("LATHE_DEVICE_PORT '{}': {}", port, e))
            })?;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.window.refresh_interval_ms == 0 {
            return Err(ConfigError::ValidationError("Refresh interval must be positive".to_string()));
        }

        if self.device.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("Device host must not be empty".to_string()));
        }

        if self.device.connect_timeout_ms == 0 || self.device.read_timeout_ms == 0 {
            return Err(ConfigError::ValidationError("Device timeouts must be positive".to_string()));
        }

        if self.synthetic.interval_ms == 0 {
            return Err(ConfigError::ValidationError("Synthetic interval must be positive".to_string()));
        }

        if self.synthetic.xy_min > self.synthetic.xy_max || self.synthetic.z_min > self.synthetic.z_max {
            return Err(ConfigError::ValidationError("Synthetic ranges must have min <= max".to_string()));
        }

        if self.monitor.max_points == 0 {
            return Err(ConfigError::ValidationError("Max points must be positive".to_string()));
        }

        let t = &self.monitor.thresholds;
        if t.x_max <= 0.0 || t.y_max <= 0.0 || t.z_offset_max <= 0.0 {
            return Err(ConfigError::ValidationError("Alert thresholds must be positive".to_string()));
        }

        if self.report.output_path.trim().is_empty() {
            return Err(ConfigError::ValidationError("Report output path must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(&self.report.output_path)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
#[derive(Debug, Default)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new() -> Self {
        Self::default()
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Loads `path` when it exists, otherwise falls back to defaults. Env
    /// overrides apply either way; an invalid result falls back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut manager = if path.exists() {
            match Self::load_from_file(path) {
                Ok(manager) => {
                    info!("Loaded configuration from {}", path.display());
                    manager
                }
                Err(e) => {
                    warn!("Ignoring configuration {}: {}", path.display(), e);
                    Self::new()
                }
            }
        } else {
            info!("No configuration at {}, using defaults", path.display());
            Self::new()
        };

        if let Err(e) = manager.config.apply_env_overrides() {
            warn!("Ignoring environment override: {}", e);
        }
        if let Err(e) = manager.config.validate() {
            warn!("Invalid configuration, using defaults: {}", e);
            manager.config = AppConfig::default();
        }
        manager
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.address(), "127.0.0.1:12345");
        assert_eq!(config.synthetic.interval(), Duration::from_millis(50));
        assert_eq!(config.monitor.max_points, 100);
        assert_eq!(config.monitor.thresholds.z_baseline, -9.8);
        assert_eq!(config.report_path(), PathBuf::from("resumen_vibracion.txt"));
    }

    #[test]
    fn partial_file_keeps_defaults_elsewhere() {
        let config: AppConfig = toml::from_str(
            r#"
            [device]
            host = "192.168.4.1"

            [monitor.thresholds]
            x_max = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.device.host, "192.168.4.1");
        assert_eq!(config.device.port, 12345);
        assert_eq!(config.monitor.thresholds.x_max, 2.0);
        assert_eq!(config.monitor.thresholds.y_max, 1.5);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let mut config = AppConfig::default();
        config.monitor.max_points = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = AppConfig::default();
        config.synthetic.z_min = -8.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.device.read_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lathe_watch.toml");

        let mut config = AppConfig::default();
        config.device.port = 4000;
        config.save_to_file(&path).unwrap();

        let manager = ConfigManager::load_from_file(&path).unwrap();
        assert_eq!(manager.get_config().device.port, 4000);
        assert_eq!(manager.config_path(), Some(path.as_path()));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::load_or_default(dir.path().join("absent.toml"));
        assert!(manager.config_path().is_none());
        assert_eq!(manager.get_config().monitor, MonitorConfig::default());
    }
}
