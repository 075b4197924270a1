use lathe_watch::AcquisitionEvent;
use log::info;

use super::app_core::MonitorApp;

impl MonitorApp {
    pub fn handle_acquisition_events(&mut self) {
        while let Ok(event) = self.state.events.receiver.try_recv() {
            match event {
                AcquisitionEvent::Connected { address } => {
                    self.state.monitoring.source_status = format!("Device {}", address);
                }
                AcquisitionEvent::SyntheticFallback { reason } => {
                    self.state.monitoring.source_status = format!("Simulated data (device unavailable: {})", reason);
                }
                AcquisitionEvent::Alert(alert) => {
                    // 同一时间只有一个未确认的告警
                    if self.state.monitoring.pending_alert.is_none() {
                        self.state.monitoring.pending_alert = Some(alert);
                    }
                }
                AcquisitionEvent::DeviceClosed => {
                    info!("Device stream ended");
                    self.state.monitoring.source_status = "Device disconnected".to_string();
                }
            }
        }
    }
}
