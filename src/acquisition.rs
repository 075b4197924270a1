//! Producer side of monitoring: one background thread that reads the device
//! (or generates synthetic data when the device is unreachable) and feeds the
//! shared [`MonitorSession`].

use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, tick, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::device::{DeviceClient, ReadOutcome, SyntheticGenerator};
use crate::monitor::{MonitorSession, RunId, SessionError};
use crate::types::{AlertEvent, Reading};

/// Where the readings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Device(SocketAddr),
    Synthetic,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionEvent {
    Connected { address: SocketAddr },
    SyntheticFallback { reason: String },
    Alert(AlertEvent),
    /// The device ended the stream; no more readings will arrive.
    DeviceClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The worker exited and was joined.
    Joined,
    /// The worker did not exit within the shutdown timeout and was detached.
    /// The session rejects its samples, including after a restart.
    TimedOut,
}

/// Handle on a running producer thread.
///
/// Dropping the handle stops the worker the same way [`stop`](Self::stop)
/// does.
#[derive(Debug)]
pub struct Acquisition {
    mode: SourceMode,
    session: Arc<MonitorSession>,
    run: RunId,
    shutdown: Arc<AtomicBool>,
    socket: Option<TcpStream>,
    finished: Receiver<()>,
    handle: Option<JoinHandle<()>>,
    shutdown_timeout: Duration,
}

impl Acquisition {
    /// Starts the session and the producer.
    ///
    /// Tries the device first; if it cannot be reached the worker generates
    /// synthetic readings instead. Fails with [`io::ErrorKind::AlreadyExists`]
    /// if the session already has a producer, or if the thread cannot be
    /// spawned.
    pub fn start(
        session: Arc<MonitorSession>,
        config: &AppConfig,
        events: Sender<AcquisitionEvent>,
    ) -> io::Result<Self> {
        let Some(run) = session.start_run() else {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "monitoring session is already running",
            ));
        };

        let shutdown = Arc::new(AtomicBool::new(false));
        // 线程退出时 Sender 被丢弃，stop() 据此判断线程是否已结束
        let (exit_tx, finished) = bounded::<()>(1);

        let device = &config.device;
        let spawned = match DeviceClient::connect(
            &device.host,
            device.port,
            device.connect_timeout(),
            device.read_timeout(),
        ) {
            Ok(client) => {
                let address = client.peer();
                let socket = match client.shutdown_handle() {
                    Ok(socket) => Some(socket),
                    Err(e) => {
                        warn!("Could not clone device socket, stop will wait for a read timeout: {}", e);
                        None
                    }
                };
                let _ = events.send(AcquisitionEvent::Connected { address });

                let worker_session = Arc::clone(&session);
                let worker_shutdown = Arc::clone(&shutdown);
                thread::Builder::new()
                    .name("device-reader".to_string())
                    .spawn(move || {
                        let _exit = exit_tx;
                        run_device_reader(client, worker_session, run, worker_shutdown, events);
                    })
                    .map(|handle| (SourceMode::Device(address), socket, handle))
            }
            Err(e) => {
                warn!("Device at {} unavailable, using synthetic data: {}", device.address(), e);
                let _ = events.send(AcquisitionEvent::SyntheticFallback {
                    reason: e.to_string(),
                });

                let generator = SyntheticGenerator::new(config.synthetic.clone());
                let interval = config.synthetic.interval();
                let worker_session = Arc::clone(&session);
                let worker_shutdown = Arc::clone(&shutdown);
                thread::Builder::new()
                    .name("synthetic-source".to_string())
                    .spawn(move || {
                        let _exit = exit_tx;
                        run_synthetic(generator, interval, worker_session, run, worker_shutdown, events);
                    })
                    .map(|handle| (SourceMode::Synthetic, None, handle))
            }
        };

        let (mode, socket, handle) = match spawned {
            Ok(parts) => parts,
            Err(e) => {
                error!("Failed to spawn acquisition thread: {}", e);
                session.stop_run(run);
                return Err(e);
            }
        };

        Ok(Self {
            mode,
            session,
            run,
            shutdown,
            socket,
            finished,
            handle: Some(handle),
            shutdown_timeout: device.shutdown_timeout(),
        })
    }

    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stops the session and the worker.
    ///
    /// Signals the worker, shuts the socket down so a blocked read returns,
    /// then waits up to the configured shutdown timeout for the thread.
    pub fn stop(mut self) -> StopOutcome {
        self.shutdown_worker()
    }

    fn shutdown_worker(&mut self) -> StopOutcome {
        self.shutdown.store(true, Ordering::Relaxed);
        self.session.stop_run(self.run);

        if let Some(socket) = self.socket.take() {
            // 让阻塞中的 read 立即返回
            let _ = socket.shutdown(Shutdown::Both);
        }

        let Some(handle) = self.handle.take() else {
            return StopOutcome::Joined;
        };

        match self.finished.recv_timeout(self.shutdown_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    error!("Acquisition thread panicked");
                }
                info!("Acquisition thread shut down gracefully");
                StopOutcome::Joined
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Acquisition thread did not exit within {:?}, detaching it",
                    self.shutdown_timeout
                );
                StopOutcome::TimedOut
            }
        }
    }
}

impl Drop for Acquisition {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown_worker();
        }
    }
}

/// Pushes one reading into the session. Returns `false` when the worker
/// should exit.
fn forward(
    session: &MonitorSession,
    run: RunId,
    events: &Sender<AcquisitionEvent>,
    reading: Reading,
) -> bool {
    match session.record_for(run, reading) {
        Ok(Some(alert)) => {
            if events.send(AcquisitionEvent::Alert(alert)).is_err() {
                info!("Event channel disconnected, acquisition thread exiting");
                return false;
            }
            true
        }
        Ok(None) => true,
        Err(SessionError::NotRunning) => {
            debug!("Session no longer running, acquisition thread exiting");
            false
        }
    }
}

fn run_device_reader(
    mut client: DeviceClient,
    session: Arc<MonitorSession>,
    run: RunId,
    shutdown: Arc<AtomicBool>,
    events: Sender<AcquisitionEvent>,
) {
    while !shutdown.load(Ordering::Relaxed) {
        let outcome = client.read_next();
        // read_next 可能阻塞到 stop() 之后
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        match outcome {
            ReadOutcome::Reading(reading) => {
                if !forward(&session, run, &events, reading) {
                    break;
                }
            }
            ReadOutcome::Timeout => {
                debug!("No data from device within read timeout, retrying");
            }
            ReadOutcome::Closed => {
                warn!("Device at {} closed the connection", client.peer());
                let _ = events.send(AcquisitionEvent::DeviceClosed);
                break;
            }
        }
    }
    client.close();
}

fn run_synthetic(
    mut generator: SyntheticGenerator,
    interval: Duration,
    session: Arc<MonitorSession>,
    run: RunId,
    shutdown: Arc<AtomicBool>,
    events: Sender<AcquisitionEvent>,
) {
    let ticker = tick(interval);
    while !shutdown.load(Ordering::Relaxed) {
        if ticker.recv().is_err() {
            break;
        }
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        if !forward(&session, run, &events, generator.generate()) {
            break;
        }
    }
}
