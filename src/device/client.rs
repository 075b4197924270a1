use std::io::{self, ErrorKind, Read};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info};

use super::parser::LineFramer;
use crate::types::Reading;

const READ_CHUNK_BYTES: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("no socket address found for {0}")]
    NoAddress(String),
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to configure connection: {0}")]
    Configure(#[from] io::Error),
}

/// Outcome of one blocking read from the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadOutcome {
    Reading(Reading),
    /// Nothing arrived within the read timeout. Retry.
    Timeout,
    /// The device closed the stream or the socket was shut down.
    Closed,
}

/// TCP connection to the accelerometer.
#[derive(Debug)]
pub struct DeviceClient {
    stream: TcpStream,
    peer: SocketAddr,
    framer: LineFramer,
    buf: [u8; READ_CHUNK_BYTES],
}

impl DeviceClient {
    /// Connects with a bounded connect timeout and sets the read timeout so a
    /// stalled device never blocks a read forever.
    pub fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, DeviceError> {
        let address = format!("{}:{}", host, port);
        let candidates: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| DeviceError::Resolve {
                address: address.clone(),
                source,
            })?
            .collect();

        let mut last_error = None;
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(read_timeout))?;
                    stream.set_nodelay(true)?;
                    info!("Connected to device at {}", candidate);
                    return Ok(Self {
                        stream,
                        peer: candidate,
                        framer: LineFramer::new(),
                        buf: [0; READ_CHUNK_BYTES],
                    });
                }
                Err(e) => {
                    debug!("Connection attempt to {} failed: {}", candidate, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(source) => Err(DeviceError::Connect { address, source }),
            None => Err(DeviceError::NoAddress(address)),
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// A second handle on the socket, used to unblock a pending read from
    /// another thread via [`Shutdown`].
    pub fn shutdown_handle(&self) -> io::Result<TcpStream> {
        self.stream.try_clone()
    }

    /// Blocks until a well-formed reading arrives, the read times out or the
    /// stream ends. Malformed payloads are skipped.
    pub fn read_next(&mut self) -> ReadOutcome {
        loop {
            if let Some(reading) = self.framer.next_reading() {
                return ReadOutcome::Reading(reading);
            }

            match self.stream.read(&mut self.buf) {
                Ok(0) => return ReadOutcome::Closed,
                Ok(n) => self.framer.push(&self.buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    let outcome = outcome_for_error(e.kind());
                    debug!("Device read error ({:?}): {}", outcome, e);
                    return outcome;
                }
            }
        }
    }

    pub fn close(&self) {
        // 对端可能已经断开，忽略错误
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Read errors are retried; only a socket that is no longer connected ends
/// the stream. A reset peer reads as end of stream on the next attempt.
fn outcome_for_error(kind: ErrorKind) -> ReadOutcome {
    match kind {
        ErrorKind::NotConnected | ErrorKind::UnexpectedEof => ReadOutcome::Closed,
        _ => ReadOutcome::Timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn reads_lines_and_reports_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            socket.write_all(b"0.1,0.2,-9.8\nbad\n0.3,0.4,-9.7\n").unwrap();
        });

        let mut client = DeviceClient::connect(
            "127.0.0.1",
            port,
            Duration::from_secs(1),
            Duration::from_secs(2),
        )
        .unwrap();
        server.join().unwrap();

        assert_eq!(client.read_next(), ReadOutcome::Reading(Reading::new(0.1, 0.2, -9.8)));
        assert_eq!(client.read_next(), ReadOutcome::Reading(Reading::new(0.3, 0.4, -9.7)));
        assert_eq!(client.read_next(), ReadOutcome::Closed);
    }

    #[test]
    fn stalled_device_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut client = DeviceClient::connect(
            "127.0.0.1",
            port,
            Duration::from_secs(1),
            Duration::from_millis(50),
        )
        .unwrap();
        let (_socket, _) = listener.accept().unwrap();

        assert_eq!(client.read_next(), ReadOutcome::Timeout);
    }

    #[test]
    fn transient_read_errors_are_retried() {
        for kind in [
            ErrorKind::WouldBlock,
            ErrorKind::TimedOut,
            ErrorKind::ConnectionReset,
            ErrorKind::ConnectionAborted,
            ErrorKind::BrokenPipe,
        ] {
            assert_eq!(outcome_for_error(kind), ReadOutcome::Timeout, "{:?}", kind);
        }
        assert_eq!(outcome_for_error(ErrorKind::NotConnected), ReadOutcome::Closed);
        assert_eq!(outcome_for_error(ErrorKind::UnexpectedEof), ReadOutcome::Closed);
    }

    #[test]
    fn refused_connection_is_an_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = DeviceClient::connect(
            "127.0.0.1",
            port,
            Duration::from_millis(200),
            Duration::from_millis(200),
        );
        assert!(matches!(result, Err(DeviceError::Connect { .. })));
    }
}
