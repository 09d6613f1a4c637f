//! gpsd client
//!
//! Reads a single fix from a gpsd daemon using its JSON watch protocol.
//! Only `TPV` reports are considered; everything else on the stream is
//! skipped.

use futures::future::LocalBoxFuture;
use gtk4::gio;
use gtk4::gio::prelude::*;
use log::debug;
use serde::Deserialize;
use std::cell::RefCell;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use super::{
    Coordinates, GeolocationService, Position, PositionError, PositionErrorCode, PositionOptions,
};

pub const DEFAULT_GPSD_ADDR: &str = "127.0.0.1:2947";

const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Upper bound on a single blocking read so cancellation is noticed quickly
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub enum GpsdError {
    Resolve(String),
    Connect(std::io::Error),
    Io(std::io::Error),
    Closed,
    Timeout(Duration),
    Cancelled,
}

impl std::fmt::Display for GpsdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpsdError::Resolve(addr) => write!(f, "Cannot resolve gpsd address '{}'", addr),
            GpsdError::Connect(e) => write!(f, "Cannot connect to gpsd: {}", e),
            GpsdError::Io(e) => write!(f, "gpsd connection error: {}", e),
            GpsdError::Closed => write!(f, "gpsd closed the connection"),
            GpsdError::Timeout(after) => write!(f, "No fix within {} ms", after.as_millis()),
            GpsdError::Cancelled => write!(f, "Position request cancelled"),
        }
    }
}

impl std::error::Error for GpsdError {}

impl From<GpsdError> for PositionError {
    fn from(err: GpsdError) -> Self {
        let code = match &err {
            GpsdError::Connect(e) if e.kind() == ErrorKind::PermissionDenied => {
                PositionErrorCode::PermissionDenied
            }
            GpsdError::Timeout(_) => PositionErrorCode::Timeout,
            GpsdError::Cancelled => PositionErrorCode::Cancelled,
            _ => PositionErrorCode::PositionUnavailable,
        };
        PositionError::new(code, err.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "class")]
enum Report {
    #[serde(rename = "TPV")]
    Tpv(TpvReport),
    #[serde(other)]
    Other,
}

/// Time-position-velocity report. `mode` is 0/1 without a fix, 2 for a 2D
/// fix and 3 for a 3D fix.
#[derive(Debug, Deserialize)]
struct TpvReport {
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(rename = "altMSL")]
    alt_msl: Option<f64>,
    alt: Option<f64>,
    eph: Option<f64>,
}

impl TpvReport {
    fn to_position(&self, high_accuracy: bool) -> Option<Position> {
        let required_mode = if high_accuracy { 3 } else { 2 };
        if self.mode < required_mode {
            return None;
        }

        let altitude = if self.mode >= 3 {
            self.alt_msl.or(self.alt)
        } else {
            None
        };

        Some(Position {
            coords: Coordinates::new(self.lat?, self.lon?),
            altitude,
            accuracy: self.eph,
        })
    }
}

/// Parse one line of gpsd output, returning a position if it is an
/// acceptable fix.
pub fn parse_fix(line: &str, high_accuracy: bool) -> Option<Position> {
    match serde_json::from_str::<Report>(line) {
        Ok(Report::Tpv(tpv)) => tpv.to_position(high_accuracy),
        Ok(Report::Other) => None,
        Err(e) => {
            debug!("Skipping unparseable gpsd line: {}", e);
            None
        }
    }
}

fn resolve(addr: &str) -> Result<SocketAddr, GpsdError> {
    addr.to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| GpsdError::Resolve(addr.to_string()))
}

/// Blocking read of the first acceptable fix
pub fn read_fix(
    addr: &str,
    high_accuracy: bool,
    timeout: Duration,
    cancellable: &gio::Cancellable,
) -> Result<Position, GpsdError> {
    let deadline = Instant::now() + timeout;
    let socket_addr = resolve(addr)?;

    let mut stream = TcpStream::connect_timeout(&socket_addr, timeout).map_err(|e| {
        if e.kind() == ErrorKind::TimedOut {
            GpsdError::Timeout(timeout)
        } else {
            GpsdError::Connect(e)
        }
    })?;
    stream.write_all(WATCH_COMMAND).map_err(GpsdError::Io)?;

    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();

    loop {
        if cancellable.is_cancelled() {
            return Err(GpsdError::Cancelled);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(GpsdError::Timeout(timeout));
        }
        reader
            .get_ref()
            .set_read_timeout(Some((deadline - now).min(POLL_INTERVAL)))
            .map_err(GpsdError::Io)?;

        // A timed-out read keeps the partial line in `line`
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return Err(GpsdError::Closed),
            Ok(_) if line.ends_with(b"\n") => {
                let text = String::from_utf8_lossy(&line);
                if let Some(position) = parse_fix(text.trim(), high_accuracy) {
                    return Ok(position);
                }
                line.clear();
            }
            Ok(_) => {}
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => return Err(GpsdError::Io(e)),
        }
    }
}

/// Geolocation service backed by a gpsd daemon
pub struct GpsdLocator {
    addr: String,
    last_fix: RefCell<Option<(Position, Instant)>>,
}

impl GpsdLocator {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            last_fix: RefCell::new(None),
        }
    }

    fn cached_fix(&self, maximum_age: Duration) -> Option<Position> {
        let last_fix = self.last_fix.borrow();
        let (position, read_at) = last_fix.as_ref()?;
        (read_at.elapsed() <= maximum_age).then_some(*position)
    }
}

impl GeolocationService for GpsdLocator {
    fn current_position(
        &self,
        options: PositionOptions,
        cancellable: gio::Cancellable,
    ) -> LocalBoxFuture<'_, Result<Position, PositionError>> {
        Box::pin(async move {
            if let Some(position) = self.cached_fix(options.maximum_age) {
                debug!("Reusing cached fix {:?}", position.coords);
                return Ok(position);
            }

            let addr = self.addr.clone();
            let result = gio::spawn_blocking(move || {
                read_fix(
                    &addr,
                    options.enable_high_accuracy,
                    options.timeout,
                    &cancellable,
                )
            })
            .await
            .map_err(|_| {
                PositionError::new(
                    PositionErrorCode::PositionUnavailable,
                    "gpsd reader thread panicked",
                )
            })?;

            let position = result?;
            *self.last_fix.borrow_mut() = Some((position, Instant::now()));
            Ok(position)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    const TPV_3D: &str = r#"{"class":"TPV","device":"/dev/ttyACM0","mode":3,"time":"2023-06-15T09:05:00.000Z","lat":-3.316694,"lon":114.590111,"altMSL":12.5,"alt":14.1,"eph":4.2}"#;
    const TPV_2D: &str = r#"{"class":"TPV","device":"/dev/ttyACM0","mode":2,"lat":-3.3167,"lon":114.5901}"#;

    fn serve(lines: &'static [&'static str]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                for line in lines {
                    let _ = stream.write_all(line.as_bytes());
                    let _ = stream.write_all(b"\n");
                }
                thread::sleep(Duration::from_millis(500));
            }
        });
        addr
    }

    #[test]
    fn test_parse_fix_3d() {
        let position = parse_fix(TPV_3D, true).unwrap();
        assert_eq!(position.coords, Coordinates::new(-3.316694, 114.590111));
        assert_eq!(position.altitude, Some(12.5));
        assert_eq!(position.accuracy, Some(4.2));
    }

    #[test]
    fn test_parse_fix_respects_accuracy_mode() {
        assert!(parse_fix(TPV_2D, true).is_none());

        let position = parse_fix(TPV_2D, false).unwrap();
        assert_eq!(position.coords.latitude, -3.3167);
        assert_eq!(position.altitude, None);
    }

    #[test]
    fn test_parse_fix_skips_other_reports() {
        assert!(parse_fix(r#"{"class":"VERSION","release":"3.25"}"#, false).is_none());
        assert!(parse_fix(r#"{"class":"SKY","satellites":[]}"#, false).is_none());
        assert!(parse_fix(r#"{"class":"TPV","mode":1}"#, false).is_none());
        assert!(parse_fix("garbage", false).is_none());
    }

    #[test]
    fn test_read_fix_from_stream() {
        let addr = serve(&[
            r#"{"class":"VERSION","release":"3.25","proto_major":3,"proto_minor":15}"#,
            r#"{"class":"DEVICES","devices":[]}"#,
            TPV_2D,
            TPV_3D,
        ]);

        let cancellable = gio::Cancellable::new();
        let position = read_fix(&addr, true, Duration::from_secs(5), &cancellable).unwrap();
        assert_eq!(position.coords, Coordinates::new(-3.316694, 114.590111));
    }

    #[test]
    fn test_read_fix_times_out_without_fix() {
        let addr = serve(&[r#"{"class":"TPV","mode":1}"#]);

        let cancellable = gio::Cancellable::new();
        let err = read_fix(&addr, true, Duration::from_millis(300), &cancellable).unwrap_err();
        assert!(matches!(err, GpsdError::Timeout(_)));
        assert_eq!(PositionError::from(err).code, PositionErrorCode::Timeout);
    }

    #[test]
    fn test_read_fix_cancelled() {
        let addr = serve(&[]);

        let cancellable = gio::Cancellable::new();
        cancellable.cancel();
        let err = read_fix(&addr, true, Duration::from_secs(5), &cancellable).unwrap_err();
        assert_eq!(PositionError::from(err).code, PositionErrorCode::Cancelled);
    }

    #[test]
    fn test_unreachable_daemon_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let cancellable = gio::Cancellable::new();
        let err = read_fix(&addr, true, Duration::from_secs(1), &cancellable).unwrap_err();
        assert_eq!(
            PositionError::from(err).code,
            PositionErrorCode::PositionUnavailable
        );
    }
}
