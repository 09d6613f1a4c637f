//! Geolocation service abstractions
//!
//! A single-fix position request with W3C-style options and error codes,
//! plus the gpsd client used on the desktop.

pub mod gpsd;

pub use gpsd::GpsdLocator;

use futures::future::LocalBoxFuture;
use gtk4::gio;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
    /// Altitude above mean sea level in metres, if the fix is 3D
    pub altitude: Option<f64>,
    /// Estimated horizontal error in metres
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// How long to wait for a fix before giving up
    pub timeout: Duration,
    /// Oldest cached fix that may be returned instead of a fresh one
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(15_000),
            maximum_age: Duration::from_millis(10_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Cancelled,
}

impl PositionErrorCode {
    /// Numeric code as reported by the W3C geolocation API. Cancellation has
    /// no W3C code.
    pub fn code(&self) -> Option<u16> {
        match self {
            PositionErrorCode::PermissionDenied => Some(1),
            PositionErrorCode::PositionUnavailable => Some(2),
            PositionErrorCode::Timeout => Some(3),
            PositionErrorCode::Cancelled => None,
        }
    }
}

impl std::fmt::Display for PositionErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionErrorCode::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            PositionErrorCode::PositionUnavailable => write!(f, "POSITION_UNAVAILABLE"),
            PositionErrorCode::Timeout => write!(f, "TIMEOUT"),
            PositionErrorCode::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl PositionError {
    pub fn new(code: PositionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == PositionErrorCode::Cancelled
    }
}

impl std::fmt::Display for PositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code.code() {
            Some(code) => write!(f, "{} ({}): {}", self.code, code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for PositionError {}

pub trait GeolocationService {
    /// Request one current-position fix. Cancelling `cancellable` ends the
    /// request with [`PositionErrorCode::Cancelled`].
    fn current_position(
        &self,
        options: PositionOptions,
        cancellable: gio::Cancellable,
    ) -> LocalBoxFuture<'_, Result<Position, PositionError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, Duration::from_millis(15000));
        assert_eq!(options.maximum_age, Duration::from_millis(10000));
    }

    #[test]
    fn test_error_display() {
        let err = PositionError::new(PositionErrorCode::Timeout, "no fix within 15s");
        assert_eq!(err.to_string(), "TIMEOUT (3): no fix within 15s");

        let cancelled = PositionError::new(PositionErrorCode::Cancelled, "superseded");
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.to_string(), "CANCELLED: superseded");
    }
}
