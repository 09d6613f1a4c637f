//! Camera capture module
//!
//! The capture flow is modelled as one request that resolves to assets, an
//! error message, or neither (the user cancelled). The desktop flow drives a
//! command-line camera tool; see [`backends`].

pub mod backends;
pub mod desktop;

pub use backends::CameraBackend;
pub use desktop::DesktopCamera;

use futures::future::LocalBoxFuture;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaType {
    #[default]
    Photo,
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Photo => write!(f, "photo"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub media_type: MediaType,
    /// Image quality in `0.0..=1.0`
    pub quality: f64,
    /// Return the capture timestamp, dimensions and file size with the asset
    pub include_extra: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            media_type: MediaType::Photo,
            quality: 1.0,
            include_extra: true,
        }
    }
}

/// A captured media item
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub uri: String,
    pub file_path: PathBuf,
    /// RFC 3339 capture instant, only with `include_extra`
    pub timestamp: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureResponse {
    pub assets: Vec<Asset>,
    pub error_message: Option<String>,
}

impl CaptureResponse {
    pub fn cancelled() -> Self {
        Self::default()
    }

    pub fn with_asset(asset: Asset) -> Self {
        Self {
            assets: vec![asset],
            error_message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            assets: Vec::new(),
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug)]
pub enum CameraError {
    NoBackend,
    Unsupported(MediaType),
    Io(std::io::Error),
    SpawnFailed {
        backend: CameraBackend,
        source: std::io::Error,
    },
    CommandFailed {
        backend: CameraBackend,
        stderr: String,
    },
    InvalidImage(String),
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraError::NoBackend => write!(
                f,
                "No camera tool found. Install fswebcam, ffmpeg or GStreamer"
            ),
            CameraError::Unsupported(media_type) => {
                write!(f, "Capturing {} is not supported", media_type)
            }
            CameraError::Io(e) => write!(f, "Cannot store photo: {}", e),
            CameraError::SpawnFailed { backend, source } => {
                write!(f, "Failed to start {}: {}", backend, source)
            }
            CameraError::CommandFailed { backend, stderr } => {
                if stderr.is_empty() {
                    write!(f, "{} failed to capture a photo", backend)
                } else {
                    write!(f, "{} failed: {}", backend, stderr)
                }
            }
            CameraError::InvalidImage(reason) => {
                write!(f, "Captured file is not a valid image: {}", reason)
            }
        }
    }
}

impl std::error::Error for CameraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CameraError::Io(e) => Some(e),
            CameraError::SpawnFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CameraError {
    fn from(e: std::io::Error) -> Self {
        CameraError::Io(e)
    }
}

pub trait CameraService {
    /// Run the capture flow once
    fn launch(&self, options: CaptureOptions) -> LocalBoxFuture<'_, CaptureResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CaptureOptions::default();
        assert_eq!(options.media_type, MediaType::Photo);
        assert_eq!(options.quality, 1.0);
        assert!(options.include_extra);
    }

    #[test]
    fn test_response_constructors() {
        let cancelled = CaptureResponse::cancelled();
        assert!(cancelled.assets.is_empty());
        assert!(cancelled.error_message.is_none());

        let failed = CaptureResponse::error("Camera busy");
        assert!(failed.assets.is_empty());
        assert_eq!(failed.error_message.as_deref(), Some("Camera busy"));
    }

    #[test]
    fn test_error_messages() {
        let err = CameraError::CommandFailed {
            backend: CameraBackend::Fswebcam,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "fswebcam failed to capture a photo");

        let err = CameraError::Unsupported(MediaType::Video);
        assert_eq!(err.to_string(), "Capturing video is not supported");
    }
}
