//! Camera backends for grabbing a single frame from a V4L2 device.
//!
//! This module drives one of:
//! - fswebcam
//! - ffmpeg (v4l2 input)
//! - GStreamer (gst-launch-1.0 with v4l2src)
//!
//! Each backend writes a JPEG to the requested path.

use chrono::{DateTime, Local, SecondsFormat};
use gtk4::gio;
use gtk4::gio::prelude::*;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{Asset, CameraError, CaptureOptions, MediaType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraBackend {
    Fswebcam,
    Ffmpeg,
    GStreamer,
}

impl std::fmt::Display for CameraBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackend::Fswebcam => write!(f, "fswebcam"),
            CameraBackend::Ffmpeg => write!(f, "ffmpeg"),
            CameraBackend::GStreamer => write!(f, "GStreamer"),
        }
    }
}

impl CameraBackend {
    /// Probe order when nothing is configured
    pub fn all() -> &'static [CameraBackend] {
        &[
            CameraBackend::Fswebcam,
            CameraBackend::Ffmpeg,
            CameraBackend::GStreamer,
        ]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "fswebcam" => Some(CameraBackend::Fswebcam),
            "ffmpeg" => Some(CameraBackend::Ffmpeg),
            "gstreamer" | "gst" | "gst-launch-1.0" => Some(CameraBackend::GStreamer),
            _ => None,
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            CameraBackend::Fswebcam => "fswebcam",
            CameraBackend::Ffmpeg => "ffmpeg",
            CameraBackend::GStreamer => "gst-launch-1.0",
        }
    }

    fn version_flag(&self) -> &'static str {
        match self {
            CameraBackend::Ffmpeg => "-version",
            _ => "--version",
        }
    }

    pub fn is_available(&self) -> bool {
        Command::new(self.program())
            .arg(self.version_flag())
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// First installed backend in probe order
    pub fn detect() -> Option<Self> {
        let backend = Self::all().iter().copied().find(|b| b.is_available());
        match backend {
            Some(b) => info!("Using camera backend: {}", b),
            None => info!("No camera backend installed"),
        }
        backend
    }

    /// Command-line arguments to capture one frame from `device` into `output`
    pub fn args(&self, device: &Path, output: &Path, quality: f64) -> Vec<String> {
        let device = device.display().to_string();
        let output = output.display().to_string();

        match self {
            CameraBackend::Fswebcam => vec![
                "--quiet".to_string(),
                "--no-banner".to_string(),
                "--device".to_string(),
                device,
                "--skip".to_string(),
                "5".to_string(),
                "--jpeg".to_string(),
                jpeg_quality(quality).to_string(),
                output,
            ],
            CameraBackend::Ffmpeg => vec![
                "-hide_banner".to_string(),
                "-loglevel".to_string(),
                "error".to_string(),
                "-y".to_string(),
                "-f".to_string(),
                "v4l2".to_string(),
                "-i".to_string(),
                device,
                "-frames:v".to_string(),
                "1".to_string(),
                "-q:v".to_string(),
                ffmpeg_qscale(quality).to_string(),
                output,
            ],
            CameraBackend::GStreamer => vec![
                "-q".to_string(),
                "v4l2src".to_string(),
                format!("device={}", device),
                "num-buffers=1".to_string(),
                "!".to_string(),
                "videoconvert".to_string(),
                "!".to_string(),
                "jpegenc".to_string(),
                format!("quality={}", jpeg_quality(quality)),
                "!".to_string(),
                "filesink".to_string(),
                format!("location={}", output),
            ],
        }
    }
}

/// Map `0.0..=1.0` onto the JPEG 1..=100 scale
pub fn jpeg_quality(quality: f64) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
}

/// Map `0.0..=1.0` onto ffmpeg's qscale, where 2 is best and 31 is worst
pub fn ffmpeg_qscale(quality: f64) -> u8 {
    (31.0 - quality.clamp(0.0, 1.0) * 29.0).round() as u8
}

pub fn photo_file_name(captured_at: &DateTime<Local>) -> String {
    format!("IMG_{}.jpg", captured_at.format("%Y%m%d_%H%M%S"))
}

/// Everything the blocking capture needs, owned so it can cross threads
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub options: CaptureOptions,
    /// `None` means probe for an installed tool
    pub backend: Option<CameraBackend>,
    pub device: PathBuf,
    pub photo_dir: PathBuf,
}

/// Capture one photo. Blocks on the backend process.
pub fn capture_photo(request: &CaptureRequest) -> Result<Asset, CameraError> {
    if request.options.media_type != MediaType::Photo {
        return Err(CameraError::Unsupported(request.options.media_type));
    }

    let backend = request
        .backend
        .or_else(CameraBackend::detect)
        .ok_or(CameraError::NoBackend)?;

    std::fs::create_dir_all(&request.photo_dir)?;
    let captured_at = Local::now();
    let path = request.photo_dir.join(photo_file_name(&captured_at));

    let args = backend.args(&request.device, &path, request.options.quality);
    debug!("Running {} {}", backend.program(), args.join(" "));

    let output = Command::new(backend.program())
        .args(&args)
        .output()
        .map_err(|source| CameraError::SpawnFailed { backend, source })?;

    if !output.status.success() || !path.exists() {
        return Err(CameraError::CommandFailed {
            backend,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    build_asset(&path, &captured_at, request.options.include_extra)
}

/// Validate the written image and describe it as an asset
pub fn build_asset(
    path: &Path,
    captured_at: &DateTime<Local>,
    include_extra: bool,
) -> Result<Asset, CameraError> {
    let (width, height) =
        image::image_dimensions(path).map_err(|e| CameraError::InvalidImage(e.to_string()))?;
    let uri = gio::File::for_path(path).uri().to_string();
    info!("Captured {}x{} photo at {}", width, height, path.display());

    if !include_extra {
        return Ok(Asset {
            uri,
            file_path: path.to_path_buf(),
            timestamp: None,
            width: None,
            height: None,
            file_size: None,
        });
    }

    let file_size = std::fs::metadata(path)?.len();

    Ok(Asset {
        uri,
        file_path: path.to_path_buf(),
        timestamp: Some(captured_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        width: Some(width),
        height: Some(height),
        file_size: Some(file_size),
    })
}
