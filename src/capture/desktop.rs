use futures::future::LocalBoxFuture;
use gtk4 as gtk;
use gtk4::gio;
use log::{error, info};
use std::path::PathBuf;

use super::backends::{capture_photo, CameraBackend, CaptureRequest};
use super::{CameraService, CaptureOptions, CaptureResponse};
use crate::ui::dialogs::confirm_capture;

/// Capture flow for the desktop: a confirmation dialog followed by a
/// single-frame grab on the GIO blocking pool.
pub struct DesktopCamera {
    parent: gtk::Window,
    backend: Option<CameraBackend>,
    device: PathBuf,
    photo_dir: PathBuf,
}

impl DesktopCamera {
    pub fn new(
        parent: gtk::Window,
        backend: Option<CameraBackend>,
        device: impl Into<PathBuf>,
        photo_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            parent,
            backend,
            device: device.into(),
            photo_dir: photo_dir.into(),
        }
    }
}

impl CameraService for DesktopCamera {
    fn launch(&self, options: CaptureOptions) -> LocalBoxFuture<'_, CaptureResponse> {
        Box::pin(async move {
            if !confirm_capture(&self.parent, &self.device).await {
                info!("Capture cancelled");
                return CaptureResponse::cancelled();
            }

            let request = CaptureRequest {
                options,
                backend: self.backend,
                device: self.device.clone(),
                photo_dir: self.photo_dir.clone(),
            };

            match gio::spawn_blocking(move || capture_photo(&request)).await {
                Ok(Ok(asset)) => CaptureResponse::with_asset(asset),
                Ok(Err(e)) => {
                    error!("Capture failed: {}", e);
                    CaptureResponse::error(e.to_string())
                }
                Err(_) => {
                    error!("Capture thread panicked");
                    CaptureResponse::error("Camera stopped unexpectedly")
                }
            }
        })
    }
}
