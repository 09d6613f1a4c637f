//! Desktop permission checks
//!
//! GNOME exposes the camera and location privacy switches as GSettings keys.
//! When the schema is not installed the switch is treated as on, and the
//! camera check falls through to opening the device node.

use futures::future::LocalBoxFuture;
use gtk4::gio;
use gtk4::gio::prelude::*;
use log::{debug, info};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Capability, PermissionService, PermissionStatus};

const PRIVACY_SCHEMA: &str = "org.gnome.desktop.privacy";
const PRIVACY_DISABLE_CAMERA_KEY: &str = "disable-camera";
const LOCATION_SCHEMA: &str = "org.gnome.system.location";
const LOCATION_ENABLED_KEY: &str = "enabled";

pub struct DesktopPermissions {
    camera_device: PathBuf,
    location_source: String,
}

impl DesktopPermissions {
    pub fn new(camera_device: impl Into<PathBuf>, location_source: impl Into<String>) -> Self {
        Self {
            camera_device: camera_device.into(),
            location_source: location_source.into(),
        }
    }

    fn camera_status(&self) -> PermissionStatus {
        if read_setting(PRIVACY_SCHEMA, PRIVACY_DISABLE_CAMERA_KEY) == Some(true) {
            return PermissionStatus::Blocked;
        }
        device_status(&self.camera_device)
    }

    fn location_status(&self) -> PermissionStatus {
        if read_setting(LOCATION_SCHEMA, LOCATION_ENABLED_KEY) == Some(false) {
            return PermissionStatus::Denied;
        }
        if self.location_source.trim().is_empty() {
            return PermissionStatus::Unavailable;
        }
        PermissionStatus::Granted
    }
}

impl PermissionService for DesktopPermissions {
    fn request(&self, capability: Capability) -> LocalBoxFuture<'_, PermissionStatus> {
        Box::pin(async move {
            let status = match capability {
                Capability::Camera => self.camera_status(),
                Capability::Location => self.location_status(),
            };
            info!("Permission for {}: {}", capability, status);
            status
        })
    }
}

/// Read a boolean GSettings key, or `None` if the schema or key is missing
fn read_setting(schema_id: &str, key: &str) -> Option<bool> {
    let source = gio::SettingsSchemaSource::default()?;
    let schema = source.lookup(schema_id, true)?;
    if !schema.has_key(key) {
        return None;
    }
    let value = gio::Settings::new(schema_id).boolean(key);
    debug!("{} {} = {}", schema_id, key, value);
    Some(value)
}

/// Map the result of opening a device node to a permission status
pub fn device_status(device: &Path) -> PermissionStatus {
    match OpenOptions::new().read(true).open(device) {
        Ok(_) => PermissionStatus::Granted,
        Err(e) => {
            debug!("Cannot open {}: {}", device.display(), e);
            match e.kind() {
                ErrorKind::NotFound => PermissionStatus::Unavailable,
                ErrorKind::PermissionDenied => PermissionStatus::Denied,
                _ => PermissionStatus::Restricted,
            }
        }
    }
}
