use gtk::gdk;
use gtk::glib;
use gtk4 as gtk;
use log::warn;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::app::controller::PositionErrorPolicy;
use crate::capture::{CameraBackend, CaptureOptions};
use crate::format::TimeFormat;
use crate::location::gpsd::DEFAULT_GPSD_ADDR;
use crate::location::PositionOptions;

pub const ENV_CAMERA_DEVICE: &str = "GEOCAM_CAMERA_DEVICE";
pub const ENV_CAMERA_BACKEND: &str = "GEOCAM_CAMERA_BACKEND";
pub const ENV_PHOTO_DIR: &str = "GEOCAM_PHOTO_DIR";
pub const ENV_GPSD_ADDR: &str = "GEOCAM_GPSD_ADDR";
pub const ENV_POSITION_ERRORS: &str = "GEOCAM_POSITION_ERRORS";

const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
const PHOTO_SUBDIR: &str = "GeotagCamera";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Capture,
    ShowShortcuts,
    Quit,
}

impl Action {
    pub fn label(&self) -> &str {
        match self {
            Action::Capture => "Take Photo",
            Action::ShowShortcuts => "Keyboard Shortcuts",
            Action::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: gdk::Key,
    pub modifiers: gdk::ModifierType,
}

#[derive(Debug, Clone)]
pub struct ShortcutConfig {
    bindings: HashMap<Action, Shortcut>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(
            Action::Capture,
            Shortcut {
                key: gdk::Key::Return,
                modifiers: gdk::ModifierType::CONTROL_MASK,
            },
        );
        bindings.insert(
            Action::ShowShortcuts,
            Shortcut {
                key: gdk::Key::F1,
                modifiers: gdk::ModifierType::empty(),
            },
        );
        bindings.insert(
            Action::Quit,
            Shortcut {
                key: gdk::Key::q,
                modifiers: gdk::ModifierType::CONTROL_MASK,
            },
        );

        Self { bindings }
    }
}

impl ShortcutConfig {
    pub fn get_action(&self, key: gdk::Key, modifiers: gdk::ModifierType) -> Option<Action> {
        // Ignore NumLock/CapsLock/ScrollLock
        let mask = gdk::ModifierType::CONTROL_MASK
            | gdk::ModifierType::SHIFT_MASK
            | gdk::ModifierType::ALT_MASK
            | gdk::ModifierType::SUPER_MASK
            | gdk::ModifierType::META_MASK;

        let clean_mods = modifiers & mask;

        for (action, shortcut) in &self.bindings {
            if shortcut.key == key && shortcut.modifiers == clean_mods {
                return Some(*action);
            }

            // Keypad Enter works wherever Return does
            if key == gdk::Key::KP_Enter
                && shortcut.key == gdk::Key::Return
                && shortcut.modifiers == clean_mods
            {
                return Some(*action);
            }
        }
        None
    }

    pub fn get_shortcut_label(&self, action: Action) -> String {
        if let Some(sc) = self.bindings.get(&action) {
            return gtk::accelerator_name(sc.key, sc.modifiers).to_string();
        }
        String::new()
    }
}

/// Application configuration
///
/// Defaults describe the original single-screen assignment app. The
/// device, storage and daemon settings can be overridden from the
/// environment, see [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub title: String,
    pub footer_lines: Vec<String>,
    pub camera_device: PathBuf,
    /// `None` probes for an installed camera tool on each capture
    pub camera_backend: Option<CameraBackend>,
    pub photo_dir: PathBuf,
    pub gpsd_addr: String,
    pub capture_options: CaptureOptions,
    pub position_options: PositionOptions,
    pub position_error_policy: PositionErrorPolicy,
    pub time_format: TimeFormat,
    pub shortcuts: ShortcutConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Geotag Camera".to_string(),
            title: "Aplikasi Kamera".to_string(),
            footer_lines: vec![
                "043008937".to_string(),
                "Lintang Luthfiantoni".to_string(),
                "UPBJJ UT Banjarmasin".to_string(),
            ],
            camera_device: PathBuf::from(DEFAULT_CAMERA_DEVICE),
            camera_backend: None,
            photo_dir: default_photo_dir(),
            gpsd_addr: DEFAULT_GPSD_ADDR.to_string(),
            capture_options: CaptureOptions::default(),
            position_options: PositionOptions::default(),
            position_error_policy: PositionErrorPolicy::default(),
            time_format: TimeFormat::default(),
            shortcuts: ShortcutConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from a variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(device) = var(ENV_CAMERA_DEVICE) {
            config.camera_device = PathBuf::from(device);
        }

        if let Some(name) = var(ENV_CAMERA_BACKEND) {
            config.camera_backend = CameraBackend::from_name(&name);
            if config.camera_backend.is_none() {
                warn!("Unknown camera backend '{}', probing instead", name);
            }
        }

        if let Some(dir) = var(ENV_PHOTO_DIR) {
            config.photo_dir = PathBuf::from(dir);
        }

        if let Some(addr) = var(ENV_GPSD_ADDR) {
            config.gpsd_addr = addr;
        }

        if let Some(policy) = var(ENV_POSITION_ERRORS) {
            match PositionErrorPolicy::from_name(&policy) {
                Some(p) => config.position_error_policy = p,
                None => warn!("Unknown position error policy '{}'", policy),
            }
        }

        config
    }
}

fn default_photo_dir() -> PathBuf {
    glib::user_special_dir(glib::UserDirectory::Pictures)
        .unwrap_or_else(glib::user_cache_dir)
        .join(PHOTO_SUBDIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.camera_device, PathBuf::from("/dev/video0"));
        assert_eq!(config.gpsd_addr, "127.0.0.1:2947");
        assert_eq!(config.camera_backend, None);
        assert_eq!(config.position_error_policy, PositionErrorPolicy::LogOnly);
        assert_eq!(config.time_format.zone_label, "WITA");
        assert!(config.photo_dir.ends_with("GeotagCamera"));
        assert_eq!(config.footer_lines.len(), 3);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AppConfig::from_lookup(|key| match key {
            ENV_CAMERA_DEVICE => Some("/dev/video2".to_string()),
            ENV_CAMERA_BACKEND => Some("ffmpeg".to_string()),
            ENV_PHOTO_DIR => Some("/tmp/photos".to_string()),
            ENV_GPSD_ADDR => Some("gps.local:2947".to_string()),
            ENV_POSITION_ERRORS => Some("notify".to_string()),
            _ => None,
        });

        assert_eq!(config.camera_device, PathBuf::from("/dev/video2"));
        assert_eq!(config.camera_backend, Some(CameraBackend::Ffmpeg));
        assert_eq!(config.photo_dir, PathBuf::from("/tmp/photos"));
        assert_eq!(config.gpsd_addr, "gps.local:2947");
        assert_eq!(config.position_error_policy, PositionErrorPolicy::Notify);
    }

    #[test]
    fn test_from_lookup_ignores_empty_and_unknown() {
        let config = AppConfig::from_lookup(|key| match key {
            ENV_CAMERA_DEVICE => Some("  ".to_string()),
            ENV_CAMERA_BACKEND => Some("cheese".to_string()),
            ENV_POSITION_ERRORS => Some("shout".to_string()),
            _ => None,
        });

        assert_eq!(config.camera_device, PathBuf::from("/dev/video0"));
        assert_eq!(config.camera_backend, None);
        assert_eq!(config.position_error_policy, PositionErrorPolicy::LogOnly);
    }

    #[test]
    fn test_shortcut_lookup() {
        let shortcuts = ShortcutConfig::default();
        assert_eq!(
            shortcuts.get_action(gdk::Key::Return, gdk::ModifierType::CONTROL_MASK),
            Some(Action::Capture)
        );
        assert_eq!(
            shortcuts.get_action(
                gdk::Key::KP_Enter,
                gdk::ModifierType::CONTROL_MASK | gdk::ModifierType::LOCK_MASK
            ),
            Some(Action::Capture)
        );
        assert_eq!(
            shortcuts.get_action(gdk::Key::q, gdk::ModifierType::CONTROL_MASK),
            Some(Action::Quit)
        );
        assert_eq!(
            shortcuts.get_action(gdk::Key::q, gdk::ModifierType::empty()),
            None
        );
    }
}
