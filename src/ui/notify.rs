use futures::future::LocalBoxFuture;
use gtk4::glib;
use libadwaita as adw;
use log::debug;

use crate::app::controller::{NotificationDuration, Notifier, Spawner};

/// Shows notifications as toasts on the window's toast overlay
pub struct ToastNotifier {
    overlay: adw::ToastOverlay,
}

impl ToastNotifier {
    pub fn new(overlay: &adw::ToastOverlay) -> Self {
        Self {
            overlay: overlay.clone(),
        }
    }
}

impl Notifier for ToastNotifier {
    fn show(&self, text: &str, duration: NotificationDuration) {
        let timeout = match duration {
            NotificationDuration::Short => 2,
            NotificationDuration::Long => 5,
        };
        debug!("Showing toast: {}", text);

        let toast = adw::Toast::builder()
            .title(text)
            .use_markup(false)
            .timeout(timeout)
            .build();
        self.overlay.add_toast(toast);
    }
}

/// Spawns onto the default GLib main context
pub struct MainContextSpawner;

impl Spawner for MainContextSpawner {
    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        glib::spawn_future_local(future);
    }
}
