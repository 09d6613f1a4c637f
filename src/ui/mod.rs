pub mod dialogs;
pub mod handlers;
pub mod header;
pub mod notify;
pub mod shortcuts;
pub mod view;

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::Orientation;
use log::info;
use std::rc::Rc;

use crate::app::{AppConfig, CaptureController, ControllerSettings, Services};
use crate::capture::DesktopCamera;
use crate::location::GpsdLocator;
use crate::permission::DesktopPermissions;

pub fn build_ui(app: &adw::Application, config: &Rc<AppConfig>) {
    if let Some(window) = app.active_window() {
        window.present();
        return;
    }

    let header = header::create_header_bar(config);
    let view = view::create_view(config);

    let clamp = adw::Clamp::builder()
        .maximum_size(480)
        .child(&view.root)
        .build();
    let scrolled = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .vexpand(true)
        .child(&clamp)
        .build();
    let toast_overlay = adw::ToastOverlay::new();
    toast_overlay.set_child(Some(&scrolled));

    let content = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    content.append(&header.header_bar);
    content.append(&toast_overlay);

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title(config.window_title.as_str())
        .content(&content)
        .default_width(480)
        .default_height(760)
        .build();

    let services = Services {
        permissions: Rc::new(DesktopPermissions::new(
            config.camera_device.clone(),
            config.gpsd_addr.clone(),
        )),
        camera: Rc::new(DesktopCamera::new(
            window.clone().upcast(),
            config.camera_backend,
            config.camera_device.clone(),
            config.photo_dir.clone(),
        )),
        geolocation: Rc::new(GpsdLocator::new(config.gpsd_addr.clone())),
        notifier: Rc::new(notify::ToastNotifier::new(&toast_overlay)),
        spawner: Rc::new(notify::MainContextSpawner),
    };
    let controller = CaptureController::new(
        services,
        ControllerSettings {
            capture_options: config.capture_options,
            position_options: config.position_options,
            position_error_policy: config.position_error_policy,
            time_format: config.time_format.clone(),
        },
    );

    let components = handlers::UiComponents {
        window: window.clone(),
        header,
        view,
        toast_overlay,
    };

    handlers::connect_all_handlers(&controller, config, &components);

    info!("Photos are stored in {}", config.photo_dir.display());
    window.present();
}
