mod app;
mod capture;
mod format;
mod location;
mod permission;
mod ui;

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::glib;
use log::info;
use std::rc::Rc;

use crate::app::AppConfig;

const APP_ID: &str = "org.example.GeotagCamera";

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Rc::new(AppConfig::from_env());
    info!(
        "Camera device {}, gpsd at {}",
        config.camera_device.display(),
        config.gpsd_addr
    );

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| ui::build_ui(app, &config));
    app.run()
}
