use gtk::glib;
use gtk4 as gtk;
use libadwaita as adw;
use log::{debug, info};

use gtk4::prelude::*;
use std::rc::Rc;

use crate::app::config::{Action, AppConfig};
use crate::app::CaptureController;
use crate::ui::header::HeaderComponents;
use crate::ui::shortcuts::show_shortcuts_dialog;
use crate::ui::view::{self, ViewComponents};

pub struct UiComponents {
    pub window: adw::ApplicationWindow,
    pub header: HeaderComponents,
    pub view: ViewComponents,
    pub toast_overlay: adw::ToastOverlay,
}

fn spawn_capture(controller: &Rc<CaptureController>) {
    let controller = controller.clone();
    glib::spawn_future_local(async move {
        controller.trigger_capture().await;
    });
}

pub fn connect_render_handler(controller: &Rc<CaptureController>, components: &UiComponents) {
    let view = components.view.clone();
    let time_format = controller.time_format().clone();
    controller.connect_changed(move |state| {
        view::render(&view, state, &time_format);
    });
}

pub fn connect_capture_handler(controller: &Rc<CaptureController>, components: &UiComponents) {
    components.view.capture_btn.connect_clicked({
        let controller = controller.clone();
        move |_| {
            debug!("Capture requested");
            spawn_capture(&controller);
        }
    });
}

pub fn connect_shortcuts_button(config: &Rc<AppConfig>, components: &UiComponents) {
    components.header.shortcuts_btn.connect_clicked({
        let config = config.clone();
        let window = components.window.clone();
        move |_| {
            show_shortcuts_dialog(&config.shortcuts, &window);
        }
    });
}

pub fn connect_key_handler(
    controller: &Rc<CaptureController>,
    config: &Rc<AppConfig>,
    components: &UiComponents,
) {
    let keys = gtk::EventControllerKey::new();

    keys.connect_key_pressed({
        let controller = controller.clone();
        let config = config.clone();
        let window = components.window.clone();
        move |_, key, _, modifiers| match config.shortcuts.get_action(key, modifiers) {
            Some(Action::Capture) => {
                spawn_capture(&controller);
                glib::Propagation::Stop
            }
            Some(Action::ShowShortcuts) => {
                show_shortcuts_dialog(&config.shortcuts, &window);
                glib::Propagation::Stop
            }
            Some(Action::Quit) => {
                window.close();
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        }
    });

    components.window.add_controller(keys);
}

pub fn connect_close_handler(controller: &Rc<CaptureController>, components: &UiComponents) {
    components.window.connect_close_request({
        let controller = controller.clone();
        move |_| {
            info!("Window closing");
            controller.shutdown();
            glib::Propagation::Proceed
        }
    });
}

pub fn connect_all_handlers(
    controller: &Rc<CaptureController>,
    config: &Rc<AppConfig>,
    components: &UiComponents,
) {
    debug!("Initializing UI handlers");
    connect_render_handler(controller, components);
    connect_capture_handler(controller, components);
    connect_shortcuts_button(config, components);
    connect_key_handler(controller, config, components);
    connect_close_handler(controller, components);
}
