use gtk4 as gtk;

use gtk::gio;
use gtk::{Align, Orientation};
use gtk4::prelude::*;

use crate::app::{AppConfig, ViewState};
use crate::format::{display_capture_time, format_coordinates, TimeFormat};

const CAPTURE_LABEL: &str = "Buka Kamera";
const CAPTURE_BUSY_LABEL: &str = "Membuka Kamera…";
const PHOTO_SIZE: i32 = 300;

#[derive(Clone)]
pub struct ViewComponents {
    pub root: gtk::Box,
    pub picture: gtk::Picture,
    pub placeholder_icon: gtk::Image,
    pub time_label: gtk::Label,
    pub coords_label: gtk::Label,
    pub capture_btn: gtk::Button,
}

pub fn create_view(config: &AppConfig) -> ViewComponents {
    let title_label = gtk::Label::builder()
        .label(config.title.as_str())
        .halign(Align::Center)
        .margin_top(16)
        .margin_bottom(8)
        .build();
    title_label.add_css_class("title-2");

    let picture = gtk::Picture::builder()
        .content_fit(gtk::ContentFit::Contain)
        .width_request(PHOTO_SIZE)
        .height_request(PHOTO_SIZE)
        .build();

    let placeholder_icon = gtk::Image::builder()
        .icon_name("camera-photo-symbolic")
        .pixel_size(96)
        .opacity(0.2)
        .halign(Align::Center)
        .valign(Align::Center)
        .build();

    let photo_overlay = gtk::Overlay::builder()
        .child(&picture)
        .halign(Align::Center)
        .build();
    photo_overlay.add_overlay(&placeholder_icon);

    let time_label = value_label();
    let coords_label = value_label();

    let capture_btn = gtk::Button::builder()
        .label(CAPTURE_LABEL)
        .hexpand(true)
        .margin_top(30)
        .margin_bottom(30)
        .build();
    capture_btn.add_css_class("suggested-action");
    capture_btn.add_css_class("pill");

    let root = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .valign(Align::Center)
        .margin_start(32)
        .margin_end(32)
        .margin_bottom(16)
        .build();
    root.append(&title_label);
    root.append(&photo_overlay);
    root.append(&section_label("Waktu pengambilan"));
    root.append(&time_label);
    root.append(&section_label("Koordinat lokasi pengambilan"));
    root.append(&coords_label);
    root.append(&capture_btn);

    for line in &config.footer_lines {
        let footer = gtk::Label::builder()
            .label(line.as_str())
            .halign(Align::Center)
            .build();
        footer.add_css_class("dim-label");
        root.append(&footer);
    }

    ViewComponents {
        root,
        picture,
        placeholder_icon,
        time_label,
        coords_label,
        capture_btn,
    }
}

fn section_label(text: &str) -> gtk::Label {
    let label = gtk::Label::builder()
        .label(text)
        .halign(Align::Start)
        .margin_top(16)
        .build();
    label.add_css_class("heading");
    label
}

fn value_label() -> gtk::Label {
    gtk::Label::builder()
        .label("-")
        .halign(Align::Start)
        .selectable(true)
        .wrap(true)
        .build()
}

/// Bring every widget in line with the state
pub fn render(view: &ViewComponents, state: &ViewState, time_format: &TimeFormat) {
    let file = state.image_source().map(gio::File::for_uri);
    view.picture.set_file(file.as_ref());
    view.placeholder_icon.set_visible(!state.has_image());

    view.time_label
        .set_text(&display_capture_time(state.image_time(), time_format));
    view.coords_label
        .set_text(&format_coordinates(state.position()));

    let busy = state.capture_in_flight();
    view.capture_btn.set_sensitive(!busy);
    view.capture_btn
        .set_label(if busy { CAPTURE_BUSY_LABEL } else { CAPTURE_LABEL });
}
