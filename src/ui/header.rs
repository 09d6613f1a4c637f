use gtk4 as gtk;
use libadwaita as adw;

use crate::app::AppConfig;

pub struct HeaderComponents {
    pub header_bar: adw::HeaderBar,
    pub shortcuts_btn: gtk::Button,
}

pub fn create_header_bar(config: &AppConfig) -> HeaderComponents {
    let subtitle = config.camera_device.display().to_string();
    let title = adw::WindowTitle::new(&config.window_title, &subtitle);

    let shortcuts_btn = gtk::Button::builder()
        .icon_name("preferences-desktop-keyboard-shortcuts-symbolic")
        .tooltip_text("Keyboard Shortcuts")
        .build();

    let header_bar = adw::HeaderBar::builder().title_widget(&title).build();
    header_bar.pack_end(&shortcuts_btn);

    HeaderComponents {
        header_bar,
        shortcuts_btn,
    }
}
