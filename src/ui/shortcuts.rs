use adw::prelude::*;
use gtk4 as gtk;
use libadwaita as adw;

use crate::app::config::{Action, ShortcutConfig};

pub fn show_shortcuts_dialog(shortcuts: &ShortcutConfig, parent: &impl IsA<gtk::Window>) {
    let window = adw::PreferencesWindow::builder()
        .transient_for(parent)
        .modal(true)
        .title("Keyboard Shortcuts")
        .default_width(420)
        .default_height(320)
        .search_enabled(false)
        .build();

    let page = adw::PreferencesPage::new();
    window.add(&page);

    let group = adw::PreferencesGroup::builder().title("General").build();
    for action in [Action::Capture, Action::ShowShortcuts, Action::Quit] {
        add_action_row(shortcuts, &group, action);
    }
    page.add(&group);

    window.present();
}

fn add_action_row(shortcuts: &ShortcutConfig, group: &adw::PreferencesGroup, action: Action) {
    let shortcut_label = shortcuts.get_shortcut_label(action);

    let row = adw::ActionRow::builder().title(action.label()).build();

    let accel = gtk::ShortcutLabel::builder()
        .accelerator(shortcut_label.as_str())
        .disabled_text("Disabled")
        .valign(gtk::Align::Center)
        .build();

    row.add_suffix(&accel);
    group.add(&row);
}
