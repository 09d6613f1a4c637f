use gtk4 as gtk;

use log::debug;
use std::path::Path;

const CANCEL_RESPONSE: i32 = 0;
const CAPTURE_RESPONSE: i32 = 1;

/// Ask the user to take the photo. Resolves to `false` when the dialog is
/// cancelled or dismissed.
pub async fn confirm_capture(parent: &gtk::Window, device: &Path) -> bool {
    let dialog = gtk::AlertDialog::builder()
        .modal(true)
        .message("Ambil Foto")
        .detail(format!(
            "Arahkan kamera lalu tekan Ambil Foto.\nPerangkat: {}",
            device.display()
        ))
        .buttons(["Batal", "Ambil Foto"])
        .cancel_button(CANCEL_RESPONSE)
        .default_button(CAPTURE_RESPONSE)
        .build();

    match dialog.choose_future(Some(parent)).await {
        Ok(CAPTURE_RESPONSE) => true,
        Ok(_) => false,
        Err(e) => {
            debug!("Capture dialog dismissed: {}", e);
            false
        }
    }
}
