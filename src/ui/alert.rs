use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tracing::warn;

/// Show a blocking error dialog with `message`
pub fn show_error(message: &str) {
    warn!("❌ {}", message);

    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Error")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
