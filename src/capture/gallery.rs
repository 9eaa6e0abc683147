use rfd::AsyncFileDialog;
use std::path::PathBuf;

use super::IMAGE_EXTENSIONS;

/// Show the native file picker filtered to images.
/// Returns None if the dialog was dismissed.
pub async fn pick_image() -> Option<PathBuf> {
    let mut dialog = AsyncFileDialog::new()
        .set_title("Select a Plant Photo")
        .add_filter("Images", IMAGE_EXTENSIONS);

    if let Some(pictures) = dirs::picture_dir() {
        dialog = dialog.set_directory(pictures);
    }

    let handle = dialog.pick_file().await?;
    Some(handle.path().to_path_buf())
}
