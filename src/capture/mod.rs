//! Photo acquisition
//!
//! This module handles:
//! - Picking an existing photo from disk (gallery.rs)
//! - Capturing a new photo through an external camera command (camera.rs)
//! - Describing the chosen file for upload ([`ImageRef`])
//!
//! A cancelled acquisition is `Ok(None)`; only genuine failures are errors.

pub mod camera;
pub mod gallery;

use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions offered by the picker and accepted for upload
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff",
];

/// MIME type used when the extension tells us nothing
const FALLBACK_MIME: &str = "image/jpeg";

/// Where a photo comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Gallery,
    Camera,
}

/// A locally selected photo, ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Location of the file on disk
    pub uri: PathBuf,
    /// File name sent with the upload
    pub name: String,
    /// MIME type sent with the upload
    pub mime: String,
}

impl ImageRef {
    /// Describe an image file, checking that it is a decodable image
    pub fn from_path(path: &Path) -> Result<Self, String> {
        if !path.is_file() {
            return Err(format!("Image not found: {}", path.display()));
        }

        let (width, height) = image::image_dimensions(path)
            .map_err(|e| format!("Not a readable image ({}): {}", path.display(), e))?;
        debug!("🖼️  Selected {} ({}x{})", path.display(), width, height);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "photo.jpg".to_string());

        Ok(ImageRef {
            uri: path.to_path_buf(),
            name,
            mime: mime_for(path).to_string(),
        })
    }
}

/// MIME type for an image path, by extension
pub fn mime_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// Acquire a photo from `source`.
///
/// Returns `Ok(None)` when the user cancelled.
pub async fn acquire(
    source: ImageSource,
    camera_command: Option<String>,
) -> Result<Option<ImageRef>, String> {
    let path = match source {
        ImageSource::Gallery => gallery::pick_image().await,
        ImageSource::Camera => camera::capture(camera_command.as_deref()).await?,
    };

    match path {
        Some(path) => ImageRef::from_path(&path).map(Some),
        None => Ok(None),
    }
}
