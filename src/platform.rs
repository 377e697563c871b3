/// Platform collaborators: gallery permission and the image picker
///
/// A desktop has no runtime permission prompt, so gallery access is
/// granted when the picture directory can actually be listed.
use image::DynamicImage;
use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::imaging;

/// Raster extensions offered by the picker
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Yes/no capability check plus a request flow
pub trait PermissionGate {
    /// Current state, without asking
    fn check(&self) -> Permission;

    /// Ask for access. Platforms without a prompt simply re-check.
    fn request(&self) -> Permission {
        self.check()
    }
}

/// Grants access when the gallery directory is readable
#[derive(Debug, Clone)]
pub struct GalleryDirGate {
    dir: PathBuf,
}

impl GalleryDirGate {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Gate over the user's picture directory (falls back to home)
    pub fn from_system(picture_dir: Option<PathBuf>) -> Self {
        let dir = picture_dir
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PermissionGate for GalleryDirGate {
    fn check(&self) -> Permission {
        match std::fs::read_dir(&self.dir) {
            Ok(_) => Permission::Granted,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "gallery not readable");
                Permission::Denied
            }
        }
    }
}

/// An image chosen from the gallery
#[derive(Debug, Clone)]
pub struct PickedImage {
    pub path: PathBuf,
    pub image: DynamicImage,
}

/// Show the native picker and decode the chosen file.
/// Cancel, unreadable files and undecodable files all yield None.
pub async fn pick_image(start_dir: PathBuf) -> Option<PickedImage> {
    let handle = AsyncFileDialog::new()
        .set_title("Select an Image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .set_directory(&start_dir)
        .pick_file()
        .await?;

    let path = handle.path().to_path_buf();
    let bytes = handle.read().await;

    // Spawn blocking because decoding a full-size photo is CPU-intensive
    let decoded = tokio::task::spawn_blocking(move || imaging::decode(&bytes)).await;

    match decoded {
        Ok(Ok(image)) => {
            debug!(
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                "image picked"
            );
            Some(PickedImage { path, image })
        }
        Ok(Err(e)) => {
            warn!(path = %path.display(), error = %e, "picked file is not an image");
            None
        }
        Err(e) => {
            warn!(error = %e, "decode task failed");
            None
        }
    }
}
