//! Cover image files for books.
//!
//! Uploaded covers arrive base64-encoded inside the book payload. They are written to
//! a directory under a random name that keeps the original extension, and the book
//! stores the public path (`/bookcoverimages/<file>`) at which they are served.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use uuid::Uuid;

use crate::error::AppError;

/// URL prefix under which stored covers are served.
pub const PUBLIC_PREFIX: &str = "/bookcoverimages/";

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];
const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Clone)]
pub struct CoverImageStore {
    dir: PathBuf,
}

impl CoverImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Decodes and writes a cover, returning its public path.
    ///
    /// Accepts plain base64 or a `data:<mime>;base64,` URL.
    pub async fn save(&self, image_data: &str, original_name: Option<&str>) -> Result<String, AppError> {
        let encoded = match image_data.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => image_data,
        };
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AppError::BadRequest("Image data is not valid base64".into()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Image data is empty".into()));
        }

        let extension = image_extension(original_name)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), &bytes).await?;
        log::info!("Stored cover image {} ({} bytes)", file_name, bytes.len());

        Ok(format!("{}{}", PUBLIC_PREFIX, file_name))
    }

    /// Deletes the file behind a public path. Paths that do not point into this
    /// store and files that are already gone are ignored.
    pub async fn remove(&self, public_path: &str) -> Result<(), AppError> {
        let Some(path) = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|file_name| self.path_for(file_name))
        else {
            log::warn!("Not removing cover outside the image store: {}", public_path);
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::info!("Removed cover image {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a stored cover and its content type, or `None` if it does not exist.
    pub async fn read(&self, file_name: &str) -> Result<Option<(Vec<u8>, mime_guess::Mime)>, AppError> {
        let Some(path) = self.path_for(file_name) else {
            return Ok(None);
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some((bytes, mime_guess::from_path(&path).first_or_octet_stream()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Maps a bare file name into the store, rejecting anything that could escape it.
    fn path_for(&self, file_name: &str) -> Option<PathBuf> {
        let safe = !file_name.is_empty()
            && !file_name.starts_with('.')
            && file_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        safe.then(|| self.dir.join(file_name))
    }
}

fn image_extension(original_name: Option<&str>) -> Result<String, AppError> {
    let Some(name) = original_name.filter(|name| !name.trim().is_empty()) else {
        return Ok(DEFAULT_EXTENSION.to_string());
    };
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| AppError::BadRequest("Image name has no file extension".into()))?;
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AppError::BadRequest(format!(
            "Unsupported image type '{}'",
            extension
        )))
    }
}
