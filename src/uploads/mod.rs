//! Image upload storage
//!
//! Writes uploaded images below the upload directory and hands back the
//! relative path that gets persisted, e.g. `uploads/profiles/<uuid>.png`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// URL prefix the upload directory is served under
pub const UPLOADS_ROUTE: &str = "uploads";

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file was uploaded")]
    Empty,

    #[error("File is larger than {0} bytes")]
    TooLarge(usize),

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Which listing an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Profile,
    Property,
}

impl ImageKind {
    fn dir_name(&self) -> &'static str {
        match self {
            ImageKind::Profile => "profiles",
            ImageKind::Property => "properties",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist `bytes` and return the relative path to store in the database
    pub async fn save(
        &self,
        kind: ImageKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }

        let extension = image_extension(original_name)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);

        let dir = self.root.join(kind.dir_name());
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&file_name), bytes).await?;

        let relative = format!("{}/{}/{}", UPLOADS_ROUTE, kind.dir_name(), file_name);
        tracing::debug!(path = %relative, size = bytes.len(), "Stored upload");
        Ok(relative)
    }

    /// Best-effort removal of a previously saved upload
    pub async fn remove(&self, relative_path: &str) {
        let Some(inner) = relative_path
            .strip_prefix(UPLOADS_ROUTE)
            .map(|p| p.trim_start_matches('/'))
        else {
            return;
        };
        if inner.split('/').any(|segment| segment == "..") {
            return;
        }

        if let Err(e) = fs::remove_file(self.root.join(inner)).await {
            tracing::warn!(path = %relative_path, error = %e, "Failed to remove orphaned upload");
        }
    }
}

fn image_extension(original_name: &str) -> Result<String, UploadError> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| UploadError::UnsupportedType(original_name.to_string()))?;

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(UploadError::UnsupportedType(extension))
    }
}
