//! Media store backed by a local directory.

use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Public path prefix under which stored files are served and keyed.
/// Post documents reference images as `uploads/<filename>`.
pub const PUBLIC_PREFIX: &str = "uploads";

/// Longest extension carried over from an uploaded filename.
const MAX_EXTENSION_LEN: usize = 8;

/// Store for uploaded images on the local filesystem.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Open the store, creating the upload directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = dir.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| StorageError::ConfigError(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    /// Directory files are written to; the HTTP layer serves it read-only.
    pub fn dir(&self) -> &Path {
        &self.root
    }

    /// Persist an uploaded payload under a generated filename.
    ///
    /// Returns the stored key (`uploads/<uuid>.<ext>`) that goes into the
    /// post's image field. The extension is taken from the client filename
    /// when it looks safe, otherwise dropped.
    pub async fn save(&self, data: &[u8], original_name: Option<&str>) -> StorageResult<String> {
        let filename = match original_name.and_then(extension_of) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let path = self.root.join(&filename);
        tokio::fs::write(&path, data).await?;
        info!("Stored media file {} ({} bytes)", path.display(), data.len());

        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }

    /// Remove a stored file by its key.
    ///
    /// Keys are validated against the `uploads/<filename>` shape before any
    /// filesystem access so a corrupted document cannot reach outside the
    /// upload directory.
    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        let filename = validate_key(key)?;
        let path = self.root.join(filename);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed media file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(key))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Check a stored key and return the bare filename component.
fn validate_key(key: &str) -> StorageResult<&str> {
    let filename = key
        .strip_prefix(PUBLIC_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| StorageError::invalid_key(key))?;

    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(StorageError::invalid_key(key));
    }
    Ok(filename)
}

/// Extract a safe extension from a client-supplied filename.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
