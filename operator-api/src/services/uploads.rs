//! Upload storage
//!
//! Course images are stored content-addressed: the file name is the
//! SHA-256 of the bytes plus the original (lowercased) extension, so
//! re-uploading the same image is idempotent.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// A file received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("empty file provided")]
    Empty,
    #[error("file too large: {0} bytes (max {MAX_FILE_SIZE})")]
    TooLarge(usize),
    #[error("unsupported file extension '{0}'")]
    Extension(String),
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Empty => AppError::new(ErrorCode::EmptyFile),
            UploadError::TooLarge(_) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, e.to_string())
            }
            UploadError::Extension(ref ext) => {
                AppError::with_message(ErrorCode::InvalidFileExtension, e.to_string())
                    .with_detail("extension", ext.clone())
            }
            UploadError::Io(ref io) => {
                tracing::error!(error = %io, "Upload write failed");
                AppError::new(ErrorCode::FileStorageFailed)
            }
        }
    }
}

/// Persists uploaded files and returns their public URL
#[async_trait]
pub trait Uploads: Send + Sync {
    async fn upload(&self, file: UploadedFile) -> Result<String, UploadError>;
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn extension_of(file_name: Option<&str>) -> Result<String, UploadError> {
    let ext = file_name
        .map(Path::new)
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if SUPPORTED_FORMATS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(UploadError::Extension(ext))
    }
}

/// Local-disk upload storage
#[derive(Debug, Clone)]
pub struct LocalUploads {
    dir: PathBuf,
    public_url: String,
}

impl LocalUploads {
    pub fn new(dir: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Path of a stored file, or `None` for names this storage never produces.
    ///
    /// Only `<64 hex chars>.<supported ext>` is accepted, which rules out
    /// path traversal.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let (hash, ext) = file_name.split_once('.')?;
        if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        if !SUPPORTED_FORMATS.contains(&ext) {
            return None;
        }
        Some(self.dir.join(file_name))
    }
}

#[async_trait]
impl Uploads for LocalUploads {
    async fn upload(&self, file: UploadedFile) -> Result<String, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if file.bytes.len() > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge(file.bytes.len()));
        }
        let ext = extension_of(file.file_name.as_deref())?;

        let name = format!("{}.{ext}", calculate_hash(&file.bytes));
        let path = self.dir.join(&name);

        tokio::fs::create_dir_all(&self.dir).await?;
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(file = %name, "Upload already stored");
        } else {
            tokio::fs::write(&path, &file.bytes).await?;
            tracing::info!(file = %name, size = file.bytes.len(), "Upload stored");
        }

        Ok(format!("{}/{name}", self.public_url))
    }
}
