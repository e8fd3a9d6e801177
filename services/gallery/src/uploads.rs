//! Upload validation and on-disk storage for photo files.
//!
//! # Purpose
//! Enforces the per-request file count, per-file size, and content-type rules,
//! and writes accepted files into the upload directory under generated names.
//!
//! # Key invariants
//! - Stored names are `<uuid>.<ext>`; the extension is kept only when it is a
//!   short alphanumeric token, so a client cannot influence the path.
//! - Files are served back under `/uploads/<name>`; `remove_src` resolves only
//!   the final path component, never a client-controlled directory.
//! - Cleanup (`discard`, `abort`) is best effort and only logs failures.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub const DEFAULT_MAX_FILES: usize = 50;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Public URL prefix the upload directory is served under.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

// Room for multipart boundaries, headers, and the caption field.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid file type: {0}")]
    InvalidType(String),
    #[error("file {name} exceeds the {limit} byte limit")]
    TooLarge { name: String, limit: u64 },
    #[error("too many files; at most {0} per request")]
    TooManyFiles(usize),
    #[error("unexpected file field: {0}")]
    UnexpectedField(String),
    #[error("malformed upload: {0}")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Metric label for rejected uploads.
    pub fn reason(&self) -> &'static str {
        match self {
            UploadError::InvalidType(_) => "content_type",
            UploadError::TooLarge { .. } => "too_large",
            UploadError::TooManyFiles(_) => "too_many_files",
            UploadError::UnexpectedField(_) => "unexpected_field",
            UploadError::Malformed(_) => "malformed",
            UploadError::Io(_) => "io",
        }
    }

    /// Whether the request itself was at fault (as opposed to local I/O).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Io(_))
    }
}

#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_content_types: DEFAULT_CONTENT_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }
}

impl UploadLimits {
    pub fn check_content_type(&self, content_type: Option<&str>) -> Result<(), UploadError> {
        let Some(content_type) = content_type else {
            return Err(UploadError::InvalidType("missing content type".to_string()));
        };
        // Ignore parameters such as `; charset=...`.
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
        {
            Ok(())
        } else {
            Err(UploadError::InvalidType(essence))
        }
    }

    pub fn check_count(&self, accepted: usize) -> Result<(), UploadError> {
        if accepted >= self.max_files {
            return Err(UploadError::TooManyFiles(self.max_files));
        }
        Ok(())
    }

    /// Body limit for the upload route: every file at full size plus framing.
    pub fn request_body_limit(&self) -> usize {
        let per_file = usize::try_from(self.max_file_bytes).unwrap_or(usize::MAX);
        per_file
            .saturating_mul(self.max_files)
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

/// A file accepted and written into the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    pub original_name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl StoredFile {
    pub fn src(&self) -> String {
        format!("{UPLOAD_URL_PREFIX}/{}", self.file_name)
    }
}

#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Open a new file for an incoming upload. Bytes are checked against
    /// `limit` as they arrive.
    pub async fn begin(&self, original_name: &str, limit: u64) -> Result<PendingFile, UploadError> {
        self.ensure().await?;
        let file_name = unique_file_name(original_name);
        let path = self.root.join(&file_name);
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        Ok(PendingFile {
            file,
            limit,
            stored: StoredFile {
                file_name,
                original_name: original_name.to_string(),
                path,
                size: 0,
            },
        })
    }

    /// Remove files written for a request that did not complete.
    pub async fn discard(&self, files: &[StoredFile]) {
        for file in files {
            if let Err(err) = tokio::fs::remove_file(&file.path).await
                && err.kind() != ErrorKind::NotFound
            {
                tracing::warn!(error = %err, path = %file.path.display(), "failed to discard upload");
            }
        }
    }

    /// Delete the file a photo `src` points at. Returns `false` when the file
    /// was already gone.
    pub async fn remove_src(&self, src: &str) -> std::io::Result<bool> {
        let Some(path) = self.resolve_src(src) else {
            return Ok(false);
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn resolve_src(&self, src: &str) -> Option<PathBuf> {
        let name = Path::new(src).file_name()?.to_str()?;
        if name.is_empty() || name == ".." {
            return None;
        }
        Some(self.root.join(name))
    }
}

/// An upload being streamed to disk.
#[derive(Debug)]
pub struct PendingFile {
    file: tokio::fs::File,
    limit: u64,
    stored: StoredFile,
}

impl PendingFile {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        let size = self.stored.size + chunk.len() as u64;
        if size > self.limit {
            return Err(UploadError::TooLarge {
                name: self.stored.original_name.clone(),
                limit: self.limit,
            });
        }
        self.file.write_all(chunk).await?;
        self.stored.size = size;
        Ok(())
    }

    /// Flush the file to disk. On failure the partial file is removed.
    pub async fn finish(mut self) -> Result<StoredFile, UploadError> {
        if let Err(err) = self.file.flush().await {
            self.abort().await;
            return Err(err.into());
        }
        Ok(self.stored)
    }

    /// Close and delete the partial file.
    pub async fn abort(self) {
        let PendingFile { file, stored, .. } = self;
        drop(file);
        if let Err(err) = tokio::fs::remove_file(&stored.path).await
            && err.kind() != ErrorKind::NotFound
        {
            tracing::warn!(error = %err, path = %stored.path.display(), "failed to remove partial upload");
        }
    }
}

fn unique_file_name(original_name: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match preserved_extension(original_name) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

fn preserved_extension(original_name: &str) -> Option<&str> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|ch| ch.is_ascii_alphanumeric());
    valid.then_some(ext)
}
