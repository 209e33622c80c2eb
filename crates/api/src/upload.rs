//! Local-disk storage for uploaded photos.
//!
//! Files are written under the configured upload directory with a generated
//! name and served back by the router under `/uploads`. Only the bare file
//! name is persisted on the entity row.

use std::path::PathBuf;

use campus_core::error::{CoreError, FieldError};
use campus_core::upload::{is_safe_file_name, stored_file_name, validate_photo};

use crate::error::{AppError, AppResult};
use crate::form::UploadedFile;

/// Writes and removes uploaded photos in a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    /// Whether the upload directory exists and is a directory.
    pub async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    /// Check a file against the type and size rules, returning its extension.
    pub fn check(&self, file: &UploadedFile) -> Result<String, String> {
        validate_photo(
            &file.file_name,
            file.content_type.as_deref(),
            file.data.len(),
            self.max_bytes,
        )
    }

    /// Validate and persist `file`, returning the stored file name.
    ///
    /// A rejected file surfaces as a validation error on `field`.
    pub async fn save(&self, field: &str, file: &UploadedFile) -> AppResult<String> {
        let ext = self.check(file).map_err(|message| {
            AppError::Core(CoreError::InvalidFields(vec![FieldError {
                field: field.to_string(),
                message,
            }]))
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

        let name = stored_file_name(&ext, chrono::Utc::now());
        tokio::fs::write(self.dir.join(&name), &file.data)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

        tracing::debug!(file = %name, bytes = file.data.len(), "Stored upload");
        Ok(name)
    }

    /// Save `file` when present.
    pub async fn save_opt(
        &self,
        field: &str,
        file: Option<&UploadedFile>,
    ) -> AppResult<Option<String>> {
        match file {
            Some(file) => self.save(field, file).await.map(Some),
            None => Ok(None),
        }
    }

    /// Delete a stored file. Failures are logged and otherwise ignored.
    pub async fn remove(&self, name: &str) {
        if !is_safe_file_name(name) {
            tracing::warn!(file = %name, "Refusing to remove upload with unsafe name");
            return;
        }
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => tracing::debug!(file = %name, "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = %name, error = %e, "Failed to remove upload"),
        }
    }

    /// [`remove`](Self::remove) for an optional name.
    pub async fn remove_opt(&self, name: Option<&str>) {
        if let Some(name) = name {
            self.remove(name).await;
        }
    }
}
