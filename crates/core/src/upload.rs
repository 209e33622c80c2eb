//! Photo upload constraints and stored-file naming.

use std::path::Path;

use crate::types::Timestamp;

/// Largest accepted photo, in bytes (2 MiB).
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Accepted photo file extensions (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Accepted photo MIME types.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// URL prefix under which stored uploads are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Lowercased extension of `file_name`, if any.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Check an uploaded photo, returning its normalized extension.
pub fn validate_photo(
    file_name: &str,
    content_type: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<String, String> {
    if size == 0 {
        return Err("uploaded file is empty".to_string());
    }
    if size > max_bytes {
        return Err(format!("file exceeds the {max_bytes} byte limit"));
    }
    let ext = extension_of(file_name)
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| {
            format!(
                "unsupported file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )
        })?;
    if let Some(ct) = content_type {
        if !ALLOWED_MIME_TYPES.contains(&ct.to_lowercase().as_str()) {
            return Err(format!("unsupported content type '{ct}'"));
        }
    }
    Ok(ext)
}

/// Generate a collision-free name for a stored upload.
pub fn stored_file_name(ext: &str, now: Timestamp) -> String {
    format!(
        "{}-{}.{ext}",
        now.timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Whether `name` is a bare file name that cannot escape the upload directory.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.starts_with('.')
}
