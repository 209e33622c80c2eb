//! Multipart form parsing for the create/update endpoints.
//!
//! The browser front-end submits entity forms as `multipart/form-data` with
//! text fields plus at most one file field. [`FormData`] collects both; the
//! `parse_*` helpers turn text fields into typed values while recording
//! failures in a [`FieldErrors`] accumulator.

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use campus_core::types::Date;
use campus_core::validation::FieldErrors;

use crate::error::{AppError, AppResult};
use crate::extract::rejection_error;

/// Date format accepted in form fields (`<input type="date">`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A malformed or oversized multipart stream, as a JSON error.
fn multipart_error(err: MultipartError) -> AppError {
    rejection_error(err.status(), err.body_text())
}

/// A file part received in a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied file name (used only for its extension).
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Text fields and the optional file of a multipart form.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl FormData {
    /// Drain a multipart body. The part named `file_field` is kept as the
    /// upload; an empty file part (no file chosen in the browser) is ignored.
    pub async fn from_multipart(mut multipart: Multipart, file_field: &str) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == file_field {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            } else if !name.is_empty() {
                let text = field
                    .text()
                    .await
                    .map_err(multipart_error)?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Build a form directly from text pairs.
    #[cfg(test)]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    /// The trimmed value of `name`, or `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The trimmed value of `name` as an owned string.
    pub fn string(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }
}

/// Parse a `YYYY-MM-DD` date, recording a field error on failure.
pub fn parse_date(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<Date> {
    let value = value?;
    match Date::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, format!("{field} must be a date formatted YYYY-MM-DD"));
            None
        }
    }
}

/// Parse an integer field, recording a field error on failure.
pub fn parse_number<T: FromStr>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(field, format!("{field} must be a whole number"));
            None
        }
    }
}

/// Parse an enum-valued field through its `FromStr`, recording the parser's
/// message on failure.
pub fn parse_enum<T>(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<T>
where
    T: FromStr<Err = campus_core::error::CoreError>,
{
    let value = value?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(campus_core::error::CoreError::Validation(msg)) => {
            errors.add(field, msg);
            None
        }
        Err(other) => {
            errors.add(field, other.to_string());
            None
        }
    }
}
