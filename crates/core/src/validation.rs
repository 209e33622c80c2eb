//! Field-level input validation.
//!
//! Handlers collect every problem with a request into a [`FieldErrors`]
//! accumulator and turn it into a single [`CoreError::InvalidFields`], so a
//! form submission reports all of its bad fields at once instead of the
//! first one only.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::{CoreError, FieldError};

/// Digits with optional leading `+`, separated by spaces, dots, dashes or
/// parentheses.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ().-]{6,20}$").expect("valid regex"));

/// Fewest digits a phone number may carry.
const MIN_PHONE_DIGITS: usize = 6;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length for person names, titles, categories and specialties.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for emails.
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum length for free text (descriptions, bios, addresses).
pub const MAX_TEXT_LEN: usize = 5_000;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Check an email address against the HTML5 email grammar.
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Check a phone number for a plausible shape.
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    PHONE_RE.is_match(phone) && phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// Normalize an email for storage and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Collects field-level validation failures.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Record a failure unless `ok` holds.
    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Require a non-blank value, returning it trimmed.
    pub fn require<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.add(field, format!("{field} is required"));
                None
            }
        }
    }

    /// Reject values longer than `max` characters.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("{field} must be at most {max} characters"));
        }
    }

    /// Reject malformed email addresses.
    pub fn email(&mut self, field: &str, value: &str) {
        self.max_len(field, value, MAX_EMAIL_LEN);
        if !is_valid_email(value.trim()) {
            self.add(field, format!("{field} must be a valid email address"));
        }
    }

    /// Reject malformed phone numbers.
    pub fn phone(&mut self, field: &str, value: &str) {
        if !is_valid_phone(value) {
            self.add(field, format!("{field} must be a valid phone number"));
        }
    }

    /// Fold a validator result into the accumulator.
    pub fn merge(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise every recorded failure.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self.errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_email() {
        assert!(is_valid_email("jane.doe@example.com"));
    }

    #[test]
    fn rejects_email_without_at_sign() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn phone_accepts_common_formats() {
        assert!(is_valid_phone("+33 6 12 34 56 78"));
        assert!(is_valid_phone("06.12.34.56.78"));
        assert!(is_valid_phone("(555) 123-4567"));
    }

    #[test]
    fn phone_rejects_letters_and_short_values() {
        assert!(!is_valid_phone("call me"));
        assert!(!is_valid_phone("123"));
        assert!(!is_valid_phone("--------"));
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn require_trims_and_reports_blank() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.require("first_name", Some("  Ada ")), Some("Ada"));
        assert_eq!(errors.require("last_name", Some("   ")), None);
        assert_eq!(errors.require("email", None), None);

        match errors.into_result() {
            Err(CoreError::InvalidFields(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, ["last_name", "email"]);
                assert_eq!(fields[0].message, "last_name is required");
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn max_len_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        errors.max_len("title", "éééé", 4);
        assert!(errors.is_empty());
        errors.max_len("title", "ééééé", 4);
        assert!(!errors.is_empty());
    }

    #[test]
    fn merge_records_only_errors() {
        let mut errors = FieldErrors::new();
        errors.merge("capacity", Ok(()));
        assert!(errors.is_empty());
        errors.merge("capacity", Err("capacity must be at least 1".into()));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_accumulator_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
