//! Trainee status values and birth-date rules.

use std::str::FromStr;

use chrono::Datelike;

use crate::error::CoreError;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Trainee may enroll in courses.
pub const STATUS_ACTIVE: &str = "active";
/// Trainee was soft-deleted; kept for enrollment history.
pub const STATUS_INACTIVE: &str = "inactive";

/// All valid trainee statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_INACTIVE];

/// Oldest plausible trainee, in years.
pub const MAX_AGE: i32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraineeStatus {
    Active,
    Inactive,
}

impl TraineeStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Inactive => STATUS_INACTIVE,
        }
    }
}

impl FromStr for TraineeStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            STATUS_ACTIVE | "actif" => Ok(Self::Active),
            STATUS_INACTIVE | "inactif" => Ok(Self::Inactive),
            other => Err(CoreError::Validation(format!(
                "Unknown trainee status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Age
// ---------------------------------------------------------------------------

/// Full years elapsed between `birth_date` and `today`.
pub fn age_on(birth_date: Date, today: Date) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Validate a birth date against `today`, returning the derived age.
pub fn validate_birth_date(birth_date: Date, today: Date) -> Result<i32, String> {
    if birth_date > today {
        return Err("birth_date cannot be in the future".to_string());
    }
    let age = age_on(birth_date, today);
    if age > MAX_AGE {
        return Err(format!("birth_date implies an age above {MAX_AGE}"));
    }
    Ok(age)
}
