//! Course levels and scheduling rules.

use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Level constants
// ---------------------------------------------------------------------------

pub const LEVEL_BEGINNER: &str = "beginner";
pub const LEVEL_INTERMEDIATE: &str = "intermediate";
pub const LEVEL_ADVANCED: &str = "advanced";

/// All valid course levels.
pub const VALID_LEVELS: &[&str] = &[LEVEL_BEGINNER, LEVEL_INTERMEDIATE, LEVEL_ADVANCED];

/// Minimum seats a course may offer.
pub const MIN_CAPACITY: i32 = 1;

/// Minimum course duration in hours.
pub const MIN_DURATION_HOURS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => LEVEL_BEGINNER,
            Self::Intermediate => LEVEL_INTERMEDIATE,
            Self::Advanced => LEVEL_ADVANCED,
        }
    }
}

impl FromStr for CourseLevel {
    type Err = CoreError;

    /// Accepts the stored English names and the French labels used by the
    /// front-end forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            LEVEL_BEGINNER | "débutant" | "debutant" => Ok(Self::Beginner),
            LEVEL_INTERMEDIATE | "intermédiaire" | "intermediaire" => Ok(Self::Intermediate),
            LEVEL_ADVANCED | "avancé" | "avance" => Ok(Self::Advanced),
            other => Err(CoreError::Validation(format!(
                "Unknown course level: '{other}'. Valid levels: {}",
                VALID_LEVELS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// The end date must fall strictly after the start date.
pub fn validate_schedule(start: Date, end: Date) -> Result<(), String> {
    if end <= start {
        return Err("end_date must be after start_date".to_string());
    }
    Ok(())
}

pub fn validate_capacity(capacity: i32) -> Result<(), String> {
    if capacity < MIN_CAPACITY {
        return Err(format!("capacity must be at least {MIN_CAPACITY}"));
    }
    Ok(())
}

pub fn validate_duration(hours: i32) -> Result<(), String> {
    if hours < MIN_DURATION_HOURS {
        return Err(format!("duration_hours must be at least {MIN_DURATION_HOURS}"));
    }
    Ok(())
}

/// A course cannot shrink below the seats already taken.
pub fn validate_capacity_change(new_capacity: i32, active_enrollments: i64) -> Result<(), CoreError> {
    if i64::from(new_capacity) < active_enrollments {
        return Err(CoreError::Conflict(format!(
            "Capacity {new_capacity} is below the {active_enrollments} active enrollments"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn schedule_requires_end_after_start() {
        assert!(validate_schedule(d(2024, 3, 1), d(2024, 3, 2)).is_ok());
        assert!(validate_schedule(d(2024, 3, 1), d(2024, 3, 1)).is_err());
        assert!(validate_schedule(d(2024, 3, 2), d(2024, 3, 1)).is_err());
    }

    #[test]
    fn capacity_and_duration_floor_at_one() {
        assert!(validate_capacity(1).is_ok());
        assert!(validate_capacity(0).is_err());
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(-5).is_err());
    }

    #[test]
    fn capacity_cannot_drop_below_active_enrollments() {
        assert!(validate_capacity_change(10, 10).is_ok());
        assert!(matches!(
            validate_capacity_change(9, 10),
            Err(CoreError::Conflict(_))
        ));
    }

    #[test]
    fn level_parses_french_labels() {
        assert_eq!("Débutant".parse::<CourseLevel>().unwrap(), CourseLevel::Beginner);
        assert_eq!("intermediaire".parse::<CourseLevel>().unwrap(), CourseLevel::Intermediate);
        assert_eq!("ADVANCED".parse::<CourseLevel>().unwrap(), CourseLevel::Advanced);
        assert!("expert".parse::<CourseLevel>().is_err());
    }
}
