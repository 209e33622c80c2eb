//! Enrollment lifecycle, payment status, and seat accounting.

use std::str::FromStr;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_ENROLLED: &str = "enrolled";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid enrollment statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_ENROLLED,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

/// Statuses that occupy a seat in the course.
pub const ACTIVE_STATUSES: &[&str] = &[STATUS_ENROLLED, STATUS_IN_PROGRESS];

pub const PAYMENT_UNPAID: &str = "unpaid";
pub const PAYMENT_PAID: &str = "paid";

/// All valid payment statuses.
pub const VALID_PAYMENT_STATUSES: &[&str] = &[PAYMENT_UNPAID, PAYMENT_PAID];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Enrolled,
    InProgress,
    Completed,
    Cancelled,
}

impl EnrollmentStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => STATUS_ENROLLED,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
            Self::Cancelled => STATUS_CANCELLED,
        }
    }

    /// Whether this status occupies a seat.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Enrolled | Self::InProgress)
    }
}

impl FromStr for EnrollmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            STATUS_ENROLLED | "inscrit" => Ok(Self::Enrolled),
            STATUS_IN_PROGRESS | "in-progress" | "en cours" => Ok(Self::InProgress),
            STATUS_COMPLETED | "terminé" | "termine" => Ok(Self::Completed),
            STATUS_CANCELLED | "canceled" | "annulé" | "annule" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown enrollment status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => PAYMENT_UNPAID,
            Self::Paid => PAYMENT_PAID,
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            PAYMENT_UNPAID | "non payé" | "non paye" => Ok(Self::Unpaid),
            PAYMENT_PAID | "payé" | "paye" => Ok(Self::Paid),
            other => Err(CoreError::Validation(format!(
                "Unknown payment status: '{other}'. Valid statuses: {}",
                VALID_PAYMENT_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Seat accounting
// ---------------------------------------------------------------------------

/// Whether one more active enrollment fits.
pub fn has_capacity(active_enrollments: i64, capacity: i32) -> bool {
    active_enrollments < i64::from(capacity)
}

/// Reject an enrollment that would exceed the course capacity.
pub fn ensure_capacity(active_enrollments: i64, capacity: i32) -> Result<(), CoreError> {
    if has_capacity(active_enrollments, capacity) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Course is full ({active_enrollments}/{capacity} seats taken)"
        )))
    }
}

/// Moving from a seat-free status to a seat-holding one needs a free seat.
pub fn takes_new_seat(from: EnrollmentStatus, to: EnrollmentStatus) -> bool {
    !from.is_active() && to.is_active()
}
