//! Domain rules for the training-center backend.
//!
//! Constants, status enums, and pure validators shared by the repository
//! and HTTP layers. Nothing in this crate performs I/O.

pub mod course;
pub mod enrollment;
pub mod error;
pub mod pagination;
pub mod trainee;
pub mod types;
pub mod upload;
pub mod validation;
