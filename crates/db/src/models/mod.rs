//! Row structs and DTOs, one module per table.

pub mod course;
pub mod enrollment;
pub mod page;
pub mod stats;
pub mod trainee;
pub mod trainer;
