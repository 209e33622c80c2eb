//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any Postgres executor, for calls that must run
//! inside a transaction) as the first argument.

pub mod course_repo;
pub mod enrollment_repo;
pub mod trainee_repo;
pub mod trainer_repo;

pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use trainee_repo::TraineeRepo;
pub use trainer_repo::TrainerRepo;
