pub mod course;
pub mod enrollment;
pub mod trainee;
pub mod trainer;
