pub mod courses;
pub mod me;
