pub mod course_repo;
pub mod error;
#[cfg(test)]
pub mod memory;
