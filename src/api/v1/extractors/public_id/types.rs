/**
 * Responsibility
 *  - Declare a typed public id per resource
 *  - Everything pub here is re-exported through ./mod.rs
 */
use super::core::PublicId;

// courses
pub enum CourseTag {}
pub type PublicCourseId = PublicId<CourseTag>;
