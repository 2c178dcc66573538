/*
 * Responsibility
 * - URL layout of the course API (mounted under /api by app.rs)
 * - Role requirements live in the handlers; authentication is applied to this whole router
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    courses::{
        create_course, delete_course, get_course, list_courses, list_courses_by_instructor,
        list_courses_by_max_duration, search_courses, update_course,
    },
    me::me,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/search", get(search_courses))
        .route("/courses/duration", get(list_courses_by_max_duration))
        .route(
            "/courses/instructor/{instructor}",
            get(list_courses_by_instructor),
        )
        .route(
            "/courses/{course_id}",
            get(get_course).put(update_course).delete(delete_course),
        )
}
