/*
 * Responsibility
 * - /courses CRUD + query handlers
 * - First statement of every handler is the role check; storage is only touched after it
 * - The {id} path segment is a public id, decoded by the PublicCourseId extractor
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::courses::{CourseRequest, CourseResponse, DurationQuery, SearchQuery},
        extractors::{AuthCtxExtractor, PublicCourseId},
    },
    error::AppError,
    repos::course_repo::{CourseDraft, CourseRow},
    services::auth::policy::{ADMIN_ONLY, STUDENT_OR_ADMIN, authorize},
    state::AppState,
};

const COURSE: &str = "course";

fn row_to_response(state: &AppState, row: CourseRow) -> Result<CourseResponse, AppError> {
    Ok(CourseResponse {
        id: state.id_codec.encode(row.id)?,
        title: row.title,
        description: row.description,
        instructor: row.instructor,
        duration_hours: row.duration_hours,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_response(
    state: &AppState,
    rows: Vec<CourseRow>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let res = rows
        .into_iter()
        .map(|row| row_to_response(state, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

fn validated(req: &CourseRequest) -> Result<(), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_FAILED", msg))
}

pub async fn list_courses(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    authorize(&auth, STUDENT_OR_ADMIN)?;

    let rows = state.courses.find_all().await?;
    rows_to_response(&state, rows)
}

pub async fn get_course(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    course_id: PublicCourseId,
) -> Result<Json<CourseResponse>, AppError> {
    authorize(&auth, STUDENT_OR_ADMIN)?;

    let row = state
        .courses
        .find_by_id(course_id.id)
        .await?
        .ok_or(AppError::not_found(COURSE))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn search_courses(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    authorize(&auth, STUDENT_OR_ADMIN)?;

    let rows = state
        .courses
        .find_by_title_substring(&query.title, true)
        .await?;
    rows_to_response(&state, rows)
}

pub async fn list_courses_by_instructor(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(instructor): Path<String>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    authorize(&auth, STUDENT_OR_ADMIN)?;

    let rows = state.courses.find_by_instructor(&instructor).await?;
    rows_to_response(&state, rows)
}

pub async fn list_courses_by_max_duration(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Query(query): Query<DurationQuery>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    authorize(&auth, STUDENT_OR_ADMIN)?;

    let rows = state.courses.find_by_max_duration(query.max_hours).await?;
    rows_to_response(&state, rows)
}

pub async fn create_course(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Json(req): Json<CourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    authorize(&auth, ADMIN_ONLY)?;
    validated(&req)?;

    let draft = CourseDraft {
        id: None,
        title: req.title,
        description: req.description,
        instructor: req.instructor,
        duration_hours: req.duration_hours,
    };

    // An insert always yields a row; None here means the store broke its contract
    let row = state.courses.save(draft).await?.ok_or(AppError::Internal)?;

    tracing::info!(course_id = row.id, user = %auth.username, "course created");
    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn update_course(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    course_id: PublicCourseId,
    Json(req): Json<CourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    authorize(&auth, ADMIN_ONLY)?;
    validated(&req)?;

    let existing = state
        .courses
        .find_by_id(course_id.id)
        .await?
        .ok_or(AppError::not_found(COURSE))?;

    let mut draft = CourseDraft::from(existing);
    draft.title = req.title;
    draft.description = req.description;
    draft.instructor = req.instructor;
    if req.duration_hours.is_some() {
        draft.duration_hours = req.duration_hours;
    }

    // The row can vanish between the lookup and the write
    let row = state
        .courses
        .save(draft)
        .await?
        .ok_or(AppError::not_found(COURSE))?;

    tracing::info!(course_id = row.id, user = %auth.username, "course updated");
    Ok(Json(row_to_response(&state, row)?))
}

pub async fn delete_course(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    course_id: PublicCourseId,
) -> Result<StatusCode, AppError> {
    authorize(&auth, ADMIN_ONLY)?;

    let existing = state
        .courses
        .find_by_id(course_id.id)
        .await?
        .ok_or(AppError::not_found(COURSE))?;

    if !state.courses.delete(&existing).await? {
        return Err(AppError::not_found(COURSE));
    }

    tracing::info!(course_id = existing.id, user = %auth.username, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}
