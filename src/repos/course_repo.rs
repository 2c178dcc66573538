/*
 * Responsibility
 * - Course store contract (CourseRepo) + the Postgres implementation
 * - save() is insert-or-update keyed on the presence of an id
 * - Errors come back as RepoError; "not found" is Option / bool, never an error
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub instructor: Option<String>,
    pub duration_hours: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable part of a course. `id: None` means "insert".
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub instructor: Option<String>,
    pub duration_hours: Option<i32>,
}

impl From<CourseRow> for CourseDraft {
    fn from(row: CourseRow) -> Self {
        Self {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            instructor: row.instructor,
            duration_hours: row.duration_hours,
        }
    }
}

/// Storage collaborator for courses. Implementations handle their own concurrency.
#[async_trait]
pub trait CourseRepo: Send + Sync + 'static {
    async fn find_all(&self) -> Result<Vec<CourseRow>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CourseRow>, RepoError>;

    async fn find_by_title_substring(
        &self,
        text: &str,
        case_insensitive: bool,
    ) -> Result<Vec<CourseRow>, RepoError>;

    // Exact match
    async fn find_by_instructor(&self, instructor: &str) -> Result<Vec<CourseRow>, RepoError>;

    async fn find_by_max_duration(&self, max_hours: i32) -> Result<Vec<CourseRow>, RepoError>;

    /// Insert (id assigned, both timestamps set) or update (updated_at refreshed).
    /// Returns `None` when updating an id that no longer exists.
    async fn save(&self, course: CourseDraft) -> Result<Option<CourseRow>, RepoError>;

    async fn delete(&self, course: &CourseRow) -> Result<bool, RepoError>;
}

const COLUMNS: &str =
    "id, title, description, instructor, duration_hours, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgCourseRepo {
    db: PgPool,
}

impl PgCourseRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepo for PgCourseRepo {
    async fn find_all(&self) -> Result<Vec<CourseRow>, RepoError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COLUMNS} FROM courses ORDER BY id"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CourseRow>, RepoError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_by_title_substring(
        &self,
        text: &str,
        case_insensitive: bool,
    ) -> Result<Vec<CourseRow>, RepoError> {
        // strpos instead of LIKE: user input may contain % or _
        let predicate = if case_insensitive {
            "strpos(lower(title), lower($1)) > 0"
        } else {
            "strpos(title, $1) > 0"
        };

        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COLUMNS} FROM courses WHERE {predicate} ORDER BY id"
        ))
        .bind(text)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn find_by_instructor(&self, instructor: &str) -> Result<Vec<CourseRow>, RepoError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COLUMNS} FROM courses WHERE instructor = $1 ORDER BY id"
        ))
        .bind(instructor)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn find_by_max_duration(&self, max_hours: i32) -> Result<Vec<CourseRow>, RepoError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COLUMNS} FROM courses WHERE duration_hours <= $1 ORDER BY id"
        ))
        .bind(max_hours)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn save(&self, course: CourseDraft) -> Result<Option<CourseRow>, RepoError> {
        let row = match course.id {
            None => {
                let row = sqlx::query_as::<_, CourseRow>(&format!(
                    r#"
                    INSERT INTO courses (title, description, instructor, duration_hours)
                    VALUES ($1, $2, $3, $4)
                    RETURNING {COLUMNS}
                    "#
                ))
                .bind(&course.title)
                .bind(&course.description)
                .bind(&course.instructor)
                .bind(course.duration_hours)
                .fetch_one(&self.db)
                .await?;

                Some(row)
            }
            Some(id) => {
                sqlx::query_as::<_, CourseRow>(&format!(
                    r#"
                    UPDATE courses
                    SET
                        title = $2,
                        description = $3,
                        instructor = $4,
                        duration_hours = $5,
                        updated_at = now()
                    WHERE id = $1
                    RETURNING {COLUMNS}
                    "#
                ))
                .bind(id)
                .bind(&course.title)
                .bind(&course.description)
                .bind(&course.instructor)
                .bind(course.duration_hours)
                .fetch_optional(&self.db)
                .await?
            }
        };

        Ok(row)
    }

    async fn delete(&self, course: &CourseRow) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course.id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
