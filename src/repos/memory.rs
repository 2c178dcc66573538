//! In-memory `CourseRepo` for tests. Not a system of record.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::repos::course_repo::{CourseDraft, CourseRepo, CourseRow};
use crate::repos::error::RepoError;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, CourseRow>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCourseRepo {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryCourseRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<CourseRow> {
        self.inner.read().await.rows.values().cloned().collect()
    }

    fn filtered(rows: &BTreeMap<i64, CourseRow>, keep: impl Fn(&CourseRow) -> bool) -> Vec<CourseRow> {
        rows.values().filter(|r| keep(r)).cloned().collect()
    }
}

#[async_trait]
impl CourseRepo for MemoryCourseRepo {
    async fn find_all(&self) -> Result<Vec<CourseRow>, RepoError> {
        Ok(self.snapshot().await)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CourseRow>, RepoError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_by_title_substring(
        &self,
        text: &str,
        case_insensitive: bool,
    ) -> Result<Vec<CourseRow>, RepoError> {
        let inner = self.inner.read().await;
        let rows = if case_insensitive {
            let needle = text.to_lowercase();
            Self::filtered(&inner.rows, |r| r.title.to_lowercase().contains(&needle))
        } else {
            Self::filtered(&inner.rows, |r| r.title.contains(text))
        };
        Ok(rows)
    }

    async fn find_by_instructor(&self, instructor: &str) -> Result<Vec<CourseRow>, RepoError> {
        let inner = self.inner.read().await;
        Ok(Self::filtered(&inner.rows, |r| {
            r.instructor.as_deref() == Some(instructor)
        }))
    }

    async fn find_by_max_duration(&self, max_hours: i32) -> Result<Vec<CourseRow>, RepoError> {
        let inner = self.inner.read().await;
        Ok(Self::filtered(&inner.rows, |r| {
            r.duration_hours.is_some_and(|h| h <= max_hours)
        }))
    }

    async fn save(&self, course: CourseDraft) -> Result<Option<CourseRow>, RepoError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        match course.id {
            None => {
                inner.next_id += 1;
                let row = CourseRow {
                    id: inner.next_id,
                    title: course.title,
                    description: course.description,
                    instructor: course.instructor,
                    duration_hours: course.duration_hours,
                    created_at: now,
                    updated_at: now,
                };
                inner.rows.insert(row.id, row.clone());
                Ok(Some(row))
            }
            Some(id) => {
                let Some(row) = inner.rows.get_mut(&id) else {
                    return Ok(None);
                };
                row.title = course.title;
                row.description = course.description;
                row.instructor = course.instructor;
                row.duration_hours = course.duration_hours;
                row.updated_at = now;
                Ok(Some(row.clone()))
            }
        }
    }

    async fn delete(&self, course: &CourseRow) -> Result<bool, RepoError> {
        Ok(self.inner.write().await.rows.remove(&course.id).is_some())
    }
}

/// Every call fails like a dropped database connection.
#[derive(Debug, Clone, Default)]
pub struct FailingCourseRepo;

#[async_trait]
impl CourseRepo for FailingCourseRepo {
    async fn find_all(&self) -> Result<Vec<CourseRow>, RepoError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<CourseRow>, RepoError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_title_substring(
        &self,
        _text: &str,
        _case_insensitive: bool,
    ) -> Result<Vec<CourseRow>, RepoError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_instructor(&self, _instructor: &str) -> Result<Vec<CourseRow>, RepoError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_max_duration(&self, _max_hours: i32) -> Result<Vec<CourseRow>, RepoError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn save(&self, _course: CourseDraft) -> Result<Option<CourseRow>, RepoError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn delete(&self, _course: &CourseRow) -> Result<bool, RepoError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, instructor: &str, hours: Option<i32>) -> CourseDraft {
        CourseDraft {
            id: None,
            title: title.to_string(),
            description: format!("{title} description"),
            instructor: Some(instructor.to_string()),
            duration_hours: hours,
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_timestamps() {
        let repo = MemoryCourseRepo::new();
        let a = repo.save(draft("A", "x", None)).await.unwrap().unwrap();
        let b = repo.save(draft("B", "x", None)).await.unwrap().unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn update_of_missing_id_changes_nothing() {
        let repo = MemoryCourseRepo::new();
        repo.save(draft("A", "x", None)).await.unwrap();
        let before = repo.snapshot().await;

        let mut ghost = draft("Ghost", "y", None);
        ghost.id = Some(99);
        assert!(repo.save(ghost).await.unwrap().is_none());
        assert_eq!(repo.snapshot().await, before);
    }

    #[tokio::test]
    async fn queries_filter_as_documented() {
        let repo = MemoryCourseRepo::new();
        repo.save(draft("Spring Boot Basics", "John Doe", Some(10))).await.unwrap();
        repo.save(draft("React Fundamentals", "Jane Smith", Some(20))).await.unwrap();

        let hits = repo.find_by_title_substring("spring", true).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Spring Boot Basics");
        assert!(repo.find_by_title_substring("spring", false).await.unwrap().is_empty());

        assert_eq!(repo.find_by_instructor("Jane Smith").await.unwrap().len(), 1);
        assert!(repo.find_by_instructor("jane smith").await.unwrap().is_empty());

        assert_eq!(repo.find_by_max_duration(10).await.unwrap().len(), 1);
        assert_eq!(repo.find_by_max_duration(20).await.unwrap().len(), 2);
    }
}
