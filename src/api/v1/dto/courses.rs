/*
 * Responsibility
 * - Courses request/response DTOs
 * - Responses carry the encoded public id (the internal id never leaves the server)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instructor: Option<String>,
    pub duration_hours: Option<i32>,
}

impl CourseRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.description.trim().is_empty() {
            return Err("description is required");
        }
        if self.description.chars().count() > 1000 {
            return Err("description must be <= 1000 chars");
        }
        if let Some(hours) = self.duration_hours
            && hours < 0
        {
            return Err("duration_hours must be >= 0");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct DurationQuery {
    pub max_hours: i32,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: String, // encoded
    pub title: String,
    pub description: String,
    pub instructor: Option<String>,
    pub duration_hours: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
