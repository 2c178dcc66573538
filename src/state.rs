/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - course store, id codec, access token verifier
 * - Meant to be cloned per request (everything inside is Arc / cheap Clone)
 */
use std::sync::Arc;

use crate::repos::course_repo::CourseRepo;
use crate::services::{auth::AuthService, id_codec::IdCodec};

#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<dyn CourseRepo>,
    pub id_codec: IdCodec,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(courses: Arc<dyn CourseRepo>, id_codec: IdCodec, auth: Arc<AuthService>) -> Self {
        Self {
            courses,
            id_codec,
            auth,
        }
    }
}
