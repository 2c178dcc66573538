use serde::Serialize;

use crate::services::auth::authorities::Authority;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub authorities: Vec<Authority>,
}
