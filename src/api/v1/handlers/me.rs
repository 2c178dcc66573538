/*
 * Responsibility
 * - GET /me: who the token says the caller is, and what authorities that maps to
 * - Open to any authenticated caller, roles or not
 */
use axum::Json;

use crate::{
    api::v1::{dto::me::MeResponse, extractors::AuthCtxExtractor},
    error::AppError,
    services::auth::policy::{Requirement, authorize},
};

pub async fn me(AuthCtxExtractor(auth): AuthCtxExtractor) -> Result<Json<MeResponse>, AppError> {
    authorize(&auth, Requirement::Authenticated)?;

    Ok(Json(MeResponse {
        username: auth.username,
        authorities: auth.authorities,
    }))
}
