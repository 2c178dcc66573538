//! Access token (Bearer JWT) verification -> AuthCtx in request extensions.
//!
//! - `Authorization: Bearer <jwt>` is required; anything else is 401 before routing reaches a handler.
//! - Signature / iss / aud / exp / nbf are checked by `AuthService`.
//! - Role claims are turned into authorities by `services::auth::authorities`.
//! - Role requirements are NOT checked here; handlers do that per operation.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Put the access middleware in front of every route of `router`.
///
/// ```ignore
/// let api = middleware::auth::access::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api", api);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take a State extractor, so the state is passed explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized)?;

    let verified = match state.auth.verify_verified(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    let auth_ctx = AuthCtx::new(verified.subject, verified.username)
        .with_authorities(verified.authorities);

    // middleware -> extractor handoff
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
