/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{AccessJwtError, AuthService};

pub fn build_auth_service(config: &AuthConfig) -> Result<Arc<AuthService>, AccessJwtError> {
    let auth = AuthService::from_pem(
        &config.public_key_pem,
        config.algorithm,
        &config.issuer,
        config.audience.as_deref(),
        config.leeway_seconds,
        config.principal_claim.clone(),
    )
    .inspect_err(|err| {
        tracing::error!(error = %err, algorithm = ?config.algorithm, "invalid access token public key");
    })?;

    Ok(Arc::new(auth))
}
