/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - The access middleware verifies the token, builds this and stores it in request extensions
 *
 * Notes
 * - JWT verification lives in services::auth::access_jwt
 * - Role claims -> authorities lives in services::auth::authorities
 */

use crate::services::auth::authorities::Authority;

/// Context attached to every authenticated request.
///
/// - `subject` is the token `sub`
/// - `username` is the configured principal claim, falling back to `sub`
/// - `authorities` keeps extraction order and duplicates
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub username: String,
    pub authorities: Vec<Authority>,
}

impl AuthCtx {
    pub fn new(subject: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            username: username.into(),
            authorities: Vec::new(),
        }
    }

    pub fn with_authorities(mut self, authorities: Vec<Authority>) -> Self {
        self.authorities = authorities;
        self
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == authority)
    }

    pub fn has_any_authority(&self, wanted: &[&str]) -> bool {
        wanted.iter().any(|w| self.has_authority(w))
    }
}
