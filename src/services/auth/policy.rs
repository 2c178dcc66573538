//! Role requirements per operation and the single check that enforces them.
//!
//! Handlers declare a `Requirement` and call `authorize` before touching storage.

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;

pub const ROLE_STUDENT: &str = "ROLE_STUDENT";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Caller must hold at least one of these authorities.
    AnyOf(&'static [&'static str]),
    /// Any verified caller, with or without roles.
    Authenticated,
}

pub const STUDENT_OR_ADMIN: Requirement = Requirement::AnyOf(&[ROLE_STUDENT, ROLE_ADMIN]);
pub const ADMIN_ONLY: Requirement = Requirement::AnyOf(&[ROLE_ADMIN]);

impl Requirement {
    pub fn is_satisfied_by(&self, ctx: &AuthCtx) -> bool {
        match self {
            Requirement::AnyOf(wanted) => ctx.has_any_authority(wanted),
            Requirement::Authenticated => true,
        }
    }
}

pub fn authorize(ctx: &AuthCtx, requirement: Requirement) -> Result<(), AppError> {
    if requirement.is_satisfied_by(ctx) {
        return Ok(());
    }

    tracing::info!(
        sub = %ctx.subject,
        user = %ctx.username,
        authorities = ?ctx.authorities,
        ?requirement,
        "access denied"
    );
    Err(AppError::Forbidden)
}
