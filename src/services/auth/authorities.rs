//! Claim set -> authority set conversion.
//!
//! Keycloak puts roles in two places:
//! - `realm_access.roles`: realm-wide roles
//! - `resource_access.<client>.roles`: roles scoped to one client
//!
//! Both are flattened into one ordered list of `ROLE_`-prefixed authorities.
//! The payload comes from an external system, so every shape mismatch is skipped
//! instead of failing the request. Duplicates are kept as-is.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

pub const ROLE_PREFIX: &str = "ROLE_";

/// Untyped, already verified JWT payload.
pub type ClaimSet = Map<String, Value>;

/// A normalized role string. Always carries `ROLE_` exactly once at the front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    /// `ADMIN` -> `ROLE_ADMIN`, `ROLE_ADMIN` -> `ROLE_ADMIN`. Case and whitespace are untouched.
    pub fn from_role(role: &str) -> Self {
        if role.starts_with(ROLE_PREFIX) {
            Self(role.to_string())
        } else {
            Self(format!("{ROLE_PREFIX}{role}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The role-bearing part of a claim set.
///
/// - `realm`: None when `realm_access` or its `roles` is missing / not a list
/// - `resources`: one entry per `resource_access` key whose value is an object,
///   in payload order; the inner None means "no usable `roles` field"
#[derive(Debug, Default, PartialEq)]
pub struct RoleClaims {
    pub realm: Option<Vec<String>>,
    pub resources: Vec<(String, Option<Vec<String>>)>,
}

fn roles_field(access: &Map<String, Value>) -> Option<Vec<String>> {
    let roles = access.get("roles")?.as_array()?;

    Some(
        roles
            .iter()
            .filter_map(|r| r.as_str().map(str::to_string))
            .collect(),
    )
}

impl RoleClaims {
    pub fn from_claims(claims: &ClaimSet) -> Self {
        let realm = claims
            .get("realm_access")
            .and_then(Value::as_object)
            .and_then(roles_field);

        let resources = claims
            .get("resource_access")
            .and_then(Value::as_object)
            .map(|resources| {
                resources
                    .iter()
                    // non-object entries are skipped entirely
                    .filter_map(|(resource, access)| {
                        access
                            .as_object()
                            .map(|access| (resource.clone(), roles_field(access)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { realm, resources }
    }

    /// Realm roles first, then each resource's roles in iteration order.
    pub fn into_authorities(self) -> Vec<Authority> {
        let realm = self.realm.into_iter().flatten();
        let resources = self
            .resources
            .into_iter()
            .flat_map(|(_, roles)| roles.into_iter().flatten());

        realm
            .chain(resources)
            .map(|role| Authority::from_role(&role))
            .collect()
    }
}

/// Never fails; a token without usable role claims yields an empty set.
pub fn extract_authorities(claims: &ClaimSet) -> Vec<Authority> {
    let authorities = RoleClaims::from_claims(claims).into_authorities();

    tracing::debug!(?claims, ?authorities, "extracted authorities from jwt claims");

    authorities
}
