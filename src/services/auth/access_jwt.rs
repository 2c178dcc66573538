use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use thiserror::Error;

use crate::services::auth::authorities::{self, Authority, ClaimSet};

// Errors returned by access-token verification + claim checks.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("unsupported key algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),
}

/// What the access middleware needs from a verified token.
#[derive(Debug, Clone)]
pub struct VerifiedAccessToken {
    pub subject: String,
    pub username: String,
    pub authorities: Vec<Authority>,
}

// The value is returned as-is; blank strings count as absent.
fn non_empty_str<'a>(claims: &'a ClaimSet, name: &str) -> Option<&'a str> {
    claims
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Access-token verifier for tokens signed by the identity provider realm key.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
    principal_claim: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .field("principal_claim", &self.principal_claim)
            .finish()
    }
}

impl AuthService {
    /// Build from a PEM public key. The key family follows `algorithm`.
    pub fn from_pem(
        public_key_pem: &str,
        algorithm: Algorithm,
        issuer: &str,
        audience: Option<&str>,
        leeway_seconds: u64,
        principal_claim: impl Into<String>,
    ) -> Result<Self, AccessJwtError> {
        let pem = public_key_pem.as_bytes();
        let decoding_key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem)?,
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem)?,
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem)?,
            other => return Err(AccessJwtError::UnsupportedAlgorithm(other)),
        };

        Ok(Self::new(
            decoding_key,
            algorithm,
            issuer,
            audience,
            leeway_seconds,
            principal_claim,
        ))
    }

    pub fn new(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        issuer: &str,
        audience: Option<&str>,
        leeway_seconds: u64,
        principal_claim: impl Into<String>,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        // set_issuer/set_audience only compare a claim that is present
        match audience {
            Some(aud) => {
                validation.set_audience(&[aud]);
                validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);
            }
            None => {
                validation.validate_aud = false;
                validation.set_required_spec_claims(&["exp", "iss", "sub"]);
            }
        }
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
            principal_claim: principal_claim.into(),
        }
    }

    /// Verify signature + `exp`/`nbf`/`iss`(/`aud`) and return the raw claim set.
    ///
    /// The payload stays untyped: role claims from the identity provider are
    /// nested, optional, and not under our control.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, AccessJwtError> {
        let data = jsonwebtoken::decode::<ClaimSet>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Verify, then turn the claim set into what the request pipeline uses.
    ///
    /// This is the entry point for the access middleware.
    pub fn verify_verified(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims = self.verify(token)?;

        let subject = non_empty_str(&claims, "sub")
            .ok_or(AccessJwtError::EmptyClaim("sub"))?
            .to_string();

        let username = non_empty_str(&claims, &self.principal_claim)
            .map(str::to_string)
            .unwrap_or_else(|| subject.clone());

        let authorities = authorities::extract_authorities(&claims);

        Ok(VerifiedAccessToken {
            subject,
            username,
            authorities,
        })
    }
}
