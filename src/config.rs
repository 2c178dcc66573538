/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, CORS origin, Auth settings, ...)
 * - Validate them up front (missing required values abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Claim reported as the caller name unless `AUTH_PRINCIPAL_CLAIM` says otherwise.
pub const DEFAULT_PRINCIPAL_CLAIM: &str = "sub";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for verifying access tokens issued by the identity provider.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    // None disables the `aud` check (Keycloak puts "account" there by default).
    pub audience: Option<String>,
    pub algorithm: Algorithm,
    pub public_key_pem: String,
    pub principal_claim: String,
    pub leeway_seconds: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub body_limit_bytes: usize,
    pub timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub cors_allowed_origin: String,
    pub http_limits: HttpLimits,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub auth: AuthConfig,
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let alg = Algorithm::from_str(raw.trim())
        .map_err(|_| ConfigError::Invalid("AUTH_JWT_ALGORITHM"))?;

    // Only asymmetric realm keys (PEM) are supported
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Err(ConfigError::Invalid("AUTH_JWT_ALGORITHM"))
        }
        other => Ok(other),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_or("PORT", 8081);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 5);

        let cors_allowed_origin = std::env::var("CORS_ALLOWED_ORIGIN")
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let defaults = HttpLimits::default();
        let http_limits = HttpLimits {
            body_limit_bytes: parse_or("REQUEST_BODY_LIMIT_BYTES", defaults.body_limit_bytes),
            timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.timeout.as_secs(),
            )),
        };

        let sqids_min_length = parse_or("SQIDS_MIN_LENGTH", 10);

        let sqids_alphabet = std::env::var("SQIDS_ALPHABET").unwrap_or_else(|_| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let issuer =
            std::env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;

        let audience = std::env::var("AUTH_AUDIENCE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let algorithm = match std::env::var("AUTH_JWT_ALGORITHM") {
            Ok(raw) => parse_algorithm(&raw)?,
            Err(_) => Algorithm::RS256,
        };

        let public_key_pem = std::env::var("AUTH_JWT_PUBLIC_KEY_PEM")
            .map_err(|_| ConfigError::Missing("AUTH_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let principal_claim = std::env::var("AUTH_PRINCIPAL_CLAIM")
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PRINCIPAL_CLAIM.to_string());

        let leeway_seconds = parse_or("ACCESS_TOKEN_LEEWAY_SECONDS", 60);

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            cors_allowed_origin,
            http_limits,
            sqids_min_length,
            sqids_alphabet,
            auth: AuthConfig {
                issuer,
                audience,
                algorithm,
                public_key_pem,
                principal_claim,
                leeway_seconds,
            },
        })
    }
}
