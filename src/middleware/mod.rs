/*
 * Responsibility
 * - Public face of the middleware layer
 * - auth: token verification for /api; the rest is router-wide transport concerns
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
