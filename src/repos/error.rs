/**
 * Responsibility
 * - What the repo layer reports upward
 * - "Not found" is not an error here: lookups return Option, deletes return bool
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
}
