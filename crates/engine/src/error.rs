//! Errors the engine can return.
//!
//! Row-level import problems are not errors at this level: the importer
//! records them in the report and keeps going. `EngineError` is for
//! failures that abort the whole operation.

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    #[error("invalid password")]
    InvalidPassword,
    #[error("password hash error: {0}")]
    PasswordHash(String),
    #[error("corrupted row: {0}")]
    Corrupted(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}
