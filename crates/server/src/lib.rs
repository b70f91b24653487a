use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod account;
mod backup;
mod server;

pub mod types {
    pub mod backup {
        pub use api_types::backup::{
            BackupDocument, BackupStats, ImportMode, ImportRequest, ImportResponse, ImportResults,
        };
    }

    pub mod account {
        pub use api_types::account::{AccountDelete, AccountDeleted, AccountStats};
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// Validator findings for a rejected backup document.
    InvalidBackup(Vec<String>),
    Generic(String),
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidPassword => StatusCode::BAD_REQUEST,
        EngineError::PasswordHash(_) | EngineError::Corrupted(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::PasswordHash(detail) => {
            tracing::error!("password hash error: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, details) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                message_for_engine_error(err),
                None,
            ),
            ServerError::InvalidBackup(issues) => (
                StatusCode::BAD_REQUEST,
                "invalid backup file".to_string(),
                Some(issues),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err, None),
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(Error { error, details })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_invalid_password_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidPassword).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_corruption_maps_to_500() {
        let res = ServerError::from(EngineError::Corrupted("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_backup_maps_to_400() {
        let res = ServerError::InvalidBackup(vec!["bad version".to_string()]).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
