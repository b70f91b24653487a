//! Account statistics and deletion endpoints.

use axum::{Extension, Json, extract::State};

use api_types::account::{AccountDelete, AccountDeleted, AccountStats};
use engine::users;

use crate::{ServerError, server::ServerState};

pub async fn stats(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AccountStats>, ServerError> {
    Ok(Json(state.engine.account_stats(user.id).await?))
}

/// Permanently delete the authenticated account and all its data.
pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountDelete>,
) -> Result<Json<AccountDeleted>, ServerError> {
    let Some(password) = payload.password else {
        return Err(ServerError::Generic("password is required".to_string()));
    };

    let deleted_at = state.engine.delete_account(user.id, &password).await?;

    Ok(Json(AccountDeleted {
        success: true,
        message: "account deleted".to_string(),
        deleted_at,
    }))
}
