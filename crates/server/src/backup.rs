//! Backup export and import endpoints.

use axum::{
    Extension, Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use chrono::Utc;

use api_types::backup::{BackupStats, ImportRequest, ImportResponse};
use engine::{users, validate_backup};

use crate::{ServerError, server::ServerState};

/// Stream the full backup document as a JSON download.
pub async fn export(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Response, ServerError> {
    let doc = state.engine.export_backup(user.id).await?;
    let stats = BackupStats::of(&doc);

    let body = serde_json::to_vec(&doc)
        .map_err(|err| ServerError::Internal(format!("backup serialization failed: {err}")))?;
    let stats_json = serde_json::to_string(&stats)
        .map_err(|err| ServerError::Internal(format!("stats serialization failed: {err}")))?;

    // Size advertised in megabytes with two decimals.
    let size_mb = body.len() as f64 / (1024.0 * 1024.0);
    let disposition = format!(
        "attachment; filename=\"prima_nota_backup_{}.json\"",
        Utc::now().format("%Y-%m-%d")
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header("x-backup-size", format!("{size_mb:.2}"))
        .header("x-backup-stats", stats_json)
        .body(Body::from(body))
        .map_err(|err| ServerError::Internal(format!("response build failed: {err}")))
}

/// Validate, then apply an uploaded backup document.
pub async fn import(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ServerError> {
    let issues = validate_backup(&payload.backup_data);
    if !issues.is_empty() {
        return Err(ServerError::InvalidBackup(issues));
    }

    let results = state
        .engine
        .import_backup(user.id, &payload.backup_data, payload.mode)
        .await?;

    Ok(Json(ImportResponse {
        success: true,
        message: format!("backup imported successfully ({} mode)", results.mode.as_str()),
        results,
    }))
}
