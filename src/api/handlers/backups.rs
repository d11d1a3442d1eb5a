use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{BackupReason, BackupSummary, GenericResponse};

use super::super::state::AppState;

pub async fn list_backups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BackupSummary>>> {
    let backups = state
        .store
        .list_backups()
        .map_err(|e| AppError::StoreError(e.to_string()))?;

    let summaries = backups
        .into_iter()
        .map(|b| BackupSummary {
            id: b.id,
            timestamp: b.timestamp,
            date: b.date,
            reason: b.reason,
            prompt_count: b.prompt_count,
        })
        .collect();
    Ok(Json(summaries))
}

/// Take a manual snapshot. Reports "skipped" when the library is empty or
/// a snapshot was already taken within the last hour.
pub async fn create_backup(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenericResponse>> {
    let created = state
        .store
        .create_backup(BackupReason::Manual)
        .map_err(|e| AppError::StoreError(e.to_string()))?;

    Ok(Json(GenericResponse {
        status: if created { "created" } else { "skipped" }.to_string(),
    }))
}

pub async fn restore_backup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GenericResponse>> {
    let restored = state
        .store
        .restore_backup(&id)
        .map_err(|e| AppError::StoreError(e.to_string()))?;

    if !restored {
        return Err(AppError::NotFound(format!("Backup '{}' not found", id)));
    }

    tracing::info!("Restored backup {}", id);
    Ok(Json(GenericResponse {
        status: "restored".to_string(),
    }))
}
