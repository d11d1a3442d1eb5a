use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{
    ExportDocument, GenericResponse, ImportSummary, Prompt, SavePromptRequest, TagsResponse,
    ToggleFavoriteResponse,
};
use crate::store::PromptInput;

use super::super::state::AppState;

pub async fn list_prompts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Prompt>>> {
    let prompts = state
        .store
        .list_prompts()
        .map_err(|e| AppError::StoreError(e.to_string()))?;
    Ok(Json(prompts))
}

pub async fn create_prompt(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SavePromptRequest>,
) -> Result<Json<Prompt>> {
    save(&state, None, request)
}

pub async fn get_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Prompt>> {
    let prompt = state
        .store
        .get_prompt(&id)
        .map_err(|e| AppError::StoreError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Prompt '{}' not found", id)))?;
    Ok(Json(prompt))
}

pub async fn update_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SavePromptRequest>,
) -> Result<Json<Prompt>> {
    save(&state, Some(id), request)
}

pub async fn delete_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GenericResponse>> {
    state
        .store
        .delete_prompt(&id)
        .map_err(|e| AppError::StoreError(e.to_string()))?;
    Ok(Json(GenericResponse {
        status: "deleted".to_string(),
    }))
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ToggleFavoriteResponse>> {
    let favorite = state
        .store
        .toggle_favorite(&id)
        .map_err(|e| AppError::StoreError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Prompt '{}' not found", id)))?;
    Ok(Json(ToggleFavoriteResponse { id, favorite }))
}

pub async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<TagsResponse>> {
    let tags = state
        .store
        .all_tags()
        .map_err(|e| AppError::StoreError(e.to_string()))?;
    Ok(Json(TagsResponse { tags }))
}

pub async fn export_prompts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExportDocument>> {
    let doc = state
        .store
        .export_prompts()
        .map_err(|e| AppError::StoreError(e.to_string()))?;
    Ok(Json(doc))
}

/// Import a previously exported library (or a compatible foreign document).
pub async fn import_prompts(
    State(state): State<Arc<AppState>>,
    Json(data): Json<serde_json::Value>,
) -> Result<Json<ImportSummary>> {
    let summary = state
        .store
        .import_prompts(&data)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    tracing::info!(
        "Imported {} of {} prompts",
        summary.imported,
        summary.total
    );
    Ok(Json(summary))
}

fn save(state: &AppState, id: Option<String>, request: SavePromptRequest) -> Result<Json<Prompt>> {
    if request.label.trim().is_empty() || request.template.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Prompt label and template must not be empty".into(),
        ));
    }

    let prompt = state
        .store
        .save_prompt(PromptInput {
            id,
            label: request.label,
            template: request.template,
            tags: request.tags,
            favorite: request.favorite,
        })
        .map_err(|e| AppError::StoreError(e.to_string()))?;
    Ok(Json(prompt))
}
