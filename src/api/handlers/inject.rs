use axum::{extract::State, Json};
use std::sync::Arc;

use crate::browser::{bridge, Severity};
use crate::error::{AppError, Result};
use crate::injector::{self, InjectError};
use crate::models::{InjectRequest, InjectResponse, TargetInfoResponse, TargetProbeResponse};

use super::super::state::AppState;

/// Inject prompt text into the current page's input field.
///
/// Direct or command-tier success reports plain success; when both tiers
/// fail (or no target exists), the text is copied to the clipboard instead
/// and the response carries the fallback marker. A clipboard failure on top
/// of that is reported as an unsuccessful injection, not as an HTTP error,
/// since the classification itself is the result.
pub async fn inject_prompt(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InjectRequest>,
) -> Result<Json<InjectResponse>> {
    let text = resolve_text(&state, request)?;

    let page = state.browser.page().await.ok_or(AppError::NoSession)?;

    if let Err(e) = bridge::ensure_installed(&page).await {
        tracing::warn!("Failed to install page helpers: {}", e);
    }

    match injector::insert_text(&page, &text).await {
        Ok(outcome) => {
            tracing::info!("Prompt injected ({:?} path)", outcome);
            if let Err(e) = bridge::notify(&page, "Prompt inserted successfully!", Severity::Success).await {
                tracing::warn!("Failed to show notification: {}", e);
            }
            Ok(Json(InjectResponse {
                success: true,
                fallback: None,
                error: None,
            }))
        }
        Err(InjectError::Page(e)) => Err(AppError::BrowserError(e.to_string())),
        Err(err) => {
            tracing::error!("Insert failed, trying clipboard: {}", err);

            if injector::copy_to_clipboard(&page, &text).await {
                if let Err(e) = bridge::notify(
                    &page,
                    "Could not insert directly. Content copied to clipboard!",
                    Severity::Warning,
                )
                .await
                {
                    tracing::warn!("Failed to show notification: {}", e);
                }
                Ok(Json(InjectResponse {
                    success: true,
                    fallback: Some("clipboard".to_string()),
                    error: None,
                }))
            } else {
                if let Err(e) = bridge::notify(
                    &page,
                    "Insert failed and clipboard unavailable",
                    Severity::Error,
                )
                .await
                {
                    tracing::warn!("Failed to show notification: {}", e);
                }
                Ok(Json(InjectResponse {
                    success: false,
                    fallback: None,
                    error: Some(err.to_string()),
                }))
            }
        }
    }
}

/// Diagnostic probe: report whether a valid target currently exists, and
/// what it looks like. Never mutates the page.
pub async fn probe_target(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TargetProbeResponse>> {
    let page = state.browser.page().await.ok_or(AppError::NoSession)?;

    let target = injector::find_target(&page)
        .await
        .map_err(|e| AppError::BrowserError(e.to_string()))?;

    Ok(Json(TargetProbeResponse {
        has_target: target.is_some(),
        target: target.map(|t| TargetInfoResponse {
            tag: t.tag,
            input_type: t.input_type,
            editable: t.editable,
            placeholder: t.placeholder,
        }),
    }))
}

fn resolve_text(state: &AppState, request: InjectRequest) -> Result<String> {
    if let Some(text) = request.text {
        if !text.is_empty() {
            return Ok(text);
        }
    }
    let prompt_id = request
        .prompt_id
        .ok_or_else(|| AppError::ValidationError("Either text or prompt_id is required".into()))?;

    let prompt = state
        .store
        .get_prompt(&prompt_id)
        .map_err(|e| AppError::StoreError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Prompt '{}' not found", prompt_id)))?;
    Ok(prompt.template)
}
