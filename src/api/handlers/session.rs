use axum::{extract::State, Json};
use std::sync::Arc;

use crate::browser::bridge;
use crate::error::{AppError, Result};
use crate::models::{
    GenericResponse, LaunchSessionRequest, NavigateRequest, SessionResponse, Viewport,
};

use super::super::state::AppState;

/// Launch the driven browser and open the given URL.
pub async fn launch_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LaunchSessionRequest>,
) -> Result<Json<SessionResponse>> {
    let viewport = Viewport {
        width: request.viewport_width,
        height: request.viewport_height,
    };

    state
        .browser
        .launch(&request.url, request.headless, Some(viewport))
        .await
        .map_err(|e| AppError::BrowserError(e.to_string()))?;

    // Install the page helpers now and re-install them on every future
    // document, so banners keep working after in-site navigation.
    if let Err(e) = state
        .browser
        .add_script_on_new_document(bridge::INSTALL_SCRIPT)
        .await
    {
        tracing::warn!("Failed to register page helpers for new documents: {}", e);
    }
    if let Some(page) = state.browser.page().await {
        if let Err(e) = bridge::ensure_installed(&page).await {
            tracing::warn!("Failed to install page helpers: {}", e);
        }
    }

    tracing::info!("Session launched at {}", request.url);

    Ok(Json(SessionResponse {
        status: "launched".to_string(),
        url: Some(request.url),
    }))
}

pub async fn navigate_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionResponse>> {
    state
        .browser
        .navigate(&request.url)
        .await
        .map_err(|e| AppError::BrowserError(e.to_string()))?;

    Ok(Json(SessionResponse {
        status: "navigated".to_string(),
        url: Some(request.url),
    }))
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenericResponse>> {
    state
        .browser
        .close()
        .await
        .map_err(|e| AppError::BrowserError(e.to_string()))?;

    Ok(Json(GenericResponse {
        status: "closed".to_string(),
    }))
}
