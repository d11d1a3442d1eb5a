use serde::Serialize;

use super::prompt::BackupReason;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct GenericResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Outcome of an injection attempt, mirrored back to the management surface.
#[derive(Debug, Serialize)]
pub struct InjectResponse {
    pub success: bool,
    /// Set to `"clipboard"` when direct injection failed but the text was
    /// copied for manual pasting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Diagnostic description of the element the locator would currently pick.
#[derive(Debug, Serialize)]
pub struct TargetInfoResponse {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TargetProbeResponse {
    pub has_target: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetInfoResponse>,
}

#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub id: String,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

/// Backup listing entry; the snapshot's prompt payload is omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSummary {
    pub id: String,
    pub timestamp: i64,
    pub date: String,
    pub reason: BackupReason,
    pub prompt_count: usize,
}
