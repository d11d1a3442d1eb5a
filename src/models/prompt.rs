use serde::{Deserialize, Serialize};

/// A stored prompt template.
///
/// Serialized field names match the export format (`createdAt` etc.) so that
/// exports from older library versions import cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub label: String,
    pub template: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    /// Creation time in epoch milliseconds. Backfilled from the id for
    /// records that predate this field.
    #[serde(default)]
    pub created_at: i64,
}

/// Why a backup snapshot was taken.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BackupReason {
    Startup,
    Manual,
    PreRestore,
}

/// One snapshot in the backup ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub id: String,
    /// Epoch milliseconds; newest snapshot sits at index 0.
    pub timestamp: i64,
    pub date: String,
    pub reason: BackupReason,
    pub prompt_count: usize,
    pub prompts: Vec<Prompt>,
}

/// Envelope written by the export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: String,
    pub exported: String,
    pub prompts: Vec<Prompt>,
}

/// Result of an import run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub total: usize,
}
