use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

use super::kv::KvStore;
use crate::models::{ExportDocument, ImportSummary, Prompt};

pub(crate) const PROMPTS_KEY: &str = "prompts";

/// Current export envelope version.
const EXPORT_VERSION: &str = "1.3";

/// Input for creating or updating a prompt. An absent id means create.
#[derive(Debug, Clone, Default)]
pub struct PromptInput {
    pub id: Option<String>,
    pub label: String,
    pub template: String,
    pub tags: Option<Value>,
    pub favorite: bool,
}

/// Prompt library persistence over the key-value store.
#[derive(Clone)]
pub struct PromptStore {
    pub(crate) kv: KvStore,
}

impl PromptStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// All prompts, normalized and sorted: favorites first, then newest first.
    pub fn list_prompts(&self) -> Result<Vec<Prompt>> {
        let mut prompts = self.load_prompts()?;
        sort_prompts(&mut prompts);
        Ok(prompts)
    }

    pub fn get_prompt(&self, id: &str) -> Result<Option<Prompt>> {
        Ok(self.load_prompts()?.into_iter().find(|p| p.id == id))
    }

    /// Create or update a prompt. Label and template are trimmed; tags accept
    /// either a list or a comma-separated string.
    pub fn save_prompt(&self, input: PromptInput) -> Result<Prompt> {
        let mut prompts = self.load_prompts()?;

        let label = input.label.trim().to_owned();
        let template = input.template.trim().to_owned();
        if label.is_empty() || template.is_empty() {
            return Err(anyhow!("Prompt label and template must not be empty"));
        }

        let now = now_ms();
        let created_at = match &input.id {
            Some(id) => prompts
                .iter()
                .find(|p| p.id == *id)
                .map(|p| p.created_at)
                .unwrap_or_else(|| timestamp_from_id(id).unwrap_or(now)),
            None => now,
        };

        let normalized = Prompt {
            id: input.id.clone().unwrap_or_else(|| generate_id(now)),
            label,
            template,
            tags: tags_from_value(input.tags.as_ref()),
            favorite: input.favorite,
            created_at,
        };

        match input.id {
            None => prompts.push(normalized.clone()),
            Some(id) => match prompts.iter_mut().find(|p| p.id == id) {
                Some(existing) => *existing = normalized.clone(),
                None => prompts.push(normalized.clone()),
            },
        }

        self.write_prompts(&prompts)?;
        Ok(normalized)
    }

    pub fn delete_prompt(&self, id: &str) -> Result<()> {
        let prompts = self.load_prompts()?;
        let remaining: Vec<Prompt> = prompts.into_iter().filter(|p| p.id != id).collect();
        self.write_prompts(&remaining)
    }

    /// Flip the favorite flag. Returns the new state, or `None` for an
    /// unknown id.
    pub fn toggle_favorite(&self, id: &str) -> Result<Option<bool>> {
        let mut prompts = self.load_prompts()?;

        let Some(prompt) = prompts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        prompt.favorite = !prompt.favorite;
        let state = prompt.favorite;
        if prompt.created_at == 0 {
            prompt.created_at = timestamp_from_id(&prompt.id).unwrap_or_else(now_ms);
        }

        self.write_prompts(&prompts)?;
        Ok(Some(state))
    }

    /// Unique trimmed tags across the library, sorted.
    pub fn all_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self
            .load_prompts()?
            .iter()
            .flat_map(|p| p.tags.iter())
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();
        Ok(tags)
    }

    pub fn export_prompts(&self) -> Result<ExportDocument> {
        Ok(ExportDocument {
            version: EXPORT_VERSION.to_owned(),
            exported: Utc::now().to_rfc3339(),
            prompts: self.list_prompts()?,
        })
    }

    /// Import prompts from a parsed JSON document.
    ///
    /// Accepts `{"prompts": [...]}`, a bare array, or `{"data": [...]}`.
    /// Field names are mapped flexibly (label/title/name and so on). Entries
    /// missing a label or template are skipped, as are entries whose trimmed
    /// label matches an existing prompt case-insensitively.
    pub fn import_prompts(&self, data: &Value) -> Result<ImportSummary> {
        let incoming = match data {
            Value::Array(items) => items.as_slice(),
            Value::Object(obj) => obj
                .get("prompts")
                .or_else(|| obj.get("data"))
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .ok_or_else(|| invalid_import_format())?,
            _ => return Err(invalid_import_format()),
        };

        let mut prompts = self.load_prompts()?;
        let mut seen_labels: Vec<String> = prompts
            .iter()
            .map(|p| p.label.trim().to_lowercase())
            .collect();
        let mut imported = 0usize;

        for raw in incoming {
            let Some(obj) = raw.as_object() else { continue };

            let label = pick_string(obj, &["label", "title", "name"])
                .map(|s| s.trim().to_owned())
                .unwrap_or_default();
            let template = pick_string(obj, &["template", "content", "text", "prompt"])
                .map(|s| s.trim().to_owned())
                .unwrap_or_default();
            if label.is_empty() || template.is_empty() {
                continue;
            }

            let key = label.to_lowercase();
            if seen_labels.contains(&key) {
                continue;
            }

            let tags = tags_from_value(pick(obj, &["tags", "labels", "categories"]));
            let favorite = pick(obj, &["favorite", "starred", "pinned"])
                .map(truthy_flag)
                .unwrap_or(false);
            let created_at = pick(
                obj,
                &[
                    "createdAt",
                    "created_at",
                    "timestamp",
                    "date",
                    "created",
                    "dateCreated",
                ],
            )
            .and_then(parse_timestamp_ms)
            .unwrap_or_else(now_ms);

            prompts.push(Prompt {
                id: generate_id(now_ms()),
                label,
                template,
                tags,
                favorite,
                created_at,
            });
            seen_labels.push(key);
            imported += 1;
        }

        self.write_prompts(&prompts)?;
        Ok(ImportSummary {
            imported,
            total: incoming.len(),
        })
    }

    /// Raw prompt list, tolerant of legacy layouts: a bare array, an object
    /// wrapping a `prompts` array (rewritten to the flat form), or anything
    /// else (reset to empty). Individual records that no longer parse are
    /// dropped with a warning rather than poisoning the whole library.
    pub(crate) fn load_prompts(&self) -> Result<Vec<Prompt>> {
        let raw = self.kv.get(PROMPTS_KEY)?;

        let items: Vec<Value> = match raw {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(Value::Object(obj)) => match obj.get("prompts").and_then(Value::as_array) {
                Some(items) => {
                    let items = items.clone();
                    self.kv.set(PROMPTS_KEY, &Value::Array(items.clone()))?;
                    items
                }
                None => {
                    self.kv.set(PROMPTS_KEY, &Value::Array(Vec::new()))?;
                    return Ok(Vec::new());
                }
            },
            Some(_) => {
                self.kv.set(PROMPTS_KEY, &Value::Array(Vec::new()))?;
                return Ok(Vec::new());
            }
        };

        let mut prompts = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<Prompt>(item) {
                Ok(mut prompt) => {
                    if prompt.created_at == 0 {
                        prompt.created_at = timestamp_from_id(&prompt.id).unwrap_or_else(now_ms);
                    }
                    prompts.push(prompt);
                }
                Err(e) => tracing::warn!("Dropping unreadable prompt record: {}", e),
            }
        }
        Ok(prompts)
    }

    pub(crate) fn write_prompts(&self, prompts: &[Prompt]) -> Result<()> {
        self.kv.set(PROMPTS_KEY, &serde_json::to_value(prompts)?)
    }
}

fn invalid_import_format() -> anyhow::Error {
    anyhow!("Invalid file format: expected {{\"prompts\":[...]}} or an array")
}

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn generate_id(now: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("prompt_{}_{}", now, &suffix[..9])
}

/// Recover the creation time embedded in `prompt_<millis>_<suffix>` ids.
pub(crate) fn timestamp_from_id(id: &str) -> Option<i64> {
    let re = Regex::new(r"^prompt_(\d+)_").ok()?;
    re.captures(id)?.get(1)?.as_str().parse().ok()
}

fn sort_prompts(prompts: &mut [Prompt]) {
    prompts.sort_by(|a, b| match b.favorite.cmp(&a.favorite) {
        Ordering::Equal => b.created_at.cmp(&a.created_at),
        other => other,
    });
}

fn tags_from_value(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn pick<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

fn pick_string<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    pick(obj, keys).and_then(Value::as_str)
}

fn truthy_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Timestamps arrive as epoch millis or as a parseable datetime string.
fn parse_timestamp_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok().map(|dt| dt.timestamp_millis())),
        _ => None,
    }
}
