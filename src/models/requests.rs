use serde::Deserialize;

/// Browser viewport dimensions.
#[derive(Debug, Clone, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchSessionRequest {
    pub url: String,
    #[serde(default)]
    pub headless: bool,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: i32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: i32,
}

fn default_viewport_width() -> i32 {
    1280
}
fn default_viewport_height() -> i32 {
    720
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub url: String,
}

/// Inject a prompt into the current page. Either the raw text or the id of a
/// stored prompt must be supplied.
#[derive(Debug, Deserialize)]
pub struct InjectRequest {
    pub text: Option<String>,
    pub prompt_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SavePromptRequest {
    pub label: String,
    pub template: String,
    /// Accepts a list or a comma-separated string.
    #[serde(default)]
    pub tags: Option<serde_json::Value>,
    #[serde(default)]
    pub favorite: bool,
}
