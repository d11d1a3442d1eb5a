use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    /// Location of the prompt library database.
    pub store_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8766),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            store_path: env::var("PROMPTRELAY_DATA_DIR")
                .map(|dir| PathBuf::from(dir).join("library.db"))
                .unwrap_or_else(|_| default_store_path()),
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptrelay")
        .join("library.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8766,
            host: "127.0.0.1".to_string(),
            store_path: default_store_path(),
        }
    }
}
