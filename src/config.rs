use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path of the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// OpenAI API key; required by the server, unused by ingestion
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Chat completions API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Chat model used for recommendations
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,

    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding book.csv, checkouts.csv and users.csv
    #[serde(default = "default_ingest_dir")]
    pub ingest_dir: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/library_db.sqlite")
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_temperature() -> f32 {
    0.15
}

fn default_openai_max_tokens() -> u32 {
    500
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_ingest_dir() -> PathBuf {
    PathBuf::from("./data/csv")
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Returns the OpenAI API key or fails if it is unset or blank
    pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
        self.openai_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set to run the server"))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
