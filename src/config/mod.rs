use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_database_url() -> String {
    "sqlite://clients.db".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("client_dashboard.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// SQLite URL of the local client store
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// File that receives tracing output; the terminal belongs to the UI
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Filter directive from the command line; beats RUST_LOG and LOG_LEVEL
    #[serde(skip)]
    pub log_level_override: Option<String>,
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if it exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        Self::from_iter(std::env::vars())
    }

    fn from_iter<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(vars)?)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(database_url) = overrides.database_url {
            self.database_url = database_url;
        }
        if let Some(log_file) = overrides.log_file {
            self.log_file = log_file;
        }
        if overrides.log_level.is_some() {
            self.log_level_override = overrides.log_level;
        }
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Load configuration from the environment and apply command-line overrides
pub fn init(overrides: Overrides) -> Result<Config> {
    Ok(Config::load()?.with_overrides(overrides))
}
