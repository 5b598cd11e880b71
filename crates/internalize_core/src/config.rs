//! Application configuration.
//!
//! # Responsibility
//! - Load taxonomy, delimiters, model and store settings from TOML.
//! - Supply defaults for every field so an empty file is valid.
//! - Resolve the AI API key from the environment only.
//!
//! # Invariants
//! - The taxonomy in a loaded config is validated (see `Taxonomy::new`).
//! - The same taxonomy and delimiters feed both prompt and parser.

use crate::ai::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::model::taxonomy::Taxonomy;
use crate::parser::response::{Delimiters, ResponseParser, DEFAULT_PLACEHOLDER_TASK};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_DB_PATH: &str = "data/internalize.sqlite3";
const DEFAULT_DOCUMENT: &str = "knowledge_base";
const DEFAULT_SHEET: &str = "records";

/// Configuration load errors.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// AI collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub model: String,
    pub endpoint: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Row store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub document: String,
    pub sheet: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            document: DEFAULT_DOCUMENT.to_string(),
            sheet: DEFAULT_SHEET.to_string(),
        }
    }
}

/// Logging settings. `dir = None` leaves file logging off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub taxonomy: Taxonomy,
    pub delimiters: Delimiters,
    pub placeholder_task: String,
    pub ai: AiConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
            delimiters: Delimiters::default(),
            placeholder_task: DEFAULT_PLACEHOLDER_TASK.to_string(),
            ai: AiConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads a TOML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parser built from this config's taxonomy, delimiters and placeholder.
    pub fn response_parser(&self) -> ResponseParser {
        ResponseParser::new(self.taxonomy.clone())
            .with_delimiters(self.delimiters.clone())
            .with_placeholder(self.placeholder_task.clone())
    }
}

/// Reads the API key from the environment, honoring a `.env` file.
pub fn api_key_from_env() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
