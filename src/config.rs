use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = ".issue-summarizer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .issue-summarizer.toml.
/// All sections are optional — the service runs with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Listen address for the HTTP service
    #[serde(default)]
    pub server: ServerConfig,

    /// GitHub REST API settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Hugging Face Inference API settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API, without trailing slash
    pub api_base: String,
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    /// Requests are anonymous when neither is set.
    pub token: Option<String>,
    /// Bound on each issue/comments request
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub api_base: String,
    /// Model id appended to `{api_base}/models/`
    pub model: String,
    /// Bearer token. If None, falls back to HUGGINGFACE_API_KEY env var.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api-inference.huggingface.co".to_string(),
            model: "sshleifer/distilbart-cnn-12-6".to_string(),
            token: None,
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from .issue-summarizer.toml in the
    /// current directory when no path is given. A missing default file yields
    /// the default config; a missing explicit file is an error.
    ///
    /// Tokens absent from the file are filled from GITHUB_TOKEN and
    /// HUGGINGFACE_API_KEY.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if config.github.token.is_none() {
            config.github.token = env_token("GITHUB_TOKEN");
        }
        if config.inference.token.is_none() {
            config.inference.token = env_token("HUGGINGFACE_API_KEY");
        }

        Ok(config)
    }

    /// Load from a specific path without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

fn env_token(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
