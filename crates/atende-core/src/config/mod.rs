//! Configuration module for atende.
//!
//! Loads typed configuration from JSON, searching `./config.json` first
//! and `~/.atende/config.json` second. Configuration problems are never
//! fatal: a missing or unparsable file logs a warning and falls back to
//! the defaults (bind 0.0.0.0:5000, delegation disabled).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::provider::http::DEFAULT_API_URL;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub assistant: AssistantConfig,
    pub provider: ProviderConfig,
    pub models: HashMap<String, ModelConfig>,
}

impl Config {
    /// Load configuration, falling back to defaults on any problem.
    ///
    /// Priority:
    /// 1. explicit path, when given
    /// 2. local `config.json` in the current directory
    /// 3. `~/.atende/config.json`
    ///
    /// Sensitive provider fields are overridden from the environment
    /// (`ATENDE_API_KEY`, `ATENDE_API_URL`) when present.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = explicit {
            candidates.push(path.to_path_buf());
        }
        candidates.push(PathBuf::from("config.json"));
        candidates.push(Self::default_path());

        let mut config = Config::default();
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(loaded) => {
                    debug!(path = %path.display(), "Loaded configuration");
                    config = loaded;
                    break;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Unusable config file, using defaults");
                    break;
                }
            }
        }

        if let Ok(key) = std::env::var("ATENDE_API_KEY") {
            config.provider.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("ATENDE_API_URL") {
            config.provider.api_url = url;
        }

        config
    }

    /// Load configuration from a specific path. Parse failures surface
    /// here; `load` turns them into a fallback.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path (`~/.atende/config.json`).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".atende")
            .join("config.json")
    }

    /// Write the default config template to disk.
    pub fn write_default_template() -> anyhow::Result<PathBuf> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = serde_json::json!({
            "api": {
                "host": "0.0.0.0",
                "port": 5000,
                "cors_origins": ["*"]
            },
            "assistant": {
                "use_api": false,
                "use_local_model": false
            },
            "provider": {
                "api_key": null,
                "api_url": DEFAULT_API_URL
            }
        });

        std::fs::write(&path, serde_json::to_string_pretty(&template)?)?;
        Ok(path)
    }
}

// ── API / server configuration ──────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            debug: false,
            cors_origins: vec!["*".into()],
        }
    }
}

// ── Assistant configuration ─────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Delegate low-confidence messages to the external provider.
    pub use_api: bool,
    /// Serve from a locally loaded model. Only the dummy handler exists
    /// today, so this mode logs and degrades to the pattern assistant.
    pub use_local_model: bool,
    pub confidence_threshold: f32,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            use_api: false,
            use_local_model: false,
            confidence_threshold: 0.7,
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

// ── Provider configuration ──────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub api_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.into(),
        }
    }
}

// ── Model configuration ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Handler kind. Only "dummy" is recognized.
    pub kind: String,
    pub name: String,
    pub default: bool,
    /// Substring-keyed canned responses for the dummy handler.
    pub responses: HashMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 5000);
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(!config.assistant.use_api);
        assert!(!config.assistant.use_local_model);
        assert!((config.assistant.confidence_threshold - 0.7).abs() < f32::EPSILON);
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{"assistant": {"use_api": true}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.assistant.use_api);
        // Untouched sections keep their defaults.
        assert_eq!(config.api.port, 5000);
    }

    #[test]
    fn test_deserialize_model_section() {
        let json = r#"{
            "models": {
                "test_model": {
                    "kind": "dummy",
                    "name": "Modelo de Teste",
                    "default": true,
                    "responses": {"olá": ["Olá!"]}
                }
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let model = &config.models["test_model"];
        assert_eq!(model.kind, "dummy");
        assert!(model.default);
        assert_eq!(model.responses["olá"], vec!["Olá!".to_string()]);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("atende_bad_config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = Config::load(Some(&path));
        assert_eq!(config.api.port, 5000);
        assert!(!config.assistant.use_api);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("atende_missing_config.json");
        let _ = std::fs::remove_file(&path);

        let config = Config::load(Some(&path));
        assert_eq!(config.api.host, "0.0.0.0");
    }
}
