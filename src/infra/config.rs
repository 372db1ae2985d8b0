// src/infra/config.rs - Configuration loading (TOML)

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::hazard::HazardMatch;
use crate::infra::errors::ChatError;
use crate::infra::paths;

pub const DEFAULT_CONVERSATIONAL_MODEL: &str = "llama-3.1-70b-versatile";
pub const DEFAULT_SAFETY_MODEL: &str = "llama-guard-3-8b";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub persona: PersonaConfig,
}

/// Default model identifiers. Both can be overridden per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub conversational: String,
    pub safety: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            conversational: DEFAULT_CONVERSATIONAL_MODEL.into(),
            safety: DEFAULT_SAFETY_MODEL.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub id: String,
    pub name: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            id: "groq".into(),
            name: "Groq".into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            api_key_env: "GROQ_API_KEY".into(),
            timeout_seconds: 60,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyConfig {
    #[serde(default)]
    pub hazard_match: HazardMatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub name: String,
    /// Replaces the built-in persona instruction when set.
    pub system_prompt: Option<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Doctor Groq".into(),
            system_prompt: None,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ChatError::Config(e.to_string()))
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}
