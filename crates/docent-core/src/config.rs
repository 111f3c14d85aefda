use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DocentError, Result};

/// Environment variable holding the API credential for the LLM and
/// embedding endpoints. The credential is never read from or written to the
/// config file.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding `llm.base_url`.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Top-level configuration for Docent.
///
/// Loaded from `~/.docent/config.toml` by default. Every section is optional
/// and falls back to the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocentConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

impl DocentConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DocentConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file if it exists.
    ///
    /// A missing file yields `Ok(None)`. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DocentError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using the given variable lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.llm.base_url = url;
        }
    }

    /// Check values that would otherwise fail late, on the first turn.
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimensions == 0 {
            return Err(DocentError::Config(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }
        if self.index.similarity_top_k == 0 {
            return Err(DocentError::Config(
                "index.similarity_top_k must be greater than zero".to_string(),
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(DocentError::Config(
                "agent.max_iterations must be greater than zero".to_string(),
            ));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(DocentError::Config(
                "llm.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read the API credential from the process environment.
pub fn api_key() -> Result<String> {
    api_key_from(|key| std::env::var(key).ok())
}

/// Read the API credential using the given variable lookup.
pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    lookup(API_KEY_ENV)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DocentError::MissingApiKey(API_KEY_ENV.to_string()))
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Persisted index location and retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the persisted index.
    pub storage_dir: String,
    /// Index to load when the store holds more than one.
    pub index_id: Option<String>,
    /// Number of fragments retrieved per query.
    pub similarity_top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            storage_dir: "storage".to_string(),
            index_id: None,
            similarity_top_k: 2,
        }
    }
}

/// Embedding endpoint configuration.
///
/// Must match the configuration the index was built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding model name.
    pub model: String,
    /// Requested embedding dimension.
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-large".to_string(),
            dimensions: 1536,
        }
    }
}

/// Chat-completions endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model used by both the agent and the chat engine.
    pub model: String,
    /// Upper bound for a single HTTP call, in seconds.
    pub request_timeout_secs: u64,
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            request_timeout_secs: 60,
            temperature: None,
        }
    }
}

/// Conversational retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Optional instructions placed ahead of the retrieved context.
    pub system_prompt: Option<String>,
    /// Approximate token budget for the chat history.
    pub memory_token_limit: usize,
    /// Log retrieved fragments for every query.
    pub verbose: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            memory_token_limit: 3000,
            verbose: true,
        }
    }
}

/// Agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// System prompt for the tool-calling agent.
    pub system_prompt: String,
    /// Maximum model round-trips per operator input.
    pub max_iterations: usize,
    /// Approximate token budget for the agent conversation.
    pub memory_token_limit: usize,
    /// Description advertised for the document search tool.
    pub search_tool_description: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful assistant that can perform calculations \
                            and search through documents to answer questions."
                .to_string(),
            max_iterations: 20,
            memory_token_limit: 40_000,
            search_tool_description: "Useful for answering natural language questions \
                                      about GolfGuiders application manual."
                .to_string(),
        }
    }
}
