use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::embeddings::EmbeddingProvider;
use crate::vector_store::ChromaApi;
use crate::errors::TriageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_enable_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub directory: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// One of `sidecar`, `openai`, `ollama`
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "sidecar".to_string()
}

fn default_embedding_endpoint() -> String {
    "http://localhost:5050/embed".to_string()
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

pub(crate) fn default_dimension() -> usize {
    384
}

pub(crate) fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dimension: default_dimension(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub llm_endpoint: String,
    #[serde(default)]
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

pub(crate) fn default_llm_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".to_string()
}

pub(crate) fn default_temperature() -> f32 {
    1.2
}

pub(crate) fn default_max_tokens() -> usize {
    400
}

fn default_llm_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_endpoint: default_llm_endpoint(),
            llm_key: String::new(),
            llm_model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_chroma_url")]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// REST API generation: `v2` for Chroma 0.6 and 1.x, `v1` for older servers
    #[serde(default = "default_chroma_api")]
    pub api_version: String,
    /// Tenant and database, only used by the `v2` API
    #[serde(default = "default_chroma_tenant")]
    pub tenant: String,
    #[serde(default = "default_chroma_database")]
    pub database: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chroma_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_collection() -> String {
    "support_tickets".to_string()
}

fn default_chroma_api() -> String {
    "v2".to_string()
}

fn default_chroma_tenant() -> String {
    "default_tenant".to_string()
}

fn default_chroma_database() -> String {
    "default_database".to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: default_chroma_url(),
            collection: default_collection(),
            api_version: default_chroma_api(),
            tenant: default_chroma_tenant(),
            database: default_chroma_database(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Maximum nearest-neighbour distance for reusing a stored answer
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
}

pub(crate) fn default_match_threshold() -> f32 {
    0.2
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub triage: TriageConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from the default locations, then apply environment overrides.
    ///
    /// Looks for `config.toml`, then `config.example.toml`, and falls back to
    /// built-in defaults when neither exists.
    pub fn load() -> crate::Result<Self> {
        // Missing .env is the normal case outside development
        let _ = dotenvy::dotenv();

        let mut config = if Path::new("config.toml").exists() {
            Self::from_file("config.toml")?
        } else if Path::new("config.example.toml").exists() {
            warn!("Using config.example.toml. Please create config.toml for production use.");
            Self::from_file("config.example.toml")?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, then apply environment overrides.
    pub fn load_from<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override file values with environment variables.
    ///
    /// The lookup is injected so tests do not have to touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = lookup("CHROMADB_URL") {
            self.vector_store.url = url;
        }
        if let Some(url) = lookup("EMBEDDING_URL") {
            self.embeddings.endpoint = url;
        }
        if let Some(key) = lookup("LLM_API_KEY").or_else(|| lookup("DEEPSEEK_API_KEY")) {
            self.llm.llm_key = key;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.llm_model = model;
        }
    }

    /// Reject values that would only fail later at request time
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.embeddings.endpoint)?;
        url::Url::parse(&self.llm.llm_endpoint)?;
        url::Url::parse(&self.vector_store.url)?;

        self.embedding_provider()?;
        self.chroma_api()?;

        if self.embeddings.dimension == 0 {
            return Err(TriageError::ConfigError(
                "embeddings.dimension must be greater than zero".to_string(),
            ));
        }

        let threshold = self.triage.match_threshold;
        if !(threshold > 0.0 && threshold <= 2.0) {
            return Err(TriageError::ConfigError(format!(
                "triage.match_threshold must be in (0, 2], got {threshold}"
            )));
        }

        if self.vector_store.collection.trim().is_empty() {
            return Err(TriageError::ConfigError(
                "vector_store.collection must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse the configured embedding provider name
    pub fn embedding_provider(&self) -> crate::Result<EmbeddingProvider> {
        self.embeddings.provider.parse()
    }

    /// Parse the configured Chroma REST API version
    pub fn chroma_api(&self) -> crate::Result<ChromaApi> {
        self.vector_store.api_version.parse()
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get the nearest-neighbour acceptance threshold
    pub fn match_threshold(&self) -> f32 {
        self.triage.match_threshold
    }

    /// Copy of the config safe to print, with secrets masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.llm.llm_key.is_empty() {
            copy.llm.llm_key = mask_secret(&copy.llm.llm_key);
        }
        if let Some(key) = copy.embeddings.api_key.as_mut() {
            *key = mask_secret(key);
        }
        copy
    }
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}
