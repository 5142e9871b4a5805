use embedding::EmbeddingConfig;
use generation::GenerationConfig;
use retrieval::PineconeConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration, loaded from an optional `coach.toml` plus
/// `COACH_SERVER__*` environment variables (double underscore separates
/// nesting, e.g. `COACH_SERVER__INDEX__API_KEY`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rate limit: requests per minute per API key
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    /// API keys accepted on protected routes
    #[serde(default)]
    pub api_keys: HashSet<String>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level / env-filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// SQLite file backing the nutrition cache
    #[serde(default = "default_nutrition_db_path")]
    pub nutrition_db_path: PathBuf,

    /// Webhook notified on upstream LLM auth/quota/outage faults
    #[serde(default)]
    pub alert_webhook_url: Option<String>,

    /// Query encoder + TF-IDF transform settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Managed vector index connection
    #[serde(default)]
    pub index: PineconeConfig,

    /// Chat-completion service connection
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
            api_keys: HashSet::new(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            nutrition_db_path: default_nutrition_db_path(),
            alert_webhook_url: None,
            embedding: EmbeddingConfig::default(),
            index: PineconeConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("coach").required(false))
            .add_source(config::Environment::with_prefix("COACH_SERVER").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        // Demo key keeps local development friction-free; production deploys
        // must configure real keys.
        if config.api_keys.is_empty() {
            tracing::warn!("No API keys configured, using demo key 'demo-key-12345'");
            config.api_keys.insert("demo-key-12345".to_string());
        }

        Ok(config)
    }

    /// Socket address to bind to.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_per_minute() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_nutrition_db_path() -> PathBuf {
    PathBuf::from("./data/nutrition.db")
}
