use crate::alert::AlertWebhook;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use dashmap::DashMap;
use embedding::EmbeddingService;
use generation::{ChatClient, ChatGenerator};
use nutrition::{NutritionService, NutritionStore};
use retrieval::{GuideRetriever, PineconeIndex, VectorIndex};
use std::sync::Arc;

/// Shared application state.
///
/// Every external collaborator is an explicitly constructed, injected service
/// object - no process-wide globals - so tests can swap in doubles via
/// [`ServerState::with_services`].
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,

    /// Rate limit tracking: API key -> (count, window_start)
    pub rate_limiter: Arc<DashMap<String, (u32, std::time::Instant)>>,

    pub embedder: Arc<EmbeddingService>,
    pub retriever: Arc<GuideRetriever>,
    pub chat: Arc<dyn ChatGenerator>,
    pub nutrition: Arc<NutritionService>,
    pub alert: Arc<AlertWebhook>,
}

impl ServerState {
    /// Wire up production services from configuration.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let embedder = Arc::new(
            EmbeddingService::new(config.embedding.clone())
                .map_err(|e| ServerError::Config(e.to_string()))?,
        );

        let index: Arc<dyn VectorIndex> = Arc::new(
            PineconeIndex::new(config.index.clone())
                .map_err(|e| ServerError::Config(e.to_string()))?,
        );
        let retriever = Arc::new(GuideRetriever::new(index));

        let chat: Arc<dyn ChatGenerator> = Arc::new(
            ChatClient::new(config.generation.clone())
                .map_err(|e| ServerError::Config(e.to_string()))?,
        );

        if let Some(parent) = config.nutrition_db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ServerError::Config(e.to_string()))?;
        }
        let store = NutritionStore::open(&config.nutrition_db_path)
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let nutrition = Arc::new(NutritionService::new(store, chat.clone()));

        let alert = Arc::new(AlertWebhook::new(config.alert_webhook_url.clone()));

        Ok(Self {
            config: Arc::new(config),
            rate_limiter: Arc::new(DashMap::new()),
            embedder,
            retriever,
            chat,
            nutrition,
            alert,
        })
    }

    /// Assemble state from pre-built services (test doubles included).
    pub fn with_services(
        config: ServerConfig,
        embedder: Arc<EmbeddingService>,
        retriever: Arc<GuideRetriever>,
        chat: Arc<dyn ChatGenerator>,
        nutrition: Arc<NutritionService>,
        alert: Arc<AlertWebhook>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            rate_limiter: Arc::new(DashMap::new()),
            embedder,
            retriever,
            chat,
            nutrition,
            alert,
        }
    }

    /// Check if an API key is valid.
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        self.config.api_keys.contains(key)
    }

    /// Fixed-window rate limit per API key.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let now = std::time::Instant::now();
        let window = std::time::Duration::from_secs(60);
        let limit = self.config.rate_limit_per_minute;

        let mut entry = self.rate_limiter.entry(key.to_string()).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) > window {
            *count = 0;
            *window_start = now;
        }

        if *count >= limit {
            return false;
        }

        *count += 1;
        true
    }
}
