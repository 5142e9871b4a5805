//! Nutrition estimation for free-text meal entries.
//!
//! Given a food name, quantity, and unit, produce structured nutrition
//! figures (serving size, carbohydrate breakdown, protein, fat). Estimates
//! come from an LLM call under a stepwise instruction prompt and are cached
//! in a SQLite table keyed by (food name, quantity, unit) - the same dish
//! logged twice never pays for a second generation.
//!
//! Flow: validate → cache lookup (bumps `call_count` on hit) → generate →
//! reject non-food / malformed / negative outputs → persist → return. The
//! [`EstimateOutcome`] tells the HTTP layer whether to answer 200 (cached) or
//! 201 (generated).

pub mod error;
pub mod generate;
pub mod store;
pub mod types;

pub use crate::error::{InputFault, NutritionError};
pub use crate::generate::NUTRITION_SYSTEM_INSTRUCTION;
pub use crate::store::NutritionStore;
pub use crate::types::{EstimateOutcome, FoodNutrition, Unit};

use generation::ChatGenerator;
use std::sync::Arc;

use crate::generate::{parse_nutrition_response, user_message};

/// Characters that, alone, do not make a food name.
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};'\":\\|,.<>/?";

/// Validated nutrition request.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionRequest {
    pub food_name: String,
    pub quantity: f64,
    pub unit: Unit,
}

/// Estimation service: cache in front of the generation call.
pub struct NutritionService {
    store: NutritionStore,
    chat: Arc<dyn ChatGenerator>,
}

impl NutritionService {
    pub fn new(store: NutritionStore, chat: Arc<dyn ChatGenerator>) -> Self {
        Self { store, chat }
    }

    /// Produce a nutrition estimate, from cache when possible.
    pub async fn estimate(
        &self,
        request: &NutritionRequest,
    ) -> Result<EstimateOutcome, NutritionError> {
        validate_input(&request.food_name, request.quantity)?;

        if let Some(hit) =
            self.store
                .lookup(&request.food_name, request.quantity, request.unit)?
        {
            tracing::info!(
                food_name = %request.food_name,
                call_count = hit.call_count,
                "returning cached nutrition data"
            );
            return Ok(EstimateOutcome::Cached(hit));
        }

        let user = user_message(&request.food_name, request.quantity, request.unit);
        let raw = self
            .chat
            .complete(NUTRITION_SYSTEM_INSTRUCTION, &user)
            .await?;

        let record =
            parse_nutrition_response(&raw, &request.food_name, request.quantity, request.unit)?;
        self.store.insert(&record)?;

        tracing::info!(food_name = %request.food_name, "nutrition data saved to cache");
        Ok(EstimateOutcome::Generated(record))
    }
}

/// Reject entries that cannot be food before spending an LLM call.
fn validate_input(food_name: &str, quantity: f64) -> Result<(), InputFault> {
    let trimmed = food_name.trim();
    if trimmed.is_empty() {
        return Err(InputFault::MissingFoodName);
    }
    if trimmed.chars().all(|c| SPECIAL_CHARS.contains(c)) {
        return Err(InputFault::InvalidFoodName);
    }
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(InputFault::InvalidQuantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use generation::GenerationError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedChat {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedChat {
        fn new(response: &str) -> Self {
            Self {
                response: response.into(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatGenerator for CannedChat {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    const VALID_RESPONSE: &str = r#"{
        "serving_size": 400,
        "carbohydrate": 12.0,
        "starch": 5.0,
        "sugar": 4.0,
        "dietaryFiber": 3.0,
        "protein": 15.0,
        "fat": 10.0
    }"#;

    fn request(food_name: &str) -> NutritionRequest {
        NutritionRequest {
            food_name: food_name.into(),
            quantity: 1.0,
            unit: Unit::Serving,
        }
    }

    fn service(chat: Arc<CannedChat>) -> NutritionService {
        NutritionService::new(NutritionStore::open_in_memory().unwrap(), chat)
    }

    #[tokio::test]
    async fn first_request_generates_second_hits_cache() {
        let chat = Arc::new(CannedChat::new(VALID_RESPONSE));
        let svc = service(chat.clone());

        let first = svc.estimate(&request("김치찌개")).await.unwrap();
        assert!(matches!(first, EstimateOutcome::Generated(_)));
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);

        let second = svc.estimate(&request("김치찌개")).await.unwrap();
        match second {
            EstimateOutcome::Cached(record) => assert_eq!(record.call_count, 2),
            other => panic!("expected cache hit, got {other:?}"),
        }
        // No second LLM call.
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_food_is_not_cached() {
        let chat = Arc::new(CannedChat::new("None"));
        let svc = service(chat.clone());

        let err = svc.estimate(&request("ㅁㄴㅇㄹ")).await.unwrap_err();
        assert!(matches!(err, NutritionError::NotFood(_)));

        // A retry asks the model again rather than serving a poisoned cache.
        let err = svc.estimate(&request("ㅁㄴㅇㄹ")).await.unwrap_err();
        assert!(matches!(err, NutritionError::NotFood(_)));
        assert_eq!(chat.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_food_name_rejected_before_any_call() {
        let chat = Arc::new(CannedChat::new(VALID_RESPONSE));
        let svc = service(chat.clone());

        let err = svc.estimate(&request("   ")).await.unwrap_err();
        assert!(matches!(
            err,
            NutritionError::InvalidInput(InputFault::MissingFoodName)
        ));
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn special_characters_only_rejected() {
        let chat = Arc::new(CannedChat::new(VALID_RESPONSE));
        let svc = service(chat);

        let err = svc.estimate(&request("!!@@##")).await.unwrap_err();
        assert!(matches!(
            err,
            NutritionError::InvalidInput(InputFault::InvalidFoodName)
        ));
    }

    #[tokio::test]
    async fn non_positive_quantity_rejected() {
        let chat = Arc::new(CannedChat::new(VALID_RESPONSE));
        let svc = service(chat);

        let mut req = request("김치찌개");
        req.quantity = 0.0;
        let err = svc.estimate(&req).await.unwrap_err();
        assert!(matches!(
            err,
            NutritionError::InvalidInput(InputFault::InvalidQuantity)
        ));
    }

    #[test]
    fn validate_accepts_mixed_special_and_text() {
        assert!(validate_input("김치찌개!", 1.0).is_ok());
    }
}
