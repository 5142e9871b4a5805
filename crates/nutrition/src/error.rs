use generation::GenerationError;
use thiserror::Error;

/// Request-level validation faults, each with a distinct user-facing message
/// at the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputFault {
    #[error("food name is missing or empty")]
    MissingFoodName,
    #[error("food name contains only special characters")]
    InvalidFoodName,
    #[error("quantity must be a positive number")]
    InvalidQuantity,
}

/// Errors from the nutrition estimation flow.
#[derive(Debug, Error)]
pub enum NutritionError {
    /// The request failed validation before any external call.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputFault),
    /// The model declined to treat the input as food (returned `None`).
    #[error("model could not compute nutrition for '{0}'")]
    NotFood(String),
    /// No JSON object could be extracted from the model response.
    #[error("response parsing failed: {0}")]
    ResponseParsing(String),
    /// The extracted values were missing, negative, or non-numeric.
    #[error("invalid nutrient values: {0}")]
    InvalidValues(String),
    /// SQLite-level failure in the cache table.
    #[error("nutrition store error: {0}")]
    Store(String),
    /// The chat-completion call failed; carries the provider taxonomy for
    /// response shaping and alerting upstream.
    #[error(transparent)]
    Chat(#[from] GenerationError),
}

impl From<rusqlite::Error> for NutritionError {
    fn from(err: rusqlite::Error) -> Self {
        NutritionError::Store(err.to_string())
    }
}
