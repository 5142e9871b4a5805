use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use generation::GenerationError;
use nutrition::{EstimateOutcome, FoodNutrition, InputFault, NutritionError, NutritionRequest, Unit};

const ESTIMATE_FAILED: &str = "영양 성분 계산에 실패했습니다";
const ESTIMATE_UNAVAILABLE: &str = "현재 영양성분 분석이 불가능합니다.";
const NOT_FOOD: &str = "AI가 계산하기 어려운 영양성분입니다";

/// Raw request body; every field is validated by hand so each missing piece
/// gets its own product message.
#[derive(Debug, Deserialize)]
pub struct NutritionBody {
    #[serde(rename = "foodName")]
    pub food_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<i64>,
}

/// POST /api/v1/nutrition - estimate nutrition for a free-text food entry.
///
/// 200 with the cached figures on a repeat entry, 201 after a fresh
/// generation.
pub async fn estimate_nutrition(
    State(state): State<ServerState>,
    Json(body): Json<NutritionBody>,
) -> ServerResult<Response> {
    let request = validate_body(body)?;
    tracing::info!(
        food_name = %request.food_name,
        quantity = request.quantity,
        unit = request.unit.code(),
        "nutrition requested"
    );

    match state.nutrition.estimate(&request).await {
        Ok(EstimateOutcome::Cached(record)) => {
            Ok((StatusCode::OK, Json(wire_record(&record, false))).into_response())
        }
        Ok(EstimateOutcome::Generated(record)) => {
            Ok((StatusCode::CREATED, Json(wire_record(&record, true))).into_response())
        }
        Err(err) => Err(map_nutrition_error(err, &state).await),
    }
}

fn validate_body(body: NutritionBody) -> ServerResult<NutritionRequest> {
    let food_name = body
        .food_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServerError::BadRequest("음식명이 없습니다".into()))?
        .to_string();

    let quantity = body
        .quantity
        .filter(|q| q.is_finite() && *q > 0.0)
        .ok_or_else(|| ServerError::BadRequest("섭취량이 없습니다".into()))?;

    let unit_code = body
        .unit
        .ok_or_else(|| ServerError::BadRequest("섭취량 단위가 없습니다".into()))?;
    let unit = Unit::try_from(unit_code).map_err(|_| {
        ServerError::BadRequest(
            "올바르지 않은 섭취량 단위입니다 (0: 인분, 1: 개, 2: 접시, 3: g, 4: ml)".into(),
        )
    })?;

    Ok(NutritionRequest {
        food_name,
        quantity,
        unit,
    })
}

/// Cached responses repeat only the stored figures; fresh generations also
/// report the estimated serving size.
fn wire_record(record: &FoodNutrition, include_serving_size: bool) -> serde_json::Value {
    let mut body = json!({
        "foodName": record.food_name,
        "quantity": record.quantity,
        "unit": record.unit.code(),
        "carbohydrate": record.carbohydrate,
        "sugar": record.sugar,
        "dietaryFiber": record.dietary_fiber,
        "protein": record.protein,
        "fat": record.fat,
        "starch": record.starch,
    });
    if include_serving_size {
        body["serving_size"] = json!(record.serving_size);
    }
    body
}

async fn map_nutrition_error(err: NutritionError, state: &ServerState) -> ServerError {
    match err {
        NutritionError::InvalidInput(fault) => ServerError::BadRequest(
            match fault {
                InputFault::MissingFoodName => "음식명이 없습니다",
                InputFault::InvalidFoodName => "올바른 음식명이 아닙니다",
                InputFault::InvalidQuantity => "섭취량이 없습니다",
            }
            .into(),
        ),
        NutritionError::NotFood(ref food_name) => {
            tracing::info!(food_name = %food_name, "model declined nutrition generation");
            ServerError::upstream(StatusCode::NOT_EXTENDED, NOT_FOOD, err.to_string())
        }
        NutritionError::ResponseParsing(_)
        | NutritionError::InvalidValues(_)
        | NutritionError::Store(_) => ServerError::upstream(
            StatusCode::INTERNAL_SERVER_ERROR,
            ESTIMATE_FAILED,
            err.to_string(),
        ),
        NutritionError::Chat(chat_err) => {
            if chat_err.is_operational() {
                state.alert.notify(&chat_err.to_string()).await;
            }
            let status = match chat_err {
                GenerationError::Quota(_) | GenerationError::Service(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let message = if status == StatusCode::SERVICE_UNAVAILABLE {
                ESTIMATE_UNAVAILABLE
            } else {
                ESTIMATE_FAILED
            };
            ServerError::upstream(status, message, chat_err.to_string())
        }
    }
}
