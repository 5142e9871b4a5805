use serde_json::Value;

use crate::error::NutritionError;
use crate::types::{FoodNutrition, Unit};

/// Stepwise generation instruction. Product copy owned by the meal-record
/// team; carried verbatim.
pub const NUTRITION_SYSTEM_INSTRUCTION: &str = r#"주어진 음식명과 섭취량을 바탕으로, 다음 단계를 순서대로 따라 1회 제공량과 영양 성분을 생성하세요:

1. 음식명을 분석하여 해당 음식의 종류를 파악합니다.
   - 주어진 데이터가 음식명이 아닐 경우, 이후 단계를 생략하고 "None"만을 반환하세요.
2. 음식 종류와 섭취량을 참고하여 1회 제공량(g)을 추정합니다.
3. 주어진 음식명과 섭취량을 바탕으로, 평균적인 영양 성분(탄수화물, 스타치, 당류, 식이섬유, 단백질, 지방)을 생성합니다.
   - 각 영양 성분은 USDA, 한국 식약처 데이터베이스 등 공인된 데이터베이스의 일반적인 수치를 참고하여 생성하세요.
   - 탄수화물(g)은 다음 계산식을 따릅니다:
     탄수화물(g) = 스타치(g) + 당류(g) + 식이섬유(g).
4. 최종 결과를 아래 JSON 형식으로 출력합니다.
   - 출력 형식 이외의 텍스트를 생성하지 않도록 유의하세요.

출력 형식:
{
    "serving_size": (음식의 일반적 1회 제공량 추정치),
    "carbohydrate": (스타치 + 당류 + 식이섬유의 총합),
    "starch": (음식의 평균적 스타치 총량),
    "sugar": (음식의 평균적 당류 총량),
    "dietaryFiber": (음식의 평균적 식이섬유 총량),
    "protein": (음식의 평균적 단백질 총량),
    "fat": (음식의 평균적 지방 총량)
}"#;

/// User message carrying the food entry into the generation prompt.
pub(crate) fn user_message(food_name: &str, quantity: f64, unit: Unit) -> String {
    format!("음식명: {food_name}\n섭취량: {quantity} {}", unit.label())
}

/// Extract the first `{...}` object from a model response that may carry
/// prose around it.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw[start..].find('}')? + start;
    Some(&raw[start..=end])
}

/// Parse one nutrient value: numbers pass through, strings get their
/// non-numeric characters stripped (`"12.5g"` → 12.5).
fn parse_nutrient_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

/// Turn a raw model response into a validated estimate record.
pub(crate) fn parse_nutrition_response(
    raw: &str,
    food_name: &str,
    quantity: f64,
    unit: Unit,
) -> Result<FoodNutrition, NutritionError> {
    // The prompt tells the model to emit the literal "None" for non-food
    // input; that is a product outcome, not a parse failure.
    if raw.contains("None") {
        return Err(NutritionError::NotFood(food_name.to_string()));
    }

    let json_text = extract_json(raw)
        .ok_or_else(|| NutritionError::ResponseParsing(format!("no JSON object in: {raw}")))?;
    let data: Value = serde_json::from_str(json_text)
        .map_err(|e| NutritionError::ResponseParsing(e.to_string()))?;

    let read = |key: &str| -> Result<f64, NutritionError> {
        let value = parse_nutrient_value(data.get(key)).ok_or_else(|| {
            NutritionError::InvalidValues(format!("field '{key}' missing or non-numeric"))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(NutritionError::InvalidValues(format!(
                "field '{key}' is {value}"
            )));
        }
        Ok(value)
    };

    let serving_size = read("serving_size")?;
    let carbohydrate = read("carbohydrate")?;
    let sugar = read("sugar")?;
    let dietary_fiber = read("dietaryFiber")?;
    let protein = read("protein")?;
    let fat = read("fat")?;
    let starch = read("starch")?;

    Ok(FoodNutrition {
        food_name: food_name.to_string(),
        quantity,
        unit,
        serving_size,
        carbohydrate,
        sugar,
        dietary_fiber,
        protein,
        fat,
        starch,
        call_count: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_RESPONSE: &str = r#"{
        "serving_size": 210,
        "carbohydrate": 65.0,
        "starch": 63.0,
        "sugar": 0.5,
        "dietaryFiber": 1.5,
        "protein": 5.5,
        "fat": 0.4
    }"#;

    #[test]
    fn parses_clean_json_response() {
        let record =
            parse_nutrition_response(VALID_RESPONSE, "흰쌀밥", 1.0, Unit::Serving).unwrap();
        assert_eq!(record.food_name, "흰쌀밥");
        assert!((record.serving_size - 210.0).abs() < f64::EPSILON);
        assert!((record.dietary_fiber - 1.5).abs() < f64::EPSILON);
        assert_eq!(record.call_count, 1);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let raw = format!("다음은 결과입니다:\n```json\n{VALID_RESPONSE}\n```");
        let record = parse_nutrition_response(&raw, "흰쌀밥", 1.0, Unit::Serving).unwrap();
        assert!((record.protein - 5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn none_response_means_not_food() {
        let err = parse_nutrition_response("None", "ㅁㄴㅇㄹ", 1.0, Unit::Piece).unwrap_err();
        assert!(matches!(err, NutritionError::NotFood(_)));
    }

    #[test]
    fn missing_json_is_a_parse_error() {
        let err =
            parse_nutrition_response("영양 성분을 알 수 없습니다", "사과", 1.0, Unit::Piece)
                .unwrap_err();
        assert!(matches!(err, NutritionError::ResponseParsing(_)));
    }

    #[test]
    fn string_values_have_units_stripped() {
        let raw = r#"{
            "serving_size": "210g",
            "carbohydrate": "65.0g",
            "starch": 63.0,
            "sugar": 0.5,
            "dietaryFiber": 1.5,
            "protein": 5.5,
            "fat": 0.4
        }"#;
        let record = parse_nutrition_response(raw, "흰쌀밥", 1.0, Unit::Serving).unwrap();
        assert!((record.serving_size - 210.0).abs() < f64::EPSILON);
        assert!((record.carbohydrate - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_values_rejected() {
        let raw = r#"{
            "serving_size": 210,
            "carbohydrate": -1.0,
            "starch": 63.0,
            "sugar": 0.5,
            "dietaryFiber": 1.5,
            "protein": 5.5,
            "fat": 0.4
        }"#;
        let err = parse_nutrition_response(raw, "흰쌀밥", 1.0, Unit::Serving).unwrap_err();
        assert!(matches!(err, NutritionError::InvalidValues(_)));
    }

    #[test]
    fn missing_field_rejected() {
        let raw = r#"{"serving_size": 210, "carbohydrate": 65.0}"#;
        let err = parse_nutrition_response(raw, "흰쌀밥", 1.0, Unit::Serving).unwrap_err();
        assert!(matches!(err, NutritionError::InvalidValues(_)));
    }

    #[test]
    fn user_message_uses_unit_label() {
        let msg = user_message("김치찌개", 1.5, Unit::Serving);
        assert_eq!(msg, "음식명: 김치찌개\n섭취량: 1.5 인분");
    }
}
