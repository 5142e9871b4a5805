use serde::{Deserialize, Serialize};

/// Intake unit for a meal entry. Serialized as the integer code the mobile
/// client sends (0: 인분, 1: 개, 2: 접시, 3: g, 4: ml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Unit {
    Serving,
    Piece,
    Plate,
    Gram,
    Milliliter,
}

impl Unit {
    /// Wire code of this unit.
    pub fn code(self) -> i64 {
        match self {
            Unit::Serving => 0,
            Unit::Piece => 1,
            Unit::Plate => 2,
            Unit::Gram => 3,
            Unit::Milliliter => 4,
        }
    }

    /// Korean label used in the generation prompt.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Serving => "인분",
            Unit::Piece => "개",
            Unit::Plate => "접시",
            Unit::Gram => "g",
            Unit::Milliliter => "ml",
        }
    }
}

impl TryFrom<i64> for Unit {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Unit::Serving),
            1 => Ok(Unit::Piece),
            2 => Ok(Unit::Plate),
            3 => Ok(Unit::Gram),
            4 => Ok(Unit::Milliliter),
            other => Err(format!(
                "unit code {other} out of range (0: 인분, 1: 개, 2: 접시, 3: g, 4: ml)"
            )),
        }
    }
}

impl From<Unit> for i64 {
    fn from(unit: Unit) -> i64 {
        unit.code()
    }
}

/// One cached nutrition estimate, keyed by (food_name, quantity, unit).
///
/// The carbohydrate figure follows the generation prompt's identity:
/// carbohydrate = starch + sugar + dietary fiber (produced by the model, not
/// recomputed here).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodNutrition {
    pub food_name: String,
    pub quantity: f64,
    pub unit: Unit,
    /// Estimated single-serving size in grams.
    pub serving_size: f64,
    pub carbohydrate: f64,
    pub sugar: f64,
    pub dietary_fiber: f64,
    pub protein: f64,
    pub fat: f64,
    pub starch: f64,
    /// How many times this estimate has been requested.
    pub call_count: i64,
}

/// Whether an estimate was served from the cache or freshly generated; the
/// HTTP layer maps this onto 200 vs 201.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
    Cached(FoodNutrition),
    Generated(FoodNutrition),
}

impl EstimateOutcome {
    pub fn record(&self) -> &FoodNutrition {
        match self {
            EstimateOutcome::Cached(record) | EstimateOutcome::Generated(record) => record,
        }
    }
}
