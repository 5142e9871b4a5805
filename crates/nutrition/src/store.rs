use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::error::NutritionError;
use crate::types::{FoodNutrition, Unit};

/// SQLite-backed cache of nutrition estimates.
///
/// One row per (food_name, quantity, unit); repeated requests bump
/// `call_count` instead of paying for another LLM call. The connection sits
/// behind a mutex - lookups are single-row point reads, so contention is not
/// a concern at this traffic.
pub struct NutritionStore {
    conn: Mutex<Connection>,
}

impl NutritionStore {
    /// Open (and initialize) the cache at `path`.
    pub fn open(path: &Path) -> Result<Self, NutritionError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, NutritionError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, NutritionError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS food_nutrition (
                food_name     TEXT    NOT NULL,
                quantity      REAL    NOT NULL,
                unit          INTEGER NOT NULL,
                serving_size  REAL    NOT NULL,
                carbohydrate  REAL,
                sugar         REAL,
                dietary_fiber REAL,
                protein       REAL,
                fat           REAL,
                starch        REAL,
                call_count    INTEGER NOT NULL DEFAULT 0,
                created_at    TEXT    NOT NULL,
                updated_at    TEXT    NOT NULL,
                PRIMARY KEY (food_name, quantity, unit)
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fetch a cached estimate, bumping `call_count` and `updated_at` on hit.
    pub fn lookup(
        &self,
        food_name: &str,
        quantity: f64,
        unit: Unit,
    ) -> Result<Option<FoodNutrition>, NutritionError> {
        let conn = self.conn.lock().expect("nutrition store lock poisoned");

        let updated = conn.execute(
            "UPDATE food_nutrition
             SET call_count = call_count + 1, updated_at = ?4
             WHERE food_name = ?1 AND quantity = ?2 AND unit = ?3",
            params![food_name, quantity, unit.code(), Utc::now().to_rfc3339()],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        let record = conn
            .query_row(
                "SELECT food_name, quantity, unit, serving_size, carbohydrate, sugar,
                        dietary_fiber, protein, fat, starch, call_count
                 FROM food_nutrition
                 WHERE food_name = ?1 AND quantity = ?2 AND unit = ?3",
                params![food_name, quantity, unit.code()],
                |row| {
                    // The WHERE clause pins the unit column, so the row's
                    // unit is the one we were asked for.
                    Ok(FoodNutrition {
                        food_name: row.get(0)?,
                        quantity: row.get(1)?,
                        unit,
                        serving_size: row.get(3)?,
                        carbohydrate: row.get(4)?,
                        sugar: row.get(5)?,
                        dietary_fiber: row.get(6)?,
                        protein: row.get(7)?,
                        fat: row.get(8)?,
                        starch: row.get(9)?,
                        call_count: row.get(10)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Persist a freshly generated estimate.
    pub fn insert(&self, record: &FoodNutrition) -> Result<(), NutritionError> {
        let conn = self.conn.lock().expect("nutrition store lock poisoned");
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT OR REPLACE INTO food_nutrition
                 (food_name, quantity, unit, serving_size, carbohydrate, sugar,
                  dietary_fiber, protein, fat, starch, call_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                record.food_name,
                record.quantity,
                record.unit.code(),
                record.serving_size,
                record.carbohydrate,
                record.sugar,
                record.dietary_fiber,
                record.protein,
                record.fat,
                record.starch,
                record.call_count,
                now,
            ],
        )?;
        Ok(())
    }
}
