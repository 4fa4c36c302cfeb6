//! Saved calculation results
//!
//! The browser-storage store itself lives outside this crate; this module
//! defines the records it persists. The store is an opaque key-value space
//! keyed by calculator type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Calculator that produced a saved result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Tdee,
    Macros,
    BodyFat,
    BodyFatBurn,
}

impl CalculatorKind {
    /// Storage key for this calculator's saved results
    pub fn storage_key(&self) -> &'static str {
        match self {
            CalculatorKind::Tdee => "healthcalc:tdee",
            CalculatorKind::Macros => "healthcalc:macros",
            CalculatorKind::BodyFat => "healthcalc:body_fat",
            CalculatorKind::BodyFatBurn => "healthcalc:body_fat_burn",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            CalculatorKind::Tdee => "TDEE & Calories",
            CalculatorKind::Macros => "Macro Split",
            CalculatorKind::BodyFat => "Body Fat",
            CalculatorKind::BodyFatBurn => "Body Fat Burn",
        }
    }
}

/// One saved calculator result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedResult {
    pub id: Uuid,
    pub calculator: CalculatorKind,
    pub saved_at: DateTime<Utc>,
    /// The serialized result object as the calculator produced it
    pub payload: serde_json::Value,
}

impl SavedResult {
    pub fn new(calculator: CalculatorKind, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            calculator,
            saved_at: Utc::now(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storage_keys_are_distinct() {
        let kinds = [
            CalculatorKind::Tdee,
            CalculatorKind::Macros,
            CalculatorKind::BodyFat,
            CalculatorKind::BodyFatBurn,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.storage_key(), b.storage_key());
            }
        }
    }

    #[test]
    fn test_saved_result_round_trip() {
        let saved = SavedResult::new(
            CalculatorKind::Tdee,
            json!({ "bmr": 1648.75, "tdee": 2555.56 }),
        );
        let serialized = serde_json::to_string(&saved).unwrap();
        let back: SavedResult = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back.id, saved.id);
        assert_eq!(back.calculator, CalculatorKind::Tdee);
        assert_eq!(back.payload["bmr"], json!(1648.75));
    }

    #[test]
    fn test_calculator_kind_tag_format() {
        let tag = serde_json::to_string(&CalculatorKind::BodyFatBurn).unwrap();
        assert_eq!(tag, "\"body_fat_burn\"");
    }
}
