//! HealthCalc WASM Module
//!
//! WebAssembly bindings exposing the calculation core to the browser UI.
//! Primitive fast paths return plain numbers; validators and the full
//! calculator pipelines speak JSON strings so the form layer can render
//! results and error messages directly.

use wasm_bindgen::prelude::*;

use healthcalc_shared::activity::process_body_fat_burn;
use healthcalc_shared::body_fat::{
    calculate_body_fat as dispatch_body_fat, calculate_navy_method_body_fat,
    process_body_fat_calculation,
};
use healthcalc_shared::energy::{self, calculate_bmr, process_tdee_calculation};
use healthcalc_shared::nutrition::process_macro_calculation;
use healthcalc_shared::validation::{self, ValidationResult};
use healthcalc_shared::{
    BiologicalSex, BmrFormula, BodyFatBurnInput, BodyFatInput, MacroInput, TdeeInput, UnitSystem,
};

fn sex_from_flag(is_male: bool) -> BiologicalSex {
    if is_male {
        BiologicalSex::Male
    } else {
        BiologicalSex::Female
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// Primitive Fast Paths
// ============================================================================

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    healthcalc_shared::body_fat::calculate_bmi(weight_kg, height_cm).unwrap_or(0.0)
}

/// Calculate TDEE with the Mifflin-St Jeor equation
#[wasm_bindgen]
pub fn calculate_tdee(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    is_male: bool,
    activity_multiplier: f64,
) -> f64 {
    calculate_bmr(
        sex_from_flag(is_male),
        age_years,
        weight_kg,
        height_cm,
        BmrFormula::MifflinStJeor,
        None,
    )
    .and_then(|bmr| energy::calculate_tdee(bmr, activity_multiplier))
    .unwrap_or(0.0)
}

/// BMI with category and healthy-range context; returns a JSON `BmiResult`.
#[wasm_bindgen]
pub fn calculate_bmi_result_json(weight_kg: f64, height_cm: f64) -> Result<String, JsValue> {
    let result = healthcalc_shared::bmi::calculate_bmi_result(weight_kg, height_cm)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&result)
}

/// Ideal weight by the classic formulas; returns a JSON `IdealWeightResult`.
#[wasm_bindgen]
pub fn calculate_ideal_weight_json(height_cm: f64, is_male: bool) -> Result<String, JsValue> {
    let result = healthcalc_shared::bmi::calculate_ideal_weight(height_cm, sex_from_flag(is_male))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&result)
}

/// Navy-method body fat estimate from tape measurements in cm.
/// Pass a non-positive `hips_cm` when the field is not collected.
#[wasm_bindgen]
pub fn navy_body_fat(
    is_male: bool,
    waist_cm: f64,
    neck_cm: f64,
    height_cm: f64,
    hips_cm: f64,
) -> Result<f64, JsValue> {
    let hips = (hips_cm > 0.0).then_some(hips_cm);
    calculate_navy_method_body_fat(sex_from_flag(is_male), waist_cm, neck_cm, height_cm, hips)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// Validators
// ============================================================================

/// Validate one named form field; returns a JSON `ValidationResult`.
/// `units` is `"metric"` or `"imperial"` and only matters for unit-aware
/// fields.
#[wasm_bindgen]
pub fn validate_field(field: &str, value: &str, units: &str) -> String {
    let units: UnitSystem = units.parse().unwrap_or_default();
    let result = match field {
        "age" => validation::validate_age(value),
        "height" => validation::validate_height(value, units),
        "weight" => validation::validate_weight(value, units),
        "waist" => validation::validate_waist(value, units),
        "hip" => validation::validate_hip(value, units),
        "neck" => validation::validate_neck(value, units),
        "body_fat_percentage" => validation::validate_body_fat_percentage(value),
        "calorie_goal" => validation::validate_calorie_goal(value),
        "speed" => validation::validate_speed(value, units),
        "duration" => validation::validate_duration(value),
        "frequency" => validation::validate_frequency(value),
        "burn_goal" => validation::validate_burn_goal(value),
        _ => ValidationResult::invalid(format!("Unknown field: {field}")),
    };
    serde_json::to_string(&result)
        .unwrap_or_else(|_| r#"{"is_valid":false,"error":"serialization failed"}"#.to_string())
}

/// Cross-field waist/hip check; returns a JSON `ValidationResult`.
#[wasm_bindgen]
pub fn validate_waist_hip_ratio(waist: f64, hip: f64) -> String {
    let result = validation::validate_waist_hip_ratio(waist, hip);
    serde_json::to_string(&result)
        .unwrap_or_else(|_| r#"{"is_valid":false,"error":"serialization failed"}"#.to_string())
}

// ============================================================================
// Calculator Pipelines
// ============================================================================

/// Run the TDEE calculator on a JSON `TdeeInput`; returns a JSON
/// `TdeeResult` or rejects with the error message.
#[wasm_bindgen]
pub fn process_tdee_json(input_json: &str) -> Result<String, JsValue> {
    let input: TdeeInput = serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid input: {e}")))?;
    let result =
        process_tdee_calculation(&input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&result)
}

/// Run the macro calculator on a JSON `MacroInput`; returns a JSON
/// `MacroResult` or rejects with the error message.
#[wasm_bindgen]
pub fn process_macros_json(input_json: &str) -> Result<String, JsValue> {
    let input: MacroInput = serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid input: {e}")))?;
    let result =
        process_macro_calculation(&input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&result)
}

/// Run the body fat estimate on a JSON method-tagged `BodyFatInput`;
/// returns the percentage or rejects with the error message.
#[wasm_bindgen]
pub fn calculate_body_fat_json(input_json: &str) -> Result<f64, JsValue> {
    let input: BodyFatInput = serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid input: {e}")))?;
    dispatch_body_fat(&input).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Full body fat result (estimate + category + optional mass split) from a
/// JSON `BodyFatInput`. Pass a non-positive `weight_kg` to skip the mass
/// split.
#[wasm_bindgen]
pub fn process_body_fat_json(
    is_male: bool,
    input_json: &str,
    weight_kg: f64,
) -> Result<String, JsValue> {
    let input: BodyFatInput = serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid input: {e}")))?;
    let weight = (weight_kg > 0.0).then_some(weight_kg);
    let result = process_body_fat_calculation(sex_from_flag(is_male), &input, weight)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&result)
}

/// Run the body-fat-burn calculator on a JSON `BodyFatBurnInput`; returns a
/// JSON `BodyFatBurnResult` or rejects with the error message.
#[wasm_bindgen]
pub fn process_body_fat_burn_json(input_json: &str) -> Result<String, JsValue> {
    let input: BodyFatBurnInput = serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid input: {e}")))?;
    let result = process_body_fat_burn(&input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&result)
}
