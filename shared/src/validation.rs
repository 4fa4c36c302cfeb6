//! Input validation for calculator form fields
//!
//! Every validator here returns a [`ValidationResult`]; none of them fail
//! with an error type. Callers branch on `is_valid` and surface `error`
//! directly in the form UI. The formula library in the sibling modules is the
//! opposite: it raises [`CalcError`](crate::errors::CalcError) on contract
//! violations.
//!
//! Check order per field is part of the contract, since the UI asserts on
//! specific messages:
//!
//! 1. coercion to a finite number
//! 2. positivity (where zero/negative is physically meaningless)
//! 3. range against the unit-aware bounds table
//! 4. whole-number check (integer-only fields)

use serde::Serialize;

use crate::units::{FeetInches, UnitSystem};

// ============================================================================
// Result and Raw Input Types
// ============================================================================

/// Outcome of a single field validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Raw form value as it arrives from an input element
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> From<f64> for RawValue<'a> {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl<'a> From<i32> for RawValue<'a> {
    fn from(value: i32) -> Self {
        RawValue::Number(value as f64)
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(value: &'a str) -> Self {
        RawValue::Text(value)
    }
}

/// Coerce a raw value to a finite number. Empty strings, unparseable text,
/// NaN and infinities all land in the "valid number" failure branch.
fn coerce(value: &RawValue<'_>) -> Option<f64> {
    match value {
        RawValue::Number(n) => n.is_finite().then_some(*n),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
    }
}

// ============================================================================
// Bounds Table
// ============================================================================

/// Inclusive bounds for one field in one unit
struct Bounds {
    min: f64,
    max: f64,
    unit: &'static str,
}

impl Bounds {
    const fn new(min: f64, max: f64, unit: &'static str) -> Self {
        Self { min, max, unit }
    }

    fn suffix(&self) -> String {
        match self.unit {
            "" => String::new(),
            "%" => "%".to_string(),
            unit => format!(" {unit}"),
        }
    }

    fn too_small(&self, field: &str) -> String {
        format!("{field} must be at least {}{}", self.min, self.suffix())
    }

    fn too_large(&self, field: &str) -> String {
        format!("{field} must be less than {}{}", self.max, self.suffix())
    }
}

const AGE: Bounds = Bounds::new(1.0, 120.0, "");
const HEIGHT_CM: Bounds = Bounds::new(30.0, 300.0, "cm");
const HEIGHT_FT: Bounds = Bounds::new(1.0, 10.0, "ft");
const WEIGHT_KG: Bounds = Bounds::new(2.0, 600.0, "kg");
const WEIGHT_LB: Bounds = Bounds::new(5.0, 1300.0, "lb");
const WAIST_CM: Bounds = Bounds::new(20.0, 300.0, "cm");
const WAIST_IN: Bounds = Bounds::new(8.0, 120.0, "in");
const HIP_CM: Bounds = WAIST_CM;
const HIP_IN: Bounds = WAIST_IN;
const NECK_CM: Bounds = Bounds::new(10.0, 100.0, "cm");
const NECK_IN: Bounds = Bounds::new(4.0, 40.0, "in");
const BODY_FAT_PCT: Bounds = Bounds::new(1.0, 70.0, "%");
const CALORIE_GOAL: Bounds = Bounds::new(-5000.0, 5000.0, "kcal");
const SPEED_MPH: Bounds = Bounds::new(0.1, 30.0, "mph");
const SPEED_KMH: Bounds = Bounds::new(0.1, 48.0, "km/h");
const DURATION_MIN: Bounds = Bounds::new(1.0, 1440.0, "minutes");
const FREQUENCY: Bounds = Bounds::new(1.0, 14.0, "");
const BURN_GOAL_LB: Bounds = Bounds::new(0.1, 500.0, "lb");

/// Shared check pipeline; see the module docs for the ordering contract.
fn check_field(
    field: &str,
    value: RawValue<'_>,
    bounds: &Bounds,
    must_be_positive: bool,
    whole_number: bool,
) -> ValidationResult {
    let Some(number) = coerce(&value) else {
        return ValidationResult::invalid(format!("{field} must be a valid number"));
    };
    if must_be_positive && number <= 0.0 {
        return ValidationResult::invalid(format!("{field} must be greater than 0"));
    }
    if number < bounds.min {
        return ValidationResult::invalid(bounds.too_small(field));
    }
    if number > bounds.max {
        return ValidationResult::invalid(bounds.too_large(field));
    }
    // Runs after the range check: an out-of-range fraction reports the range
    // error, not the whole-number error.
    if whole_number && number.fract() != 0.0 {
        return ValidationResult::invalid(format!("{field} must be a whole number"));
    }
    ValidationResult::valid()
}

// ============================================================================
// Field Validators
// ============================================================================

/// Age in years, whole numbers only
pub fn validate_age<'v>(value: impl Into<RawValue<'v>>) -> ValidationResult {
    check_field("Age", value.into(), &AGE, true, true)
}

/// Height in cm (metric) or feet (imperial). Imperial text input also accepts
/// `5'10"` notation.
pub fn validate_height<'v>(value: impl Into<RawValue<'v>>, units: UnitSystem) -> ValidationResult {
    let value = value.into();
    match units {
        UnitSystem::Metric => check_field("Height", value, &HEIGHT_CM, true, false),
        UnitSystem::Imperial => {
            if let RawValue::Text(s) = &value {
                if let Ok(parsed) = s.parse::<FeetInches>() {
                    let feet = parsed.to_total_inches() / 12.0;
                    return check_field("Height", RawValue::Number(feet), &HEIGHT_FT, true, false);
                }
            }
            check_field("Height", value, &HEIGHT_FT, true, false)
        }
    }
}

/// Body weight in kg (metric) or lb (imperial)
pub fn validate_weight<'v>(value: impl Into<RawValue<'v>>, units: UnitSystem) -> ValidationResult {
    let bounds = if units.is_metric() { &WEIGHT_KG } else { &WEIGHT_LB };
    check_field("Weight", value.into(), bounds, true, false)
}

/// Waist circumference in cm (metric) or in (imperial)
pub fn validate_waist<'v>(value: impl Into<RawValue<'v>>, units: UnitSystem) -> ValidationResult {
    let bounds = if units.is_metric() { &WAIST_CM } else { &WAIST_IN };
    check_field("Waist", value.into(), bounds, true, false)
}

/// Hip circumference in cm (metric) or in (imperial)
pub fn validate_hip<'v>(value: impl Into<RawValue<'v>>, units: UnitSystem) -> ValidationResult {
    let bounds = if units.is_metric() { &HIP_CM } else { &HIP_IN };
    check_field("Hip", value.into(), bounds, true, false)
}

/// Neck circumference in cm (metric) or in (imperial)
pub fn validate_neck<'v>(value: impl Into<RawValue<'v>>, units: UnitSystem) -> ValidationResult {
    let bounds = if units.is_metric() { &NECK_CM } else { &NECK_IN };
    check_field("Neck", value.into(), bounds, true, false)
}

/// Body fat percentage
pub fn validate_body_fat_percentage<'v>(value: impl Into<RawValue<'v>>) -> ValidationResult {
    check_field("Body fat percentage", value.into(), &BODY_FAT_PCT, true, false)
}

/// Daily calorie adjustment goal; deficits are negative, so no positivity check
pub fn validate_calorie_goal<'v>(value: impl Into<RawValue<'v>>) -> ValidationResult {
    check_field("Calorie goal", value.into(), &CALORIE_GOAL, false, false)
}

/// Activity speed in mph (imperial) or km/h (metric)
pub fn validate_speed<'v>(value: impl Into<RawValue<'v>>, units: UnitSystem) -> ValidationResult {
    let bounds = if units.is_metric() { &SPEED_KMH } else { &SPEED_MPH };
    check_field("Speed", value.into(), bounds, true, false)
}

/// Session duration in minutes
pub fn validate_duration<'v>(value: impl Into<RawValue<'v>>) -> ValidationResult {
    check_field("Duration", value.into(), &DURATION_MIN, true, false)
}

/// Sessions per week, whole numbers only
pub fn validate_frequency<'v>(value: impl Into<RawValue<'v>>) -> ValidationResult {
    check_field("Frequency", value.into(), &FREQUENCY, true, true)
}

/// Fat-loss goal in pounds
pub fn validate_burn_goal<'v>(value: impl Into<RawValue<'v>>) -> ValidationResult {
    check_field("Burn goal", value.into(), &BURN_GOAL_LB, true, false)
}

/// Cross-field check for the waist-hip ratio calculator. Assumes both values
/// already passed their single-field validators.
pub fn validate_waist_hip_ratio(waist: f64, hip: f64) -> ValidationResult {
    if !waist.is_finite() || !hip.is_finite() {
        return ValidationResult::invalid("Waist and hip must be valid numbers");
    }
    if waist >= hip {
        return ValidationResult::invalid("Waist measurement must be less than hip measurement");
    }
    ValidationResult::valid()
}
