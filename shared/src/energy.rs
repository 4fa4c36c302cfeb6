//! Basal metabolic rate and daily energy expenditure
//!
//! Implements the BMR → TDEE → calorie-target chain behind the TDEE and
//! calorie calculators, plus the linear weight-change projections.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: all calculations are pure, no side effects
//! 2. **Evidence-Based**: formulas from peer-reviewed research
//! 3. **Configurable**: three BMR formula variants behind one entry point
//! 4. **Metric Internals**: callers convert units before invoking

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::errors::CalcError;
use crate::units::{inches_to_cm, lbs_to_kg, UnitSystem};

/// Safety floor for any calorie target (kcal/day)
pub const MIN_DAILY_CALORIES: f64 = 1200.0;
/// Energy equivalent of one kilogram of body weight
pub const KCAL_PER_KG: f64 = 7700.0;

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex for physiological calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise or physical job
    ExtremelyActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtremelyActive => "Very hard exercise or physical job",
        }
    }

    /// Resolve a level name. Unknown names fall back to `Sedentary` rather
    /// than failing; see [`get_activity_multiplier`].
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "lightly_active" => ActivityLevel::LightlyActive,
            "moderately_active" => ActivityLevel::ModeratelyActive,
            "very_active" => ActivityLevel::VeryActive,
            "extremely_active" => ActivityLevel::ExtremelyActive,
            _ => ActivityLevel::Sedentary,
        }
    }
}

/// Multiplier for a level name. Unlike the BMR formula lookup, an unknown
/// name is not an error here: it silently resolves to the sedentary
/// multiplier. Callers rely on that.
pub fn get_activity_multiplier(name: &str) -> f64 {
    ActivityLevel::from_name(name).multiplier()
}

/// BMR formula variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    /// Mifflin-St Jeor (most accurate for most people)
    #[default]
    MifflinStJeor,
    /// Harris-Benedict (revised coefficients)
    HarrisBenedict,
    /// Katch-McArdle (uses lean body mass)
    KatchMcArdle,
}

impl FromStr for BmrFormula {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mifflin_st_jeor" => Ok(BmrFormula::MifflinStJeor),
            "harris_benedict" => Ok(BmrFormula::HarrisBenedict),
            "katch_mcardle" => Ok(BmrFormula::KatchMcArdle),
            _ => Err(CalcError::UnknownFormula(s.to_string())),
        }
    }
}

// ============================================================================
// BMR
// ============================================================================

/// Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub(crate) fn mifflin_st_jeor(sex: BiologicalSex, age: i32, weight_kg: f64, height_cm: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    }
}

fn check_body_metrics(age: i32, weight_kg: f64, height_cm: f64) -> Result<(), CalcError> {
    if !(1..=120).contains(&age) {
        return Err(CalcError::invalid("Age must be between 1 and 120 years"));
    }
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return Err(CalcError::invalid("Weight must be greater than 0"));
    }
    if height_cm.is_nan() || height_cm <= 0.0 {
        return Err(CalcError::invalid("Height must be greater than 0"));
    }
    Ok(())
}

/// Calculate Basal Metabolic Rate with the selected formula variant.
///
/// `body_fat_percent` only matters for Katch-McArdle; when omitted it
/// defaults to a sex-based estimate (15% male, 25% female).
pub fn calculate_bmr(
    sex: BiologicalSex,
    age: i32,
    weight_kg: f64,
    height_cm: f64,
    formula: BmrFormula,
    body_fat_percent: Option<f64>,
) -> Result<f64, CalcError> {
    check_body_metrics(age, weight_kg, height_cm)?;
    match formula {
        BmrFormula::MifflinStJeor => Ok(mifflin_st_jeor(sex, age, weight_kg, height_cm)),
        BmrFormula::HarrisBenedict => Ok(match sex {
            BiologicalSex::Male => {
                88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age as f64
            }
            BiologicalSex::Female => {
                447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age as f64
            }
        }),
        BmrFormula::KatchMcArdle => {
            let body_fat = body_fat_percent.unwrap_or(match sex {
                BiologicalSex::Male => 15.0,
                BiologicalSex::Female => 25.0,
            });
            if body_fat.is_nan() || body_fat <= 0.0 || body_fat >= 100.0 {
                return Err(CalcError::invalid(
                    "Body fat percentage must be between 0 and 100",
                ));
            }
            let lean_body_mass = weight_kg * (1.0 - body_fat / 100.0);
            Ok(370.0 + 21.6 * lean_body_mass)
        }
    }
}

// ============================================================================
// TDEE and Calorie Targets
// ============================================================================

/// TDEE = BMR × activity multiplier
pub fn calculate_tdee(bmr: f64, multiplier: f64) -> Result<f64, CalcError> {
    if bmr.is_nan() || bmr <= 0.0 {
        return Err(CalcError::invalid("BMR must be greater than 0"));
    }
    if multiplier.is_nan() || multiplier <= 0.0 {
        return Err(CalcError::invalid(
            "Activity multiplier must be greater than 0",
        ));
    }
    Ok(bmr * multiplier)
}

/// Named calorie targets derived from TDEE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGoals {
    pub maintain: f64,
    pub mild_loss: f64,
    pub moderate_loss: f64,
    pub extreme_loss: f64,
    pub mild_gain: f64,
    pub moderate_gain: f64,
    pub extreme_gain: f64,
}

/// Seven calorie targets around maintenance. Loss targets floor at
/// [`MIN_DAILY_CALORIES`]; gain targets are never capped.
pub fn calculate_weight_goals(tdee: f64) -> Result<WeightGoals, CalcError> {
    if tdee.is_nan() || tdee <= 0.0 {
        return Err(CalcError::invalid("TDEE must be greater than 0"));
    }
    let floored_loss = |deficit: f64| (tdee - deficit).max(MIN_DAILY_CALORIES);
    Ok(WeightGoals {
        maintain: tdee,
        mild_loss: floored_loss(250.0),
        moderate_loss: floored_loss(500.0),
        extreme_loss: floored_loss(1000.0),
        mild_gain: tdee + 250.0,
        moderate_gain: tdee + 500.0,
        extreme_gain: tdee + 1000.0,
    })
}

// ============================================================================
// Weight Change Projections
// ============================================================================

/// Linear weight-change model: 7700 kcal per kg of body weight.
///
/// Returns the projected weight in kg after `days` at `target_calories`.
pub fn estimate_weight_change(
    current_weight_kg: f64,
    tdee: f64,
    target_calories: f64,
    days: f64,
) -> Result<f64, CalcError> {
    if current_weight_kg.is_nan() || current_weight_kg <= 0.0 {
        return Err(CalcError::invalid("Current weight must be greater than 0"));
    }
    if tdee.is_nan() || tdee <= 0.0 {
        return Err(CalcError::invalid("TDEE must be greater than 0"));
    }
    if target_calories.is_nan() || target_calories <= 0.0 {
        return Err(CalcError::invalid("Target calories must be greater than 0"));
    }
    if days.is_nan() || days <= 0.0 {
        return Err(CalcError::invalid("Days must be greater than 0"));
    }
    Ok(current_weight_kg + (target_calories - tdee) * days / KCAL_PER_KG)
}

/// Days needed to move from `current_weight_kg` to `target_weight_kg` at the
/// given intake.
///
/// Returns `0` when already at the target, and `f64::INFINITY` when the
/// caloric direction cannot reach the goal (surplus while needing loss,
/// deficit while needing gain, or intake equal to TDEE). Infinity is a
/// signal, not an error: treat it as "unreachable under current intake".
pub fn calculate_time_to_target_weight(
    current_weight_kg: f64,
    target_weight_kg: f64,
    tdee: f64,
    target_calories: f64,
) -> Result<f64, CalcError> {
    if current_weight_kg.is_nan() || current_weight_kg <= 0.0 {
        return Err(CalcError::invalid("Current weight must be greater than 0"));
    }
    if target_weight_kg.is_nan() || target_weight_kg <= 0.0 {
        return Err(CalcError::invalid("Target weight must be greater than 0"));
    }
    if tdee.is_nan() || tdee <= 0.0 {
        return Err(CalcError::invalid("TDEE must be greater than 0"));
    }
    if target_calories.is_nan() || target_calories <= 0.0 {
        return Err(CalcError::invalid("Target calories must be greater than 0"));
    }
    if current_weight_kg == target_weight_kg {
        return Ok(0.0);
    }
    let needed_kg = target_weight_kg - current_weight_kg;
    let daily_surplus = target_calories - tdee;
    if daily_surplus == 0.0 || (needed_kg > 0.0) != (daily_surplus > 0.0) {
        return Ok(f64::INFINITY);
    }
    Ok(needed_kg * KCAL_PER_KG / daily_surplus)
}

// ============================================================================
// TDEE Orchestration
// ============================================================================

/// Raw form values for the TDEE calculator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TdeeInput {
    pub sex: BiologicalSex,
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120 years"))]
    pub age: i32,
    /// Weight in kg (metric) or lb (imperial)
    #[validate(range(min = 0.001, message = "Weight must be greater than 0"))]
    pub weight: f64,
    /// Height in cm (metric) or total inches (imperial)
    #[validate(range(min = 0.001, message = "Height must be greater than 0"))]
    pub height: f64,
    #[serde(default)]
    pub units: UnitSystem,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub formula: BmrFormula,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
}

impl TdeeInput {
    /// Weight and height normalized to kg/cm.
    pub(crate) fn metric_body(&self) -> (f64, f64) {
        match self.units {
            UnitSystem::Metric => (self.weight, self.height),
            UnitSystem::Imperial => (lbs_to_kg(self.weight), inches_to_cm(self.height)),
        }
    }
}

/// TDEE calculation result with breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdeeResult {
    /// Basal Metabolic Rate
    pub bmr: f64,
    /// Total Daily Energy Expenditure
    pub tdee: f64,
    /// Activity multiplier used
    pub activity_multiplier: f64,
    /// Calorie targets for each weight goal
    pub weight_goals: WeightGoals,
}

/// Full TDEE pipeline: unit conversion → BMR → TDEE → calorie targets.
/// Failures are logged and re-raised.
pub fn process_tdee_calculation(input: &TdeeInput) -> Result<TdeeResult, CalcError> {
    tdee_pipeline(input).map_err(|err| {
        tracing::error!(%err, "TDEE calculation failed");
        err
    })
}

fn tdee_pipeline(input: &TdeeInput) -> Result<TdeeResult, CalcError> {
    input.validate()?;
    let (weight_kg, height_cm) = input.metric_body();
    let bmr = calculate_bmr(
        input.sex,
        input.age,
        weight_kg,
        height_cm,
        input.formula,
        input.body_fat_percent,
    )?;
    let multiplier = input.activity_level.multiplier();
    let tdee = calculate_tdee(bmr, multiplier)?;
    let weight_goals = calculate_weight_goals(tdee)?;
    Ok(TdeeResult {
        bmr,
        tdee,
        activity_multiplier: multiplier,
        weight_goals,
    })
}
