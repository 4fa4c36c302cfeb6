//! Macro split and protein requirement calculations
//!
//! Allocates a calorie target across protein, carbs and fat, either from a
//! named goal preset or from caller-supplied percentages, with a per-meal
//! breakdown. Grams and calories round independently per macro; totals may
//! drift a few kcal from the target and that is accepted domain behavior,
//! not something to redistribute away.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::energy::{
    calculate_bmr, calculate_tdee, ActivityLevel, BiologicalSex, BmrFormula, MIN_DAILY_CALORIES,
};
use crate::errors::CalcError;
use crate::units::{inches_to_cm, lbs_to_kg, UnitSystem};

/// Calories per gram of protein
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
/// Calories per gram of carbohydrate
pub const CARBS_KCAL_PER_G: f64 = 4.0;
/// Calories per gram of fat
pub const FAT_KCAL_PER_G: f64 = 9.0;
/// Meals per day for the per-meal breakdown
pub const MEALS_PER_DAY: f64 = 3.0;

// ============================================================================
// Goals and Splits
// ============================================================================

/// Percentage split across the three macros
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Named macro goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MacroGoal {
    WeightLoss,
    #[default]
    Maintenance,
    MuscleGain,
    /// Caller supplies split and calorie adjustment
    Custom,
}

impl MacroGoal {
    /// Preset percentage split; `None` for the custom goal.
    pub fn preset_split(&self) -> Option<MacroSplit> {
        match self {
            MacroGoal::WeightLoss => Some(MacroSplit {
                protein: 40.0,
                carbs: 40.0,
                fat: 20.0,
            }),
            MacroGoal::Maintenance => Some(MacroSplit {
                protein: 30.0,
                carbs: 35.0,
                fat: 35.0,
            }),
            MacroGoal::MuscleGain => Some(MacroSplit {
                protein: 30.0,
                carbs: 40.0,
                fat: 30.0,
            }),
            MacroGoal::Custom => None,
        }
    }

    /// Additive calorie adjustment applied to TDEE; `None` for custom.
    pub fn calorie_adjustment(&self) -> Option<f64> {
        match self {
            MacroGoal::WeightLoss => Some(-500.0),
            MacroGoal::Maintenance => Some(0.0),
            MacroGoal::MuscleGain => Some(500.0),
            MacroGoal::Custom => None,
        }
    }
}

// ============================================================================
// Breakdown Calculations
// ============================================================================

/// One macro's share of the daily target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    /// Grams per day, rounded to the nearest whole gram
    pub grams: u32,
    /// Calories per day, rounded to the nearest kcal
    pub calories: u32,
    /// Share of the daily target, 0-100
    pub percentage: f64,
}

/// Grams and calories for one macro at `percentage` of the target.
pub fn calculate_macro_breakdown(
    target_calories: f64,
    percentage: f64,
    calories_per_gram: f64,
) -> Result<MacroBreakdown, CalcError> {
    if target_calories.is_nan() || target_calories <= 0.0 {
        return Err(CalcError::invalid("Target calories must be greater than 0"));
    }
    if !(0.0..=100.0).contains(&percentage) {
        return Err(CalcError::invalid("Percentage must be between 0 and 100"));
    }
    if calories_per_gram.is_nan() || calories_per_gram <= 0.0 {
        return Err(CalcError::invalid(
            "Calories per gram must be greater than 0",
        ));
    }
    let calories = target_calories * percentage / 100.0;
    Ok(MacroBreakdown {
        grams: (calories / calories_per_gram).round() as u32,
        calories: calories.round() as u32,
        percentage,
    })
}

fn check_split(split: MacroSplit) -> Result<(), CalcError> {
    let sum = split.protein + split.carbs + split.fat;
    if (sum - 100.0).abs() > 1e-6 {
        return Err(CalcError::invalid("Macro percentages must sum to 100"));
    }
    if !(10.0..=50.0).contains(&split.protein) {
        return Err(CalcError::invalid(
            "Protein percentage must be between 10 and 50",
        ));
    }
    if split.fat < 15.0 {
        return Err(CalcError::invalid("Fat percentage must be at least 15"));
    }
    Ok(())
}

/// Daily breakdown for all three macros
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMacros {
    pub protein: MacroBreakdown,
    pub carbs: MacroBreakdown,
    pub fat: MacroBreakdown,
}

/// Allocate `target_calories` across a split. The split must sum to exactly
/// 100 and satisfy the protein (10-50%) and fat (>=15%) guardrails.
pub fn calculate_macros(target_calories: f64, split: MacroSplit) -> Result<DailyMacros, CalcError> {
    check_split(split)?;
    Ok(DailyMacros {
        protein: calculate_macro_breakdown(target_calories, split.protein, PROTEIN_KCAL_PER_G)?,
        carbs: calculate_macro_breakdown(target_calories, split.carbs, CARBS_KCAL_PER_G)?,
        fat: calculate_macro_breakdown(target_calories, split.fat, FAT_KCAL_PER_G)?,
    })
}

/// Apply the goal's calorie adjustment to TDEE, floored at
/// [`MIN_DAILY_CALORIES`].
pub fn calculate_target_calories(
    tdee: f64,
    goal: MacroGoal,
    custom_adjustment: Option<f64>,
) -> Result<f64, CalcError> {
    if tdee.is_nan() || tdee <= 0.0 {
        return Err(CalcError::invalid("TDEE must be greater than 0"));
    }
    let adjustment = match goal.calorie_adjustment() {
        Some(adjustment) => adjustment,
        None => custom_adjustment.ok_or(CalcError::MissingField("custom_adjustment"))?,
    };
    Ok((tdee + adjustment).max(MIN_DAILY_CALORIES))
}

/// Grams of each macro per meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerMealMacros {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub calories: u32,
}

/// Split daily grams across [`MEALS_PER_DAY`] meals. Each macro rounds
/// independently; the three meals may not sum exactly to the daily totals.
pub fn calculate_per_meal_macros(
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    calories: f64,
) -> Result<PerMealMacros, CalcError> {
    for (name, value) in [
        ("Protein grams", protein_g),
        ("Carbs grams", carbs_g),
        ("Fat grams", fat_g),
        ("Calories", calories),
    ] {
        if value.is_nan() || value < 0.0 {
            return Err(CalcError::invalid(format!("{name} must be 0 or greater")));
        }
    }
    Ok(PerMealMacros {
        protein_g: (protein_g / MEALS_PER_DAY).round() as u32,
        carbs_g: (carbs_g / MEALS_PER_DAY).round() as u32,
        fat_g: (fat_g / MEALS_PER_DAY).round() as u32,
        calories: (calories / MEALS_PER_DAY).round() as u32,
    })
}

// ============================================================================
// Protein Requirement
// ============================================================================

/// Recommended daily protein intake range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProteinRequirement {
    pub min_grams: f64,
    pub max_grams: f64,
    pub min_g_per_kg: f64,
    pub max_g_per_kg: f64,
}

/// Protein range in g/kg scaled by activity level.
pub fn calculate_protein_requirement(
    weight_kg: f64,
    activity_level: ActivityLevel,
) -> Result<ProteinRequirement, CalcError> {
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return Err(CalcError::invalid("Weight must be greater than 0"));
    }
    let (min_g_per_kg, max_g_per_kg) = match activity_level {
        ActivityLevel::Sedentary => (0.8, 1.0),
        ActivityLevel::LightlyActive => (1.0, 1.2),
        ActivityLevel::ModeratelyActive => (1.2, 1.6),
        ActivityLevel::VeryActive => (1.6, 1.8),
        ActivityLevel::ExtremelyActive => (1.8, 2.2),
    };
    Ok(ProteinRequirement {
        min_grams: weight_kg * min_g_per_kg,
        max_grams: weight_kg * max_g_per_kg,
        min_g_per_kg,
        max_g_per_kg,
    })
}

// ============================================================================
// Macro Orchestration
// ============================================================================

/// Raw form values for the macro calculator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MacroInput {
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
    #[serde(default)]
    pub goal: MacroGoal,
    /// Calorie adjustment for the custom goal; presets ignore it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_adjustment: Option<f64>,
    /// Percentage split for the custom goal; presets ignore it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_split: Option<MacroSplit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
}

/// Aggregate result of the macro calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroResult {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub goal: MacroGoal,
    pub protein: MacroBreakdown,
    pub carbs: MacroBreakdown,
    pub fat: MacroBreakdown,
    pub per_meal: PerMealMacros,
}

/// Full macro pipeline: unit conversion → BMR → TDEE → target calories →
/// split → per-meal breakdown. Failures are logged and re-raised.
pub fn process_macro_calculation(input: &MacroInput) -> Result<MacroResult, CalcError> {
    macro_pipeline(input).map_err(|err| {
        tracing::error!(%err, "macro calculation failed");
        err
    })
}

fn macro_pipeline(input: &MacroInput) -> Result<MacroResult, CalcError> {
    input.validate()?;
    let (weight_kg, height_cm) = match input.units {
        UnitSystem::Metric => (input.weight, input.height),
        UnitSystem::Imperial => (lbs_to_kg(input.weight), inches_to_cm(input.height)),
    };
    let bmr = calculate_bmr(
        input.sex,
        input.age,
        weight_kg,
        height_cm,
        input.formula,
        input.body_fat_percent,
    )?;
    let tdee = calculate_tdee(bmr, input.activity_level.multiplier())?;
    let target_calories = calculate_target_calories(tdee, input.goal, input.custom_adjustment)?;
    let split = match input.goal.preset_split() {
        Some(split) => split,
        None => input
            .custom_split
            .ok_or(CalcError::MissingField("custom_split"))?,
    };
    let macros = calculate_macros(target_calories, split)?;
    let per_meal = calculate_per_meal_macros(
        macros.protein.grams as f64,
        macros.carbs.grams as f64,
        macros.fat.grams as f64,
        target_calories,
    )?;
    Ok(MacroResult {
        bmr,
        tdee,
        target_calories,
        goal: input.goal,
        protein: macros.protein,
        carbs: macros.carbs,
        fat: macros.fat,
        per_meal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const MAINTENANCE: MacroSplit = MacroSplit {
        protein: 30.0,
        carbs: 35.0,
        fat: 35.0,
    };

    // =========================================================================
    // Breakdown Tests
    // =========================================================================

    #[test]
    fn test_macro_breakdown() {
        // 2000 kcal at 30% protein -> 600 kcal -> 150 g
        let breakdown = calculate_macro_breakdown(2000.0, 30.0, PROTEIN_KCAL_PER_G).unwrap();
        assert_eq!(breakdown.grams, 150);
        assert_eq!(breakdown.calories, 600);
        assert_eq!(breakdown.percentage, 30.0);
    }

    #[rstest]
    #[case(0.0, 30.0, 4.0)]
    #[case(-100.0, 30.0, 4.0)]
    #[case(2000.0, -1.0, 4.0)]
    #[case(2000.0, 101.0, 4.0)]
    #[case(2000.0, 30.0, 0.0)]
    fn test_macro_breakdown_rejects_bad_arguments(
        #[case] calories: f64,
        #[case] percentage: f64,
        #[case] per_gram: f64,
    ) {
        assert!(calculate_macro_breakdown(calories, percentage, per_gram).is_err());
    }

    #[test]
    fn test_split_gates() {
        let err = calculate_macros(
            2000.0,
            MacroSplit { protein: 30.0, carbs: 30.0, fat: 30.0 },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Macro percentages must sum to 100");

        let err = calculate_macros(
            2000.0,
            MacroSplit { protein: 55.0, carbs: 25.0, fat: 20.0 },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Protein percentage must be between 10 and 50");

        let err = calculate_macros(
            2000.0,
            MacroSplit { protein: 45.0, carbs: 45.0, fat: 10.0 },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Fat percentage must be at least 15");
    }

    #[test]
    fn test_target_calories() {
        assert_eq!(
            calculate_target_calories(2500.0, MacroGoal::WeightLoss, None).unwrap(),
            2000.0
        );
        assert_eq!(
            calculate_target_calories(2500.0, MacroGoal::Maintenance, None).unwrap(),
            2500.0
        );
        assert_eq!(
            calculate_target_calories(2500.0, MacroGoal::MuscleGain, None).unwrap(),
            3000.0
        );
        assert_eq!(
            calculate_target_calories(2500.0, MacroGoal::Custom, Some(-300.0)).unwrap(),
            2200.0
        );
    }

    #[test]
    fn test_target_calories_floor() {
        // 1400 - 500 would be 900; floored to 1200
        assert_eq!(
            calculate_target_calories(1400.0, MacroGoal::WeightLoss, None).unwrap(),
            1200.0
        );
        // Custom adjustments floor too
        assert_eq!(
            calculate_target_calories(1400.0, MacroGoal::Custom, Some(-5000.0)).unwrap(),
            1200.0
        );
    }

    #[test]
    fn test_custom_goal_requires_adjustment() {
        let err = calculate_target_calories(2500.0, MacroGoal::Custom, None).unwrap_err();
        assert_eq!(err, CalcError::MissingField("custom_adjustment"));
    }

    #[test]
    fn test_per_meal_rounds_independently() {
        // 100 g protein / 3 = 33.33 -> 33; 200 g carbs / 3 = 66.67 -> 67
        let per_meal = calculate_per_meal_macros(100.0, 200.0, 70.0, 2000.0).unwrap();
        assert_eq!(per_meal.protein_g, 33);
        assert_eq!(per_meal.carbs_g, 67);
        assert_eq!(per_meal.fat_g, 23);
        assert_eq!(per_meal.calories, 667);
        // 3 * 33 = 99 != 100 and that is the documented behavior
        assert_ne!(per_meal.protein_g * 3, 100);
    }

    #[test]
    fn test_protein_requirement() {
        let sedentary = calculate_protein_requirement(70.0, ActivityLevel::Sedentary).unwrap();
        assert!((sedentary.min_grams - 56.0).abs() < 1e-9);
        assert!((sedentary.max_grams - 70.0).abs() < 1e-9);

        let athlete = calculate_protein_requirement(70.0, ActivityLevel::ExtremelyActive).unwrap();
        assert!((athlete.min_grams - 126.0).abs() < 1e-9);
        assert!((athlete.max_grams - 154.0).abs() < 1e-9);
    }

    // =========================================================================
    // Orchestration Tests
    // =========================================================================

    fn maintenance_input() -> MacroInput {
        MacroInput {
            sex: BiologicalSex::Male,
            age: 30,
            weight: 70.0,
            height: 175.0,
            units: UnitSystem::Metric,
            activity_level: ActivityLevel::ModeratelyActive,
            formula: BmrFormula::MifflinStJeor,
            goal: MacroGoal::Maintenance,
            custom_adjustment: None,
            custom_split: None,
            body_fat_percent: None,
        }
    }

    #[test]
    fn test_process_macro_calculation_reference_values() {
        // BMR 1648.75, TDEE 2555.56, maintenance 30/35/35
        let result = process_macro_calculation(&maintenance_input()).unwrap();
        assert!((result.bmr - 1648.75).abs() < 1e-9);
        assert!((result.tdee - 2555.5625).abs() < 1e-9);
        assert_eq!(result.target_calories, result.tdee);
        assert_eq!(result.protein.grams, 192);
        assert_eq!(result.carbs.grams, 224);
        assert_eq!(result.fat.grams, 99);
        assert_eq!(result.per_meal.protein_g, 64);
    }

    #[test]
    fn test_process_macro_unit_equivalence() {
        let metric = process_macro_calculation(&maintenance_input()).unwrap();
        let imperial = process_macro_calculation(&MacroInput {
            weight: 154.324,
            height: 68.8976,
            units: UnitSystem::Imperial,
            ..maintenance_input()
        })
        .unwrap();
        assert_eq!(metric.protein.grams, imperial.protein.grams);
        assert_eq!(metric.carbs.grams, imperial.carbs.grams);
        assert_eq!(metric.fat.grams, imperial.fat.grams);
    }

    #[test]
    fn test_process_macro_custom_goal() {
        let result = process_macro_calculation(&MacroInput {
            goal: MacroGoal::Custom,
            custom_adjustment: Some(-250.0),
            custom_split: Some(MacroSplit { protein: 35.0, carbs: 40.0, fat: 25.0 }),
            ..maintenance_input()
        })
        .unwrap();
        assert!((result.target_calories - (result.tdee - 250.0)).abs() < 1e-9);
        assert_eq!(result.protein.percentage, 35.0);
    }

    #[test]
    fn test_process_macro_custom_goal_missing_split() {
        let err = process_macro_calculation(&MacroInput {
            goal: MacroGoal::Custom,
            custom_adjustment: Some(0.0),
            custom_split: None,
            ..maintenance_input()
        })
        .unwrap_err();
        assert_eq!(err, CalcError::MissingField("custom_split"));
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: macro calories reassemble to the target within rounding
        /// slack (~20 kcal; each macro rounds independently)
        #[test]
        fn prop_macro_round_trip(
            target in 1200.0f64..5000.0,
            protein in 10.0f64..=50.0,
            fat_extra in 0.0f64..35.0
        ) {
            let fat = 15.0 + fat_extra;
            let carbs = 100.0 - protein - fat;
            prop_assume!(carbs >= 0.0);
            let split = MacroSplit { protein, carbs, fat };
            let macros = calculate_macros(target, split).unwrap();
            let reassembled = macros.protein.grams as f64 * PROTEIN_KCAL_PER_G
                + macros.carbs.grams as f64 * CARBS_KCAL_PER_G
                + macros.fat.grams as f64 * FAT_KCAL_PER_G;
            prop_assert!((reassembled - target).abs() < 20.0,
                "target {} reassembled {}", target, reassembled);
        }

        /// Property: target calories never fall below the floor
        #[test]
        fn prop_target_calories_floored(
            tdee in 1.0f64..6000.0,
            adjustment in -5000.0f64..=5000.0
        ) {
            let target = calculate_target_calories(tdee, MacroGoal::Custom, Some(adjustment)).unwrap();
            prop_assert!(target >= MIN_DAILY_CALORIES);
        }

        /// Property: protein range scales linearly with weight
        #[test]
        fn prop_protein_scales_with_weight(weight in 40.0f64..150.0) {
            let requirement = calculate_protein_requirement(weight, ActivityLevel::ModeratelyActive).unwrap();
            prop_assert!((requirement.min_grams - weight * 1.2).abs() < 1e-9);
            prop_assert!((requirement.max_grams - weight * 1.6).abs() < 1e-9);
        }
    }

    #[test]
    fn test_preset_splits_sum_to_100() {
        for goal in [MacroGoal::WeightLoss, MacroGoal::Maintenance, MacroGoal::MuscleGain] {
            let split = goal.preset_split().unwrap();
            assert_eq!(split.protein + split.carbs + split.fat, 100.0);
        }
        assert!(MacroGoal::Custom.preset_split().is_none());
    }

    #[test]
    fn test_maintenance_const_used() {
        let macros = calculate_macros(2555.5625, MAINTENANCE).unwrap();
        assert_eq!(macros.protein.grams, 192);
    }
}
