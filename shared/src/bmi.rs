//! BMI classification and ideal weight estimation
//!
//! The BMI value itself comes from [`crate::body_fat::calculate_bmi`]; this
//! module layers WHO category classification, the healthy weight range for a
//! height, and the classic ideal-weight formulas on top.

use serde::{Deserialize, Serialize};

use crate::body_fat::calculate_bmi;
use crate::energy::BiologicalSex;
use crate::errors::CalcError;

// ============================================================================
// Classification
// ============================================================================

/// WHO BMI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    SeverelyUnderweight,
    Underweight,
    Normal,
    Overweight,
    ObeseClass1,
    ObeseClass2,
    ObeseClass3,
}

impl BmiCategory {
    /// BMI range for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::SeverelyUnderweight => (0.0, 16.0),
            BmiCategory::Underweight => (16.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::ObeseClass1 => (30.0, 35.0),
            BmiCategory::ObeseClass2 => (35.0, 40.0),
            BmiCategory::ObeseClass3 => (40.0, f64::INFINITY),
        }
    }

    /// Display label
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::SeverelyUnderweight => "Severely Underweight",
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal/Healthy",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObeseClass1 => "Obese (Class I)",
            BmiCategory::ObeseClass2 => "Obese (Class II)",
            BmiCategory::ObeseClass3 => "Obese (Class III)",
        }
    }
}

/// Classify a BMI value
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 16.0 {
        BmiCategory::SeverelyUnderweight
    } else if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else if bmi < 35.0 {
        BmiCategory::ObeseClass1
    } else if bmi < 40.0 {
        BmiCategory::ObeseClass2
    } else {
        BmiCategory::ObeseClass3
    }
}

/// Weight range producing a normal BMI (18.5-25) at this height
pub fn healthy_weight_range_kg(height_cm: f64) -> Result<(f64, f64), CalcError> {
    if height_cm.is_nan() || height_cm <= 0.0 {
        return Err(CalcError::invalid("Height must be greater than 0"));
    }
    let height_m_sq = (height_cm / 100.0).powi(2);
    Ok((18.5 * height_m_sq, 25.0 * height_m_sq))
}

/// Complete BMI calculator result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
    pub category_label: String,
    pub healthy_weight_range_kg: (f64, f64),
    /// Negative = under the healthy range, positive = over, 0 = in range
    pub distance_from_healthy_kg: f64,
}

/// BMI value, category and healthy-range context in one pass
pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64) -> Result<BmiResult, CalcError> {
    let bmi = calculate_bmi(weight_kg, height_cm)?;
    let category = classify_bmi(bmi);
    let (min_kg, max_kg) = healthy_weight_range_kg(height_cm)?;
    let distance_from_healthy_kg = if weight_kg < min_kg {
        weight_kg - min_kg
    } else if weight_kg > max_kg {
        weight_kg - max_kg
    } else {
        0.0
    };
    Ok(BmiResult {
        value: bmi,
        category,
        category_label: category.description().to_string(),
        healthy_weight_range_kg: (min_kg, max_kg),
        distance_from_healthy_kg,
    })
}

// ============================================================================
// Ideal Weight
// ============================================================================

/// Ideal body weight by the four classic formulas, in kg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub devine: f64,
    pub robinson: f64,
    pub miller: f64,
    pub hamwi: f64,
    pub average: f64,
}

/// Ideal body weight from height and sex. Each formula is a base weight at
/// 5 ft plus a per-inch increment.
pub fn calculate_ideal_weight(
    height_cm: f64,
    sex: BiologicalSex,
) -> Result<IdealWeightResult, CalcError> {
    if height_cm.is_nan() || height_cm <= 0.0 {
        return Err(CalcError::invalid("Height must be greater than 0"));
    }
    let inches_over_5ft = (crate::units::cm_to_inches(height_cm) - 60.0).max(0.0);
    let (devine, robinson, miller, hamwi) = match sex {
        BiologicalSex::Male => (
            50.0 + 2.3 * inches_over_5ft,
            52.0 + 1.9 * inches_over_5ft,
            56.2 + 1.41 * inches_over_5ft,
            48.0 + 2.7 * inches_over_5ft,
        ),
        BiologicalSex::Female => (
            45.5 + 2.3 * inches_over_5ft,
            49.0 + 1.7 * inches_over_5ft,
            53.1 + 1.36 * inches_over_5ft,
            45.5 + 2.2 * inches_over_5ft,
        ),
    };
    Ok(IdealWeightResult {
        devine,
        robinson,
        miller,
        hamwi,
        average: (devine + robinson + miller + hamwi) / 4.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(15.0, BmiCategory::SeverelyUnderweight)]
    #[case(17.0, BmiCategory::Underweight)]
    #[case(22.0, BmiCategory::Normal)]
    #[case(27.0, BmiCategory::Overweight)]
    #[case(32.0, BmiCategory::ObeseClass1)]
    #[case(37.0, BmiCategory::ObeseClass2)]
    #[case(42.0, BmiCategory::ObeseClass3)]
    fn test_bmi_categories(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    #[test]
    fn test_healthy_weight_range() {
        // 175cm -> ~56.7-76.6 kg
        let (min, max) = healthy_weight_range_kg(175.0).unwrap();
        assert!((min - 56.7).abs() < 0.5);
        assert!((max - 76.6).abs() < 0.5);
        assert!(healthy_weight_range_kg(0.0).is_err());
    }

    #[test]
    fn test_bmi_result_distance() {
        // In range
        let result = calculate_bmi_result(70.0, 175.0).unwrap();
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.distance_from_healthy_kg, 0.0);

        // Over range by ~13.4 kg
        let result = calculate_bmi_result(90.0, 175.0).unwrap();
        assert!(result.distance_from_healthy_kg > 13.0);

        // Under range reports negative distance
        let result = calculate_bmi_result(50.0, 175.0).unwrap();
        assert!(result.distance_from_healthy_kg < 0.0);
    }

    #[test]
    fn test_ideal_weight() {
        // 180cm male -> around 70-80 kg
        let result = calculate_ideal_weight(180.0, BiologicalSex::Male).unwrap();
        assert!(result.average > 65.0 && result.average < 85.0);

        // 165cm female -> around 55-65 kg
        let result = calculate_ideal_weight(165.0, BiologicalSex::Female).unwrap();
        assert!(result.average > 50.0 && result.average < 70.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the midpoint of the healthy range classifies as Normal
        #[test]
        fn prop_healthy_range_is_normal(height in 150.0f64..200.0) {
            let (min, max) = healthy_weight_range_kg(height).unwrap();
            let mid = (min + max) / 2.0;
            let result = calculate_bmi_result(mid, height).unwrap();
            prop_assert_eq!(result.category, BmiCategory::Normal);
        }

        /// Property: ideal weight never decreases with height
        #[test]
        fn prop_ideal_weight_monotonic(height in 152.0f64..200.0, extra in 1.0f64..20.0) {
            let short = calculate_ideal_weight(height, BiologicalSex::Male).unwrap();
            let tall = calculate_ideal_weight(height + extra, BiologicalSex::Male).unwrap();
            prop_assert!(tall.average >= short.average);
        }
    }
}
