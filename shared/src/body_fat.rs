//! Body fat estimation and classification
//!
//! Three interchangeable estimation methods (Navy tape measurements, BMI
//! regression, manual entry) behind one dispatcher, plus ACE category
//! classification and fat/lean mass split.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::energy::BiologicalSex;
use crate::errors::CalcError;
use crate::units::cm_to_inches;

/// Clamp floor for estimated body fat (%)
pub const BODY_FAT_MIN: f64 = 2.0;
/// Clamp ceiling for estimated body fat (%)
pub const BODY_FAT_MAX: f64 = 60.0;

fn clamp_body_fat(percent: f64) -> f64 {
    percent.clamp(BODY_FAT_MIN, BODY_FAT_MAX)
}

// ============================================================================
// Methods
// ============================================================================

/// Estimation method selected on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatMethod {
    Navy,
    Bmi,
    Manual,
}

impl FromStr for BodyFatMethod {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "navy" => Ok(BodyFatMethod::Navy),
            "bmi" => Ok(BodyFatMethod::Bmi),
            "manual" => Ok(BodyFatMethod::Manual),
            _ => Err(CalcError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Method-tagged measurement set. Each method requires its own fields;
/// missing ones fail before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BodyFatInput {
    Navy {
        sex: BiologicalSex,
        waist_cm: f64,
        neck_cm: f64,
        height_cm: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        hips_cm: Option<f64>,
    },
    Bmi {
        sex: BiologicalSex,
        age: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        bmi: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight_kg: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height_cm: Option<f64>,
    },
    Manual {
        body_fat_percentage: f64,
    },
}

// ============================================================================
// Formulas
// ============================================================================

/// BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<f64, CalcError> {
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return Err(CalcError::invalid("Weight must be greater than 0"));
    }
    if height_cm.is_nan() || height_cm <= 0.0 {
        return Err(CalcError::invalid("Height must be greater than 0"));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Hodgdon-Beckett circumference regression (the "Navy method").
///
/// Measurements arrive in cm and are converted to inches for the published
/// coefficients. The female variant requires hips. Result is clamped to
/// [`BODY_FAT_MIN`]..[`BODY_FAT_MAX`].
pub fn calculate_navy_method_body_fat(
    sex: BiologicalSex,
    waist_cm: f64,
    neck_cm: f64,
    height_cm: f64,
    hips_cm: Option<f64>,
) -> Result<f64, CalcError> {
    for (name, value) in [
        ("Waist", waist_cm),
        ("Neck", neck_cm),
        ("Height", height_cm),
    ] {
        if value.is_nan() || value <= 0.0 {
            return Err(CalcError::invalid(format!("{name} must be greater than 0")));
        }
    }
    let waist = cm_to_inches(waist_cm);
    let neck = cm_to_inches(neck_cm);
    let height = cm_to_inches(height_cm);
    let percent = match sex {
        BiologicalSex::Male => {
            // log10 of a non-positive difference is undefined
            if waist <= neck {
                return Err(CalcError::invalid(
                    "Waist must be greater than neck measurement",
                ));
            }
            86.010 * (waist - neck).log10() - 70.041 * height.log10() + 36.76
        }
        BiologicalSex::Female => {
            let hips_cm = hips_cm.ok_or(CalcError::MissingField("hips"))?;
            if hips_cm.is_nan() || hips_cm <= 0.0 {
                return Err(CalcError::invalid("Hips must be greater than 0"));
            }
            let hips = cm_to_inches(hips_cm);
            if waist + hips <= neck {
                return Err(CalcError::invalid(
                    "Waist plus hip must be greater than neck measurement",
                ));
            }
            163.205 * (waist + hips - neck).log10() - 97.684 * height.log10() - 78.387
        }
    };
    Ok(clamp_body_fat(percent))
}

/// Deurenberg BMI regression: 1.20 × BMI + 0.23 × age − intercept, with a
/// per-sex intercept (16.2 male, 5.4 female). Clamped like the Navy method.
pub fn calculate_bmi_method_body_fat(
    sex: BiologicalSex,
    age: i32,
    bmi: f64,
) -> Result<f64, CalcError> {
    if !(1..=120).contains(&age) {
        return Err(CalcError::invalid("Age must be between 1 and 120 years"));
    }
    if bmi.is_nan() || bmi <= 0.0 {
        return Err(CalcError::invalid("BMI must be greater than 0"));
    }
    let intercept = match sex {
        BiologicalSex::Male => 16.2,
        BiologicalSex::Female => 5.4,
    };
    Ok(clamp_body_fat(1.20 * bmi + 0.23 * age as f64 - intercept))
}

/// Dispatch to the method selected by the input tag. Manual passes the raw
/// percentage through unchanged.
pub fn calculate_body_fat(input: &BodyFatInput) -> Result<f64, CalcError> {
    match input {
        BodyFatInput::Navy {
            sex,
            waist_cm,
            neck_cm,
            height_cm,
            hips_cm,
        } => calculate_navy_method_body_fat(*sex, *waist_cm, *neck_cm, *height_cm, *hips_cm),
        BodyFatInput::Bmi {
            sex,
            age,
            bmi,
            weight_kg,
            height_cm,
        } => {
            let bmi = match bmi {
                Some(bmi) => *bmi,
                None => match (weight_kg, height_cm) {
                    (Some(weight), Some(height)) => calculate_bmi(*weight, *height)?,
                    _ => return Err(CalcError::MissingField("bmi")),
                },
            };
            calculate_bmi_method_body_fat(*sex, *age, bmi)
        }
        BodyFatInput::Manual {
            body_fat_percentage,
        } => Ok(*body_fat_percentage),
    }
}

// ============================================================================
// Classification
// ============================================================================

/// ACE body fat category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatCategory {
    EssentialFat,
    Athletic,
    Fitness,
    Average,
    Obese,
    /// Defensive fallback; unreachable for clamped estimates
    Unknown,
}

impl BodyFatCategory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BodyFatCategory::EssentialFat => "Essential Fat",
            BodyFatCategory::Athletic => "Athletic",
            BodyFatCategory::Fitness => "Fitness",
            BodyFatCategory::Average => "Average",
            BodyFatCategory::Obese => "Obese",
            BodyFatCategory::Unknown => "Unknown",
        }
    }

    /// Display color for the result gauge
    pub fn color(&self) -> &'static str {
        match self {
            BodyFatCategory::EssentialFat => "#3b82f6",
            BodyFatCategory::Athletic => "#22c55e",
            BodyFatCategory::Fitness => "#84cc16",
            BodyFatCategory::Average => "#f59e0b",
            BodyFatCategory::Obese => "#ef4444",
            BodyFatCategory::Unknown => "#9ca3af",
        }
    }

    /// Band bounds per sex; `None` for `Unknown`
    pub fn range(&self, sex: BiologicalSex) -> Option<(f64, f64)> {
        match (self, sex) {
            (BodyFatCategory::EssentialFat, BiologicalSex::Male) => Some((2.0, 5.0)),
            (BodyFatCategory::EssentialFat, BiologicalSex::Female) => Some((10.0, 13.0)),
            (BodyFatCategory::Athletic, BiologicalSex::Male) => Some((6.0, 13.0)),
            (BodyFatCategory::Athletic, BiologicalSex::Female) => Some((14.0, 20.0)),
            (BodyFatCategory::Fitness, BiologicalSex::Male) => Some((14.0, 17.0)),
            (BodyFatCategory::Fitness, BiologicalSex::Female) => Some((21.0, 24.0)),
            (BodyFatCategory::Average, BiologicalSex::Male) => Some((18.0, 24.0)),
            (BodyFatCategory::Average, BiologicalSex::Female) => Some((25.0, 31.0)),
            (BodyFatCategory::Obese, BiologicalSex::Male) => Some((25.0, BODY_FAT_MAX)),
            (BodyFatCategory::Obese, BiologicalSex::Female) => Some((32.0, BODY_FAT_MAX)),
            (BodyFatCategory::Unknown, _) => None,
        }
    }
}

/// Classify a body fat percentage into its ACE band.
pub fn get_body_fat_category(sex: BiologicalSex, percent: f64) -> BodyFatCategory {
    if !percent.is_finite() {
        return BodyFatCategory::Unknown;
    }
    match sex {
        BiologicalSex::Male => {
            if percent < 6.0 {
                BodyFatCategory::EssentialFat
            } else if percent < 14.0 {
                BodyFatCategory::Athletic
            } else if percent < 18.0 {
                BodyFatCategory::Fitness
            } else if percent < 25.0 {
                BodyFatCategory::Average
            } else {
                BodyFatCategory::Obese
            }
        }
        BiologicalSex::Female => {
            if percent < 14.0 {
                BodyFatCategory::EssentialFat
            } else if percent < 21.0 {
                BodyFatCategory::Athletic
            } else if percent < 25.0 {
                BodyFatCategory::Fitness
            } else if percent < 32.0 {
                BodyFatCategory::Average
            } else {
                BodyFatCategory::Obese
            }
        }
    }
}

/// The Fitness band doubles as the healthy target range.
pub fn get_healthy_body_fat_range(sex: BiologicalSex) -> (f64, f64) {
    match sex {
        BiologicalSex::Male => (14.0, 17.0),
        BiologicalSex::Female => (21.0, 24.0),
    }
}

// ============================================================================
// Mass Split
// ============================================================================

/// Fat and lean mass in kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatLeanMass {
    pub fat_mass_kg: f64,
    pub lean_mass_kg: f64,
}

/// Split total weight into fat and lean mass.
pub fn calculate_fat_and_lean_mass(weight_kg: f64, percent: f64) -> Result<FatLeanMass, CalcError> {
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return Err(CalcError::invalid("Weight must be greater than 0"));
    }
    if percent.is_nan() || !(0.0..=100.0).contains(&percent) {
        return Err(CalcError::invalid(
            "Body fat percentage must be between 0 and 100",
        ));
    }
    let fat_mass_kg = weight_kg * percent / 100.0;
    Ok(FatLeanMass {
        fat_mass_kg,
        lean_mass_kg: weight_kg - fat_mass_kg,
    })
}

// ============================================================================
// Orchestration
// ============================================================================

/// Aggregate result of the body fat calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatResult {
    pub body_fat_percentage: f64,
    pub category: BodyFatCategory,
    pub category_label: String,
    pub healthy_range: (f64, f64),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<FatLeanMass>,
}

/// Estimate, classify, and (when weight is known) split mass. Failures are
/// logged and re-raised.
pub fn process_body_fat_calculation(
    sex: BiologicalSex,
    input: &BodyFatInput,
    weight_kg: Option<f64>,
) -> Result<BodyFatResult, CalcError> {
    body_fat_pipeline(sex, input, weight_kg).map_err(|err| {
        tracing::error!(%err, "body fat calculation failed");
        err
    })
}

fn body_fat_pipeline(
    sex: BiologicalSex,
    input: &BodyFatInput,
    weight_kg: Option<f64>,
) -> Result<BodyFatResult, CalcError> {
    let body_fat_percentage = calculate_body_fat(input)?;
    let category = get_body_fat_category(sex, body_fat_percentage);
    let mass = match weight_kg {
        Some(weight) => Some(calculate_fat_and_lean_mass(weight, body_fat_percentage)?),
        None => None,
    };
    Ok(BodyFatResult {
        body_fat_percentage,
        category,
        category_label: category.label().to_string(),
        healthy_range: get_healthy_body_fat_range(sex),
        mass,
    })
}
