//! Unit conversion and normalization module
//!
//! All formulas in this crate run on metric quantities (kg, cm, mph for pace
//! adjustments). Imperial input is converted at the boundary, never inside
//! business logic.
//!
//! # Design Principles
//!
//! 1. **Internal Consistency**: formulas see kg/cm only
//! 2. **Conversion at Boundaries**: the `process_*` orchestrators convert once
//! 3. **Equivalence**: metric and imperial paths agree within rounding

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Kilometers per mile
pub const KM_PER_MILE: f64 = 1.609344;

// ============================================================================
// Unit System
// ============================================================================

/// Unit system selected on a calculator form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn is_metric(&self) -> bool {
        matches!(self, UnitSystem::Metric)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {s}")),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Convert pounds to kilograms
pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

/// Convert kilograms to pounds
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg / KG_PER_LB
}

/// Convert inches to centimeters
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Convert centimeters to inches
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Convert decimal feet to centimeters
pub fn feet_to_cm(feet: f64) -> f64 {
    inches_to_cm(feet * 12.0)
}

/// Convert miles per hour to kilometers per hour
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * KM_PER_MILE
}

/// Convert kilometers per hour to miles per hour
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / KM_PER_MILE
}

/// Convert miles to kilometers
pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

// ============================================================================
// Feet/Inches Height
// ============================================================================

/// Height expressed in feet and inches, as imperial forms collect it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: i32,
    pub inches: f64,
}

impl FeetInches {
    /// Create from total inches
    pub fn from_total_inches(total_inches: f64) -> Self {
        let feet = (total_inches / 12.0).floor() as i32;
        let inches = total_inches % 12.0;
        Self { feet, inches }
    }

    /// Convert to total inches
    pub fn to_total_inches(&self) -> f64 {
        (self.feet as f64 * 12.0) + self.inches
    }

    /// Create from centimeters
    pub fn from_cm(cm: f64) -> Self {
        Self::from_total_inches(cm_to_inches(cm))
    }

    /// Convert to centimeters
    pub fn to_cm(&self) -> f64 {
        inches_to_cm(self.to_total_inches())
    }
}

impl fmt::Display for FeetInches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{:.0}\"", self.feet, self.inches)
    }
}

impl FromStr for FeetInches {
    type Err = String;

    /// Parse notation like `5'10"`, `5' 10`, `5 ft 10 in`, or plain `5'`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pattern = regex_lite::Regex::new(
            r#"^\s*(\d+)\s*(?:'|ft|feet)\s*(?:(\d+(?:\.\d+)?)\s*(?:"|in|inches)?)?\s*$"#,
        )
        .unwrap();
        let captures = pattern
            .captures(s)
            .ok_or_else(|| format!("Invalid height format: {s}"))?;
        let feet: i32 = captures[1]
            .parse()
            .map_err(|_| format!("Invalid height format: {s}"))?;
        let inches: f64 = match captures.get(2) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| format!("Invalid height format: {s}"))?,
            None => 0.0,
        };
        if inches >= 12.0 {
            return Err(format!("Inches must be below 12: {s}"));
        }
        Ok(Self { feet, inches })
    }
}
