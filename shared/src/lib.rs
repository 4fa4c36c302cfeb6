//! HealthCalc Shared Library
//!
//! The calculation core behind the HealthCalc site: form-field validation,
//! unit conversion, and the calculator formula library (BMR/TDEE, macro
//! split, body fat estimation, activity energy). Shared between the web
//! frontend (through the wasm bindings crate) and any native tooling.
//!
//! Two error vocabularies, kept deliberately separate: validators return
//! [`validation::ValidationResult`] values and never fail, while the formula
//! functions return `Result<_, CalcError>` and propagate on contract
//! violations.

pub mod activity;
pub mod bmi;
pub mod body_fat;
pub mod energy;
pub mod errors;
pub mod models;
pub mod nutrition;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use errors::CalcError;

pub use activity::{Activity, BodyFatBurnInput, BodyFatBurnResult, TimeToGoal};
pub use bmi::{BmiCategory, BmiResult, IdealWeightResult};
pub use body_fat::{BodyFatCategory, BodyFatInput, BodyFatMethod, BodyFatResult};
pub use energy::{
    ActivityLevel, BiologicalSex, BmrFormula, TdeeInput, TdeeResult, WeightGoals,
};
pub use models::{CalculatorKind, SavedResult};
pub use nutrition::{MacroBreakdown, MacroGoal, MacroInput, MacroResult, MacroSplit};
pub use units::{FeetInches, UnitSystem};
pub use validation::ValidationResult;
