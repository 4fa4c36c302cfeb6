//! Error types for the HealthCalc formula library

use thiserror::Error;

/// Errors raised by the formula library.
///
/// The validators in [`crate::validation`] never produce these; they report
/// problems through [`ValidationResult`](crate::validation::ValidationResult)
/// instead. A `CalcError` means a caller broke a function contract — the UI
/// layer is expected to have validated user input before calling in, so these
/// propagate unhandled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// Numeric argument outside the function contract.
    #[error("{0}")]
    InvalidInput(String),

    /// A method-specific field was not supplied.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// BMR formula name did not match a known variant.
    #[error("Formula '{0}' not found")]
    UnknownFormula(String),

    /// Body fat method name did not match a known variant.
    #[error("Unsupported body fat calculation method: {0}")]
    UnsupportedMethod(String),

    /// Activity name did not match the MET table.
    #[error("Invalid activity selected")]
    UnknownActivity,
}

impl CalcError {
    /// Shorthand for the `InvalidInput` variant.
    pub fn invalid(message: impl Into<String>) -> Self {
        CalcError::InvalidInput(message.into())
    }
}

impl From<validator::ValidationErrors> for CalcError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|field_errors| field_errors.iter())
            .filter_map(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .next()
            .unwrap_or_else(|| errors.to_string());
        CalcError::InvalidInput(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_texts() {
        assert_eq!(
            CalcError::UnknownFormula("keto_magic".into()).to_string(),
            "Formula 'keto_magic' not found"
        );
        assert_eq!(
            CalcError::UnsupportedMethod("calipers".into()).to_string(),
            "Unsupported body fat calculation method: calipers"
        );
        assert_eq!(
            CalcError::UnknownActivity.to_string(),
            "Invalid activity selected"
        );
        assert_eq!(
            CalcError::MissingField("hips").to_string(),
            "Missing required field: hips"
        );
        assert_eq!(
            CalcError::invalid("Weight must be greater than 0").to_string(),
            "Weight must be greater than 0"
        );
    }
}
