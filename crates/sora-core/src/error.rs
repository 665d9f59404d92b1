//! Unified Error Model
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoraError {
    /// A required input is missing, out of range or unselected. User-correctable.
    #[error("VALIDATION/{field}: {message}")]
    Validation { field: String, message: String },

    /// A lookup table has no entry for an otherwise valid input. Engine defect.
    #[error("CONFIG/{0}")]
    Configuration(String),

    /// Valid input that places the operation outside the specific category
    #[error("SCOPE/{0}")]
    OutOfScope(String),

    #[error("SERIALIZE/{0}")]
    Serialize(String),
}

impl SoraError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SoraError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::validation(field, "required field is missing")
    }

    /// Field path for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            SoraError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the user can fix this by editing the form
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, SoraError::Validation { .. } | SoraError::OutOfScope(_))
    }

    /// Short machine code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            SoraError::Validation { .. } => "VALIDATION",
            SoraError::Configuration(_) => "CONFIG",
            SoraError::OutOfScope(_) => "SCOPE",
            SoraError::Serialize(_) => "SERIALIZE",
        }
    }
}

impl From<serde_json::Error> for SoraError {
    fn from(e: serde_json::Error) -> Self {
        SoraError::Serialize(e.to_string())
    }
}

/// Unwrap a required field or report it by path
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, SoraError> {
    value.ok_or_else(|| SoraError::missing(field))
}

/// Unwrap a required measurement that must be strictly positive and finite
pub fn require_positive(value: Option<f64>, field: &str) -> Result<f64, SoraError> {
    let v = require(value, field)?;
    if !v.is_finite() || v <= 0.0 {
        return Err(SoraError::validation(field, format!("must be greater than zero (got {})", v)));
    }
    Ok(v)
}

/// Unwrap a required measurement that must be zero or more and finite
pub fn require_non_negative(value: Option<f64>, field: &str) -> Result<f64, SoraError> {
    let v = require(value, field)?;
    if !v.is_finite() || v < 0.0 {
        return Err(SoraError::validation(field, format!("must not be negative (got {})", v)));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = require::<f64>(None, "drone.mtow_kg").unwrap_err();
        assert_eq!(err.field(), Some("drone.mtow_kg"));
        assert!(err.to_string().starts_with("VALIDATION/drone.mtow_kg"));
        assert!(err.is_user_correctable());
    }

    #[test]
    fn test_require_positive_rejects_zero_and_nan() {
        assert!(require_positive(Some(0.0), "x").is_err());
        assert!(require_positive(Some(f64::NAN), "x").is_err());
        assert_eq!(require_positive(Some(2.5), "x").unwrap(), 2.5);
    }

    #[test]
    fn test_configuration_is_not_user_correctable() {
        let err = SoraError::Configuration("no SAIL cell".to_string());
        assert!(!err.is_user_correctable());
        assert_eq!(err.code(), "CONFIG");
        assert_eq!(err.to_string(), "CONFIG/no SAIL cell");
    }
}
