//! Error types for the vector mechanism
//!
//! Every failure is a caller programming error and falls into one of two
//! categories: the argument had the wrong semantic type ([`ErrorKind::Type`]),
//! or it was outside its valid domain ([`ErrorKind::Value`]).

use serde::{Deserialize, Serialize};

/// Broad category of a [`MechanismError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Wrong semantic type: non-finite where a number is required,
    /// non-integer where an integer is required
    Type,
    /// Numerically out of domain, or a required configuration step was skipped
    Value,
}

/// Errors raised while configuring or applying the vector mechanism
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MechanismError {
    /// Argument is NaN or infinite
    #[error("{name} must be numeric, got {value}")]
    NotNumeric { name: &'static str, value: f64 },

    /// Argument is not integer-valued
    #[error("{name} must be integer-valued, got {value}")]
    NotInteger { name: &'static str, value: f64 },

    /// Epsilon is invalid
    #[error("Invalid epsilon {value}: {reason}")]
    InvalidEpsilon { value: f64, reason: String },

    /// Delta is invalid
    #[error("Invalid delta {value}: {reason}")]
    InvalidDelta { value: f64, reason: String },

    /// Function or data sensitivity is invalid
    #[error("Invalid sensitivity {value}: {reason}")]
    InvalidSensitivity { value: f64, reason: String },

    /// Regularisation strength is invalid
    #[error("Invalid alpha {value}: {reason}")]
    InvalidAlpha { value: f64, reason: String },

    /// Dimension is invalid
    #[error("Invalid dimension {value}: {reason}")]
    InvalidDimension { value: f64, reason: String },

    /// A parameter required by `randomise` was never set
    #[error("{0} must be set")]
    NotConfigured(&'static str),

    /// Evaluation point or gradient does not match the noise vector
    #[error("{what} has length {got}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Noise distribution could not be constructed
    #[error("Sampling error: {0}")]
    Sampling(String),
}

impl MechanismError {
    /// Classify this error as a type or value failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            MechanismError::NotNumeric { .. } | MechanismError::NotInteger { .. } => {
                ErrorKind::Type
            }
            _ => ErrorKind::Value,
        }
    }

    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }

    pub fn is_value_error(&self) -> bool {
        self.kind() == ErrorKind::Value
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MechanismError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let type_err = MechanismError::NotNumeric {
            name: "alpha",
            value: f64::NAN,
        };
        assert_eq!(type_err.kind(), ErrorKind::Type);
        assert!(type_err.is_type_error());

        let value_err = MechanismError::NotConfigured("Dimension d");
        assert_eq!(value_err.kind(), ErrorKind::Value);
        assert!(value_err.is_value_error());
    }

    #[test]
    fn test_display_messages() {
        let err = MechanismError::InvalidDelta {
            value: 0.5,
            reason: "Delta must be zero".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid delta 0.5: Delta must be zero");

        let err = MechanismError::ShapeMismatch {
            what: "w",
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "w has length 2, expected 3");
    }
}
