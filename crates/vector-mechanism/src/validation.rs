//! Input Validation for Vector Mechanism Parameters
//!
//! Each validator checks one parameter in isolation. Type checks run before
//! range checks, so a NaN sensitivity is reported as non-numeric rather than
//! as out of range.
//!
//! # Parameter Constraints
//!
//! ## Epsilon (ε)
//! - Must be finite and positive (> 0)
//!
//! ## Delta (δ)
//! - Must be finite and in [0, 1] for the base mechanism
//! - The vector mechanism further requires δ = 0 at configuration time
//!
//! ## Sensitivities (c, g)
//! - Function sensitivity c bounds the objective's second derivative
//! - Data sensitivity g bounds the 2-norm of each data row
//! - Both must be finite and positive
//!
//! ## Alpha (α)
//! - Regularisation strength; must be finite and positive
//!
//! ## Dimension (d)
//! - Must be integer-valued (within floating-point tolerance) and ≥ 1

use crate::error::{MechanismError, Result};

/// Absolute tolerance for accepting a float as integer-valued
///
/// Fixed rather than relative to `d`, so large dimensions get no slack.
pub const DIMENSION_ATOL: f64 = 1e-8;

/// Reject NaN and infinities
pub fn ensure_numeric(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(MechanismError::NotNumeric { name, value });
    }
    Ok(())
}

/// Validate epsilon parameter
///
/// # Constraints
/// - Must be finite: NaN and ±inf are non-numeric, so an unbounded budget
///   is a type error rather than a value error
/// - Must be positive (> 0)
pub fn validate_epsilon(epsilon: f64) -> Result<()> {
    ensure_numeric("Epsilon", epsilon)?;

    if epsilon <= 0.0 {
        return Err(MechanismError::InvalidEpsilon {
            value: epsilon,
            reason: "Epsilon must be strictly positive".to_string(),
        });
    }

    Ok(())
}

/// Validate delta parameter for the base mechanism
///
/// # Constraints
/// - Must be finite
/// - Must be in [0, 1]
pub fn validate_delta(delta: f64) -> Result<()> {
    ensure_numeric("Delta", delta)?;

    if !(0.0..=1.0).contains(&delta) {
        return Err(MechanismError::InvalidDelta {
            value: delta,
            reason: "Delta must be in [0, 1]".to_string(),
        });
    }

    Ok(())
}

/// Validate a function or data sensitivity
pub fn validate_sensitivity(sensitivity: f64) -> Result<()> {
    ensure_numeric("Sensitivity", sensitivity)?;

    if sensitivity <= 0.0 {
        return Err(MechanismError::InvalidSensitivity {
            value: sensitivity,
            reason: "Sensitivities must be strictly positive".to_string(),
        });
    }

    Ok(())
}

/// Validate the regularisation strength
pub fn validate_alpha(alpha: f64) -> Result<()> {
    ensure_numeric("Alpha", alpha)?;

    if alpha <= 0.0 {
        return Err(MechanismError::InvalidAlpha {
            value: alpha,
            reason: "Alpha must be strictly positive".to_string(),
        });
    }

    Ok(())
}

/// Validate a dimension and return its integer value
///
/// `d` is accepted when it lies within [`DIMENSION_ATOL`] of its
/// truncation, so `3.0000000001` yields `3` while `2.5` and `50000.5` are
/// rejected as non-integer.
pub fn validate_dimension(d: f64) -> Result<usize> {
    ensure_numeric("d", d)?;

    let truncated = d.trunc();
    if (d - truncated).abs() > DIMENSION_ATOL {
        return Err(MechanismError::NotInteger { name: "d", value: d });
    }

    if truncated < 1.0 {
        return Err(MechanismError::InvalidDimension {
            value: d,
            reason: "d must be strictly positive".to_string(),
        });
    }

    if truncated > usize::MAX as f64 {
        return Err(MechanismError::InvalidDimension {
            value: d,
            reason: "d exceeds the addressable vector length".to_string(),
        });
    }

    Ok(truncated as usize)
}
