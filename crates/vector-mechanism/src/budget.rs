//! Privacy Budget Allocation
//!
//! Derives the effective budget ε' used to calibrate the noise vector from
//! the configured ε, function sensitivity c, data sensitivity g and
//! regularisation strength α (Chaudhuri, Monteleoni & Sarwate, 2011).
//!
//! # Primary allocation
//!
//! ```text
//! ε' = ε - 2 ln(1 + c·g / (α/2))
//! Δ  = 0
//! ```
//!
//! # Fallback allocation
//!
//! When the logarithm term consumes the whole budget (ε' ≤ 0) the objective
//! is not smooth enough for the regularisation in use. Half the budget is
//! spent directly and an extra quadratic term with coefficient Δ is added to
//! the objective:
//!
//! ```text
//! Δ  = c·g / (e^(ε/4) - 1) - α/2
//! ε' = ε / 2
//! ```
//!
//! In both cases the Gamma rate for the noise magnitude is `ε' / (2g)`.

use serde::{Deserialize, Serialize};

/// Effective budget derived for one `randomise` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrivacyAllocation {
    /// Budget spent on the linear noise term
    pub epsilon_prime: f64,
    /// Coefficient of the extra quadratic term (zero on the primary path)
    pub delta_residual: f64,
    /// Rate of the Gamma distribution for the noise magnitude
    pub scale: f64,
}

impl PrivacyAllocation {
    /// Whether the fallback branch was taken
    pub fn is_approximate(&self) -> bool {
        self.delta_residual != 0.0
    }

    /// Whether every component is a finite number
    ///
    /// An ε close to the smallest positive float drives Δ to infinity.
    pub fn is_finite(&self) -> bool {
        self.epsilon_prime.is_finite() && self.delta_residual.is_finite() && self.scale.is_finite()
    }
}

/// Allocate the privacy budget
///
/// Inputs are assumed validated: ε, c, g and α strictly positive.
pub fn allocate(
    epsilon: f64,
    function_sensitivity: f64,
    data_sensitivity: f64,
    alpha: f64,
) -> PrivacyAllocation {
    let c = function_sensitivity;
    let g = data_sensitivity;
    let a = alpha;

    let mut epsilon_prime = epsilon - 2.0 * (1.0 + c * g / (0.5 * a)).ln();
    let mut delta_residual = 0.0;

    if epsilon_prime <= 0.0 {
        delta_residual = c * g / (epsilon / 4.0).exp_m1() - 0.5 * a;
        epsilon_prime = epsilon / 2.0;

        tracing::warn!(
            epsilon,
            delta_residual,
            "Regularisation too weak for pure allocation; spending half of epsilon directly"
        );
    }

    let scale = epsilon_prime / 2.0 / g;

    PrivacyAllocation {
        epsilon_prime,
        delta_residual,
        scale,
    }
}
