//! Perturbed Objective Functions
//!
//! An objective is any `Fn(&[f64]) -> Evaluation`: it either reports a bare
//! value or a value together with its gradient. [`PerturbedObjective`] wraps
//! one and folds in a fixed noise vector `b` and quadratic coefficient Δ:
//!
//! ```text
//! J̃(w)  = J(w) + bᵀw + ½ Δ ‖w‖²
//! ∇J̃(w) = ∇J(w) + b + Δ w
//! ```
//!
//! `b` and Δ are fixed when the wrapper is built and reused on every call.
//! Iterative optimisers evaluate the objective many times during one training
//! run; redrawing `b` between evaluations would void the privacy guarantee.

use crate::budget::PrivacyAllocation;
use crate::error::{MechanismError, Result};
use crate::sampler::dot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of evaluating an objective at a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Objective value only
    Value(f64),
    /// Objective value and its gradient
    ValueAndGradient(f64, Vec<f64>),
}

impl Evaluation {
    pub fn value(&self) -> f64 {
        match self {
            Evaluation::Value(v) | Evaluation::ValueAndGradient(v, _) => *v,
        }
    }

    pub fn gradient(&self) -> Option<&[f64]> {
        match self {
            Evaluation::Value(_) => None,
            Evaluation::ValueAndGradient(_, grad) => Some(grad),
        }
    }

    pub fn has_gradient(&self) -> bool {
        matches!(self, Evaluation::ValueAndGradient(..))
    }

    pub fn into_parts(self) -> (f64, Option<Vec<f64>>) {
        match self {
            Evaluation::Value(v) => (v, None),
            Evaluation::ValueAndGradient(v, grad) => (v, Some(grad)),
        }
    }
}

/// Objective with a fixed perturbation folded in
///
/// Holds no interior mutability: it is `Send + Sync` whenever the wrapped
/// objective is, and can be evaluated from several threads at once.
#[derive(Clone)]
pub struct PerturbedObjective<F> {
    objective: F,
    noise: Vec<f64>,
    delta_residual: f64,
    allocation: Option<PrivacyAllocation>,
}

impl<F> PerturbedObjective<F>
where
    F: Fn(&[f64]) -> Evaluation,
{
    pub(crate) fn new(objective: F, noise: Vec<f64>, allocation: PrivacyAllocation) -> Self {
        Self {
            objective,
            noise,
            delta_residual: allocation.delta_residual,
            allocation: Some(allocation),
        }
    }

    /// Wrap an objective with an explicit noise vector and quadratic coefficient
    ///
    /// Used to replay a recorded perturbation. No privacy guarantee is implied
    /// unless `noise` was drawn by the vector mechanism.
    pub fn from_parts(objective: F, noise: Vec<f64>, delta_residual: f64) -> Result<Self> {
        if noise.is_empty() {
            return Err(MechanismError::InvalidDimension {
                value: 0.0,
                reason: "Noise vector must not be empty".to_string(),
            });
        }
        if let Some(&bad) = noise.iter().find(|x| !x.is_finite()) {
            return Err(MechanismError::NotNumeric {
                name: "Noise component",
                value: bad,
            });
        }
        if !delta_residual.is_finite() {
            return Err(MechanismError::NotNumeric {
                name: "Delta residual",
                value: delta_residual,
            });
        }

        Ok(Self {
            objective,
            noise,
            delta_residual,
            allocation: None,
        })
    }

    /// Evaluate the perturbed objective at `w`
    ///
    /// Fails if `w`, or the gradient returned by the wrapped objective, does
    /// not have the same length as the noise vector.
    pub fn evaluate(&self, w: &[f64]) -> Result<Evaluation> {
        self.check_len("w", w.len())?;

        let (value, grad) = (self.objective)(w).into_parts();
        let value = value + dot(&self.noise, w) + 0.5 * self.delta_residual * dot(w, w);

        match grad {
            None => Ok(Evaluation::Value(value)),
            Some(mut grad) => {
                self.check_len("Gradient", grad.len())?;
                for ((g, b), x) in grad.iter_mut().zip(&self.noise).zip(w) {
                    *g += b + self.delta_residual * x;
                }
                Ok(Evaluation::ValueAndGradient(value, grad))
            }
        }
    }

    /// Evaluate and return only the objective value
    pub fn value(&self, w: &[f64]) -> Result<f64> {
        self.evaluate(w).map(|e| e.value())
    }
}

impl<F> PerturbedObjective<F> {
    /// The fixed noise vector `b`
    pub fn noise(&self) -> &[f64] {
        &self.noise
    }

    /// Coefficient Δ of the extra quadratic term
    pub fn delta_residual(&self) -> f64 {
        self.delta_residual
    }

    pub fn dimension(&self) -> usize {
        self.noise.len()
    }

    /// Budget allocation that produced this perturbation, if it came from
    /// the mechanism rather than [`PerturbedObjective::from_parts`]
    pub fn allocation(&self) -> Option<&PrivacyAllocation> {
        self.allocation.as_ref()
    }

    /// Recover the wrapped objective
    pub fn into_inner(self) -> F {
        self.objective
    }

    fn check_len(&self, what: &'static str, got: usize) -> Result<()> {
        if got != self.noise.len() {
            return Err(MechanismError::ShapeMismatch {
                what,
                expected: self.noise.len(),
                got,
            });
        }
        Ok(())
    }
}

impl<F> fmt::Debug for PerturbedObjective<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The noise itself is not printed
        f.debug_struct("PerturbedObjective")
            .field("dimension", &self.noise.len())
            .field("delta_residual", &self.delta_residual)
            .field("allocation", &self.allocation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TOL: f64 = 1e-12;

    fn zero_with_gradient(w: &[f64]) -> Evaluation {
        Evaluation::ValueAndGradient(0.0, vec![0.0; w.len()])
    }

    #[test]
    fn test_fixed_noise_end_to_end() {
        let wrapped =
            PerturbedObjective::from_parts(zero_with_gradient, vec![0.3, -0.4], 0.0).unwrap();

        let (value, grad) = wrapped.evaluate(&[1.0, 1.0]).unwrap().into_parts();
        let grad = grad.unwrap();

        assert!((value - (-0.1)).abs() < TOL);
        assert!((grad[0] - 0.3).abs() < TOL);
        assert!((grad[1] - (-0.4)).abs() < TOL);
    }

    #[test]
    fn test_value_only_stays_value_only() {
        let wrapped =
            PerturbedObjective::from_parts(|_: &[f64]| Evaluation::Value(2.0), vec![1.0, 2.0], 0.0)
                .unwrap();

        let out = wrapped.evaluate(&[0.5, 0.25]).unwrap();
        assert!(!out.has_gradient());
        assert!((out.value() - 3.0).abs() < TOL);
    }

    #[test]
    fn test_quadratic_term() {
        // J(w) = ‖w‖², Δ = 2: J̃ = ‖w‖² + bᵀw + ‖w‖²
        let objective = |w: &[f64]| {
            Evaluation::ValueAndGradient(dot(w, w), w.iter().map(|x| 2.0 * x).collect())
        };
        let wrapped = PerturbedObjective::from_parts(objective, vec![1.0, -1.0, 0.5], 2.0).unwrap();

        let w = [1.0, 2.0, 3.0];
        let (value, grad) = wrapped.evaluate(&w).unwrap().into_parts();

        // ‖w‖² = 14, bᵀw = 1 - 2 + 1.5 = 0.5
        assert!((value - (14.0 + 0.5 + 14.0)).abs() < TOL);
        assert_eq!(grad.unwrap(), vec![2.0 + 1.0 + 2.0, 4.0 - 1.0 + 4.0, 6.0 + 0.5 + 6.0]);
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let wrapped =
            PerturbedObjective::from_parts(zero_with_gradient, vec![0.7, 0.1, -0.2], 0.3).unwrap();

        let w = [0.2, -1.5, 3.0];
        let first = wrapped.evaluate(&w).unwrap();
        let second = wrapped.evaluate(&w).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_mismatch() {
        let wrapped =
            PerturbedObjective::from_parts(zero_with_gradient, vec![0.3, -0.4], 0.0).unwrap();

        let err = wrapped.evaluate(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            MechanismError::ShapeMismatch {
                what: "w",
                expected: 2,
                got: 3
            }
        );
        assert_eq!(err.kind(), ErrorKind::Value);

        let bad_gradient = PerturbedObjective::from_parts(
            |_: &[f64]| Evaluation::ValueAndGradient(0.0, vec![0.0]),
            vec![0.3, -0.4],
            0.0,
        )
        .unwrap();
        assert!(matches!(
            bad_gradient.evaluate(&[1.0, 1.0]),
            Err(MechanismError::ShapeMismatch { what: "Gradient", .. })
        ));
    }

    #[test]
    fn test_from_parts_rejects_bad_noise() {
        let f = |_: &[f64]| Evaluation::Value(0.0);
        assert!(PerturbedObjective::from_parts(f, vec![], 0.0).is_err());
        assert!(PerturbedObjective::from_parts(f, vec![f64::NAN], 0.0).is_err());
        assert!(PerturbedObjective::from_parts(f, vec![1.0], f64::INFINITY).is_err());
    }

    #[test]
    fn test_debug_hides_noise() {
        let wrapped =
            PerturbedObjective::from_parts(zero_with_gradient, vec![0.123456], 0.0).unwrap();
        let rendered = format!("{:?}", wrapped);
        assert!(rendered.contains("dimension: 1"));
        assert!(!rendered.contains("0.123456"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let wrapped =
            PerturbedObjective::from_parts(zero_with_gradient, vec![0.3, -0.4], 0.0).unwrap();
        assert_send_sync(&wrapped);
    }
}
