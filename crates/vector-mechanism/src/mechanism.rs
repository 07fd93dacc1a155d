//! The Vector Mechanism
//!
//! Perturbs a convex objective so that its minimiser is differentially
//! private (objective perturbation, Chaudhuri et al. 2011,
//! <http://www.jmlr.org/papers/volume12/chaudhuri11a/chaudhuri11a.pdf>).
//!
//! # Lifecycle
//!
//! ```text
//! Unconfigured ─set_epsilon_delta─► ─set_sensitivity─► ─set_dimension─► Ready
//! Ready ─randomise─► PerturbedObjective   (mechanism stays Ready)
//! ```
//!
//! Every `randomise` call draws a fresh, independent noise vector. The
//! configuration itself is never touched by `randomise`; only the RNG
//! advances.

use crate::base::{DpMechanism, MechanismBase};
use crate::budget::{allocate, PrivacyAllocation};
use crate::config::VectorParams;
use crate::error::{MechanismError, Result};
use crate::objective::{Evaluation, PerturbedObjective};
use crate::sampler::sample_noise_vector;
use crate::validation::{validate_alpha, validate_dimension, validate_sensitivity};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fmt;

/// Data sensitivity used when none is given
pub const DEFAULT_DATA_SENSITIVITY: f64 = 1.0;

/// Regularisation strength used when none is given
pub const DEFAULT_ALPHA: f64 = 0.01;

/// The vector mechanism
///
/// # Example
///
/// ```
/// use vector_mechanism::{DpMechanism, Evaluation, Vector};
///
/// let mut mech = Vector::with_seed(7);
/// mech.set_epsilon_delta(1.0, 0.0)?
///     .set_sensitivity(0.25, 1.0)?
///     .set_dimension(2.0)?;
///
/// let objective = |w: &[f64]| {
///     let value = w.iter().map(|x| x * x).sum::<f64>();
///     Evaluation::ValueAndGradient(value, w.iter().map(|x| 2.0 * x).collect())
/// };
///
/// let perturbed = mech.randomise(objective)?;
/// let out = perturbed.evaluate(&[0.5, -0.5])?;
/// assert!(out.has_gradient());
/// # Ok::<(), vector_mechanism::MechanismError>(())
/// ```
#[derive(Clone)]
pub struct Vector {
    base: MechanismBase,
    function_sensitivity: Option<f64>,
    data_sensitivity: f64,
    alpha: f64,
    dimension: Option<usize>,
    rng: ChaCha20Rng,
}

impl Vector {
    /// Create a mechanism seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(ChaCha20Rng::from_entropy())
    }

    /// Create a mechanism with a deterministic generator
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: ChaCha20Rng) -> Self {
        Self {
            base: MechanismBase::new(),
            function_sensitivity: None,
            data_sensitivity: DEFAULT_DATA_SENSITIVITY,
            alpha: DEFAULT_ALPHA,
            dimension: None,
            rng,
        }
    }

    /// Build a mechanism from a parameter record, validating every field
    pub fn from_params(params: &VectorParams) -> Result<Self> {
        let mut mech = Self::new();
        mech.apply_params(params)?;
        Ok(mech)
    }

    /// Apply a parameter record through the validating setters
    pub fn apply_params(&mut self, params: &VectorParams) -> Result<&mut Self> {
        self.set_epsilon_delta(params.epsilon, 0.0)?
            .set_sensitivity(params.function_sensitivity, params.data_sensitivity)?
            .set_alpha(params.alpha)?
            .set_dimension(params.dimension as f64)
    }

    /// Snapshot the configuration, if every parameter has been set
    pub fn params(&self) -> Option<VectorParams> {
        Some(VectorParams {
            epsilon: self.base.epsilon()?,
            function_sensitivity: self.function_sensitivity?,
            data_sensitivity: self.data_sensitivity,
            alpha: self.alpha,
            dimension: self.dimension?,
        })
    }

    /// Set the function and data sensitivities
    ///
    /// - Function sensitivity bounds the objective's second derivative
    /// - Data sensitivity bounds the 2-norm of each data row
    ///
    /// Both must be strictly positive. Nothing is stored unless both pass.
    pub fn set_sensitivity(
        &mut self,
        function_sensitivity: f64,
        data_sensitivity: f64,
    ) -> Result<&mut Self> {
        validate_sensitivity(function_sensitivity)?;
        validate_sensitivity(data_sensitivity)?;

        self.function_sensitivity = Some(function_sensitivity);
        self.data_sensitivity = data_sensitivity;
        Ok(self)
    }

    /// Set the function sensitivity with the default data sensitivity of 1
    pub fn set_function_sensitivity(&mut self, function_sensitivity: f64) -> Result<&mut Self> {
        self.set_sensitivity(function_sensitivity, DEFAULT_DATA_SENSITIVITY)
    }

    /// Set the regularisation strength α
    pub fn set_alpha(&mut self, alpha: f64) -> Result<&mut Self> {
        validate_alpha(alpha)?;
        self.alpha = alpha;
        Ok(self)
    }

    /// Set the dimension of the objective's domain
    ///
    /// Values within a fixed 1e-8 of an integer are accepted and truncated.
    pub fn set_dimension(&mut self, d: f64) -> Result<&mut Self> {
        self.dimension = Some(validate_dimension(d)?);
        Ok(self)
    }

    pub fn function_sensitivity(&self) -> Option<f64> {
        self.function_sensitivity
    }

    pub fn data_sensitivity(&self) -> f64 {
        self.data_sensitivity
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Derive the budget allocation for the current configuration
    ///
    /// Fails if ε is so small that the perturbation would not be finite.
    pub fn allocation(&self) -> Result<PrivacyAllocation> {
        let (epsilon, c, _) = self.ready_parameters()?;
        let allocation = allocate(epsilon, c, self.data_sensitivity, self.alpha);

        if !allocation.is_finite() {
            return Err(MechanismError::InvalidEpsilon {
                value: epsilon,
                reason: "Epsilon too small for a finite perturbation".to_string(),
            });
        }

        Ok(allocation)
    }

    /// Perturb `objective` with a freshly drawn noise vector
    ///
    /// All validation happens before any randomness is drawn, so a failed
    /// call leaves the generator untouched.
    pub fn randomise<F>(&mut self, objective: F) -> Result<PerturbedObjective<F>>
    where
        F: Fn(&[f64]) -> Evaluation,
    {
        let (_, _, d) = self.ready_parameters()?;
        let allocation = self.allocation()?;

        let noise = sample_noise_vector(&mut self.rng, d, allocation.scale)?;
        if noise.iter().any(|x| !x.is_finite()) {
            return Err(MechanismError::Sampling(
                "Noise vector has non-finite components".to_string(),
            ));
        }

        tracing::debug!(
            dimension = d,
            epsilon_prime = allocation.epsilon_prime,
            scale = allocation.scale,
            approximate = allocation.is_approximate(),
            "Drew noise vector for objective perturbation"
        );

        Ok(PerturbedObjective::new(objective, noise, allocation))
    }

    /// Epsilon, function sensitivity and dimension, or the first one missing
    fn ready_parameters(&self) -> Result<(f64, f64, usize)> {
        let epsilon = self.base.require_epsilon()?;
        let c = self
            .function_sensitivity
            .ok_or(MechanismError::NotConfigured("Sensitivities"))?;
        let d = self
            .dimension
            .ok_or(MechanismError::NotConfigured("Dimension d"))?;
        Ok((epsilon, c, d))
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::new()
    }
}

impl DpMechanism for Vector {
    fn epsilon(&self) -> Option<f64> {
        self.base.epsilon()
    }

    fn delta(&self) -> f64 {
        self.base.delta()
    }

    /// Only pure ε-DP is accepted: `delta` must be exactly zero
    fn set_epsilon_delta(&mut self, epsilon: f64, delta: f64) -> Result<&mut Self> {
        if delta != 0.0 {
            return Err(MechanismError::InvalidDelta {
                value: delta,
                reason: "Delta must be zero".to_string(),
            });
        }

        self.base.set_epsilon_delta(epsilon, delta)?;
        Ok(self)
    }

    fn check_inputs(&self) -> Result<()> {
        self.ready_parameters().map(|_| ())
    }
}

fn fmt_opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vector(epsilon={}, delta={}, function_sensitivity={}, data_sensitivity={}, alpha={}, d={})",
            fmt_opt(self.base.epsilon()),
            self.base.delta(),
            fmt_opt(self.function_sensitivity),
            self.data_sensitivity,
            self.alpha,
            fmt_opt(self.dimension),
        )
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Generator state is secret
        f.debug_struct("Vector")
            .field("base", &self.base)
            .field("function_sensitivity", &self.function_sensitivity)
            .field("data_sensitivity", &self.data_sensitivity)
            .field("alpha", &self.alpha)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}
