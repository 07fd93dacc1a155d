//! Vector Mechanism - Differentially Private Objective Perturbation
//!
//! Adds calibrated random noise to a convex objective so that minimising the
//! perturbed objective yields an (ε, δ)-differentially private model. Used by
//! private empirical risk minimisation (regularised logistic or linear
//! regression) to release a trained model without leaking individual records.
//!
//! # Components
//!
//! - [`validation`]: per-parameter type and range checks
//! - [`base`]: shared ε/δ storage and the [`DpMechanism`] trait
//! - [`budget`]: derivation of the effective budget ε' and quadratic term Δ
//! - [`sampler`]: noise vector with uniform direction and Gamma magnitude
//! - [`objective`]: [`PerturbedObjective`], the wrapper handed to an optimiser
//! - [`mechanism`]: [`Vector`], the configurable mechanism tying it together
//!
//! # Example
//!
//! ```rust
//! use vector_mechanism::{DpMechanism, Evaluation, Vector};
//!
//! // Ridge-style objective on d = 3 parameters
//! let objective = |w: &[f64]| {
//!     let value = 0.5 * w.iter().map(|x| x * x).sum::<f64>();
//!     Evaluation::ValueAndGradient(value, w.to_vec())
//! };
//!
//! let mut mech = Vector::new();
//! mech.set_epsilon_delta(1.0, 0.0)?
//!     .set_sensitivity(0.25, 1.0)?
//!     .set_alpha(0.1)?
//!     .set_dimension(3.0)?;
//!
//! let perturbed = mech.randomise(objective)?;
//!
//! // The same noise is applied on every call
//! let a = perturbed.evaluate(&[0.1, 0.2, 0.3])?;
//! let b = perturbed.evaluate(&[0.1, 0.2, 0.3])?;
//! assert_eq!(a, b);
//! # Ok::<(), vector_mechanism::MechanismError>(())
//! ```

pub mod base;
pub mod budget;
pub mod config;
pub mod error;
pub mod mechanism;
pub mod objective;
pub mod sampler;
pub mod validation;

// Re-export commonly used types for convenience
pub use base::{DpMechanism, MechanismBase};
pub use budget::{allocate, PrivacyAllocation};
pub use config::VectorParams;
pub use error::{ErrorKind, MechanismError, Result};
pub use mechanism::{Vector, DEFAULT_ALPHA, DEFAULT_DATA_SENSITIVITY};
pub use objective::{Evaluation, PerturbedObjective};
