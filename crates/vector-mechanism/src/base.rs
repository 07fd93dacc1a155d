//! Shared mechanism plumbing
//!
//! Holds the (ε, δ) pair common to every differential privacy mechanism and
//! the baseline checks applied before a mechanism is used. Concrete
//! mechanisms embed a [`MechanismBase`] and implement [`DpMechanism`] on top
//! of it, adding their own restrictions.

use crate::error::{MechanismError, Result};
use crate::validation::{validate_delta, validate_epsilon};
use serde::{Deserialize, Serialize};

/// Common interface for differential privacy mechanisms
pub trait DpMechanism {
    /// Configured epsilon, if any
    fn epsilon(&self) -> Option<f64>;

    /// Configured delta
    fn delta(&self) -> f64;

    /// Set the privacy parameters used by the mechanism
    fn set_epsilon_delta(&mut self, epsilon: f64, delta: f64) -> Result<&mut Self>;

    /// Set epsilon for a pure ε-DP mechanism
    fn set_epsilon(&mut self, epsilon: f64) -> Result<&mut Self> {
        self.set_epsilon_delta(epsilon, 0.0)
    }

    /// Check that the mechanism is ready to be used
    ///
    /// Never mutates the mechanism.
    fn check_inputs(&self) -> Result<()>;
}

/// Epsilon/delta storage shared by mechanisms
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MechanismBase {
    epsilon: Option<f64>,
    delta: f64,
}

impl MechanismBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epsilon(&self) -> Option<f64> {
        self.epsilon
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Validate and store (ε, δ)
    ///
    /// Nothing is stored unless both values pass.
    pub fn set_epsilon_delta(&mut self, epsilon: f64, delta: f64) -> Result<()> {
        validate_epsilon(epsilon)?;
        validate_delta(delta)?;

        self.epsilon = Some(epsilon);
        self.delta = delta;
        Ok(())
    }

    /// Return the configured epsilon or fail if it was never set
    pub fn require_epsilon(&self) -> Result<f64> {
        let epsilon = self.epsilon.ok_or(MechanismError::NotConfigured("Epsilon"))?;
        validate_epsilon(epsilon)?;
        Ok(epsilon)
    }

    /// Baseline readiness check: epsilon must be set and positive
    pub fn check_inputs(&self) -> Result<()> {
        self.require_epsilon().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_unset_epsilon_fails() {
        let base = MechanismBase::new();
        assert_eq!(base.epsilon(), None);
        assert_eq!(base.delta(), 0.0);

        let err = base.check_inputs().unwrap_err();
        assert_eq!(err, MechanismError::NotConfigured("Epsilon"));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_set_epsilon_delta() {
        let mut base = MechanismBase::new();
        base.set_epsilon_delta(0.5, 1e-6).unwrap();

        assert_eq!(base.epsilon(), Some(0.5));
        assert_eq!(base.delta(), 1e-6);
        assert!(base.check_inputs().is_ok());
    }

    #[test]
    fn test_failed_set_leaves_state_unchanged() {
        let mut base = MechanismBase::new();
        base.set_epsilon_delta(1.0, 0.0).unwrap();

        assert!(base.set_epsilon_delta(-1.0, 0.0).is_err());
        assert!(base.set_epsilon_delta(2.0, 1.5).is_err());
        assert_eq!(base.epsilon(), Some(1.0));
        assert_eq!(base.delta(), 0.0);
    }
}
