//! Mechanism configuration records
//!
//! [`VectorParams`] is a plain serialisable snapshot of a fully configured
//! mechanism. It carries no validation of its own; it is applied through the
//! mechanism's setters (see `Vector::from_params`), so a deserialised record
//! cannot bypass the parameter checks.

use crate::mechanism::{DEFAULT_ALPHA, DEFAULT_DATA_SENSITIVITY};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `epsilon`
pub const ENV_EPSILON: &str = "VECTOR_MECHANISM_EPSILON";
/// Environment variable overriding `function_sensitivity`
pub const ENV_FUNCTION_SENSITIVITY: &str = "VECTOR_MECHANISM_FUNCTION_SENSITIVITY";
/// Environment variable overriding `data_sensitivity`
pub const ENV_DATA_SENSITIVITY: &str = "VECTOR_MECHANISM_DATA_SENSITIVITY";
/// Environment variable overriding `alpha`
pub const ENV_ALPHA: &str = "VECTOR_MECHANISM_ALPHA";
/// Environment variable overriding `dimension`
pub const ENV_DIMENSION: &str = "VECTOR_MECHANISM_DIMENSION";

fn default_data_sensitivity() -> f64 {
    DEFAULT_DATA_SENSITIVITY
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

/// Vector mechanism parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorParams {
    /// Total privacy budget
    pub epsilon: f64,
    /// Bound on the objective's second derivative
    pub function_sensitivity: f64,
    /// Bound on the 2-norm of each data row
    #[serde(default = "default_data_sensitivity")]
    pub data_sensitivity: f64,
    /// Regularisation strength
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Length of the parameter vector being optimised
    pub dimension: usize,
}

impl Default for VectorParams {
    /// ε = 1 with the logistic-loss function sensitivity of 1/4
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            function_sensitivity: 0.25,
            data_sensitivity: DEFAULT_DATA_SENSITIVITY,
            alpha: DEFAULT_ALPHA,
            dimension: 1,
        }
    }
}

impl VectorParams {
    /// Load overrides from the environment on top of the defaults (best-effort).
    ///
    /// Supported:
    /// - VECTOR_MECHANISM_EPSILON
    /// - VECTOR_MECHANISM_FUNCTION_SENSITIVITY
    /// - VECTOR_MECHANISM_DATA_SENSITIVITY
    /// - VECTOR_MECHANISM_ALPHA
    /// - VECTOR_MECHANISM_DIMENSION
    pub fn from_env_or_default() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, ignoring missing, unparsable and
    /// non-positive values
    pub fn with_overrides<L>(mut self, lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|x| x.is_finite() && *x > 0.0)
        };

        if let Some(x) = positive(ENV_EPSILON) {
            self.epsilon = x;
        }
        if let Some(x) = positive(ENV_FUNCTION_SENSITIVITY) {
            self.function_sensitivity = x;
        }
        if let Some(x) = positive(ENV_DATA_SENSITIVITY) {
            self.data_sensitivity = x;
        }
        if let Some(x) = positive(ENV_ALPHA) {
            self.alpha = x;
        }
        if let Some(d) = lookup(ENV_DIMENSION)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|d| *d >= 1)
        {
            self.dimension = d;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let params: VectorParams =
            serde_json::from_str(r#"{"epsilon": 2.0, "function_sensitivity": 0.25, "dimension": 5}"#)
                .unwrap();

        assert_eq!(params.epsilon, 2.0);
        assert_eq!(params.data_sensitivity, 1.0);
        assert_eq!(params.alpha, 0.01);
        assert_eq!(params.dimension, 5);
    }

    #[test]
    fn test_deserialize_requires_epsilon_and_dimension() {
        assert!(serde_json::from_str::<VectorParams>(r#"{"function_sensitivity": 1.0}"#).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let params = VectorParams {
            epsilon: 0.5,
            function_sensitivity: 1.0,
            data_sensitivity: 2.0,
            alpha: 0.1,
            dimension: 7,
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(serde_json::from_str::<VectorParams>(&json).unwrap(), params);
    }

    #[test]
    fn test_overrides() {
        let params = VectorParams::default().with_overrides(lookup_from(&[
            (ENV_EPSILON, " 3.5 "),
            (ENV_ALPHA, "0.2"),
            (ENV_DIMENSION, "12"),
        ]));

        assert_eq!(params.epsilon, 3.5);
        assert_eq!(params.alpha, 0.2);
        assert_eq!(params.dimension, 12);
        assert_eq!(params.function_sensitivity, 0.25);
        assert_eq!(params.data_sensitivity, 1.0);
    }

    #[test]
    fn test_bad_overrides_ignored() {
        let params = VectorParams::default().with_overrides(lookup_from(&[
            (ENV_EPSILON, "-1"),
            (ENV_FUNCTION_SENSITIVITY, "abc"),
            (ENV_DATA_SENSITIVITY, "inf"),
            (ENV_DIMENSION, "0"),
        ]));

        assert_eq!(params, VectorParams::default());
    }
}
