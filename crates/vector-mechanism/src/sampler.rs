//! Noise Vector Sampling
//!
//! Draws the random vector `b` added to the objective. Its direction is
//! uniform on the unit sphere in d dimensions and its norm follows
//! `Gamma(shape = d, scale = 1 / rate)`, which gives the density
//! `p(b) ∝ exp(-rate · ‖b‖)` required by objective perturbation.
//!
//! # Construction
//!
//! ```text
//! z ~ N(0, I_d)
//! u = z / ‖z‖₂
//! r ~ Gamma(d, 1/rate)
//! b = r · u
//! ```
//!
//! All sampling goes through a caller-supplied [`rand::Rng`], so a seeded
//! generator reproduces the same vector.

use crate::error::{MechanismError, Result};
use rand::Rng;
use rand_distr::{Distribution, Gamma, StandardNormal};

/// Euclidean norm
pub fn l2_norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Dot product of equal-length slices
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Draw a direction uniformly from the unit sphere in `d` dimensions
pub fn sample_unit_direction<R: Rng + ?Sized>(rng: &mut R, d: usize) -> Vec<f64> {
    loop {
        let mut direction: Vec<f64> = (0..d)
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        let norm = l2_norm(&direction);

        // An all-zero draw has no direction; redraw
        if norm > 0.0 && norm.is_finite() {
            for x in direction.iter_mut() {
                *x /= norm;
            }
            return direction;
        }
    }
}

/// Draw the noise magnitude from `Gamma(d, 1/rate)`
pub fn sample_magnitude<R: Rng + ?Sized>(rng: &mut R, d: usize, rate: f64) -> Result<f64> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(MechanismError::Sampling(format!(
            "Gamma rate must be positive and finite, got {}",
            rate
        )));
    }

    // rand_distr uses shape-scale, so scale = 1/rate
    let gamma = Gamma::new(d as f64, 1.0 / rate)
        .map_err(|e| MechanismError::Sampling(e.to_string()))?;

    Ok(gamma.sample(rng))
}

/// Draw the full noise vector `b` of length `d`
pub fn sample_noise_vector<R: Rng + ?Sized>(rng: &mut R, d: usize, rate: f64) -> Result<Vec<f64>> {
    if d == 0 {
        return Err(MechanismError::InvalidDimension {
            value: 0.0,
            reason: "d must be strictly positive".to_string(),
        });
    }

    let direction = sample_unit_direction(rng, d);
    let magnitude = sample_magnitude(rng, d, rate)?;

    Ok(direction.into_iter().map(|x| x * magnitude).collect())
}
