// src/validation/mod.rs

//! Checks on amplitude vectors and probability distributions.

use crate::core::{AmplitudeVector, NORM_TOLERANCE, QuantumError, Result};

/// Checks that `Σ amplitude[i]^2 ≈ 1`.
///
/// # Arguments
/// * `state` - The amplitudes to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `1e-9`.
///
/// # Returns
/// * `Ok(())` if normalised within tolerance.
/// * `Err(QuantumError::Incoherence)` otherwise.
pub fn check_normalization(state: &AmplitudeVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance || !norm_sq.is_finite() {
        Err(QuantumError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(a_i^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that every entry lies in `[0, 1]` and the entries sum to 1.
pub fn check_probability_distribution(probabilities: &[f64], tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    if let Some((i, p)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < -effective_tolerance || **p > 1.0 + effective_tolerance)
    {
        return Err(QuantumError::Incoherence {
            message: format!("Probability {} at index {} is outside [0, 1]", p, i),
        });
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > effective_tolerance {
        return Err(QuantumError::Incoherence {
            message: format!("Probabilities sum to {} (Deviation > {})", total, effective_tolerance),
        });
    }
    Ok(())
}

/// Shannon entropy of `probabilities` divided by `log2(len)`, in `[0, 1]`.
///
/// Zero entries contribute nothing. A single-entry distribution has no
/// uncertainty and scores 0.
pub fn normalized_entropy(probabilities: &[f64]) -> f64 {
    if probabilities.len() < 2 {
        return 0.0;
    }
    let entropy: f64 = probabilities
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.log2())
        .sum();
    (entropy / (probabilities.len() as f64).log2()).clamp(0.0, 1.0)
}
