// src/core/state.rs

use std::fmt;

/// Norms below this are treated as an annihilated vector.
const MIN_NORM: f64 = 1e-12;

/// The joint state of an `n`-qubit register: `2^n` real amplitudes.
///
/// Basis index `i` encodes the classical bit pattern of every qubit, with bit `k`
/// of `i` holding the value of qubit `k` (qubit 0 is the least-significant bit).
///
/// The amplitudes are **phase-approximated**: they are plain `f64` values rather
/// than complex numbers, and rotations that would need an imaginary component are
/// replaced by their real (cosine) part. This is not a physically faithful quantum
/// state and measurement statistics depend on that approximation.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point amplitudes
pub struct AmplitudeVector {
    amplitudes: Vec<f64>,
}

impl AmplitudeVector {
    /// Wraps an existing amplitude vector. No normalisation is applied.
    pub(crate) fn new(amplitudes: Vec<f64>) -> Self {
        Self { amplitudes }
    }

    /// One-hot vector of dimension `dim` with amplitude 1 at `index`.
    pub(crate) fn basis(dim: usize, index: usize) -> Self {
        let mut amplitudes = vec![0.0; dim];
        if index < dim {
            amplitudes[index] = 1.0;
        }
        Self { amplitudes }
    }

    /// Read-only access to the amplitudes.
    pub fn vector(&self) -> &[f64] {
        &self.amplitudes
    }

    pub(crate) fn vector_mut(&mut self) -> &mut [f64] {
        &mut self.amplitudes
    }

    /// Number of basis states represented.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// `Σ amplitude[i]^2`
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a * a).sum()
    }

    /// Elementwise square of the amplitudes.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a * a).collect()
    }

    /// Rescales to unit norm. Returns `false` (and leaves the vector alone) when the
    /// norm is too small to divide by.
    pub(crate) fn normalize(&mut self) -> bool {
        let norm = self.norm_sqr().sqrt();
        if !norm.is_finite() || norm < MIN_NORM {
            return false;
        }
        for a in self.amplitudes.iter_mut() {
            *a /= norm;
        }
        true
    }
}

impl fmt::Display for AmplitudeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amplitudes[")?;
        for (i, a) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, a)?;
        }
        write!(f, "]")
    }
}
