//! Simulator configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a valid
//! configuration.

use crate::core::{
    DEFAULT_BACKGROUND_INTERFERENCE, DEFAULT_EFFECT_THRESHOLD, DEFAULT_ENVIRONMENTAL_NOISE,
    DEFAULT_MAX_QUBITS, DEFAULT_QUBITS, DEFAULT_UNCERTAINTY_FACTOR, NORM_TOLERANCE,
};
use crate::core::{QuantumError, Result};
use serde::{Deserialize, Serialize};

/// Hard ceiling on `max_qubits`; `2^16` amplitudes is already far past interactive use.
const QUBIT_CEILING: usize = 16;

/// Register a circuit run starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitStart {
    /// One-hot `|0…0⟩`.
    #[default]
    Ground,
    /// Equal superposition, as produced by `initialize`.
    Superposition,
}

/// Tunables for the quantum-weighted decision transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Scale of the multiplicative noise applied at measurement, in `[0, 1]`.
    pub uncertainty_factor: f64,
    /// Amplitude of the fixed `sin(i·π/len)` oscillation added during interference.
    pub background_interference: f64,
    /// Weight or entropy shift above which an effect is reported.
    pub effect_threshold: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            uncertainty_factor: DEFAULT_UNCERTAINTY_FACTOR,
            background_interference: DEFAULT_BACKGROUND_INTERFERENCE,
            effect_threshold: DEFAULT_EFFECT_THRESHOLD,
        }
    }
}

/// Session-wide settings for [`Simulator`](crate::Simulator) and the engines it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest register `initialize` accepts.
    pub max_qubits: usize,
    /// Register size used when the session engine is created lazily.
    pub default_qubits: usize,
    /// Allowed deviation of `Σ|a|^2` from 1 in state validation.
    pub norm_tolerance: f64,
    /// Starting register for circuit runs.
    pub circuit_start: CircuitStart,
    /// Validate normalisation after every gate (rejecting the gate on failure).
    pub validate_each_gate: bool,
    /// Default strength for `apply_environmental_noise`.
    pub environmental_noise: f64,
    /// Seed for every random draw in the session. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Decision transform tunables.
    pub decision: DecisionConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            default_qubits: DEFAULT_QUBITS,
            norm_tolerance: NORM_TOLERANCE,
            circuit_start: CircuitStart::default(),
            validate_each_gate: false,
            environmental_noise: DEFAULT_ENVIRONMENTAL_NOISE,
            seed: None,
            decision: DecisionConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    /// Parses a JSON document and validates the result.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SimulatorConfig = serde_json::from_str(text).map_err(|e| {
            QuantumError::InvalidConfiguration { message: format!("unparsable configuration: {}", e) }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(QuantumError::InvalidConfiguration { message });

        if self.max_qubits == 0 || self.max_qubits > QUBIT_CEILING {
            return invalid(format!("max_qubits must be in 1..={}, got {}", QUBIT_CEILING, self.max_qubits));
        }
        if self.default_qubits == 0 || self.default_qubits > self.max_qubits {
            return invalid(format!(
                "default_qubits must be in 1..={}, got {}",
                self.max_qubits, self.default_qubits
            ));
        }
        if !(self.norm_tolerance > 0.0 && self.norm_tolerance < 1.0) {
            return invalid(format!("norm_tolerance must be in (0, 1), got {}", self.norm_tolerance));
        }
        if !(0.0..=1.0).contains(&self.environmental_noise) {
            return invalid(format!("environmental_noise must be in [0, 1], got {}", self.environmental_noise));
        }
        let decision = &self.decision;
        if !(0.0..=1.0).contains(&decision.uncertainty_factor) {
            return invalid(format!(
                "decision.uncertainty_factor must be in [0, 1], got {}",
                decision.uncertainty_factor
            ));
        }
        if !decision.background_interference.is_finite() || decision.background_interference < 0.0 {
            return invalid(format!(
                "decision.background_interference must be finite and non-negative, got {}",
                decision.background_interference
            ));
        }
        if !decision.effect_threshold.is_finite() || decision.effect_threshold < 0.0 {
            return invalid(format!(
                "decision.effect_threshold must be finite and non-negative, got {}",
                decision.effect_threshold
            ));
        }
        Ok(())
    }
}
