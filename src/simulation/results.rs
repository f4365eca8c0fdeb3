// src/simulation/results.rs
use crate::core::QuantumError;
use crate::operations::{Gate, GateSpec};
use serde::Serialize;
use std::fmt;

/// Zero-padded binary label of `index`, qubit 0 in the rightmost position.
pub fn basis_label(index: usize, num_qubits: usize) -> String {
    format!("{:0width$b}", index, width = num_qubits)
}

/// Result of a destructive measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementOutcome {
    /// Sampled basis-state index.
    pub outcome_index: usize,
    /// `outcome_index` as a zero-padded binary string, width = qubit count.
    pub binary_string: String,
    /// The distribution the outcome was sampled from (pre-collapse).
    pub probabilities: Vec<f64>,
}

impl MeasurementOutcome {
    /// Value of `qubit` in the sampled basis state.
    pub fn qubit_value(&self, qubit: usize) -> u8 {
        ((self.outcome_index >> qubit) & 1) as u8
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.probabilities.get(self.outcome_index).copied().unwrap_or(0.0);
        write!(f, "|{}⟩ (index {}, p = {:.4})", self.binary_string, self.outcome_index, p)
    }
}

/// One basis state with non-negligible probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasisProbability {
    /// Binary label of the basis state.
    pub state: String,
    /// Squared amplitude.
    pub probability: f64,
}

/// A gate that was skipped during a circuit run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedGate {
    /// Position of the gate in the submitted list.
    pub position: usize,
    /// The gate as submitted.
    pub gate: GateSpec,
    /// Why it was skipped.
    pub reason: String,
    /// The underlying error.
    #[serde(skip)]
    pub error: QuantumError,
}

impl RejectedGate {
    pub(crate) fn new(position: usize, gate: GateSpec, error: QuantumError) -> Self {
        Self { position, gate, reason: error.to_string(), error }
    }
}

/// Final register of a circuit run plus the gates that did not apply.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitOutcome {
    /// Amplitudes after the last applied gate (not measured).
    pub amplitudes: Vec<f64>,
    /// Gates skipped along the way, in submission order.
    pub rejected: Vec<RejectedGate>,
}

/// `run_circuit` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitReport {
    /// Register size the circuit ran on.
    pub num_qubits: usize,
    /// The gate list as submitted, rejected entries included.
    pub circuit: Vec<GateSpec>,
    /// Amplitudes after the last applied gate.
    pub final_amplitudes: Vec<f64>,
    /// Squared amplitudes.
    pub probabilities: Vec<f64>,
    /// Basis states above the report floor, most probable first.
    pub states: Vec<BasisProbability>,
    /// First entry of `states`, if any.
    pub most_likely: Option<BasisProbability>,
    /// Gates that were skipped.
    pub rejected: Vec<RejectedGate>,
}

impl CircuitReport {
    pub(crate) fn new(
        num_qubits: usize,
        circuit: Vec<GateSpec>,
        outcome: CircuitOutcome,
        floor: f64,
    ) -> Self {
        let probabilities: Vec<f64> = outcome.amplitudes.iter().map(|a| a * a).collect();

        let mut states: Vec<BasisProbability> = probabilities
            .iter()
            .enumerate()
            .filter(|(_, p)| **p > floor)
            .map(|(i, p)| BasisProbability { state: basis_label(i, num_qubits), probability: *p })
            .collect();
        // Stable sort keeps index order among equal probabilities
        states.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        let most_likely = states.first().cloned();

        Self {
            num_qubits,
            circuit,
            final_amplitudes: outcome.amplitudes,
            probabilities,
            states,
            most_likely,
            rejected: outcome.rejected,
        }
    }
}

impl fmt::Display for CircuitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit Report ({} gates on {} qubits):", self.circuit.len(), self.num_qubits)?;
        if self.states.is_empty() {
            writeln!(f, "  No basis state above the report floor.")?;
        }
        for state in &self.states {
            writeln!(f, "    |{}⟩: {:.4}", state.state, state.probability)?;
        }
        for rejected in &self.rejected {
            writeln!(f, "  Skipped gate #{} ({}): {}", rejected.position, rejected.gate.kind, rejected.reason)?;
        }
        Ok(())
    }
}

/// `getState` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Register size.
    pub num_qubits: usize,
    /// Current amplitudes.
    pub amplitudes: Vec<f64>,
    /// Gates applied since the last (re)initialisation.
    pub gate_history: Vec<Gate>,
}

/// `status` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    /// Whether the session has an engine yet.
    pub initialized: bool,
    /// `2^n`, or 0 before initialisation.
    pub dimension: usize,
    /// Register size, or 0 before initialisation.
    pub num_qubits: usize,
}
