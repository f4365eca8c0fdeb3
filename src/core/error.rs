//! Error handling logic

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuantumError>;

/// Failures raised by the engine, the decision transform and configuration loading.
///
/// Per-gate failures (`InvalidQubitIndex`, `InvalidGateOperands`, `UnknownGateType`)
/// only ever reject the offending gate; the register they were aimed at is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// A gate referenced a qubit outside `[0, num_qubits)`.
    #[error("Invalid Qubit Index: qubit {qubit} is outside a {num_qubits}-qubit register")]
    InvalidQubitIndex {
        /// The offending index as received (may be negative)
        qubit: i64,
        /// Size of the register the gate was aimed at
        num_qubits: usize,
    },

    /// Operands are missing or contradictory (e.g. CNOT with `control == target`).
    #[error("Invalid Gate Operands: {message}")]
    InvalidGateOperands {
        /// InvalidGateOperands failure message
        message: String,
    },

    /// A gate tag outside the recognised set `H`, `X`, `Z`, `CNOT`, `QFT`.
    #[error("Unknown Gate Type: '{tag}'")]
    UnknownGateType {
        /// The tag as received
        tag: String,
    },

    /// Empty option list, or a weight vector that cannot be normalised.
    #[error("Degenerate Weight Vector: {message}")]
    DegenerateWeightVector {
        /// DegenerateWeightVector failure message
        message: String,
    },

    /// Requested register size is zero or above the configured ceiling.
    #[error("Invalid Qubit Count: {requested} (supported range is 1..={max})")]
    InvalidQubitCount {
        /// Requested number of qubits
        requested: usize,
        /// Configured ceiling
        max: usize,
    },

    /// The state lost (or would lose) its unit norm.
    #[error("Incoherence Violation: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// Configuration values out of range or unparsable configuration text.
    #[error("Invalid Configuration: {message}")]
    InvalidConfiguration {
        /// InvalidConfiguration failure message
        message: String,
    },
}
