// src/operations/mod.rs

//! Gate definitions.
//!
//! [`Gate`] is the typed form the engine applies and records in its history.
//! [`GateSpec`] is the loose `{type, qubit?, control?, target?}` shape that arrives
//! from a transport layer; it is converted per gate so that one malformed entry
//! never poisons the rest of a circuit.

use crate::core::{QuantumError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One gate the engine knows how to apply. Also serves as the gate-history record.
///
/// Serialises as `{"type": "H", "qubit": 0}`, `{"type": "CNOT", "control": 0, "target": 1}`,
/// `{"type": "QFT"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Gate {
    /// Hadamard on a single qubit.
    #[serde(rename = "H")]
    Hadamard {
        /// Target qubit
        qubit: usize,
    },
    /// Bit flip on a single qubit.
    #[serde(rename = "X")]
    PauliX {
        /// Target qubit
        qubit: usize,
    },
    /// Sign flip of the `|1⟩` component of a single qubit.
    #[serde(rename = "Z")]
    PauliZ {
        /// Target qubit
        qubit: usize,
    },
    /// Flips `target` wherever `control` is set.
    #[serde(rename = "CNOT")]
    Cnot {
        /// Control qubit
        control: usize,
        /// Target qubit
        target: usize,
    },
    /// Cosine-only Fourier transform over the whole register.
    #[serde(rename = "QFT")]
    Qft,
}

impl Gate {
    /// Short tag used on the wire and in circuit diagrams.
    pub fn tag(&self) -> &'static str {
        match self {
            Gate::Hadamard { .. } => "H",
            Gate::PauliX { .. } => "X",
            Gate::PauliZ { .. } => "Z",
            Gate::Cnot { .. } => "CNOT",
            Gate::Qft => "QFT",
        }
    }

    /// Qubits named explicitly by the gate. `Qft` names none; it acts on the whole register.
    pub fn involved_qubits(&self) -> Vec<usize> {
        match self {
            Gate::Hadamard { qubit } | Gate::PauliX { qubit } | Gate::PauliZ { qubit } => {
                vec![*qubit]
            }
            Gate::Cnot { control, target } => vec![*control, *target],
            Gate::Qft => Vec::new(),
        }
    }

    /// Checks operands against a register of `num_qubits` qubits.
    pub fn validate(&self, num_qubits: usize) -> Result<()> {
        for qubit in self.involved_qubits() {
            if qubit >= num_qubits {
                return Err(QuantumError::InvalidQubitIndex { qubit: wire_index(qubit), num_qubits });
            }
        }
        if let Gate::Cnot { control, target } = self {
            if control == target {
                return Err(QuantumError::InvalidGateOperands {
                    message: format!("CNOT control and target must differ (both are {})", control),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Hadamard { qubit } | Gate::PauliX { qubit } | Gate::PauliZ { qubit } => {
                write!(f, "{}({})", self.tag(), qubit)
            }
            Gate::Cnot { control, target } => write!(f, "CNOT({} -> {})", control, target),
            Gate::Qft => write!(f, "QFT"),
        }
    }
}

/// Gate as received from a caller, before the tag and operands are checked.
///
/// Every field is optional and operands are signed, so a malformed entry still
/// deserialises and is rejected on its own by [`to_gate`](Self::to_gate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSpec {
    /// Gate tag, e.g. `"H"` or `"CNOT"`. Empty when the caller sent none.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Operand for single-qubit gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qubit: Option<i64>,
    /// CNOT control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<i64>,
    /// CNOT target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
}

impl GateSpec {
    /// Wire form of a single-qubit gate.
    pub fn single(kind: &str, qubit: usize) -> Self {
        Self { kind: kind.to_string(), qubit: Some(wire_index(qubit)), ..Self::default() }
    }

    /// Wire form of a CNOT.
    pub fn cnot(control: usize, target: usize) -> Self {
        Self {
            kind: "CNOT".to_string(),
            control: Some(wire_index(control)),
            target: Some(wire_index(target)),
            ..Self::default()
        }
    }

    /// Wire form of the register-wide QFT.
    pub fn qft() -> Self {
        Self { kind: "QFT".to_string(), ..Self::default() }
    }

    /// Resolves the tag and operands and checks them against a register of
    /// `num_qubits` qubits.
    pub fn to_gate(&self, num_qubits: usize) -> Result<Gate> {
        let operand = |value: Option<i64>, name: &str| -> Result<usize> {
            let value = value.ok_or_else(|| QuantumError::InvalidGateOperands {
                message: format!("{} gate requires a '{}' operand", self.kind, name),
            })?;
            usize::try_from(value).map_err(|_| QuantumError::InvalidQubitIndex { qubit: value, num_qubits })
        };

        let gate = match self.kind.as_str() {
            "H" => Gate::Hadamard { qubit: operand(self.qubit, "qubit")? },
            "X" => Gate::PauliX { qubit: operand(self.qubit, "qubit")? },
            "Z" => Gate::PauliZ { qubit: operand(self.qubit, "qubit")? },
            "CNOT" => Gate::Cnot {
                control: operand(self.control, "control")?,
                target: operand(self.target, "target")?,
            },
            "QFT" => Gate::Qft,
            other => return Err(QuantumError::UnknownGateType { tag: other.to_string() }),
        };
        gate.validate(num_qubits)?;
        Ok(gate)
    }
}

fn wire_index(qubit: usize) -> i64 {
    i64::try_from(qubit).unwrap_or(i64::MAX)
}

impl From<Gate> for GateSpec {
    fn from(gate: Gate) -> Self {
        match gate {
            Gate::Hadamard { qubit } | Gate::PauliX { qubit } | Gate::PauliZ { qubit } => {
                GateSpec::single(gate.tag(), qubit)
            }
            Gate::Cnot { control, target } => GateSpec::cnot(control, target),
            Gate::Qft => GateSpec::qft(),
        }
    }
}
