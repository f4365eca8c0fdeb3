// src/lib.rs

//! `qfuse` - A small state-vector quantum circuit simulator with a
//! quantum-weighted decision transform on top.
//!
//! The register holds real amplitudes (phases are approximated by their cosine),
//! supports `H`, `X`, `Z`, `CNOT` and a cosine-only `QFT`, and samples
//! measurements from the squared amplitudes. The same primitives drive a
//! heuristic that re-weights a handful of discrete options.

pub mod core;
pub mod config;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod reasoning;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use core::{AmplitudeVector, QuantumError, Result};
pub use config::{CircuitStart, DecisionConfig, SimulatorConfig};
pub use operations::{Gate, GateSpec};
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{
    CircuitReport, EngineStatus, MeasurementOutcome, Simulator, StateSnapshot, StateVectorEngine,
};
pub use reasoning::{
    Constraint, DecisionOption, DecisionOutcome, DecisionProblem, DecisionTransform, Effect, EffectKind,
    Relation,
};
pub use validation::{check_normalization, check_probability_distribution, normalized_entropy};

// Example 1: Bell pair
// A Hadamard followed by CNOT correlates two qubits: only |00> and |11>
// survive, each with probability 1/2.
/// ```
/// use qfuse::{CircuitBuilder, QuantumError, Simulator, SimulatorConfig};
///
/// let circuit = CircuitBuilder::new(2).h(0).cnot(0, 1).build();
///
/// let mut simulator = Simulator::with_config(SimulatorConfig::seeded(7))?;
/// let report = simulator.run(&circuit)?;
/// println!("Circuit:\n{}", circuit);
/// println!("Result:\n{}", report);
///
/// let states: Vec<&str> = report.states.iter().map(|s| s.state.as_str()).collect();
/// assert_eq!(states, vec!["00", "11"]);
/// assert!((report.probabilities[0] - 0.5).abs() < 1e-9);
/// assert!((report.probabilities[3] - 0.5).abs() < 1e-9);
///
/// // Measuring the session register always yields matching bits.
/// let outcome = simulator.measure()?;
/// assert_eq!(outcome.qubit_value(0), outcome.qubit_value(1));
/// # Ok::<(), QuantumError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Controlled flip from a basis state
// Flipping the control first makes the CNOT fire deterministically.
/// ```
/// use qfuse::{Gate, QuantumError, SimulatorConfig, StateVectorEngine};
///
/// let mut engine = StateVectorEngine::init(2, &SimulatorConfig::seeded(3))?;
/// engine.prepare_basis_state(2, 0)?;
/// engine.apply_gate(Gate::PauliX { qubit: 0 })?;
/// engine.apply_gate(Gate::Cnot { control: 0, target: 1 })?;
///
/// assert_eq!(engine.amplitudes(), &[0.0, 0.0, 0.0, 1.0]);
/// let outcome = engine.measure();
/// assert_eq!(outcome.binary_string, "11");
///
/// // A gate aimed outside the register is rejected and changes nothing.
/// assert!(engine.apply_gate(Gate::Hadamard { qubit: 5 }).is_err());
/// assert_eq!(engine.gate_history().len(), 2);
/// # Ok::<(), QuantumError>(())
/// ```
#[doc(hidden)]
const _: () = ();

// Example 3: Quantum-weighted decision
/// ```
/// use qfuse::{DecisionOption, DecisionProblem, QuantumError, Simulator, SimulatorConfig};
///
/// let options = vec![
///     DecisionOption::new("rest", "Take the afternoon off"),
///     DecisionOption::new("ship", "Ship the release"),
/// ];
/// let mut simulator = Simulator::with_config(SimulatorConfig::seeded(11))?;
/// let decision = simulator.apply_weighted_decision(&DecisionProblem::default(), &options, Some(&[1.0, 3.0]))?;
/// println!("{}", decision);
///
/// let total: f64 = decision.enhanced_weights.iter().sum();
/// assert!((total - 1.0).abs() < 1e-9);
/// assert!((0.0..=1.0).contains(&decision.uncertainty));
/// # Ok::<(), QuantumError>(())
/// ```
#[doc(hidden)]
const _: () = ();
