// src/simulation/mod.rs

//! Circuit simulation.
//!
//! [`StateVectorEngine`] owns one register. [`Simulator`] is the per-session
//! facade a transport layer talks to: it owns at most one engine (created on
//! first use), the session's random source and its configuration. Neither type
//! synchronises internally; share a session across threads behind a mutex.

mod results;
pub mod engine;

pub use engine::StateVectorEngine;
pub use results::{
    BasisProbability, CircuitOutcome, CircuitReport, EngineStatus, MeasurementOutcome, RejectedGate,
    StateSnapshot, basis_label,
};

use crate::circuits::Circuit;
use crate::config::SimulatorConfig;
use crate::core::random::{fork, seeded_rng};
use crate::core::{REPORT_PROBABILITY_FLOOR, Result};
use crate::operations::GateSpec;
use crate::reasoning::{DecisionOption, DecisionOutcome, DecisionProblem, DecisionTransform};
use rand::rngs::StdRng;

/// One simulation session.
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    engine: Option<StateVectorEngine>,
    decision: DecisionTransform,
    rng: StdRng,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::from_parts(SimulatorConfig::default())
    }
}

impl Simulator {
    /// Creates a session with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with the given settings.
    pub fn with_config(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: SimulatorConfig) -> Self {
        Self {
            rng: seeded_rng(config.seed),
            decision: DecisionTransform::new(config.decision.clone()),
            engine: None,
            config,
        }
    }

    /// Session settings.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Re-initialises the session register with `num_qubits` qubits in equal superposition.
    pub fn initialize(&mut self, num_qubits: usize) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.initialize(num_qubits),
            None => {
                let engine = StateVectorEngine::with_rng(num_qubits, &self.config, fork(&mut self.rng))?;
                self.engine = Some(engine);
                Ok(())
            }
        }
    }

    /// Runs loose gate specs on a fresh `num_qubits` register.
    ///
    /// Malformed or unknown gates are skipped and listed in the report; an
    /// invalid `num_qubits` fails the call and leaves the session untouched.
    pub fn run_circuit(&mut self, num_qubits: usize, gates: &[GateSpec]) -> Result<CircuitReport> {
        let engine = self.engine_mut()?;
        let outcome = engine.simulate_circuit(num_qubits, gates)?;
        Ok(CircuitReport::new(num_qubits, gates.to_vec(), outcome, REPORT_PROBABILITY_FLOOR))
    }

    /// Runs a typed circuit on a fresh register.
    pub fn run(&mut self, circuit: &Circuit) -> Result<CircuitReport> {
        let engine = self.engine_mut()?;
        let outcome = engine.run_circuit(circuit)?;
        let specs = circuit.to_specs();
        Ok(CircuitReport::new(circuit.num_qubits(), specs, outcome, REPORT_PROBABILITY_FLOOR))
    }

    /// Measures (and collapses) the session register.
    pub fn measure(&mut self) -> Result<MeasurementOutcome> {
        Ok(self.engine_mut()?.measure())
    }

    /// Register size, amplitudes and gate history.
    pub fn state(&mut self) -> Result<StateSnapshot> {
        Ok(self.engine_mut()?.snapshot())
    }

    /// Whether the register exists yet, and its size.
    pub fn status(&self) -> EngineStatus {
        match &self.engine {
            Some(engine) => EngineStatus {
                initialized: true,
                dimension: engine.dimension(),
                num_qubits: engine.num_qubits(),
            },
            None => EngineStatus { initialized: false, dimension: 0, num_qubits: 0 },
        }
    }

    /// Perturbs the register with the configured environmental noise strength.
    /// Meant to be driven by whatever scheduler the integrator chooses.
    pub fn apply_environmental_noise(&mut self) -> Result<()> {
        let strength = self.config.environmental_noise;
        self.engine_mut()?.apply_environmental_noise(strength)
    }

    /// Re-weights `options` with the quantum-weighted decision transform.
    pub fn apply_weighted_decision(
        &mut self,
        problem: &DecisionProblem,
        options: &[DecisionOption],
        weights: Option<&[f64]>,
    ) -> Result<DecisionOutcome> {
        self.decision.apply(problem, options, weights, &mut self.rng)
    }

    /// Direct access to the session engine, creating it if needed.
    pub fn engine_mut(&mut self) -> Result<&mut StateVectorEngine> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => StateVectorEngine::with_rng(self.config.default_qubits, &self.config, fork(&mut self.rng))?,
        };
        Ok(self.engine.insert(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QuantumError;
    use crate::operations::Gate;

    fn session() -> Simulator {
        Simulator::from_parts(SimulatorConfig::seeded(21))
    }

    #[test]
    fn engine_is_created_lazily() -> Result<()> {
        let mut sim = session();
        assert_eq!(sim.status(), EngineStatus { initialized: false, dimension: 0, num_qubits: 0 });

        let snapshot = sim.state()?;
        assert_eq!(snapshot.num_qubits, 3);
        assert_eq!(snapshot.amplitudes.len(), 8);
        assert!(snapshot.gate_history.is_empty());
        assert_eq!(sim.status(), EngineStatus { initialized: true, dimension: 8, num_qubits: 3 });
        Ok(())
    }

    #[test]
    fn run_circuit_reports_sorted_states() -> Result<()> {
        let mut sim = session();
        let report = sim.run_circuit(2, &[GateSpec::single("X", 1), GateSpec::single("H", 0)])?;

        assert_eq!(report.num_qubits, 2);
        assert_eq!(report.circuit, vec![GateSpec::single("X", 1), GateSpec::single("H", 0)]);
        assert_eq!(report.states.len(), 2);
        assert_eq!(report.states[0].state, "10");
        assert_eq!(report.states[1].state, "11");
        assert_eq!(report.most_likely.as_ref().map(|s| s.state.as_str()), Some("10"));
        assert!(report.rejected.is_empty());

        let history = sim.state()?.gate_history;
        assert_eq!(history, vec![Gate::PauliX { qubit: 1 }, Gate::Hadamard { qubit: 0 }]);
        Ok(())
    }

    #[test]
    fn run_circuit_skips_bad_gates() -> Result<()> {
        let mut sim = session();
        let gates = vec![
            GateSpec::single("H", 0),
            GateSpec::single("Y", 0),
            GateSpec::single("H", 4),
            GateSpec::cnot(1, 1),
            GateSpec::single("X", 1),
        ];
        let report = sim.run_circuit(2, &gates)?;

        let positions: Vec<usize> = report.rejected.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(report.rejected[0].error, QuantumError::UnknownGateType { tag: "Y".to_string() });
        assert_eq!(report.rejected[1].error, QuantumError::InvalidQubitIndex { qubit: 4, num_qubits: 2 });
        assert_eq!(sim.state()?.gate_history.len(), 2);
        Ok(())
    }

    #[test]
    fn invalid_register_size_fails_whole_run() -> Result<()> {
        let mut sim = session();
        sim.initialize(2)?;
        let result = sim.run_circuit(0, &[GateSpec::single("H", 0)]);
        assert_eq!(result, Err(QuantumError::InvalidQubitCount { requested: 0, max: 10 }));
        assert_eq!(sim.status().num_qubits, 2);
        Ok(())
    }

    #[test]
    fn environmental_noise_uses_configured_strength() -> Result<()> {
        let mut sim = session();
        sim.initialize(2)?;
        let before = sim.state()?.amplitudes;
        sim.apply_environmental_noise()?;
        let after = sim.state()?.amplitudes;
        assert_ne!(before, after);
        sim.engine_mut()?.validate_state()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimulatorConfig { max_qubits: 0, ..SimulatorConfig::default() };
        assert!(matches!(Simulator::with_config(config), Err(QuantumError::InvalidConfiguration { .. })));
    }
}
