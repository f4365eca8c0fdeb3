// tests/simulation_tests.rs

use qfuse::{
    CircuitBuilder, CircuitStart, Gate, GateSpec, QuantumError, Simulator, SimulatorConfig, StateVectorEngine,
};

const TOLERANCE: f64 = 1e-9;

fn seeded_simulator(seed: u64) -> Result<Simulator, QuantumError> {
    Simulator::with_config(SimulatorConfig::seeded(seed))
}

fn assert_amplitudes(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "dimension mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < TOLERANCE, "amplitude {} mismatch: got {}, expected {}", i, a, e);
    }
}

fn assert_normalized(amplitudes: &[f64]) {
    let norm: f64 = amplitudes.iter().map(|a| a * a).sum();
    assert!((norm - 1.0).abs() < TOLERANCE, "state not normalised: {}", norm);
}

#[test]
fn test_fresh_register_is_equal_superposition() -> Result<(), QuantumError> {
    let engine = StateVectorEngine::init(3, &SimulatorConfig::seeded(1))?;
    assert_amplitudes(engine.amplitudes(), &[1.0 / 8f64.sqrt(); 8]);
    assert!(engine.gate_history().is_empty(), "seeding Hadamards are not history");
    Ok(())
}

#[test]
fn test_bell_pair_with_spectator_qubit() -> Result<(), QuantumError> {
    let gates = vec![GateSpec::single("H", 0), GateSpec::cnot(0, 1), GateSpec::single("H", 2)];
    let mut simulator = seeded_simulator(2024)?;

    let trials = 2000;
    let mut spectator_ones = 0;
    for _ in 0..trials {
        let report = simulator.run_circuit(3, &gates)?;
        assert!(report.rejected.is_empty());

        let outcome = simulator.measure()?;
        assert_eq!(
            outcome.qubit_value(0),
            outcome.qubit_value(1),
            "correlated qubits disagree in {}",
            outcome.binary_string
        );
        spectator_ones += outcome.qubit_value(2) as usize;
    }

    let ratio = spectator_ones as f64 / trials as f64;
    assert!((0.4..=0.6).contains(&ratio), "spectator qubit ratio {} is not near 1/2", ratio);
    Ok(())
}

#[test]
fn test_bell_report_lists_only_correlated_states() -> Result<(), QuantumError> {
    let mut simulator = seeded_simulator(5)?;
    let circuit = CircuitBuilder::new(3).h(0).cnot(0, 1).h(2).build();
    let report = simulator.run(&circuit)?;

    let mut states: Vec<&str> = report.states.iter().map(|s| s.state.as_str()).collect();
    states.sort_unstable();
    assert_eq!(states, vec!["000", "011", "100", "111"]);
    for state in &report.states {
        assert!((state.probability - 0.25).abs() < TOLERANCE);
    }
    assert_normalized(&report.final_amplitudes);
    Ok(())
}

#[test]
fn test_out_of_range_gate_leaves_state_unchanged() -> Result<(), QuantumError> {
    let mut engine = StateVectorEngine::init(3, &SimulatorConfig::seeded(9))?;
    engine.apply_gate(Gate::PauliX { qubit: 1 })?;
    let before = engine.snapshot();

    let result = engine.apply_gate(Gate::Hadamard { qubit: 5 });
    assert_eq!(result, Err(QuantumError::InvalidQubitIndex { qubit: 5, num_qubits: 3 }));
    assert_eq!(engine.snapshot(), before);
    Ok(())
}

#[test]
fn test_unknown_gates_are_skipped() -> Result<(), QuantumError> {
    let mut simulator = seeded_simulator(3)?;
    let gates = vec![GateSpec::single("X", 0), GateSpec::single("T", 0), GateSpec::cnot(0, 1)];
    let report = simulator.run_circuit(2, &gates)?;

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].position, 1);
    assert_eq!(report.rejected[0].gate.kind, "T");
    assert_amplitudes(&report.final_amplitudes, &[0.0, 0.0, 0.0, 1.0]);
    assert_eq!(report.most_likely.as_ref().map(|s| s.state.as_str()), Some("11"));
    Ok(())
}

#[test]
fn test_report_states_are_sorted_and_floored() -> Result<(), QuantumError> {
    let mut simulator = seeded_simulator(4)?;
    // Cosine QFT on |01> leaves an uneven, partly cancelled distribution
    let report = simulator.run_circuit(2, &[GateSpec::single("X", 0), GateSpec::qft()])?;

    for pair in report.states.windows(2) {
        assert!(pair[0].probability >= pair[1].probability, "states not sorted descending");
    }
    assert!(report.states.iter().all(|s| s.probability > 0.001));
    assert_eq!(report.most_likely, report.states.first().cloned());
    assert_normalized(&report.final_amplitudes);
    Ok(())
}

#[test]
fn test_gate_list_from_json() -> Result<(), QuantumError> {
    let json = r#"[
        {"type": "H", "qubit": 0},
        {"type": "CNOT", "control": 0, "target": 1},
        {"type": "Y", "qubit": 0},
        {"type": "CNOT", "control": 1},
        {"type": "X", "qubit": -1},
        {"qubit": 1}
    ]"#;
    let gates: Vec<GateSpec> = serde_json::from_str(json).map_err(|e| QuantumError::InvalidConfiguration {
        message: e.to_string(),
    })?;

    let mut simulator = seeded_simulator(8)?;
    let report = simulator.run_circuit(2, &gates)?;

    let reasons: Vec<&QuantumError> = report.rejected.iter().map(|r| &r.error).collect();
    assert_eq!(reasons.len(), 4);
    assert_eq!(reasons[0], &QuantumError::UnknownGateType { tag: "Y".to_string() });
    assert!(matches!(reasons[1], QuantumError::InvalidGateOperands { .. }));
    assert_eq!(reasons[2], &QuantumError::InvalidQubitIndex { qubit: -1, num_qubits: 2 });
    assert_eq!(reasons[3], &QuantumError::UnknownGateType { tag: String::new() });

    let positions: Vec<usize> = report.rejected.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![2, 3, 4, 5]);
    assert_eq!(report.circuit, gates);

    let h = std::f64::consts::FRAC_1_SQRT_2;
    assert_amplitudes(&report.final_amplitudes, &[h, 0.0, 0.0, h]);

    let history = simulator.state()?.gate_history;
    assert_eq!(history, vec![Gate::Hadamard { qubit: 0 }, Gate::Cnot { control: 0, target: 1 }]);
    Ok(())
}

#[test]
fn test_qft_from_superposition_start() -> Result<(), QuantumError> {
    let config = SimulatorConfig { circuit_start: CircuitStart::Superposition, ..SimulatorConfig::seeded(6) };
    let mut simulator = Simulator::with_config(config)?;
    let report = simulator.run_circuit(3, &[GateSpec::qft()])?;

    let mut expected = [0.0; 8];
    expected[0] = 1.0;
    assert_amplitudes(&report.final_amplitudes, &expected);
    assert_eq!(simulator.measure()?.binary_string, "000");
    Ok(())
}

#[test]
fn test_every_gate_keeps_state_normalised() -> Result<(), QuantumError> {
    let config = SimulatorConfig { validate_each_gate: true, ..SimulatorConfig::seeded(10) };
    let mut engine = StateVectorEngine::init(3, &config)?;
    let gates = [
        Gate::Hadamard { qubit: 2 },
        Gate::PauliZ { qubit: 0 },
        Gate::Cnot { control: 2, target: 0 },
        Gate::PauliX { qubit: 1 },
        Gate::Hadamard { qubit: 1 },
    ];
    for gate in gates {
        engine.apply_gate(gate)?;
        assert_normalized(engine.amplitudes());
    }
    assert_eq!(engine.gate_history(), &gates);
    Ok(())
}

#[test]
fn test_seeded_sessions_measure_identically() -> Result<(), QuantumError> {
    let gates = vec![GateSpec::single("H", 0), GateSpec::single("H", 1), GateSpec::single("H", 2)];
    let mut first = seeded_simulator(77)?;
    let mut second = seeded_simulator(77)?;

    for _ in 0..20 {
        first.run_circuit(3, &gates)?;
        second.run_circuit(3, &gates)?;
        assert_eq!(first.measure()?.outcome_index, second.measure()?.outcome_index);
    }
    Ok(())
}

#[test]
fn test_config_from_json() -> Result<(), QuantumError> {
    let config = SimulatorConfig::from_json(r#"{"max_qubits": 4, "default_qubits": 2, "seed": 1}"#)?;
    let mut simulator = Simulator::with_config(config)?;

    assert_eq!(simulator.state()?.num_qubits, 2);
    assert_eq!(
        simulator.run_circuit(5, &[]),
        Err(QuantumError::InvalidQubitCount { requested: 5, max: 4 })
    );
    Ok(())
}
