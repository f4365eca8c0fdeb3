//! Builds a Bell pair plus an independent spectator qubit and samples it.
//!
//! Run with `RUST_LOG=qfuse=debug` to see every gate and measurement.

use qfuse::{CircuitBuilder, GateSpec, QuantumError, Simulator, SimulatorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), QuantumError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qfuse=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("--- qfuse Example: Bell pair with a spectator qubit ---");

    let circuit = CircuitBuilder::new(3).h(0).cnot(0, 1).h(2).build();
    println!("\nCircuit Definition:\n{}", circuit);

    let mut simulator = Simulator::with_config(SimulatorConfig::seeded(42))?;
    let report = simulator.run(&circuit)?;
    println!("{}", report);

    // Same circuit through the loose wire format, with one gate the engine does not know
    let mut gates = circuit.to_specs();
    gates.push(GateSpec::single("T", 0));

    let trials = 1000;
    let mut histogram = [0usize; 8];
    let mut disagreements = 0;
    for _ in 0..trials {
        simulator.run_circuit(3, &gates)?;
        let outcome = simulator.measure()?;
        if outcome.qubit_value(0) != outcome.qubit_value(1) {
            disagreements += 1;
        }
        histogram[outcome.outcome_index] += 1;
    }

    println!("Measured {} runs:", trials);
    for (index, count) in histogram.iter().enumerate() {
        if *count > 0 {
            println!("  |{}⟩: {}", qfuse::simulation::basis_label(index, 3), count);
        }
    }
    println!("q0/q1 disagreements: {}", disagreements);

    let snapshot = simulator.state()?;
    println!("\nHistory of the last run: {:?}", snapshot.gate_history);
    Ok(())
}
