//! Re-weights three deployment options with the quantum-weighted decision transform.

use qfuse::{
    Constraint, DecisionOption, DecisionProblem, QuantumError, Relation, Simulator, SimulatorConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), QuantumError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qfuse=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = vec![
        DecisionOption::new("on-prem", "Keep running on our own racks"),
        DecisionOption::new("cloud", "Move everything to a managed cloud"),
        DecisionOption::new("hybrid", "Split workloads between both"),
    ];

    let problem = DecisionProblem {
        description: "Where should the next release run?".to_string(),
        constraints: vec![Constraint {
            description: "Capex freeze".to_string(),
            phase_shift: Some(1.2),
            affected_options: vec![0],
        }],
        relations: vec![Relation {
            concept: "shared tooling".to_string(),
            options: vec![1, 2],
            strength: 0.5,
        }],
    };

    let mut simulator = Simulator::with_config(SimulatorConfig::seeded(2718))?;
    println!("--- qfuse Example: {} ---", problem.description);

    for round in 1..=3 {
        let outcome = simulator.apply_weighted_decision(&problem, &options, Some(&[5.0, 3.0, 2.0]))?;
        println!("\nRound {}:\n{}", round, outcome);
    }

    // Without priors every option starts equal
    let outcome = simulator.apply_weighted_decision(&problem, &options, None)?;
    println!("\nUniform priors:\n{}", outcome);
    Ok(())
}
