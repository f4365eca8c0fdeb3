// src/simulation/engine.rs
use crate::circuits::Circuit;
use crate::config::{CircuitStart, SimulatorConfig};
use crate::core::random::{self, seeded_rng};
use crate::core::{AmplitudeVector, QuantumError, Result};
use crate::operations::{Gate, GateSpec};
use crate::simulation::results::{
    CircuitOutcome, MeasurementOutcome, RejectedGate, StateSnapshot, basis_label,
};
use crate::validation::check_normalization;
use num_complex::Complex;
use rand::rngs::StdRng;
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use tracing::{debug, info, warn};

/// State-vector engine for one `n`-qubit register.
///
/// Owns the amplitude vector, the log of gates applied since the last
/// (re)initialisation, and the random source used for measurement and
/// environmental noise. Nothing is shared between instances: a session that
/// needs a register constructs its own engine.
///
/// Qubit `k` is bit `k` of the basis index, so qubit 0 is the least-significant
/// bit and the rightmost character of a measured binary string.
#[derive(Debug)]
pub struct StateVectorEngine {
    num_qubits: usize,
    state: AmplitudeVector,
    gate_history: Vec<Gate>,
    max_qubits: usize,
    norm_tolerance: f64,
    validate_each_gate: bool,
    circuit_start: CircuitStart,
    rng: StdRng,
}

impl StateVectorEngine {
    /// Creates an engine over `num_qubits` qubits in equal superposition
    /// (see [`initialize`](Self::initialize)). Randomness follows `config.seed`.
    pub fn init(num_qubits: usize, config: &SimulatorConfig) -> Result<Self> {
        Self::with_rng(num_qubits, config, seeded_rng(config.seed))
    }

    /// Same as [`init`](Self::init) with an explicit random source.
    pub fn with_rng(num_qubits: usize, config: &SimulatorConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let mut engine = Self {
            num_qubits: 0,
            state: AmplitudeVector::new(Vec::new()),
            gate_history: Vec::new(),
            max_qubits: config.max_qubits,
            norm_tolerance: config.norm_tolerance,
            validate_each_gate: config.validate_each_gate,
            circuit_start: config.circuit_start,
            rng,
        };
        engine.initialize(num_qubits)?;
        Ok(engine)
    }

    /// Replaces the register with `num_qubits` qubits in equal superposition:
    /// `|0…0⟩` followed by a Hadamard on every qubit. Clears the gate history,
    /// so the seeding Hadamards are not recorded.
    ///
    /// On error the previous register is left untouched.
    pub fn initialize(&mut self, num_qubits: usize) -> Result<()> {
        let dim = self.dimension_for(num_qubits)?;
        let mut amplitudes = AmplitudeVector::basis(dim, 0).vector().to_vec();
        for qubit in 0..num_qubits {
            amplitudes = hadamard(&amplitudes, qubit);
        }
        self.replace_register(num_qubits, AmplitudeVector::new(amplitudes));
        info!(num_qubits, dimension = dim, "register initialised in equal superposition");
        Ok(())
    }

    /// Replaces the register with the one-hot basis state `index` (no Hadamards).
    /// Clears the gate history.
    pub fn prepare_basis_state(&mut self, num_qubits: usize, index: usize) -> Result<()> {
        let dim = self.dimension_for(num_qubits)?;
        if index >= dim {
            return Err(QuantumError::InvalidGateOperands {
                message: format!("basis index {} is outside a {}-dimensional register", index, dim),
            });
        }
        self.replace_register(num_qubits, AmplitudeVector::basis(dim, index));
        info!(num_qubits, basis = %basis_label(index, num_qubits), "register prepared in basis state");
        Ok(())
    }

    /// Hadamard on `qubit`.
    pub fn apply_hadamard(&mut self, qubit: usize) -> Result<()> {
        self.apply_gate(Gate::Hadamard { qubit })
    }

    /// Pauli-X (bit flip) on `qubit`.
    pub fn apply_pauli_x(&mut self, qubit: usize) -> Result<()> {
        self.apply_gate(Gate::PauliX { qubit })
    }

    /// Pauli-Z (sign flip of the set-bit half) on `qubit`.
    pub fn apply_pauli_z(&mut self, qubit: usize) -> Result<()> {
        self.apply_gate(Gate::PauliZ { qubit })
    }

    /// CNOT from `control` onto `target`.
    pub fn apply_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply_gate(Gate::Cnot { control, target })
    }

    /// Cosine-only Fourier transform over the whole register.
    pub fn apply_qft(&mut self) -> Result<()> {
        self.apply_gate(Gate::Qft)
    }

    /// Applies `gate` and appends it to the history.
    ///
    /// The new amplitudes are computed from a snapshot of the current ones and
    /// only committed once the gate has fully succeeded, so a rejected gate
    /// leaves both the register and the history untouched.
    pub fn apply_gate(&mut self, gate: Gate) -> Result<()> {
        gate.validate(self.num_qubits)?;

        let input = self.state.vector();
        let next = match gate {
            Gate::Hadamard { qubit } => AmplitudeVector::new(hadamard(input, qubit)),
            Gate::PauliX { qubit } => AmplitudeVector::new(pauli_x(input, qubit)),
            Gate::PauliZ { qubit } => AmplitudeVector::new(pauli_z(input, qubit)),
            Gate::Cnot { control, target } => AmplitudeVector::new(cnot(input, control, target)),
            Gate::Qft => {
                let mut transformed = AmplitudeVector::new(cosine_fourier(input));
                // Dropping the sine terms loses norm; restore it
                if !transformed.normalize() {
                    return Err(QuantumError::Incoherence {
                        message: "QFT annihilated the state vector; gate rejected".to_string(),
                    });
                }
                transformed
            }
        };

        if self.validate_each_gate {
            check_normalization(&next, Some(self.norm_tolerance))?;
        }

        self.state = next;
        self.gate_history.push(gate);
        debug!(gate = %gate, "applied gate");
        Ok(())
    }

    /// Samples a basis state from the squared amplitudes and collapses onto it.
    ///
    /// Walks the cumulative distribution to the first index whose running total
    /// exceeds a uniform draw in `[0, 1)`. If rounding leaves the total short of
    /// the draw, the last index is used.
    pub fn measure(&mut self) -> MeasurementOutcome {
        let probabilities = self.state.probabilities();
        let draw = random::unit_interval(&mut self.rng);

        let mut chosen = probabilities.len().saturating_sub(1);
        let mut cumulative = 0.0;
        for (index, p) in probabilities.iter().enumerate() {
            cumulative += p;
            if cumulative > draw {
                chosen = index;
                break;
            }
        }

        self.state = AmplitudeVector::basis(self.state.dim(), chosen);
        let binary_string = basis_label(chosen, self.num_qubits);
        debug!(outcome = chosen, state = %binary_string, draw, "measured register");

        MeasurementOutcome { outcome_index: chosen, binary_string, probabilities }
    }

    /// Starts a fresh `num_qubits` register and applies `gates` in order.
    ///
    /// The starting register follows the configured [`CircuitStart`]. Gates
    /// that fail to resolve or apply are skipped with a warning and listed in
    /// the outcome; the rest of the circuit still runs. Only an invalid
    /// `num_qubits` fails the whole call.
    pub fn simulate_circuit(&mut self, num_qubits: usize, gates: &[GateSpec]) -> Result<CircuitOutcome> {
        self.prepare_circuit_start(num_qubits)?;

        let mut rejected = Vec::new();
        for (position, spec) in gates.iter().enumerate() {
            if let Err(error) = spec.to_gate(self.num_qubits).and_then(|gate| self.apply_gate(gate)) {
                warn!(position, gate = %spec.kind, %error, "skipping gate");
                rejected.push(RejectedGate::new(position, spec.clone(), error));
            }
        }

        Ok(CircuitOutcome { amplitudes: self.state.vector().to_vec(), rejected })
    }

    /// Typed counterpart of [`simulate_circuit`](Self::simulate_circuit).
    pub fn run_circuit(&mut self, circuit: &Circuit) -> Result<CircuitOutcome> {
        self.prepare_circuit_start(circuit.num_qubits())?;

        let mut rejected = Vec::new();
        for (position, gate) in circuit.gates().iter().enumerate() {
            if let Err(error) = self.apply_gate(*gate) {
                warn!(position, gate = %gate, %error, "skipping gate");
                rejected.push(RejectedGate::new(position, GateSpec::from(*gate), error));
            }
        }

        Ok(CircuitOutcome { amplitudes: self.state.vector().to_vec(), rejected })
    }

    /// Perturbs every amplitude by a uniform draw in `[-strength, strength)` and
    /// renormalises. Not a gate: the history is unchanged.
    pub fn apply_environmental_noise(&mut self, strength: f64) -> Result<()> {
        if !strength.is_finite() || strength < 0.0 {
            return Err(QuantumError::InvalidConfiguration {
                message: format!("environmental noise strength must be finite and non-negative, got {}", strength),
            });
        }

        let mut perturbed = self.state.clone();
        for amplitude in perturbed.vector_mut() {
            *amplitude += random::symmetric(&mut self.rng, strength);
        }
        if !perturbed.normalize() {
            return Err(QuantumError::Incoherence {
                message: "environmental noise annihilated the state vector".to_string(),
            });
        }

        self.state = perturbed;
        debug!(strength, "applied environmental noise");
        Ok(())
    }

    /// Checks the register's normalisation against the configured tolerance.
    pub fn validate_state(&self) -> Result<()> {
        check_normalization(&self.state, Some(self.norm_tolerance))
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// `2^num_qubits`
    pub fn dimension(&self) -> usize {
        self.state.dim()
    }

    /// The register.
    pub fn state(&self) -> &AmplitudeVector {
        &self.state
    }

    /// Current amplitudes.
    pub fn amplitudes(&self) -> &[f64] {
        self.state.vector()
    }

    /// Squared amplitudes.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Gates applied since the last (re)initialisation, oldest first.
    pub fn gate_history(&self) -> &[Gate] {
        &self.gate_history
    }

    /// Register size, amplitudes and history in one value.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            num_qubits: self.num_qubits,
            amplitudes: self.state.vector().to_vec(),
            gate_history: self.gate_history.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, amplitudes: Vec<f64>) -> Result<()> {
        if amplitudes.len() != self.state.dim() {
            return Err(QuantumError::InvalidGateOperands {
                message: format!(
                    "Cannot set state: provided dimension {} does not match engine dimension {}",
                    amplitudes.len(),
                    self.state.dim()
                ),
            });
        }
        self.state = AmplitudeVector::new(amplitudes);
        Ok(())
    }

    fn prepare_circuit_start(&mut self, num_qubits: usize) -> Result<()> {
        match self.circuit_start {
            CircuitStart::Ground => self.prepare_basis_state(num_qubits, 0),
            CircuitStart::Superposition => self.initialize(num_qubits),
        }
    }

    fn dimension_for(&self, num_qubits: usize) -> Result<usize> {
        if num_qubits == 0 || num_qubits > self.max_qubits {
            return Err(QuantumError::InvalidQubitCount { requested: num_qubits, max: self.max_qubits });
        }
        Ok(1usize << num_qubits)
    }

    fn replace_register(&mut self, num_qubits: usize, state: AmplitudeVector) {
        self.num_qubits = num_qubits;
        self.state = state;
        self.gate_history.clear();
    }
}

// --- Gate kernels ---
// Each returns a fresh vector computed entirely from `input`.

fn hadamard(input: &[f64], qubit: usize) -> Vec<f64> {
    let mask = 1usize << qubit;
    (0..input.len())
        .map(|i| {
            let partner = input[i ^ mask];
            if i & mask == 0 {
                (input[i] + partner) * FRAC_1_SQRT_2
            } else {
                (partner - input[i]) * FRAC_1_SQRT_2
            }
        })
        .collect()
}

fn pauli_x(input: &[f64], qubit: usize) -> Vec<f64> {
    let mask = 1usize << qubit;
    (0..input.len()).map(|i| input[i ^ mask]).collect()
}

fn pauli_z(input: &[f64], qubit: usize) -> Vec<f64> {
    let mask = 1usize << qubit;
    input
        .iter()
        .enumerate()
        .map(|(i, a)| if i & mask != 0 { -a } else { *a })
        .collect()
}

fn cnot(input: &[f64], control: usize, target: usize) -> Vec<f64> {
    let control_mask = 1usize << control;
    let target_mask = 1usize << target;
    (0..input.len())
        .map(|i| if i & control_mask != 0 { input[i ^ target_mask] } else { input[i] })
        .collect()
}

/// Unitary DFT `output[k] = (1/√N) Σ_j input[j]·e^{2πi·jk/N}` over complex twiddle
/// factors, projected onto the real axis. The real register can only hold
/// `Re(output[k])`, so the result is generally not unit-norm.
fn cosine_fourier(input: &[f64]) -> Vec<f64> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64).sqrt();
    (0..n)
        .map(|k| {
            let output: Complex<f64> = input
                .iter()
                .enumerate()
                .map(|(j, a)| {
                    let angle = 2.0 * PI * ((j * k) % n) as f64 / n as f64;
                    Complex::from_polar(scale, angle) * *a
                })
                .sum();
            output.re
        })
        .collect()
}
