// src/circuits/mod.rs

//! Typed circuits: an ordered gate list over a fixed register size.
//!
//! A `Circuit` is not validated when built. Out-of-range or malformed gates are
//! rejected one by one when the circuit runs, matching how loose gate specs are
//! handled.

use crate::operations::{Gate, GateSpec};
use std::fmt;

/// Ordered sequence of gates applied to an `n`-qubit register.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// Register size the circuit runs on.
    num_qubits: usize,
    /// The order is significant; gates are applied front to back.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Creates an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self { num_qubits, gates: Vec::new() }
    }

    /// Appends a gate.
    pub fn add_gate(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    /// Appends every gate from an iterator.
    pub fn add_gates<I>(&mut self, gates: I)
    where
        I: IntoIterator<Item = Gate>,
    {
        self.gates.extend(gates);
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Loose wire form of the gate list, as accepted by `simulate_circuit`.
    pub fn to_specs(&self) -> Vec<GateSpec> {
        self.gates.iter().copied().map(GateSpec::from).collect()
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Method-chaining construction of a [`Circuit`].
///
/// ```
/// use qfuse::CircuitBuilder;
///
/// let bell = CircuitBuilder::new(2).h(0).cnot(0, 1).build();
/// assert_eq!(bell.len(), 2);
/// ```
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a builder for an `num_qubits`-qubit circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self { circuit: Circuit::new(num_qubits) }
    }

    /// Adds a single gate.
    pub fn add_op(mut self, gate: Gate) -> Self {
        self.circuit.add_gate(gate);
        self
    }

    /// Adds every gate from an iterator.
    pub fn add_ops<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.circuit.add_gates(gates);
        self
    }

    /// Hadamard on `qubit`.
    pub fn h(self, qubit: usize) -> Self {
        self.add_op(Gate::Hadamard { qubit })
    }

    /// Pauli-X on `qubit`.
    pub fn x(self, qubit: usize) -> Self {
        self.add_op(Gate::PauliX { qubit })
    }

    /// Pauli-Z on `qubit`.
    pub fn z(self, qubit: usize) -> Self {
        self.add_op(Gate::PauliZ { qubit })
    }

    /// CNOT from `control` onto `target`.
    pub fn cnot(self, control: usize, target: usize) -> Self {
        self.add_op(Gate::Cnot { control, target })
    }

    /// Register-wide cosine Fourier transform.
    pub fn qft(self) -> Self {
        self.add_op(Gate::Qft)
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gates.is_empty() || self.num_qubits == 0 {
            return writeln!(f, "qfuse::Circuit[0 gates on {} qubits]", self.num_qubits);
        }

        let num_gates = self.gates.len();
        let rows = self.num_qubits;
        let label_width = format!("q{}", rows - 1).len();
        let label_padding = " ".repeat(label_width + 2);

        const GATE_WIDTH: usize = 7; // e.g. "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time]: gate or wire segment; v_connect[row][time]: connector below `row`
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_gates]; rows];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_gates]; rows];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, gate) in self.gates.iter().enumerate() {
            match gate {
                Gate::Hadamard { qubit } | Gate::PauliX { qubit } | Gate::PauliZ { qubit } => {
                    if *qubit < rows {
                        op_grid[*qubit][t] = format_gate(gate.tag());
                    }
                }
                Gate::Cnot { control, target } => {
                    if *control < rows && *target < rows {
                        op_grid[*control][t] = format_gate("@");
                        op_grid[*target][t] = format_gate("X");
                        let r_min = (*control).min(*target);
                        let r_max = (*control).max(*target);
                        for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                            row_vec[t] = V_WIRE;
                        }
                    }
                }
                Gate::Qft => {
                    for row in op_grid.iter_mut() {
                        row[t] = format_gate("QFT");
                    }
                    for row_vec in v_connect.iter_mut().take(rows - 1) {
                        row_vec[t] = V_WIRE;
                    }
                }
            }
        }

        writeln!(f, "qfuse::Circuit[{} gates on {} qubits]", num_gates, rows)?;
        for r in 0..rows {
            let label = format!("q{}: ", r);
            write!(f, "{:<width$}", label, width = label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < rows - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_gates {
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), v_connect[r][t], " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
