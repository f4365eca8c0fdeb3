//! Numeric constants shared by the engine and the decision transform.

/// Defaults and tolerances used across the simulator.
pub mod qfuse_constants {
    /// Largest register the engine accepts unless configured otherwise.
    pub const DEFAULT_MAX_QUBITS: usize = 10;
    /// Register size used when a session touches the engine before initialising it.
    pub const DEFAULT_QUBITS: usize = 3;
    /// Allowed deviation of `Σ|a|^2` from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Basis states at or below this probability are left out of circuit reports.
    pub const REPORT_PROBABILITY_FLOOR: f64 = 0.001;
    /// Multiplicative noise applied when the decision transform measures.
    pub const DEFAULT_UNCERTAINTY_FACTOR: f64 = 0.3;
    /// Amplitude of the fixed `sin(i·π/len)` oscillation.
    pub const DEFAULT_BACKGROUND_INTERFERENCE: f64 = 0.1;
    /// Minimum weight or entropy shift that is reported as an effect.
    pub const DEFAULT_EFFECT_THRESHOLD: f64 = 0.1;
    /// Default strength of `apply_environmental_noise`.
    pub const DEFAULT_ENVIRONMENTAL_NOISE: f64 = 0.01;
}
