// src/reasoning/mod.rs

//! Quantum-weighted decision transform.
//!
//! Re-weights a small set of discrete options by running their prior weights
//! through the same real-valued primitives the state-vector engine uses:
//! a Hadamard-style mixing, cosine interference from constraints, pairwise
//! "entanglement" averaging from relations, and a noisy measurement. The
//! "entanglement" here is a heuristic averaging of amplitudes, not a physical
//! correlation.

mod transform;

pub use transform::{DecisionTransform, apply_weighted_decision};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate the transform can select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    /// Identifier returned as `best_option_id`.
    pub id: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

impl DecisionOption {
    /// Creates an option.
    pub fn new(id: &str, description: &str) -> Self {
        Self { id: id.to_string(), description: description.to_string() }
    }
}

/// A constraint on the problem. Only constraints carrying a phase shift and at
/// least one affected option influence the weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Phase in radians; affected amplitudes are multiplied by `cos(phase_shift)`.
    #[serde(default)]
    pub phase_shift: Option<f64>,
    /// Indices into the option list.
    #[serde(default)]
    pub affected_options: Vec<usize>,
}

/// A related-concept link tying two or more options together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Name of the linking concept.
    #[serde(default)]
    pub concept: String,
    /// Indices into the option list.
    pub options: Vec<usize>,
    /// Pull toward the pairwise mean, in `[0, 1]`.
    pub strength: f64,
}

/// The problem descriptor handed to the transform alongside the options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionProblem {
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Constraints, applied as interference.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Relations, applied as entanglement.
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Kind of re-weighting effect reported in the explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// The selected option differs from the prior arg-max.
    SuperpositionAdvantage,
    /// An option gained more than the effect threshold.
    ConstructiveInterference,
    /// An option lost more than the effect threshold.
    DestructiveInterference,
    /// Normalised entropy dropped by more than the effect threshold.
    UncertaintyReduced,
    /// Normalised entropy rose by more than the effect threshold.
    UncertaintyIncreased,
}

/// One entry of the explanation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    /// What happened.
    pub kind: EffectKind,
    /// Human-readable sentence.
    pub description: String,
    /// Option concerned, when the effect is about a single option.
    pub option_id: Option<String>,
    /// Signed size of the shift (weight or entropy).
    pub magnitude: f64,
}

/// Result of [`DecisionTransform::apply`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    /// Identifier of the option with the largest enhanced weight.
    pub best_option_id: String,
    /// Position of that option.
    pub best_option_index: usize,
    /// `1 - uncertainty`.
    pub confidence: f64,
    /// Normalised Shannon entropy of `enhanced_weights`.
    pub uncertainty: f64,
    /// Prior weights after normalisation.
    pub original_weights: Vec<f64>,
    /// Re-weighted distribution; sums to 1.
    pub enhanced_weights: Vec<f64>,
    /// Explanation of the re-weighting.
    pub effects: Vec<Effect>,
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Decision: {} (confidence {:.3}, uncertainty {:.3})",
            self.best_option_id, self.confidence, self.uncertainty
        )?;
        for (i, (before, after)) in self.original_weights.iter().zip(&self.enhanced_weights).enumerate() {
            writeln!(f, "  [{}] {:.4} -> {:.4}", i, before, after)?;
        }
        for effect in &self.effects {
            writeln!(f, "  * {}", effect.description)?;
        }
        Ok(())
    }
}
