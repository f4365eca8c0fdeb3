// src/reasoning/transform.rs

use super::{
    Constraint, DecisionOption, DecisionOutcome, DecisionProblem, Effect, EffectKind, Relation,
};
use crate::config::DecisionConfig;
use crate::core::random;
use crate::core::{AmplitudeVector, QuantumError, Result};
use crate::validation::normalized_entropy;
use rand::rngs::StdRng;
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Option re-weighting built on the engine's real-valued primitives.
///
/// The only stochastic step is the measurement noise, drawn from the `StdRng`
/// passed to [`apply`](Self::apply).
#[derive(Debug, Clone, Default)]
pub struct DecisionTransform {
    config: DecisionConfig,
}

impl DecisionTransform {
    /// Creates a transform with the given tunables.
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    /// The tunables in use.
    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Runs the full transform.
    ///
    /// # Errors
    /// `DegenerateWeightVector` for an empty option list or unusable weights,
    /// before any computation. `Incoherence` if constraints or relations cancel
    /// every amplitude.
    pub fn apply(
        &self,
        problem: &DecisionProblem,
        options: &[DecisionOption],
        weights: Option<&[f64]>,
        rng: &mut StdRng,
    ) -> Result<DecisionOutcome> {
        let original = normalize_weights(options.len(), weights)?;

        let mut state = encode_amplitudes(&original);
        state = hadamard_mix(&state)?;
        state = self.interfere(&state, &problem.constraints)?;
        state = entangle(&state, &problem.relations)?;
        let enhanced = self.noisy_measure(&state, rng);

        let best_option_index = arg_max(&enhanced);
        let uncertainty = normalized_entropy(&enhanced);
        let effects = self.explain(options, &original, &enhanced);

        debug!(
            best = %options[best_option_index].id,
            uncertainty,
            effects = effects.len(),
            "decision transform complete"
        );

        Ok(DecisionOutcome {
            best_option_id: options[best_option_index].id.clone(),
            best_option_index,
            confidence: 1.0 - uncertainty,
            uncertainty,
            original_weights: original,
            enhanced_weights: enhanced,
            effects,
        })
    }

    /// Cosine damping from constraints plus the fixed background oscillation
    /// `background_interference · sin(i·π/len)`, then renormalisation.
    fn interfere(&self, state: &AmplitudeVector, constraints: &[Constraint]) -> Result<AmplitudeVector> {
        let mut next = state.clone();
        let len = next.dim();
        let amplitudes = next.vector_mut();

        for constraint in constraints {
            let Some(phase) = constraint.phase_shift else {
                continue;
            };
            if !phase.is_finite() {
                warn!(constraint = %constraint.description, phase, "ignoring non-finite phase shift");
                continue;
            }
            let factor = phase.cos();
            for &index in &constraint.affected_options {
                match amplitudes.get_mut(index) {
                    Some(amplitude) => *amplitude *= factor,
                    None => warn!(constraint = %constraint.description, index, "constraint names an unknown option"),
                }
            }
        }

        for (i, amplitude) in amplitudes.iter_mut().enumerate() {
            *amplitude += self.config.background_interference * (i as f64 * PI / len as f64).sin();
        }

        renormalized(next, "interference cancelled every option")
    }

    /// Squares the amplitudes, scales each by `1 + u` with `u` uniform in
    /// `[-uncertainty_factor, uncertainty_factor)`, clamps at 0 and renormalises.
    fn noisy_measure(&self, state: &AmplitudeVector, rng: &mut StdRng) -> Vec<f64> {
        let clean = state.probabilities();
        let noisy: Vec<f64> = clean
            .iter()
            .map(|p| (p * (1.0 + random::symmetric(rng, self.config.uncertainty_factor))).max(0.0))
            .collect();

        let total: f64 = noisy.iter().sum();
        if total > 0.0 && total.is_finite() {
            noisy.into_iter().map(|p| p / total).collect()
        } else {
            // Noise zeroed everything; keep the clean distribution
            let total: f64 = clean.iter().sum();
            clean.into_iter().map(|p| p / total).collect()
        }
    }

    /// Compares the enhanced distribution with the prior.
    fn explain(&self, options: &[DecisionOption], original: &[f64], enhanced: &[f64]) -> Vec<Effect> {
        let threshold = self.config.effect_threshold;
        let mut effects = Vec::new();

        let classical = arg_max(original);
        let quantum = arg_max(enhanced);
        if classical != quantum {
            effects.push(Effect {
                kind: EffectKind::SuperpositionAdvantage,
                description: format!(
                    "Superposition favoured '{}' over the classical choice '{}'",
                    options[quantum].id, options[classical].id
                ),
                option_id: Some(options[quantum].id.clone()),
                magnitude: enhanced[quantum] - original[quantum],
            });
        }

        for (i, (before, after)) in original.iter().zip(enhanced).enumerate() {
            let delta = after - before;
            if delta.abs() <= threshold {
                continue;
            }
            let (kind, verb) = if delta > 0.0 {
                (EffectKind::ConstructiveInterference, "amplified")
            } else {
                (EffectKind::DestructiveInterference, "suppressed")
            };
            effects.push(Effect {
                kind,
                description: format!(
                    "Interference {} '{}' from {:.3} to {:.3}",
                    verb, options[i].id, before, after
                ),
                option_id: Some(options[i].id.clone()),
                magnitude: delta,
            });
        }

        let entropy_shift = normalized_entropy(enhanced) - normalized_entropy(original);
        if entropy_shift.abs() > threshold {
            let (kind, verb) = if entropy_shift < 0.0 {
                (EffectKind::UncertaintyReduced, "reduced")
            } else {
                (EffectKind::UncertaintyIncreased, "increased")
            };
            effects.push(Effect {
                kind,
                description: format!("Measurement {} uncertainty by {:.3}", verb, entropy_shift.abs()),
                option_id: None,
                magnitude: entropy_shift,
            });
        }

        effects
    }
}

/// One-shot convenience around [`DecisionTransform::apply`].
pub fn apply_weighted_decision(
    config: &DecisionConfig,
    problem: &DecisionProblem,
    options: &[DecisionOption],
    weights: Option<&[f64]>,
    rng: &mut StdRng,
) -> Result<DecisionOutcome> {
    DecisionTransform::new(config.clone()).apply(problem, options, weights, rng)
}

/// Normalises `weights` to sum to 1, or returns the uniform distribution when absent.
/// Only an all-zero (or empty) vector is degenerate; magnitude does not matter.
fn normalize_weights(count: usize, weights: Option<&[f64]>) -> Result<Vec<f64>> {
    let degenerate = |message: String| Err(QuantumError::DegenerateWeightVector { message });

    if count == 0 {
        return degenerate("no options to weigh".to_string());
    }
    let Some(weights) = weights else {
        return Ok(vec![1.0 / count as f64; count]);
    };
    if weights.len() != count {
        return degenerate(format!("{} weights supplied for {} options", weights.len(), count));
    }
    if let Some((i, w)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite() || **w < 0.0) {
        return degenerate(format!("weight {} at index {} is negative or not finite", w, i));
    }
    // Scaled by the largest weight so the sum stays finite
    let largest = weights.iter().copied().fold(0.0, f64::max);
    if largest <= 0.0 {
        return degenerate("weights sum to zero".to_string());
    }
    let scaled: Vec<f64> = weights.iter().map(|w| w / largest).collect();
    let total: f64 = scaled.iter().sum();
    Ok(scaled.into_iter().map(|w| w / total).collect())
}

/// `amplitude[i] = sqrt(weight[i])`
fn encode_amplitudes(weights: &[f64]) -> AmplitudeVector {
    AmplitudeVector::new(weights.iter().map(|w| w.sqrt()).collect())
}

/// `new[i] = Σ_j (-1)^popcount(i & j) · old[j] / √n` by direct summation, so any
/// option count works. Renormalised because the kernel is only orthogonal when
/// `n` is a power of two.
fn hadamard_mix(state: &AmplitudeVector) -> Result<AmplitudeVector> {
    let old = state.vector();
    let n = old.len();
    let scale = 1.0 / (n as f64).sqrt();
    let mixed = (0..n)
        .map(|i| {
            old.iter()
                .enumerate()
                .map(|(j, a)| if (i & j).count_ones() % 2 == 0 { *a } else { -a })
                .sum::<f64>()
                * scale
        })
        .collect();
    renormalized(AmplitudeVector::new(mixed), "superposition cancelled every option")
}

/// For every pair of options linked by a relation, moves both amplitudes toward
/// their mean by the relation's strength.
fn entangle(state: &AmplitudeVector, relations: &[Relation]) -> Result<AmplitudeVector> {
    let mut next = state.clone();
    let len = next.dim();
    let amplitudes = next.vector_mut();

    for relation in relations {
        let strength = if relation.strength.is_finite() { relation.strength.clamp(0.0, 1.0) } else { 0.0 };
        if strength != relation.strength {
            warn!(concept = %relation.concept, strength = relation.strength, "relation strength clamped to [0, 1]");
        }

        let linked: Vec<usize> = relation
            .options
            .iter()
            .copied()
            .filter(|&index| {
                let known = index < len;
                if !known {
                    warn!(concept = %relation.concept, index, "relation names an unknown option");
                }
                known
            })
            .collect();

        for (pos, &a) in linked.iter().enumerate() {
            for &b in &linked[pos + 1..] {
                if a == b {
                    continue;
                }
                let mean = (amplitudes[a] + amplitudes[b]) / 2.0;
                amplitudes[a] += strength * (mean - amplitudes[a]);
                amplitudes[b] += strength * (mean - amplitudes[b]);
            }
        }
    }

    renormalized(next, "entanglement cancelled every option")
}

fn renormalized(mut state: AmplitudeVector, failure: &str) -> Result<AmplitudeVector> {
    if state.normalize() {
        Ok(state)
    } else {
        Err(QuantumError::Incoherence { message: failure.to_string() })
    }
}

/// Index of the largest entry; the first one wins ties.
fn arg_max(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if *v > best.1 { (i, *v) } else { best })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::seeded_rng;
    use crate::validation::{check_normalization, check_probability_distribution};

    const TEST_TOLERANCE: f64 = 1e-9;

    fn options(ids: &[&str]) -> Vec<DecisionOption> {
        ids.iter().map(|id| DecisionOption::new(id, "")).collect()
    }

    fn quiet() -> DecisionTransform {
        DecisionTransform::new(DecisionConfig { uncertainty_factor: 0.0, ..DecisionConfig::default() })
    }

    #[test]
    fn weights_default_to_uniform() -> Result<()> {
        assert_eq!(normalize_weights(4, None)?, vec![0.25; 4]);
        let normalized = normalize_weights(2, Some(&[3.0, 1.0]))?;
        assert!((normalized[0] - 0.75).abs() < TEST_TOLERANCE);
        assert!((normalized[1] - 0.25).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn huge_weights_do_not_overflow() -> Result<()> {
        assert_eq!(normalize_weights(2, Some(&[f64::MAX, f64::MAX]))?, vec![0.5, 0.5]);
        let skewed = normalize_weights(3, Some(&[f64::MAX, f64::MAX / 2.0, 0.0]))?;
        assert!((skewed[0] - 2.0 / 3.0).abs() < TEST_TOLERANCE);
        assert!((skewed[1] - 1.0 / 3.0).abs() < TEST_TOLERANCE);
        assert_eq!(skewed[2], 0.0);
        Ok(())
    }

    #[test]
    fn degenerate_weights_fail_fast() {
        for (count, weights) in [
            (0, None),
            (2, Some(vec![0.0, 0.0])),
            (2, Some(vec![1.0])),
            (2, Some(vec![1.0, -0.5])),
            (2, Some(vec![f64::NAN, 1.0])),
        ] {
            assert!(
                matches!(
                    normalize_weights(count, weights.as_deref()),
                    Err(QuantumError::DegenerateWeightVector { .. })
                ),
                "accepted {:?}",
                weights
            );
        }
    }

    #[test]
    fn hadamard_mix_matches_walsh_kernel() -> Result<()> {
        // Uniform amplitudes over a power-of-two set fold into the first entry
        let mixed = hadamard_mix(&encode_amplitudes(&[0.25; 4]))?;
        assert!((mixed.vector()[0] - 1.0).abs() < TEST_TOLERANCE);
        assert!(mixed.vector()[1..].iter().all(|a| a.abs() < TEST_TOLERANCE));

        // Three options: rows are [1,1,1], [1,-1,1], [1,1,-1]
        let mixed = hadamard_mix(&encode_amplitudes(&[1.0 / 3.0; 3]))?;
        let raw = [3.0, 1.0, 1.0];
        let norm = 11f64.sqrt();
        for (a, r) in mixed.vector().iter().zip(raw) {
            assert!((a - r / norm).abs() < TEST_TOLERANCE);
        }
        Ok(())
    }

    #[test]
    fn every_intermediate_step_is_normalized() -> Result<()> {
        let transform = DecisionTransform::default();
        let problem = DecisionProblem {
            constraints: vec![Constraint {
                description: "budget".to_string(),
                phase_shift: Some(PI / 3.0),
                affected_options: vec![0, 2],
            }],
            relations: vec![Relation { concept: "cost".to_string(), options: vec![1, 2], strength: 0.5 }],
            ..DecisionProblem::default()
        };

        let weights = normalize_weights(3, Some(&[0.5, 0.3, 0.2]))?;
        let encoded = encode_amplitudes(&weights);
        check_normalization(&encoded, Some(TEST_TOLERANCE))?;
        let mixed = hadamard_mix(&encoded)?;
        check_normalization(&mixed, Some(TEST_TOLERANCE))?;
        let interfered = transform.interfere(&mixed, &problem.constraints)?;
        check_normalization(&interfered, Some(TEST_TOLERANCE))?;
        let entangled = entangle(&interfered, &problem.relations)?;
        check_normalization(&entangled, Some(TEST_TOLERANCE))?;
        let measured = transform.noisy_measure(&entangled, &mut seeded_rng(Some(5)));
        check_probability_distribution(&measured, Some(TEST_TOLERANCE))
    }

    #[test]
    fn interference_applies_cosine_and_oscillation() -> Result<()> {
        let transform = quiet();
        let state = AmplitudeVector::new(vec![0.6, 0.8]);
        let constraints = vec![Constraint {
            description: "veto".to_string(),
            phase_shift: Some(PI),
            affected_options: vec![0, 7],
        }];
        let out = transform.interfere(&state, &constraints)?;
        // [-0.6, 0.8 + 0.1·sin(π/2)] = [-0.6, 0.9], normalised
        let norm = (0.36f64 + 0.81).sqrt();
        assert!((out.vector()[0] + 0.6 / norm).abs() < TEST_TOLERANCE);
        assert!((out.vector()[1] - 0.9 / norm).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn full_strength_entanglement_equalizes_pair() -> Result<()> {
        let state = AmplitudeVector::new(vec![0.8, 0.0, 0.6]);
        let relations = vec![Relation { concept: "twins".to_string(), options: vec![0, 2, 9], strength: 1.0 }];
        let out = entangle(&state, &relations)?;
        assert!((out.vector()[0] - out.vector()[2]).abs() < TEST_TOLERANCE);
        assert_eq!(out.vector()[1], 0.0);
        Ok(())
    }

    #[test]
    fn cancelled_interference_is_reported() {
        let transform = quiet();
        let state = AmplitudeVector::new(vec![1.0]);
        let constraints = vec![Constraint {
            description: "all out".to_string(),
            phase_shift: Some(PI / 2.0),
            affected_options: vec![0],
        }];
        // cos(π/2) is ~6e-17, below the annihilation floor
        assert!(matches!(transform.interfere(&state, &constraints), Err(QuantumError::Incoherence { .. })));
    }

    #[test]
    fn noiseless_run_is_deterministic() -> Result<()> {
        let transform = quiet();
        let opts = options(&["a", "b", "c"]);
        let problem = DecisionProblem::default();
        let first = transform.apply(&problem, &opts, Some(&[0.2, 0.5, 0.3]), &mut seeded_rng(Some(1)))?;
        let second = transform.apply(&problem, &opts, Some(&[0.2, 0.5, 0.3]), &mut seeded_rng(Some(99)))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn explanation_flags_changed_choice() {
        let transform = DecisionTransform::default();
        let opts = options(&["a", "b"]);
        let effects = transform.explain(&opts, &[0.7, 0.3], &[0.3, 0.7]);
        let kinds: Vec<EffectKind> = effects.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EffectKind::SuperpositionAdvantage,
                EffectKind::DestructiveInterference,
                EffectKind::ConstructiveInterference,
            ]
        );
        assert_eq!(effects[0].option_id.as_deref(), Some("b"));
    }

    #[test]
    fn explanation_flags_entropy_shift() {
        let transform = DecisionTransform::default();
        let opts = options(&["a", "b", "c", "d"]);
        let effects = transform.explain(&opts, &[0.25; 4], &[0.97, 0.01, 0.01, 0.01]);
        assert!(effects.iter().any(|e| e.kind == EffectKind::UncertaintyReduced));
        assert!(!effects.iter().any(|e| e.kind == EffectKind::SuperpositionAdvantage));
    }

    #[test]
    fn arg_max_prefers_first_tie() {
        assert_eq!(arg_max(&[0.5, 0.5]), 0);
        assert_eq!(arg_max(&[0.1, 0.6, 0.3]), 1);
    }
}
