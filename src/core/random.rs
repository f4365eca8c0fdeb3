//! Random source plumbing.
//!
//! Every stochastic step (measurement, decision noise, environmental noise) draws
//! from an explicitly owned `StdRng`, so a fixed seed replays a session exactly.

use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;

/// Seeded generator when `seed` is given, otherwise one seeded from the thread-local generator.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Derives an independent child generator, used to hand each engine its own stream.
pub(crate) fn fork(rng: &mut StdRng) -> StdRng {
    StdRng::from_rng(rng)
}

/// Uniform draw in `[0, 1)`.
pub(crate) fn unit_interval(rng: &mut StdRng) -> f64 {
    StandardUniform.sample(rng)
}

/// Uniform draw in `[-scale, scale)`.
pub(crate) fn symmetric(rng: &mut StdRng, scale: f64) -> f64 {
    (2.0 * unit_interval(rng) - 1.0) * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = seeded_rng(Some(7));
        let mut b = seeded_rng(Some(7));
        for _ in 0..16 {
            assert_eq!(unit_interval(&mut a), unit_interval(&mut b));
        }
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = seeded_rng(Some(11));
        for _ in 0..1000 {
            let u = unit_interval(&mut rng);
            assert!((0.0..1.0).contains(&u));
            let s = symmetric(&mut rng, 0.3);
            assert!((-0.3..0.3).contains(&s));
        }
    }
}
