//! Weighted discrete sampling (Walker–Vose alias method).
//!
//! O(n) construction, O(1) sampling from two uniform draws. The construction
//! order below (descending-index worklist seeding, stack pops) is shared with
//! the other implementations of the transport and must not be "improved":
//! a different but equally valid alias table would change which fragments get
//! mixed into a part.

use crate::xoshiro::Xoshiro256;

/// Alias-method sampler over a fixed list of relative weights.
#[derive(Clone, Debug)]
pub struct RandomSampler {
    probs: Vec<f64>,
    aliases: Vec<usize>,
}

impl RandomSampler {
    /// Build the alias table for `weights`.
    ///
    /// Weights are relative; they are normalized to a mean of 1 internally.
    ///
    /// # Panics
    ///
    /// Panics if `weights` is empty or contains a non-positive weight; the
    /// callers in this crate construct weights from `seq_len >= 1`.
    #[must_use]
    pub fn new(weights: &[f64]) -> Self {
        assert!(!weights.is_empty(), "sampler needs at least one weight");
        assert!(
            weights.iter().all(|&w| w > 0.0),
            "sampler weights must be positive"
        );

        let n = weights.len();
        let sum: f64 = weights.iter().sum();

        // Normalize to mean 1: p[i] = w[i] * n / sum.
        let mut p: Vec<f64> = weights.iter().map(|w| w * n as f64 / sum).collect();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);
        for i in (0..n).rev() {
            if p[i] < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        let mut probs = vec![0.0; n];
        let mut aliases = vec![0; n];
        while let (Some(a), Some(g)) = (small.pop(), large.pop()) {
            probs[a] = p[a];
            aliases[a] = g;
            p[g] += p[a] - 1.0;
            if p[g] < 1.0 {
                small.push(g);
            } else {
                large.push(g);
            }
        }

        // Drain numerically-one leftovers.
        while let Some(g) = large.pop() {
            probs[g] = 1.0;
        }
        while let Some(a) = small.pop() {
            probs[a] = 1.0;
        }

        Self { probs, aliases }
    }

    /// Draw one weighted sample using two independent uniforms from `rng`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn next(&self, rng: &mut Xoshiro256) -> usize {
        let r1 = rng.next_double();
        let r2 = rng.next_double();
        let n = self.probs.len();
        // r1 can be exactly 1.0 (f64 rounding near 2^64); clamp the slot.
        let i = ((n as f64 * r1) as usize).min(n - 1);
        if r2 < self.probs[i] { i } else { self.aliases[i] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_weight_always_zero() {
        let sampler = RandomSampler::new(&[1.0]);
        let mut rng = Xoshiro256::from_bytes(b"single");
        for _ in 0..100 {
            assert_eq!(sampler.next(&mut rng), 0);
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let sampler = RandomSampler::new(&[1.0, 0.5, 0.25, 0.125]);
        let mut rng = Xoshiro256::from_bytes(b"range");
        for _ in 0..10_000 {
            assert!(sampler.next(&mut rng) < 4);
        }
    }

    #[test]
    fn sampling_is_deterministic_given_seed() {
        let sampler = RandomSampler::new(&[1.0, 0.5, 0.25]);
        let mut a = Xoshiro256::from_bytes(b"det");
        let mut b = Xoshiro256::from_bytes(b"det");
        let seq_a: Vec<usize> = (0..64).map(|_| sampler.next(&mut a)).collect();
        let seq_b: Vec<usize> = (0..64).map(|_| sampler.next(&mut b)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn heavy_weight_dominates() {
        let sampler = RandomSampler::new(&[10.0, 1.0]);
        let mut rng = Xoshiro256::from_bytes(b"bias");
        let draws = 10_000;
        let zeros = (0..draws)
            .filter(|_| sampler.next(&mut rng) == 0)
            .count();
        // Expected ~10/11 of draws; allow a generous margin.
        assert!(zeros > draws * 8 / 10, "zeros = {zeros}");
    }

    #[test]
    fn uniform_weights_cover_all_indexes() {
        let sampler = RandomSampler::new(&[1.0; 8]);
        let mut rng = Xoshiro256::from_bytes(b"uniform");
        let mut seen = [false; 8];
        for _ in 0..10_000 {
            seen[sampler.next(&mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic(expected = "at least one weight")]
    fn empty_weights_panic() {
        let _ = RandomSampler::new(&[]);
    }
}
