//! Deterministic fragment selection.
//!
//! Maps a `(seq_num, seq_len, checksum)` triple to the set of fragment
//! indexes mixed into that part. The index set is never carried on the wire;
//! both sides recompute it from the part header, which only works because
//! this function is pure and every implementation agrees on the PRNG,
//! the degree distribution, and the shuffle order.

use crate::sampler::RandomSampler;
use crate::xoshiro::Xoshiro256;

/// Choose the mixing degree for a part.
///
/// Weights `1/1, 1/2, .., 1/seq_len` favor small degrees exponentially,
/// matching the Luby-Transform degree distributions used for fountain codes.
/// Returns a degree in `[1, seq_len]`.
#[must_use]
pub(crate) fn choose_degree(seq_len: usize, rng: &mut Xoshiro256) -> usize {
    let weights: Vec<f64> = (1..=seq_len).map(|i| 1.0 / i as f64).collect();
    RandomSampler::new(&weights).next(rng) + 1
}

/// Reference shuffle: repeatedly remove a random remaining element.
///
/// Not a textbook Fisher–Yates swap loop; the remove-at-random-index order
/// is what the other implementations produce and must be preserved.
fn shuffled(mut items: Vec<usize>, rng: &mut Xoshiro256) -> Vec<usize> {
    let mut result = Vec::with_capacity(items.len());
    while !items.is_empty() {
        let index = rng.next_int(0, items.len() - 1);
        result.push(items.remove(index));
    }
    result
}

/// Compute the fragment index set for part `seq_num` of a message.
///
/// Pure function of its inputs: for `seq_num <= seq_len` the part is "pure"
/// and the set is the singleton `{seq_num - 1}`; otherwise the PRNG is
/// seeded from `be32(seq_num) || be32(checksum)` and a degree-limited prefix
/// of a shuffled index list is taken. The result is sorted (XOR composition
/// is order-independent, and a canonical order makes the set usable as a
/// map key).
///
/// Callers must guarantee `seq_num >= 1` and `seq_len >= 1`; the decoder
/// rejects frames violating that before ever reaching this function.
#[must_use]
pub fn choose_fragments(seq_num: u32, seq_len: usize, checksum: u32) -> Vec<usize> {
    debug_assert!(seq_num >= 1 && seq_len >= 1);
    if (seq_num as usize) <= seq_len {
        return vec![seq_num as usize - 1];
    }

    let mut seed = [0u8; 8];
    seed[..4].copy_from_slice(&seq_num.to_be_bytes());
    seed[4..].copy_from_slice(&checksum.to_be_bytes());
    let mut rng = Xoshiro256::from_bytes(&seed);

    let degree = choose_degree(seq_len, &mut rng);
    let indexes: Vec<usize> = (0..seq_len).collect();
    let mut chosen: Vec<usize> = shuffled(indexes, &mut rng)
        .into_iter()
        .take(degree)
        .collect();
    chosen.sort_unstable();
    chosen
}
