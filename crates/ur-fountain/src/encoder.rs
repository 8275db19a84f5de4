//! Fountain encoder.
//!
//! Partitions a message into fixed-size fragments and emits an unbounded
//! sequence of parts: the first `seq_len` parts are the pure fragments in
//! order, everything after is a pseudo-randomly selected XOR combination.

// Counts are bounded by the 32-bit wire format.
#![allow(clippy::cast_possible_truncation)]

use crate::checksum::crc32;
use crate::error::EncodeError;
use crate::part::Part;
use crate::select::choose_fragments;

/// Fragment sizing bounds for the encoder.
///
/// `max_fragment_len` is tied to the capacity of one optical frame;
/// `min_fragment_len` bounds the fragment-length search space.
#[derive(Clone, Debug)]
pub struct FragmentConfig {
    /// Largest allowed per-part payload, in bytes.
    pub max_fragment_len: usize,
    /// Smallest fragment length considered by the sizing search.
    pub min_fragment_len: usize,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            max_fragment_len: 100,
            min_fragment_len: 10,
        }
    }
}

/// Fountain encoder for one message.
pub struct FountainEncoder {
    message_len: usize,
    checksum: u32,
    fragment_len: usize,
    fragments: Vec<Vec<u8>>,
    seq_num: u32,
}

impl FountainEncoder {
    /// Create an encoder for `message`.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::EmptyMessage` if the message is empty.
    /// Returns `EncodeError::InvalidFragmentSizeRange` if the bounds are
    /// unusable (`min == 0` or `min > max`).
    /// Returns `EncodeError::NoValidFragmentLength` if no fragment count
    /// yields a fragment length within the bounds.
    pub fn new(message: &[u8], config: &FragmentConfig) -> Result<Self, EncodeError> {
        if message.is_empty() {
            return Err(EncodeError::EmptyMessage);
        }
        if config.min_fragment_len == 0 || config.min_fragment_len > config.max_fragment_len {
            return Err(EncodeError::InvalidFragmentSizeRange {
                min: config.min_fragment_len,
                max: config.max_fragment_len,
            });
        }

        let fragment_len = find_nominal_fragment_length(
            message.len(),
            config.min_fragment_len,
            config.max_fragment_len,
        )?;

        Ok(Self {
            message_len: message.len(),
            checksum: crc32(message),
            fragment_len,
            fragments: partition_message(message, fragment_len),
            seq_num: 0,
        })
    }

    /// Number of pure fragments the message was split into.
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.fragments.len()
    }

    /// Original (unpadded) message length in bytes.
    #[must_use]
    pub const fn message_len(&self) -> usize {
        self.message_len
    }

    /// CRC-32 of the original message.
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Fragment length chosen by the sizing search.
    #[must_use]
    pub const fn fragment_len(&self) -> usize {
        self.fragment_len
    }

    /// Sequence number of the most recently emitted part (0 before the first).
    #[must_use]
    pub const fn current_seq_num(&self) -> u32 {
        self.seq_num
    }

    /// True iff the message fits in one fragment.
    ///
    /// Callers must special-case this: a one-fragment message is re-emitted
    /// as the same single pure part forever, never mixed.
    #[must_use]
    pub fn is_single_part(&self) -> bool {
        self.seq_len() == 1
    }

    /// True once every pure fragment has been emitted at least once.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.seq_num as usize >= self.seq_len()
    }

    /// Emit the next part.
    ///
    /// Never fails and never blocks; safe to call indefinitely. The sequence
    /// number wraps at 2^32 back to 1 (0 is structurally invalid on the
    /// wire and is never revisited).
    pub fn next_part(&mut self) -> Part {
        self.seq_num = self.seq_num.checked_add(1).unwrap_or(1);

        let indexes = choose_fragments(self.seq_num, self.seq_len(), self.checksum);
        let mut data = vec![0u8; self.fragment_len];
        for &index in &indexes {
            xor_into(&mut data, &self.fragments[index]);
        }

        Part {
            seq_num: self.seq_num,
            seq_len: self.seq_len() as u32,
            message_len: self.message_len as u32,
            checksum: self.checksum,
            data,
        }
    }
}

/// Smallest fragment count whose fragment length fits the configured maximum.
fn find_nominal_fragment_length(
    message_len: usize,
    min_fragment_len: usize,
    max_fragment_len: usize,
) -> Result<usize, EncodeError> {
    let max_fragment_count = (message_len / min_fragment_len).max(1);
    for fragment_count in 1..=max_fragment_count {
        let candidate = message_len.div_ceil(fragment_count);
        if candidate <= max_fragment_len {
            return Ok(candidate);
        }
    }
    Err(EncodeError::NoValidFragmentLength {
        message_len,
        min: min_fragment_len,
        max: max_fragment_len,
    })
}

/// Slice the message into `fragment_len` chunks, zero-padding the last.
fn partition_message(message: &[u8], fragment_len: usize) -> Vec<Vec<u8>> {
    message
        .chunks(fragment_len)
        .map(|chunk| {
            let mut fragment = chunk.to_vec();
            fragment.resize(fragment_len, 0);
            fragment
        })
        .collect()
}

/// Element-wise XOR of `src` into `acc`.
pub(crate) fn xor_into(acc: &mut [u8], src: &[u8]) {
    debug_assert_eq!(acc.len(), src.len());
    for (a, s) in acc.iter_mut().zip(src) {
        *a ^= s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 256) as u8).collect()
    }

    #[test]
    fn fragment_length_selection() {
        // 300 bytes, max 100: 3 fragments of exactly 100.
        assert_eq!(find_nominal_fragment_length(300, 10, 100).unwrap(), 100);
        // 301 bytes, max 100: 4 fragments of 76.
        assert_eq!(find_nominal_fragment_length(301, 10, 100).unwrap(), 76);
        // Message smaller than the maximum: a single fragment.
        assert_eq!(find_nominal_fragment_length(42, 10, 100).unwrap(), 42);
        // Unsatisfiable: min bounds the count search to 1, 300 > 100.
        assert!(matches!(
            find_nominal_fragment_length(300, 200, 100),
            Err(EncodeError::NoValidFragmentLength { .. })
        ));
    }

    #[test]
    fn partition_pads_final_chunk() {
        let fragments = partition_message(&[1, 2, 3, 4, 5], 2);
        assert_eq!(fragments, vec![vec![1, 2], vec![3, 4], vec![5, 0]]);
    }

    #[test]
    fn encoder_rejects_empty_message() {
        let result = FountainEncoder::new(&[], &FragmentConfig::default());
        assert!(matches!(result, Err(EncodeError::EmptyMessage)));
    }

    #[test]
    fn encoder_rejects_bad_bounds() {
        let message = filler(100);
        let result = FountainEncoder::new(
            &message,
            &FragmentConfig {
                max_fragment_len: 10,
                min_fragment_len: 50,
            },
        );
        assert!(matches!(
            result,
            Err(EncodeError::InvalidFragmentSizeRange { .. })
        ));
    }

    #[test]
    fn spec_scenario_300_bytes() {
        let message = filler(300);
        let encoder = FountainEncoder::new(&message, &FragmentConfig::default()).unwrap();
        assert_eq!(encoder.seq_len(), 3);
        assert_eq!(encoder.fragment_len(), 100);
        assert_eq!(encoder.message_len(), 300);
        assert!(!encoder.is_single_part());
    }

    #[test]
    fn pure_parts_carry_fragments_in_order() {
        let message = filler(300);
        let mut encoder = FountainEncoder::new(&message, &FragmentConfig::default()).unwrap();
        for i in 0..3 {
            let part = encoder.next_part();
            assert_eq!(part.seq_num, i as u32 + 1);
            assert!(part.is_pure());
            assert_eq!(part.data, &message[i * 100..(i + 1) * 100]);
        }
        assert!(encoder.is_complete());
    }

    #[test]
    fn mixed_parts_xor_selected_fragments() {
        let message = filler(300);
        let mut encoder = FountainEncoder::new(&message, &FragmentConfig::default()).unwrap();
        for _ in 0..3 {
            let _ = encoder.next_part();
        }
        for _ in 0..20 {
            let part = encoder.next_part();
            let mut expected = vec![0u8; 100];
            for &index in &part.indexes() {
                xor_into(&mut expected, &message[index * 100..(index + 1) * 100]);
            }
            assert_eq!(part.data, expected);
        }
    }

    #[test]
    fn single_part_message() {
        let message = filler(42);
        let mut encoder = FountainEncoder::new(&message, &FragmentConfig::default()).unwrap();
        assert!(encoder.is_single_part());
        assert_eq!(encoder.seq_len(), 1);

        // Every emitted part reveals the whole message.
        for _ in 0..5 {
            let part = encoder.next_part();
            assert_eq!(part.seq_len, 1);
            assert_eq!(part.data, message);
        }
    }

    #[test]
    fn part_stream_is_deterministic_across_instances() {
        let message = filler(512);
        let config = FragmentConfig::default();
        let mut a = FountainEncoder::new(&message, &config).unwrap();
        let mut b = FountainEncoder::new(&message, &config).unwrap();
        for _ in 0..30 {
            assert_eq!(a.next_part(), b.next_part());
        }
    }

    #[test]
    fn final_fragment_is_zero_padded() {
        let message = filler(250);
        let encoder = FountainEncoder::new(&message, &FragmentConfig::default()).unwrap();
        // 250 bytes, max 100: 3 fragments of 84 (ceil(250/3)).
        assert_eq!(encoder.seq_len(), 3);
        assert_eq!(encoder.fragment_len(), 84);
        assert_eq!(encoder.fragments[2].len(), 84);
        assert!(encoder.fragments[2][250 - 2 * 84..].iter().all(|&b| b == 0));
    }
}
