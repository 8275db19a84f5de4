//! Wire unit of the fountain transport.

use crate::select::choose_fragments;

/// One transmitted part of a fountain-coded message.
///
/// The fragment index set is deliberately absent from the wire format; any
/// receiver recomputes it from `(seq_num, seq_len, checksum)`, so a part is
/// fully self-describing in five fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    /// 1-based monotonic sequence number; wraps at 2^32 (back to 1).
    pub seq_num: u32,
    /// Total number of pure fragments in the message.
    pub seq_len: u32,
    /// Original (unpadded) message length in bytes.
    pub message_len: u32,
    /// CRC-32 of the original message.
    pub checksum: u32,
    /// XOR of the selected fragments, `fragment_len` bytes.
    pub data: Vec<u8>,
}

impl Part {
    /// True if this part carries exactly one fragment (`seq_num <= seq_len`).
    #[must_use]
    pub const fn is_pure(&self) -> bool {
        self.seq_num <= self.seq_len
    }

    /// Recompute the fragment index set mixed into this part.
    ///
    /// Never trusted from the wire; always derived from the header fields.
    #[must_use]
    pub fn indexes(&self) -> Vec<usize> {
        choose_fragments(self.seq_num, self.seq_len as usize, self.checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(seq_num: u32, seq_len: u32) -> Part {
        Part {
            seq_num,
            seq_len,
            message_len: 300,
            checksum: 0xAABB_CCDD,
            data: vec![0; 100],
        }
    }

    #[test]
    fn purity_boundary() {
        assert!(part(1, 3).is_pure());
        assert!(part(3, 3).is_pure());
        assert!(!part(4, 3).is_pure());
    }

    #[test]
    fn pure_part_indexes_are_implicit() {
        assert_eq!(part(2, 3).indexes(), vec![1]);
    }

    #[test]
    fn mixed_part_indexes_recompute_identically() {
        let p = part(7, 3);
        assert_eq!(p.indexes(), p.indexes());
        assert!(p.indexes().iter().all(|&i| i < 3));
    }
}
