//! Fountain decoder.
//!
//! Consumes parts in any order, with repeats and gaps, and performs
//! progressive linear reduction over GF(2) until every fragment is resolved.
//! Reduction is driven by an explicit work queue rather than recursion, so
//! stack depth stays bounded no matter how many parts chain.

// Counts are bounded by the 32-bit wire format.
#![allow(clippy::cast_precision_loss)]

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::checksum::crc32;
use crate::encoder::xor_into;
use crate::error::DecodeError;
use crate::part::Part;

/// Outcome of feeding one part to the decoder.
///
/// Per-frame data-quality problems surface as [`PartOutcome::Rejected`], not
/// as errors: the upstream optical channel is expected to be lossy and
/// occasionally wrong, so a bad frame is discarded and the session keeps
/// collecting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartOutcome {
    /// The part carried new information; reassembly is still in progress.
    Accepted,
    /// Duplicate, malformed, or inconsistent with the session; discarded.
    Rejected,
    /// The message is fully reassembled and the checksum verified.
    Complete,
    /// Terminal failure: the reassembled bytes do not match the checksum.
    Failed(DecodeError),
}

/// Session fingerprint established by the first valid part.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Expected {
    seq_len: usize,
    message_len: usize,
    checksum: u32,
    fragment_len: usize,
}

/// A part awaiting reduction, with its recomputed index set.
#[derive(Clone, Debug)]
struct WorkingPart {
    /// Sorted, duplicate-free fragment indexes.
    indexes: Vec<usize>,
    data: Vec<u8>,
}

#[derive(Clone, Debug)]
enum State {
    Collecting,
    Complete(Vec<u8>),
    Failed(DecodeError),
}

/// Fountain decoder for one message.
///
/// A decoding session is a single mutable working set owned by one logical
/// scan; concurrent receipt of frames for two different messages needs two
/// decoder instances. Duplicate delivery of any part never changes state.
pub struct FountainDecoder {
    expected: Option<Expected>,
    simple_parts: HashMap<usize, Vec<u8>>,
    mixed_parts: HashMap<Vec<usize>, Vec<u8>>,
    received_indexes: BTreeSet<usize>,
    queue: VecDeque<WorkingPart>,
    processed_count: usize,
    state: State,
}

impl Default for FountainDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FountainDecoder {
    /// Create an empty decoding session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expected: None,
            simple_parts: HashMap::new(),
            mixed_parts: HashMap::new(),
            received_indexes: BTreeSet::new(),
            queue: VecDeque::new(),
            processed_count: 0,
            state: State::Collecting,
        }
    }

    /// Feed one captured part into the session.
    ///
    /// Returns [`PartOutcome::Accepted`] when the part resolved a new index
    /// or changed the stored mixed-part working set (a "did this frame help"
    /// signal), [`PartOutcome::Rejected`] for duplicates and frames
    /// inconsistent with the session, and a terminal outcome once the
    /// message is reassembled. After a terminal outcome further calls are
    /// no-ops returning `Rejected`.
    pub fn receive_part(&mut self, part: &Part) -> PartOutcome {
        if !matches!(self.state, State::Collecting) {
            return PartOutcome::Rejected;
        }
        if !self.validate_part(part) {
            return PartOutcome::Rejected;
        }
        self.processed_count += 1;

        self.queue.push_back(WorkingPart {
            indexes: part.indexes(),
            data: part.data.clone(),
        });

        let mut progress = false;
        while let Some(working) = self.queue.pop_front() {
            if !matches!(self.state, State::Collecting) {
                self.queue.clear();
                break;
            }
            if working.indexes.len() == 1 {
                progress |= self.process_simple(&working);
            } else {
                progress |= self.process_mixed(working);
            }
        }

        match &self.state {
            State::Collecting if progress => PartOutcome::Accepted,
            State::Collecting => PartOutcome::Rejected,
            State::Complete(_) => PartOutcome::Complete,
            State::Failed(err) => PartOutcome::Failed(err.clone()),
        }
    }

    /// True once the message has been reassembled and verified.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, State::Complete(_))
    }

    /// True once reassembly ended in a checksum mismatch.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed(_))
    }

    /// The reassembled message, once complete.
    #[must_use]
    pub fn message(&self) -> Option<&[u8]> {
        match &self.state {
            State::Complete(message) => Some(message),
            _ => None,
        }
    }

    /// Consume the session, yielding the reassembled message if complete.
    #[must_use]
    pub fn into_message(self) -> Option<Vec<u8>> {
        match self.state {
            State::Complete(message) => Some(message),
            _ => None,
        }
    }

    /// The terminal failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&DecodeError> {
        match &self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Expected number of pure fragments, once the first part pinned it.
    #[must_use]
    pub fn expected_part_count(&self) -> Option<usize> {
        self.expected.as_ref().map(|e| e.seq_len)
    }

    /// Fragment indexes resolved so far, in ascending order.
    #[must_use]
    pub fn received_part_indexes(&self) -> Vec<usize> {
        self.received_indexes.iter().copied().collect()
    }

    /// Number of valid parts processed so far (duplicates included).
    #[must_use]
    pub const fn processed_parts_count(&self) -> usize {
        self.processed_count
    }

    /// Coarse progress estimate in `[0, 1]`.
    ///
    /// `min(0.99, processed / (seq_len * 1.75))` while collecting; exactly
    /// 1.0 once complete. Advisory only.
    #[must_use]
    pub fn estimated_percent_complete(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        let Some(expected) = &self.expected else {
            return 0.0;
        };
        let estimated_input_parts = expected.seq_len as f64 * 1.75;
        (self.processed_count as f64 / estimated_input_parts).min(0.99)
    }

    /// Refined progress estimate crediting unresolved mixed parts.
    ///
    /// Each stored mixed part of degree `k` credits `1/k` to each of its
    /// member indexes; an unresolved index's total credit is capped at 0.75
    /// so it can never look fully done. Not guaranteed monotonic
    /// frame-over-frame; treat as a UI hint, never as a completion signal.
    #[must_use]
    pub fn weighted_percent_complete(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        let Some(expected) = &self.expected else {
            return 0.0;
        };

        let mut credit: HashMap<usize, f64> = HashMap::new();
        for indexes in self.mixed_parts.keys() {
            let share = 1.0 / indexes.len() as f64;
            for &index in indexes {
                if !self.received_indexes.contains(&index) {
                    *credit.entry(index).or_insert(0.0) += share;
                }
            }
        }
        let partial: f64 = credit.values().map(|&c| c.min(0.75)).sum();
        let resolved = self.received_indexes.len() as f64;
        ((resolved + partial) / expected.seq_len as f64).min(0.99)
    }

    /// Check a part against the session fingerprint, pinning it on first use.
    fn validate_part(&mut self, part: &Part) -> bool {
        // seq_num 0 and seq_len 0 are structurally invalid on the wire, and
        // a message cannot be longer than its padded fragments.
        if part.seq_num == 0
            || part.seq_len == 0
            || part.data.is_empty()
            || part.message_len as usize > part.seq_len as usize * part.data.len()
        {
            tracing::debug!(
                seq_num = part.seq_num,
                seq_len = part.seq_len,
                "discarding structurally invalid part"
            );
            return false;
        }

        match &self.expected {
            None => {
                self.expected = Some(Expected {
                    seq_len: part.seq_len as usize,
                    message_len: part.message_len as usize,
                    checksum: part.checksum,
                    fragment_len: part.data.len(),
                });
                true
            }
            Some(expected) => {
                let matches = expected.seq_len == part.seq_len as usize
                    && expected.message_len == part.message_len as usize
                    && expected.checksum == part.checksum
                    && expected.fragment_len == part.data.len();
                if !matches {
                    tracing::debug!(
                        seq_num = part.seq_num,
                        "discarding part inconsistent with session"
                    );
                }
                matches
            }
        }
    }

    /// Record a resolved fragment and back-substitute it into every stored
    /// mixed part. Returns whether anything changed.
    fn process_simple(&mut self, working: &WorkingPart) -> bool {
        let index = working.indexes[0];
        if self.received_indexes.contains(&index) {
            return false;
        }
        self.simple_parts.insert(index, working.data.clone());
        self.received_indexes.insert(index);

        // Reduce every stored mixed part containing this index.
        let affected: Vec<Vec<usize>> = self
            .mixed_parts
            .keys()
            .filter(|key| key.binary_search(&index).is_ok())
            .cloned()
            .collect();
        for key in affected {
            let Some(mut data) = self.mixed_parts.remove(&key) else {
                continue;
            };
            let reduced: Vec<usize> = key.iter().copied().filter(|&i| i != index).collect();
            xor_into(&mut data, &working.data);
            if reduced.len() == 1 {
                self.queue.push_back(WorkingPart {
                    indexes: reduced,
                    data,
                });
            } else {
                // A collision here means the reduced part is already known.
                self.mixed_parts.entry(reduced).or_insert(data);
            }
        }

        let seq_len = self
            .expected
            .as_ref()
            .map_or(0, |expected| expected.seq_len);
        if self.received_indexes.len() == seq_len {
            self.finalize();
        }
        true
    }

    /// Reduce a new mixed part against the working set and store it,
    /// propagating its information into previously stuck mixed parts.
    /// Returns whether anything changed.
    fn process_mixed(&mut self, mut working: WorkingPart) -> bool {
        if self.mixed_parts.contains_key(&working.indexes) {
            return false;
        }

        // Reduce the newcomer by every resolved fragment, stopping at
        // degree 1: a part whose members are all resolved carries no new
        // information, and degree 1 is handled by the simple path (where
        // the duplicate check lives).
        for (&index, data) in &self.simple_parts {
            if working.indexes.len() == 1 {
                break;
            }
            if let Ok(position) = working.indexes.binary_search(&index) {
                working.indexes.remove(position);
                xor_into(&mut working.data, data);
            }
        }
        // ...and by every stored mixed part whose index set is a strict
        // subset of the newcomer's.
        for (key, data) in &self.mixed_parts {
            if is_strict_subset(key, &working.indexes) {
                working.indexes.retain(|i| key.binary_search(i).is_err());
                xor_into(&mut working.data, data);
            }
        }

        if working.indexes.len() == 1 {
            // The enqueue itself is not progress: the remnant may duplicate
            // an already-resolved index. The simple path decides.
            self.queue.push_back(working);
            return false;
        }
        if self.mixed_parts.contains_key(&working.indexes) {
            return false;
        }

        // Propagate: the newcomer may unlock previously stuck mixed parts.
        let affected: Vec<Vec<usize>> = self
            .mixed_parts
            .keys()
            .filter(|key| is_strict_subset(&working.indexes, key))
            .cloned()
            .collect();
        for key in affected {
            let Some(mut data) = self.mixed_parts.remove(&key) else {
                continue;
            };
            let reduced: Vec<usize> = key
                .iter()
                .copied()
                .filter(|i| working.indexes.binary_search(i).is_err())
                .collect();
            xor_into(&mut data, &working.data);
            if reduced.len() == 1 {
                self.queue.push_back(WorkingPart {
                    indexes: reduced,
                    data,
                });
            } else {
                self.mixed_parts.entry(reduced).or_insert(data);
            }
        }

        self.mixed_parts.insert(working.indexes, working.data);
        true
    }

    /// Assemble the message from resolved fragments and verify its checksum.
    fn finalize(&mut self) {
        let Some(expected) = self.expected.clone() else {
            return;
        };

        let mut message = Vec::with_capacity(expected.seq_len * expected.fragment_len);
        for index in 0..expected.seq_len {
            match self.simple_parts.get(&index) {
                Some(fragment) => message.extend_from_slice(fragment),
                // Unreachable: finalize only runs with all indexes resolved.
                None => return,
            }
        }
        message.truncate(expected.message_len);

        let got = crc32(&message);
        self.state = if got == expected.checksum {
            State::Complete(message)
        } else {
            State::Failed(DecodeError::ChecksumMismatch {
                expected: expected.checksum,
                got,
            })
        };
        self.queue.clear();
    }
}

/// True iff sorted `a` is a strict subset of sorted `b`.
fn is_strict_subset(a: &[usize], b: &[usize]) -> bool {
    a.len() < b.len() && a.iter().all(|i| b.binary_search(i).is_ok())
}
