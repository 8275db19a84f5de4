//! `ur:` URI framing and session orchestration.
//!
//! A frame is a URI of one of two shapes:
//!
//! ```text
//! ur:<type>/<payload>                 single-part value
//! ur:<type>/<seq>-<seq_len>/<payload> one fountain part of a larger value
//! ```
//!
//! where `<payload>` is the minimal-bytewords rendering of the CBOR body.
//! Frames are case-insensitive on capture (QR alphanumeric mode upcases) and
//! always emitted lower-case.

use ur_fountain::{FountainDecoder, FountainEncoder, FragmentConfig, PartOutcome};

use crate::bytewords::{self, Style};
use crate::cbor::{self, DecodeMode};
use crate::error::UrError;

/// A uniform-resource value: a type tag plus an opaque CBOR body.
///
/// The body is not interpreted at this layer; registries of `ur:` types
/// define what the CBOR means.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ur {
    ur_type: String,
    cbor: Vec<u8>,
}

impl Ur {
    /// Create a value, validating the type tag against `[a-z0-9-]+`.
    ///
    /// # Errors
    ///
    /// Returns `UrError::InvalidType` for an empty tag or one containing
    /// characters outside the allowed set.
    pub fn new(ur_type: impl Into<String>, cbor: Vec<u8>) -> Result<Self, UrError> {
        let ur_type = ur_type.into();
        if !is_valid_type(&ur_type) {
            return Err(UrError::InvalidType { ur_type });
        }
        Ok(Self { ur_type, cbor })
    }

    /// The type tag.
    #[must_use]
    pub fn ur_type(&self) -> &str {
        &self.ur_type
    }

    /// The CBOR body.
    #[must_use]
    pub fn cbor(&self) -> &[u8] {
        &self.cbor
    }

    /// Consume the value, yielding the CBOR body.
    #[must_use]
    pub fn into_cbor(self) -> Vec<u8> {
        self.cbor
    }
}

fn is_valid_type(ur_type: &str) -> bool {
    !ur_type.is_empty()
        && ur_type
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Render a value as a self-contained single-part frame.
#[must_use]
pub fn encode_single(ur: &Ur) -> String {
    format!(
        "ur:{}/{}",
        ur.ur_type,
        bytewords::encode(&ur.cbor, Style::Minimal)
    )
}

/// Frame emitter for one value.
///
/// Drives a fountain encoder over the value's CBOR body and renders each
/// part as a URI string. Emission is unbounded; the displaying side cycles
/// frames until the receiving side signals completion out of band.
pub struct UrEncoder {
    ur: Ur,
    fountain: FountainEncoder,
}

impl UrEncoder {
    /// Create an encoder for `ur` with the given fragment bounds.
    ///
    /// # Errors
    ///
    /// Returns `UrError::Encode` when the CBOR body is empty or no fragment
    /// length satisfies the bounds.
    pub fn new(ur: Ur, config: &FragmentConfig) -> Result<Self, UrError> {
        let fountain = FountainEncoder::new(&ur.cbor, config)?;
        Ok(Self { ur, fountain })
    }

    /// True iff the value fits in a single frame.
    #[must_use]
    pub fn is_single_part(&self) -> bool {
        self.fountain.is_single_part()
    }

    /// Number of pure fragments the body was split into.
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.fountain.seq_len()
    }

    /// Emit the next frame.
    ///
    /// A single-part value re-emits the identical self-contained form every
    /// time; a multi-part value advances the fountain sequence.
    ///
    /// # Errors
    ///
    /// Returns `UrError::InvalidHeader` if part-header serialization fails.
    pub fn next_part(&mut self) -> Result<String, UrError> {
        if self.is_single_part() {
            return Ok(encode_single(&self.ur));
        }
        let part = self.fountain.next_part();
        let body = cbor::encode_part(&part)?;
        Ok(format!(
            "ur:{}/{}-{}/{}",
            self.ur.ur_type,
            part.seq_num,
            part.seq_len,
            bytewords::encode(&body, Style::Minimal)
        ))
    }
}

/// Frame consumer reassembling one value.
///
/// Feed every captured frame to [`UrDecoder::receive`]; frame-local defects
/// come back as errors or [`PartOutcome::Rejected`] and never poison the
/// session, so the caller just keeps scanning.
#[derive(Default)]
pub struct UrDecoder {
    fountain: FountainDecoder,
    ur_type: Option<String>,
    single: Option<Vec<u8>>,
}

impl UrDecoder {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one frame string.
    ///
    /// The first structurally valid frame pins the session's `ur:` type;
    /// later frames of a different type are rejected without being treated
    /// as errors (a stray frame from another screen must not kill a scan in
    /// progress).
    ///
    /// # Errors
    ///
    /// Returns a `UrError` describing why this frame was unusable. Every
    /// error is frame-local: the session remains live and keeps collecting.
    pub fn receive(&mut self, frame: &str) -> Result<PartOutcome, UrError> {
        if self.is_complete() {
            return Ok(PartOutcome::Rejected);
        }

        let frame = frame.to_lowercase();
        let path = frame
            .strip_prefix("ur:")
            .ok_or(UrError::InvalidScheme)?;
        let components: Vec<&str> = path.split('/').collect();

        match components[..] {
            [ur_type, payload] => self.receive_single(ur_type, payload),
            [ur_type, sequence, payload] => self.receive_multi(ur_type, sequence, payload),
            _ => Err(UrError::InvalidPathLength {
                got: components.len(),
            }),
        }
    }

    /// True once the value is fully reassembled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.single.is_some() || self.fountain.is_complete()
    }

    /// True once fountain reassembly ended in a checksum mismatch.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.fountain.is_failed()
    }

    /// The reassembled value, once complete.
    #[must_use]
    pub fn ur(&self) -> Option<Ur> {
        let ur_type = self.ur_type.clone()?;
        let cbor = self
            .single
            .clone()
            .or_else(|| self.fountain.message().map(<[u8]>::to_vec))?;
        Some(Ur { ur_type, cbor })
    }

    /// Coarse progress estimate in `[0, 1]`; advisory only.
    #[must_use]
    pub fn estimated_percent_complete(&self) -> f64 {
        if self.single.is_some() {
            return 1.0;
        }
        self.fountain.estimated_percent_complete()
    }

    /// Expected number of fountain parts, once known.
    #[must_use]
    pub fn expected_part_count(&self) -> Option<usize> {
        self.fountain.expected_part_count()
    }

    fn receive_single(&mut self, ur_type: &str, payload: &str) -> Result<PartOutcome, UrError> {
        self.check_type(ur_type)?;
        if self.fountain.expected_part_count().is_some() {
            // A self-contained frame cannot join a multi-part session.
            tracing::debug!(ur_type, "discarding single-part frame mid-session");
            return Ok(PartOutcome::Rejected);
        }

        let cbor = bytewords::decode(payload, Style::Minimal)?;
        if self.matches_session_type(ur_type) {
            self.pin_type(ur_type);
            self.single = Some(cbor);
            Ok(PartOutcome::Complete)
        } else {
            Ok(PartOutcome::Rejected)
        }
    }

    fn receive_multi(
        &mut self,
        ur_type: &str,
        sequence: &str,
        payload: &str,
    ) -> Result<PartOutcome, UrError> {
        self.check_type(ur_type)?;
        let (seq_num, seq_len) = parse_sequence(sequence)?;
        let body = bytewords::decode(payload, Style::Minimal)?;
        let part = cbor::decode_part(&body, DecodeMode::Strict)?;
        if (seq_num, seq_len) != (part.seq_num, part.seq_len) {
            return Err(UrError::SequenceMismatch {
                uri: (seq_num, seq_len),
                header: (part.seq_num, part.seq_len),
            });
        }

        if !self.matches_session_type(ur_type) {
            return Ok(PartOutcome::Rejected);
        }
        let outcome = self.fountain.receive_part(&part);
        // Only a frame that actually joined the session establishes the
        // session type; a structurally rejected part must not pin it.
        if outcome != PartOutcome::Rejected {
            self.pin_type(ur_type);
        }
        Ok(outcome)
    }

    /// Structural validation of the type component.
    fn check_type(&self, ur_type: &str) -> Result<(), UrError> {
        if is_valid_type(ur_type) {
            Ok(())
        } else {
            Err(UrError::InvalidType {
                ur_type: ur_type.to_string(),
            })
        }
    }

    fn matches_session_type(&self, ur_type: &str) -> bool {
        match &self.ur_type {
            Some(pinned) if pinned != ur_type => {
                tracing::debug!(
                    frame_type = ur_type,
                    session_type = pinned.as_str(),
                    "discarding frame of foreign type"
                );
                false
            }
            _ => true,
        }
    }

    fn pin_type(&mut self, ur_type: &str) {
        if self.ur_type.is_none() {
            self.ur_type = Some(ur_type.to_string());
        }
    }
}

/// Parse the `<seq>-<seq_len>` path component; both values must be >= 1.
fn parse_sequence(component: &str) -> Result<(u32, u32), UrError> {
    let invalid = || UrError::InvalidSequenceComponent {
        component: component.to_string(),
    };
    let (seq_num, seq_len) = component.split_once('-').ok_or_else(invalid)?;
    let seq_num: u32 = seq_num.parse().map_err(|_| invalid())?;
    let seq_len: u32 = seq_len.parse().map_err(|_| invalid())?;
    if seq_num == 0 || seq_len == 0 {
        return Err(invalid());
    }
    Ok((seq_num, seq_len))
}
