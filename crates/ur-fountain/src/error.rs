//! Fountain encode/decode error types.

use thiserror::Error;

/// Fountain encoder construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Empty message cannot be fragmented.
    #[error("cannot encode empty message")]
    EmptyMessage,

    /// The configured fragment size bounds are unusable.
    #[error("invalid fragment size range [{min}, {max}]")]
    InvalidFragmentSizeRange {
        /// Configured minimum fragment length.
        min: usize,
        /// Configured maximum fragment length.
        max: usize,
    },

    /// No fragment length within the configured bounds fits the message.
    #[error("no fragment length in [{min}, {max}] fits message of {message_len} bytes")]
    NoValidFragmentLength {
        /// Message length in bytes.
        message_len: usize,
        /// Configured minimum fragment length.
        min: usize,
        /// Configured maximum fragment length.
        max: usize,
    },
}

/// Fountain decoder errors.
///
/// Per-frame data-quality problems are not errors (the decoder silently
/// discards those frames); only a whole-message integrity failure after full
/// reassembly is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Reassembled message does not match the advertised checksum (terminal).
    #[error("checksum mismatch: expected {expected:#010x}, got {got:#010x}")]
    ChecksumMismatch {
        /// Checksum advertised by the part headers.
        expected: u32,
        /// Checksum of the reassembled bytes.
        got: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_error_display() {
        let err = EncodeError::EmptyMessage;
        assert_eq!(err.to_string(), "cannot encode empty message");

        let err = EncodeError::InvalidFragmentSizeRange { min: 50, max: 10 };
        assert_eq!(err.to_string(), "invalid fragment size range [50, 10]");

        let err = EncodeError::NoValidFragmentLength {
            message_len: 300,
            min: 200,
            max: 100,
        };
        assert!(err.to_string().contains("300 bytes"));
    }

    #[test]
    fn decode_error_display() {
        let err = DecodeError::ChecksumMismatch {
            expected: 0x1234_5678,
            got: 0x9ABC_DEF0,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch: expected 0x12345678, got 0x9abcdef0"
        );
    }

    #[test]
    fn errors_are_clone_and_eq() {
        let err1 = EncodeError::EmptyMessage;
        let err2 = err1.clone();
        assert_eq!(err1, err2);

        let err1 = DecodeError::ChecksumMismatch {
            expected: 1,
            got: 2,
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
