//! Wire-layer error type.

use thiserror::Error;

use crate::bytewords::BytewordsError;
use crate::cbor::CborError;
use ur_fountain::EncodeError;

/// Errors from `ur:` URI parsing and session orchestration.
///
/// These describe defects in a single frame string. With the sole exception
/// of encoder construction, none of them is terminal for a decoding
/// session: the caller logs the error, drops the frame, and keeps scanning.
#[derive(Debug, Error)]
pub enum UrError {
    /// The frame does not start with the `ur:` scheme.
    #[error("missing ur: scheme")]
    InvalidScheme,

    /// The type component contains characters outside `[a-z0-9-]`.
    #[error("invalid ur type {ur_type:?}")]
    InvalidType {
        /// The offending type component.
        ur_type: String,
    },

    /// The URI path does not have two or three components.
    #[error("ur path has {got} components, expected 2 or 3")]
    InvalidPathLength {
        /// Number of components found.
        got: usize,
    },

    /// The `<seq>-<seq_len>` component is malformed.
    #[error("invalid sequence component {component:?}")]
    InvalidSequenceComponent {
        /// The offending component as it appeared in the URI.
        component: String,
    },

    /// The URI sequence component and the CBOR header disagree.
    #[error("sequence mismatch: URI says {uri:?}, header says {header:?}")]
    SequenceMismatch {
        /// `(seq_num, seq_len)` from the URI path.
        uri: (u32, u32),
        /// `(seq_num, seq_len)` from the decoded part header.
        header: (u32, u32),
    },

    /// The part header failed to decode.
    #[error(transparent)]
    InvalidHeader(#[from] CborError),

    /// The bytewords payload failed to decode.
    #[error(transparent)]
    Bytewords(#[from] BytewordsError),

    /// The underlying fountain encoder could not be constructed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ur_error_display() {
        assert_eq!(UrError::InvalidScheme.to_string(), "missing ur: scheme");
        assert_eq!(
            UrError::InvalidType {
                ur_type: "Crypto_PSBT".to_string()
            }
            .to_string(),
            "invalid ur type \"Crypto_PSBT\""
        );
        assert_eq!(
            UrError::InvalidPathLength { got: 4 }.to_string(),
            "ur path has 4 components, expected 2 or 3"
        );
        assert_eq!(
            UrError::SequenceMismatch {
                uri: (2, 3),
                header: (5, 3)
            }
            .to_string(),
            "sequence mismatch: URI says (2, 3), header says (5, 3)"
        );
    }

    #[test]
    fn wrapped_errors_pass_through_display() {
        let err = UrError::from(BytewordsError::OddLength);
        assert_eq!(err.to_string(), "minimal bytewords input has odd length");

        let err = UrError::from(EncodeError::EmptyMessage);
        assert_eq!(err.to_string(), "cannot encode empty message");
    }
}
