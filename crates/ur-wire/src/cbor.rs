//! CBOR part-header codec.
//!
//! A part travels as a five-element CBOR array:
//!
//! ```text
//! [uint seq_num, uint seq_len, uint message_len, uint checksum, bytes data]
//! ```
//!
//! Encoding always uses preferred (length-minimal) serialization. Decoding
//! in [`DecodeMode::Strict`] additionally requires the input to *be* in
//! preferred form, verified by re-encoding the decoded value and comparing
//! bytes, so two implementations can never disagree about the identity of a
//! frame. Wire-facing decodes use `Strict`; `Lenient` exists for tooling
//! that inspects frames produced by sloppier encoders.

use ciborium::de::from_reader;
use ciborium::ser::into_writer;
use ciborium::value::Value;
use thiserror::Error;
use ur_fountain::Part;

/// Strictness of [`decode_part`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeMode {
    /// Reject non-minimal integer and length encodings.
    Strict,
    /// Accept any well-formed encoding of the right shape.
    Lenient,
}

/// Part-header codec errors.
#[derive(Debug, Error)]
pub enum CborError {
    /// The top-level value is not an array.
    #[error("part header is not a CBOR array")]
    NotAnArray,

    /// The header array does not have exactly five elements.
    #[error("part header has {got} elements, expected 5")]
    WrongArity {
        /// Number of elements found.
        got: usize,
    },

    /// A header field has the wrong CBOR major type.
    #[error("wrong CBOR type for field {field}")]
    WrongFieldType {
        /// Name of the offending field.
        field: &'static str,
    },

    /// An integer field does not fit in 32 unsigned bits.
    #[error("field {field} out of range for u32")]
    FieldOutOfRange {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The input decodes but is not in preferred (minimal) form.
    #[error("non-minimal CBOR encoding")]
    NonMinimalEncoding,

    /// Extra bytes follow the first decoded value.
    #[error("trailing bytes after CBOR value")]
    TrailingBytes,

    /// CBOR serialization failed.
    #[error("cbor serialization error: {0}")]
    Serialize(#[from] ciborium::ser::Error<std::io::Error>),

    /// CBOR deserialization failed.
    #[error("cbor deserialization error: {0}")]
    Deserialize(#[from] ciborium::de::Error<std::io::Error>),
}

/// Encode a part header in preferred serialization.
///
/// # Errors
///
/// Returns `CborError::Serialize` if CBOR serialization fails.
pub fn encode_part(part: &Part) -> Result<Vec<u8>, CborError> {
    let value = Value::Array(vec![
        Value::Integer(part.seq_num.into()),
        Value::Integer(part.seq_len.into()),
        Value::Integer(part.message_len.into()),
        Value::Integer(part.checksum.into()),
        Value::Bytes(part.data.clone()),
    ]);
    let mut buf = Vec::with_capacity(24 + part.data.len());
    into_writer(&value, &mut buf)?;
    Ok(buf)
}

/// Decode a part header.
///
/// # Errors
///
/// Returns `CborError::Deserialize` for malformed CBOR, `TrailingBytes` for
/// extra input, `NotAnArray`/`WrongArity`/`WrongFieldType`/`FieldOutOfRange`
/// for shape violations, and (in strict mode) `NonMinimalEncoding` when the
/// input is not in preferred form.
pub fn decode_part(bytes: &[u8], mode: DecodeMode) -> Result<Part, CborError> {
    let mut reader = bytes;
    let value: Value = from_reader(&mut reader)?;
    if !reader.is_empty() {
        return Err(CborError::TrailingBytes);
    }

    let Value::Array(fields) = value else {
        return Err(CborError::NotAnArray);
    };
    if fields.len() != 5 {
        return Err(CborError::WrongArity { got: fields.len() });
    }

    let seq_num = uint_field(&fields[0], "seq_num")?;
    let seq_len = uint_field(&fields[1], "seq_len")?;
    let message_len = uint_field(&fields[2], "message_len")?;
    let checksum = uint_field(&fields[3], "checksum")?;
    let Value::Bytes(data) = &fields[4] else {
        return Err(CborError::WrongFieldType { field: "data" });
    };

    let part = Part {
        seq_num,
        seq_len,
        message_len,
        checksum,
        data: data.clone(),
    };

    if mode == DecodeMode::Strict && encode_part(&part)? != bytes {
        return Err(CborError::NonMinimalEncoding);
    }
    Ok(part)
}

fn uint_field(value: &Value, field: &'static str) -> Result<u32, CborError> {
    let Value::Integer(integer) = value else {
        return Err(CborError::WrongFieldType { field });
    };
    u32::try_from(i128::from(*integer)).map_err(|_| CborError::FieldOutOfRange { field })
}
