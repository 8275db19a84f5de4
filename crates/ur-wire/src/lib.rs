//! Wire presentation for the `ur:` air-gap transport.
//!
//! Sits on top of [`ur_fountain`] and turns fountain parts into strings a
//! QR frame can carry, and captured strings back into parts:
//!
//! - [`cbor`] — the five-field part-header codec (strict, length-minimal
//!   CBOR, so every implementation agrees byte-for-byte on frame identity).
//! - [`bytewords`] — the byte-to-word text encoding with a trailing CRC-32,
//!   whose minimal style is the payload alphabet of `ur:` URIs.
//! - [`ur`] — URI framing and session orchestration: [`UrEncoder`] renders
//!   an unbounded frame stream for a value, [`UrDecoder`] reassembles a
//!   value from frames captured in any order.
//!
//! Like the fountain core, this crate is synchronous and performs no I/O.

#![forbid(unsafe_code)]

pub mod bytewords;
pub mod cbor;
mod error;
mod ur;

pub use bytewords::{BytewordsError, Style};
pub use cbor::{CborError, DecodeMode};
pub use error::UrError;
pub use ur::{encode_single, Ur, UrDecoder, UrEncoder};

pub use ur_fountain::{FragmentConfig, PartOutcome};
