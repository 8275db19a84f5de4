//! Fountain-coding core for the `ur:` air-gap transport.
//!
//! This crate implements the erasure-coding half of a fountain-coded optical
//! transport: an arbitrarily large message is split into fixed-size fragments
//! and re-emitted as an unbounded stream of parts (pure fragments first, then
//! pseudo-randomly XOR-mixed combinations). A receiver that captures parts in
//! any order, with repeats and gaps, reconstructs the original message by
//! progressive linear reduction over GF(2).
//!
//! # Overview
//!
//! The transport works because both sides derive the *same* fragment mix for
//! a given part without ever transmitting the index set:
//! - The encoder seeds a deterministic PRNG from `(seq_num, checksum)` and
//!   selects fragment indexes through a weighted alias sampler.
//! - The decoder recomputes exactly the same selection from the part header.
//! - Any sufficiently large subset of parts reconstructs the message; no
//!   particular part is required.
//!
//! Every algorithm here (CRC-32 variant, xoshiro256\*\* seeding, alias
//! construction order, shuffle order) is interop-critical: independent
//! encoder/decoder implementations elsewhere in the ecosystem must agree
//! bit-for-bit.
//!
//! This crate is synchronous and performs no I/O; frame acquisition and
//! rendering belong to the embedding application.

#![forbid(unsafe_code)]

mod checksum;
mod decoder;
mod encoder;
mod error;
mod golden;
mod part;
mod sampler;
mod select;
mod xoshiro;

pub use checksum::crc32;
pub use decoder::{FountainDecoder, PartOutcome};
pub use encoder::{FountainEncoder, FragmentConfig};
pub use error::{DecodeError, EncodeError};
pub use part::Part;
pub use sampler::RandomSampler;
pub use select::choose_fragments;
pub use xoshiro::Xoshiro256;
