//! Message checksum (CRC-32/ISO-HDLC).

use crc::{CRC_32_ISO_HDLC, Crc};

/// Process-wide CRC-32 instance (reflected IEEE polynomial 0xEDB88320).
///
/// Interop-critical: this is the zlib CRC-32 variant used by every other
/// implementation of the transport. Changing it breaks cross-device decoding
/// while all local round-trip tests keep passing.
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Compute the CRC-32 checksum of a byte buffer.
///
/// Used both to fingerprint whole messages (the `checksum` field of every
/// part header) and to validate final reassembly.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}
