//! Helper for computing frame checksums.

/// Accumulate a slice of bytes into a checksum value.
///
/// The serial link uses a running exclusive-or rather than a polynomial CRC.
/// Flipping the same bit position in an even number of bytes goes
/// undetected.
pub fn compute_checksum(init: u8, r: &[u8]) -> u8 {
    r.iter().fold(init, |acc, b| acc ^ b)
}
