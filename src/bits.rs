use crate::error::{Error, Result};

/// Count leading zero bits of a 256-bit digest given as hex.
///
/// Accepts upper- or lowercase hex. Anything other than exactly 64 hex
/// characters is rejected with [`Error::InvalidDigest`].
pub fn leading_zero_bits(hex_digest: &str) -> Result<u32> {
    let bytes = parse_digest(hex_digest)?;
    Ok(leading_zero_bits_bytes(&bytes))
}

/// Decode a 64-character hex digest into its 32 bytes.
pub fn parse_digest(hex_digest: &str) -> Result<[u8; 32]> {
    if hex_digest.len() != 64 {
        return Err(Error::InvalidDigest(hex_digest.to_owned()));
    }
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(hex_digest, &mut bytes)
        .map_err(|_| Error::InvalidDigest(hex_digest.to_owned()))?;
    Ok(bytes)
}

/// Leading zero bits of a raw 32-byte digest, most significant byte first.
pub fn leading_zero_bits_bytes(hash: &[u8; 32]) -> u32 {
    let mut count = 0u32;
    for byte in hash {
        if *byte == 0 {
            count += 8;
            continue;
        }
        count += byte.leading_zeros();
        break;
    }
    count
}

/// Whether `hex_digest` has at least `bits` leading zero bits.
pub fn meets_target(hex_digest: &str, bits: u32) -> Result<bool> {
    Ok(leading_zero_bits(hex_digest)? >= bits)
}
