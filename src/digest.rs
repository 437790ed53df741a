use sha2::{Digest, Sha256};

/// SHA-256 of `data` as 64 lowercase hex characters.
pub fn digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Digest of the text `initial_hash ++ token`.
///
/// Generation and verification both go through here, so the combined input is
/// always the hex text of the initial hash followed by the token bytes.
pub fn digest_concat(initial_hash: &str, token: &str) -> String {
    hex::encode(digest_concat_raw(initial_hash, token))
}

/// Raw 32-byte form of [`digest_concat`], for the search loop.
pub fn digest_concat_raw(initial_hash: &str, token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(initial_hash.as_bytes());
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}
