//! Content references for tender and proposal documents.
//!
//! Documents never enter the ledger; only their hash does. The format is
//! `0x` followed by lowercase hex SHA-256.

use sha2::{Digest, Sha256};

const HASH_PREFIX: &str = "0x";

/// Hashes document bytes into the registry's content-reference format.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{HASH_PREFIX}{}", hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::content_hash;

    #[test]
    fn hashes_known_vector() {
        assert_eq!(
            content_hash(b"abc"),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_input_has_fixed_hash() {
        let hash = content_hash(&[]);
        assert_eq!(hash.len(), 2 + 64);
        assert!(hash.starts_with("0xe3b0c442"));
    }
}
