//! Cryptographic primitives for commit-reveal minting
//!
//! Commitment digests are plain SHA3-256 over the concatenated buffers, with
//! no domain tag or framing added, because the chain recomputes the same
//! digest independently and the two must agree byte for byte.

mod hasher;

pub use hasher::{Sha3Hasher, HASH_LENGTH};

use constant_time_eq::constant_time_eq;

/// SHA3-256 over the concatenation of all buffers, in order
///
/// # Arguments
///
/// * `buffers` - Encoded buffers, typically a salt followed by record fields
///
/// # Returns
///
/// A 32-byte digest
pub fn hash_buffers<B: AsRef<[u8]>>(buffers: &[B]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha3Hasher::new();
    hasher.update_all(buffers);
    hasher.finalize()
}

/// SHA3-256 over a prefix followed by the concatenation of all buffers
pub fn hash_with_prefix<B: AsRef<[u8]>>(prefix: &[u8], buffers: &[B]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha3Hasher::new();
    hasher.update(prefix).update_all(buffers);
    hasher.finalize()
}

/// Verify a hash in constant time to prevent timing attacks
///
/// # Arguments
///
/// * `expected` - Expected hash value
/// * `actual` - Actual hash value to verify
///
/// # Returns
///
/// True if the hashes match, false otherwise
pub fn verify_hash(expected: &[u8; HASH_LENGTH], actual: &[u8; HASH_LENGTH]) -> bool {
    constant_time_eq(expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_buffers_is_concatenation() {
        let hash = hash_buffers(&[b"foo".as_slice(), b"bar".as_slice()]);

        // Same inputs should produce the same hash
        assert_eq!(hash, hash_buffers(&[b"foo".as_slice(), b"bar".as_slice()]));

        // Only the concatenation matters, not the split
        assert_eq!(hash, hash_buffers(&[b"foobar".as_slice()]));
        assert_eq!(hash, hash_buffers(&[b"fo".to_vec(), b"ob".to_vec(), b"ar".to_vec()]));

        // Order matters
        assert_ne!(hash, hash_buffers(&[b"bar".as_slice(), b"foo".as_slice()]));
    }

    #[test]
    fn test_hash_with_prefix() {
        let salt = [7u8; 32];
        let buffers = vec![vec![1u8, 2, 3], vec![4u8]];

        let mut preimage = salt.to_vec();
        preimage.extend(buffers.concat());

        assert_eq!(hash_with_prefix(&salt, &buffers), hash_buffers(&[preimage]));
    }

    #[test]
    fn test_verify_hash() {
        let hash = hash_buffers(&[b"test data"]);

        // Correct hash should verify
        assert!(verify_hash(&hash, &hash));

        // Different hash should not verify
        let different_hash = hash_buffers(&[b"different data"]);
        assert!(!verify_hash(&hash, &different_hash));
    }
}
