//! Streaming SHA3-256 hasher
//!
//! Commitments hash the salt followed by each encoded field. Feeding the parts
//! one by one produces the same digest as hashing their concatenation without
//! building the concatenated buffer.

use sha3::{Digest, Sha3_256};

/// Length of a commitment digest in bytes
pub const HASH_LENGTH: usize = 32;

/// Incremental SHA3-256 over a sequence of buffers
#[derive(Debug, Clone, Default)]
pub struct Sha3Hasher {
    inner: Sha3_256,
}

impl Sha3Hasher {
    /// Create a new SHA3-256 hasher
    pub fn new() -> Self {
        Sha3Hasher {
            inner: Sha3_256::new(),
        }
    }

    /// Update the hasher with new data
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Update the hasher with several buffers, in order
    pub fn update_all<B: AsRef<[u8]>>(&mut self, buffers: &[B]) -> &mut Self {
        for buffer in buffers {
            self.inner.update(buffer.as_ref());
        }
        self
    }

    /// Finalize the hash and return the result
    pub fn finalize(self) -> [u8; HASH_LENGTH] {
        let result = self.inner.finalize();
        let mut output = [0u8; HASH_LENGTH];
        output.copy_from_slice(&result);
        output
    }
}
