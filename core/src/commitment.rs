//! Salted commitments
//!
//! A commitment is `SHA3-256(salt || buffers...)` together with the salt that
//! produced it. The hash is published; the salt and plaintext stay with the
//! off-chain holder until reveal.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Serialize, Deserialize};

use crate::crypto::{hash_buffers, hash_with_prefix, verify_hash, HASH_LENGTH};
use crate::error::Result;
use crate::models::{EditionAssignment, MetadataRecord};
use crate::schema::Schema;

/// Length of a commitment salt in bytes
pub const SALT_LENGTH: usize = 32;

/// Single-use random bytes mixed into a commitment
pub type Salt = [u8; SALT_LENGTH];

/// Commitment digest
pub type CommitmentHash = [u8; HASH_LENGTH];

/// Published hash plus the salt it was computed with
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Digest handed to the execution environment
    #[serde(with = "hex::serde")]
    pub hash: CommitmentHash,

    /// Salt retained off-chain until reveal
    #[serde(with = "hex::serde")]
    pub salt: Salt,
}

impl Debug for Commitment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // The salt stays out of logs
        f.debug_struct("Commitment")
            .field("hash", &hex::encode(self.hash))
            .finish_non_exhaustive()
    }
}

impl Commitment {
    /// Recompute the commitment over a salt and buffers
    pub fn from_salt<B: AsRef<[u8]>>(salt: Salt, buffers: &[B]) -> Self {
        Commitment {
            hash: hash_with_prefix(&salt, buffers),
            salt,
        }
    }

    /// Whether `buffers` hash to this commitment under its salt
    pub fn matches<B: AsRef<[u8]>>(&self, buffers: &[B]) -> bool {
        verify_hash(&self.hash, &hash_with_prefix(&self.salt, buffers))
    }

    /// Hex form of the hash
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// SHA3-256 over the concatenation of all buffers
pub fn hash<B: AsRef<[u8]>>(buffers: &[B]) -> CommitmentHash {
    hash_buffers(buffers)
}

/// Draw a fresh salt from the operating system CSPRNG
pub fn generate_salt() -> Salt {
    generate_salt_with(&mut OsRng)
}

/// Draw a fresh salt from a caller-supplied CSPRNG
pub fn generate_salt_with<R: RngCore + CryptoRng>(rng: &mut R) -> Salt {
    let mut salt = [0u8; SALT_LENGTH];
    rng.fill_bytes(&mut salt);
    salt
}

/// Commit to buffers under a fresh salt
pub fn commit<B: AsRef<[u8]>>(buffers: &[B]) -> Commitment {
    commit_with_rng(&mut OsRng, buffers)
}

/// Commit to buffers under a salt drawn from `rng`
pub fn commit_with_rng<R, B>(rng: &mut R, buffers: &[B]) -> Commitment
where
    R: RngCore + CryptoRng,
    B: AsRef<[u8]>,
{
    Commitment::from_salt(generate_salt_with(rng), buffers)
}

/// Encode a record against a schema and commit to it
pub fn commit_record(schema: &Schema, record: &MetadataRecord) -> Result<Commitment> {
    let buffers = schema.encode_record(record)?;
    Ok(commit(&buffers))
}

/// Commit to an edition serial-number assignment
pub fn commit_edition(assignment: &EditionAssignment) -> Result<Commitment> {
    commit_record(&Schema::edition(), &assignment.to_record())
}

/// Whether a record and salt reproduce the given hash
pub fn verify_commitment(
    schema: &Schema,
    record: &MetadataRecord,
    salt: &Salt,
    expected: &CommitmentHash,
) -> Result<bool> {
    let buffers = schema.encode_record(record)?;
    Ok(verify_hash(expected, &hash_with_prefix(salt, &buffers)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldType;
    use crate::models::record;
    use crate::schema::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Field::new("name", FieldType::String),
            Field::new("rarity", FieldType::UInt8),
        ])
        .unwrap()
    }

    #[test]
    fn test_commit_round_trip() {
        let buffers = vec![vec![1u8, 2, 3], vec![0, 2, 9, 9]];
        let commitment = commit(&buffers);

        let mut preimage = vec![commitment.salt.to_vec()];
        preimage.extend(buffers.iter().cloned());

        assert_eq!(commitment.hash, hash(&preimage));
        assert!(commitment.matches(&buffers));
    }

    #[test]
    fn test_salts_are_fresh() {
        let buffers = vec![b"same".to_vec()];
        let a = commit(&buffers);
        let b = commit(&buffers);

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let buffers = vec![b"payload".to_vec()];
        let a = commit_with_rng(&mut StdRng::seed_from_u64(7), &buffers);
        let b = commit_with_rng(&mut StdRng::seed_from_u64(7), &buffers);

        assert_eq!(a, b);
    }

    #[test]
    fn test_commit_record_and_verify() {
        let schema = sample_schema();
        let values = record([("name", "Dragon"), ("rarity", "5")]);
        let commitment = commit_record(&schema, &values).unwrap();

        assert!(verify_commitment(&schema, &values, &commitment.salt, &commitment.hash).unwrap());

        let tampered = record([("name", "Dragon"), ("rarity", "6")]);
        assert!(!verify_commitment(&schema, &tampered, &commitment.salt, &commitment.hash).unwrap());

        let mut wrong_salt = commitment.salt;
        wrong_salt[0] ^= 1;
        assert!(!verify_commitment(&schema, &values, &wrong_salt, &commitment.hash).unwrap());
    }

    #[test]
    fn test_commit_record_propagates_encoding_errors() {
        let schema = sample_schema();
        let err = commit_record(&schema, &record([("name", "x"), ("rarity", "-1")])).unwrap_err();

        assert_eq!(err.field(), Some("rarity"));
    }

    #[test]
    fn test_commit_edition() {
        let assignment = EditionAssignment::new(2, 10);
        let commitment = commit_edition(&assignment).unwrap();

        let buffers = Schema::edition().encode_record(&assignment.to_record()).unwrap();
        assert!(commitment.matches(&buffers));
    }

    #[test]
    fn test_debug_hides_salt() {
        let commitment = Commitment::from_salt([0xee; 32], &[b"x"]);
        let debug = format!("{:?}", commitment);

        assert!(debug.contains(&commitment.hash_hex()));
        assert!(!debug.contains(&"ee".repeat(32)));
    }

    #[test]
    fn test_serialization_uses_hex() {
        let commitment = Commitment::from_salt([1u8; 32], &[b"x"]);
        let json = serde_json::to_value(commitment).unwrap();

        assert_eq!(json["salt"], "01".repeat(32));
        assert_eq!(json["hash"], commitment.hash_hex());

        let parsed: Commitment = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, commitment);
    }
}
