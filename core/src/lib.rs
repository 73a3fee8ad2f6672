//! # Blind Mint Core
//!
//! Canonical value codec and commit-reveal protocol for minting tokens whose
//! metadata stays hidden until a later reveal. The bytes produced here must be
//! identical to what the chain computes for the same typed values, since the
//! protocol relies on the two hashes being equal.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod codec;
pub mod commitment;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod reveal;
pub mod schema;
pub mod state;
pub mod submission;
pub mod utils;

/// Re-export common types for ease of use
pub use codec::{encode_field, encode_value, FieldType};
pub use commitment::{commit, commit_record, Commitment, CommitmentHash, Salt};
pub use config::CoreConfig;
pub use error::{CoreError, Result};
pub use models::{EditionAssignment, ItemId, MetadataRecord, RevealRecord};
pub use reveal::{ItemState, RevealOutcome, RevealRegistry};
pub use schema::{Field, Schema};
pub use state::SharedRevealRegistry;
pub use submission::MintSubmitter;

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encode a value by type label
///
/// # Arguments
///
/// * `type_label` - Field type label, e.g. `"UInt64"` or `"String"`
/// * `value` - Textual value
///
/// # Returns
///
/// The canonical bytes of the value, without a length prefix
pub fn encode(type_label: &str, value: &str) -> Result<Vec<u8>> {
    codec::encode_labeled(type_label, value)
}

/// SHA3-256 over the concatenation of encoded buffers
pub fn hash<B: AsRef<[u8]>>(buffers: &[B]) -> CommitmentHash {
    commitment::hash(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_by_label() {
        assert_eq!(encode("Int", "-200").unwrap(), vec![255, 56]);
        assert!(matches!(encode("Word", "1"), Err(CoreError::UnsupportedTypeError(_))));
    }

    #[test]
    fn test_end_to_end() {
        let schema = Schema::new(vec![
            Field::new("name", FieldType::String),
            Field::new("shiny", FieldType::Bool),
        ])
        .unwrap();
        let values = models::record([("name", "Lynx"), ("shiny", "false")]);

        let commitment = commit_record(&schema, &values).unwrap();

        let mut preimage = vec![commitment.salt.to_vec()];
        preimage.extend(schema.encode_record(&values).unwrap());
        assert_eq!(hash(&preimage), commitment.hash);

        let mut registry = RevealRegistry::new(schema);
        registry.register(ItemId(1), commitment).unwrap();
        registry.reveal(RevealRecord::new(ItemId(1), values, commitment.salt)).unwrap();

        assert_eq!(registry.state(ItemId(1)), Some(ItemState::Revealed));
    }
}
