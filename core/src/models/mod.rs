//! Data models for commit-reveal minting
//!
//! This module provides the identity, record and reveal types that flow
//! between the codec, the commitment hasher and the reveal registry.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Serialize, Deserialize};

use crate::commitment::Salt;

/// Identity of a minted item, assigned by the execution environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        ItemId(id)
    }
}

/// Metadata values keyed by field name, carried as text until encoded
pub type MetadataRecord = BTreeMap<String, String>;

/// Build a metadata record from `(name, value)` pairs
pub fn record<K, V, I>(pairs: I) -> MetadataRecord
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Later disclosure of a committed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRecord {
    /// Identity the discloser claims the record belongs to
    pub id: ItemId,

    /// Original metadata
    pub plaintext: MetadataRecord,

    /// Salt the commitment was computed with
    #[serde(with = "hex::serde")]
    pub salt: Salt,
}

impl RevealRecord {
    /// Create a new reveal record
    pub fn new(id: ItemId, plaintext: MetadataRecord, salt: Salt) -> Self {
        RevealRecord { id, plaintext, salt }
    }
}

/// Serial-number assignment within an edition
///
/// Edition metadata is public ahead of time; only which serial number an item
/// receives is committed blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionAssignment {
    /// Edition the item belongs to
    pub edition_id: u64,

    /// Serial number within the edition
    pub serial_number: u64,
}

/// Field name of the edition identifier in edition records
pub const EDITION_ID_FIELD: &str = "editionId";

/// Field name of the serial number in edition records
pub const SERIAL_NUMBER_FIELD: &str = "serialNumber";

impl EditionAssignment {
    /// Create a new edition assignment
    pub fn new(edition_id: u64, serial_number: u64) -> Self {
        EditionAssignment { edition_id, serial_number }
    }

    /// Record form matching [`Schema::edition`](crate::schema::Schema::edition)
    pub fn to_record(&self) -> MetadataRecord {
        record([
            (EDITION_ID_FIELD, self.edition_id.to_string()),
            (SERIAL_NUMBER_FIELD, self.serial_number.to_string()),
        ])
    }
}
