//! Reveal verification
//!
//! The registry holds every outstanding commitment indexed by identity and by
//! hash. Each item moves through a two-state machine:
//!
//! | State       | Event            | Next        |
//! |-------------|------------------|-------------|
//! | `Committed` | matching reveal  | `Revealed`  |
//! | `Revealed`  | any reveal       | rejected    |
//!
//! `Revealed` is terminal. A reveal whose data matches another item's
//! commitment, or no commitment at all, leaves every state untouched.

use std::collections::{BTreeMap, HashMap};
use serde::{Serialize, Deserialize};
use log::{debug, info, warn};

use crate::commitment::{Commitment, CommitmentHash, Salt};
use crate::crypto::hash_with_prefix;
use crate::error::{CoreError, Result};
use crate::models::{ItemId, MetadataRecord, RevealRecord};
use crate::schema::Schema;

/// Protocol state of a committed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemState {
    /// Commitment published, plaintext still hidden
    Committed,

    /// Plaintext disclosed and verified; terminal
    Revealed,
}

impl ItemState {
    /// Apply a verified reveal to this state
    pub fn on_verified_reveal(self, id: ItemId) -> Result<ItemState> {
        match self {
            ItemState::Committed => Ok(ItemState::Revealed),
            ItemState::Revealed => Err(CoreError::AlreadyRevealedError { id }),
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemState::Revealed)
    }
}

/// A tracked commitment and where it stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedItem {
    /// Commitment recorded at mint time
    pub commitment: Commitment,

    /// Current protocol state
    pub state: ItemState,

    /// Verified plaintext, present once revealed
    pub revealed: Option<MetadataRecord>,
}

/// Outcome of a successful reveal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    /// Identity that was revealed
    pub id: ItemId,

    /// Hash the reveal matched
    pub hash: CommitmentHash,
}

/// Table of outstanding commitments for one schema
#[derive(Debug, Clone)]
pub struct RevealRegistry {
    /// Schema every tracked commitment was computed against
    schema: Schema,

    /// Items by identity
    items: BTreeMap<ItemId, CommittedItem>,

    /// Identity by commitment hash
    by_hash: HashMap<CommitmentHash, ItemId>,

    /// Identity by salt, to refuse salt reuse
    by_salt: HashMap<Salt, ItemId>,
}

impl RevealRegistry {
    /// Create an empty registry for a schema
    pub fn new(schema: Schema) -> Self {
        RevealRegistry {
            schema,
            items: BTreeMap::new(),
            by_hash: HashMap::new(),
            by_salt: HashMap::new(),
        }
    }

    /// Create an empty registry for edition serial-number commitments
    pub fn for_editions() -> Self {
        Self::new(Schema::edition())
    }

    /// Schema reveals are encoded against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Track a commitment under an identity
    ///
    /// Fails if the identity is already tracked or the salt was already used.
    pub fn register(&mut self, id: ItemId, commitment: Commitment) -> Result<()> {
        if self.items.contains_key(&id) {
            return Err(CoreError::DuplicateIdentityError { id });
        }
        if let Some(&owner) = self.by_salt.get(&commitment.salt) {
            return Err(CoreError::DuplicateSaltError { id: owner });
        }
        // Distinct salts make a hash collision practically impossible, but
        // the reverse index must stay a function.
        if let Some(&owner) = self.by_hash.get(&commitment.hash) {
            return Err(CoreError::DuplicateIdentityError { id: owner });
        }

        self.by_hash.insert(commitment.hash, id);
        self.by_salt.insert(commitment.salt, id);
        self.items.insert(id, CommittedItem {
            commitment,
            state: ItemState::Committed,
            revealed: None,
        });

        debug!("Registered commitment for item {}", id);
        Ok(())
    }

    /// Current state of an item, `None` if untracked
    pub fn state(&self, id: ItemId) -> Option<ItemState> {
        self.items.get(&id).map(|item| item.state)
    }

    /// Tracked item by identity
    pub fn get(&self, id: ItemId) -> Option<&CommittedItem> {
        self.items.get(&id)
    }

    /// Identities still awaiting reveal, in ascending order
    pub fn outstanding(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|(_, item)| item.state == ItemState::Committed)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of tracked items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are tracked
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Verify a reveal without changing any state
    ///
    /// Returns the hash that matched, or the error the reveal would fail with.
    pub fn check(&self, reveal: &RevealRecord) -> Result<CommitmentHash> {
        if let Some(ItemState::Revealed) = self.state(reveal.id) {
            return Err(CoreError::AlreadyRevealedError { id: reveal.id });
        }

        let buffers = self.schema.encode_record(&reveal.plaintext)?;
        let candidate = hash_with_prefix(&reveal.salt, &buffers);

        if let Some(item) = self.items.get(&reveal.id) {
            if crate::crypto::verify_hash(&item.commitment.hash, &candidate) {
                return Ok(candidate);
            }
        }

        match self.by_hash.get(&candidate) {
            Some(&actual) => Err(CoreError::WrongIdentityError {
                expected: reveal.id,
                actual,
            }),
            None => Err(CoreError::UnknownCommitmentError { id: reveal.id }),
        }
    }

    /// Verify a reveal and move the item to `Revealed`
    pub fn reveal(&mut self, reveal: RevealRecord) -> Result<RevealOutcome> {
        let hash = match self.check(&reveal) {
            Ok(hash) => hash,
            Err(err) => {
                warn!("Rejected reveal for item {}: {}", reveal.id, err);
                return Err(err);
            }
        };

        let item = self
            .items
            .get_mut(&reveal.id)
            .ok_or_else(|| CoreError::UnknownCommitmentError { id: reveal.id })?;
        item.state = item.state.on_verified_reveal(reveal.id)?;
        item.revealed = Some(reveal.plaintext);

        info!("Item {} revealed", reveal.id);
        Ok(RevealOutcome { id: reveal.id, hash })
    }
}
