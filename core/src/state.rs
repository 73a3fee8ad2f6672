//! Shared reveal state
//!
//! This module wraps the reveal registry in a lock so that concurrent reveal
//! attempts for the same identity resolve to exactly one success.

use std::sync::{Arc, RwLock};

use crate::commitment::Commitment;
use crate::error::{to_state_error, Result};
use crate::models::{ItemId, RevealRecord};
use crate::reveal::{ItemState, RevealOutcome, RevealRegistry};
use crate::schema::Schema;

/// Thread-safe reveal registry
///
/// Verification and the Committed to Revealed transition happen under one
/// write lock, so two racing reveals of the same item cannot both succeed.
#[derive(Debug)]
pub struct SharedRevealRegistry {
    /// Underlying registry
    registry: RwLock<RevealRegistry>,
}

impl SharedRevealRegistry {
    /// Create an empty shared registry for a schema
    pub fn new(schema: Schema) -> Self {
        Self::from_registry(RevealRegistry::new(schema))
    }

    /// Wrap an existing registry
    pub fn from_registry(registry: RevealRegistry) -> Self {
        SharedRevealRegistry {
            registry: RwLock::new(registry),
        }
    }

    /// Track a commitment under an identity
    pub fn register(&self, id: ItemId, commitment: Commitment) -> Result<()> {
        let mut registry = self.registry.write()
            .map_err(|e| to_state_error(format!("Failed to write registry: {}", e)))?;

        registry.register(id, commitment)
    }

    /// Verify a reveal and apply the transition atomically
    pub fn reveal(&self, reveal: RevealRecord) -> Result<RevealOutcome> {
        let mut registry = self.registry.write()
            .map_err(|e| to_state_error(format!("Failed to write registry: {}", e)))?;

        registry.reveal(reveal)
    }

    /// Current state of an item
    pub fn state(&self, id: ItemId) -> Result<Option<ItemState>> {
        let registry = self.registry.read()
            .map_err(|e| to_state_error(format!("Failed to read registry: {}", e)))?;

        Ok(registry.state(id))
    }

    /// Identities still awaiting reveal
    pub fn outstanding(&self) -> Result<Vec<ItemId>> {
        let registry = self.registry.read()
            .map_err(|e| to_state_error(format!("Failed to read registry: {}", e)))?;

        Ok(registry.outstanding())
    }

    /// Copy of the current registry
    pub fn snapshot(&self) -> Result<RevealRegistry> {
        let registry = self.registry.read()
            .map_err(|e| to_state_error(format!("Failed to read registry: {}", e)))?;

        Ok(registry.clone())
    }
}

/// Reference-counted shared registry
pub type SharedRegistry = Arc<SharedRevealRegistry>;

/// Create a new shared registry
pub fn create_shared_registry(schema: Schema) -> SharedRegistry {
    Arc::new(SharedRevealRegistry::new(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use crate::codec::FieldType;
    use crate::commitment::commit_record;
    use crate::error::CoreError;
    use crate::models::record;
    use crate::schema::Field;

    fn sample_schema() -> Schema {
        Schema::new(vec![Field::new("name", FieldType::String)]).unwrap()
    }

    #[test]
    fn test_concurrent_reveals_succeed_once() {
        let registry = create_shared_registry(sample_schema());
        let values = record([("name", "Phoenix")]);
        let commitment = commit_record(&sample_schema(), &values).unwrap();
        registry.register(ItemId(1), commitment).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let reveal = RevealRecord::new(ItemId(1), values.clone(), commitment.salt);
                thread::spawn(move || registry.reveal(reveal))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, CoreError::AlreadyRevealedError { .. })));
        assert_eq!(registry.state(ItemId(1)).unwrap(), Some(ItemState::Revealed));
    }

    #[test]
    fn test_snapshot_and_outstanding() {
        let registry = SharedRevealRegistry::new(sample_schema());
        for (id, name) in [(1, "a"), (2, "b")] {
            let commitment = commit_record(&sample_schema(), &record([("name", name)])).unwrap();
            registry.register(ItemId(id), commitment).unwrap();
        }

        assert_eq!(registry.outstanding().unwrap(), vec![ItemId(1), ItemId(2)]);
        assert_eq!(registry.snapshot().unwrap().len(), 2);
        assert_eq!(registry.state(ItemId(3)).unwrap(), None);
    }
}
