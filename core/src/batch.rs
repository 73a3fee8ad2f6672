//! Batch commitment generation
//!
//! Records in a batch are committed independently, optionally across several
//! threads. Results always come back in input order, because the execution
//! environment assigns identities by position only after the batch lands.

use std::thread;
use serde::{Serialize, Deserialize};
use log::info;

use crate::commitment::{commit_record, Commitment};
use crate::error::{CoreError, Result};
use crate::models::{ItemId, MetadataRecord, RevealRecord};
use crate::reveal::RevealRegistry;
use crate::schema::Schema;
use crate::utils::measure_time;

/// Committed record awaiting an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMint {
    /// Position of the record in the submitted batch
    pub index: usize,

    /// Plaintext retained off-chain
    pub record: MetadataRecord,

    /// Commitment to publish
    pub commitment: Commitment,
}

/// Committed record with its assigned identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedItem {
    /// Identity assigned by the execution environment
    pub id: ItemId,

    /// Plaintext retained off-chain
    pub record: MetadataRecord,

    /// Published commitment
    pub commitment: Commitment,
}

impl MintedItem {
    /// Reveal record disclosing this item
    pub fn reveal_record(&self) -> RevealRecord {
        RevealRecord::new(self.id, self.record.clone(), self.commitment.salt)
    }
}

fn commit_chunk(schema: &Schema, offset: usize, records: &[MetadataRecord]) -> Result<Vec<PendingMint>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            Ok(PendingMint {
                index: offset + i,
                record: record.clone(),
                commitment: commit_record(schema, record)?,
            })
        })
        .collect()
}

/// Commit every record of a batch under its own fresh salt
///
/// Work is spread over at most `max_parallelism` threads. The first failing
/// record, in input order, fails the whole batch.
pub fn commit_batch(
    schema: &Schema,
    records: &[MetadataRecord],
    max_parallelism: usize,
) -> Result<Vec<PendingMint>> {
    let workers = max_parallelism.clamp(1, records.len().max(1));

    let pending = measure_time("commit_batch", || {
        if workers == 1 {
            return commit_chunk(schema, 0, records);
        }

        let chunk_size = (records.len() + workers - 1) / workers;
        thread::scope(|scope| -> Result<Vec<PendingMint>> {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .enumerate()
                .map(|(n, chunk)| scope.spawn(move || commit_chunk(schema, n * chunk_size, chunk)))
                .collect();

            let mut pending = Vec::with_capacity(records.len());
            for handle in handles {
                let chunk = handle
                    .join()
                    .map_err(|_| CoreError::StateError("commitment worker panicked".to_string()))??;
                pending.extend(chunk);
            }
            Ok(pending)
        })
    })?;

    info!("Committed batch of {} records on {} workers", pending.len(), workers);
    Ok(pending)
}

/// Pair a committed batch with the identities assigned to it, by position
pub fn assign_identities(pending: Vec<PendingMint>, ids: &[ItemId]) -> Result<Vec<MintedItem>> {
    if pending.len() != ids.len() {
        return Err(CoreError::BatchSizeMismatchError {
            expected: pending.len(),
            actual: ids.len(),
        });
    }

    let mut pending = pending;
    pending.sort_by_key(|p| p.index);

    Ok(pending
        .into_iter()
        .zip(ids.iter().copied())
        .map(|(p, id)| MintedItem {
            id,
            record: p.record,
            commitment: p.commitment,
        })
        .collect())
}

/// Track every minted item in a registry
pub fn register_minted(registry: &mut RevealRegistry, items: &[MintedItem]) -> Result<()> {
    for item in items {
        registry.register(item.id, item.commitment)?;
    }
    Ok(())
}
