//! Transaction submission boundary
//!
//! The execution environment that stores commitments and recomputes reveal
//! hashes lives outside this crate. [`MintSubmitter`] is the seam it plugs in
//! through; network retries and timeouts belong to implementations.

use log::info;

use crate::batch::{assign_identities, commit_batch, MintedItem};
use crate::commitment::CommitmentHash;
use crate::error::Result;
use crate::models::{MetadataRecord, RevealRecord, ItemId};
use crate::schema::Schema;

/// Facility that publishes commitments and reveals
pub trait MintSubmitter {
    /// Publish a batch of commitment hashes
    ///
    /// Returns the identity assigned to each hash, in submission order.
    fn submit_commitments(&mut self, hashes: &[CommitmentHash]) -> Result<Vec<ItemId>>;

    /// Publish a reveal for independent verification
    fn submit_reveal(&mut self, reveal: &RevealRecord) -> Result<()>;
}

/// Commit a batch of records, publish it, and pair the result with identities
pub fn mint_batch<S: MintSubmitter + ?Sized>(
    submitter: &mut S,
    schema: &Schema,
    records: &[MetadataRecord],
    max_parallelism: usize,
) -> Result<Vec<MintedItem>> {
    let pending = commit_batch(schema, records, max_parallelism)?;
    let hashes: Vec<CommitmentHash> = pending.iter().map(|p| p.commitment.hash).collect();

    let ids = submitter.submit_commitments(&hashes)?;
    let minted = assign_identities(pending, &ids)?;

    info!("Minted {} items", minted.len());
    Ok(minted)
}

/// Publish the reveal of a minted item
pub fn reveal_item<S: MintSubmitter + ?Sized>(submitter: &mut S, item: &MintedItem) -> Result<()> {
    submitter.submit_reveal(&item.reveal_record())
}
