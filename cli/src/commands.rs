//! Subcommand implementations
//!
//! Each command reads JSON files, calls into the core, and writes JSON back.

use std::fs::File;
use std::path::Path;
use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;

use blind_mint_core::batch::{assign_identities, commit_batch, register_minted, MintedItem, PendingMint};
use blind_mint_core::codec::{encode_field, encode_value};
use blind_mint_core::utils::bytes_to_hex;
use blind_mint_core::{CoreConfig, FieldType, ItemId, MetadataRecord, RevealRecord, RevealRegistry};

/// Result of checking one reveal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealReport {
    /// Identity the reveal claimed
    pub id: ItemId,

    /// Whether the item moved to Revealed
    pub ok: bool,

    /// Failure reason, when not ok
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

fn load_config(path: &Path) -> Result<CoreConfig> {
    CoreConfig::from_file(path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// Encode a single value to hex
pub fn encode(type_label: &str, value: &str, prefixed: bool) -> Result<String> {
    let field_type: FieldType = type_label.parse()?;
    let bytes = if prefixed {
        encode_field(field_type, value)?
    } else {
        encode_value(field_type, value)?
    };

    Ok(bytes_to_hex(&bytes))
}

/// Commit every record in `records` and write pending mints to `out`
pub fn commit(config: &Path, records: &Path, out: &Path) -> Result<usize> {
    let config = load_config(config)?;
    let records: Vec<MetadataRecord> = read_json(records)?;

    let pending = commit_batch(&config.schema, &records, config.batch.max_parallelism)?;
    write_json(out, &pending)?;

    Ok(pending.len())
}

/// Pair pending mints with assigned identities and write minted items to `out`
pub fn assign(pending: &Path, ids: &[u64], out: &Path) -> Result<usize> {
    let pending: Vec<PendingMint> = read_json(pending)?;
    let ids: Vec<ItemId> = ids.iter().copied().map(ItemId).collect();

    let minted = assign_identities(pending, &ids)?;
    write_json(out, &minted)?;

    Ok(minted.len())
}

/// Check reveals against minted items, in file order
pub fn verify(config: &Path, minted: &Path, reveals: &Path) -> Result<Vec<RevealReport>> {
    let config = load_config(config)?;
    let minted: Vec<MintedItem> = read_json(minted)?;
    let reveals: Vec<RevealRecord> = read_json(reveals)?;

    let mut registry = RevealRegistry::new(config.schema);
    register_minted(&mut registry, &minted)?;

    Ok(reveals
        .into_iter()
        .map(|reveal| {
            let id = reveal.id;
            match registry.reveal(reveal) {
                Ok(_) => RevealReport { id, ok: true, error: None },
                Err(e) => RevealReport { id, ok: false, error: Some(e.to_string()) },
            }
        })
        .collect())
}
