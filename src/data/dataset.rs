//! Dataset documents: the raw datastore envelope saved by the fetch script
//! and the canonical dataset written by `merlion normalize`.
//! The datastore API is queried once with limit=10000 (no pagination loop);
//! the saved response is the normalizer's only input.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::record::{CanonicalRecord, FieldDescriptor, RawRecord};

/// Where the fetch script drops the verbatim datastore response.
pub const DEFAULT_UPSTREAM_DATASET_PATH: &str = "data/upstream/datastore_search.json";
/// Canonical dataset written by the normalizer, loaded at server startup.
pub const DEFAULT_CANONICAL_DATASET_PATH: &str = "data/resale/resale.canonical.json";

/// Fields + raw rows as published by the datastore.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDataset {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    pub records: Vec<RawRecord>,
}

/// The full datastore_search response wraps the dataset in a `result` key.
#[derive(Debug, Deserialize)]
struct DatastoreEnvelope {
    result: RawDataset,
}

/// Canonical dataset file (MERLION schema). Written by the normalizer,
/// read-only afterwards. Provenance fields follow the upstream snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalDataset {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub source_note: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    pub records: Vec<CanonicalRecord>,
}

/// Parse a saved datastore response. Accepts both the wrapped shape
/// (`{"result": {"fields": .., "records": ..}}`) and an already-unwrapped
/// `{"fields": .., "records": ..}` document.
pub fn parse_datastore_envelope(raw: &str) -> Result<RawDataset, serde_json::Error> {
    match serde_json::from_str::<DatastoreEnvelope>(raw) {
        Ok(envelope) => Ok(envelope.result),
        Err(_) => serde_json::from_str::<RawDataset>(raw),
    }
}

/// Load the raw dataset from a saved datastore response file.
pub fn load_raw_dataset(path: impl AsRef<Path>) -> Result<RawDataset, std::io::Error> {
    let raw = fs::read_to_string(path)?;
    parse_datastore_envelope(&raw).map_err(std::io::Error::other)
}

/// Load a canonical dataset file.
pub fn load_canonical_dataset(path: impl AsRef<Path>) -> Result<CanonicalDataset, std::io::Error> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(std::io::Error::other)
}

/// Write a canonical dataset file, creating parent directories as needed.
pub fn write_canonical_dataset(
    path: impl AsRef<Path>,
    dataset: &CanonicalDataset,
) -> Result<(), std::io::Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string_pretty(dataset).map_err(std::io::Error::other)?;
    fs::write(path, payload)
}
