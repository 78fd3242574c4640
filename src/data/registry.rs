//! Startup-loaded dataset cache (DatasetRegistry) for the server and tools.
//! Load once, pass via Arc to handlers so no request re-reads the file. The
//! registry is read-only after load; pivoting stays a pure function of it.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::dataset::{
    load_canonical_dataset, CanonicalDataset, DEFAULT_CANONICAL_DATASET_PATH,
};
use crate::data::record::{CanonicalRecord, FieldDescriptor};

/// Read-only snapshot of the canonical dataset plus the distinct value lists
/// the listing endpoints serve. Built once, never mutated.
#[derive(Debug)]
pub struct DatasetRegistry {
    dataset: CanonicalDataset,
    towns: Vec<String>,
    flat_types: Vec<String>,
}

impl DatasetRegistry {
    /// Load the canonical dataset from the default path. Returns an Arc so it
    /// can be shared across the accept loop and any background work.
    pub fn load() -> Result<Arc<DatasetRegistry>, std::io::Error> {
        Self::load_from(DEFAULT_CANONICAL_DATASET_PATH)
    }

    /// Load from an explicit path (tools and tests).
    pub fn load_from(path: &str) -> Result<Arc<DatasetRegistry>, std::io::Error> {
        let dataset = load_canonical_dataset(path)?;
        Ok(Arc::new(Self::from_dataset(dataset)))
    }

    /// Build a registry from an in-memory dataset. Distinct town and
    /// flat-type lists are computed here, sorted and de-duplicated.
    pub fn from_dataset(dataset: CanonicalDataset) -> DatasetRegistry {
        let towns: BTreeSet<String> =
            dataset.records.iter().map(|r| r.town.clone()).collect();
        let flat_types: BTreeSet<String> =
            dataset.records.iter().map(|r| r.flat_type.clone()).collect();
        DatasetRegistry {
            dataset,
            towns: towns.into_iter().collect(),
            flat_types: flat_types.into_iter().collect(),
        }
    }

    /// All canonical records, in dataset order.
    pub fn records(&self) -> &[CanonicalRecord] {
        &self.dataset.records
    }

    /// Column descriptors passed through from the datastore.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.dataset.fields
    }

    /// Distinct town names, sorted ascending.
    pub fn towns(&self) -> &[String] {
        &self.towns
    }

    /// Distinct flat-type buckets, sorted ascending.
    pub fn flat_types(&self) -> &[String] {
        &self.flat_types
    }

    /// Snapshot provenance, when the normalizer stamped one.
    pub fn data_version(&self) -> Option<&str> {
        self.dataset.data_version.as_deref()
    }

    pub fn source_note(&self) -> Option<&str> {
        self.dataset.source_note.as_deref()
    }
}
