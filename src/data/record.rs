//! Resale transaction records: raw datastore rows and their canonical form.
//! Raw rows come straight from the datastore API; canonical rows are written
//! by the normalizer and are the only shape the pivot pipeline reads.

use serde::{Deserialize, Serialize};

/// Price value meaning "no transaction recorded". The datastore publishes
/// `"-"` or `"na"` for quarters without a sale; the normalizer maps both to
/// this sentinel and the pivot turns it into a chart gap.
pub const PRICE_MISSING: i64 = 0;

/// Column descriptor from the datastore response, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One row as delivered by the datastore API. `price` stays a string here:
/// the feed mixes numeric strings with `"-"` and `"na"` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub town: String,
    pub flat_type: String,
    pub quarter: String,
    #[serde(rename = "_id")]
    pub id: i64,
    pub price: String,
}

/// A resale transaction after town/flat-type bucketing and price coercion.
///
/// Invariants (checked by `data::validate`):
/// - `town` and `flat_type` are upper-cased; `CENTRAL*` towns collapse to
///   `CENTRAL`, `EXEC*` flat types collapse to `EXEC`.
/// - `price >= 0`, with [`PRICE_MISSING`] reserved for "no transaction".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub town: String,
    pub flat_type: String,
    pub quarter: String,
    #[serde(rename = "_id")]
    pub id: i64,
    pub price: i64,
}

impl CanonicalRecord {
    /// True when this record carries no usable price.
    pub fn price_is_missing(&self) -> bool {
        self.price == PRICE_MISSING
    }
}
