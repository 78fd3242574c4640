//! Canonical-dataset invariant checks. Run after `merlion normalize` (or on
//! any hand-edited dataset) before serving it.

use std::collections::HashMap;
use std::fmt;

use crate::data::dataset::{load_canonical_dataset, CanonicalDataset};
use crate::data::normalize::normalize_record;
use crate::data::record::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// True when a quarter label has the zero-padded sortable shape `YYYY-QN`.
/// The pivot relies on lexicographic order of these labels.
fn quarter_label_is_sortable(quarter: &str) -> bool {
    let bytes = quarter.as_bytes();
    bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5] == b'Q'
        && bytes[6].is_ascii_digit()
}

/// Check every canonical invariant on an in-memory dataset.
///
/// Errors: a record whose town/flat-type re-normalizes to something else
/// (casing or bucketing drift), or a negative price. Warnings: quarter labels
/// that would not sort lexicographically, and duplicate
/// (town, flat_type, quarter) triples. Duplicates are legal for the pivot
/// (first record wins) but usually mean the upstream snapshot is off.
pub fn validate_dataset(dataset: &CanonicalDataset) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen: HashMap<(&str, &str, &str), usize> = HashMap::new();

    for (index, record) in dataset.records.iter().enumerate() {
        let context = format!("record #{index} (_id={})", record.id);

        let renormalized = normalize_record(&RawRecord {
            town: record.town.clone(),
            flat_type: record.flat_type.clone(),
            quarter: record.quarter.clone(),
            id: record.id,
            price: record.price.to_string(),
        });
        if renormalized.town != record.town {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("town '{}' is not canonical (expected '{}')", record.town, renormalized.town),
            );
        }
        if renormalized.flat_type != record.flat_type {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!(
                    "flat_type '{}' is not canonical (expected '{}')",
                    record.flat_type, renormalized.flat_type
                ),
            );
        }
        if record.price < 0 {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("price {} is negative", record.price),
            );
        }
        if !quarter_label_is_sortable(&record.quarter) {
            report.push(
                ValidationSeverity::Warning,
                &context,
                format!("quarter '{}' does not sort lexicographically", record.quarter),
            );
        }

        let key = (
            record.town.as_str(),
            record.flat_type.as_str(),
            record.quarter.as_str(),
        );
        if let Some(first) = seen.get(&key) {
            report.push(
                ValidationSeverity::Warning,
                &context,
                format!(
                    "duplicate of record #{first} for ({}, {}, {}); pivot keeps the first",
                    record.town, record.flat_type, record.quarter
                ),
            );
        } else {
            seen.insert(key, index);
        }
    }

    report
}

/// Load and validate a canonical dataset file.
pub fn validate_dataset_file(path: &str) -> Result<ValidationReport, String> {
    let dataset =
        load_canonical_dataset(path).map_err(|err| format!("unable to load '{path}': {err}"))?;
    Ok(validate_dataset(&dataset))
}
