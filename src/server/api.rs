//! JSON payload builders for the API routes. Handlers read the startup
//! DatasetRegistry only; the pivot runs fresh on every trends request.

use std::fmt;

use serde::Serialize;

use crate::chart::export::pivot_to_csv_string;
use crate::chart::{pivot, FilterState};
use crate::data::registry::DatasetRegistry;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

#[derive(Debug)]
pub enum TrendsError {
    Validation(ValidationErrorResponse),
    Render(String),
}

impl fmt::Display for TrendsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(_) => write!(f, "invalid trends request"),
            Self::Render(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TrendsError {}

pub fn health_payload(registry: &DatasetRegistry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "merlion-api",
        "version": env!("CARGO_PKG_VERSION"),
        "records": registry.records().len(),
        "data_version": registry.data_version(),
    }))
}

pub fn fields_payload(registry: &DatasetRegistry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "fields": registry.fields() }))
}

pub fn towns_payload(registry: &DatasetRegistry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "towns": registry.towns() }))
}

pub fn flat_types_payload(registry: &DatasetRegistry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "flat_types": registry.flat_types() }))
}

/// Decode one percent-encoded query component ('+' counts as space).
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = bytes.get(i + 1..i + 3).and_then(|pair| {
                    std::str::from_utf8(pair)
                        .ok()
                        .and_then(|s| u8::from_str_radix(s, 16).ok())
                });
                match hex {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Look up a query parameter by name in a request path.
fn query_param(path: &str, name: &str) -> Option<String> {
    let query = path.split('?').nth(1)?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name {
            Some(decode_component(value))
        } else {
            None
        }
    })
}

/// Build the pivot filter from the trends query string.
///
/// `flat_type` is required and must be non-blank; `towns` is a
/// comma-separated list and may be empty or absent (an empty selection is a
/// valid, empty chart). Unknown values are not rejected here; they simply
/// match no records.
pub fn trends_filter_from_path(path: &str) -> Result<FilterState, ValidationErrorResponse> {
    let flat_type = query_param(path, "flat_type").unwrap_or_default();
    if flat_type.trim().is_empty() {
        return Err(ValidationErrorResponse {
            status: "error",
            message: "Validation failed",
            errors: vec![ValidationIssue {
                field: "flat_type",
                messages: vec!["flat_type query parameter is required".to_string()],
            }],
        });
    }

    let towns = query_param(path, "towns").unwrap_or_default();
    let areas = towns
        .split(',')
        .map(str::trim)
        .filter(|town| !town.is_empty())
        .map(str::to_string);
    Ok(FilterState::new(flat_type.trim(), areas))
}

pub fn trends_payload(path: &str, registry: &DatasetRegistry) -> Result<String, TrendsError> {
    let filter = trends_filter_from_path(path).map_err(TrendsError::Validation)?;
    let result = pivot(registry.records(), &filter);
    serde_json::to_string_pretty(&result).map_err(|err| TrendsError::Render(err.to_string()))
}

pub fn trends_csv_payload(path: &str, registry: &DatasetRegistry) -> Result<String, TrendsError> {
    let filter = trends_filter_from_path(path).map_err(TrendsError::Validation)?;
    let result = pivot(registry.records(), &filter);
    pivot_to_csv_string(&result).map_err(|err| TrendsError::Render(err.to_string()))
}
