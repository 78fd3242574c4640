//! Pivot canonical records into per-town price-trend series for the chart
//! console. Filter by flat type and town set, discover the quarter axis,
//! align each town onto it, drop empty series, sort for display.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::data::record::CanonicalRecord;

pub mod export;

/// Chart filter selection: one flat-type bucket and a set of towns. Owned by
/// the UI, read-only here. Values outside the canonical sets match nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub room_type: String,
    pub areas: HashSet<String>,
}

impl FilterState {
    pub fn new(room_type: impl Into<String>, areas: impl IntoIterator<Item = String>) -> Self {
        FilterState {
            room_type: room_type.into(),
            areas: areas.into_iter().collect(),
        }
    }
}

/// One town's values aligned to the shared quarter axis. `None` marks a
/// quarter with no usable price; `connectNulls` tells the charting consumer
/// to draw through those gaps instead of breaking the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub name: String,
    pub kind: &'static str,
    pub values: Vec<Option<i64>>,
    #[serde(rename = "connectNulls")]
    pub connect_nulls: bool,
}

/// Chart-ready pivot output: shared axis, plotted series, legend entries in
/// series order. Recomputed from scratch on every filter or dataset change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PivotResult {
    pub quarters: Vec<String>,
    pub series: Vec<TimeSeries>,
    pub legend: Vec<String>,
}

/// Pivot the filtered subset of `records` into aligned per-town series.
///
/// The axis is the sorted distinct quarter set of the *filtered* records, so
/// it shrinks when fewer towns or types are selected. A town with more than
/// one record in a quarter keeps the first one in dataset order; a sentinel
/// price (0) is indistinguishable from an absent quarter. Towns whose every
/// aligned value is missing are dropped. An empty selection yields the empty
/// result, never an error.
pub fn pivot(records: &[CanonicalRecord], filter: &FilterState) -> PivotResult {
    let filtered: Vec<&CanonicalRecord> = records
        .iter()
        .filter(|r| r.flat_type == filter.room_type && filter.areas.contains(&r.town))
        .collect();

    let axis: BTreeSet<&str> = filtered.iter().map(|r| r.quarter.as_str()).collect();
    let quarters: Vec<String> = axis.iter().map(|q| q.to_string()).collect();

    // BTreeMap keys give the alphabetical series order for free; pushes keep
    // dataset order within a town, which is what makes "first wins" hold.
    let mut by_town: BTreeMap<&str, Vec<&CanonicalRecord>> = BTreeMap::new();
    for &record in &filtered {
        by_town.entry(record.town.as_str()).or_default().push(record);
    }

    let mut series = Vec::new();
    for (town, group) in &by_town {
        let values: Vec<Option<i64>> = axis
            .iter()
            .map(|quarter| {
                group
                    .iter()
                    .find(|r| r.quarter == *quarter)
                    .and_then(|r| if r.price_is_missing() { None } else { Some(r.price) })
            })
            .collect();

        if values.iter().all(Option::is_none) {
            continue;
        }
        series.push(TimeSeries {
            name: town.to_string(),
            kind: "line",
            values,
            connect_nulls: true,
        });
    }

    let legend = series.iter().map(|s| s.name.clone()).collect();
    PivotResult {
        quarters,
        series,
        legend,
    }
}
