use merlion::chart::{pivot, FilterState};
use merlion::data::normalize::normalize_records;
use merlion::data::record::{CanonicalRecord, RawRecord};

fn record(town: &str, flat_type: &str, quarter: &str, price: i64) -> CanonicalRecord {
    CanonicalRecord {
        town: town.to_string(),
        flat_type: flat_type.to_string(),
        quarter: quarter.to_string(),
        id: 0,
        price,
    }
}

fn filter(room_type: &str, areas: &[&str]) -> FilterState {
    FilterState::new(room_type, areas.iter().map(|s| s.to_string()))
}

#[test]
fn quarters_axis_is_strictly_sorted_without_duplicates() {
    let records = vec![
        record("BEDOK", "EXEC", "2021-Q3", 1),
        record("YISHUN", "EXEC", "2020-Q1", 2),
        record("BEDOK", "EXEC", "2020-Q1", 3),
        record("YISHUN", "EXEC", "2020-Q4", 4),
    ];
    let result = pivot(&records, &filter("EXEC", &["BEDOK", "YISHUN"]));
    assert_eq!(result.quarters, ["2020-Q1", "2020-Q4", "2021-Q3"]);
}

#[test]
fn every_series_is_aligned_to_the_axis_length() {
    let records = vec![
        record("BEDOK", "EXEC", "2020-Q1", 1),
        record("BEDOK", "EXEC", "2020-Q2", 2),
        record("YISHUN", "EXEC", "2020-Q3", 3),
    ];
    let result = pivot(&records, &filter("EXEC", &["BEDOK", "YISHUN"]));
    assert_eq!(result.quarters.len(), 3);
    for series in &result.series {
        assert_eq!(series.values.len(), result.quarters.len(), "series {}", series.name);
    }
}

#[test]
fn series_are_sorted_by_name_and_legend_mirrors_them() {
    let records = vec![
        record("YISHUN", "EXEC", "2020-Q1", 1),
        record("BEDOK", "EXEC", "2020-Q1", 2),
        record("CENTRAL", "EXEC", "2020-Q1", 3),
    ];
    let result = pivot(&records, &filter("EXEC", &["YISHUN", "BEDOK", "CENTRAL"]));
    let names: Vec<&str> = result.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["BEDOK", "CENTRAL", "YISHUN"]);
    assert_eq!(result.legend, names);
}

#[test]
fn no_surviving_series_is_all_null() {
    let records = vec![
        record("BEDOK", "EXEC", "2020-Q1", 0),
        record("YISHUN", "EXEC", "2020-Q1", 5),
        record("YISHUN", "EXEC", "2020-Q2", 0),
    ];
    let result = pivot(&records, &filter("EXEC", &["BEDOK", "YISHUN"]));
    for series in &result.series {
        assert!(
            series.values.iter().any(Option::is_some),
            "series {} should have been pruned",
            series.name
        );
    }
}

#[test]
fn records_of_other_flat_types_and_towns_are_dropped_silently() {
    let records = vec![
        record("BEDOK", "EXEC", "2020-Q1", 1),
        record("BEDOK", "3 ROOM", "2020-Q1", 2),
        record("PUNGGOL", "EXEC", "2020-Q1", 3),
    ];
    let result = pivot(&records, &filter("EXEC", &["BEDOK"]));
    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].values, [Some(1)]);
}

// Scenario A from the observed behavior: normalization feeds the pivot; the
// town with only an "na" price is pruned.
#[test]
fn normalized_records_pivot_end_to_end() {
    let raw = vec![
        RawRecord {
            town: "Central Area".to_string(),
            flat_type: "Executive".to_string(),
            quarter: "2020-Q1".to_string(),
            id: 1,
            price: "500000".to_string(),
        },
        RawRecord {
            town: "Bedok".to_string(),
            flat_type: "Executive".to_string(),
            quarter: "2020-Q1".to_string(),
            id: 2,
            price: "na".to_string(),
        },
    ];
    let records = normalize_records(&raw);
    let result = pivot(&records, &filter("EXEC", &["CENTRAL", "BEDOK"]));

    assert_eq!(result.quarters, ["2020-Q1"]);
    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].name, "CENTRAL");
    assert_eq!(result.series[0].values, [Some(500_000)]);
    assert_eq!(result.legend, ["CENTRAL"]);
}

// Scenario B: an empty town selection yields the empty result, whatever the
// dataset holds.
#[test]
fn empty_town_selection_yields_empty_result() {
    let records = vec![
        record("BEDOK", "EXEC", "2020-Q1", 1),
        record("YISHUN", "3 ROOM", "2020-Q2", 2),
    ];
    let result = pivot(&records, &filter("EXEC", &[]));
    assert!(result.quarters.is_empty());
    assert!(result.series.is_empty());
    assert!(result.legend.is_empty());
}

#[test]
fn unknown_room_type_yields_empty_result() {
    let records = vec![record("BEDOK", "EXEC", "2020-Q1", 1)];
    let result = pivot(&records, &filter("5 ROOM", &["BEDOK"]));
    assert!(result.series.is_empty());
}

// Scenario C: disjoint quarters produce a merged axis with gaps on both
// sides.
#[test]
fn disjoint_quarters_gap_fill_with_nulls() {
    let records = vec![
        record("BEDOK", "EXEC", "2020-Q1", 100),
        record("YISHUN", "EXEC", "2020-Q2", 200),
    ];
    let result = pivot(&records, &filter("EXEC", &["BEDOK", "YISHUN"]));

    assert_eq!(result.quarters, ["2020-Q1", "2020-Q2"]);
    assert_eq!(result.series[0].name, "BEDOK");
    assert_eq!(result.series[0].values, [Some(100), None]);
    assert_eq!(result.series[1].name, "YISHUN");
    assert_eq!(result.series[1].values, [None, Some(200)]);
}

#[test]
fn duplicate_quarter_within_a_town_keeps_the_first_record() {
    let records = vec![
        record("BEDOK", "EXEC", "2020-Q1", 111),
        record("BEDOK", "EXEC", "2020-Q1", 222),
        record("BEDOK", "EXEC", "2020-Q2", 333),
    ];
    let result = pivot(&records, &filter("EXEC", &["BEDOK"]));
    assert_eq!(result.series[0].values, [Some(111), Some(333)]);
}

#[test]
fn series_carry_chart_metadata() {
    let records = vec![record("BEDOK", "EXEC", "2020-Q1", 1)];
    let result = pivot(&records, &filter("EXEC", &["BEDOK"]));
    assert_eq!(result.series[0].kind, "line");
    assert!(result.series[0].connect_nulls);
}

#[test]
fn recompute_is_deterministic_for_identical_inputs() {
    let records = vec![
        record("BEDOK", "EXEC", "2020-Q1", 1),
        record("YISHUN", "EXEC", "2020-Q2", 2),
    ];
    let f = filter("EXEC", &["BEDOK", "YISHUN"]);
    assert_eq!(pivot(&records, &f), pivot(&records, &f));
}
