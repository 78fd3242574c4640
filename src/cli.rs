use std::env;

use crate::chart::export::pivot_to_csv_string;
use crate::chart::{pivot, FilterState};
use crate::data::dataset::{
    load_canonical_dataset, load_raw_dataset, write_canonical_dataset, CanonicalDataset,
    DEFAULT_CANONICAL_DATASET_PATH, DEFAULT_UPSTREAM_DATASET_PATH,
};
use crate::data::normalize::normalize_records;
use crate::data::validate::validate_dataset_file;
use crate::server;

const SOURCE_NOTE: &str = "data.gov.sg datastore_search snapshot (limit 10000)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Normalize,
    Pivot,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("normalize") => Some(Command::Normalize),
        Some("pivot") => Some(Command::Pivot),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Normalize) => handle_normalize(args),
        Some(Command::Pivot) => handle_pivot(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("usage: merlion <serve|normalize|pivot|validate>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("MERLION_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_normalize(args: &[String]) -> i32 {
    let input = positional(args, 2).unwrap_or(DEFAULT_UPSTREAM_DATASET_PATH);
    let output = positional(args, 3).unwrap_or(DEFAULT_CANONICAL_DATASET_PATH);

    let raw = match load_raw_dataset(input) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("normalize failed: unable to load '{input}': {err}");
            return 1;
        }
    };

    let record_count = raw.records.len();
    let dataset = CanonicalDataset {
        data_version: Some(data_version()),
        source_note: Some(SOURCE_NOTE.to_string()),
        fields: raw.fields,
        records: normalize_records(&raw.records),
    };

    if let Err(err) = write_canonical_dataset(output, &dataset) {
        eprintln!("normalize failed: unable to write '{output}': {err}");
        return 1;
    }

    println!("normalized {record_count} records: {input} -> {output}");
    0
}

fn handle_pivot(args: &[String]) -> i32 {
    let Some(flat_type) = positional(args, 2) else {
        eprintln!("usage: merlion pivot <flat_type> [towns,comma,separated] [dataset.json] [--csv]");
        return 2;
    };
    let towns = positional(args, 3).unwrap_or("");
    let path = positional(args, 4).unwrap_or(DEFAULT_CANONICAL_DATASET_PATH);
    let as_csv = args.iter().any(|arg| arg == "--csv");

    let dataset = match load_canonical_dataset(path) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("pivot failed: unable to load '{path}': {err}");
            return 1;
        }
    };

    let areas = towns
        .split(',')
        .map(str::trim)
        .filter(|town| !town.is_empty())
        .map(str::to_string);
    let filter = FilterState::new(flat_type, areas);
    let result = pivot(&dataset.records, &filter);

    if as_csv {
        match pivot_to_csv_string(&result) {
            Ok(payload) => print!("{payload}"),
            Err(err) => {
                eprintln!("failed to render pivot result as csv: {err}");
                return 1;
            }
        }
    } else {
        match serde_json::to_string_pretty(&result) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize pivot result: {err}");
                return 1;
            }
        }
    }

    0
}

fn handle_validate(args: &[String]) -> i32 {
    let path = positional(args, 2).unwrap_or(DEFAULT_CANONICAL_DATASET_PATH);

    match validate_dataset_file(path) {
        Ok(report) if report.diagnostics.is_empty() => {
            println!("validation passed: {path}");
            0
        }
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            if report.has_errors() {
                eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
                1
            } else {
                println!(
                    "validation passed with {} warning(s): {path}",
                    report.diagnostics.len()
                );
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

/// Positional argument lookup that skips over `--flags`.
fn positional(args: &[String], index: usize) -> Option<&str> {
    args.iter()
        .skip(2)
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
        .nth(index - 2)
}

/// Snapshot version stamp: explicit override, or today's UTC date.
fn data_version() -> String {
    env::var("MERLION_DATA_VERSION")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string())
}
