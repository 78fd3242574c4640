//! merlion: resale price trend explorer for the public housing dataset.
//!
//! Pipeline: a saved datastore snapshot is normalized into canonical records
//! (`data::normalize`), loaded once into a read-only registry
//! (`data::registry`), and pivoted per request into aligned per-town time
//! series (`chart`) served to the browser console (`server`).

pub mod chart;
pub mod cli;
pub mod data;
pub mod server;
