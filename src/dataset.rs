//! CSV ingestion
//!
//! Loads a comma-delimited file with a header row into a [`CaseBase`]:
//! rows holding the missing-value marker are dropped, configured columns are
//! removed, and an optional seeded sub-sample keeps the collection small.

use crate::presets::{INCOME_DROPPED_COLUMNS, INCOME_LABEL};
use casebase_core::{AttributeValue, CaseBase, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_MISSING_MARKER: &str = "?";
pub const DEFAULT_SEED: u64 = 42;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{0}' not found in header")]
    MissingColumn(String),

    #[error(transparent)]
    CaseBase(#[from] casebase_core::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// How raw rows become cases
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOptions {
    /// Label column; always read as categorical
    pub label: String,
    /// Cell content marking a missing value
    pub missing_marker: String,
    pub drop_columns: Vec<String>,
    /// Keep a random sample of this many rows; `None` keeps every row
    pub sample_rows: Option<usize>,
    pub seed: u64,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            label: INCOME_LABEL.to_string(),
            missing_marker: DEFAULT_MISSING_MARKER.to_string(),
            drop_columns: INCOME_DROPPED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            sample_rows: None,
            seed: DEFAULT_SEED,
        }
    }
}

pub fn load_path(path: impl AsRef<Path>, options: &DatasetOptions) -> Result<CaseBase> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    load(reader, options)
}

pub fn load_reader<R: Read>(reader: R, options: &DatasetOptions) -> Result<CaseBase> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    load(reader, options)
}

fn load<R: Read>(reader: csv::Reader<R>, options: &DatasetOptions) -> Result<CaseBase> {
    let table = read_table(reader, options)?;
    Ok(table.into_casebase(&options.label)?)
}

/// Read and clean rows into a table; row ids are 0-based positions in the file
pub fn read_table<R: Read>(mut reader: csv::Reader<R>, options: &DatasetOptions) -> Result<Table> {
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if !columns.contains(&options.label) {
        return Err(DatasetError::MissingColumn(options.label.clone()));
    }

    let mut rows: Vec<(u64, csv::StringRecord)> = Vec::new();
    let mut incomplete = 0usize;
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().any(|cell| cell == options.missing_marker) {
            incomplete += 1;
            continue;
        }
        rows.push((index as u64, record));
    }

    let numeric: Vec<bool> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| *name != options.label && rows.iter().all(|(_, r)| is_number(&r[i])))
        .collect();
    debug!(
        "Numeric columns: {:?}",
        columns
            .iter()
            .zip(&numeric)
            .filter(|(_, n)| **n)
            .map(|(c, _)| c.as_str())
            .collect::<Vec<_>>()
    );

    let mut table = Table::new(columns);
    for (id, record) in &rows {
        let values = record
            .iter()
            .zip(&numeric)
            .map(|(cell, &is_numeric)| {
                if is_numeric {
                    AttributeValue::parse(cell)
                } else {
                    AttributeValue::Category(cell.to_string())
                }
            })
            .collect();
        table.push_row(*id, values)?;
    }

    let dropped: Vec<&str> = options.drop_columns.iter().map(String::as_str).collect();
    table.drop_columns(&dropped);

    if let Some(n) = options.sample_rows {
        if n < table.len() {
            let mut rng = StdRng::seed_from_u64(options.seed);
            let picked = rand::seq::index::sample(&mut rng, table.len(), n).into_vec();
            table.select_rows(&picked);
        }
    }

    info!(
        "Loaded {} rows ({} dropped with missing values), {} columns",
        table.len(),
        incomplete,
        table.columns().len()
    );
    Ok(table)
}

fn is_number(cell: &str) -> bool {
    cell.parse::<f64>().map_or(false, f64::is_finite)
}
