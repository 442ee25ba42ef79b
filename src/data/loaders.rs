use crate::data::record::Record;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Sample dataset compiled into the binary, used when no file is given
pub const BUNDLED_DATASET: &str = include_str!("../../data/colleges.json");

/// Accepted top-level shapes: `{"tableData": [...]}` or a bare array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetShape {
    Wrapped,
    Bare,
}

impl DatasetShape {
    /// Decided by the first non-whitespace byte, so the record parse keeps
    /// serde's field and position in its error
    fn detect(bytes: &[u8]) -> Self {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'[') => DatasetShape::Bare,
            _ => DatasetShape::Wrapped,
        }
    }
}

#[derive(Deserialize)]
struct WrappedDataset {
    #[serde(rename = "tableData")]
    table_data: Vec<Record>,
}

fn parse_records<R: Read>(reader: R, shape: DatasetShape) -> serde_json::Result<Vec<Record>> {
    match shape {
        DatasetShape::Bare => serde_json::from_reader(reader),
        DatasetShape::Wrapped => {
            serde_json::from_reader::<_, WrappedDataset>(reader).map(|doc| doc.table_data)
        }
    }
}

/// Parse a dataset from a JSON string
pub fn load_dataset_str(json: &str) -> Result<Vec<Record>> {
    let shape = DatasetShape::detect(json.as_bytes());
    let records =
        parse_records(json.as_bytes(), shape).context("Failed to parse college dataset")?;
    ensure_unique_ids(&records)?;
    debug!(target: "dataset", "Parsed {} records", records.len());
    Ok(records)
}

/// Load a dataset from a JSON file
pub fn load_dataset_file<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let shape = DatasetShape::detect(
        reader
            .fill_buf()
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?,
    );
    let records = parse_records(reader, shape)
        .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;
    ensure_unique_ids(&records)?;

    info!(
        target: "dataset",
        "Loaded {} records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Load the sample dataset shipped with the binary
pub fn load_bundled_dataset() -> Result<Vec<Record>> {
    let records = load_dataset_str(BUNDLED_DATASET).context("Bundled dataset is invalid")?;
    info!(target: "dataset", "Loaded {} bundled records", records.len());
    Ok(records)
}

/// Row identity must be unique for stable keying
fn ensure_unique_ids(records: &[Record]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            bail!(
                "Duplicate record id {} ({}) in dataset",
                record.id,
                record.name()
            );
        }
    }
    Ok(())
}
