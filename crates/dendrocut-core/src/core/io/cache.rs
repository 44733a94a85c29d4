use crate::core::distances::DistanceTable;
use crate::core::models::ids::LabelId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported cache format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Corrupt distance cache: {0}")]
    Corrupt(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    a: LabelId,
    b: LabelId,
    // Non-finite distances have no JSON representation and are restored as absent.
    distance: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    labels: Vec<String>,
    entries: Vec<CacheEntry>,
}

/// Serializes the interner mapping and every stored distance of `table`.
pub fn write_cache<W: Write>(table: &DistanceTable, writer: W) -> Result<(), CacheError> {
    let cache = CacheFile {
        version: CACHE_FORMAT_VERSION,
        labels: table.interner().labels().to_vec(),
        entries: table
            .entries()
            .map(|(a, b, distance)| CacheEntry {
                a,
                b,
                distance: distance.is_finite().then_some(distance),
            })
            .collect(),
    };
    serde_json::to_writer(writer, &cache)?;
    Ok(())
}

/// Rebuilds a table written by [`write_cache`], preserving every label's id.
pub fn read_cache<R: Read>(reader: R) -> Result<DistanceTable, CacheError> {
    let cache: CacheFile = serde_json::from_reader(reader)?;
    if cache.version != CACHE_FORMAT_VERSION {
        return Err(CacheError::UnsupportedVersion {
            found: cache.version,
            expected: CACHE_FORMAT_VERSION,
        });
    }

    let mut table = DistanceTable::with_capacity(cache.labels.len());
    for (index, label) in cache.labels.iter().enumerate() {
        let id = table
            .intern(label)
            .map_err(|e| CacheError::Corrupt(e.to_string()))?;
        if id.index() != index {
            return Err(CacheError::Corrupt(format!(
                "label '{}' appears more than once",
                label
            )));
        }
    }

    let label_count = cache.labels.len();
    for entry in cache.entries {
        if entry.a.index() >= label_count || entry.b.index() >= label_count {
            return Err(CacheError::Corrupt(format!(
                "entry ({}, {}) refers to an unknown label ({} labels cached)",
                entry.a, entry.b, label_count
            )));
        }
        if let Some(distance) = entry.distance {
            table.set(entry.a, entry.b, distance);
        }
    }
    Ok(table)
}

pub fn write_cache_to_path<P: AsRef<Path>>(
    table: &DistanceTable,
    path: P,
) -> Result<(), CacheError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_cache(table, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_cache_from_path<P: AsRef<Path>>(path: P) -> Result<DistanceTable, CacheError> {
    let file = File::open(path)?;
    read_cache(BufReader::new(file))
}
