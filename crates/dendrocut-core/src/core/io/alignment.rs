use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of tab-separated fields in a well-formed alignment-summary row.
pub const RECORD_FIELDS: usize = 9;
/// Separator between the two structure names in the pair identifier.
pub const PAIR_SEPARATOR: &str = ".ent_";
/// Length of the fixed suffix trailing the second structure name.
pub const SECOND_LABEL_SUFFIX_LEN: usize = 5;

const PAIR_FIELD: usize = 0;
const CORE_LENGTH_FIELD: usize = 1;
const RMSD_FIELD: usize = 2;
const LENGTH1_FIELD: usize = 7;
const LENGTH2_FIELD: usize = 8;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum RecordError {
    #[error("Expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error(
        "Invalid alignment pair '{value}': expected '<label1>{sep}<label2>' \
         and a {len}-character suffix",
        sep = PAIR_SEPARATOR,
        len = SECOND_LABEL_SUFFIX_LEN
    )]
    InvalidPair { value: String },
    #[error("Expected a number in field {field}, but got '{value}'")]
    InvalidNumber { field: usize, value: String },
}

#[derive(Debug, Error)]
pub enum AlignmentReadError {
    #[error("Failed to read alignment file '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed tab-separated data in '{path}': {source}", path = path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid record on line {line} of '{path}': {source}", path = path.display())]
    Record {
        path: PathBuf,
        line: u64,
        #[source]
        source: RecordError,
    },
}

/// The summary statistics of one structural alignment between two domains.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSummary {
    pub first: String,
    pub second: String,
    pub core_length: f64,
    pub rmsd: f64,
    pub length1: f64,
    pub length2: f64,
}

/// A distance between two labels, with `first <= second` lexicographically.
#[derive(Debug, Clone, PartialEq)]
pub struct PairDistance {
    pub first: String,
    pub second: String,
    pub distance: f64,
}

/// All pairs parsed from one alignment file.
#[derive(Debug, Clone, Default)]
pub struct FileDistances {
    pub path: PathBuf,
    pub pairs: Vec<PairDistance>,
    pub skipped_rows: usize,
}

/// Converts alignment statistics into a distance.
///
/// ```text
/// coreval = 2 * core_length / (length1 + length2)
/// raw     = -6.04979701 * (rmsd - coreval * core_length * 0.155 + 1.6018) + 1000
/// dist    = 100 / raw
/// ```
///
/// Degenerate inputs are not guarded: a negative `raw` yields a negative distance and zero
/// lengths yield `NaN`.
pub fn alignment_distance(core_length: f64, rmsd: f64, length1: f64, length2: f64) -> f64 {
    let coreval = (2.0 * core_length) / (length1 + length2);
    let raw = -6.04979701 * (rmsd - coreval * core_length * 0.155 + 1.6018) + 1000.0;
    (1.0 / raw) * 100.0
}

/// Splits `"<label1>.ent_<label2>XXXXX"` into its two labels.
pub fn parse_pair_identifier(value: &str) -> Result<(String, String), RecordError> {
    let invalid = || RecordError::InvalidPair {
        value: value.to_string(),
    };

    let (first, rest) = value.split_once(PAIR_SEPARATOR).ok_or_else(invalid)?;
    let suffix_start = rest
        .char_indices()
        .rev()
        .nth(SECOND_LABEL_SUFFIX_LEN - 1)
        .map(|(idx, _)| idx)
        .ok_or_else(invalid)?;

    Ok((first.to_string(), rest[..suffix_start].to_string()))
}

impl AlignmentSummary {
    pub fn from_fields(fields: &[&str]) -> Result<Self, RecordError> {
        if fields.len() != RECORD_FIELDS {
            return Err(RecordError::FieldCount {
                expected: RECORD_FIELDS,
                found: fields.len(),
            });
        }

        let number = |field: usize| -> Result<f64, RecordError> {
            let value = fields[field];
            value.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
                field,
                value: value.to_string(),
            })
        };

        let (first, second) = parse_pair_identifier(fields[PAIR_FIELD])?;
        Ok(Self {
            first,
            second,
            core_length: number(CORE_LENGTH_FIELD)?,
            rmsd: number(RMSD_FIELD)?,
            length1: number(LENGTH1_FIELD)?,
            length2: number(LENGTH2_FIELD)?,
        })
    }

    pub fn distance(&self) -> f64 {
        alignment_distance(self.core_length, self.rmsd, self.length1, self.length2)
    }

    pub fn into_pair_distance(self) -> PairDistance {
        let distance = self.distance();
        let (first, second) = if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        };
        PairDistance {
            first,
            second,
            distance,
        }
    }
}

/// Parses one row into a canonically ordered pair.
pub fn parse_record(fields: &[&str]) -> Result<PairDistance, RecordError> {
    AlignmentSummary::from_fields(fields).map(AlignmentSummary::into_pair_distance)
}

/// Parses every well-formed row of a tab-separated alignment summary.
///
/// Rows with a field count other than [`RECORD_FIELDS`] are counted and skipped. Rows with
/// the right shape but unusable contents are errors.
pub fn read_alignment_distances(
    reader: impl Read,
    path: &Path,
) -> Result<FileDistances, AlignmentReadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut batch = FileDistances {
        path: path.to_path_buf(),
        ..FileDistances::default()
    };

    for result in csv_reader.records() {
        let record = result.map_err(|source| AlignmentReadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() != RECORD_FIELDS {
            batch.skipped_rows += 1;
            continue;
        }

        let fields: Vec<&str> = record.iter().map(str::trim_start).collect();
        let pair = parse_record(&fields).map_err(|source| AlignmentReadError::Record {
            path: path.to_path_buf(),
            line: record.position().map_or(0, |p| p.line()),
            source,
        })?;
        batch.pairs.push(pair);
    }

    Ok(batch)
}

pub fn read_alignment_file(path: &Path) -> Result<FileDistances, AlignmentReadError> {
    let file = File::open(path).map_err(|source| AlignmentReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_alignment_distances(file, path)
}
