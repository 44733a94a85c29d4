use super::config::IngestConfig;
use super::error::IngestError;
use super::progress::{Progress, ProgressReporter};
use crate::core::distances::{DistanceTable, InternError};
use crate::core::io::alignment::{FileDistances, read_alignment_file};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub files: usize,
    pub records: usize,
    pub skipped_rows: usize,
    /// Records whose pair already held a distance. The later record overwrote the earlier
    /// one, and which record came last depends on worker scheduling.
    pub duplicate_pairs: usize,
    pub labels: usize,
    pub stored_pairs: usize,
}

#[derive(Debug)]
pub struct IngestOutcome {
    pub table: DistanceTable,
    pub summary: IngestSummary,
}

#[derive(Debug, Default)]
struct AggregateTotals {
    files: usize,
    records: usize,
    skipped_rows: usize,
    duplicate_pairs: usize,
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Recursively lists every non-hidden file under `root`, sorted by path.
///
/// Only file names are checked for a leading `.`; directories are always descended.
/// Symbolic links are not followed into directories.
pub fn collect_alignment_files(root: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let discovery_error = |path: &Path, source| IngestError::Discovery {
        path: path.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| discovery_error(dir.as_path(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| discovery_error(dir.as_path(), e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| discovery_error(path.as_path(), e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if is_hidden(&path) {
                trace!("Skipping hidden file {}", path.display());
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Reads every alignment file under the configured directory into a [`DistanceTable`].
///
/// Files are parsed by a pool of `config.parallelism` workers. Each worker sends one batch
/// per file over a bounded channel to a single aggregator thread, which is the only writer
/// of the table. Workers block when the channel is full.
///
/// The first unreadable or malformed file aborts the run and no table is returned.
#[instrument(
    skip_all,
    name = "ingest_alignments",
    fields(dir = %config.alignment_dir.display())
)]
pub fn run(
    config: &IngestConfig,
    reporter: &ProgressReporter,
) -> Result<IngestOutcome, IngestError> {
    reporter.report(Progress::PhaseStart {
        name: "Discovering alignment files",
    });
    let files = collect_alignment_files(&config.alignment_dir)?;
    reporter.report(Progress::PhaseFinish);

    if files.is_empty() {
        warn!(
            "No alignment files found under {}.",
            config.alignment_dir.display()
        );
    }
    info!(
        "Reading {} alignment file(s) with {} worker(s).",
        files.len(),
        config.parallelism
    );

    reporter.report(Progress::FilesDiscovered {
        total: files.len() as u64,
    });

    let (sender, receiver) = mpsc::sync_channel(config.channel_capacity);
    let aggregator = thread::Builder::new()
        .name("distance-aggregator".to_string())
        .spawn(move || aggregate(receiver))
        .map_err(|e| IngestError::WorkerPool(e.to_string()))?;

    let read_result = read_files(&files, config.parallelism, sender, reporter);
    let aggregated = aggregator
        .join()
        .map_err(|_| IngestError::AggregatorPanicked)?;

    // An aggregator failure disconnects the channel, so it is the root cause of any
    // `AggregatorDisconnected` seen by the readers.
    let (table, totals) = match (read_result, aggregated) {
        (_, Err(e)) => return Err(e.into()),
        (Err(e), Ok(_)) => return Err(e),
        (Ok(()), Ok(done)) => done,
    };
    reporter.report(Progress::FilesFinished);

    let summary = IngestSummary {
        files: totals.files,
        records: totals.records,
        skipped_rows: totals.skipped_rows,
        duplicate_pairs: totals.duplicate_pairs,
        labels: table.label_count(),
        stored_pairs: table.stored_pairs(),
    };
    if summary.duplicate_pairs > 0 {
        warn!(
            "{} alignment record(s) repeated an already recorded pair; \
             the last one read was kept.",
            summary.duplicate_pairs
        );
    }
    info!(
        "Ingested {} record(s) from {} file(s): {} labels, {} stored pairs \
         ({} malformed rows skipped).",
        summary.records, summary.files, summary.labels, summary.stored_pairs, summary.skipped_rows
    );

    Ok(IngestOutcome { table, summary })
}

fn read_files(
    files: &[PathBuf],
    parallelism: usize,
    sender: SyncSender<FileDistances>,
    reporter: &ProgressReporter,
) -> Result<(), IngestError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .thread_name(|i| format!("alignment-reader-{}", i))
        .build()
        .map_err(|e| IngestError::WorkerPool(e.to_string()))?;

    pool.install(|| {
        files.par_iter().try_for_each_with(sender, |sender, path| {
            debug!("Reading {}", path.display());
            let batch = read_alignment_file(path)?;
            if batch.skipped_rows > 0 {
                debug!(
                    "Skipped {} row(s) without 9 fields in {}",
                    batch.skipped_rows,
                    path.display()
                );
            }
            let pairs = batch.pairs.len();
            sender
                .send(batch)
                .map_err(|_| IngestError::AggregatorDisconnected)?;
            reporter.report(Progress::FileRead { pairs });
            Ok(())
        })
    })
}

fn aggregate(
    receiver: Receiver<FileDistances>,
) -> Result<(DistanceTable, AggregateTotals), InternError> {
    let mut table = DistanceTable::new();
    let mut totals = AggregateTotals::default();

    for batch in receiver {
        totals.files += 1;
        totals.records += batch.pairs.len();
        totals.skipped_rows += batch.skipped_rows;

        for pair in batch.pairs {
            let a = table.intern(&pair.first)?;
            let b = table.intern(&pair.second)?;
            if table.get(a, b).is_some() {
                totals.duplicate_pairs += 1;
            }
            table.set(a, b, pair.distance);
        }
        trace!(
            "Aggregated {} (table now holds {} labels).",
            batch.path.display(),
            table.label_count()
        );
    }

    Ok((table, totals))
}
