use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes one comma-separated row of member labels per cluster.
pub fn write_clusters<W: Write>(
    clusters: &[Vec<String>],
    writer: W,
) -> Result<(), ClusterIoError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    for cluster in clusters {
        csv_writer.write_record(cluster)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_clusters_to_path<P: AsRef<Path>>(
    clusters: &[Vec<String>],
    path: P,
) -> Result<(), ClusterIoError> {
    let file = File::create(path)?;
    write_clusters(clusters, BufWriter::new(file))
}
