use super::config::ConfigError;
use crate::core::distances::InternError;
use crate::core::io::alignment::AlignmentReadError;
use crate::core::io::cache::CacheError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to list alignment files under '{path}': {source}", path = path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Read(#[from] AlignmentReadError),

    #[error(transparent)]
    Intern(#[from] InternError),

    #[error("Failed to start ingestion workers: {0}")]
    WorkerPool(String),

    #[error("Distance aggregator stopped before all files were delivered")]
    AggregatorDisconnected,

    #[error("Distance aggregator panicked")]
    AggregatorPanicked,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Distance cache error for '{path}': {source}", path = path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: CacheError,
    },
}
