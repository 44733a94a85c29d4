use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;

/// Threshold used to cut the tree when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.097702;

/// Batches the aggregator channel holds per worker before readers block.
const CHANNEL_SLOTS_PER_WORKER: usize = 2;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub alignment_dir: PathBuf,
    pub parallelism: usize,
    pub channel_capacity: usize,
}

#[derive(Default)]
pub struct IngestConfigBuilder {
    alignment_dir: Option<PathBuf>,
    parallelism: Option<usize>,
    channel_capacity: Option<usize>,
}

impl IngestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignment_dir(mut self, path: PathBuf) -> Self {
        self.alignment_dir = Some(path);
        self
    }
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }
    pub fn channel_capacity(mut self, batches: usize) -> Self {
        self.channel_capacity = Some(batches);
        self
    }

    pub fn build(self) -> Result<IngestConfig, ConfigError> {
        let alignment_dir = self
            .alignment_dir
            .ok_or(ConfigError::MissingParameter("alignment_dir"))?;
        let parallelism = self.parallelism.unwrap_or_else(default_parallelism);
        if parallelism == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "parallelism",
                reason: "at least one worker is required".to_string(),
            });
        }
        let channel_capacity = self
            .channel_capacity
            .unwrap_or(parallelism * CHANNEL_SLOTS_PER_WORKER);
        if channel_capacity == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "channel_capacity",
                reason: "the aggregator channel must hold at least one batch".to_string(),
            });
        }
        Ok(IngestConfig {
            alignment_dir,
            parallelism,
            channel_capacity,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub threshold: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ClusterConfig {
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "threshold",
                reason: format!("must be a finite number, got {}", threshold),
            });
        }
        Ok(Self { threshold })
    }
}

/// Where the distance table for a clustering run comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceSource {
    /// Ingest a directory of alignment summaries.
    Alignments(IngestConfig),
    /// Load a table previously written with [`crate::core::io::cache::write_cache`].
    Cache(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringConfig {
    pub source: DistanceSource,
    pub cluster: ClusterConfig,
}

#[derive(Default)]
pub struct ClusteringConfigBuilder {
    source: Option<DistanceSource>,
    threshold: Option<f64>,
}

impl ClusteringConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: DistanceSource) -> Self {
        self.source = Some(source);
        self
    }
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn build(self) -> Result<ClusteringConfig, ConfigError> {
        let source = self
            .source
            .ok_or(ConfigError::MissingParameter("source"))?;
        let cluster = match self.threshold {
            Some(threshold) => ClusterConfig::new(threshold)?,
            None => ClusterConfig::default(),
        };
        Ok(ClusteringConfig { source, cluster })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_builder_applies_defaults() {
        let config = IngestConfigBuilder::new()
            .alignment_dir(PathBuf::from("/data/astral"))
            .parallelism(4)
            .build()
            .unwrap();

        assert_eq!(config.alignment_dir, PathBuf::from("/data/astral"));
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.channel_capacity, 8);
    }

    #[test]
    fn ingest_builder_defaults_parallelism_to_available_cores() {
        let config = IngestConfigBuilder::new()
            .alignment_dir(PathBuf::from("aligns"))
            .build()
            .unwrap();
        assert_eq!(config.parallelism, default_parallelism());
        assert!(config.parallelism >= 1);
    }

    #[test]
    fn ingest_builder_requires_directory() {
        let result = IngestConfigBuilder::new().parallelism(2).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("alignment_dir")));
    }

    #[test]
    fn ingest_builder_rejects_zero_workers_and_zero_capacity() {
        let zero_workers = IngestConfigBuilder::new()
            .alignment_dir(PathBuf::from("a"))
            .parallelism(0)
            .build();
        assert!(matches!(
            zero_workers,
            Err(ConfigError::InvalidParameter {
                name: "parallelism",
                ..
            })
        ));

        let zero_capacity = IngestConfigBuilder::new()
            .alignment_dir(PathBuf::from("a"))
            .channel_capacity(0)
            .build();
        assert!(matches!(
            zero_capacity,
            Err(ConfigError::InvalidParameter {
                name: "channel_capacity",
                ..
            })
        ));
    }

    #[test]
    fn clustering_builder_uses_default_threshold() {
        let config = ClusteringConfigBuilder::new()
            .source(DistanceSource::Cache(PathBuf::from("d.json")))
            .build()
            .unwrap();
        assert_eq!(config.cluster.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn clustering_builder_requires_source() {
        let result = ClusteringConfigBuilder::new().threshold(0.1).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("source")));
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let result = ClusteringConfigBuilder::new()
            .source(DistanceSource::Cache(PathBuf::from("d.json")))
            .threshold(f64::NAN)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "threshold",
                ..
            })
        ));
    }
}
