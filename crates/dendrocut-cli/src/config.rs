use crate::cli::{CacheArgs, ClusterArgs};
use crate::error::{CliError, Result};
use dendrocut::engine::config::{
    ClusteringConfig, ClusteringConfigBuilder, DistanceSource, IngestConfig,
    IngestConfigBuilder,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Settings read from a TOML file. Command-line flags take precedence over every field.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    threshold: Option<f64>,
    threads: Option<usize>,
    #[serde(rename = "channel-capacity")]
    channel_capacity: Option<usize>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn ingest_config(
        &self,
        alignment_dir: &Path,
        cli_threads: Option<usize>,
        cli_channel_capacity: Option<usize>,
    ) -> Result<IngestConfig> {
        let mut builder = IngestConfigBuilder::new().alignment_dir(alignment_dir.to_path_buf());
        if let Some(threads) = cli_threads.or(self.threads) {
            builder = builder.parallelism(threads);
        }
        if let Some(capacity) = cli_channel_capacity.or(self.channel_capacity) {
            builder = builder.channel_capacity(capacity);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    /// Builds the clustering run. A directory is ingested and a regular file is read as a
    /// distance cache.
    pub fn merge_with_cluster_args(
        self,
        args: &ClusterArgs,
        cli_threads: Option<usize>,
    ) -> Result<ClusteringConfig> {
        let source = if args.distances.is_dir() {
            DistanceSource::Alignments(self.ingest_config(
                &args.distances,
                cli_threads,
                args.channel_capacity,
            )?)
        } else if args.distances.is_file() {
            DistanceSource::Cache(args.distances.clone())
        } else {
            return Err(CliError::Argument(format!(
                "'{}' is neither an alignment directory nor a distance cache file",
                args.distances.display()
            )));
        };

        let mut builder = ClusteringConfigBuilder::new().source(source);
        if let Some(threshold) = args.threshold.or(self.threshold) {
            builder = builder.threshold(threshold);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn merge_with_cache_args(
        self,
        args: &CacheArgs,
        cli_threads: Option<usize>,
    ) -> Result<IngestConfig> {
        if !args.alignments.is_dir() {
            return Err(CliError::Argument(format!(
                "'{}' is not an alignment directory",
                args.alignments.display()
            )));
        }
        self.ingest_config(&args.alignments, cli_threads, args.channel_capacity)
    }
}
