use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "dendrocut - Cut a protein-domain dendrogram into clusters of close domains.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to read alignment files.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster the leaves of a Newick tree using alignment distances.
    Cluster(ClusterArgs),
    /// Read an alignment directory once and save its distances to a cache file.
    Cache(CacheArgs),
}

/// Arguments for the `cluster` subcommand.
#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// Directory of alignment summaries, or a distance cache written by `dendrocut cache`.
    #[arg(value_name = "DISTANCES")]
    pub distances: PathBuf,

    /// Dendrogram over the aligned domains, in Newick format.
    #[arg(value_name = "TREE")]
    pub tree: PathBuf,

    /// Output CSV file with one cluster per row.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Distance threshold at which to cut the tree.
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of parsed files that may wait for the aggregator before readers block.
    #[arg(long, value_name = "NUM")]
    pub channel_capacity: Option<usize>,
}

/// Arguments for the `cache` subcommand.
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Directory of alignment summaries.
    #[arg(value_name = "ALIGNMENTS")]
    pub alignments: PathBuf,

    /// Output path of the distance cache.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of parsed files that may wait for the aggregator before readers block.
    #[arg(long, value_name = "NUM")]
    pub channel_capacity: Option<usize>,
}
