use crate::cli::CacheArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dendrocut::engine::progress::ProgressReporter;
use dendrocut::workflows;
use tracing::info;

pub fn run(args: CacheArgs, threads: Option<usize>, progress: CliProgressHandler) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let config = partial_config.merge_with_cache_args(&args, threads)?;
    info!(
        "Caching distances from {:?} with {} worker(s).",
        &config.alignment_dir, config.parallelism
    );

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let summary = workflows::cluster::build_cache(&config, &args.output, &reporter)?;

    println!(
        "✓ {} distance(s) over {} label(s) from {} file(s) cached to: {}",
        summary.stored_pairs,
        summary.labels,
        summary.files,
        args.output.display()
    );
    Ok(())
}
