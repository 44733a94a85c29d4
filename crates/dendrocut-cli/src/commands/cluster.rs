use crate::cli::ClusterArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dendrocut::core::io::{clusters, newick};
use dendrocut::engine::progress::ProgressReporter;
use dendrocut::workflows;
use tracing::info;

pub fn run(args: ClusterArgs, threads: Option<usize>, progress: CliProgressHandler) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cluster_args(&args, threads)?;

    // The tree is read before any distances so a malformed tree fails fast.
    info!("Loading dendrogram from {:?}", &args.tree);
    let tree = newick::read_from_path(&args.tree).map_err(|e| CliError::FileParsing {
        path: args.tree.clone(),
        source: e.into(),
    })?;
    info!("Dendrogram has {} labeled leaves.", tree.leaf_count());

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let result = workflows::cluster::run(&tree, &config, &reporter)?;

    clusters::write_clusters_to_path(&result.clusters, &args.output).map_err(|e| {
        CliError::Output {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;

    if let Some(summary) = &result.ingest {
        println!(
            "Read {} record(s) from {} file(s) ({} malformed row(s) skipped).",
            summary.records, summary.files, summary.skipped_rows
        );
    }
    println!(
        "✓ {} cluster(s) written to: {}",
        result.clusters.len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn args(distances: &Path, tree: &Path, output: &Path) -> ClusterArgs {
        ClusterArgs {
            distances: distances.to_path_buf(),
            tree: tree.to_path_buf(),
            output: output.to_path_buf(),
            threshold: None,
            config: None,
            channel_capacity: None,
        }
    }

    #[test]
    fn writes_one_row_per_cluster() {
        let dir = tempdir().unwrap();
        let aligns = dir.path().join("aligns");
        fs::create_dir(&aligns).unwrap();
        fs::write(
            aligns.join("a.out"),
            "A.ent_B.ali0\t120\t1.5\t0\t0\t0\t0\t130\t140\n\
             A.ent_C.ali0\t50\t3.2\t0\t0\t0\t0\t210\t95\n\
             B.ent_C.ali0\t50\t3.2\t0\t0\t0\t0\t210\t95\n",
        )
        .unwrap();
        let tree = dir.path().join("tree.nwk");
        fs::write(&tree, "((A:0.25,B:0.25):0.5,C:0.75);\n").unwrap();
        let output = dir.path().join("clusters.csv");

        run(args(&aligns, &tree, &output), Some(1), CliProgressHandler::hidden()).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "A,B\nC\n");
    }

    #[test]
    fn malformed_tree_writes_no_output() {
        let dir = tempdir().unwrap();
        let aligns = dir.path().join("aligns");
        fs::create_dir(&aligns).unwrap();
        let tree = dir.path().join("tree.nwk");
        fs::write(&tree, "((A,B),C;").unwrap();
        let output = dir.path().join("clusters.csv");

        let result = run(args(&aligns, &tree, &output), Some(1), CliProgressHandler::hidden());

        assert!(matches!(result, Err(CliError::FileParsing { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn malformed_alignment_writes_no_output() {
        let dir = tempdir().unwrap();
        let aligns = dir.path().join("aligns");
        fs::create_dir(&aligns).unwrap();
        fs::write(aligns.join("a.out"), "A.ent_B\t120\t1.5\t0\t0\t0\t0\t130\t140\n").unwrap();
        let tree = dir.path().join("tree.nwk");
        fs::write(&tree, "(A,B);").unwrap();
        let output = dir.path().join("clusters.csv");

        let result = run(args(&aligns, &tree, &output), Some(1), CliProgressHandler::hidden());

        assert!(matches!(result, Err(CliError::Core(_))));
        assert!(!output.exists());
    }
}
