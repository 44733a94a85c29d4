use crate::core::distances::DistanceTable;
use crate::core::io::cache;
use crate::core::models::tree::Dendrogram;
use crate::engine::cluster::{Cluster, cut_tree};
use crate::engine::config::{ClusteringConfig, DistanceSource, IngestConfig};
use crate::engine::error::EngineError;
use crate::engine::ingest::{self, IngestSummary};
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Tree leaves absent from the distance table that are named individually in the log.
const MISSING_LABELS_SHOWN: usize = 5;

#[derive(Debug, Clone)]
pub struct ClusteringResult {
    pub clusters: Vec<Cluster>,
    /// Present when the distances were ingested rather than loaded from a cache.
    pub ingest: Option<IngestSummary>,
    pub labels: usize,
    pub stored_pairs: usize,
    /// Labeled tree leaves that never appeared in an alignment record.
    pub unknown_leaves: usize,
}

/// Loads the distances named by `config.source` and cuts `tree` into flat clusters.
#[instrument(skip_all, name = "clustering_workflow")]
pub fn run(
    tree: &Dendrogram,
    config: &ClusteringConfig,
    reporter: &ProgressReporter,
) -> Result<ClusteringResult, EngineError> {
    let (table, ingest) = load_distances(&config.source, reporter)?;

    let unknown_leaves = report_unknown_leaves(tree, &table, reporter);

    reporter.report(Progress::PhaseStart {
        name: "Cutting dendrogram",
    });
    let clusters = cut_tree(tree, &table, config.cluster.threshold);
    reporter.report(Progress::PhaseFinish);

    info!(
        "Workflow complete. {} leaves grouped into {} cluster(s) at threshold {}.",
        tree.leaf_count(),
        clusters.len(),
        config.cluster.threshold
    );

    Ok(ClusteringResult {
        clusters,
        ingest,
        labels: table.label_count(),
        stored_pairs: table.stored_pairs(),
        unknown_leaves,
    })
}

/// Obtains a distance table from alignment summaries or from a cache file.
pub fn load_distances(
    source: &DistanceSource,
    reporter: &ProgressReporter,
) -> Result<(DistanceTable, Option<IngestSummary>), EngineError> {
    match source {
        DistanceSource::Alignments(ingest_config) => {
            let outcome = ingest::run(ingest_config, reporter)?;
            Ok((outcome.table, Some(outcome.summary)))
        }
        DistanceSource::Cache(path) => {
            reporter.report(Progress::PhaseStart {
                name: "Loading distance cache",
            });
            let table = cache::read_cache_from_path(path).map_err(|source| EngineError::Cache {
                path: path.clone(),
                source,
            })?;
            reporter.report(Progress::PhaseFinish);
            info!(
                "Loaded {} labels and {} stored pairs from {}.",
                table.label_count(),
                table.stored_pairs(),
                path.display()
            );
            Ok((table, None))
        }
    }
}

/// Ingests the alignment corpus and writes its distance table to `cache_path`.
///
/// The cache file is only created once ingestion has succeeded.
#[instrument(skip_all, name = "cache_workflow", fields(cache = %cache_path.display()))]
pub fn build_cache(
    config: &IngestConfig,
    cache_path: &Path,
    reporter: &ProgressReporter,
) -> Result<IngestSummary, EngineError> {
    let outcome = ingest::run(config, reporter)?;

    reporter.report(Progress::PhaseStart {
        name: "Writing distance cache",
    });
    cache::write_cache_to_path(&outcome.table, cache_path).map_err(|source| {
        EngineError::Cache {
            path: cache_path.to_path_buf(),
            source,
        }
    })?;
    reporter.report(Progress::PhaseFinish);

    info!(
        "Wrote {} labels and {} stored pairs to {}.",
        outcome.summary.labels,
        outcome.summary.stored_pairs,
        cache_path.display()
    );
    Ok(outcome.summary)
}

fn report_unknown_leaves(
    tree: &Dendrogram,
    table: &DistanceTable,
    reporter: &ProgressReporter,
) -> usize {
    let unknown: Vec<&str> = tree
        .leaf_labels()
        .filter(|label| table.lookup(label).is_none())
        .collect();
    if unknown.is_empty() {
        return 0;
    }

    let shown = unknown[..unknown.len().min(MISSING_LABELS_SHOWN)].join(", ");
    let message = format!(
        "{} tree leaves have no recorded distances and will stay singletons (e.g. {}).",
        unknown.len(),
        shown
    );
    warn!("{}", message);
    reporter.report(Progress::Message(message));
    unknown.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::newick;
    use crate::engine::config::{ClusteringConfigBuilder, IngestConfigBuilder};
    use crate::engine::error::IngestError;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::{TempDir, tempdir};

    // Distances follow from (core, rmsd, len1, len2):
    //   (120, 1.5, 130, 140) -> 0.0925, within the default threshold
    //   (10, 200, 100, 100)  -> negative, within any non-negative threshold
    //   (50, 3.2, 210, 95)   -> 0.1014, above the default threshold
    fn alignment_corpus() -> TempDir {
        let dir = tempdir().unwrap();
        let batch = dir.path().join("batch1");
        fs::create_dir(&batch).unwrap();
        fs::write(
            batch.join("a.out"),
            "A.ent_B.ali0\t120\t1.5\t0\t0\t0\t0\t130\t140\n\
             A.ent_C.ali0\t50\t3.2\t0\t0\t0\t0\t210\t95\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.out"),
            "B.ent_C.ali0\t50\t3.2\t0\t0\t0\t0\t210\t95\n\
             C.ent_D.ali0\t10\t200\t0\t0\t0\t0\t100\t100\n\
             short row\n",
        )
        .unwrap();
        dir
    }

    fn ingest_config(dir: &Path) -> IngestConfig {
        IngestConfigBuilder::new()
            .alignment_dir(dir.to_path_buf())
            .parallelism(2)
            .build()
            .unwrap()
    }

    fn strs(clusters: &[Cluster]) -> Vec<Vec<&str>> {
        clusters
            .iter()
            .map(|c| c.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn clusters_ingested_alignments() {
        let corpus = alignment_corpus();
        let tree = newick::parse("((A,B),(C,D));").unwrap();
        let config = ClusteringConfigBuilder::new()
            .source(DistanceSource::Alignments(ingest_config(corpus.path())))
            .build()
            .unwrap();

        let result = run(&tree, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(strs(&result.clusters), vec![vec!["A", "B"], vec!["C", "D"]]);
        let summary = result.ingest.unwrap();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.skipped_rows, 1);
        assert_eq!(result.labels, 4);
        assert_eq!(result.stored_pairs, 4);
        assert_eq!(result.unknown_leaves, 0);
    }

    #[test]
    fn far_leaf_splits_from_close_pair_and_its_sibling() {
        // A-B is close; C is far from A, B and D.
        let corpus = tempdir().unwrap();
        fs::write(
            corpus.path().join("first.out"),
            "A.ent_B.ali0\t120\t1.5\t0\t0\t0\t0\t130\t140\n\
             A.ent_C.ali0\t50\t3.2\t0\t0\t0\t0\t210\t95\n",
        )
        .unwrap();
        fs::write(
            corpus.path().join("second.out"),
            "B.ent_C.ali0\t50\t3.2\t0\t0\t0\t0\t210\t95\n\
             C.ent_D.ali0\t50\t3.2\t0\t0\t0\t0\t210\t95\n",
        )
        .unwrap();
        let tree = newick::parse("((A,B),(C,D));").unwrap();
        let config = ClusteringConfigBuilder::new()
            .source(DistanceSource::Alignments(ingest_config(corpus.path())))
            .build()
            .unwrap();

        let result = run(&tree, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(
            strs(&result.clusters),
            vec![vec!["A", "B"], vec!["C"], vec!["D"]]
        );
        let summary = result.ingest.unwrap();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.records, 4);
        assert_eq!(result.labels, 4);
    }

    #[test]
    fn cache_round_trip_gives_the_same_clusters() {
        let corpus = alignment_corpus();
        let out = tempdir().unwrap();
        let cache_path = out.path().join("distances.json");
        let reporter = ProgressReporter::new();

        let summary = build_cache(&ingest_config(corpus.path()), &cache_path, &reporter).unwrap();
        assert_eq!(summary.stored_pairs, 4);

        let tree = newick::parse("((A,B),(C,D));").unwrap();
        let from_cache = ClusteringConfigBuilder::new()
            .source(DistanceSource::Cache(cache_path))
            .build()
            .unwrap();
        let from_alignments = ClusteringConfigBuilder::new()
            .source(DistanceSource::Alignments(ingest_config(corpus.path())))
            .build()
            .unwrap();

        let cached = run(&tree, &from_cache, &reporter).unwrap();
        let ingested = run(&tree, &from_alignments, &reporter).unwrap();
        assert_eq!(cached.clusters, ingested.clusters);
        assert!(cached.ingest.is_none());
    }

    #[test]
    fn higher_threshold_merges_more() {
        let corpus = alignment_corpus();
        let tree = newick::parse("((A,B),(C,D));").unwrap();
        let config = ClusteringConfigBuilder::new()
            .source(DistanceSource::Alignments(ingest_config(corpus.path())))
            .threshold(0.2)
            .build()
            .unwrap();

        // A-D and B-D have no record, so the root still splits.
        let result = run(&tree, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(strs(&result.clusters), vec![vec!["A", "B"], vec!["C", "D"]]);
    }

    #[test]
    fn unknown_leaves_are_counted_and_reported() {
        let corpus = alignment_corpus();
        let tree = newick::parse("((A,B),ghost,phantom);").unwrap();
        let config = ClusteringConfigBuilder::new()
            .source(DistanceSource::Alignments(ingest_config(corpus.path())))
            .build()
            .unwrap();

        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let reporter = ProgressReporter::with_callback(Box::new(move |event: Progress| {
            if let Progress::Message(text) = event {
                sink.lock().unwrap().push(text);
            }
        }));

        let result = run(&tree, &config, &reporter).unwrap();
        assert_eq!(result.unknown_leaves, 2);
        assert_eq!(
            strs(&result.clusters),
            vec![vec!["A", "B"], vec!["ghost"], vec!["phantom"]]
        );
        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("ghost"));
    }

    #[test]
    fn missing_cache_reports_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let config = ClusteringConfigBuilder::new()
            .source(DistanceSource::Cache(path.clone()))
            .build()
            .unwrap();

        let err = run(&Dendrogram::leaf("A"), &config, &ProgressReporter::new()).unwrap_err();
        match err {
            EngineError::Cache { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_ingestion_writes_no_cache() {
        let corpus = tempdir().unwrap();
        fs::write(
            corpus.path().join("bad.out"),
            "A.ent_B.ali0\tnot-a-number\t1.5\t0\t0\t0\t0\t130\t140\n",
        )
        .unwrap();
        let out = tempdir().unwrap();
        let cache_path = out.path().join("distances.json");

        let err = build_cache(
            &ingest_config(corpus.path()),
            &cache_path,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Ingest(IngestError::Read(_))));
        assert!(!cache_path.exists());
    }
}
