//! # Workflows Module
//!
//! High-level entry points that run a complete clustering job.
//!
//! ## Overview
//!
//! A workflow obtains the distance table (by ingesting alignment summaries or loading a
//! previously written cache), cuts the supplied dendrogram at the configured threshold, and
//! returns the clusters together with a summary of what was read. Progress is reported through
//! the [`ProgressReporter`](crate::engine::progress::ProgressReporter) passed by the caller.
//!
//! - **Clustering Workflow** ([`cluster`]) - Distance loading, cache building and the
//!   threshold cut.

pub mod cluster;
