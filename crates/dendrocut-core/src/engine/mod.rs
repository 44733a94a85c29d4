//! # Engine Module
//!
//! The stateful layer that turns a corpus of alignment summaries into flat clusters.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Parallelism, channel capacity, distance source and threshold
//! - **Error Handling** ([`error`]) - Ingestion and engine error types
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Ingestion** ([`ingest`]) - Parallel readers feeding a single aggregator that owns the
//!   distance table
//! - **Threshold Cut** ([`cluster`]) - Partitions a dendrogram into clusters whose members are
//!   all mutually within the threshold
//!
//! ## Concurrency Model
//!
//! Ingestion runs a dedicated worker pool for parsing plus exactly one aggregator thread. The
//! aggregator is the only code that mutates the
//! [`DistanceTable`](crate::core::distances::DistanceTable), so the table needs no locking.
//! Clustering is single-threaded over the finished, read-only table.

pub mod cluster;
pub mod config;
pub mod error;
pub mod ingest;
pub mod progress;
