//! # dendrocut Core Library
//!
//! Groups structurally aligned protein domains into flat clusters by cutting a precomputed
//! dendrogram wherever every pair of leaves under a subtree is within a distance threshold.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Dendrogram`, `LabelId`), the
//!   label interner and sparse distance table, and the file formats the tool reads and
//!   writes (alignment summaries, Newick trees, cluster CSV, distance caches).
//!
//! - **[`engine`]: The Logic Core.** Configuration, error types, progress reporting, the
//!   parallel ingestion pipeline that fills the distance table, and the threshold cut.
//!
//! - **[`workflows`]: The Public API.** End-to-end entry points that tie ingestion (or cache
//!   loading) and clustering together.

pub mod core;
pub mod engine;
pub mod workflows;
