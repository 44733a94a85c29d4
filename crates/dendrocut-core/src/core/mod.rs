//! # Core Module
//!
//! Fundamental data structures and file formats used by the clustering engine.
//!
//! - **Data Models** ([`models`]) - Dense label ids and the dendrogram tree
//! - **Distance Storage** ([`distances`]) - Label interner and the sparse triangular distance
//!   table
//! - **File I/O** ([`io`]) - Alignment-summary records, Newick trees, cluster output and the
//!   on-disk distance cache

pub mod distances;
pub mod io;
pub mod models;
