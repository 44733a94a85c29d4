//! File formats read and written by the clustering tool.
//!
//! - [`alignment`] - tab-separated alignment summaries and the distance transform
//! - [`newick`] - bracketed tree notation for dendrograms
//! - [`clusters`] - one CSV row of member labels per cluster
//! - [`cache`] - a JSON snapshot of a completed distance table

pub mod alignment;
pub mod cache;
pub mod clusters;
pub mod newick;
