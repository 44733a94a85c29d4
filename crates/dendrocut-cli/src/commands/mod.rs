pub mod cache;
pub mod cluster;
