pub mod ids;
pub mod tree;
