use crate::core::models::tree::Dendrogram;
use newick::{Newick, NewickTree, NodeID};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewickError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid Newick tree: {0}")]
    Parse(String),
}

/// Converts a parsed Newick arena into an owned [`Dendrogram`].
///
/// Nodes are visited in pre-order from the root and assembled in reverse, so every child
/// is built before its parent and the conversion never recurses.
fn to_dendrogram(tree: &NewickTree) -> Dendrogram {
    let mut order: Vec<NodeID> = Vec::new();
    let mut pending = vec![tree.root()];
    while let Some(id) = pending.pop() {
        order.push(id);
        pending.extend(tree[id].children().iter().rev().copied());
    }

    let mut built: HashMap<NodeID, Dendrogram> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let children: Vec<Dendrogram> = tree[id]
            .children()
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();

        let mut node = Dendrogram::node(children);
        if let Some(name) = tree.name(id) {
            node = node.with_label(name.to_string());
        }
        if let Some(&length) = tree[id].branch() {
            node = node.with_branch_length(f64::from(length));
        }
        built.insert(id, node);
    }

    built.remove(&tree.root()).unwrap_or_default()
}

/// Parses a single tree in Newick notation, e.g. `((A:0.1,B:0.2)90,C);`.
pub fn parse(input: &str) -> Result<Dendrogram, NewickError> {
    let tree: NewickTree =
        newick::one_from_string(input.trim()).map_err(|e| NewickError::Parse(e.to_string()))?;
    Ok(to_dendrogram(&tree))
}

pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Dendrogram, NewickError> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}
