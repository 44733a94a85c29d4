/// A rooted hierarchical clustering tree with arbitrary branching.
///
/// Any node may carry a label, but only labels on leaves identify clustered entities.
/// Labels on internal nodes (typically support values written by tree builders) are kept
/// and ignored by the threshold cut.
///
/// Dropping and comparing trees walk an explicit stack, so caterpillar-shaped trees of any
/// depth are safe to hold.
#[derive(Debug, Default)]
pub struct Dendrogram {
    pub label: Option<String>,
    pub branch_length: Option<f64>,
    pub children: Vec<Dendrogram>,
}

impl Dendrogram {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            branch_length: None,
            children: Vec::new(),
        }
    }

    pub fn unlabeled_leaf() -> Self {
        Self::default()
    }

    pub fn node(children: Vec<Dendrogram>) -> Self {
        Self {
            label: None,
            branch_length: None,
            children,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_branch_length(mut self, length: f64) -> Self {
        self.branch_length = Some(length);
        self
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The label of this node if it is a leaf with a non-empty label.
    pub fn leaf_label(&self) -> Option<&str> {
        if !self.is_leaf() {
            return None;
        }
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    /// Labels of all labeled leaves in this subtree, in pre-order.
    pub fn leaf_labels(&self) -> LeafLabels<'_> {
        LeafLabels { stack: vec![self] }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_labels().count()
    }
}

impl Drop for Dendrogram {
    fn drop(&mut self) {
        // Detach descendants onto a flat stack so each node is dropped childless.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl PartialEq for Dendrogram {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.label != b.label
                || a.branch_length != b.branch_length
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

/// Pre-order iterator over the labeled leaves of a [`Dendrogram`].
pub struct LeafLabels<'a> {
    stack: Vec<&'a Dendrogram>,
}

impl<'a> Iterator for LeafLabels<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if node.is_leaf() {
                if let Some(label) = node.leaf_label() {
                    return Some(label);
                }
            } else {
                self.stack.extend(node.children.iter().rev());
            }
        }
        None
    }
}
