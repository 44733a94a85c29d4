//! Label-keyed storage for pairwise distances.
//!
//! A [`DistanceTable`] pairs an append-only [`Interner`] with a [`SparseMatrix`] so that
//! labels are hashed once on insertion and every later lookup works on dense integer ids.

pub mod interner;
pub mod matrix;

use crate::core::models::ids::LabelId;
pub use interner::{InternError, Interner};
pub use matrix::SparseMatrix;

#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    interner: Interner,
    matrix: SparseMatrix,
}

impl DistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(labels: usize) -> Self {
        Self {
            interner: Interner::with_capacity(labels),
            matrix: SparseMatrix::new(),
        }
    }

    pub fn intern(&mut self, label: &str) -> Result<LabelId, InternError> {
        self.interner.intern(label)
    }

    pub fn lookup(&self, label: &str) -> Option<LabelId> {
        self.interner.lookup(label)
    }

    pub fn set(&mut self, a: LabelId, b: LabelId, distance: f64) {
        self.matrix.set(a, b, distance);
    }

    pub fn get(&self, a: LabelId, b: LabelId) -> Option<f64> {
        self.matrix.get(a, b)
    }

    /// Interns both labels and stores `distance` for the pair.
    pub fn insert(&mut self, a: &str, b: &str, distance: f64) -> Result<(), InternError> {
        let a = self.interner.intern(a)?;
        let b = self.interner.intern(b)?;
        self.matrix.set(a, b, distance);
        Ok(())
    }

    /// Distance between two labels.
    ///
    /// Equal labels are at distance `0.0` whether or not they were ever interned. Unknown
    /// labels and unrecorded pairs yield `None`.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        if a == b {
            return Some(0.0);
        }
        let a = self.interner.lookup(a)?;
        let b = self.interner.lookup(b)?;
        self.matrix.get(a, b)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn label_count(&self) -> usize {
        self.interner.len()
    }

    pub fn stored_pairs(&self) -> usize {
        self.matrix.stored_pairs()
    }

    pub fn entries(&self) -> impl Iterator<Item = (LabelId, LabelId, f64)> + '_ {
        self.matrix.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_distance_ignores_argument_order() {
        let mut table = DistanceTable::new();
        table.insert("d1abc__", "d2xyz__", 0.042).unwrap();

        assert_eq!(table.distance("d1abc__", "d2xyz__"), Some(0.042));
        assert_eq!(table.distance("d2xyz__", "d1abc__"), Some(0.042));
    }

    #[test]
    fn distance_to_self_is_zero_even_for_unknown_labels() {
        let mut table = DistanceTable::new();
        table.insert("a", "b", 1.0).unwrap();

        assert_eq!(table.distance("a", "a"), Some(0.0));
        assert_eq!(table.distance("never-seen", "never-seen"), Some(0.0));
        assert_eq!(table.label_count(), 2);
    }

    #[test]
    fn unknown_labels_and_unrecorded_pairs_are_absent() {
        let mut table = DistanceTable::new();
        table.insert("a", "b", 1.0).unwrap();
        table.insert("c", "d", 1.0).unwrap();

        assert_eq!(table.distance("a", "zzz"), None);
        assert_eq!(table.distance("a", "c"), None);
        assert_eq!(table.distance("b", "d"), None);
    }

    #[test]
    fn id_level_access_matches_label_level_access() {
        let mut table = DistanceTable::new();
        let a = table.intern("a").unwrap();
        let b = table.intern("b").unwrap();
        table.set(b, a, 0.3);

        assert_eq!(table.lookup("a"), Some(a));
        assert_eq!(table.get(a, b), Some(0.3));
        assert_eq!(table.distance("a", "b"), Some(0.3));
        assert_eq!(table.stored_pairs(), 1);
    }
}
