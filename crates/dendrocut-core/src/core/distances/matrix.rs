use crate::core::models::ids::LabelId;

const ABSENT: f64 = f64::NAN;

/// Upper-triangular jagged matrix of distances indexed by [`LabelId`].
///
/// Only the cell `(min(a, b), max(a, b))` of a pair is populated. Row `i` stores columns
/// `i..` at offset `column - i`, and each row is grown independently up to the highest
/// column written into it. Growing one row never moves another row's storage.
///
/// Absent cells hold `NaN`, so a stored `NaN` is indistinguishable from a missing entry.
#[derive(Debug, Clone, Default)]
pub struct SparseMatrix {
    rows: Vec<Vec<f64>>,
    stored: usize,
}

#[inline]
fn canonical(a: LabelId, b: LabelId) -> (usize, usize) {
    if a <= b {
        (a.index(), b.index())
    } else {
        (b.index(), a.index())
    }
}

impl SparseMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `distance` for the unordered pair `{a, b}`, overwriting any previous value.
    pub fn set(&mut self, a: LabelId, b: LabelId, distance: f64) {
        let (row, column) = canonical(a, b);
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }

        let cells = &mut self.rows[row];
        let offset = column - row;
        if offset >= cells.len() {
            // `resize` reserves at least double the current capacity, so repeated growth of
            // a row is amortized.
            cells.resize(offset + 1, ABSENT);
        }

        let cell = &mut cells[offset];
        match (cell.is_nan(), distance.is_nan()) {
            (true, false) => self.stored += 1,
            (false, true) => self.stored -= 1,
            _ => {}
        }
        *cell = distance;
    }

    /// Returns the distance stored for `{a, b}`, or `None` if nothing was ever stored there.
    pub fn get(&self, a: LabelId, b: LabelId) -> Option<f64> {
        let (row, column) = canonical(a, b);
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column - row))
            .copied()
            .filter(|distance| !distance.is_nan())
    }

    /// Number of pairs currently holding a distance.
    pub fn stored_pairs(&self) -> usize {
        self.stored
    }

    /// Iterates stored cells as `(row, column, distance)` with `row <= column`.
    pub fn entries(&self) -> impl Iterator<Item = (LabelId, LabelId, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, distance)| !distance.is_nan())
                .filter_map(move |(offset, &distance)| {
                    let a = LabelId::from_index(row)?;
                    let b = LabelId::from_index(row + offset)?;
                    Some((a, b, distance))
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> LabelId {
        LabelId::new(raw)
    }

    #[test]
    fn set_is_visible_in_both_argument_orders() {
        let mut matrix = SparseMatrix::new();
        matrix.set(id(7), id(2), 0.25);

        assert_eq!(matrix.get(id(2), id(7)), Some(0.25));
        assert_eq!(matrix.get(id(7), id(2)), Some(0.25));
    }

    #[test]
    fn unwritten_cells_are_absent_not_zero() {
        let mut matrix = SparseMatrix::new();
        matrix.set(id(0), id(3), 0.0);

        assert_eq!(matrix.get(id(0), id(3)), Some(0.0));
        assert_eq!(matrix.get(id(0), id(1)), None);
        assert_eq!(matrix.get(id(0), id(2)), None);
        assert_eq!(matrix.get(id(1), id(3)), None);
    }

    #[test]
    fn out_of_range_queries_return_absent() {
        let mut matrix = SparseMatrix::new();
        assert_eq!(matrix.get(id(0), id(0)), None);
        matrix.set(id(1), id(2), 1.0);

        assert_eq!(matrix.get(id(1), id(500)), None);
        assert_eq!(matrix.get(id(400), id(500)), None);
        assert_eq!(matrix.get(id(u32::MAX), id(0)), None);
    }

    #[test]
    fn growing_one_row_keeps_other_rows_intact() {
        let mut matrix = SparseMatrix::new();
        matrix.set(id(0), id(1), 0.1);
        matrix.set(id(1), id(2), 0.2);
        matrix.set(id(0), id(1_000), 0.3);
        matrix.set(id(5), id(10_000), 0.4);

        assert_eq!(matrix.get(id(0), id(1)), Some(0.1));
        assert_eq!(matrix.get(id(1), id(2)), Some(0.2));
        assert_eq!(matrix.get(id(0), id(1_000)), Some(0.3));
        assert_eq!(matrix.get(id(5), id(10_000)), Some(0.4));
        assert_eq!(matrix.rows[1].len(), 2);
    }

    #[test]
    fn later_writes_overwrite_earlier_ones() {
        let mut matrix = SparseMatrix::new();
        matrix.set(id(3), id(4), 1.0);
        matrix.set(id(4), id(3), 2.0);

        assert_eq!(matrix.get(id(3), id(4)), Some(2.0));
        assert_eq!(matrix.stored_pairs(), 1);
    }

    #[test]
    fn storing_nan_clears_the_cell() {
        let mut matrix = SparseMatrix::new();
        matrix.set(id(0), id(1), 0.5);
        matrix.set(id(0), id(1), f64::NAN);

        assert_eq!(matrix.get(id(0), id(1)), None);
        assert_eq!(matrix.stored_pairs(), 0);
    }

    #[test]
    fn entries_lists_only_stored_cells_in_canonical_order() {
        let mut matrix = SparseMatrix::new();
        matrix.set(id(2), id(0), 0.5);
        matrix.set(id(1), id(4), 1.5);

        let entries: Vec<_> = matrix.entries().collect();
        assert_eq!(entries, vec![(id(0), id(2), 0.5), (id(1), id(4), 1.5)]);
    }
}
