//! Compressed sparse row storage.
//!
//! Matrices are built from `(row, col, value)` triplets and finalised in one
//! pass: each row is sorted by column and duplicate columns are summed. There
//! is no in-place insertion after finalisation; a changed pattern means a new
//! build.

use crate::math::Real;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<Real>,
}

impl CsrMatrix {
    /// Empty `n_rows x n_cols` matrix.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    #[inline]
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    #[inline]
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    #[inline]
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Index range of `row` into `col_idx` / `values`.
    #[inline]
    pub fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        self.row_ptr[row]..self.row_ptr[row + 1]
    }

    /// `(column, value)` pairs of one row in ascending column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, Real)> + '_ {
        let range = self.row_range(row);
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Real> {
        let range = self.row_range(row);
        self.col_idx[range.clone()]
            .binary_search(&col)
            .ok()
            .map(|local| self.values[range.start + local])
    }

    pub fn row_sum(&self, row: usize) -> Real {
        self.values[self.row_range(row)].iter().sum()
    }
}

/// Accumulates triplets for a [`CsrMatrix`].
///
/// Each triplet may carry a payload (shape gradients for the shape matrix),
/// merged alongside its value when columns collide.
#[derive(Clone, Debug)]
pub struct TripletBuilder<P = ()> {
    n_rows: usize,
    n_cols: usize,
    entries: Vec<(usize, usize, Real, P)>,
}

impl<P> TripletBuilder<P> {
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(n_rows: usize, n_cols: usize, capacity: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, row: usize, col: usize, value: Real, payload: P) {
        debug_assert!(row < self.n_rows && col < self.n_cols);
        self.entries.push((row, col, value, payload));
    }

    /// Sort, merge duplicates and compress. `merge` folds the payload of a
    /// duplicate entry into the one kept.
    pub fn build_with(mut self, mut merge: impl FnMut(&mut P, P)) -> (CsrMatrix, Vec<P>) {
        self.entries.sort_by_key(|&(row, col, _, _)| (row, col));

        let mut row_ptr = vec![0; self.n_rows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(self.entries.len());
        let mut values: Vec<Real> = Vec::with_capacity(self.entries.len());
        let mut payloads: Vec<P> = Vec::with_capacity(self.entries.len());
        let mut last: Option<(usize, usize)> = None;

        for (row, col, value, payload) in self.entries {
            if last == Some((row, col)) {
                let end = values.len() - 1;
                values[end] += value;
                merge(&mut payloads[end], payload);
                continue;
            }
            row_ptr[row + 1] += 1;
            col_idx.push(col);
            values.push(value);
            payloads.push(payload);
            last = Some((row, col));
        }

        for row in 0..self.n_rows {
            row_ptr[row + 1] += row_ptr[row];
        }

        let matrix = CsrMatrix {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_ptr,
            col_idx,
            values,
        };
        (matrix, payloads)
    }
}

impl TripletBuilder<()> {
    pub fn add(&mut self, row: usize, col: usize, value: Real) {
        self.push(row, col, value, ());
    }

    pub fn build(self) -> CsrMatrix {
        self.build_with(|_, _| {}).0
    }
}
