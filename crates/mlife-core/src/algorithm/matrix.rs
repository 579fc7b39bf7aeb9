#![forbid(unsafe_code)]

//! Small integer matrix kernels for the linear-algebra engines.
//!
//! Only what the neighbour-count products need is implemented: dense
//! row-major storage, CSR storage built from diagonals, and the three
//! products `dense·dense`, `sparse·dense` and `dense·sparse`.

/// Row-major dense matrix of non-negative counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl DenseMatrix {
    /// All-zero matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Wrap row-major data.
    #[must_use]
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u32>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Lift a binary cell slice into a matrix.
    #[must_use]
    pub fn from_cells(rows: usize, cols: usize, cells: &[u8]) -> Self {
        Self::from_vec(rows, cols, cells.iter().map(|&c| u32::from(c)).collect())
    }

    /// `P + Pᵀ` for the `n × n` cyclic shift `P`: a one on each side of the
    /// diagonal, wrapping at the corners. For `n <= 2` the two shifts
    /// coincide and the entries are 2.
    #[must_use]
    pub fn cyclic_neighbours(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + (i + 1) % n] += 1;
            m.data[i * n + (i + n - 1) % n] += 1;
        }
        m
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Consume into row-major data.
    #[must_use]
    pub fn into_vec(self) -> Vec<u32> {
        self.data
    }

    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.cols + col]
    }

    /// `self · rhs`. Zero entries of `self` are skipped, which makes the
    /// permutation-heavy products here roughly linear in the output size.
    #[must_use]
    pub fn mul(&self, rhs: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(self.cols, rhs.rows);
        let mut out = DenseMatrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            let out_row = &mut out.data[i * rhs.cols..(i + 1) * rhs.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0 {
                    continue;
                }
                let rhs_row = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                for (o, &b) in out_row.iter_mut().zip(rhs_row) {
                    *o += a * b;
                }
            }
        }
        out
    }

    /// Element-wise sum.
    #[must_use]
    pub fn add(&self, rhs: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols));
        let data = self.data.iter().zip(&rhs.data).map(|(a, b)| a + b).collect();
        DenseMatrix::from_vec(self.rows, self.cols, data)
    }
}

/// Square sparse matrix in compressed sparse row form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMatrix {
    n: usize,
    /// `indptr[i]..indptr[i + 1]` spans row `i` in `indices`/`values`.
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<u32>,
}

impl SparseMatrix {
    /// Build an `n × n` matrix from `(offset, value)` diagonals.
    ///
    /// Offset `k` places `value` at `(i, i + k)` for every row where that
    /// column exists. Diagonals that land on the same entry are summed.
    #[must_use]
    pub fn from_diagonals(n: usize, diagonals: &[(isize, u32)]) -> Self {
        let mut indptr = Vec::with_capacity(n + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);
        for i in 0..n {
            let mut row: Vec<(usize, u32)> = diagonals
                .iter()
                .filter_map(|&(k, v)| {
                    let col = i as isize + k;
                    (0..n as isize).contains(&col).then_some((col as usize, v))
                })
                .collect();
            row.sort_unstable_by_key(|&(col, _)| col);
            for (col, v) in row {
                if indices.len() > indptr[i] && indices.last() == Some(&col) {
                    if let Some(last) = values.last_mut() {
                        *last += v;
                    }
                } else {
                    indices.push(col);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            n,
            indptr,
            indices,
            values,
        }
    }

    /// Sparse counterpart of [`DenseMatrix::cyclic_neighbours`]: the super
    /// and sub diagonals plus the two wraparound corner diagonals.
    #[must_use]
    pub fn cyclic_neighbours(n: usize) -> Self {
        let n_i = n as isize;
        Self::from_diagonals(n, &[(1, 1), (1 - n_i, 1), (-1, 1), (n_i - 1, 1)])
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.n
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    fn row(&self, i: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
        let span = self.indptr[i]..self.indptr[i + 1];
        self.indices[span.clone()]
            .iter()
            .copied()
            .zip(self.values[span].iter().copied())
    }

    /// Densify, for comparisons in tests.
    #[must_use]
    pub fn to_dense(&self) -> DenseMatrix {
        let mut m = DenseMatrix::zeros(self.n, self.n);
        for i in 0..self.n {
            for (j, v) in self.row(i) {
                m.data[i * self.n + j] += v;
            }
        }
        m
    }

    /// `self · rhs`.
    #[must_use]
    pub fn mul_dense(&self, rhs: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(self.n, rhs.rows);
        let mut out = DenseMatrix::zeros(self.n, rhs.cols);
        for i in 0..self.n {
            let out_row = &mut out.data[i * rhs.cols..(i + 1) * rhs.cols];
            for (k, a) in self.row(i) {
                let rhs_row = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                for (o, &b) in out_row.iter_mut().zip(rhs_row) {
                    *o += a * b;
                }
            }
        }
        out
    }

    /// `lhs · self`.
    #[must_use]
    pub fn premul_dense(&self, lhs: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(lhs.cols, self.n);
        let mut out = DenseMatrix::zeros(lhs.rows, self.n);
        for r in 0..lhs.rows {
            let lhs_row = &lhs.data[r * lhs.cols..(r + 1) * lhs.cols];
            let out_row = &mut out.data[r * self.n..(r + 1) * self.n];
            for (k, &a) in lhs_row.iter().enumerate() {
                if a == 0 {
                    continue;
                }
                for (c, b) in self.row(k) {
                    out_row[c] += a * b;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_product() {
        let a = DenseMatrix::from_vec(2, 3, vec![1, 2, 0, 0, 1, 3]);
        let b = DenseMatrix::from_vec(3, 2, vec![1, 0, 0, 1, 2, 2]);
        assert_eq!(a.mul(&b).data(), &[1, 2, 6, 7]);
    }

    #[test]
    fn cyclic_neighbours_wrap() {
        let m = DenseMatrix::cyclic_neighbours(4);
        assert_eq!(
            m.data(),
            &[0, 1, 0, 1, 1, 0, 1, 0, 0, 1, 0, 1, 1, 0, 1, 0]
        );
    }

    #[test]
    fn degenerate_axes_double_up() {
        assert_eq!(DenseMatrix::cyclic_neighbours(1).data(), &[2]);
        assert_eq!(DenseMatrix::cyclic_neighbours(2).data(), &[0, 2, 2, 0]);
    }

    #[test]
    fn sparse_matches_dense_operator() {
        for n in 1..=9 {
            let sparse = SparseMatrix::cyclic_neighbours(n);
            assert_eq!(sparse.to_dense(), DenseMatrix::cyclic_neighbours(n), "n={n}");
            assert!(sparse.nnz() <= 2 * n);
        }
    }

    #[test]
    fn sparse_products_match_dense_products() {
        let a = DenseMatrix::from_vec(3, 4, vec![1, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0, 0]);
        let rows = SparseMatrix::cyclic_neighbours(3);
        let cols = SparseMatrix::cyclic_neighbours(4);
        assert_eq!(rows.mul_dense(&a), rows.to_dense().mul(&a));
        assert_eq!(cols.premul_dense(&a), a.mul(&cols.to_dense()));
    }
}
