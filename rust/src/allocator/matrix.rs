//! Fixed-dimension process x resource count matrix.

/// Row-major matrix of unit counts, one row per process, one column per resource type.
///
/// Dimensions are fixed at construction; rows are handed out as slices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl CountMatrix {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build from nested rows. Caller guarantees every row has `cols` entries.
    pub fn from_rows(rows: &[Vec<u32>], cols: usize) -> Self {
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            debug_assert_eq!(row.len(), cols);
            data.extend_from_slice(row);
        }
        Self {
            rows: rows.len(),
            cols,
            data,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[u32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [u32] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut u32 {
        &mut self.data[row * self.cols + col]
    }

    /// Copy out as nested rows (for snapshots).
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_independent() {
        let mut m = CountMatrix::zeros(2, 3);
        m.row_mut(1)[2] = 7;
        *m.get_mut(0, 0) += 1;

        assert_eq!(m.row(0), &[1, 0, 0]);
        assert_eq!(m.row(1), &[0, 0, 7]);
        assert_eq!(m.get(1, 2), 7);
        assert_eq!(m.to_rows(), vec![vec![1, 0, 0], vec![0, 0, 7]]);
    }

    #[test]
    fn test_from_rows() {
        let m = CountMatrix::from_rows(&[vec![1, 2], vec![3, 4], vec![5, 6]], 2);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.row(2), &[5, 6]);
    }
}
