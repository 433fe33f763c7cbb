//! Coordinate-format (COO) sparse matrix assembly.
//!
//! Operators are assembled entry-by-entry from the combinatorics of a
//! complex (one nonzero per incident face/coface pair), so it is natural to
//! accumulate triplets and convert to a dense [`nalgebra::DMatrix`] only
//! once at the end — the same two-phase build-then-densify shape as the
//! teacher's `error_correction::ldpc::SparseMatrix`, generalized from a
//! binary parity-check matrix to real-valued entries.

use crate::error::{DecError, Result};
use nalgebra::DMatrix;

/// A real-valued matrix under construction as a list of `(row, col, value)`
/// triplets. Repeated entries at the same `(row, col)` accumulate additively,
/// matching how a boundary/codifferential assembly can legitimately visit
/// the same pair more than once (e.g. two triangles sharing an edge).
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    nrows: usize,
    ncols: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        SparseMatrix {
            nrows,
            ncols,
            entries: Vec::new(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Accumulate `value` into `(row, col)`.
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.nrows && col < self.ncols, "triplet out of bounds");
        self.entries.push((row, col, value));
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Densify, summing duplicate triplets.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut m = DMatrix::<f64>::zeros(self.nrows, self.ncols);
        for &(r, c, v) in &self.entries {
            m[(r, c)] += v;
        }
        m
    }

    /// The transpose, as a fresh triplet list (no densification).
    pub fn transpose(&self) -> SparseMatrix {
        SparseMatrix {
            nrows: self.ncols,
            ncols: self.nrows,
            entries: self.entries.iter().map(|&(r, c, v)| (c, r, v)).collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> SparseMatrix {
        SparseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            entries: self
                .entries
                .iter()
                .map(|&(r, c, v)| (r, c, v * factor))
                .collect(),
        }
    }
}

/// A diagonal matrix stored as its entries, used for the Diagonal Hodge star
/// and its inverse.
#[derive(Debug, Clone)]
pub struct DiagonalMatrix {
    pub entries: Vec<f64>,
}

impl DiagonalMatrix {
    pub fn new(entries: Vec<f64>) -> Self {
        DiagonalMatrix { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&nalgebra::DVector::from_vec(self.entries.clone()))
    }

    /// The inverse diagonal, failing if any entry is (near) zero.
    pub fn inverse(&self) -> Result<DiagonalMatrix> {
        let mut out = Vec::with_capacity(self.entries.len());
        for (id, &v) in self.entries.iter().enumerate() {
            if v.abs() < 1e-12 {
                return Err(DecError::DegenerateGeometry {
                    dim: crate::Dim::Zero,
                    id,
                    reason: "zero diagonal entry has no inverse".to_string(),
                });
            }
            out.push(1.0 / v);
        }
        Ok(DiagonalMatrix::new(out))
    }
}
