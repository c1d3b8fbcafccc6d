//! Dense symbolic matrices
//!
//! Entries are stored row-major. Products and sums simplify each entry into
//! normal form, so repeated algebra does not grow expression trees.

use crate::coeff::Coefficient;
use crate::expr::SymExpr;
use crate::linsolve::ExactMatrix;
use crate::symbol::Symbol;
use crate::{Result, SymbolicError};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymMatrix {
    rows: usize,
    cols: usize,
    data: Vec<SymExpr>,
}

/// One eigenvalue of a diagonal matrix with its unit eigenvectors
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenspace {
    pub value: SymExpr,
    pub multiplicity: usize,
    pub vectors: Vec<Vec<SymExpr>>,
}

impl SymMatrix {
    /// Build from row-major entries
    pub fn new(rows: usize, cols: usize, data: Vec<SymExpr>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(SymbolicError::InvalidOperation(format!(
                "matrix of shape {rows}x{cols} needs {} entries, got {}",
                rows * cols,
                data.len()
            )));
        }
        Ok(SymMatrix { rows, cols, data })
    }

    /// Build from rows of equal length
    pub fn from_rows(rows: Vec<Vec<SymExpr>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(SymbolicError::InvalidOperation(format!(
                "ragged rows: expected {n_cols} entries per row, found {}",
                bad.len()
            )));
        }
        Ok(SymMatrix {
            rows: n_rows,
            cols: n_cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Build by evaluating `f(row, col)`
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> SymExpr) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        SymMatrix { rows, cols, data }
    }

    /// All-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        SymMatrix::from_fn(rows, cols, |_, _| SymExpr::int(0))
    }

    /// `n x n` identity
    pub fn identity(n: usize) -> Self {
        SymMatrix::from_fn(n, n, |r, c| SymExpr::int(i64::from(r == c)))
    }

    /// Square matrix with `entries` on the diagonal
    pub fn diag(entries: Vec<SymExpr>) -> Self {
        let n = entries.len();
        SymMatrix::from_fn(n, n, |r, c| {
            if r == c {
                entries[r].clone()
            } else {
                SymExpr::int(0)
            }
        })
    }

    /// Alternating signature `diag(1, -1, 1, -1, ...)`
    pub fn signature(n: usize) -> Self {
        SymMatrix::diag(
            (0..n)
                .map(|k| SymExpr::int(if k % 2 == 0 { 1 } else { -1 }))
                .collect(),
        )
    }

    /// Exact copy of a real matrix, each entry rationalized from its decimal form
    pub fn from_real_dmatrix(m: &DMatrix<f64>) -> Result<Self> {
        let mut data = Vec::with_capacity(m.len());
        for r in 0..m.nrows() {
            for c in 0..m.ncols() {
                data.push(SymExpr::from_f64(m[(r, c)])?);
            }
        }
        SymMatrix::new(m.nrows(), m.ncols(), data)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Check if rows == cols
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at `(row, col)`, or `None` out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&SymExpr> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Row-major entries
    pub fn entries(&self) -> &[SymExpr] {
        &self.data
    }

    /// Apply `f` to every entry
    pub fn map(&self, f: impl FnMut(&SymExpr) -> SymExpr) -> SymMatrix {
        SymMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Transpose
    pub fn transpose(&self) -> SymMatrix {
        SymMatrix::from_fn(self.cols, self.rows, |r, c| {
            self.data[c * self.cols + r].clone()
        })
    }

    /// Entrywise complex conjugate
    pub fn conjugate(&self) -> SymMatrix {
        self.map(SymExpr::conjugate)
    }

    /// Conjugate transpose `H†`
    pub fn adjoint(&self) -> SymMatrix {
        self.conjugate().transpose()
    }

    /// Entrywise normal form
    pub fn simplify(&self) -> SymMatrix {
        self.map(SymExpr::simplify)
    }

    /// Exact test for the zero matrix
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(SymExpr::is_identically_zero)
    }

    /// Entrywise sum
    pub fn add(&self, other: &SymMatrix) -> Result<SymMatrix> {
        self.elementwise("add", other, |a, b| a.clone() + b.clone())
    }

    /// Entrywise difference
    pub fn sub(&self, other: &SymMatrix) -> Result<SymMatrix> {
        self.elementwise("sub", other, |a, b| a.clone() - b.clone())
    }

    fn elementwise(
        &self,
        op: &'static str,
        other: &SymMatrix,
        f: impl Fn(&SymExpr, &SymExpr) -> SymExpr,
    ) -> Result<SymMatrix> {
        if self.shape() != other.shape() {
            return Err(SymbolicError::DimensionMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(SymMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(a, b).simplify())
                .collect(),
        })
    }

    /// Matrix product
    pub fn matmul(&self, other: &SymMatrix) -> Result<SymMatrix> {
        if self.cols != other.rows {
            return Err(SymbolicError::DimensionMismatch {
                op: "matmul",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(SymMatrix::from_fn(self.rows, other.cols, |r, c| {
            let terms = (0..self.cols)
                .map(|k| {
                    self.data[r * self.cols + k].clone() * other.data[k * other.cols + c].clone()
                })
                .collect();
            SymExpr::add(terms).simplify()
        }))
    }

    /// Repeated product; `A^0 = I`
    pub fn pow(&self, exp: u32) -> Result<SymMatrix> {
        if !self.is_square() {
            return Err(SymbolicError::DimensionMismatch {
                op: "pow",
                left: self.shape(),
                right: self.shape(),
            });
        }
        let mut result = SymMatrix::identity(self.rows);
        for _ in 0..exp {
            result = result.matmul(self)?;
        }
        Ok(result)
    }

    /// Substitute into every entry
    pub fn substitute_many(&self, bindings: &BTreeMap<Symbol, SymExpr>) -> SymMatrix {
        self.map(|e| e.substitute_many(bindings).simplify())
    }

    /// Union of the entries' symbols
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        self.data.iter().flat_map(SymExpr::free_symbols).collect()
    }

    /// Row-major flattening into a single vector
    pub fn vectorize(&self) -> Vec<SymExpr> {
        self.data.clone()
    }

    /// Numeric view of a matrix whose entries are all constants
    pub fn to_exact(&self) -> Result<ExactMatrix> {
        let mut data = Vec::with_capacity(self.data.len());
        for (idx, entry) in self.data.iter().enumerate() {
            data.push(constant_entry(entry, idx / self.cols, idx % self.cols)?);
        }
        ExactMatrix::new(self.rows, self.cols, data)
    }

    /// Evaluate a constant matrix numerically
    pub fn to_complex_dmatrix(&self) -> Result<DMatrix<Complex64>> {
        let exact = self.to_exact()?;
        Ok(DMatrix::from_fn(self.rows, self.cols, |r, c| {
            exact.get(r, c).to_complex64()
        }))
    }

    /// Eigenvalues and eigenvectors of a diagonal matrix, grouped by value in
    /// order of first appearance on the diagonal.
    pub fn diagonal_eigenvects(&self) -> Result<Vec<Eigenspace>> {
        if !self.is_square() {
            return Err(SymbolicError::InvalidOperation(format!(
                "eigenvectors need a square matrix, got {}x{}",
                self.rows, self.cols
            )));
        }
        let n = self.rows;
        for r in 0..n {
            for c in 0..n {
                if r != c && !self.data[r * n + c].is_identically_zero() {
                    return Err(SymbolicError::InvalidOperation(format!(
                        "matrix is not diagonal: entry ({r}, {c}) is {}",
                        self.data[r * n + c]
                    )));
                }
            }
        }

        let mut spaces: Vec<Eigenspace> = Vec::new();
        for k in 0..n {
            let value = self.data[k * n + k].simplify();
            let unit: Vec<SymExpr> = (0..n).map(|j| SymExpr::int(i64::from(j == k))).collect();
            match spaces.iter_mut().find(|space| space.value == value) {
                Some(space) => {
                    space.multiplicity += 1;
                    space.vectors.push(unit);
                }
                None => spaces.push(Eigenspace {
                    value,
                    multiplicity: 1,
                    vectors: vec![unit],
                }),
            }
        }
        Ok(spaces)
    }
}

fn constant_entry(entry: &SymExpr, row: usize, col: usize) -> Result<Coefficient> {
    entry.to_polynomial().as_constant().ok_or_else(|| {
        SymbolicError::InvalidOperation(format!(
            "entry ({row}, {col}) is not a constant: {entry}"
        ))
    })
}

impl fmt::Display for SymMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            if r > 0 {
                writeln!(f)?;
            }
            f.write_str("[")?;
            for c in 0..self.cols {
                if c > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", self.data[r * self.cols + c])?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}
