//! Exact linear algebra over the Gaussian rationals
//!
//! Row reduction never divides by an approximate pivot: any non-zero exact
//! coefficient is a valid pivot, so the first one in each column is taken.

use crate::coeff::Coefficient;
use crate::expr::SymExpr;
use crate::symbol::Symbol;
use crate::{Result, SymbolicError};
use log::trace;

/// Dense row-major matrix of exact coefficients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Coefficient>,
}

impl ExactMatrix {
    /// Build from row-major entries
    pub fn new(rows: usize, cols: usize, data: Vec<Coefficient>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(SymbolicError::InvalidOperation(format!(
                "matrix of shape {rows}x{cols} needs {} entries, got {}",
                rows * cols,
                data.len()
            )));
        }
        Ok(ExactMatrix { rows, cols, data })
    }

    /// All-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        ExactMatrix {
            rows,
            cols,
            data: vec![Coefficient::zero(); rows * cols],
        }
    }

    /// Stack equal-length vectors side by side as columns
    pub fn from_columns(columns: &[Vec<Coefficient>]) -> Result<Self> {
        let rows = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().find(|col| col.len() != rows) {
            return Err(SymbolicError::DimensionMismatch {
                op: "from_columns",
                left: (rows, 1),
                right: (bad.len(), 1),
            });
        }
        let cols = columns.len();
        let mut m = ExactMatrix::zeros(rows, cols);
        for (c, column) in columns.iter().enumerate() {
            for (r, value) in column.iter().enumerate() {
                m.data[r * cols + c] = value.clone();
            }
        }
        Ok(m)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(row, col)`; panics out of bounds
    pub fn get(&self, row: usize, col: usize) -> &Coefficient {
        &self.data[row * self.cols + col]
    }

    /// Row-major entries
    pub fn into_row_major(self) -> Vec<Coefficient> {
        self.data
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    /// Reduced row echelon form and the pivot column of each non-zero row
    pub fn rref(&self) -> Result<(ExactMatrix, Vec<usize>)> {
        let mut m = self.clone();
        let mut pivots = Vec::new();
        let mut row = 0;

        for col in 0..m.cols {
            if row == m.rows {
                break;
            }
            let Some(pivot_row) = (row..m.rows).find(|&r| !m.get(r, col).is_zero()) else {
                continue;
            };
            m.swap_rows(row, pivot_row);

            let inv = m.get(row, col).recip()?;
            for c in col..m.cols {
                let idx = row * m.cols + c;
                m.data[idx] = &m.data[idx] * &inv;
            }

            for r in 0..m.rows {
                if r == row || m.get(r, col).is_zero() {
                    continue;
                }
                let factor = m.get(r, col).clone();
                for c in col..m.cols {
                    let scaled = &factor * m.get(row, c);
                    let idx = r * m.cols + c;
                    m.data[idx] = &m.data[idx] - &scaled;
                }
            }

            pivots.push(col);
            row += 1;
        }

        Ok((m, pivots))
    }

    /// Number of pivots after row reduction
    pub fn rank(&self) -> Result<usize> {
        Ok(self.rref()?.1.len())
    }
}

/// A parametric solution of a consistent linear system
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSolution {
    /// Value of each unknown, in the order the unknowns were given. Free
    /// unknowns map to themselves; the rest are combinations of free ones.
    pub values: Vec<SymExpr>,
    /// Unknowns left free by the system, sorted by name
    pub free: Vec<Symbol>,
}

/// Solve `equations = 0` for `unknowns` exactly.
///
/// Every equation must be affine in the unknowns. Returns `Ok(None)` when the
/// system is inconsistent; otherwise the single solution family.
pub fn linsolve(equations: &[SymExpr], unknowns: &[Symbol]) -> Result<Option<LinearSolution>> {
    let n = unknowns.len();
    let width = n + 1;
    let mut augmented = ExactMatrix::zeros(equations.len(), width);

    for (r, equation) in equations.iter().enumerate() {
        let (coeffs, constant) = equation.to_polynomial().linear_form(unknowns)?;
        for (c, value) in coeffs.into_iter().enumerate() {
            augmented.data[r * width + c] = value;
        }
        // a.x + k = 0  =>  a.x = -k
        augmented.data[r * width + n] = -constant;
    }

    let (reduced, pivots) = augmented.rref()?;
    trace!(
        "linsolve: {} equations, {} unknowns, rank {}",
        equations.len(),
        n,
        pivots.len()
    );

    if pivots.last() == Some(&n) {
        return Ok(None);
    }

    let free_cols: Vec<usize> = (0..n).filter(|c| !pivots.contains(c)).collect();
    let mut values: Vec<SymExpr> = unknowns.iter().cloned().map(SymExpr::symbol).collect();

    for (row, &col) in pivots.iter().enumerate() {
        let mut terms = vec![SymExpr::num(reduced.get(row, n).clone())];
        for &free in &free_cols {
            let coeff = reduced.get(row, free);
            if !coeff.is_zero() {
                terms.push(SymExpr::mul(vec![
                    SymExpr::num(-coeff),
                    SymExpr::symbol(unknowns[free].clone()),
                ]));
            }
        }
        values[col] = SymExpr::add(terms).simplify();
    }

    let mut free: Vec<Symbol> = free_cols.iter().map(|&c| unknowns[c].clone()).collect();
    free.sort();

    Ok(Some(LinearSolution { values, free }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{symbols, Domain};

    fn ints(rows: usize, cols: usize, values: &[i64]) -> ExactMatrix {
        ExactMatrix::new(rows, cols, values.iter().map(|&v| Coefficient::int(v)).collect()).unwrap()
    }

    #[test]
    fn test_rank() {
        assert_eq!(ints(2, 2, &[1, 2, 2, 4]).rank().unwrap(), 1);
        assert_eq!(ints(2, 2, &[1, 2, 3, 4]).rank().unwrap(), 2);
        assert_eq!(ints(2, 3, &[0, 0, 0, 0, 0, 0]).rank().unwrap(), 0);
    }

    #[test]
    fn test_rref_pivots() {
        let (reduced, pivots) = ints(2, 3, &[2, 4, 2, 1, 2, 3]).rref().unwrap();
        assert_eq!(pivots, vec![0, 2]);
        assert_eq!(reduced.get(0, 1), &Coefficient::int(2));
        assert!(reduced.get(1, 0).is_zero());
    }

    #[test]
    fn test_from_columns() {
        let m = ExactMatrix::from_columns(&[
            vec![Coefficient::int(1), Coefficient::int(2)],
            vec![Coefficient::int(3), Coefficient::int(4)],
        ])
        .unwrap();
        assert_eq!(m.get(0, 1), &Coefficient::int(3));
        assert_eq!(m.get(1, 0), &Coefficient::int(2));
        assert!(ExactMatrix::from_columns(&[vec![Coefficient::one()], vec![]]).is_err());
    }

    #[test]
    fn test_linsolve_unique() {
        // x + y - 3 = 0, x - y - 1 = 0
        let xs = symbols("x y", Domain::Real);
        let x = SymExpr::symbol(xs[0].clone());
        let y = SymExpr::symbol(xs[1].clone());
        let eqs = vec![
            x.clone() + y.clone() - SymExpr::int(3),
            x - y - SymExpr::int(1),
        ];
        let sol = linsolve(&eqs, &xs).unwrap().unwrap();
        assert!(sol.free.is_empty());
        assert_eq!(sol.values[0], SymExpr::int(2));
        assert_eq!(sol.values[1], SymExpr::int(1));
    }

    #[test]
    fn test_linsolve_homogeneous_family() {
        // a - b = 0 leaves b free
        let xs = symbols("a b", Domain::Real);
        let eqs = vec![SymExpr::symbol(xs[0].clone()) - SymExpr::symbol(xs[1].clone())];
        let sol = linsolve(&eqs, &xs).unwrap().unwrap();
        assert_eq!(sol.free, vec![xs[1].clone()]);
        assert_eq!(sol.values[0], SymExpr::symbol(xs[1].clone()));
        assert_eq!(sol.values[1], SymExpr::symbol(xs[1].clone()));
    }

    #[test]
    fn test_linsolve_inconsistent() {
        let xs = symbols("x", Domain::Real);
        let x = SymExpr::symbol(xs[0].clone());
        let eqs = vec![x.clone() - SymExpr::int(1), x - SymExpr::int(2)];
        assert_eq!(linsolve(&eqs, &xs).unwrap(), None);
    }

    #[test]
    fn test_linsolve_rejects_nonlinear() {
        let xs = symbols("x", Domain::Real);
        let x = SymExpr::symbol(xs[0].clone());
        let eqs = vec![SymExpr::pow(x, 2)];
        assert!(matches!(
            linsolve(&eqs, &xs),
            Err(SymbolicError::NonLinear(_))
        ));
    }
}
