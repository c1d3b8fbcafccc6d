//! Symbolic centralizer `{P : PM = MP}` of a small matrix.
//!
//! The numeric input is rationalized first, so the commutation equations are
//! solved exactly. The solution family is then split into one basis matrix
//! per free parameter, and the rank of `{I, M, ..., M^(n-1)}` is computed as
//! a cross-check: for a simple spectrum both numbers equal `n`.

use crate::error::{require_square, Result};
use log::debug;
use nalgebra::DMatrix;
use std::collections::BTreeMap;
use surfdisp_symbolic::{
    linsolve, Domain, ExactMatrix, SymExpr, SymMatrix, Symbol, SymbolicError,
};

#[derive(Debug, Clone)]
pub struct Centralizer {
    /// General solution; entries are linear in `free_params`
    pub solution: SymMatrix,
    /// Free parameters, sorted by name
    pub free_params: Vec<Symbol>,
    /// One matrix per free parameter (that parameter 1, the others 0)
    pub basis: Vec<SymMatrix>,
    /// Rank of the vectorized powers `I, M, ..., M^(n-1)`
    pub poly_rank: usize,
}

impl Centralizer {
    pub fn dimension(&self) -> usize {
        self.free_params.len()
    }

    /// Only the zero matrix commutes with M
    pub fn is_trivial(&self) -> bool {
        self.free_params.is_empty()
    }

    /// True when every commuting matrix is a polynomial in M
    pub fn is_polynomial_algebra(&self) -> bool {
        self.dimension() == self.poly_rank
    }
}

/// Centralizer of a numeric matrix; entries are rationalized from their
/// shortest decimal representation.
pub fn centralizer(m: &DMatrix<f64>) -> Result<Centralizer> {
    require_square("centralizer", m.shape())?;
    centralizer_exact(&SymMatrix::from_real_dmatrix(m)?)
}

/// Centralizer of a matrix with exact constant entries.
pub fn centralizer_exact(m: &SymMatrix) -> Result<Centralizer> {
    let n = require_square("centralizer", m.shape())?;

    let unknowns = unknown_symbols(n * n);
    let p = SymMatrix::new(
        n,
        n,
        unknowns.iter().cloned().map(SymExpr::symbol).collect(),
    )?;
    let commutator = p.matmul(m)?.sub(&m.matmul(&p)?)?;

    // A homogeneous system always has the zero solution.
    let solved = linsolve(commutator.entries(), &unknowns)?.ok_or_else(|| {
        SymbolicError::InvalidOperation("homogeneous commutation system reported inconsistent".into())
    })?;

    let solution = SymMatrix::new(n, n, solved.values)?;
    let free_params = solved.free;
    let basis = free_params
        .iter()
        .map(|param| {
            let bindings: BTreeMap<Symbol, SymExpr> = free_params
                .iter()
                .map(|other| (other.clone(), SymExpr::int(i64::from(other == param))))
                .collect();
            solution.substitute_many(&bindings)
        })
        .collect();

    let poly_rank = polynomial_span_rank(m)?;
    debug!(
        "centralizer: n={n}, free={:?}, poly_rank={poly_rank}",
        free_params.iter().map(Symbol::name).collect::<Vec<_>>()
    );
    if free_params.len() != poly_rank {
        debug!("centralizer: dimension exceeds polynomial span; spectrum is degenerate");
    }

    Ok(Centralizer {
        solution,
        free_params,
        basis,
        poly_rank,
    })
}

/// Rank of the span of the vectorized powers `I, M, ..., M^(n-1)`
pub fn polynomial_span_rank(m: &SymMatrix) -> Result<usize> {
    let n = require_square("polynomial_span_rank", m.shape())?;
    let mut columns = Vec::with_capacity(n);
    let mut power = SymMatrix::identity(n);
    for _ in 0..n {
        columns.push(power.to_exact()?.into_row_major());
        power = power.matmul(m)?;
    }
    Ok(ExactMatrix::from_columns(&columns)?.rank()?)
}

/// Real unknowns named `a, b, c, ...` in row-major order; beyond 26 entries
/// zero-padded `u000, u001, ...` so name order still matches position.
fn unknown_symbols(count: usize) -> Vec<Symbol> {
    (0..count)
        .map(|k| {
            let name = if count <= 26 {
                char::from(b'a' + k as u8).to_string()
            } else {
                format!("u{k:03}")
            };
            Symbol::new(&name, Domain::Real)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknowns_follow_row_major_letters() {
        let names: Vec<_> = unknown_symbols(16)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("a"));
        assert_eq!(names.last().map(String::as_str), Some("p"));

        let wide = unknown_symbols(36);
        assert_eq!(wide[0].name(), "u000");
        assert!(wide.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_two_by_two_with_distinct_eigenvalues() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let c = centralizer(&m).unwrap();
        assert_eq!(c.dimension(), 2);
        assert_eq!(c.poly_rank, 2);
        assert!(c.is_polynomial_algebra());
        assert!(!c.is_trivial());
    }

    #[test]
    fn test_scalar_matrix_commutes_with_everything() {
        let m = DMatrix::<f64>::identity(2, 2) * 5.0;
        let c = centralizer(&m).unwrap();
        assert_eq!(c.dimension(), 4);
        assert_eq!(c.poly_rank, 1);
        assert!(!c.is_polynomial_algebra());
    }
}
