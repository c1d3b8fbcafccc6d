//! Sample matrices of the surface dispersion toy model.

use crate::error::Result;
use crate::hamiltonian::{build_h, surface_signature};
use crate::pseudo_hermitian::check_pseudo_hermiticity;
use nalgebra::{DMatrix, DVector};
use surfdisp_symbolic::{SymExpr, SymMatrix};

/// The concrete 4x4 real symmetric matrix M.
pub fn default_m() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            -1.26, 0.71, -0.42, -0.15, //
            0.71, 0.30, -1.42, 0.40, //
            -0.42, -1.42, 1.58, 0.75, //
            -0.15, 0.40, 0.75, 0.76,
        ],
    )
}

/// Numeric `diag(1, -1, 1, -1)`.
pub fn signature_u() -> DMatrix<f64> {
    DMatrix::from_diagonal(&DVector::from_vec(vec![1.0, -1.0, 1.0, -1.0]))
}

#[derive(Debug, Clone)]
pub struct ToyCommutation {
    pub a2: SymMatrix,
    pub u2: SymMatrix,
    /// `A2 U2 - U2 A2`
    pub commutator: SymMatrix,
}

/// 2x2 example of a symmetric matrix that does not commute with `diag(1, -1)`.
pub fn toy_2x2_noncommutation() -> Result<ToyCommutation> {
    let a2 = SymMatrix::from_real_dmatrix(&DMatrix::from_row_slice(
        2,
        2,
        &[1.95, -0.64, -0.64, 0.10],
    ))?;
    let u2 = SymMatrix::signature(2);
    let commutator = a2.matmul(&u2)?.sub(&u2.matmul(&a2)?)?;
    Ok(ToyCommutation { a2, u2, commutator })
}

#[derive(Debug, Clone)]
pub struct SurfaceSummary {
    pub h: SymMatrix,
    pub u: SymMatrix,
    /// `H†U = UH`
    pub intertwines: bool,
    /// `H† = UHU`
    pub conjugates: bool,
}

/// Build H for the given parameters and check it against `diag(1, -1, 1, -1)`.
pub fn surface_model_summary(
    r: impl Into<SymExpr>,
    w: impl Into<SymExpr>,
    z: impl Into<SymExpr>,
    v: impl Into<SymExpr>,
    x: impl Into<SymExpr>,
    y: impl Into<SymExpr>,
) -> Result<SurfaceSummary> {
    let u = surface_signature();
    let h = build_h(r, w, z, v, x, y);
    let check = check_pseudo_hermiticity(&h, Some(&u))?;
    Ok(SurfaceSummary {
        h,
        u,
        intertwines: check.intertwines,
        conjugates: check.conjugates,
    })
}
