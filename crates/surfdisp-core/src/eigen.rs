//! Dense eigendecomposition for small real symmetric matrices.
//!
//! Uses nalgebra's `SymmetricEigen` and reorders the result so eigenvalues
//! ascend and eigenvector columns follow them.

use crate::config::AnalysisConfig;
use crate::error::{require_square, Result, ShapeError};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use surfdisp_symbolic::SymbolicError;

/// Eigenvalues, eigenvectors and the change-of-basis check `QᵗMQ`.
#[derive(Debug, Clone)]
pub struct EigenSystem {
    /// Eigenvalues in ascending order.
    pub eigenvalues: DVector<f64>,
    /// Orthonormal eigenvectors as columns, matching `eigenvalues`.
    pub eigenvectors: DMatrix<f64>,
    /// `Qᵗ M Q`; diagonal up to rounding.
    pub reconstructed: DMatrix<f64>,
}

impl EigenSystem {
    /// `|trace(M) - Σλ|`
    pub fn trace_residual(&self, m: &DMatrix<f64>) -> f64 {
        (m.trace() - self.eigenvalues.sum()).abs()
    }

    /// Largest entry of `QᵗQ - I`
    pub fn orthonormality_residual(&self) -> f64 {
        let n = self.eigenvectors.ncols();
        let gram = self.eigenvectors.transpose() * &self.eigenvectors;
        (gram - DMatrix::<f64>::identity(n, n)).amax()
    }

    /// Largest entry of `QᵗMQ - diag(λ)`
    pub fn diagonalization_residual(&self) -> f64 {
        (&self.reconstructed - DMatrix::from_diagonal(&self.eigenvalues)).amax()
    }

    /// Largest entry of `M - Q diag(λ) Qᵗ`
    pub fn reconstruction_residual(&self, m: &DMatrix<f64>) -> f64 {
        let rebuilt = &self.eigenvectors
            * DMatrix::from_diagonal(&self.eigenvalues)
            * self.eigenvectors.transpose();
        (m - rebuilt).amax()
    }

    /// All residuals within `tol`, scaled by the magnitude of `m`
    pub fn verify(&self, m: &DMatrix<f64>, tol: f64) -> bool {
        let scale = m.amax().max(1.0);
        let bound = tol * scale;
        self.trace_residual(m) <= bound
            && self.orthonormality_residual() <= tol
            && self.diagonalization_residual() <= bound
            && self.reconstruction_residual(m) <= bound
    }

    /// [`EigenSystem::verify`] at `config.verify_tolerance`
    pub fn verify_with(&self, m: &DMatrix<f64>, config: &AnalysisConfig) -> bool {
        self.verify(m, config.verify_tolerance)
    }
}

/// Largest `|M[i][j] - M[j][i]|`; zero for an empty matrix
pub fn asymmetry(m: &DMatrix<f64>) -> Result<f64> {
    if require_square("asymmetry", m.shape())? == 0 {
        return Ok(0.0);
    }
    Ok((m - m.transpose()).amax())
}

/// Diagonalize a real symmetric matrix with default settings.
pub fn eigensystem(m: &DMatrix<f64>) -> Result<EigenSystem> {
    eigensystem_with(m, &AnalysisConfig::default())
}

/// Diagonalize a real symmetric matrix.
///
/// Asymmetric input is still decomposed from its lower triangle, with a
/// warning when the asymmetry exceeds `config.symmetry_tolerance`. Entries
/// must be finite. An empty matrix has an empty eigensystem.
pub fn eigensystem_with(m: &DMatrix<f64>, config: &AnalysisConfig) -> Result<EigenSystem> {
    let n = require_square("eigensystem", m.shape())?;
    if let Some(&bad) = m.iter().find(|v| !v.is_finite()) {
        return Err(SymbolicError::NonFinite(bad).into());
    }
    if n == 0 {
        return Ok(EigenSystem {
            eigenvalues: DVector::zeros(0),
            eigenvectors: DMatrix::zeros(0, 0),
            reconstructed: DMatrix::zeros(0, 0),
        });
    }

    if !config.is_symmetric(m)? {
        warn!(
            "eigensystem: input is not symmetric (max |M - Mᵗ| = {:e}); using lower triangle",
            asymmetry(m)?
        );
    }

    let eig = m.clone().symmetric_eigen();

    // Sort by eigenvalue.
    let mut indexed: Vec<(usize, f64)> = eig.eigenvalues.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.total_cmp(&b.1));

    let eigenvalues = DVector::from_iterator(n, indexed.iter().map(|&(_, e)| e));
    let columns: Vec<DVector<f64>> = indexed
        .iter()
        .map(|&(i, _)| eig.eigenvectors.column(i).into_owned())
        .collect();
    let eigenvectors = DMatrix::from_columns(&columns);
    let reconstructed = eigenvectors.transpose() * m * &eigenvectors;

    debug!("eigensystem: n={n}, eigenvalues={:?}", eigenvalues.as_slice());

    let sys = EigenSystem {
        eigenvalues,
        eigenvectors,
        reconstructed,
    };
    if !sys.verify_with(m, config) {
        warn!(
            "eigensystem: residuals exceed verify_tolerance {:e}",
            config.verify_tolerance
        );
    }
    Ok(sys)
}

/// `AB - BA` for numeric matrices of matching square shape
pub fn commutator(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    require_square("commutator", a.shape())?;
    if a.shape() != b.shape() {
        return Err(ShapeError::Mismatch {
            op: "commutator",
            left: a.shape(),
            right: b.shape(),
        }
        .into());
    }
    Ok(a * b - b * a)
}

/// Frobenius norm of `AB - BA`; zero means the matrices commute
pub fn commutator_norm(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64> {
    Ok(commutator(a, b)?.norm())
}
