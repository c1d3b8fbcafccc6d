//! Algebra of small pseudo-Hermitian / PT-symmetric toy models
//!
//! - [`eigensystem`]: numeric eigendecomposition of a real symmetric matrix
//! - [`centralizer`]: exact solution of `PM = MP` with a basis and the
//!   polynomial-span rank cross-check
//! - [`check_pseudo_hermiticity`]: exact `H†U = UH` / `H† = UHU` tests
//! - [`build_h`]: the structured 4x4 surface Hamiltonian
//!
//! Symbolic work is delegated to `surfdisp-symbolic`, which keeps every
//! equality test exact.

pub mod centralizer;
pub mod config;
pub mod eigen;
pub mod error;
pub mod hamiltonian;
pub mod models;
pub mod pseudo_hermitian;

pub use centralizer::{centralizer, centralizer_exact, polynomial_span_rank, Centralizer};
pub use config::AnalysisConfig;
pub use eigen::{
    asymmetry, commutator, commutator_norm, eigensystem, eigensystem_with, EigenSystem,
};
pub use error::{Result, ShapeError, SurfaceError};
pub use hamiltonian::{build_h, build_h_symbolic, surface_signature};
pub use models::{
    default_m, signature_u, surface_model_summary, toy_2x2_noncommutation, SurfaceSummary,
    ToyCommutation,
};
pub use pseudo_hermitian::{
    check_pseudo_hermiticity, pseudo_hermiticity_residuals, PseudoHermiticity,
};

pub use surfdisp_symbolic as symbolic;
