//! Exact symbolic algebra for surfdisp
//!
//! This crate provides the exact arithmetic that the pseudo-Hermiticity and
//! centralizer computations rely on. Floating point never enters a symbolic
//! equality test.
//!
//! # Architecture
//!
//! - Gaussian-rational coefficients over arbitrary-precision integers
//! - Named real or complex symbols
//! - Shared expression trees with a canonical polynomial normal form
//! - Symbolic matrices and exact linear solving / rank
//!
//! Two expressions are equal exactly when their normal forms agree, so
//! "simplifies to zero" is a structural check on the expanded polynomial.

mod coeff;
mod expr;
mod linsolve;
mod matrix;
mod normalize;
mod symbol;

pub use coeff::{Coefficient, Rational};
pub use expr::{SymExpr, SymExprKind};
pub use linsolve::{linsolve, ExactMatrix, LinearSolution};
pub use matrix::{Eigenspace, SymMatrix};
pub use normalize::{Atom, Monomial, Polynomial};
pub use symbol::{symbols, Domain, Symbol};

/// Error type for symbolic operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolicError {
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot represent non-finite value {0} exactly")]
    NonFinite(f64),

    #[error("expression is not linear in the unknowns: {0}")]
    NonLinear(String),

    #[error("{op}: dimension mismatch between {left:?} and {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
}

pub type Result<T> = std::result::Result<T, SymbolicError>;
