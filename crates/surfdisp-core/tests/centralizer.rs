use nalgebra::{DMatrix, DVector};
use std::sync::Once;
use surfdisp_core::symbolic::{ExactMatrix, SymMatrix};
use surfdisp_core::{centralizer, centralizer_exact, default_m, ShapeError, SurfaceError};

fn init_logger() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn commutes(p: &SymMatrix, m: &SymMatrix) -> bool {
    p.matmul(m).unwrap().sub(&m.matmul(p).unwrap()).unwrap().is_zero()
}

fn diagonal(values: &[f64]) -> DMatrix<f64> {
    DMatrix::from_diagonal(&DVector::from_vec(values.to_vec()))
}

#[test]
fn default_matrix_has_four_dimensional_centralizer() {
    init_logger();
    let c = centralizer(&default_m()).unwrap();
    assert_eq!(c.free_params.len(), 4);
    assert_eq!(c.poly_rank, 4);
    assert!(c.is_polynomial_algebra());
    assert_eq!(c.basis.len(), c.free_params.len());
}

#[test]
fn free_parameters_are_sorted_and_stable() {
    init_logger();
    let first = centralizer(&default_m()).unwrap();
    let second = centralizer(&default_m()).unwrap();

    let names: Vec<_> = first.free_params.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["m", "n", "o", "p"]);
    assert_eq!(first.free_params, second.free_params);
    assert_eq!(first.solution, second.solution);
    assert_eq!(first.basis, second.basis);
}

#[test]
fn general_solution_commutes_symbolically() {
    init_logger();
    let m = SymMatrix::from_real_dmatrix(&default_m()).unwrap();
    let c = centralizer_exact(&m).unwrap();
    assert!(commutes(&c.solution, &m));
    assert_eq!(
        c.solution.free_symbols().into_iter().collect::<Vec<_>>(),
        c.free_params
    );
}

#[test]
fn every_basis_matrix_commutes_exactly() {
    init_logger();
    let m = SymMatrix::from_real_dmatrix(&default_m()).unwrap();
    let c = centralizer_exact(&m).unwrap();
    for (idx, b) in c.basis.iter().enumerate() {
        assert!(b.free_symbols().is_empty(), "basis #{idx} still has symbols:\n{b}");
        assert!(commutes(b, &m), "basis #{idx} does not commute:\n{b}");
    }
}

#[test]
fn basis_is_linearly_independent() {
    init_logger();
    let c = centralizer(&default_m()).unwrap();
    let columns: Vec<_> = c
        .basis
        .iter()
        .map(|b| b.to_exact().unwrap().into_row_major())
        .collect();
    let stacked = ExactMatrix::from_columns(&columns).unwrap();
    assert_eq!(stacked.rank().unwrap(), c.basis.len());
}

#[test]
fn toy_two_by_two_is_generic() {
    init_logger();
    let a2 = DMatrix::from_row_slice(2, 2, &[1.95, -0.64, -0.64, 0.10]);
    let c = centralizer(&a2).unwrap();
    assert_eq!(c.dimension(), 2);
    assert_eq!(c.poly_rank, 2);
}

#[test]
fn repeated_eigenvalue_enlarges_centralizer() {
    init_logger();
    // diag(1, 1, 2, 3): a 2x2 block plus two scalars
    let c = centralizer(&diagonal(&[1.0, 1.0, 2.0, 3.0])).unwrap();
    assert_eq!(c.dimension(), 6);
    assert!(c.dimension() > 4);
    assert_eq!(c.poly_rank, 3);
    assert!(!c.is_polynomial_algebra());

    let m = SymMatrix::from_real_dmatrix(&diagonal(&[1.0, 1.0, 2.0, 3.0])).unwrap();
    assert!(c.basis.iter().all(|b| commutes(b, &m)));
}

#[test]
fn signature_centralizer_is_block_diagonal() {
    init_logger();
    // diag(1, -1, 1, -1): two 2-dimensional eigenspaces
    let c = centralizer(&diagonal(&[1.0, -1.0, 1.0, -1.0])).unwrap();
    assert_eq!(c.dimension(), 8);
    assert_eq!(c.poly_rank, 2);
}

#[test]
fn identity_commutes_with_everything() {
    init_logger();
    let c = centralizer(&DMatrix::<f64>::identity(4, 4)).unwrap();
    assert_eq!(c.dimension(), 16);
    assert_eq!(c.poly_rank, 1);
    assert!(!c.is_trivial());
}

#[test]
fn non_square_input_is_rejected() {
    let err = centralizer(&DMatrix::<f64>::zeros(2, 4)).unwrap_err();
    assert!(matches!(
        err,
        SurfaceError::Shape(ShapeError::NotSquare { rows: 2, cols: 4, .. })
    ));
}

#[test]
fn non_finite_entries_are_rejected() {
    let mut m = default_m();
    m[(2, 2)] = f64::NAN;
    assert!(matches!(
        centralizer(&m),
        Err(SurfaceError::Symbolic(_))
    ));
}
