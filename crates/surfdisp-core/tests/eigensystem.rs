use nalgebra::DMatrix;
use std::sync::Once;
use surfdisp_core::symbolic::SymbolicError;
use surfdisp_core::{
    asymmetry, centralizer, commutator_norm, default_m, eigensystem, eigensystem_with,
    signature_u, AnalysisConfig, ShapeError, SurfaceError,
};

const TOL: f64 = 1e-9;

fn init_logger() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Deterministic symmetric matrices from a linear congruential sequence
fn symmetric_samples(count: usize, n: usize) -> Vec<DMatrix<f64>> {
    let mut state: u64 = 0x5eed_1234;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 11) as f64 / (1u64 << 53) as f64) * 4.0 - 2.0
    };
    (0..count)
        .map(|_| {
            let a = DMatrix::from_fn(n, n, |_, _| next());
            (&a + a.transpose()) * 0.5
        })
        .collect()
}

#[test]
fn default_matrix_trace_matches_eigenvalue_sum() {
    init_logger();
    let m = default_m();
    let sys = eigensystem(&m).unwrap();
    assert_eq!(sys.eigenvalues.len(), 4);
    assert_eq!(sys.eigenvectors.shape(), (4, 4));
    assert_eq!(sys.reconstructed.shape(), (4, 4));
    assert!((m.trace() - sys.eigenvalues.sum()).abs() < TOL);
}

#[test]
fn default_matrix_diagonalizes() {
    init_logger();
    let m = default_m();
    let sys = eigensystem(&m).unwrap();
    assert!(sys.orthonormality_residual() < TOL);
    assert!(sys.diagonalization_residual() < TOL);
    assert!(sys.reconstruction_residual(&m) < TOL);
    assert!(sys.verify(&m, TOL));
}

#[test]
fn eigenvalues_ascend() {
    init_logger();
    for m in symmetric_samples(8, 4)
        .into_iter()
        .chain(symmetric_samples(8, 2))
    {
        let sys = eigensystem(&m).unwrap();
        assert!(sys
            .eigenvalues
            .as_slice()
            .windows(2)
            .all(|w| w[0] <= w[1]));
    }
}

#[test]
fn random_symmetric_matrices_verify() {
    init_logger();
    for m in symmetric_samples(16, 4) {
        let sys = eigensystem(&m).unwrap();
        assert!(sys.trace_residual(&m) < TOL, "trace residual for\n{m}");
        assert!(sys.orthonormality_residual() < TOL, "QᵗQ != I for\n{m}");
        assert!(sys.diagonalization_residual() < TOL, "QᵗMQ not diagonal for\n{m}");
    }
}

#[test]
fn repeated_eigenvalues_stay_orthonormal() {
    init_logger();
    let m = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![2.0, 2.0, 5.0, 2.0]));
    let sys = eigensystem(&m).unwrap();
    assert!((sys.eigenvalues[0] - 2.0).abs() < TOL);
    assert!((sys.eigenvalues[3] - 5.0).abs() < TOL);
    assert!(sys.verify(&m, TOL));
}

#[test]
fn non_square_input_is_rejected() {
    let err = eigensystem(&DMatrix::<f64>::zeros(4, 3)).unwrap_err();
    assert_eq!(
        err,
        SurfaceError::Shape(ShapeError::NotSquare {
            op: "eigensystem",
            rows: 4,
            cols: 3
        })
    );
    assert!(err.to_string().contains("4x3"));
}

#[test]
fn configured_tolerances_are_honoured() {
    init_logger();
    let config =
        AnalysisConfig::from_json_str(r#"{ "symmetry_tolerance": 0.5, "verify_tolerance": 1e-10 }"#)
            .unwrap();
    let mut m = default_m();
    m[(0, 1)] += 1e-3;

    // 1e-3 of asymmetry: flagged at the default tolerance, accepted at 0.5
    assert!((asymmetry(&m).unwrap() - 1e-3).abs() < 1e-12);
    assert!(!AnalysisConfig::default().is_symmetric(&m).unwrap());
    assert!(config.is_symmetric(&m).unwrap());

    let sys = eigensystem_with(&m, &config).unwrap();
    assert_eq!(sys.eigenvalues.len(), 4);
    assert!(sys.orthonormality_residual() < config.verify_tolerance * 10.0);
}

#[test]
fn default_matrix_verifies_at_configured_tolerance() {
    init_logger();
    let m = default_m();
    let sys = eigensystem(&m).unwrap();
    assert!(sys.verify_with(&m, &AnalysisConfig::default()));
}

#[test]
fn empty_matrix_is_not_a_panic() {
    let empty = DMatrix::<f64>::zeros(0, 0);
    let sys = eigensystem(&empty).unwrap();
    assert!(sys.eigenvalues.is_empty());
    assert_eq!(centralizer(&empty).unwrap().dimension(), 0);
}

#[test]
fn non_finite_input_is_rejected_like_centralizer() {
    let mut m = default_m();
    m[(1, 1)] = f64::NAN;
    assert!(matches!(
        eigensystem(&m),
        Err(SurfaceError::Symbolic(SymbolicError::NonFinite(_)))
    ));
    assert!(matches!(
        centralizer(&m),
        Err(SurfaceError::Symbolic(SymbolicError::NonFinite(_)))
    ));
}

#[test]
fn sample_matrix_does_not_commute_with_signature() {
    let norm = commutator_norm(&default_m(), &signature_u()).unwrap();
    assert!(norm > 1.0);
    assert_eq!(commutator_norm(&signature_u(), &signature_u()).unwrap(), 0.0);
}
