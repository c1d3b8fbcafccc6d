//! Structured 4x4 surface Hamiltonian.
//!
//! With `s = (1, -1, 1, -1)` the pattern satisfies `conj(H[j][i]) =
//! s[i] s[j] H[i][j]` for real parameters, which is pseudo-Hermiticity with
//! respect to `diag(s)`:
//!
//! ```text
//! [  r         i w z        0            -v (i x - y) ]
//! [  i w z     -r           -v (-i x - y)  0          ]
//! [  0         v (i x - y)  r             i w z       ]
//! [  v (-i x - y)  0        i w z         -r          ]
//! ```

use surfdisp_symbolic::{symbols, Domain, SymExpr, SymMatrix, Symbol};

/// Build H from six real scalars (numbers or real symbols).
pub fn build_h(
    r: impl Into<SymExpr>,
    w: impl Into<SymExpr>,
    z: impl Into<SymExpr>,
    v: impl Into<SymExpr>,
    x: impl Into<SymExpr>,
    y: impl Into<SymExpr>,
) -> SymMatrix {
    let (r, w, z, v, x, y) = (r.into(), w.into(), z.into(), v.into(), x.into(), y.into());
    let i = SymExpr::imag_unit();

    let iwz = i.clone() * w * z;
    // v (i x - y) and v (-i x - y)
    let forward = v.clone() * (i.clone() * x.clone() - y.clone());
    let backward = v * (-(i * x) - y);

    SymMatrix::from_fn(4, 4, |row, col| {
        let entry = match (row, col) {
            (0, 0) | (2, 2) => r.clone(),
            (1, 1) | (3, 3) => -r.clone(),
            (0, 1) | (1, 0) | (2, 3) | (3, 2) => iwz.clone(),
            (0, 3) => -forward.clone(),
            (3, 0) => backward.clone(),
            (1, 2) => -backward.clone(),
            (2, 1) => forward.clone(),
            _ => SymExpr::int(0),
        };
        entry.simplify()
    })
}

/// H over the real symbols `r w z v x y`, returned with those symbols.
pub fn build_h_symbolic() -> (SymMatrix, Vec<Symbol>) {
    let params = symbols("r w z v x y", Domain::Real);
    let h = build_h(
        params[0].clone(),
        params[1].clone(),
        params[2].clone(),
        params[3].clone(),
        params[4].clone(),
        params[5].clone(),
    );
    (h, params)
}

/// The 4x4 signature `diag(1, -1, 1, -1)`
pub fn surface_signature() -> SymMatrix {
    SymMatrix::signature(4)
}
