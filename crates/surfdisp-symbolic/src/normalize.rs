//! Canonical normal form for symbolic expressions
//!
//! Every expression expands into a [`Polynomial`]: a sorted map from monomials
//! to non-zero exact coefficients. The normal form is unique, so:
//! - equality of expressions is equality of their polynomials
//! - an expression simplifies to zero iff its polynomial has no terms
//! - printing the rebuilt expression is deterministic

use crate::coeff::Coefficient;
use crate::expr::{SymExpr, SymExprKind};
use crate::symbol::Symbol;
use crate::{Result, SymbolicError};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

/// A polynomial variable: a symbol, or the conjugate of a non-real symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    symbol: Symbol,
    conjugated: bool,
}

impl Atom {
    /// Real symbols are their own conjugate, so the flag is dropped for them.
    pub fn new(symbol: Symbol, conjugated: bool) -> Self {
        let conjugated = conjugated && !symbol.is_real();
        Atom { symbol, conjugated }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn is_conjugated(&self) -> bool {
        self.conjugated
    }

    pub fn conjugate(&self) -> Atom {
        Atom::new(self.symbol.clone(), !self.conjugated)
    }

    fn to_expr(&self) -> SymExpr {
        if self.conjugated {
            SymExpr::conj_symbol(self.symbol.clone())
        } else {
            SymExpr::symbol(self.symbol.clone())
        }
    }
}

/// Product of atoms with positive exponents; the empty monomial is `1`.
pub type Monomial = BTreeMap<Atom, u32>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, Coefficient>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial::default()
    }

    pub fn constant(c: Coefficient) -> Self {
        let mut p = Polynomial::zero();
        p.add_term(Monomial::new(), c);
        p
    }

    pub fn atom(atom: Atom) -> Self {
        let mut monomial = Monomial::new();
        monomial.insert(atom, 1);
        let mut p = Polynomial::zero();
        p.add_term(monomial, Coefficient::one());
        p
    }

    /// Expand an expression tree into normal form
    pub fn from_expr(expr: &SymExpr) -> Self {
        match expr.kind.as_ref() {
            SymExprKind::Num(c) => Polynomial::constant(c.clone()),
            SymExprKind::Var(s) => Polynomial::atom(Atom::new(s.clone(), false)),
            SymExprKind::Conj(s) => Polynomial::atom(Atom::new(s.clone(), true)),
            SymExprKind::Add(terms) => terms.iter().fold(Polynomial::zero(), |acc, t| {
                &acc + &Polynomial::from_expr(t)
            }),
            SymExprKind::Mul(factors) => factors
                .iter()
                .fold(Polynomial::constant(Coefficient::one()), |acc, f| {
                    &acc * &Polynomial::from_expr(f)
                }),
            SymExprKind::Pow(base, exp) => Polynomial::from_expr(base).pow(*exp),
            SymExprKind::Neg(inner) => -&Polynomial::from_expr(inner),
        }
    }

    /// Rebuild an expression tree, terms in ascending monomial order
    pub fn to_expr(&self) -> SymExpr {
        SymExpr::add(
            self.terms
                .iter()
                .map(|(monomial, coeff)| term_expr(monomial, coeff))
                .collect(),
        )
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Coefficient)> {
        self.terms.iter()
    }

    /// The value of a polynomial without atoms
    pub fn as_constant(&self) -> Option<Coefficient> {
        match self.terms.len() {
            0 => Some(Coefficient::zero()),
            1 => self.terms.get(&Monomial::new()).cloned(),
            _ => None,
        }
    }

    pub fn pow(&self, exp: u32) -> Polynomial {
        let mut result = Polynomial::constant(Coefficient::one());
        for _ in 0..exp {
            result = &result * self;
        }
        result
    }

    /// Conjugate coefficients and swap non-real atoms with their conjugates
    pub fn conjugate(&self) -> Polynomial {
        let mut out = Polynomial::zero();
        for (monomial, coeff) in &self.terms {
            let conj: Monomial = monomial
                .iter()
                .map(|(atom, exp)| (atom.conjugate(), *exp))
                .collect();
            out.add_term(conj, coeff.conj());
        }
        out
    }

    /// Split an affine polynomial into per-unknown coefficients and a constant.
    ///
    /// Fails with [`SymbolicError::NonLinear`] on any term that is not a
    /// constant or a single unknown to the first power.
    pub fn linear_form(&self, unknowns: &[Symbol]) -> Result<(Vec<Coefficient>, Coefficient)> {
        let mut coeffs = vec![Coefficient::zero(); unknowns.len()];
        let mut constant = Coefficient::zero();

        for (monomial, coeff) in &self.terms {
            if monomial.is_empty() {
                constant = coeff.clone();
                continue;
            }
            let position = match single_atom(monomial) {
                Some(atom) if !atom.is_conjugated() => {
                    unknowns.iter().position(|u| u == atom.symbol())
                }
                _ => None,
            };
            match position {
                Some(idx) => coeffs[idx] = coeff.clone(),
                None => {
                    return Err(SymbolicError::NonLinear(
                        term_expr(monomial, coeff).to_string(),
                    ))
                }
            }
        }

        Ok((coeffs, constant))
    }

    fn add_term(&mut self, monomial: Monomial, coeff: Coefficient) {
        if coeff.is_zero() {
            return;
        }
        match self.terms.entry(monomial) {
            Entry::Vacant(slot) => {
                slot.insert(coeff);
            }
            Entry::Occupied(mut slot) => {
                let sum = slot.get() + &coeff;
                if sum.is_zero() {
                    slot.remove();
                } else {
                    *slot.get_mut() = sum;
                }
            }
        }
    }
}

fn single_atom(monomial: &Monomial) -> Option<&Atom> {
    match monomial.iter().next() {
        Some((atom, &1)) if monomial.len() == 1 => Some(atom),
        _ => None,
    }
}

/// Build `coeff * monomial`, pulling a negative real sign out front
fn term_expr(monomial: &Monomial, coeff: &Coefficient) -> SymExpr {
    let mut factors: Vec<SymExpr> = monomial
        .iter()
        .map(|(atom, &exp)| {
            let base = atom.to_expr();
            if exp == 1 {
                base
            } else {
                SymExpr::pow(base, exp)
            }
        })
        .collect();

    if factors.is_empty() {
        return SymExpr::num(coeff.clone());
    }

    if coeff.is_negative_real() {
        let magnitude = -coeff;
        if !magnitude.is_one() {
            factors.insert(0, SymExpr::num(magnitude));
        }
        return SymExpr::neg(SymExpr::mul(factors));
    }

    if !coeff.is_one() {
        factors.insert(0, SymExpr::num(coeff.clone()));
    }
    SymExpr::mul(factors)
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &'a Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (monomial, coeff) in &rhs.terms {
            out.add_term(monomial.clone(), coeff.clone());
        }
        out
    }
}

impl<'a> Sub<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &'a Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (monomial, coeff) in &rhs.terms {
            out.add_term(monomial.clone(), -coeff);
        }
        out
    }
}

impl<'a> Mul<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &'a Polynomial) -> Polynomial {
        let mut out = Polynomial::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                let mut monomial = ma.clone();
                for (atom, exp) in mb {
                    *monomial.entry(atom.clone()).or_insert(0) += exp;
                }
                out.add_term(monomial, ca * cb);
            }
        }
        out
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(monomial, coeff)| (monomial.clone(), -coeff))
                .collect(),
        }
    }
}
