//! Symbolic expression trees
//!
//! Expressions are immutable and share subtrees through `Arc`. Construction
//! keeps whatever shape the caller builds; [`SymExpr::simplify`] rewrites into
//! the canonical polynomial normal form.

use crate::coeff::Coefficient;
use crate::normalize::Polynomial;
use crate::symbol::Symbol;
use crate::{Result, SymbolicError};
use num_complex::Complex64;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymExprKind {
    /// Exact numeric constant
    Num(Coefficient),
    /// Symbol reference
    Var(Symbol),
    /// Conjugate of a non-real symbol
    Conj(Symbol),
    Add(Vec<SymExpr>),
    Mul(Vec<SymExpr>),
    /// Non-negative integer power
    Pow(SymExpr, u32),
    Neg(SymExpr),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymExpr {
    pub kind: Arc<SymExprKind>,
}

impl SymExpr {
    fn from_kind(kind: SymExprKind) -> Self {
        SymExpr {
            kind: Arc::new(kind),
        }
    }

    /// Numeric constant
    pub fn num(c: Coefficient) -> Self {
        SymExpr::from_kind(SymExprKind::Num(c))
    }

    /// Integer constant
    pub fn int(n: i64) -> Self {
        SymExpr::num(Coefficient::int(n))
    }

    /// Reduced fraction `num / den`
    pub fn rational(num: i64, den: i64) -> Result<Self> {
        Ok(SymExpr::num(Coefficient::rational(num, den)?))
    }

    /// Exact value of a float's shortest decimal representation
    pub fn from_f64(value: f64) -> Result<Self> {
        Ok(SymExpr::num(Coefficient::from_f64(value)?))
    }

    /// The imaginary unit `i`
    pub fn imag_unit() -> Self {
        SymExpr::num(Coefficient::i())
    }

    /// Reference to `s`
    pub fn symbol(s: Symbol) -> Self {
        SymExpr::from_kind(SymExprKind::Var(s))
    }

    /// Reference to a real-valued variable
    pub fn var(name: &str) -> Self {
        SymExpr::symbol(Symbol::real(name))
    }

    /// `conj(s)`; collapses to `s` for real symbols
    pub fn conj_symbol(s: Symbol) -> Self {
        if s.is_real() {
            SymExpr::symbol(s)
        } else {
            SymExpr::from_kind(SymExprKind::Conj(s))
        }
    }

    /// Sum; empty is `0`, a single term is returned as-is
    pub fn add(mut terms: Vec<SymExpr>) -> Self {
        match terms.len() {
            0 => SymExpr::int(0),
            1 => terms.remove(0),
            _ => SymExpr::from_kind(SymExprKind::Add(terms)),
        }
    }

    /// Product; empty is `1`, a single factor is returned as-is
    pub fn mul(mut factors: Vec<SymExpr>) -> Self {
        match factors.len() {
            0 => SymExpr::int(1),
            1 => factors.remove(0),
            _ => SymExpr::from_kind(SymExprKind::Mul(factors)),
        }
    }

    /// `base^exp`
    pub fn pow(base: SymExpr, exp: u32) -> Self {
        SymExpr::from_kind(SymExprKind::Pow(base, exp))
    }

    /// `-inner`
    pub fn neg(inner: SymExpr) -> Self {
        SymExpr::from_kind(SymExprKind::Neg(inner))
    }

    /// The constant, when this is a bare number
    pub fn as_coeff(&self) -> Option<&Coefficient> {
        match self.kind.as_ref() {
            SymExprKind::Num(c) => Some(c),
            _ => None,
        }
    }

    /// The symbol, when this is a bare variable
    pub fn as_var(&self) -> Option<&Symbol> {
        match self.kind.as_ref() {
            SymExprKind::Var(s) => Some(s),
            _ => None,
        }
    }

    /// Check for a bare number
    pub fn is_num(&self) -> bool {
        self.as_coeff().is_some()
    }

    /// Check for a bare variable
    pub fn is_var(&self) -> bool {
        self.as_var().is_some()
    }

    /// Structural check for the literal `0`. See [`SymExpr::is_identically_zero`].
    pub fn is_zero(&self) -> bool {
        self.as_coeff().is_some_and(Coefficient::is_zero)
    }

    /// Structural check for the literal `1`
    pub fn is_one(&self) -> bool {
        self.as_coeff().is_some_and(Coefficient::is_one)
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + match self.kind.as_ref() {
            SymExprKind::Num(_) | SymExprKind::Var(_) | SymExprKind::Conj(_) => 0,
            SymExprKind::Add(items) | SymExprKind::Mul(items) => {
                items.iter().map(SymExpr::node_count).sum()
            }
            SymExprKind::Pow(inner, _) | SymExprKind::Neg(inner) => inner.node_count(),
        }
    }

    /// Every symbol referenced, conjugated or not
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self.kind.as_ref() {
            SymExprKind::Num(_) => {}
            SymExprKind::Var(s) | SymExprKind::Conj(s) => {
                out.insert(s.clone());
            }
            SymExprKind::Add(items) | SymExprKind::Mul(items) => {
                for item in items {
                    item.collect_symbols(out);
                }
            }
            SymExprKind::Pow(inner, _) | SymExprKind::Neg(inner) => inner.collect_symbols(out),
        }
    }

    /// Complex conjugate. Real symbols are left in place.
    pub fn conjugate(&self) -> SymExpr {
        match self.kind.as_ref() {
            SymExprKind::Num(c) => SymExpr::num(c.conj()),
            SymExprKind::Var(s) => SymExpr::conj_symbol(s.clone()),
            SymExprKind::Conj(s) => SymExpr::symbol(s.clone()),
            SymExprKind::Add(terms) => SymExpr::add(terms.iter().map(SymExpr::conjugate).collect()),
            SymExprKind::Mul(factors) => {
                SymExpr::mul(factors.iter().map(SymExpr::conjugate).collect())
            }
            SymExprKind::Pow(base, exp) => SymExpr::pow(base.conjugate(), *exp),
            SymExprKind::Neg(inner) => SymExpr::neg(inner.conjugate()),
        }
    }

    /// Replace one symbol
    pub fn substitute(&self, symbol: &Symbol, replacement: &SymExpr) -> SymExpr {
        let mut bindings = BTreeMap::new();
        bindings.insert(symbol.clone(), replacement.clone());
        self.substitute_many(&bindings)
    }

    /// Replace every bound symbol at once; `conj(s)` receives the conjugate.
    pub fn substitute_many(&self, bindings: &BTreeMap<Symbol, SymExpr>) -> SymExpr {
        match self.kind.as_ref() {
            SymExprKind::Num(_) => self.clone(),
            SymExprKind::Var(s) => bindings.get(s).cloned().unwrap_or_else(|| self.clone()),
            SymExprKind::Conj(s) => bindings
                .get(s)
                .map(SymExpr::conjugate)
                .unwrap_or_else(|| self.clone()),
            SymExprKind::Add(terms) => {
                SymExpr::add(terms.iter().map(|t| t.substitute_many(bindings)).collect())
            }
            SymExprKind::Mul(factors) => {
                SymExpr::mul(factors.iter().map(|f| f.substitute_many(bindings)).collect())
            }
            SymExprKind::Pow(base, exp) => SymExpr::pow(base.substitute_many(bindings), *exp),
            SymExprKind::Neg(inner) => SymExpr::neg(inner.substitute_many(bindings)),
        }
    }

    /// Expand into normal form
    pub fn to_polynomial(&self) -> Polynomial {
        Polynomial::from_expr(self)
    }

    /// Rewrite into canonical expanded form
    pub fn simplify(&self) -> SymExpr {
        self.to_polynomial().to_expr()
    }

    /// Exact test: true iff the expression expands to the zero polynomial.
    pub fn is_identically_zero(&self) -> bool {
        self.to_polynomial().is_zero()
    }

    /// Evaluate numerically with the given symbol values
    pub fn eval(&self, values: &BTreeMap<Symbol, Complex64>) -> Result<Complex64> {
        let lookup = |s: &Symbol| {
            values
                .get(s)
                .copied()
                .ok_or_else(|| SymbolicError::UndefinedSymbol(s.name().to_string()))
        };
        Ok(match self.kind.as_ref() {
            SymExprKind::Num(c) => c.to_complex64(),
            SymExprKind::Var(s) => lookup(s)?,
            SymExprKind::Conj(s) => lookup(s)?.conj(),
            SymExprKind::Add(terms) => {
                let mut sum = Complex64::new(0.0, 0.0);
                for t in terms {
                    sum += t.eval(values)?;
                }
                sum
            }
            SymExprKind::Mul(factors) => {
                let mut prod = Complex64::new(1.0, 0.0);
                for f in factors {
                    prod *= f.eval(values)?;
                }
                prod
            }
            SymExprKind::Pow(base, exp) => base.eval(values)?.powu(*exp),
            SymExprKind::Neg(inner) => -inner.eval(values)?,
        })
    }

    // Binding strength used when printing: sums bind loosest.
    fn precedence(&self) -> u8 {
        match self.kind.as_ref() {
            SymExprKind::Add(_) => 1,
            SymExprKind::Neg(_) => 2,
            SymExprKind::Mul(_) => 3,
            SymExprKind::Pow(_, _) => 4,
            SymExprKind::Var(_) | SymExprKind::Conj(_) => 5,
            SymExprKind::Num(c) => {
                if c.is_negative_real() || (c.re().is_zero() && c.im().is_negative()) {
                    2
                } else if c.is_real() && c.re().is_integer() {
                    5
                } else if c.is_real() || c.re().is_zero() {
                    3
                } else {
                    // mixed values print their own parentheses
                    5
                }
            }
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.as_ref() {
            SymExprKind::Num(c) => write!(f, "{}", c),
            SymExprKind::Var(s) => write!(f, "{}", s),
            SymExprKind::Conj(s) => write!(f, "conj({})", s),
            SymExprKind::Add(terms) => {
                for (idx, term) in terms.iter().enumerate() {
                    match term.kind.as_ref() {
                        SymExprKind::Neg(inner) if idx > 0 => {
                            f.write_str(" - ")?;
                            inner.fmt_operand(f, 2)?;
                        }
                        SymExprKind::Num(c) if idx > 0 && c.is_negative_real() => {
                            write!(f, " - {}", -c)?;
                        }
                        _ => {
                            if idx > 0 {
                                f.write_str(" + ")?;
                            }
                            term.fmt_operand(f, 1)?;
                        }
                    }
                }
                Ok(())
            }
            SymExprKind::Mul(factors) => {
                for (idx, factor) in factors.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("*")?;
                    }
                    factor.fmt_operand(f, 3)?;
                }
                Ok(())
            }
            SymExprKind::Pow(base, exp) => {
                base.fmt_operand(f, 5)?;
                write!(f, "^{}", exp)
            }
            SymExprKind::Neg(inner) => {
                f.write_str("-")?;
                inner.fmt_operand(f, 3)
            }
        }
    }
}

impl From<i64> for SymExpr {
    fn from(n: i64) -> Self {
        SymExpr::int(n)
    }
}

impl From<i32> for SymExpr {
    fn from(n: i32) -> Self {
        SymExpr::int(n as i64)
    }
}

impl From<Coefficient> for SymExpr {
    fn from(c: Coefficient) -> Self {
        SymExpr::num(c)
    }
}

impl From<crate::coeff::Rational> for SymExpr {
    fn from(r: crate::coeff::Rational) -> Self {
        SymExpr::num(Coefficient::real(r))
    }
}

impl From<Symbol> for SymExpr {
    fn from(s: Symbol) -> Self {
        SymExpr::symbol(s)
    }
}

impl From<&SymExpr> for SymExpr {
    fn from(e: &SymExpr) -> Self {
        e.clone()
    }
}

impl Add for SymExpr {
    type Output = SymExpr;

    fn add(self, rhs: SymExpr) -> SymExpr {
        SymExpr::add(vec![self, rhs])
    }
}

impl Sub for SymExpr {
    type Output = SymExpr;

    fn sub(self, rhs: SymExpr) -> SymExpr {
        SymExpr::add(vec![self, SymExpr::neg(rhs)])
    }
}

impl Mul for SymExpr {
    type Output = SymExpr;

    fn mul(self, rhs: SymExpr) -> SymExpr {
        SymExpr::mul(vec![self, rhs])
    }
}

impl Neg for SymExpr {
    type Output = SymExpr;

    fn neg(self) -> SymExpr {
        SymExpr::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_mul_collapse_trivial_lists() {
        assert!(SymExpr::add(vec![]).is_zero());
        assert!(SymExpr::mul(vec![]).is_one());
        assert!(SymExpr::add(vec![SymExpr::var("x")]).is_var());
    }

    #[test]
    fn test_simplify_is_canonical() {
        let x = SymExpr::var("x");
        let y = SymExpr::var("y");
        let a = (x.clone() + y.clone()) * SymExpr::int(2);
        let b = y * SymExpr::int(2) + x * SymExpr::int(2);
        assert_ne!(a, b);
        assert_eq!(a.simplify(), b.simplify());
        assert_eq!(a.simplify().to_string(), "2*x + 2*y");
    }

    #[test]
    fn test_conjugate_imaginary_product() {
        // conj(i*w*z) = -i*w*z for real w, z
        let iwz = SymExpr::imag_unit() * SymExpr::var("w") * SymExpr::var("z");
        assert!((iwz.conjugate() + iwz).is_identically_zero());
    }

    #[test]
    fn test_conjugate_complex_symbol() {
        let z = Symbol::complex("z");
        let expr = SymExpr::symbol(z.clone());
        assert_eq!(expr.conjugate().to_string(), "conj(z)");
        assert_eq!(expr.conjugate().conjugate(), expr);
        assert!(!(expr.conjugate() - expr).is_identically_zero());
    }

    #[test]
    fn test_substitute_many() {
        let a = Symbol::real("a");
        let b = Symbol::real("b");
        let expr = SymExpr::int(3) * SymExpr::symbol(a.clone()) - SymExpr::symbol(b.clone());

        let mut bindings = BTreeMap::new();
        bindings.insert(a, SymExpr::int(1));
        bindings.insert(b, SymExpr::int(0));
        let result = expr.substitute_many(&bindings).simplify();
        assert_eq!(result.as_coeff(), Some(&Coefficient::int(3)));
    }

    #[test]
    fn test_free_symbols_sorted() {
        let expr = SymExpr::var("m") * SymExpr::var("b") + SymExpr::var("m");
        let names: Vec<_> = expr
            .free_symbols()
            .into_iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "m"]);
    }

    #[test]
    fn test_eval() {
        let x = Symbol::real("x");
        let expr = SymExpr::pow(SymExpr::symbol(x.clone()), 2) + SymExpr::imag_unit();
        let mut values = BTreeMap::new();
        values.insert(x, Complex64::new(3.0, 0.0));
        let v = expr.eval(&values).unwrap();
        assert!((v.re - 9.0).abs() < 1e-12);
        assert!((v.im - 1.0).abs() < 1e-12);

        let unbound = SymExpr::var("q").eval(&BTreeMap::new());
        assert_eq!(unbound, Err(SymbolicError::UndefinedSymbol("q".into())));
    }

    #[test]
    fn test_display_signs() {
        let x = SymExpr::var("x");
        let y = SymExpr::var("y");
        let expr = (x.clone() - SymExpr::int(4) * y.clone()).simplify();
        assert_eq!(expr.to_string(), "x - 4*y");
        let neg_sum = SymExpr::neg(x + y);
        assert_eq!(neg_sum.to_string(), "-(x + y)");
    }
}
