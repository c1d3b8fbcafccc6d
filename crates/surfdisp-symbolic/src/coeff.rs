//! Coefficient representation for symbolic expressions
//!
//! Coefficients are exact Gaussian rationals `re + im*i` whose parts are
//! arbitrary-precision rationals. There is no floating-point fallback: every
//! operation either stays exact or reports an error.

use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::{Result, SymbolicError};

/// Greatest common divisor using Euclidean algorithm
fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let t = &a % &b;
        a = b;
        b = t;
    }
    a
}

/// An exact rational number.
///
/// Invariant: `den > 0` and `gcd(num, den) == 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// Create a rational, reducing to lowest terms
    pub fn new(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Result<Self> {
        let den = den.into();
        if den.is_zero() {
            return Err(SymbolicError::DivisionByZero);
        }
        Ok(Self::reduced(num.into(), den))
    }

    fn reduced(num: BigInt, den: BigInt) -> Self {
        // Normalize sign to numerator
        let (num, den) = if den.is_negative() {
            (-num, -den)
        } else {
            (num, den)
        };
        let g = gcd(&num, &den);
        if g.is_one() {
            return Rational { num, den };
        }
        Rational {
            num: num / &g,
            den: den / g,
        }
    }

    /// Integer `n / 1`
    pub fn int(n: i64) -> Self {
        Rational {
            num: BigInt::from(n),
            den: BigInt::one(),
        }
    }

    /// `0`
    pub fn zero() -> Self {
        Self::int(0)
    }

    /// `1`
    pub fn one() -> Self {
        Self::int(1)
    }

    /// Numerator, carrying the sign
    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    /// Denominator, always positive
    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Check if one
    pub fn is_one(&self) -> bool {
        self.num.is_one() && self.den.is_one()
    }

    /// Check if strictly negative
    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    /// Check if the denominator is 1
    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    /// Rationalize a float through its shortest round-trip decimal form.
    ///
    /// `0.71` becomes `71/100`, not the binary expansion of the nearest double.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(SymbolicError::NonFinite(value));
        }
        // `Display` for f64 never switches to exponent notation.
        let text = value.to_string();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        let mut num: BigInt = format!("{int_part}{frac_part}")
            .parse()
            .map_err(|_| SymbolicError::InvalidOperation(format!("cannot rationalize {text}")))?;
        if negative {
            num = -num;
        }
        let den = BigInt::from(10u32).pow(frac_part.len() as u32);
        Ok(Self::reduced(num, den))
    }

    /// Nearest `f64`; NaN when a part overflows
    pub fn to_f64(&self) -> f64 {
        let num = self.num.to_f64().unwrap_or(f64::NAN);
        let den = self.den.to_f64().unwrap_or(f64::NAN);
        num / den
    }

    /// Multiplicative inverse; fails on zero
    pub fn recip(&self) -> Result<Self> {
        Rational::new(self.den.clone(), self.num.clone())
    }

    /// Compute power with a non-negative integer exponent
    pub fn pow(&self, exp: u32) -> Self {
        // Powers of coprime parts stay coprime.
        Rational {
            num: self.num.pow(exp),
            den: self.den.pow(exp),
        }
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Rational {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::int(n)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Rational::int(n as i64)
    }
}

impl<'a> Add<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &'a Rational) -> Rational {
        // n1/d1 + n2/d2 = (n1*d2 + n2*d1) / (d1*d2)
        Rational::reduced(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl<'a> Sub<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &'a Rational) -> Rational {
        Rational::reduced(
            &self.num * &rhs.den - &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl<'a> Mul<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &'a Rational) -> Rational {
        Rational::reduced(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// A coefficient in a symbolic expression: the Gaussian rational `re + im*i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Coefficient {
    re: Rational,
    im: Rational,
}

impl Coefficient {
    /// Create `re + im*i`
    pub fn new(re: Rational, im: Rational) -> Self {
        Coefficient { re, im }
    }

    /// Create a real coefficient
    pub fn real(re: Rational) -> Self {
        Coefficient {
            re,
            im: Rational::zero(),
        }
    }

    /// Create an integer coefficient
    pub fn int(n: i64) -> Self {
        Coefficient::real(Rational::int(n))
    }

    /// Create a rational coefficient, automatically reducing
    pub fn rational(num: i64, den: i64) -> Result<Self> {
        Ok(Coefficient::real(Rational::new(num, den)?))
    }

    /// The imaginary unit
    pub fn i() -> Self {
        Coefficient {
            re: Rational::zero(),
            im: Rational::one(),
        }
    }

    /// `0`
    pub fn zero() -> Self {
        Coefficient::int(0)
    }

    /// `1`
    pub fn one() -> Self {
        Coefficient::int(1)
    }

    /// Exact value of a float's shortest decimal form
    pub fn from_f64(value: f64) -> Result<Self> {
        Ok(Coefficient::real(Rational::from_f64(value)?))
    }

    /// Real part
    pub fn re(&self) -> &Rational {
        &self.re
    }

    /// Imaginary part
    pub fn im(&self) -> &Rational {
        &self.im
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    /// Check if exactly `1`
    pub fn is_one(&self) -> bool {
        self.re.is_one() && self.im.is_zero()
    }

    /// Check if the imaginary part vanishes
    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    /// True for real coefficients below zero
    pub fn is_negative_real(&self) -> bool {
        self.is_real() && self.re.is_negative()
    }

    /// Complex conjugate
    pub fn conj(&self) -> Self {
        Coefficient {
            re: self.re.clone(),
            im: -&self.im,
        }
    }

    /// `1 / (a + b i) = (a - b i) / (a^2 + b^2)`
    pub fn recip(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(SymbolicError::DivisionByZero);
        }
        let norm = &(&self.re * &self.re) + &(&self.im * &self.im);
        let inv = norm.recip()?;
        Ok(Coefficient {
            re: &self.re * &inv,
            im: &(-&self.im) * &inv,
        })
    }

    /// Repeated multiplication; `c^0 = 1`
    pub fn pow(&self, exp: u32) -> Self {
        let mut result = Coefficient::one();
        for _ in 0..exp {
            result = &result * self;
        }
        result
    }

    /// Numeric approximation
    pub fn to_complex64(&self) -> Complex64 {
        Complex64::new(self.re.to_f64(), self.im.to_f64())
    }
}

impl From<i64> for Coefficient {
    fn from(n: i64) -> Self {
        Coefficient::int(n)
    }
}

impl From<i32> for Coefficient {
    fn from(n: i32) -> Self {
        Coefficient::int(n as i64)
    }
}

impl From<Rational> for Coefficient {
    fn from(r: Rational) -> Self {
        Coefficient::real(r)
    }
}

impl<'a> Add<&'a Coefficient> for &'a Coefficient {
    type Output = Coefficient;

    fn add(self, rhs: &'a Coefficient) -> Coefficient {
        Coefficient {
            re: &self.re + &rhs.re,
            im: &self.im + &rhs.im,
        }
    }
}

impl<'a> Sub<&'a Coefficient> for &'a Coefficient {
    type Output = Coefficient;

    fn sub(self, rhs: &'a Coefficient) -> Coefficient {
        Coefficient {
            re: &self.re - &rhs.re,
            im: &self.im - &rhs.im,
        }
    }
}

impl<'a> Mul<&'a Coefficient> for &'a Coefficient {
    type Output = Coefficient;

    fn mul(self, rhs: &'a Coefficient) -> Coefficient {
        // (a + bi)(c + di) = (ac - bd) + (ad + bc)i
        Coefficient {
            re: &(&self.re * &rhs.re) - &(&self.im * &rhs.im),
            im: &(&self.re * &rhs.im) + &(&self.im * &rhs.re),
        }
    }
}

impl Neg for &Coefficient {
    type Output = Coefficient;

    fn neg(self) -> Coefficient {
        Coefficient {
            re: -&self.re,
            im: -&self.im,
        }
    }
}

macro_rules! forward_owned_binop {
    ($ty:ty, $imp:ident, $method:ident) => {
        impl $imp for $ty {
            type Output = $ty;

            fn $method(self, rhs: $ty) -> $ty {
                $imp::$method(&self, &rhs)
            }
        }
    };
}

forward_owned_binop!(Rational, Add, add);
forward_owned_binop!(Rational, Sub, sub);
forward_owned_binop!(Rational, Mul, mul);
forward_owned_binop!(Coefficient, Add, add);
forward_owned_binop!(Coefficient, Sub, sub);
forward_owned_binop!(Coefficient, Mul, mul);

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}

impl Neg for Coefficient {
    type Output = Coefficient;

    fn neg(self) -> Coefficient {
        -&self
    }
}

fn fmt_imaginary(f: &mut fmt::Formatter<'_>, im: &Rational) -> fmt::Result {
    if im.is_one() {
        write!(f, "i")
    } else if (-im).is_one() {
        write!(f, "-i")
    } else {
        write!(f, "{}*i", im)
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.re.is_zero(), self.im.is_zero()) {
            (_, true) => write!(f, "{}", self.re),
            (true, false) => fmt_imaginary(f, &self.im),
            (false, false) => {
                write!(f, "({}", self.re)?;
                if self.im.is_negative() {
                    write!(f, " - ")?;
                    fmt_imaginary(f, &self.im.abs())?;
                } else {
                    write!(f, " + ")?;
                    fmt_imaginary(f, &self.im)?;
                }
                write!(f, ")")
            }
        }
    }
}
