//! Expression tree and symbols.
//!
//! Every `Expr` reachable through the public constructors is in canonical
//! form: sums and products are flat and sorted, like terms and like bases are
//! collected, and rational coefficients sit in front. Two expressions that are
//! structurally equal are therefore mathematically equal, which is what the
//! normalizer and the tests rely on when they compare results with `==`.

use std::collections::BTreeSet;

use num_traits::{CheckedMul, One, Signed, Zero};
use serde::{Deserialize, Serialize};

use super::number::Rational;

/// Assumption attached to a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Real,
    Positive,
}

/// A named real symbol.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    name: String,
    domain: Domain,
}

impl Symbol {
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }

    pub fn real(name: impl Into<String>) -> Self {
        Self::new(name, Domain::Real)
    }

    pub fn positive(name: impl Into<String>) -> Self {
        Self::new(name, Domain::Positive)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_positive(&self) -> bool {
        self.domain == Domain::Positive
    }

    /// The symbol as an expression.
    pub fn expr(&self) -> Expr {
        Expr::Sym(self.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constant {
    Pi,
    /// Imaginary unit.
    I,
    Infinity,
    NegInfinity,
    /// Result of an indeterminate form such as ∞ - ∞.
    Undefined,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Func {
    Exp,
    Sin,
    Cos,
    Log,
    /// Γ of a rational argument that has no closed form.
    Gamma,
}

/// Definite integral kept unevaluated.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integral {
    pub integrand: Expr,
    pub var: Symbol,
    pub lower: Expr,
    pub upper: Expr,
}

/// Symbolic expression in canonical form.
///
/// Variants are declared in the order used to sort factors and terms.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    Num(Rational),
    Const(Constant),
    Sym(Symbol),
    Pow(Box<Expr>, Box<Expr>),
    Func(Func, Box<Expr>),
    Integral(Box<Integral>),
    Mul(Vec<Expr>),
    Add(Vec<Expr>),
}

impl Expr {
    pub fn zero() -> Expr {
        Expr::Num(Rational::zero())
    }

    pub fn one() -> Expr {
        Expr::Num(Rational::one())
    }

    pub fn integer(n: i64) -> Expr {
        Expr::Num(Rational::from_integer(n))
    }

    pub fn rational(numer: i64, denom: i64) -> Expr {
        Expr::Num(Rational::new(numer, denom))
    }

    pub fn pi() -> Expr {
        Expr::Const(Constant::Pi)
    }

    pub fn i() -> Expr {
        Expr::Const(Constant::I)
    }

    pub fn infinity() -> Expr {
        Expr::Const(Constant::Infinity)
    }

    pub fn neg_infinity() -> Expr {
        Expr::Const(Constant::NegInfinity)
    }

    pub fn undefined() -> Expr {
        Expr::Const(Constant::Undefined)
    }

    /// Unevaluated definite integral.
    pub fn integral(integrand: Expr, var: Symbol, lower: Expr, upper: Expr) -> Expr {
        if integrand.is_zero() {
            return Expr::zero();
        }
        Expr::Integral(Box::new(Integral {
            integrand,
            var,
            lower,
            upper,
        }))
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Expr::Num(q) => Some(*q),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(q) if q.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(q) if q.is_one())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Expr::Const(Constant::Undefined))
    }

    /// ±∞ or undefined.
    pub fn is_infinite(&self) -> bool {
        matches!(
            self,
            Expr::Const(Constant::Infinity | Constant::NegInfinity | Constant::Undefined)
        )
    }

    pub fn is_symbol(&self, x: &Symbol) -> bool {
        matches!(self, Expr::Sym(s) if s == x)
    }

    /// True when an unevaluated integral survives anywhere in the tree.
    pub fn has_unevaluated_integral(&self) -> bool {
        match self {
            Expr::Integral(_) => true,
            Expr::Add(items) | Expr::Mul(items) => items.iter().any(Expr::has_unevaluated_integral),
            Expr::Pow(base, exponent) => {
                base.has_unevaluated_integral() || exponent.has_unevaluated_integral()
            }
            Expr::Func(_, arg) => arg.has_unevaluated_integral(),
            _ => false,
        }
    }

    /// Provably real for every admissible value of its symbols.
    pub fn is_real(&self) -> bool {
        match self {
            Expr::Num(_) => true,
            Expr::Const(c) => matches!(c, Constant::Pi | Constant::Infinity | Constant::NegInfinity),
            Expr::Sym(_) => true,
            Expr::Add(items) | Expr::Mul(items) => items.iter().all(Expr::is_real),
            Expr::Pow(base, exponent) => {
                base.is_real()
                    && exponent.is_real()
                    && (base.is_nonnegative()
                        || exponent.as_rational().is_some_and(|q| q.is_integer()))
            }
            Expr::Func(Func::Log, arg) => arg.is_positive(),
            Expr::Func(Func::Gamma, _) => true,
            Expr::Func(_, arg) => arg.is_real(),
            Expr::Integral(integral) => {
                integral.integrand.is_real() && integral.lower.is_real() && integral.upper.is_real()
            }
        }
    }

    /// Provably strictly positive.
    pub fn is_positive(&self) -> bool {
        match self {
            Expr::Num(q) => q.is_positive(),
            Expr::Const(c) => matches!(c, Constant::Pi | Constant::Infinity),
            Expr::Sym(s) => s.is_positive(),
            Expr::Add(items) | Expr::Mul(items) => items.iter().all(Expr::is_positive),
            Expr::Pow(base, exponent) => base.is_positive() && exponent.is_real(),
            Expr::Func(Func::Exp, arg) => arg.is_real(),
            Expr::Func(Func::Gamma, arg) => arg.as_rational().is_some_and(|q| q.is_positive()),
            _ => false,
        }
    }

    /// Provably strictly negative.
    pub fn is_negative(&self) -> bool {
        match self {
            Expr::Num(q) => q.is_negative(),
            Expr::Const(Constant::NegInfinity) => true,
            Expr::Add(items) => items.iter().all(Expr::is_negative),
            Expr::Mul(items) => match items.split_first() {
                Some((Expr::Num(q), rest)) => q.is_negative() && rest.iter().all(Expr::is_positive),
                _ => false,
            },
            _ => false,
        }
    }

    pub fn is_nonnegative(&self) -> bool {
        self.is_zero() || self.is_positive()
    }

    /// Summands of the expression; a non-sum is its own single term.
    pub fn terms(&self) -> Vec<Expr> {
        match self {
            Expr::Add(items) => items.clone(),
            other => vec![other.clone()],
        }
    }

    /// Factors of the expression; a non-product is its own single factor.
    pub fn factors(&self) -> Vec<Expr> {
        match self {
            Expr::Mul(items) => items.clone(),
            other => vec![other.clone()],
        }
    }

    /// Split into rational coefficient and the remaining factors.
    pub fn split_coefficient(&self) -> (Rational, Expr) {
        match self {
            Expr::Num(q) => (*q, Expr::one()),
            Expr::Mul(items) => match items.split_first() {
                Some((Expr::Num(q), rest)) => (*q, Expr::from_sorted_factors(rest.to_vec())),
                _ => (Rational::one(), self.clone()),
            },
            other => (Rational::one(), other.clone()),
        }
    }

    /// Scale a coefficient-free term by a rational.
    pub(crate) fn scaled(self, coefficient: Rational) -> Expr {
        if coefficient.is_one() {
            return self;
        }
        if coefficient.is_zero() {
            return Expr::zero();
        }
        let mut factors = vec![Expr::Num(coefficient)];
        match self {
            Expr::Mul(items) => factors.extend(items),
            Expr::Num(q) => {
                return match q.checked_mul(&coefficient) {
                    Some(value) => Expr::Num(value),
                    None => Expr::Mul(vec![Expr::Num(coefficient), Expr::Num(q)]),
                }
            }
            other => factors.push(other),
        }
        Expr::Mul(factors)
    }

    /// Wrap factors that are already canonical and sorted.
    pub(crate) fn from_sorted_factors(mut factors: Vec<Expr>) -> Expr {
        match factors.len() {
            0 => Expr::one(),
            1 => factors.pop().unwrap_or_else(Expr::one),
            _ => Expr::Mul(factors),
        }
    }

    /// Whether the expression varies with `x`. Bound integration variables
    /// do not count.
    pub fn depends_on(&self, x: &Symbol) -> bool {
        match self {
            Expr::Sym(s) => s == x,
            Expr::Add(items) | Expr::Mul(items) => items.iter().any(|e| e.depends_on(x)),
            Expr::Pow(base, exponent) => base.depends_on(x) || exponent.depends_on(x),
            Expr::Func(_, arg) => arg.depends_on(x),
            Expr::Integral(integral) => {
                integral.lower.depends_on(x)
                    || integral.upper.depends_on(x)
                    || (integral.var != *x && integral.integrand.depends_on(x))
            }
            Expr::Num(_) | Expr::Const(_) => false,
        }
    }

    /// Free symbols in sorted order.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, into: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Sym(s) => {
                into.insert(s.clone());
            }
            Expr::Add(items) | Expr::Mul(items) => {
                items.iter().for_each(|e| e.collect_symbols(into));
            }
            Expr::Pow(base, exponent) => {
                base.collect_symbols(into);
                exponent.collect_symbols(into);
            }
            Expr::Func(_, arg) => arg.collect_symbols(into),
            Expr::Integral(integral) => {
                let mut inner = BTreeSet::new();
                integral.integrand.collect_symbols(&mut inner);
                inner.remove(&integral.var);
                into.extend(inner);
                integral.lower.collect_symbols(into);
                integral.upper.collect_symbols(into);
            }
            Expr::Num(_) | Expr::Const(_) => {}
        }
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::integer(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::integer(n as i64)
    }
}

impl From<Rational> for Expr {
    fn from(q: Rational) -> Self {
        Expr::Num(q)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::Sym(s)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Expr::Sym(s.clone())
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}
