//! Real roots of generalized polynomials in one symbol.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use num_traits::{One, Signed, Zero};

use super::eval::Env;
use super::expr::{Domain, Expr, Symbol};
use super::number::{common_denominator, is_odd, Rational};
use crate::error::{Error, Result};

impl Expr {
    /// Real solutions of `self = 0` for `x`, restricted to the domain of `x`.
    ///
    /// The expression must expand to `Σ c_i x^(p_i)` with x-free
    /// coefficients and rational powers. After factoring out the lowest power
    /// and substituting `u = x^(1/L)` the remaining polynomial must be a
    /// binomial or have degree at most two. Roots come back in ascending
    /// numeric order when they can be evaluated.
    pub fn solve(&self, x: &Symbol) -> Result<Vec<Expr>> {
        let unsolvable = |reason: &str| Error::Unsolvable {
            expression: self.to_string(),
            symbol: x.name().to_string(),
            reason: reason.to_string(),
        };

        let mut coefficients: BTreeMap<Rational, Vec<Expr>> = BTreeMap::new();
        for term in self.expand().terms() {
            if term.is_zero() {
                continue;
            }
            let mut power = Rational::zero();
            let mut coefficient = Vec::new();
            for factor in term.factors() {
                match &factor {
                    Expr::Sym(s) if s == x => power += Rational::one(),
                    Expr::Pow(base, exponent) if base.is_symbol(x) => match exponent.as_rational() {
                        Some(q) => power += q,
                        None => return Err(unsolvable("symbolic exponent")),
                    },
                    f if f.depends_on(x) => return Err(unsolvable("not a polynomial in the symbol")),
                    f => coefficient.push(f.clone()),
                }
            }
            coefficients
                .entry(power)
                .or_default()
                .push(Expr::product(coefficient));
        }
        let coefficients: BTreeMap<Rational, Expr> = coefficients
            .into_iter()
            .map(|(p, c)| (p, Expr::sum(c)))
            .filter(|(_, c)| !c.is_zero())
            .collect();

        let Some(&lowest) = coefficients.keys().next() else {
            return Err(unsolvable("expression is identically zero"));
        };

        let mut roots = Vec::new();
        if lowest.is_positive() {
            roots.push(Expr::zero());
        }
        let offsets: Vec<Rational> = coefficients.keys().map(|p| *p - lowest).collect();
        let step = common_denominator(offsets.iter());
        let polynomial: BTreeMap<i64, Expr> = coefficients
            .values()
            .zip(&offsets)
            .map(|(c, offset)| ((*offset * Rational::from_integer(step)).to_integer(), c.clone()))
            .collect();

        for u in polynomial_roots(&polynomial).map_err(|reason| unsolvable(&reason))? {
            if step > 1 && sign_of(&u) == Some(Ordering::Less) {
                continue;
            }
            roots.push(u.pow(step));
        }

        if x.domain() == Domain::Positive {
            roots.retain(|root| !matches!(sign_of(root), Some(Ordering::Less | Ordering::Equal)));
        }
        roots.dedup();
        let values: Option<Vec<f64>> = roots.iter().map(numeric_value).collect();
        if let Some(values) = values {
            let mut order: Vec<usize> = (0..roots.len()).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            roots = order.into_iter().map(|i| roots[i].clone()).collect();
        }
        Ok(roots)
    }
}

/// Nonzero roots of `Σ c_d u^d` with `c_0 ≠ 0`.
fn polynomial_roots(polynomial: &BTreeMap<i64, Expr>) -> std::result::Result<Vec<Expr>, String> {
    let degree = polynomial.keys().next_back().copied().unwrap_or(0);
    let coefficient = |d: i64| polynomial.get(&d).cloned().unwrap_or_else(Expr::zero);
    match polynomial.len() {
        0 | 1 => Ok(Vec::new()),
        2 => {
            // c_0 + c_d u^d = 0
            let w = -(coefficient(0) / coefficient(degree));
            let root = w.pow(Rational::new(1, degree));
            if is_odd(degree) {
                let real_root = match sign_of(&w) {
                    Some(Ordering::Less) => -(-&w).pow(Rational::new(1, degree)),
                    _ => root,
                };
                return Ok(vec![real_root]);
            }
            match sign_of(&w) {
                Some(Ordering::Less) => Ok(Vec::new()),
                _ => Ok(vec![-&root, root]),
            }
        }
        3 if degree == 2 => {
            let (a, b, c) = (coefficient(2), coefficient(1), coefficient(0));
            let discriminant = (b.pow(2) - 4 * (&a * &c)).expand();
            if sign_of(&discriminant) == Some(Ordering::Less) {
                return Ok(Vec::new());
            }
            let root = discriminant.sqrt();
            let denominator = 2 * a;
            Ok(vec![
                (-&b - &root) / &denominator,
                (-&b + root) / &denominator,
            ])
        }
        _ => Err(format!("polynomial of degree {degree} in the substituted variable")),
    }
}

/// Sign from structure, or from numeric evaluation when the expression has
/// no free symbols.
pub(crate) fn sign_of(e: &Expr) -> Option<Ordering> {
    if e.is_zero() {
        return Some(Ordering::Equal);
    }
    if e.is_positive() {
        return Some(Ordering::Greater);
    }
    if e.is_negative() {
        return Some(Ordering::Less);
    }
    numeric_value(e).and_then(|v| v.partial_cmp(&0.0))
}

fn numeric_value(e: &Expr) -> Option<f64> {
    e.eval_real(&Env::new()).ok()
}
