//! Closed-form definite integration.
//!
//! The integrand is expanded and each term is split into the factors that do
//! not depend on the integration variable and a product of recognised shapes:
//! powers of the variable, a single exponential of a polynomial, powers of
//! sin and cos, and one inverse power of a quadratic `a x² + c`. Terms whose
//! shape has a known closed form over the given bounds are reduced through Γ
//! and Beta functions. Everything else is returned as an unevaluated
//! [`Expr::Integral`], which numeric evaluation resolves by quadrature.

use std::collections::BTreeMap;

use num_traits::{One, Signed, Zero};
use tracing::trace;

use super::expr::{Expr, Func, Symbol};
use super::number::{half, is_odd, Rational};

impl Expr {
    /// Definite integral over `var` from `lower` to `upper`.
    pub fn integrate(&self, var: &Symbol, lower: &Expr, upper: &Expr) -> Expr {
        let expanded = self.expand();
        Expr::sum(
            expanded
                .terms()
                .iter()
                .filter(|term| !term.is_zero())
                .map(|term| integrate_term(term, var, lower, upper)),
        )
    }
}

fn integrate_term(term: &Expr, x: &Symbol, lower: &Expr, upper: &Expr) -> Expr {
    let mut constant = Vec::new();
    let mut dependent = Vec::new();
    for factor in term.factors() {
        match factor {
            f if !f.depends_on(x) => constant.push(f),
            Expr::Func(Func::Exp, arg) => {
                let (free, bound): (Vec<Expr>, Vec<Expr>) =
                    arg.expand().terms().into_iter().partition(|t| !t.depends_on(x));
                constant.push(Expr::sum(free).exp());
                dependent.push(Expr::sum(bound).exp());
            }
            f => dependent.push(f),
        }
    }
    let constant = Expr::product(constant);
    if dependent.is_empty() {
        return constant * (upper - lower);
    }
    let dependent = Expr::product(dependent);
    match Shape::of(&dependent, x).and_then(|shape| shape.integrate(lower, upper)) {
        Some(value) => constant * value,
        None => {
            trace!(integrand = %dependent, var = x.name(), "no closed form, keeping integral");
            constant * Expr::integral(dependent, x.clone(), lower.clone(), upper.clone())
        }
    }
}

/// `(a x² + c)^(-n)`
#[derive(Debug)]
struct Lorentz {
    a: Expr,
    c: Expr,
    n: Rational,
}

impl Lorentz {
    fn of(base: &Expr, x: &Symbol, n: Rational) -> Option<Lorentz> {
        let mut a = None;
        let mut rest = Vec::new();
        for term in base.terms() {
            if term.depends_on(x) {
                match monomial(&term, x)? {
                    (2, coefficient) if a.is_none() => a = Some(coefficient),
                    _ => return None,
                }
            } else {
                rest.push(term);
            }
        }
        if rest.is_empty() {
            return None;
        }
        Some(Lorentz {
            a: a?,
            c: Expr::sum(rest),
            n,
        })
    }
}

/// Product `x^p · exp(Σ c_k x^k) · sin^m x · cos^n x · (a x² + c)^(-n)`.
#[derive(Debug, Default)]
struct Shape {
    power: Rational,
    exponent: BTreeMap<i64, Expr>,
    sin: i64,
    cos: i64,
    lorentz: Option<Lorentz>,
}

impl Shape {
    fn of(expr: &Expr, x: &Symbol) -> Option<Shape> {
        let mut shape = Shape::default();
        for factor in expr.factors() {
            match &factor {
                Expr::Sym(s) if s == x => shape.power += Rational::one(),
                Expr::Func(Func::Sin, arg) if arg.is_symbol(x) => shape.sin += 1,
                Expr::Func(Func::Cos, arg) if arg.is_symbol(x) => shape.cos += 1,
                Expr::Func(Func::Exp, arg) => {
                    for term in arg.expand().terms() {
                        let (k, coefficient) = monomial(&term, x)?;
                        let entry = shape.exponent.entry(k).or_insert_with(Expr::zero);
                        *entry = &*entry + coefficient;
                    }
                }
                Expr::Pow(base, exponent) => {
                    let q = exponent.as_rational()?;
                    match &**base {
                        Expr::Sym(s) if s == x => shape.power += q,
                        Expr::Func(Func::Sin, arg) if arg.is_symbol(x) && q.is_integer() => {
                            shape.sin += q.to_integer()
                        }
                        Expr::Func(Func::Cos, arg) if arg.is_symbol(x) && q.is_integer() => {
                            shape.cos += q.to_integer()
                        }
                        Expr::Add(_) if q.is_negative() && shape.lorentz.is_none() => {
                            shape.lorentz = Some(Lorentz::of(base, x, -q)?);
                        }
                        _ => return None,
                    }
                }
                _ => return None,
            }
        }
        shape.exponent.retain(|_, c| !c.is_zero());
        Some(shape)
    }

    fn integrate(&self, lower: &Expr, upper: &Expr) -> Option<Expr> {
        let trig = self.sin != 0 || self.cos != 0;
        let phase = self.phase();
        let half_line = lower.is_zero() && *upper == Expr::infinity();
        let full_line = *lower == Expr::neg_infinity() && *upper == Expr::infinity();

        if self.exponent.is_empty() && !trig && self.lorentz.is_none() {
            return self.power_integral(lower, upper);
        }
        if (trig || phase.is_some())
            && self.power.is_zero()
            && self.lorentz.is_none()
            && (self.exponent.is_empty() || phase.is_some())
        {
            return self.angular_integral(lower, upper, phase.unwrap_or(0));
        }
        if trig {
            return None;
        }
        if let Some(lorentz) = &self.lorentz {
            return match self.exponent.is_empty() && full_line {
                true => self.lorentz_integral(lorentz),
                false => None,
            };
        }
        if self.exponent.len() != 1 {
            return None;
        }
        let (&k, coefficient) = self.exponent.iter().next()?;
        let c = -coefficient;
        if half_line {
            self.half_line_integral(k, &c)
        } else if full_line && k == 2 {
            self.gaussian_integral(&c)
        } else {
            None
        }
    }

    /// Integer k when the exponential is a pure phase `exp(i k x)`.
    fn phase(&self) -> Option<i64> {
        if self.exponent.len() != 1 {
            return None;
        }
        let coefficient = self.exponent.get(&1)?;
        let (k, rest) = coefficient.split_coefficient();
        (rest == Expr::i() && k.is_integer()).then(|| k.to_integer())
    }

    fn power_integral(&self, lower: &Expr, upper: &Expr) -> Option<Expr> {
        let p = self.power;
        let infinite_range = lower.is_infinite() || upper.is_infinite();
        if infinite_range {
            let tail_converges = p < Rational::from_integer(-1) && !lower.is_infinite();
            return match tail_converges && !lower.is_zero() {
                true => None,
                false => Some(Expr::infinity()),
            };
        }
        let p1 = p + Rational::one();
        if p1.is_zero() {
            if lower.is_zero() {
                return Some(Expr::infinity());
            }
            return Some(upper.ln() - lower.ln());
        }
        if p1.is_negative() && lower.is_zero() {
            return Some(Expr::infinity());
        }
        Some((upper.pow(p1) - lower.pow(p1)) / Expr::Num(p1))
    }

    /// ∫₀^∞ x^p exp(-c x^k) dx = Γ((p+1)/k) / (k c^((p+1)/k))
    fn half_line_integral(&self, k: i64, c: &Expr) -> Option<Expr> {
        if self.power <= Rational::from_integer(-1) || c.is_negative() {
            return Some(Expr::infinity());
        }
        if !c.is_positive() || k <= 0 {
            return None;
        }
        let s = (self.power + Rational::one()) / Rational::from_integer(k);
        Some(Expr::gamma(s) / (Expr::integer(k) * c.pow(s)))
    }

    /// ∫ x^p exp(-c x²) over the real line.
    fn gaussian_integral(&self, c: &Expr) -> Option<Expr> {
        if !self.power.is_integer() || self.power.is_negative() {
            return None;
        }
        if is_odd(self.power.to_integer()) {
            return Some(Expr::zero());
        }
        if c.is_negative() {
            return Some(Expr::infinity());
        }
        if !c.is_positive() {
            return None;
        }
        let s = (self.power + Rational::one()) * half();
        Some(Expr::gamma(s) * c.pow(-s))
    }

    /// ∫ x^(2m) (a x² + c)^(-n) over the real line
    /// = a^(-n) s^(2m+1-2n) Γ(m+½) Γ(n-m-½) / Γ(n), s = √(c/a).
    fn lorentz_integral(&self, lorentz: &Lorentz) -> Option<Expr> {
        if !self.power.is_integer() || self.power.is_negative() {
            return None;
        }
        if is_odd(self.power.to_integer()) {
            return Some(Expr::zero());
        }
        let m = self.power * half();
        let tail = lorentz.n - m - half();
        if !tail.is_positive() {
            return Some(Expr::infinity());
        }
        let ratio = &lorentz.c / &lorentz.a;
        if !lorentz.a.is_positive() || !ratio.is_positive() {
            return None;
        }
        let two = Rational::from_integer(2);
        let scale = ratio.sqrt().pow(two * m + Rational::one() - two * lorentz.n);
        Some(Expr::product([
            lorentz.a.pow(-lorentz.n),
            scale,
            Expr::gamma(m + half()),
            Expr::gamma(tail),
            Expr::gamma(lorentz.n).recip(),
        ]))
    }

    /// sin^m cos^n e^(ikx) over [0, π] or [0, 2π].
    fn angular_integral(&self, lower: &Expr, upper: &Expr, k: i64) -> Option<Expr> {
        if !lower.is_zero() {
            return None;
        }
        let (m, n) = (self.sin, self.cos);
        let beta = || {
            let m = Rational::from_integer(m);
            let n = Rational::from_integer(n);
            let one = Rational::one();
            Expr::gamma((m + one) * half()) * Expr::gamma((n + one) * half())
                / Expr::gamma((m + n) * half() + one)
        };
        let two_pi = Expr::integer(2) * Expr::pi();
        if *upper == Expr::pi() && k == 0 {
            if m <= -1 || n <= -1 {
                return Some(Expr::infinity());
            }
            if is_odd(n) {
                return Some(Expr::zero());
            }
            return Some(beta());
        }
        if *upper == two_pi {
            if k != 0 {
                return (m == 0 && n == 0).then(Expr::zero);
            }
            if m <= -1 || n <= -1 {
                return Some(Expr::infinity());
            }
            if is_odd(m) || is_odd(n) {
                return Some(Expr::zero());
            }
            return Some(Expr::integer(2) * beta());
        }
        None
    }
}

/// `coefficient · x^k` with x-free coefficient and integer k ≥ 0.
fn monomial(term: &Expr, x: &Symbol) -> Option<(i64, Expr)> {
    let mut k = 0;
    let mut coefficient = Vec::new();
    for factor in term.factors() {
        match &factor {
            Expr::Sym(s) if s == x => k += 1,
            Expr::Pow(base, exponent) if base.is_symbol(x) => {
                let q = exponent.as_rational()?;
                if !q.is_integer() || q.is_negative() {
                    return None;
                }
                k += q.to_integer();
            }
            f if f.depends_on(x) => return None,
            f => coefficient.push(f.clone()),
        }
    }
    Some((k, Expr::product(coefficient)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r() -> Symbol {
        Symbol::positive("r")
    }

    fn b() -> Symbol {
        Symbol::positive("b")
    }

    #[test]
    fn test_polynomial_over_finite_range() {
        let x = Symbol::real("x");
        let e = x.expr().pow(2);
        assert_eq!(e.integrate(&x, &Expr::zero(), &Expr::integer(3)), Expr::integer(9));
        let lin = 2 * x.expr() + 1;
        assert_eq!(lin.integrate(&x, &Expr::integer(-1), &Expr::integer(1)), Expr::integer(2));
    }

    #[test]
    fn test_radial_exponential_moments() {
        // ∫ r² e^(-2br) dr = 1/(4b³)
        let density = r().expr().pow(2) * (-2 * b().expr() * r().expr()).exp();
        let value = density.integrate(&r(), &Expr::zero(), &Expr::infinity());
        assert_eq!(value, Expr::rational(1, 4) * b().expr().pow(-3));
    }

    #[test]
    fn test_gaussian_moments() {
        let x = Symbol::real("x");
        let g = (-(b().expr() * x.expr().pow(2))).exp();
        let line = (Expr::neg_infinity(), Expr::infinity());
        assert_eq!(
            g.integrate(&x, &line.0, &line.1),
            Expr::pi().sqrt() * b().expr().pow(Rational::new(-1, 2))
        );
        let odd = x.expr() * g.clone();
        assert_eq!(odd.integrate(&x, &line.0, &line.1), Expr::zero());
    }

    #[test]
    fn test_angular_integrals() {
        let theta = Symbol::real("theta");
        let phi = Symbol::real("phi");
        let t = theta.expr();
        let pi = Expr::pi();
        assert_eq!(t.sin().integrate(&theta, &Expr::zero(), &pi), Expr::integer(2));
        assert_eq!(
            (t.sin().pow(3)).integrate(&theta, &Expr::zero(), &pi),
            Expr::rational(4, 3)
        );
        assert_eq!(
            (t.sin() * t.cos()).integrate(&theta, &Expr::zero(), &pi),
            Expr::zero()
        );
        let two_pi = 2 * pi;
        assert_eq!(Expr::one().integrate(&phi, &Expr::zero(), &two_pi), two_pi.clone());
        let phase = (Expr::i() * phi.expr()).exp();
        assert_eq!(phase.integrate(&phi, &Expr::zero(), &two_pi), Expr::zero());
    }

    #[test]
    fn test_lorentzian() {
        // ∫ dx / (x² + 1) = π
        let x = Symbol::real("x");
        let e = (x.expr().pow(2) + 1).recip();
        assert_eq!(e.integrate(&x, &Expr::neg_infinity(), &Expr::infinity()), Expr::pi());
    }

    #[test]
    fn test_divergent_and_unknown() {
        let x = Symbol::real("x");
        let grows = x.expr().exp();
        assert_eq!(grows.integrate(&x, &Expr::zero(), &Expr::infinity()), Expr::infinity());
        let damped = x.expr().sin() * (-x.expr()).exp();
        let value = damped.integrate(&x, &Expr::zero(), &Expr::infinity());
        assert!(value.has_unevaluated_integral());
    }
}
