//! Differentiation, conjugation, substitution and expansion.

use super::expr::{Constant, Expr, Func, Symbol};
use super::number::Rational;

/// Largest positive integer power of a sum expanded term by term.
const MAX_EXPANDED_POWER: i64 = 32;

impl Expr {
    /// Partial derivative with respect to `x`.
    pub fn diff(&self, x: &Symbol) -> Expr {
        if !self.depends_on(x) {
            return Expr::zero();
        }
        match self {
            Expr::Sym(_) => Expr::one(),
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.diff(x))),
            Expr::Mul(factors) => Expr::sum((0..factors.len()).filter_map(|i| {
                let derivative = factors[i].diff(x);
                if derivative.is_zero() {
                    return None;
                }
                let others = factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, f)| f.clone());
                Some(Expr::product(others.chain(std::iter::once(derivative))))
            })),
            Expr::Pow(base, exponent) if !exponent.depends_on(x) => Expr::product([
                (**exponent).clone(),
                base.pow(Expr::sum([(**exponent).clone(), Expr::integer(-1)])),
                base.diff(x),
            ]),
            Expr::Pow(base, exponent) => {
                let log_term = exponent.diff(x) * base.ln();
                let base_term = Expr::product([(**exponent).clone(), base.diff(x), base.recip()]);
                self * (log_term + base_term)
            }
            Expr::Func(func, arg) => {
                let inner = arg.diff(x);
                let outer = match func {
                    Func::Exp => self.clone(),
                    Func::Sin => arg.cos(),
                    Func::Cos => -arg.sin(),
                    Func::Log => arg.recip(),
                    Func::Gamma => Expr::zero(),
                };
                outer * inner
            }
            Expr::Integral(integral) => {
                // Leibniz rule
                let mut parts = Vec::with_capacity(3);
                if integral.var != *x {
                    parts.push(Expr::integral(
                        integral.integrand.diff(x),
                        integral.var.clone(),
                        integral.lower.clone(),
                        integral.upper.clone(),
                    ));
                }
                // boundary terms only for limits that move with x
                if integral.upper.depends_on(x) {
                    let at_upper = integral.integrand.subs(&integral.var, &integral.upper);
                    parts.push(at_upper * integral.upper.diff(x));
                }
                if integral.lower.depends_on(x) {
                    let at_lower = integral.integrand.subs(&integral.var, &integral.lower);
                    parts.push(-(at_lower * integral.lower.diff(x)));
                }
                Expr::sum(parts)
            }
            Expr::Num(_) | Expr::Const(_) => Expr::zero(),
        }
    }

    /// Complex conjugate; all symbols are real.
    pub fn conjugate(&self) -> Expr {
        match self {
            Expr::Const(Constant::I) => -Expr::i(),
            Expr::Add(terms) => Expr::sum(terms.iter().map(Expr::conjugate)),
            Expr::Mul(factors) => Expr::product(factors.iter().map(Expr::conjugate)),
            Expr::Pow(base, exponent) => base.conjugate().pow(exponent.conjugate()),
            Expr::Func(func, arg) => Expr::apply_func(*func, arg.conjugate()),
            Expr::Integral(integral) => Expr::integral(
                integral.integrand.conjugate(),
                integral.var.clone(),
                integral.lower.conjugate(),
                integral.upper.conjugate(),
            ),
            other => other.clone(),
        }
    }

    /// Replace every free occurrence of `x` with `value`.
    pub fn subs(&self, x: &Symbol, value: &Expr) -> Expr {
        if !self.depends_on(x) {
            return self.clone();
        }
        match self {
            Expr::Sym(_) => value.clone(),
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.subs(x, value))),
            Expr::Mul(factors) => Expr::product(factors.iter().map(|f| f.subs(x, value))),
            Expr::Pow(base, exponent) => base.subs(x, value).pow(exponent.subs(x, value)),
            Expr::Func(func, arg) => Expr::apply_func(*func, arg.subs(x, value)),
            Expr::Integral(integral) => {
                let integrand = if integral.var == *x {
                    integral.integrand.clone()
                } else {
                    integral.integrand.subs(x, value)
                };
                Expr::integral(
                    integrand,
                    integral.var.clone(),
                    integral.lower.subs(x, value),
                    integral.upper.subs(x, value),
                )
            }
            other => other.clone(),
        }
    }

    /// Distribute products over sums and expand positive integer powers of
    /// sums, including inside function arguments.
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Add(terms) => Expr::sum(terms.iter().map(Expr::expand)),
            Expr::Mul(factors) => {
                let mut partial = vec![Expr::one()];
                for factor in factors {
                    let terms = factor.expand().terms();
                    partial = distribute(&partial, &terms);
                }
                Expr::sum(partial)
            }
            Expr::Pow(base, exponent) => {
                let base = base.expand();
                let exponent = exponent.expand();
                if let (Expr::Add(terms), Some(n)) = (&base, exponent.as_rational()) {
                    if n.is_integer() && n > Rational::from_integer(0) && n.to_integer() <= MAX_EXPANDED_POWER {
                        let mut partial = terms.clone();
                        for _ in 1..n.to_integer() {
                            partial = distribute(&partial, terms);
                        }
                        return Expr::sum(partial);
                    }
                }
                match base.pow(exponent) {
                    product @ Expr::Mul(_) => product.expand(),
                    other => other,
                }
            }
            Expr::Func(func, arg) => Expr::apply_func(*func, arg.expand()),
            Expr::Integral(integral) => Expr::integral(
                integral.integrand.expand(),
                integral.var.clone(),
                integral.lower.clone(),
                integral.upper.clone(),
            ),
            other => other.clone(),
        }
    }
}

fn distribute(left: &[Expr], right: &[Expr]) -> Vec<Expr> {
    left.iter()
        .flat_map(|a| right.iter().map(move |b| Expr::product([a.clone(), b.clone()])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::env_of;
    use approx::assert_relative_eq;

    #[test]
    fn test_power_and_chain_rules() {
        let b = Symbol::positive("b");
        let r = Symbol::positive("r");
        let f = (-(b.expr() * r.expr())).exp();
        assert_eq!(f.diff(&r), -(b.expr() * f.clone()));
        assert_eq!(r.expr().pow(3).diff(&r), 3 * r.expr().pow(2));
        assert_eq!(f.diff(&Symbol::real("x")), Expr::zero());
    }

    #[test]
    fn test_trig_derivatives() {
        let theta = Symbol::real("theta");
        let t = theta.expr();
        assert_eq!(t.sin().diff(&theta), t.cos());
        assert_eq!(t.cos().diff(&theta), -t.sin());
        // d/dθ (sinθ cosθ) = cos²θ - sin²θ
        let e = t.sin() * t.cos();
        assert_eq!(e.diff(&theta), t.cos().pow(2) - t.sin().pow(2));
    }

    #[test]
    fn test_conjugate_flips_imaginary_unit() {
        let phi = Symbol::real("phi").expr();
        let f = (-(Expr::i() * phi.clone())).exp();
        assert_eq!(f.conjugate(), (Expr::i() * phi).exp());
        assert_eq!((f.clone() * f.conjugate()), Expr::one());
    }

    #[test]
    fn test_subs_and_expand() {
        let b = Symbol::positive("b");
        let e = (b.expr() + 1).pow(2);
        assert_eq!(e.subs(&b, &Expr::integer(2)), Expr::integer(9));
        assert_eq!(e.expand(), b.expr().pow(2) + 2 * b.expr() + 1);
        let x = Symbol::real("x");
        let product = (x.expr() + 1) * (x.expr() - 1);
        assert_eq!(product.expand(), x.expr().pow(2) - 1);
    }

    #[test]
    fn test_deferred_integral_derivative_on_half_line() {
        let r = Symbol::positive("r");
        let a = Symbol::positive("a");
        let b = Symbol::positive("b");
        let integrand = r.expr().pow(2) * (-(a.expr() * r.expr()) - b.expr() * r.expr().pow(2)).exp();
        let deferred = Expr::integral(integrand, r.clone(), Expr::zero(), Expr::infinity());
        let derivative = deferred.diff(&a);
        assert!(!derivative.is_undefined());

        let at = |x: f64| deferred.eval_real(&env_of(&[a.clone(), b.clone()], &[x, 1.0])).unwrap();
        let h = 1e-4;
        let numeric = (at(1.0 + h) - at(1.0 - h)) / (2.0 * h);
        let exact = derivative
            .eval_real(&env_of(&[a.clone(), b.clone()], &[1.0, 1.0]))
            .unwrap();
        assert_relative_eq!(exact, numeric, epsilon = 1e-6);
    }

    #[test]
    fn test_moving_upper_limit() {
        let x = Symbol::real("x");
        let b = Symbol::positive("b");
        let deferred = Expr::integral(x.expr(), x.clone(), Expr::zero(), b.expr());
        assert_eq!(deferred.diff(&b), b.expr());
    }

    #[test]
    fn test_expand_reaches_exponent_arguments() {
        let b = Symbol::positive("b").expr();
        let x = Symbol::real("x").expr();
        let y = Symbol::real("y").expr();
        let f = (-(b.clone() * (x.pow(2) + y.pow(2)))).exp();
        let expanded = f.expand();
        assert_eq!(expanded, (-(b.clone() * x.pow(2)) - b * y.pow(2)).exp());
    }
}
