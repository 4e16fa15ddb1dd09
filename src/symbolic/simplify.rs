//! Canonicalizing constructors for sums, products, powers and functions.

use std::collections::BTreeMap;

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, One, Signed, Zero};

use super::expr::{Constant, Expr, Func};
use super::number::{factorial, factorize, half, is_odd, rational_pow, Rational};

impl Expr {
    /// Canonical sum. Coefficients that would overflow are kept as separate
    /// terms.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut constant = Rational::zero();
        let mut like: BTreeMap<Expr, Rational> = BTreeMap::new();
        let mut unmerged: Vec<Expr> = Vec::new();
        let (mut pos_inf, mut neg_inf) = (false, false);
        let mut stack: Vec<Expr> = terms.into_iter().collect();

        while let Some(term) = stack.pop() {
            match term {
                Expr::Add(inner) => stack.extend(inner),
                Expr::Num(q) => match constant.checked_add(&q) {
                    Some(value) => constant = value,
                    None => unmerged.push(Expr::Num(q)),
                },
                Expr::Const(Constant::Infinity) => pos_inf = true,
                Expr::Const(Constant::NegInfinity) => neg_inf = true,
                Expr::Const(Constant::Undefined) => return Expr::undefined(),
                other => {
                    let (c, rest) = other.split_coefficient();
                    let current = like.get(&rest).copied().unwrap_or_else(Rational::zero);
                    match current.checked_add(&c) {
                        Some(value) => {
                            like.insert(rest, value);
                        }
                        None => unmerged.push(rest.scaled(c)),
                    }
                }
            }
        }

        match (pos_inf, neg_inf) {
            (true, true) => return Expr::undefined(),
            (true, false) => return Expr::infinity(),
            (false, true) => return Expr::neg_infinity(),
            (false, false) => {}
        }

        let mut out: Vec<Expr> = Vec::with_capacity(like.len() + 1);
        if !constant.is_zero() {
            out.push(Expr::Num(constant));
        }
        out.extend(
            like.into_iter()
                .filter(|(_, c)| !c.is_zero())
                .map(|(rest, c)| rest.scaled(c)),
        );
        out.extend(unmerged);
        match out.len() {
            0 => Expr::zero(),
            1 => out.pop().unwrap_or_else(Expr::zero),
            _ => Expr::Add(out),
        }
    }

    /// Canonical product. Numeric factors that would overflow the
    /// coefficient stay as separate factors.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Expr {
        let mut coefficient = Rational::one();
        let mut unmerged: Vec<Expr> = Vec::new();
        let mut powers: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        let mut exp_args: Vec<Expr> = Vec::new();
        let mut imaginary = 0i64;
        let mut infinite = false;
        let mut stack: Vec<Expr> = factors.into_iter().collect();

        while let Some(factor) = stack.pop() {
            match factor {
                Expr::Mul(inner) => stack.extend(inner),
                Expr::Num(q) => match coefficient.checked_mul(&q) {
                    Some(value) => coefficient = value,
                    None => unmerged.push(Expr::Num(q)),
                },
                Expr::Const(Constant::I) => imaginary += 1,
                Expr::Const(Constant::Infinity) => infinite = true,
                Expr::Const(Constant::NegInfinity) => {
                    infinite = true;
                    coefficient = -coefficient;
                }
                Expr::Const(Constant::Undefined) => return Expr::undefined(),
                Expr::Func(Func::Exp, arg) => exp_args.push(*arg),
                Expr::Pow(base, exponent) => powers.entry(*base).or_default().push(*exponent),
                other => powers.entry(other).or_default().push(Expr::one()),
            }
        }

        if coefficient.is_zero() {
            return if infinite { Expr::undefined() } else { Expr::zero() };
        }
        if infinite {
            return if coefficient.is_positive() {
                Expr::infinity()
            } else {
                Expr::neg_infinity()
            };
        }

        match imaginary.rem_euclid(4) {
            1 => powers.entry(Expr::i()).or_default().push(Expr::one()),
            2 => coefficient = -coefficient,
            3 => {
                coefficient = -coefficient;
                powers.entry(Expr::i()).or_default().push(Expr::one());
            }
            _ => {}
        }

        let mut rebuilt = Vec::with_capacity(powers.len() + 1);
        let mut unstable = false;
        for (base, exponents) in powers {
            let exponent = Expr::sum(exponents);
            let power = Expr::power(base.clone(), exponent);
            let stable = match &power {
                Expr::Pow(b, _) => **b == base,
                Expr::Const(Constant::I) => true,
                other => *other == base && !matches!(other, Expr::Num(_)),
            };
            unstable |= !stable;
            rebuilt.push(power);
        }
        if !exp_args.is_empty() {
            let merged = Expr::sum(exp_args).exp();
            unstable |= !matches!(merged, Expr::Func(Func::Exp, _));
            rebuilt.push(merged);
        }

        rebuilt.extend(unmerged);
        if unstable {
            rebuilt.push(Expr::Num(coefficient));
            return Expr::product(rebuilt);
        }

        rebuilt.sort();
        let rest = Expr::from_sorted_factors(rebuilt);
        rest.scaled(coefficient)
    }

    /// `self` raised to `exponent`.
    pub fn pow(&self, exponent: impl Into<Expr>) -> Expr {
        Expr::power(self.clone(), exponent.into())
    }

    pub fn sqrt(&self) -> Expr {
        self.pow(half())
    }

    pub fn recip(&self) -> Expr {
        self.pow(-1)
    }

    pub(crate) fn power(base: Expr, exponent: Expr) -> Expr {
        if exponent.is_zero() {
            return Expr::one();
        }
        if exponent.is_one() {
            return base;
        }
        if base.is_undefined() || exponent.is_undefined() {
            return Expr::undefined();
        }
        if base.is_one() {
            return Expr::one();
        }

        if let Some(e) = exponent.as_rational() {
            match &base {
                Expr::Num(q) => return numeric_power(*q, e),
                Expr::Const(Constant::Infinity) => {
                    return if e.is_positive() {
                        Expr::infinity()
                    } else {
                        Expr::zero()
                    };
                }
                Expr::Const(Constant::NegInfinity) if e.is_integer() => {
                    return match (e.is_positive(), is_odd(e.to_integer())) {
                        (false, _) => Expr::zero(),
                        (true, true) => Expr::neg_infinity(),
                        (true, false) => Expr::infinity(),
                    };
                }
                Expr::Const(Constant::I) if e.is_integer() => return i_power(e.to_integer()),
                Expr::Pow(inner, inner_exponent) if e.is_integer() || inner.is_nonnegative() => {
                    let combined = Expr::product([(**inner_exponent).clone(), Expr::Num(e)]);
                    return Expr::power((**inner).clone(), combined);
                }
                Expr::Func(Func::Exp, arg) if e.is_integer() || arg.is_real() => {
                    return Expr::product([(**arg).clone(), Expr::Num(e)]).exp();
                }
                Expr::Mul(items) => {
                    if e.is_integer() {
                        return Expr::product(items.iter().map(|f| f.pow(e)));
                    }
                    let (positive, rest): (Vec<Expr>, Vec<Expr>) =
                        items.iter().cloned().partition(Expr::is_positive);
                    if !positive.is_empty() {
                        let mut factors: Vec<Expr> = positive.iter().map(|f| f.pow(e)).collect();
                        if !rest.is_empty() {
                            let rest = Expr::product(rest);
                            factors.push(Expr::Pow(Box::new(rest), Box::new(Expr::Num(e))));
                        }
                        return Expr::product(factors);
                    }
                }
                _ => {}
            }
        } else if let Expr::Func(Func::Exp, arg) = &base {
            if arg.is_real() && exponent.is_real() {
                return Expr::product([(**arg).clone(), exponent]).exp();
            }
        }

        Expr::Pow(Box::new(base), Box::new(exponent))
    }

    pub fn exp(&self) -> Expr {
        match self {
            e if e.is_zero() => Expr::one(),
            Expr::Const(Constant::NegInfinity) => Expr::zero(),
            Expr::Const(Constant::Infinity) => Expr::infinity(),
            Expr::Const(Constant::Undefined) => Expr::undefined(),
            Expr::Func(Func::Log, arg) => (**arg).clone(),
            _ => Expr::Func(Func::Exp, Box::new(self.clone())),
        }
    }

    pub fn sin(&self) -> Expr {
        match self {
            e if e.is_zero() => Expr::zero(),
            Expr::Const(Constant::Pi) => Expr::zero(),
            _ => Expr::Func(Func::Sin, Box::new(self.clone())),
        }
    }

    pub fn cos(&self) -> Expr {
        match self {
            e if e.is_zero() => Expr::one(),
            Expr::Const(Constant::Pi) => Expr::integer(-1),
            _ => Expr::Func(Func::Cos, Box::new(self.clone())),
        }
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Expr {
        match self {
            e if e.is_one() => Expr::zero(),
            e if e.is_zero() => Expr::neg_infinity(),
            Expr::Const(Constant::Infinity) => Expr::infinity(),
            Expr::Func(Func::Exp, arg) if arg.is_real() => (**arg).clone(),
            _ => Expr::Func(Func::Log, Box::new(self.clone())),
        }
    }

    /// Γ(q) reduced to factorials, half-integer √π multiples, or a multiple of
    /// Γ of the fractional part. Left unreduced when the rational coefficient
    /// would overflow.
    pub fn gamma(q: Rational) -> Expr {
        let unreduced = || Expr::Func(Func::Gamma, Box::new(Expr::Num(q)));
        if q.is_integer() {
            let n = q.to_integer();
            if n <= 0 {
                return Expr::infinity();
            }
            return factorial(n - 1).map_or_else(unreduced, Expr::integer);
        }
        let fraction = q - q.floor();
        let mut coefficient = Rational::one();
        let mut x = q;
        while x > fraction {
            x -= Rational::one();
            let Some(value) = coefficient.checked_mul(&x) else {
                return unreduced();
            };
            coefficient = value;
        }
        while x < fraction {
            let Some(value) = coefficient.checked_div(&x) else {
                return unreduced();
            };
            coefficient = value;
            x += Rational::one();
        }
        let base = if fraction == half() {
            Expr::pi().sqrt()
        } else {
            Expr::Func(Func::Gamma, Box::new(Expr::Num(fraction)))
        };
        base.scaled(coefficient)
    }

    /// Apply a function by tag.
    pub fn apply_func(func: Func, arg: Expr) -> Expr {
        match func {
            Func::Exp => arg.exp(),
            Func::Sin => arg.sin(),
            Func::Cos => arg.cos(),
            Func::Log => arg.ln(),
            Func::Gamma => match arg.as_rational() {
                Some(q) => Expr::gamma(q),
                None => Expr::Func(Func::Gamma, Box::new(arg)),
            },
        }
    }
}

fn i_power(n: i64) -> Expr {
    match n.rem_euclid(4) {
        0 => Expr::one(),
        1 => Expr::i(),
        2 => Expr::integer(-1),
        _ => Expr::Mul(vec![Expr::integer(-1), Expr::i()]),
    }
}

/// q^e for rationals, written as a rational coefficient times prime radicals
/// with exponents in (0, 1).
fn numeric_power(q: Rational, e: Rational) -> Expr {
    let raw = || Expr::Pow(Box::new(Expr::Num(q)), Box::new(Expr::Num(e)));
    if q.is_zero() {
        return if e.is_positive() {
            Expr::zero()
        } else {
            Expr::infinity()
        };
    }
    if e.is_integer() {
        return rational_pow(q, e.to_integer()).map_or_else(raw, Expr::Num);
    }
    if q.is_negative() {
        if *e.denom() == 2 {
            return Expr::product([numeric_power(-q, e), i_power(*e.numer())]);
        }
        return raw();
    }

    let (Some(numer), Some(denom)) = (factorize(*q.numer()), factorize(*q.denom())) else {
        return raw();
    };
    let mut coefficient = Rational::one();
    let mut radicals = Vec::new();
    let primes = numer
        .into_iter()
        .chain(denom.into_iter().map(|(p, k)| (p, -k)));
    for (p, k) in primes {
        let x = e * Rational::from_integer(k);
        let whole = x.floor();
        let fraction = x - whole;
        match rational_pow(Rational::from_integer(p), whole.to_integer())
            .and_then(|value| coefficient.checked_mul(&value))
        {
            Some(value) => coefficient = value,
            None => return raw(),
        }
        if !fraction.is_zero() {
            radicals.push(Expr::Pow(
                Box::new(Expr::integer(p)),
                Box::new(Expr::Num(fraction)),
            ));
        }
    }
    radicals.sort();
    Expr::from_sorted_factors(radicals).scaled(coefficient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Symbol;

    #[test]
    fn test_like_terms_collect() {
        let b = Symbol::positive("b").expr();
        let e = Expr::sum([b.clone(), b.clone(), Expr::integer(3), Expr::integer(-3)]);
        assert_eq!(e, Expr::integer(2) * b.clone());
        assert_eq!(b.clone() - b, Expr::zero());
    }

    #[test]
    fn test_like_bases_collect() {
        let r = Symbol::positive("r").expr();
        assert_eq!(r.clone() * r.clone() * r.clone(), r.pow(3));
        assert_eq!(r.pow(2) * r.pow(-2), Expr::one());
        assert_eq!(r.sqrt() * r.sqrt(), r);
    }

    #[test]
    fn test_numeric_radicals() {
        assert_eq!(Expr::integer(4).sqrt(), Expr::integer(2));
        assert_eq!(Expr::rational(1, 64).sqrt(), Expr::rational(1, 8));
        // 8^(1/2) = 2 * 2^(1/2)
        let two = Expr::integer(2);
        assert_eq!(Expr::integer(8).sqrt(), two.clone() * two.sqrt());
        assert_eq!(two.sqrt() * two.sqrt(), two);
        assert_eq!(Expr::integer(-4).sqrt(), Expr::integer(2) * Expr::i());
    }

    #[test]
    fn test_imaginary_unit_cycles() {
        let i = Expr::i();
        assert_eq!(i.clone() * i.clone(), Expr::integer(-1));
        assert_eq!(i.pow(4), Expr::one());
        assert_eq!(i.clone() * i.clone() * i.clone(), -Expr::i());
    }

    #[test]
    fn test_exponentials_merge() {
        let b = Symbol::positive("b").expr();
        let r = Symbol::positive("r").expr();
        let f = (-(b.clone() * r.clone())).exp();
        let squared = f.clone() * f.clone();
        assert_eq!(squared, (Expr::integer(-2) * b * r).exp());
        let phi = Symbol::real("phi").expr();
        let phase = (Expr::i() * phi.clone()).exp() * (-(Expr::i() * phi)).exp();
        assert_eq!(phase, Expr::one());
    }

    #[test]
    fn test_power_of_product_distributes_over_positive_factors() {
        let b = Symbol::positive("b").expr();
        let e = (Expr::integer(4) * b.pow(3)).sqrt();
        assert_eq!(e, Expr::integer(2) * b.pow(Rational::new(3, 2)));
    }

    #[test]
    fn test_gamma_reduction() {
        assert_eq!(Expr::gamma(Rational::from_integer(5)), Expr::integer(24));
        assert_eq!(Expr::gamma(Rational::new(3, 2)), Expr::rational(1, 2) * Expr::pi().sqrt());
        assert_eq!(Expr::gamma(Rational::new(-1, 2)), Expr::integer(-2) * Expr::pi().sqrt());
        assert_eq!(
            Expr::gamma(Rational::new(7, 3)),
            Expr::rational(4, 9) * Expr::gamma(Rational::new(1, 3))
        );
        assert_eq!(Expr::gamma(Rational::zero()), Expr::infinity());
    }

    #[test]
    fn test_overflowing_coefficients_stay_unreduced() {
        // 41!! does not fit in an i64
        let big = Rational::new(43, 2);
        assert_eq!(Expr::gamma(big), Expr::Func(Func::Gamma, Box::new(Expr::Num(big))));
        assert!(Expr::gamma(big).is_positive());

        let large = Expr::integer(1 << 62);
        let product = large.clone() * large.clone();
        assert_eq!(product.factors().len(), 2);
        assert_eq!(product.clone() / large.clone(), large);

        let sum = large.clone() + large.clone() + large.clone();
        assert_eq!(sum.terms().len(), 3);
        assert_eq!(sum - large.clone() - large.clone(), large);

        // 3^60 overflows; stays a raw power
        let power = Expr::integer(3).pow(60);
        assert!(matches!(power, Expr::Pow(..)));
    }

    #[test]
    fn test_infinities() {
        assert_eq!(Expr::infinity() + Expr::integer(1), Expr::infinity());
        assert!((Expr::infinity() - Expr::infinity()).is_undefined());
        assert_eq!(Expr::integer(-2) * Expr::infinity(), Expr::neg_infinity());
        assert!((Expr::zero() * Expr::infinity()).is_undefined());
    }
}
