//! Human readable rendering, close to conventional computer algebra output.

use std::fmt;

use num_traits::{One, Signed};

use super::expr::{Constant, Expr, Func, Symbol};
use super::number::Rational;

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(q) => write_rational(f, q),
            Expr::Const(c) => f.write_str(match c {
                Constant::Pi => "pi",
                Constant::I => "I",
                Constant::Infinity => "oo",
                Constant::NegInfinity => "-oo",
                Constant::Undefined => "nan",
            }),
            Expr::Sym(s) => write!(f, "{s}"),
            Expr::Add(terms) => {
                for (index, term) in terms.iter().enumerate() {
                    let negative = term.split_coefficient().0.is_negative();
                    match (index, negative) {
                        (0, _) => write!(f, "{term}")?,
                        (_, true) => write!(f, " - {}", -term)?,
                        (_, false) => write!(f, " + {term}")?,
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => write_product(f, factors),
            Expr::Pow(base, exponent) => {
                write_base(f, base)?;
                f.write_str("**")?;
                write_exponent(f, exponent)
            }
            Expr::Func(func, arg) => {
                let name = match func {
                    Func::Exp => "exp",
                    Func::Sin => "sin",
                    Func::Cos => "cos",
                    Func::Log => "log",
                    Func::Gamma => "gamma",
                };
                write!(f, "{name}({arg})")
            }
            Expr::Integral(integral) => write!(
                f,
                "Integral({}, ({}, {}, {}))",
                integral.integrand, integral.var, integral.lower, integral.upper
            ),
        }
    }
}

fn write_rational(f: &mut fmt::Formatter<'_>, q: &Rational) -> fmt::Result {
    if q.is_integer() {
        write!(f, "{}", q.numer())
    } else {
        write!(f, "{}/{}", q.numer(), q.denom())
    }
}

fn write_base(f: &mut fmt::Formatter<'_>, base: &Expr) -> fmt::Result {
    let wrap = match base {
        Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..) => true,
        Expr::Num(q) => !q.is_integer() || q.is_negative(),
        Expr::Const(Constant::NegInfinity) => true,
        _ => false,
    };
    if wrap {
        write!(f, "({base})")
    } else {
        write!(f, "{base}")
    }
}

fn write_exponent(f: &mut fmt::Formatter<'_>, exponent: &Expr) -> fmt::Result {
    match exponent {
        Expr::Num(q) if q.is_integer() && !q.is_negative() => write!(f, "{exponent}"),
        Expr::Sym(_) | Expr::Const(_) => write!(f, "{exponent}"),
        _ => write!(f, "({exponent})"),
    }
}

fn write_factor(f: &mut fmt::Formatter<'_>, factor: &Expr) -> fmt::Result {
    match factor {
        Expr::Add(_) => write!(f, "({factor})"),
        _ => write!(f, "{factor}"),
    }
}

fn write_product(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    let (coefficient, rest) = match factors.split_first() {
        Some((Expr::Num(q), rest)) => (*q, rest),
        _ => (Rational::one(), factors),
    };
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in rest {
        match factor {
            Expr::Pow(base, exponent) if exponent.as_rational().is_some_and(|q| q.is_negative()) => {
                denominator.push((**base).pow(-&**exponent));
            }
            other => numerator.push(other.clone()),
        }
    }

    if coefficient.is_negative() {
        f.write_str("-")?;
    }
    let magnitude = coefficient.abs();
    let mut first = true;
    if !magnitude.numer().is_one() || numerator.is_empty() {
        write!(f, "{}", magnitude.numer())?;
        first = false;
    }
    for factor in &numerator {
        if !first {
            f.write_str("*")?;
        }
        write_factor(f, factor)?;
        first = false;
    }

    let denominator_count = denominator.len() + usize::from(!magnitude.denom().is_one());
    if denominator_count == 0 {
        return Ok(());
    }
    f.write_str("/")?;
    if denominator_count > 1 {
        f.write_str("(")?;
    }
    let mut first = true;
    if !magnitude.denom().is_one() {
        write!(f, "{}", magnitude.denom())?;
        first = false;
    }
    for factor in &denominator {
        if !first {
            f.write_str("*")?;
        }
        match factor {
            Expr::Add(_) | Expr::Mul(_) => write!(f, "({factor})")?,
            _ => write!(f, "{factor}")?,
        }
        first = false;
    }
    if denominator_count > 1 {
        f.write_str(")")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let b = Symbol::positive("b").expr();
        let r = Symbol::positive("r").expr();
        assert_eq!((Expr::rational(1, 2) * b.pow(2) - b.clone()).to_string(), "-b + b**2/2");
        assert_eq!((2 * b.pow(Rational::new(3, 2))).to_string(), "2*b**(3/2)");
        assert_eq!((b.clone() / r.clone()).to_string(), "b/r");
        assert_eq!((-(b.clone() * r)).exp().to_string(), "exp(-b*r)");
        assert_eq!(Expr::rational(-4, 3).to_string(), "-4/3");
    }
}
