//! Numeric evaluation of expressions.

use std::collections::HashMap;
use std::f64::consts::PI;

use num_complex::Complex64;
use statrs::function::gamma::gamma;

use super::expr::{Constant, Expr, Func, Integral, Symbol};
use super::number::to_f64;
use super::quadrature;
use crate::error::{Error, Result};

/// Values for free symbols during evaluation.
pub type Env = HashMap<Symbol, f64>;

/// Build an environment from parallel symbol and value slices.
pub fn env_of(symbols: &[Symbol], values: &[f64]) -> Env {
    symbols.iter().cloned().zip(values.iter().copied()).collect()
}

impl Expr {
    /// Complex value of the expression.
    pub fn eval(&self, env: &Env) -> Result<Complex64> {
        match self {
            Expr::Num(q) => Ok(Complex64::new(to_f64(q), 0.0)),
            Expr::Const(c) => Ok(match c {
                Constant::Pi => Complex64::new(PI, 0.0),
                Constant::I => Complex64::i(),
                Constant::Infinity => Complex64::new(f64::INFINITY, 0.0),
                Constant::NegInfinity => Complex64::new(f64::NEG_INFINITY, 0.0),
                Constant::Undefined => Complex64::new(f64::NAN, 0.0),
            }),
            Expr::Sym(s) => env
                .get(s)
                .map(|v| Complex64::new(*v, 0.0))
                .ok_or_else(|| Error::UnboundSymbol(s.name().to_string())),
            Expr::Add(terms) => terms
                .iter()
                .try_fold(Complex64::new(0.0, 0.0), |acc, t| Ok(acc + t.eval(env)?)),
            Expr::Mul(factors) => factors
                .iter()
                .try_fold(Complex64::new(1.0, 0.0), |acc, f| Ok(acc * f.eval(env)?)),
            Expr::Pow(base, exponent) => {
                let b = base.eval(env)?;
                match exponent.as_rational() {
                    Some(q) if q.is_integer() => Ok(powi(b, q.to_integer())),
                    Some(q) if b.im == 0.0 && b.re >= 0.0 => {
                        Ok(Complex64::new(b.re.powf(to_f64(&q)), 0.0))
                    }
                    Some(q) => Ok(b.powf(to_f64(&q))),
                    None => Ok(b.powc(exponent.eval(env)?)),
                }
            }
            Expr::Func(func, arg) => {
                let a = arg.eval(env)?;
                Ok(match func {
                    Func::Exp => a.exp(),
                    Func::Sin => a.sin(),
                    Func::Cos => a.cos(),
                    Func::Log => a.ln(),
                    Func::Gamma => Complex64::new(gamma(a.re), 0.0),
                })
            }
            Expr::Integral(integral) => integral.eval(env),
        }
    }

    /// Real value of the expression; complex or NaN results are errors.
    pub fn eval_real(&self, env: &Env) -> Result<f64> {
        let z = self.eval(env)?;
        if z.re.is_nan() || z.im.is_nan() || z.im.abs() > 1e-9 * z.re.abs().max(1.0) {
            return Err(Error::NonReal(self.to_string()));
        }
        Ok(z.re)
    }
}

fn powi(b: Complex64, n: i64) -> Complex64 {
    match i32::try_from(n) {
        Ok(n) if b.im == 0.0 => Complex64::new(b.re.powi(n), 0.0),
        Ok(n) => b.powi(n),
        Err(_) => b.powf(n as f64),
    }
}

impl Integral {
    fn eval(&self, env: &Env) -> Result<Complex64> {
        let lower = self.lower.eval_real(env)?;
        let upper = self.upper.eval_real(env)?;
        let mut local = env.clone();
        let mut integrand = |x: f64| {
            local.insert(self.var.clone(), x);
            self.integrand.eval(&local)
        };
        quadrature::integrate(&mut integrand, lower, upper)
    }
}
