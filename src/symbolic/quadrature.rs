//! Adaptive Gauss-Legendre quadrature for integrals left unevaluated.
//!
//! Infinite ranges are mapped onto finite ones with `x = a + t/(1-t)` on
//! `[0, 1)` and `x = t/(1-t²)` on `(-1, 1)`.

use num_complex::Complex64;

use crate::error::Result;

const NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683_1,
    0.0,
    0.538_469_310_105_683_1,
    0.906_179_845_938_664,
];

const WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189_1,
    0.478_628_670_499_366_5,
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
];

const RELATIVE_TOLERANCE: f64 = 1e-10;
const ABSOLUTE_TOLERANCE: f64 = 1e-13;
const MAX_DEPTH: u32 = 40;
/// Beyond this magnitude a non-finite integrand value is taken as a vanished tail.
const TAIL: f64 = 1e6;

/// ∫ f(x) dx from `lower` to `upper`; either bound may be infinite.
pub fn integrate<F>(f: &mut F, lower: f64, upper: f64) -> Result<Complex64>
where
    F: FnMut(f64) -> Result<Complex64>,
{
    if lower == upper {
        return Ok(Complex64::new(0.0, 0.0));
    }
    if lower > upper {
        return integrate(f, upper, lower).map(|v| -v);
    }
    match (lower.is_finite(), upper.is_finite()) {
        (true, true) => adaptive_on(f, lower, upper),
        (true, false) => {
            let mut mapped = |t: f64| {
                let s = 1.0 - t;
                tail_guard(f, lower + t / s, 1.0 / (s * s))
            };
            adaptive_on(&mut mapped, 0.0, 1.0)
        }
        (false, true) => {
            let mut mapped = |t: f64| {
                let s = 1.0 - t;
                tail_guard(f, upper - t / s, 1.0 / (s * s))
            };
            adaptive_on(&mut mapped, 0.0, 1.0)
        }
        (false, false) => {
            let mut mapped = |t: f64| {
                let s = 1.0 - t * t;
                tail_guard(f, t / s, (1.0 + t * t) / (s * s))
            };
            adaptive_on(&mut mapped, -1.0, 1.0)
        }
    }
}

fn tail_guard<F>(f: &mut F, x: f64, jacobian: f64) -> Result<Complex64>
where
    F: FnMut(f64) -> Result<Complex64>,
{
    let value = f(x)? * jacobian;
    if !(value.re.is_finite() && value.im.is_finite()) && x.abs() > TAIL {
        return Ok(Complex64::new(0.0, 0.0));
    }
    Ok(value)
}

fn adaptive_on<F>(f: &mut F, a: f64, b: f64) -> Result<Complex64>
where
    F: FnMut(f64) -> Result<Complex64>,
{
    let whole = gauss(f, a, b)?;
    let tolerance = (RELATIVE_TOLERANCE * whole.norm()).max(ABSOLUTE_TOLERANCE);
    adaptive(f, a, b, whole, tolerance, MAX_DEPTH)
}

fn adaptive<F>(f: &mut F, a: f64, b: f64, whole: Complex64, tolerance: f64, depth: u32) -> Result<Complex64>
where
    F: FnMut(f64) -> Result<Complex64>,
{
    let mid = 0.5 * (a + b);
    let left = gauss(f, a, mid)?;
    let right = gauss(f, mid, b)?;
    let refined = left + right;
    let error = (refined - whole).norm();
    if depth == 0 || !error.is_finite() || error <= tolerance {
        return Ok(refined);
    }
    Ok(adaptive(f, a, mid, left, 0.5 * tolerance, depth - 1)?
        + adaptive(f, mid, b, right, 0.5 * tolerance, depth - 1)?)
}

fn gauss<F>(f: &mut F, a: f64, b: f64) -> Result<Complex64>
where
    F: FnMut(f64) -> Result<Complex64>,
{
    let mid = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let mut sum = Complex64::new(0.0, 0.0);
    for (node, weight) in NODES.iter().zip(WEIGHTS.iter()) {
        sum += f(mid + half * node)? * *weight;
    }
    Ok(sum * half)
}
