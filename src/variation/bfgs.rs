//! Quasi-Newton minimization for the multi-parameter path.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::{debug, trace};

/// Sufficient decrease constant of the Armijo condition.
const ARMIJO: f64 = 1e-4;
/// Smallest step tried by the backtracking line search.
const MIN_STEP: f64 = 1e-12;

/// Outcome of a numeric minimization.
#[derive(Clone, Debug, Serialize)]
pub struct ConvergenceStatus {
    /// Whether the gradient norm fell below tolerance
    pub converged: bool,
    /// BFGS iterations performed
    pub iterations: usize,
    /// Gradient norm at the returned point
    pub gradient_norm: f64,
    /// Human-readable reason for stopping
    pub message: String,
}

/// BFGS with backtracking line search.
pub(crate) struct Bfgs {
    pub max_iterations: usize,
    pub gradient_tolerance: f64,
}

pub(crate) struct BfgsOutcome {
    pub x: DVector<f64>,
    pub value: f64,
    pub status: ConvergenceStatus,
}

impl Bfgs {
    /// Minimize `f` from `x0`; `f` returns `+∞` where it cannot be evaluated.
    pub fn minimize<F, G>(&self, f: F, gradient: G, x0: DVector<f64>) -> BfgsOutcome
    where
        F: Fn(&DVector<f64>) -> f64,
        G: Fn(&DVector<f64>) -> DVector<f64>,
    {
        let n = x0.len();
        let mut x = x0;
        let mut fx = f(&x);
        let finish = |x: DVector<f64>, value: f64, converged: bool, iterations: usize, norm: f64, message: &str| {
            BfgsOutcome {
                x,
                value,
                status: ConvergenceStatus {
                    converged,
                    iterations,
                    gradient_norm: norm,
                    message: message.to_string(),
                },
            }
        };
        if !fx.is_finite() {
            return finish(x, fx, false, 0, f64::NAN, "objective is not finite at the initial guess");
        }

        let mut g = gradient(&x);
        let mut h = DMatrix::<f64>::identity(n, n);
        for iteration in 0..self.max_iterations {
            let norm = g.norm();
            trace!(iteration, value = fx, gradient_norm = norm, "bfgs step");
            if !norm.is_finite() {
                return finish(x, fx, false, iteration, norm, "gradient is not finite");
            }
            if norm <= self.gradient_tolerance {
                return finish(x, fx, true, iteration, norm, "gradient norm below tolerance");
            }

            let mut direction = -(&h * &g);
            let mut slope = direction.dot(&g);
            if slope >= 0.0 {
                // not a descent direction: restart from steepest descent
                h = DMatrix::identity(n, n);
                direction = -g.clone();
                slope = direction.dot(&g);
            }

            let mut step = 1.0;
            let mut accepted = None;
            while step > MIN_STEP {
                let candidate = &x + &direction * step;
                let value = f(&candidate);
                if value.is_finite() && value <= fx + ARMIJO * step * slope {
                    accepted = Some((candidate, value));
                    break;
                }
                step *= 0.5;
            }
            let Some((x_new, f_new)) = accepted else {
                debug!(iteration, "line search stalled");
                return finish(x, fx, false, iteration, norm, "line search failed to decrease the objective");
            };

            let g_new = gradient(&x_new);
            let s = &x_new - &x;
            let y = &g_new - &g;
            let sy = s.dot(&y);
            if sy > f64::EPSILON * s.norm() * y.norm() {
                if iteration == 0 {
                    h = DMatrix::identity(n, n) * (sy / y.dot(&y));
                }
                let rho = 1.0 / sy;
                let identity = DMatrix::<f64>::identity(n, n);
                let left = &identity - (&s * y.transpose()) * rho;
                let right = &identity - (&y * s.transpose()) * rho;
                h = &left * &h * &right + (&s * s.transpose()) * rho;
            }
            x = x_new;
            fx = f_new;
            g = g_new;
        }

        let norm = g.norm();
        let converged = norm <= self.gradient_tolerance;
        let message = if converged {
            "gradient norm below tolerance"
        } else {
            "maximum number of iterations reached"
        };
        finish(x, fx, converged, self.max_iterations, norm, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rosenbrock() {
        let f = |v: &DVector<f64>| (1.0 - v[0]).powi(2) + 100.0 * (v[1] - v[0] * v[0]).powi(2);
        let g = |v: &DVector<f64>| {
            DVector::from_vec(vec![
                -2.0 * (1.0 - v[0]) - 400.0 * v[0] * (v[1] - v[0] * v[0]),
                200.0 * (v[1] - v[0] * v[0]),
            ])
        };
        let bfgs = Bfgs {
            max_iterations: 1000,
            gradient_tolerance: 1e-6,
        };
        let outcome = bfgs.minimize(f, g, DVector::from_vec(vec![-1.2, 1.0]));
        assert!(outcome.status.converged, "{}", outcome.status.message);
        assert_relative_eq!(outcome.x[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(outcome.x[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_infinite_start_is_reported() {
        let bfgs = Bfgs {
            max_iterations: 10,
            gradient_tolerance: 1e-8,
        };
        let outcome = bfgs.minimize(
            |_: &DVector<f64>| f64::INFINITY,
            |v: &DVector<f64>| v.clone(),
            DVector::from_vec(vec![1.0]),
        );
        assert!(!outcome.status.converged);
        assert_eq!(outcome.status.iterations, 0);
    }
}
