//! Minimization of a parameterized Hamiltonian.
//!
//! A single scalar parameter is handled exactly: the derivative is solved
//! symbolically and the energy substituted back. Any sequence of parameters
//! goes through BFGS on the numerically evaluated energy with an analytic
//! gradient.

use nalgebra::DVector;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::forms::Parameters;
use crate::symbolic::{env_of, sign_of, Env, Expr, Symbol};

use super::bfgs::{Bfgs, ConvergenceStatus};
use super::plot::EnergyCurve;
use super::traits::Plotter;

/// Optimum found by [`Minimizer`].
#[derive(Clone, Debug)]
pub enum MinimizationResult {
    /// Exact critical point of a single-parameter energy.
    Symbolic {
        parameter: Symbol,
        value: Expr,
        energy: Expr,
    },
    /// BFGS result over several parameters.
    Numerical {
        parameters: Vec<Symbol>,
        values: DVector<f64>,
        energy: f64,
        status: ConvergenceStatus,
    },
}

impl MinimizationResult {
    /// Energy at the optimum.
    pub fn energy(&self) -> Result<f64> {
        match self {
            MinimizationResult::Symbolic { energy, .. } => energy.eval_real(&Env::new()),
            MinimizationResult::Numerical { energy, .. } => Ok(*energy),
        }
    }

    /// Optimal parameter values in parameter order.
    pub fn values(&self) -> Result<Vec<f64>> {
        match self {
            MinimizationResult::Symbolic { value, .. } => Ok(vec![value.eval_real(&Env::new())?]),
            MinimizationResult::Numerical { values, .. } => Ok(values.iter().copied().collect()),
        }
    }

    pub fn parameters(&self) -> Vec<Symbol> {
        match self {
            MinimizationResult::Symbolic { parameter, .. } => vec![parameter.clone()],
            MinimizationResult::Numerical { parameters, .. } => parameters.clone(),
        }
    }

    /// Exact results always count as converged.
    pub fn is_converged(&self) -> bool {
        match self {
            MinimizationResult::Symbolic { .. } => true,
            MinimizationResult::Numerical { status, .. } => status.converged,
        }
    }
}

/// Minimizer settings.
#[derive(Clone, Debug)]
pub struct Minimizer {
    /// Starting point of the numeric path; all ones when unset
    pub initial_guess: Option<Vec<f64>>,
    /// BFGS iteration cap; 200 per parameter when unset
    pub max_iterations: Option<usize>,
    /// Gradient norm at which BFGS stops
    pub gradient_tolerance: f64,
    /// Keep positive-domain parameters strictly positive on the numeric path
    pub confine_positive: bool,
}

impl Default for Minimizer {
    fn default() -> Self {
        Self {
            initial_guess: None,
            max_iterations: None,
            gradient_tolerance: 1e-6,
            confine_positive: true,
        }
    }
}

impl Minimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_guess(mut self, guess: Vec<f64>) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    pub fn with_gradient_tolerance(mut self, tolerance: f64) -> Self {
        self.gradient_tolerance = tolerance;
        self
    }

    pub fn with_positive_confinement(mut self, confine: bool) -> Self {
        self.confine_positive = confine;
        self
    }

    /// Minimize `hamiltonian` over `parameters`.
    pub fn minimize(&self, hamiltonian: &Expr, parameters: &Parameters) -> Result<MinimizationResult> {
        self.minimize_with_plot(hamiltonian, parameters, None)
    }

    /// As [`Minimizer::minimize`], handing the energy curve of a scalar run
    /// to `plotter`. Plot failures are logged and do not change the result.
    pub fn minimize_with_plot(
        &self,
        hamiltonian: &Expr,
        parameters: &Parameters,
        plotter: Option<&mut dyn Plotter>,
    ) -> Result<MinimizationResult> {
        match parameters {
            Parameters::Scalar(parameter) => {
                let result = self.symbolic(hamiltonian, parameter)?;
                if let (Some(plotter), MinimizationResult::Symbolic { value, .. }) = (plotter, &result) {
                    plot_curve(plotter, hamiltonian, parameter, value);
                }
                Ok(result)
            }
            Parameters::Sequence(parameters) => {
                if plotter.is_some() {
                    debug!("energy curves are only sampled for a scalar parameter");
                }
                self.numerical(hamiltonian, parameters)
            }
        }
    }

    fn symbolic(&self, hamiltonian: &Expr, parameter: &Symbol) -> Result<MinimizationResult> {
        let no_minimum = || Error::NoMinimum {
            hamiltonian: hamiltonian.to_string(),
        };
        let derivative = hamiltonian.diff(parameter);
        debug!(%derivative, "energy derivative");
        // flat energy: no isolated critical point to pick
        if derivative.is_zero() {
            return Err(no_minimum());
        }
        let candidates = derivative.solve(parameter)?;
        debug!(count = candidates.len(), "critical points");
        let value = match candidates.len() {
            0 => return Err(no_minimum()),
            1 => candidates[0].clone(),
            _ => candidates
                .iter()
                .find(|c| sign_of(c) == Some(std::cmp::Ordering::Greater))
                .cloned()
                .ok_or_else(no_minimum)?,
        };
        let energy = hamiltonian.subs(parameter, &value);
        info!(parameter = parameter.name(), %value, %energy, "symbolic minimum");
        Ok(MinimizationResult::Symbolic {
            parameter: parameter.clone(),
            value,
            energy,
        })
    }

    /// BFGS over `parameters`.
    ///
    /// With `confine_positive` set, the energy counts as `+∞` wherever a
    /// positive-domain parameter is `<= 0`. A minimum outside that region
    /// then comes back as a non-converged status at the edge of the region.
    fn numerical(&self, hamiltonian: &Expr, parameters: &[Symbol]) -> Result<MinimizationResult> {
        if parameters.is_empty() {
            return Err(Error::EmptyParameters);
        }
        let n = parameters.len();
        let guess = match &self.initial_guess {
            Some(guess) if guess.len() != n => {
                return Err(Error::MismatchedGuess {
                    expected: n,
                    got: guess.len(),
                })
            }
            Some(guess) => guess.clone(),
            None => vec![1.0; n],
        };
        if let Some(unbound) = hamiltonian
            .free_symbols()
            .into_iter()
            .find(|s| !parameters.contains(s))
        {
            return Err(Error::UnboundSymbol(unbound.name().to_string()));
        }

        let partials: Vec<Expr> = parameters.iter().map(|p| hamiltonian.diff(p)).collect();
        let admissible = |x: &DVector<f64>| {
            !self.confine_positive
                || parameters
                    .iter()
                    .zip(x.iter())
                    .all(|(p, v)| !p.is_positive() || *v > 0.0)
        };
        let objective = |x: &DVector<f64>| {
            if !admissible(x) {
                return f64::INFINITY;
            }
            let env = env_of(parameters, x.as_slice());
            hamiltonian.eval_real(&env).unwrap_or(f64::INFINITY)
        };
        let gradient = |x: &DVector<f64>| {
            let env = env_of(parameters, x.as_slice());
            DVector::from_iterator(
                n,
                partials
                    .iter()
                    .map(|d| d.eval_real(&env).unwrap_or(f64::NAN)),
            )
        };

        let bfgs = Bfgs {
            max_iterations: self.max_iterations.unwrap_or(200 * n),
            gradient_tolerance: self.gradient_tolerance,
        };
        let outcome = bfgs.minimize(objective, gradient, DVector::from_vec(guess));
        if outcome.status.converged {
            info!(
                energy = outcome.value,
                iterations = outcome.status.iterations,
                "numeric minimum"
            );
        } else {
            warn!(
                message = %outcome.status.message,
                iterations = outcome.status.iterations,
                gradient_norm = outcome.status.gradient_norm,
                "minimization did not converge"
            );
        }
        Ok(MinimizationResult::Numerical {
            parameters: parameters.to_vec(),
            values: outcome.x,
            energy: outcome.value,
            status: outcome.status,
        })
    }
}

fn plot_curve(plotter: &mut dyn Plotter, hamiltonian: &Expr, parameter: &Symbol, value: &Expr) {
    let curve = value
        .eval_real(&Env::new())
        .and_then(|optimum| EnergyCurve::sample(hamiltonian, parameter, optimum));
    match curve.and_then(|curve| plotter.plot(&curve)) {
        Ok(()) => debug!("energy curve plotted"),
        Err(err) => warn!(error = %err, "plotting failed"),
    }
}

/// Minimize with default settings and an optional plotter and starting point.
pub fn minimize_hamiltonian(
    hamiltonian: &Expr,
    parameters: &Parameters,
    plotter: Option<&mut dyn Plotter>,
    initial_guess: Option<&[f64]>,
) -> Result<MinimizationResult> {
    let mut minimizer = Minimizer::new();
    if let Some(guess) = initial_guess {
        minimizer = minimizer.with_initial_guess(guess.to_vec());
    }
    minimizer.minimize_with_plot(hamiltonian, parameters, plotter)
}
