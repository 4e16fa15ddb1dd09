//! The variational pipeline: normalize, parameterize, minimize.
//!
//! A trial form is normalized by integrating its density, the Hamiltonian is
//! turned into an energy function of the form's parameters by integrating
//! `ψ · H ψ*`, and that function is minimized either exactly (one scalar
//! parameter) or with BFGS (a sequence of parameters).

mod bfgs;
mod hamiltonian;
mod minimize;
mod normalize;
mod plot;
mod traits;

pub use bfgs::ConvergenceStatus;
pub use hamiltonian::{
    laplacian, parameterize_hamiltonian, Coulomb, Harmonic, HarmonicOscillator, HydrogenLike,
    Kinetic,
};
pub use minimize::{minimize_hamiltonian, MinimizationResult, Minimizer};
pub use normalize::{normalization_integral, normalize};
pub use plot::EnergyCurve;
pub use traits::{Hamiltonian, Plotter};

use tracing::trace;

use crate::error::{Error, Result};
use crate::forms::{Bounds, Variables};
use crate::symbolic::Expr;

/// Integrate over every variable in declared order after checking that
/// variables and bounds line up.
fn integrate_over(integrand: &Expr, variables: &Variables, bounds: &Bounds) -> Result<Expr> {
    let limits = match (variables, bounds) {
        (Variables::Single(_), Bounds::Single(_)) => bounds.limits(),
        (Variables::Sequence(symbols), Bounds::Sequence(limits)) => {
            if symbols.is_empty() {
                return Err(Error::EmptyVariables);
            }
            if symbols.len() != limits.len() {
                return Err(Error::MismatchedBounds {
                    variables: symbols.len(),
                    bounds: limits.len(),
                });
            }
            limits.as_slice()
        }
        _ => {
            return Err(Error::MismatchedBounds {
                variables: variables.len(),
                bounds: bounds.limits().len(),
            })
        }
    };

    let mut result = integrand.clone();
    for (symbol, limits) in variables.symbols().iter().zip(limits) {
        result = result.integrate(symbol, &limits.lower, &limits.upper);
        trace!(var = symbol.name(), %result, "integrated");
    }
    Ok(result)
}
