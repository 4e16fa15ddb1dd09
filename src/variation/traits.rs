//! Capabilities supplied by callers of the variational pipeline.
//!
//! `Hamiltonian` is the operator applied to the conjugated trial form, and
//! `Plotter` receives the sampled energy curve of a single-parameter run.

use crate::error::Result;
use crate::forms::Variables;
use crate::symbolic::Expr;

use super::plot::EnergyCurve;

/// Hamiltonian operator acting on a symbolic wavefunction.
pub trait Hamiltonian {
    /// Apply the operator to `conj_form`, a function of `variables`.
    fn apply(&self, conj_form: &Expr, variables: &Variables) -> Expr;
}

impl<F> Hamiltonian for F
where
    F: Fn(&Expr, &Variables) -> Expr,
{
    fn apply(&self, conj_form: &Expr, variables: &Variables) -> Expr {
        self(conj_form, variables)
    }
}

/// Consumer of the energy curve sampled around a symbolic optimum.
pub trait Plotter {
    fn plot(&mut self, curve: &EnergyCurve) -> Result<()>;
}
