use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::forms::{Bounds, TrialForm, Variables};
use crate::symbolic::Expr;

use super::integrate_over;

/// ∫ form · conj(form) · volume over all variables, in declared order.
pub fn normalization_integral(
    form: &Expr,
    variables: &Variables,
    bounds: &Bounds,
    volume_element: &Expr,
) -> Result<Expr> {
    let density = form * form.conjugate() * volume_element;
    integrate_over(&density, variables, bounds)
}

/// Scale `form` so that its density integrates to one.
///
/// Fails with [`Error::UnnormalizableForm`] when the density integral is
/// exactly zero, infinite or undefined. Integrals that stay partly
/// unevaluated are accepted and resolved numerically later.
pub fn normalize(
    form: &Expr,
    variables: &Variables,
    bounds: &Bounds,
    volume_element: &Expr,
) -> Result<Expr> {
    let integral = normalization_integral(form, variables, bounds, volume_element)?;
    debug!(%integral, "density integral");
    if integral.is_zero() || integral.is_infinite() {
        return Err(Error::UnnormalizableForm {
            form: form.to_string(),
            integral: integral.to_string(),
        });
    }
    if integral.has_unevaluated_integral() {
        warn!(%integral, "normalization integral kept partly unevaluated");
    }
    Ok(integral.recip().sqrt() * form)
}

impl TrialForm {
    /// The same trial form with its wavefunction normalized.
    pub fn normalized(&self) -> Result<TrialForm> {
        let form = normalize(&self.form, &self.variables, &self.bounds, &self.volume_element)?;
        Ok(TrialForm {
            form,
            ..self.clone()
        })
    }
}
