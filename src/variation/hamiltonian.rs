//! Expectation values and the built-in Hamiltonians.
//!
//! All built-ins are in Hartree atomic units (ħ = mₑ = e = 4πε₀ = 1).

use tracing::{debug, warn};

use crate::error::Result;
use crate::forms::{Bounds, Coordinates, TrialForm, Variables};
use crate::symbolic::{Expr, Symbol};

use super::integrate_over;
use super::traits::Hamiltonian;

/// ⟨H⟩ = ∫ form · H(conj(form)) · volume, as a function of the free
/// parameters of `form`.
///
/// The form is not checked for normalizability here.
pub fn parameterize_hamiltonian<H: Hamiltonian + ?Sized>(
    hamiltonian: &H,
    form: &Expr,
    variables: &Variables,
    bounds: &Bounds,
    volume_element: &Expr,
) -> Result<Expr> {
    let applied = hamiltonian.apply(&form.conjugate(), variables);
    let integrand = form * applied * volume_element;
    let energy = integrate_over(&integrand, variables, bounds)?;
    debug!(%energy, "parameterized hamiltonian");
    if energy.has_unevaluated_integral() {
        warn!("expectation value kept partly unevaluated");
    }
    Ok(energy)
}

impl TrialForm {
    /// ⟨H⟩ for this trial form.
    pub fn expectation<H: Hamiltonian + ?Sized>(&self, hamiltonian: &H) -> Result<Expr> {
        parameterize_hamiltonian(
            hamiltonian,
            &self.form,
            &self.variables,
            &self.bounds,
            &self.volume_element,
        )
    }
}

/// `r` for radial and spherical coordinates, `√(x² + y² + z²)` otherwise.
fn radius(coordinates: Coordinates, variables: &Variables) -> Expr {
    let symbols = variables.symbols();
    match coordinates {
        Coordinates::Radial | Coordinates::Spherical => {
            symbols.first().map(Symbol::expr).unwrap_or_else(Expr::zero)
        }
        Coordinates::Cartesian => radius_squared(coordinates, variables).sqrt(),
    }
}

fn radius_squared(coordinates: Coordinates, variables: &Variables) -> Expr {
    match coordinates {
        Coordinates::Cartesian => Expr::sum(variables.symbols().iter().map(|q| q.expr().pow(2))),
        _ => radius(coordinates, variables).pow(2),
    }
}

/// ∇²ψ in the given coordinate system.
///
/// Variables are read by position: `(r, θ, φ)` for spherical coordinates,
/// `r` alone for radial ones. Any Cartesian order works.
pub fn laplacian(psi: &Expr, coordinates: Coordinates, variables: &Variables) -> Expr {
    let symbols = variables.symbols();
    match coordinates {
        Coordinates::Cartesian => Expr::sum(symbols.iter().map(|q| psi.diff(q).diff(q))),
        Coordinates::Radial | Coordinates::Spherical => {
            let Some(r) = symbols.first() else {
                return Expr::zero();
            };
            let r2 = r.expr().pow(2);
            // (1/r²) ∂r (r² ∂r ψ)
            let mut parts = vec![(&r2 * psi.diff(r)).diff(r) / &r2];
            if coordinates == Coordinates::Spherical {
                if let Some(theta) = symbols.get(1) {
                    let sin = theta.expr().sin();
                    // (1/(r² sinθ)) ∂θ (sinθ ∂θ ψ)
                    parts.push((&sin * psi.diff(theta)).diff(theta) / (&r2 * &sin));
                    if let Some(phi) = symbols.get(2) {
                        // (1/(r² sin²θ)) ∂φ² ψ
                        parts.push(psi.diff(phi).diff(phi) / (&r2 * sin.pow(2)));
                    }
                }
            }
            Expr::sum(parts)
        }
    }
}

/// Kinetic energy `-½∇²`.
///
/// Expects the variables in [`laplacian`] order; permuting spherical
/// variables gives a wrong operator, not an error.
#[derive(Clone, Copy, Debug)]
pub struct Kinetic {
    pub coordinates: Coordinates,
}

impl Hamiltonian for Kinetic {
    fn apply(&self, conj_form: &Expr, variables: &Variables) -> Expr {
        Expr::rational(-1, 2) * laplacian(conj_form, self.coordinates, variables)
    }
}

/// Attraction `-Z/r` to a point charge at the origin.
///
/// For radial and spherical coordinates `r` is the first variable.
#[derive(Clone, Copy, Debug)]
pub struct Coulomb {
    pub charge: i64,
    pub coordinates: Coordinates,
}

impl Hamiltonian for Coulomb {
    fn apply(&self, conj_form: &Expr, variables: &Variables) -> Expr {
        let r = radius(self.coordinates, variables);
        Expr::integer(-self.charge) * conj_form / r
    }
}

/// Isotropic harmonic potential `½ω²r²`.
#[derive(Clone, Copy, Debug)]
pub struct Harmonic {
    pub omega: i64,
    pub coordinates: Coordinates,
}

impl Hamiltonian for Harmonic {
    fn apply(&self, conj_form: &Expr, variables: &Variables) -> Expr {
        let strength = Expr::rational(self.omega * self.omega, 2);
        strength * radius_squared(self.coordinates, variables) * conj_form
    }
}

/// One electron around a nucleus of charge `Z`.
#[derive(Clone, Copy, Debug)]
pub struct HydrogenLike {
    pub charge: i64,
    pub coordinates: Coordinates,
}

impl HydrogenLike {
    pub fn new(charge: i64, coordinates: Coordinates) -> Self {
        Self {
            charge,
            coordinates,
        }
    }
}

impl Hamiltonian for HydrogenLike {
    fn apply(&self, conj_form: &Expr, variables: &Variables) -> Expr {
        let kinetic = Kinetic {
            coordinates: self.coordinates,
        };
        let potential = Coulomb {
            charge: self.charge,
            coordinates: self.coordinates,
        };
        kinetic.apply(conj_form, variables) + potential.apply(conj_form, variables)
    }
}

/// Particle of unit mass in an isotropic harmonic well of frequency `ω`.
#[derive(Clone, Copy, Debug)]
pub struct HarmonicOscillator {
    pub omega: i64,
    pub coordinates: Coordinates,
}

impl HarmonicOscillator {
    pub fn new(omega: i64, coordinates: Coordinates) -> Self {
        Self { omega, coordinates }
    }
}

impl Hamiltonian for HarmonicOscillator {
    fn apply(&self, conj_form: &Expr, variables: &Variables) -> Expr {
        let kinetic = Kinetic {
            coordinates: self.coordinates,
        };
        let potential = Harmonic {
            omega: self.omega,
            coordinates: self.coordinates,
        };
        kinetic.apply(conj_form, variables) + potential.apply(conj_form, variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms;

    #[test]
    fn test_radial_laplacian_of_exponential() {
        let r = Symbol::positive("r");
        let b = Symbol::positive("b");
        let psi = (-(b.expr() * r.expr())).exp();
        let vars = Variables::Single(r.clone());
        let expected = (b.expr().pow(2) - 2 * b.expr() / r.expr()) * psi.clone();
        assert_eq!(
            laplacian(&psi, Coordinates::Radial, &vars).expand(),
            expected.expand()
        );
    }

    #[test]
    fn test_angular_laplacian_of_cos() {
        // ∇²(cos θ) = -2 cos θ / r²
        let trial = forms::pz_exponential();
        let theta = &trial.variables.symbols()[1];
        let r = &trial.variables.symbols()[0];
        let psi = theta.expr().cos();
        let result = laplacian(&psi, Coordinates::Spherical, &trial.variables);
        assert_eq!(result, -2 * theta.expr().cos() / r.expr().pow(2));
    }

    #[test]
    fn test_radius_is_read_by_position() {
        let trial = forms::spherical_exponential();
        let [r, theta, phi] = [0, 1, 2].map(|i| trial.variables.symbols()[i].clone());
        let coulomb = Coulomb {
            charge: 1,
            coordinates: Coordinates::Spherical,
        };
        let psi = Expr::one();
        assert_eq!(coulomb.apply(&psi, &trial.variables), -r.expr().recip());
        let permuted = Variables::Sequence(vec![theta.clone(), r, phi]);
        assert_eq!(coulomb.apply(&psi, &permuted), -theta.expr().recip());
    }

    #[test]
    fn test_hydrogen_energy_function() {
        let trial = forms::radial_exponential().normalized().unwrap();
        let energy = trial
            .expectation(&HydrogenLike::new(1, Coordinates::Radial))
            .unwrap();
        let b = Symbol::positive("b");
        assert_eq!(energy, Expr::rational(1, 2) * b.expr().pow(2) - b.expr());
    }

    #[test]
    fn test_closure_hamiltonian() {
        // identity operator gives the norm back
        let trial = forms::spherical_exponential().normalized().unwrap();
        let identity = |psi: &Expr, _: &Variables| psi.clone();
        assert_eq!(trial.expectation(&identity).unwrap(), Expr::one());
    }
}
