use std::f64::consts::PI;

use approx::assert_relative_eq;
use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::error::Error;
use crate::forms::{self, Bounds, Coordinates, FormKind, Limits, TrialForm, Variables};
use crate::symbolic::{env_of, Expr, Symbol};
use crate::variation::{
    normalization_integral, EnergyCurve, Hamiltonian, HarmonicOscillator, HydrogenLike,
    MinimizationResult, Minimizer,
};

fn density_integral(trial: &TrialForm) -> Expr {
    normalization_integral(
        &trial.form,
        &trial.variables,
        &trial.bounds,
        &trial.volume_element,
    )
    .unwrap()
}

fn hydrogen_minimum(trial: TrialForm) -> MinimizationResult {
    let trial = trial.normalized().unwrap();
    let energy = trial
        .expectation(&HydrogenLike::new(1, trial.coordinates))
        .unwrap();
    Minimizer::new().minimize(&energy, &trial.parameters).unwrap()
}

#[test]
fn test_renormalizing_gives_unit_density() {
    let mut rng = rand::thread_rng();
    for kind in FormKind::ALL {
        if kind == FormKind::SphericalGaussExponential {
            continue;
        }
        let trial = kind.build().normalized().unwrap();
        let integral = density_integral(&trial);
        let values: Vec<f64> = trial
            .parameters
            .symbols()
            .iter()
            .map(|_| rng.gen_range(0.5..2.0))
            .collect();
        let env = env_of(trial.parameters.symbols(), &values);
        assert_relative_eq!(integral.eval_real(&env).unwrap(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_closed_form_catalog_entries_normalize_exactly() {
    for kind in [
        FormKind::RadialExponential,
        FormKind::SphericalExponential,
        FormKind::SphericalGaussian,
        FormKind::CartesianGaussian,
        FormKind::PzExponential,
        FormKind::PMinusExponential,
    ] {
        let trial = kind.build().normalized().unwrap();
        assert_eq!(density_integral(&trial), Expr::one(), "{kind:?}");
    }
}

#[test]
fn test_gauss_exponential_density_is_unit_numerically() {
    let trial = forms::spherical_gauss_exponential().normalized().unwrap();
    let integral = density_integral(&trial);
    let env = env_of(trial.parameters.symbols(), &[0.9, 0.4, 1.0, 0.7]);
    assert_relative_eq!(integral.eval_real(&env).unwrap(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_permuted_variables_and_bounds() {
    let trial = forms::spherical_exponential();
    let reference = density_integral(&trial);
    let [r, theta, phi] = [0, 1, 2].map(|i| trial.variables.symbols()[i].clone());
    let [lr, ltheta, lphi] = [0, 1, 2].map(|i| trial.bounds.limits()[i].clone());

    // same permutation on both sides
    let consistent = normalization_integral(
        &trial.form,
        &Variables::Sequence(vec![theta.clone(), phi.clone(), r.clone()]),
        &Bounds::Sequence(vec![ltheta.clone(), lphi.clone(), lr.clone()]),
        &trial.volume_element,
    )
    .unwrap();
    assert_eq!(consistent, reference);

    // variables permuted, bounds left alone
    let swapped = normalization_integral(
        &trial.form,
        &Variables::Sequence(vec![theta, r.clone(), phi.clone()]),
        &Bounds::Sequence(vec![lr.clone(), ltheta.clone(), lphi.clone()]),
        &trial.volume_element,
    )
    .unwrap();
    assert!(swapped.has_unevaluated_integral() || swapped != reference);

    let short = normalization_integral(
        &trial.form,
        &Variables::Sequence(vec![r, phi]),
        &Bounds::Sequence(vec![lr, ltheta, lphi]),
        &trial.volume_element,
    );
    assert!(matches!(
        short,
        Err(Error::MismatchedBounds { variables: 2, bounds: 3 })
    ));
}

#[test]
fn test_single_and_sequence_shapes_must_agree() {
    let x = Symbol::real("x");
    let result = normalization_integral(
        &x.expr(),
        &Variables::Single(x.clone()),
        &Bounds::Sequence(vec![Limits::real_line(), Limits::real_line()]),
        &Expr::one(),
    );
    assert!(matches!(result, Err(Error::MismatchedBounds { .. })));
    let empty = normalization_integral(
        &x.expr(),
        &Variables::Sequence(vec![]),
        &Bounds::Sequence(vec![]),
        &Expr::one(),
    );
    assert!(matches!(empty, Err(Error::EmptyVariables)));
}

#[test]
fn test_hydrogen_exponential_is_exact() {
    let MinimizationResult::Symbolic { value, energy, .. } =
        hydrogen_minimum(forms::spherical_exponential())
    else {
        panic!("expected the exact path");
    };
    assert_eq!(value, Expr::one());
    assert_eq!(energy, Expr::rational(-1, 2));
}

#[test]
fn test_hydrogen_gaussian() {
    let result = hydrogen_minimum(forms::spherical_gaussian());
    assert_relative_eq!(result.values().unwrap()[0], 8.0 / (9.0 * PI), epsilon = 1e-12);
    assert_relative_eq!(result.energy().unwrap(), -4.0 / (3.0 * PI), epsilon = 1e-12);
    // the Gaussian misses the cusp, so it stays above the exact energy
    assert!(result.energy().unwrap() > -0.5);
}

#[test]
fn test_radial_and_spherical_agree() {
    let radial = hydrogen_minimum(forms::radial_gaussian());
    let spherical = hydrogen_minimum(forms::spherical_gaussian());
    assert_relative_eq!(
        radial.energy().unwrap(),
        spherical.energy().unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_p_states_reach_second_shell() {
    for trial in [forms::pz_exponential(), forms::p_minus_exponential()] {
        let result = hydrogen_minimum(trial);
        assert_relative_eq!(result.values().unwrap()[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(result.energy().unwrap(), -0.125, epsilon = 1e-12);
    }
}

#[test]
fn test_cubed_exponential_is_a_minimum() {
    let trial = forms::cubed_exponential().normalized().unwrap();
    let energy = trial
        .expectation(&HydrogenLike::new(1, trial.coordinates))
        .unwrap();
    let result = Minimizer::new().minimize(&energy, &trial.parameters).unwrap();
    let b = &trial.parameters.symbols()[0];
    let optimum = result.values().unwrap()[0];
    let curve = EnergyCurve::sample(&energy, b, optimum).unwrap();
    assert!(curve.sampled_minimum() >= curve.optimal_energy - 1e-12);
    assert!(result.energy().unwrap() > -0.5);
}

#[test]
fn test_harmonic_oscillator() {
    let trial = forms::cartesian_gaussian().normalized().unwrap();
    let energy = trial
        .expectation(&HarmonicOscillator::new(1, trial.coordinates))
        .unwrap();
    let result = Minimizer::new().minimize(&energy, &trial.parameters).unwrap();
    assert_relative_eq!(result.values().unwrap()[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(result.energy().unwrap(), 1.5, epsilon = 1e-12);

    let lorentz = forms::cartesian_lorentzian().normalized().unwrap();
    let energy = lorentz
        .expectation(&HarmonicOscillator::new(1, lorentz.coordinates))
        .unwrap();
    let result = Minimizer::new().minimize(&energy, &lorentz.parameters).unwrap();
    assert!(result.energy().unwrap() > 1.5);
}

#[test]
fn test_hamiltonian_on_exact_ground_state() {
    // H e^{-r} = -½ e^{-r} at any radius
    let r = Symbol::positive("r");
    let psi = (-r.expr()).exp();
    let variables = Variables::Single(r.clone());
    let h_psi = HydrogenLike::new(1, Coordinates::Radial).apply(&psi, &variables);
    let dist = Exp::new(1.0).unwrap();
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let x = dist.sample(&mut rng) + 1e-3;
        let env = env_of(&[r.clone()], &[x]);
        assert_relative_eq!(
            h_psi.eval_real(&env).unwrap(),
            -0.5 * psi.eval_real(&env).unwrap(),
            epsilon = 1e-9
        );
    }
}

fn gauss_exponential_energy() -> (TrialForm, Expr) {
    let trial = forms::spherical_gauss_exponential().normalized().unwrap();
    let energy = trial
        .expectation(&HydrogenLike::new(1, trial.coordinates))
        .unwrap();
    (trial, energy)
}

#[test]
fn test_gauss_exponential_gradient_is_finite() {
    let (trial, energy) = gauss_exponential_energy();
    let env = env_of(trial.parameters.symbols(), &[1.0; 4]);
    for parameter in trial.parameters.symbols() {
        let slope = energy.diff(parameter).eval_real(&env).unwrap();
        assert!(slope.is_finite(), "d/d{parameter} = {slope}");
    }
}

#[test]
fn test_gauss_exponential_default_run_moves() {
    let (trial, energy) = gauss_exponential_energy();
    let start = energy
        .eval_real(&env_of(trial.parameters.symbols(), &[1.0; 4]))
        .unwrap();
    let result = Minimizer::new()
        .with_max_iterations(5)
        .minimize(&energy, &trial.parameters)
        .unwrap();
    let MinimizationResult::Numerical { energy, status, .. } = &result else {
        panic!("expected the numeric path");
    };
    assert!(status.iterations > 0, "{}", status.message);
    assert!(*energy < start);
}

#[test]
fn test_gauss_exponential_numeric_path() {
    let (trial, energy) = gauss_exponential_energy();
    let guess = vec![0.8, 0.3, 1.0, 0.5];
    let start = energy
        .eval_real(&env_of(trial.parameters.symbols(), &guess))
        .unwrap();
    let result = Minimizer::new()
        .with_initial_guess(guess)
        .with_max_iterations(60)
        .minimize(&energy, &trial.parameters)
        .unwrap();
    let MinimizationResult::Numerical { values, energy, status, .. } = &result else {
        panic!("expected the numeric path");
    };
    assert_eq!(values.len(), 4);
    assert!(status.iterations > 0, "{}", status.message);
    assert!(*energy < start);
    assert!(
        status.converged || *energy < -0.49,
        "E = {energy} after {} iterations: {}",
        status.iterations,
        status.message
    );
    // variational bound
    assert!(*energy >= -0.5 - 1e-4);
}
