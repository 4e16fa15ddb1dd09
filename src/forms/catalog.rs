//! Catalog of ready-made trial forms.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::types::{Bounds, Coordinates, Limits, Parameters, TrialForm, Variables};
use crate::symbolic::{Expr, Symbol};

/// Names of the catalog entries, as used on the command line and in run files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    RadialExponential,
    SphericalExponential,
    RadialGaussian,
    SphericalGaussian,
    CubedExponential,
    SphericalGaussExponential,
    CartesianGaussian,
    CartesianLorentzian,
    PzExponential,
    PMinusExponential,
}

impl FormKind {
    pub const ALL: [FormKind; 10] = [
        FormKind::RadialExponential,
        FormKind::SphericalExponential,
        FormKind::RadialGaussian,
        FormKind::SphericalGaussian,
        FormKind::CubedExponential,
        FormKind::SphericalGaussExponential,
        FormKind::CartesianGaussian,
        FormKind::CartesianLorentzian,
        FormKind::PzExponential,
        FormKind::PMinusExponential,
    ];

    /// Build the catalog entry.
    pub fn build(self) -> TrialForm {
        match self {
            FormKind::RadialExponential => radial_exponential(),
            FormKind::SphericalExponential => spherical_exponential(),
            FormKind::RadialGaussian => radial_gaussian(),
            FormKind::SphericalGaussian => spherical_gaussian(),
            FormKind::CubedExponential => cubed_exponential(),
            FormKind::SphericalGaussExponential => spherical_gauss_exponential(),
            FormKind::CartesianGaussian => cartesian_gaussian(),
            FormKind::CartesianLorentzian => cartesian_lorentzian(),
            FormKind::PzExponential => pz_exponential(),
            FormKind::PMinusExponential => p_minus_exponential(),
        }
    }
}

struct Frame {
    variables: Variables,
    bounds: Bounds,
    volume_element: Expr,
    coordinates: Coordinates,
}

impl Frame {
    fn with(self, form: Expr, parameters: Parameters) -> TrialForm {
        TrialForm {
            form,
            variables: self.variables,
            bounds: self.bounds,
            volume_element: self.volume_element,
            parameters,
            coordinates: self.coordinates,
        }
    }
}

fn radial_frame(r: &Symbol) -> Frame {
    Frame {
        variables: Variables::Single(r.clone()),
        bounds: Bounds::Single(Limits::half_line()),
        volume_element: r.expr().pow(2),
        coordinates: Coordinates::Radial,
    }
}

/// `(r, θ, φ)` with `r² sin θ`.
fn spherical_frame() -> (Frame, [Symbol; 3]) {
    let symbols = [
        Symbol::positive("r"),
        Symbol::positive("theta"),
        Symbol::positive("phi"),
    ];
    let [r, theta, _] = &symbols;
    let frame = Frame {
        variables: Variables::Sequence(symbols.to_vec()),
        bounds: Bounds::Sequence(vec![
            Limits::half_line(),
            Limits::new(Expr::zero(), Expr::pi()),
            Limits::new(Expr::zero(), 2 * Expr::pi()),
        ]),
        volume_element: r.expr().pow(2) * theta.expr().sin(),
        coordinates: Coordinates::Spherical,
    };
    (frame, symbols)
}

fn cartesian_frame() -> (Frame, [Symbol; 3]) {
    let symbols = [Symbol::real("x"), Symbol::real("y"), Symbol::real("z")];
    let frame = Frame {
        variables: Variables::Sequence(symbols.to_vec()),
        bounds: Bounds::Sequence(vec![Limits::real_line(); 3]),
        volume_element: Expr::one(),
        coordinates: Coordinates::Cartesian,
    };
    (frame, symbols)
}

fn b() -> Symbol {
    Symbol::positive("b")
}

/// `e^{-b r^k}`
fn radial_decay(r: &Symbol, b: &Symbol, k: i64) -> Expr {
    (-(b.expr() * r.expr().pow(k))).exp()
}

/// `e^{-br}` on the radial half line.
pub fn radial_exponential() -> TrialForm {
    let (r, b) = (Symbol::positive("r"), b());
    radial_frame(&r).with(radial_decay(&r, &b, 1), Parameters::Scalar(b))
}

/// `e^{-br}` in spherical coordinates.
pub fn spherical_exponential() -> TrialForm {
    let (frame, [r, ..]) = spherical_frame();
    let b = b();
    frame.with(radial_decay(&r, &b, 1), Parameters::Scalar(b))
}

pub fn radial_gaussian() -> TrialForm {
    let (r, b) = (Symbol::positive("r"), b());
    radial_frame(&r).with(radial_decay(&r, &b, 2), Parameters::Scalar(b))
}

pub fn spherical_gaussian() -> TrialForm {
    let (frame, [r, ..]) = spherical_frame();
    let b = b();
    frame.with(radial_decay(&r, &b, 2), Parameters::Scalar(b))
}

/// `e^{-br³}` in spherical coordinates.
pub fn cubed_exponential() -> TrialForm {
    let (frame, [r, ..]) = spherical_frame();
    let b = b();
    frame.with(radial_decay(&r, &b, 3), Parameters::Scalar(b))
}

/// `β e^{-br²} + α e^{-ar}` with parameters `[a, b, α, β]`.
pub fn spherical_gauss_exponential() -> TrialForm {
    let (frame, [r, ..]) = spherical_frame();
    let a = Symbol::positive("a");
    let b = b();
    let alpha = Symbol::positive("alpha");
    let beta = Symbol::positive("beta");
    let form = beta.expr() * radial_decay(&r, &b, 2) + alpha.expr() * radial_decay(&r, &a, 1);
    frame.with(form, Parameters::Sequence(vec![a, b, alpha, beta]))
}

/// `e^{-b(x²+y²+z²)}`
pub fn cartesian_gaussian() -> TrialForm {
    let (frame, [x, y, z]) = cartesian_frame();
    let b = b();
    let radius_squared = x.expr().pow(2) + y.expr().pow(2) + z.expr().pow(2);
    let form = (-(b.expr() * radius_squared)).exp();
    frame.with(form, Parameters::Scalar(b))
}

/// `Π_q b² / (q² + b²/4)` over `q ∈ {x, y, z}`.
pub fn cartesian_lorentzian() -> TrialForm {
    let (frame, symbols) = cartesian_frame();
    let b = b();
    let width = Expr::rational(1, 4) * b.expr().pow(2);
    let form = Expr::product(
        symbols
            .iter()
            .map(|q| b.expr().pow(2) / (q.expr().pow(2) + &width)),
    );
    frame.with(form, Parameters::Scalar(b))
}

/// `r e^{-br} cos θ`, the 2p₀ shape.
pub fn pz_exponential() -> TrialForm {
    let (frame, [r, theta, _]) = spherical_frame();
    let b = b();
    let form = r.expr() * radial_decay(&r, &b, 1) * theta.expr().cos();
    frame.with(form, Parameters::Scalar(b))
}

/// `r e^{-br} sin θ e^{-iφ}`, the 2p₋₁ shape.
pub fn p_minus_exponential() -> TrialForm {
    let (frame, [r, theta, phi]) = spherical_frame();
    let b = b();
    let phase = (-(Expr::i() * phi.expr())).exp();
    let form = r.expr() * radial_decay(&r, &b, 1) * theta.expr().sin() * phase;
    frame.with(form, Parameters::Scalar(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_agree() {
        for kind in FormKind::ALL {
            let trial = kind.build();
            assert_eq!(
                trial.variables.len(),
                trial.bounds.limits().len(),
                "{kind:?} has mismatched bounds"
            );
            for symbol in trial.parameters.symbols() {
                assert!(symbol.is_positive(), "{kind:?} parameter {symbol} not positive");
                assert!(trial.form.depends_on(symbol));
            }
        }
    }

    #[test]
    fn test_cartesian_coordinates_are_real() {
        let trial = cartesian_gaussian();
        assert!(trial.variables.symbols().iter().all(|s| !s.is_positive()));
        assert_eq!(trial.volume_element, Expr::one());
        assert_eq!(trial.coordinates, Coordinates::Cartesian);
    }

    #[test]
    fn test_gauss_exponential_parameter_order() {
        let trial = spherical_gauss_exponential();
        let names: Vec<&str> = trial.parameters.symbols().iter().map(Symbol::name).collect();
        assert_eq!(names, ["a", "b", "alpha", "beta"]);
    }
}
