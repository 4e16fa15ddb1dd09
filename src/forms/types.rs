use serde::{Deserialize, Serialize};

use crate::symbolic::{Expr, Symbol};

/// Integration variables of a form.
#[derive(Clone, Debug, PartialEq)]
pub enum Variables {
    Single(Symbol),
    Sequence(Vec<Symbol>),
}

impl Variables {
    pub fn symbols(&self) -> &[Symbol] {
        match self {
            Variables::Single(symbol) => std::slice::from_ref(symbol),
            Variables::Sequence(symbols) => symbols,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols().is_empty()
    }
}

/// Lower and upper limit of one integration variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Limits {
    pub lower: Expr,
    pub upper: Expr,
}

impl Limits {
    pub fn new(lower: impl Into<Expr>, upper: impl Into<Expr>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// `[0, ∞)`
    pub fn half_line() -> Self {
        Self::new(Expr::zero(), Expr::infinity())
    }

    /// `(-∞, ∞)`
    pub fn real_line() -> Self {
        Self::new(Expr::neg_infinity(), Expr::infinity())
    }
}

/// Bounds matching [`Variables`] position by position.
#[derive(Clone, Debug, PartialEq)]
pub enum Bounds {
    Single(Limits),
    Sequence(Vec<Limits>),
}

impl Bounds {
    pub fn limits(&self) -> &[Limits] {
        match self {
            Bounds::Single(limits) => std::slice::from_ref(limits),
            Bounds::Sequence(limits) => limits,
        }
    }
}

/// Parameters to minimize over. A scalar takes the exact symbolic path, a
/// sequence (of any length) the numeric one.
#[derive(Clone, Debug, PartialEq)]
pub enum Parameters {
    Scalar(Symbol),
    Sequence(Vec<Symbol>),
}

impl Parameters {
    pub fn symbols(&self) -> &[Symbol] {
        match self {
            Parameters::Scalar(symbol) => std::slice::from_ref(symbol),
            Parameters::Sequence(symbols) => symbols,
        }
    }
}

/// Coordinate system a form is written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coordinates {
    /// `r` only, volume element `r²`.
    Radial,
    /// `(r, θ, φ)`, volume element `r² sin θ`.
    Spherical,
    /// `(x, y, z)`, volume element `1`.
    Cartesian,
}

/// A trial wavefunction with everything needed to integrate it.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialForm {
    pub form: Expr,
    pub variables: Variables,
    pub bounds: Bounds,
    pub volume_element: Expr,
    pub parameters: Parameters,
    pub coordinates: Coordinates,
}
