//! Trial forms: coordinate systems, bounds, parameters and the catalog.
//!
//! A [`TrialForm`] bundles the symbolic wavefunction with its integration
//! variables, bounds, volume element and free parameters. The catalog builds
//! the usual hydrogen and oscillator test shapes; user code can assemble its
//! own `TrialForm` from the same pieces.

mod catalog;
mod types;

pub use catalog::{
    cartesian_gaussian, cartesian_lorentzian, cubed_exponential, p_minus_exponential,
    pz_exponential, radial_exponential, radial_gaussian, spherical_exponential,
    spherical_gauss_exponential, spherical_gaussian, FormKind,
};
pub use types::{Bounds, Coordinates, Limits, Parameters, TrialForm, Variables};
