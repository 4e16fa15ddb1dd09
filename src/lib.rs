//! Variational method for one-particle quantum systems
//!
//! This crate normalizes symbolic trial wavefunctions, turns a Hamiltonian
//! into an energy function of the trial parameters, and minimizes it:
//! exactly for a single parameter, with BFGS for several.
//!
//! ```no_run
//! use variational::forms;
//! use variational::variation::{HydrogenLike, Minimizer};
//!
//! let trial = forms::spherical_exponential().normalized()?;
//! let energy = trial.expectation(&HydrogenLike::new(1, trial.coordinates))?;
//! let result = Minimizer::new().minimize(&energy, &trial.parameters)?;
//! println!("E = {} Ha", result.energy()?);
//! # Ok::<(), variational::Error>(())
//! ```

pub mod constants;
pub mod error;
pub mod forms;
pub mod io;
pub mod symbolic;
pub mod variation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use forms::{Bounds, Coordinates, FormKind, Limits, Parameters, TrialForm, Variables};
pub use symbolic::{Domain, Expr, Symbol};
pub use variation::{
    minimize_hamiltonian, normalize, parameterize_hamiltonian, Hamiltonian, HarmonicOscillator,
    HydrogenLike, MinimizationResult, Minimizer, Plotter,
};

#[cfg(test)]
mod tests;
