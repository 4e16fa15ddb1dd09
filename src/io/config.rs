use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::forms::{Coordinates, FormKind};
use crate::variation::{Hamiltonian, HarmonicOscillator, HydrogenLike, Minimizer};

/// A complete variational run, as read from YAML.
///
/// ```yaml
/// form: spherical_gaussian
/// hamiltonian:
///   kind: hydrogen
///   charge: 1
/// normalize: true
/// minimizer:
///   gradient_tolerance: 1.0e-8
/// plot: curve.csv
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub form: FormKind,
    pub hamiltonian: HamiltonianConfig,
    /// Normalize the form before parameterizing
    pub normalize: bool,
    pub minimizer: MinimizerConfig,
    /// CSV file for the energy curve of a scalar run
    pub plot: Option<PathBuf>,
    /// YAML file for the run summary
    pub output: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            form: FormKind::SphericalExponential,
            hamiltonian: HamiltonianConfig::Hydrogen { charge: 1 },
            normalize: true,
            minimizer: MinimizerConfig::default(),
            plot: None,
            output: None,
        }
    }
}

/// Built-in Hamiltonian selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HamiltonianConfig {
    Hydrogen {
        #[serde(default = "unit")]
        charge: i64,
    },
    Harmonic {
        #[serde(default = "unit")]
        omega: i64,
    },
}

fn unit() -> i64 {
    1
}

impl HamiltonianConfig {
    /// The operator in the coordinate system of the chosen form.
    pub fn build(self, coordinates: Coordinates) -> Box<dyn Hamiltonian> {
        match self {
            HamiltonianConfig::Hydrogen { charge } => {
                Box::new(HydrogenLike::new(charge, coordinates))
            }
            HamiltonianConfig::Harmonic { omega } => {
                Box::new(HarmonicOscillator::new(omega, coordinates))
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimizerConfig {
    pub initial_guess: Option<Vec<f64>>,
    pub max_iterations: Option<usize>,
    pub gradient_tolerance: Option<f64>,
    pub confine_positive: Option<bool>,
}

impl MinimizerConfig {
    pub fn build(&self) -> Minimizer {
        let mut minimizer = Minimizer::new();
        if let Some(guess) = &self.initial_guess {
            minimizer = minimizer.with_initial_guess(guess.clone());
        }
        if let Some(n) = self.max_iterations {
            minimizer = minimizer.with_max_iterations(n);
        }
        if let Some(tolerance) = self.gradient_tolerance {
            minimizer = minimizer.with_gradient_tolerance(tolerance);
        }
        if let Some(confine) = self.confine_positive {
            minimizer = minimizer.with_positive_confinement(confine);
        }
        minimizer
    }
}

/// Read a run configuration from a YAML file.
pub fn read_run_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_yaml::from_reader(reader)?)
}

/// Parse a run configuration from YAML text.
pub fn parse_run_config(text: &str) -> Result<RunConfig> {
    Ok(serde_yaml::from_str(text)?)
}
