use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::DVector;
use serde::Serialize;
use tracing::info;

use crate::constants::hartree_to_ev;
use crate::error::Result;
use crate::forms::FormKind;
use crate::symbolic::Symbol;
use crate::variation::{ConvergenceStatus, MinimizationResult, Plotter};

use super::config::{HamiltonianConfig, RunConfig};

/// What a run found, in a form that serializes to YAML.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub form: FormKind,
    pub hamiltonian: HamiltonianConfig,
    /// Parameterized energy ⟨H⟩ before minimization
    pub energy_function: String,
    pub parameters: Vec<String>,
    /// Optimal parameter values in parameter order
    pub values: DVector<f64>,
    /// Closed-form optimum, when the exact path was taken
    pub exact_value: Option<String>,
    pub exact_energy: Option<String>,
    /// Energy in Hartree
    pub energy: f64,
    /// Energy in electron volts
    pub energy_ev: f64,
    pub status: Option<ConvergenceStatus>,
}

/// Build, normalize, parameterize and minimize the configured form.
pub fn run_variation(config: &RunConfig, plotter: Option<&mut dyn Plotter>) -> Result<RunSummary> {
    let mut trial = config.form.build();
    if config.normalize {
        trial = trial.normalized()?;
    }
    info!(form = ?config.form, psi = %trial.form, "trial form");

    let hamiltonian = config.hamiltonian.build(trial.coordinates);
    let energy_function = trial.expectation(hamiltonian.as_ref())?;
    info!(energy = %energy_function, "parameterized hamiltonian");

    let result = config
        .minimizer
        .build()
        .minimize_with_plot(&energy_function, &trial.parameters, plotter)?;
    let energy = result.energy()?;
    let (exact_value, exact_energy, status) = match &result {
        MinimizationResult::Symbolic { value, energy, .. } => {
            (Some(value.to_string()), Some(energy.to_string()), None)
        }
        MinimizationResult::Numerical { status, .. } => (None, None, Some(status.clone())),
    };
    Ok(RunSummary {
        form: config.form,
        hamiltonian: config.hamiltonian,
        energy_function: energy_function.to_string(),
        parameters: result
            .parameters()
            .iter()
            .map(Symbol::name)
            .map(String::from)
            .collect(),
        values: DVector::from_vec(result.values()?),
        exact_value,
        exact_energy,
        energy,
        energy_ev: energy * hartree_to_ev(),
        status,
    })
}

/// Write `summary` as YAML.
pub fn write_summary(summary: &RunSummary, path: impl AsRef<Path>) -> Result<()> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_yaml::to_writer(writer, summary)?;
    info!(path = %path.as_ref().display(), "summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_run_config;
    use approx::assert_relative_eq;

    #[test]
    fn test_hydrogen_run() {
        let summary = run_variation(&RunConfig::default(), None).unwrap();
        assert_eq!(summary.parameters, ["b"]);
        assert_relative_eq!(summary.values[0], 1.0);
        assert_relative_eq!(summary.energy, -0.5);
        assert_relative_eq!(summary.energy_ev, -13.605693, epsilon = 1e-4);
        assert_eq!(summary.exact_value.as_deref(), Some("1"));
        assert!(summary.status.is_none());
    }

    #[test]
    fn test_oscillator_run_and_summary_file() {
        let config = parse_run_config(
            "form: cartesian_gaussian\nhamiltonian:\n  kind: harmonic\n  omega: 1\n",
        )
        .unwrap();
        let summary = run_variation(&config, None).unwrap();
        assert_relative_eq!(summary.values[0], 0.5);
        assert_relative_eq!(summary.energy, 1.5);

        let path = std::env::temp_dir().join(format!("variational-summary-{}.yml", std::process::id()));
        write_summary(&summary, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("form: cartesian_gaussian"));
        assert!(text.contains("kind: harmonic"));
        assert!(text.contains("energy: 1.5"));
    }
}
