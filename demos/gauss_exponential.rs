//! Four-parameter Gaussian plus exponential trial form for hydrogen
//!
//! Run with: cargo run --release --example gauss_exponential
//!
//! Takes the numeric BFGS path, since there is more than one parameter. The
//! Gaussian-exponential cross terms have no closed form and are evaluated by
//! quadrature at every step.

use variational::forms;
use variational::variation::{HydrogenLike, MinimizationResult, Minimizer};

fn main() -> variational::Result<()> {
    tracing_subscriber::fmt().init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║     Variational Method: β e^(-br²) + α e^(-ar)               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let trial = forms::spherical_gauss_exponential().normalized()?;
    let energy = trial.expectation(&HydrogenLike::new(1, trial.coordinates))?;

    let result = Minimizer::new()
        .with_initial_guess(vec![0.8, 0.3, 1.0, 0.5])
        .with_max_iterations(40)
        .minimize(&energy, &trial.parameters)?;

    if let MinimizationResult::Numerical { parameters, values, energy, status } = &result {
        for (p, v) in parameters.iter().zip(values.iter()) {
            println!("  {p} = {v:.6}");
        }
        println!("  E = {energy:.8} Ha");
        println!("  converged = {} after {} iterations", status.converged, status.iterations);
    }
    println!();
    println!("Exact: E₀ = -0.5 Ha");
    Ok(())
}
