//! Variational ground state of the 3D isotropic harmonic oscillator
//!
//! Run with: cargo run --example harmonic_oscillator

use variational::forms;
use variational::variation::{HarmonicOscillator, Minimizer};

fn main() -> variational::Result<()> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║     Variational Method: Harmonic Oscillator (ω = 1)          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    for (name, trial) in [
        ("Gaussian", forms::cartesian_gaussian()),
        ("Lorentzian", forms::cartesian_lorentzian()),
    ] {
        let trial = trial.normalized()?;
        let energy = trial.expectation(&HarmonicOscillator::new(1, trial.coordinates))?;
        let result = Minimizer::new().minimize(&energy, &trial.parameters)?;
        println!("{name}: ⟨H⟩ = {energy}");
        println!("  b* = {:.6}, E = {:.6}", result.values()?[0], result.energy()?);
    }

    println!();
    println!("Exact: E₀ = 3ω/2 = 1.5");
    Ok(())
}
