//! Variational ground state of the hydrogen atom
//!
//! Run with: cargo run --example hydrogen_atom
//!
//! Compares an exponential and a Gaussian trial form. The exponential
//! contains the exact 1s state, the Gaussian does not.

use variational::constants::hartree_to_ev;
use variational::forms::{self, TrialForm};
use variational::variation::{HydrogenLike, MinimizationResult, Minimizer};

fn report(name: &str, trial: TrialForm) -> variational::Result<()> {
    let trial = trial.normalized()?;
    let energy = trial.expectation(&HydrogenLike::new(1, trial.coordinates))?;
    let result = Minimizer::new().minimize(&energy, &trial.parameters)?;

    println!("{name}");
    println!("  ψ = {}", trial.form);
    println!("  ⟨H⟩ = {energy}");
    if let MinimizationResult::Symbolic { value, energy, .. } = &result {
        println!("  b* = {value}, E = {energy}");
    }
    let e = result.energy()?;
    println!("  E = {:.6} Ha = {:.4} eV", e, e * hartree_to_ev());
    println!();
    Ok(())
}

fn main() -> variational::Result<()> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║     Variational Method: Hydrogen Atom                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    report("Exponential e^(-br)", forms::spherical_exponential())?;
    report("Gaussian e^(-br²)", forms::spherical_gaussian())?;
    report("2p₀ r e^(-br) cos θ", forms::pz_exponential())?;

    println!("Exact: E₁ = -0.5 Ha, E₂ = -0.125 Ha");
    Ok(())
}
