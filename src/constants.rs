//! Physical constants in SI units.
//!
//! The pipeline itself works in Hartree atomic units; the table is only read
//! when results are reported in laboratory units.

use std::f64::consts::PI;

/// Reduced Planck constant [J s]
pub const HBAR: f64 = 1.054571817e-34;
/// Speed of light [m/s]
pub const C: f64 = 2.99792458e8;
/// Electron mass [kg]
pub const ME: f64 = 9.1093837015e-31;
/// Vacuum permittivity [F/m]
pub const E0: f64 = 8.8541878128e-12;
/// Elementary charge [C]
pub const E: f64 = 1.602176634e-19;
/// Bohr radius [m]
pub const A0: f64 = 0.529177210903e-10;
/// Proton mass [kg]
pub const MP: f64 = 1.67262192369e-27;

/// Name lookup table, keyed the way run files refer to the constants.
pub static TABLE: [(&str, f64); 7] = [
    ("hbar", HBAR),
    ("c", C),
    ("me", ME),
    ("e0", E0),
    ("e", E),
    ("a", A0),
    ("mp", MP),
];

/// Look up a constant by name.
pub fn lookup(name: &str) -> Option<f64> {
    TABLE.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
}

/// Hartree energy E_h = m_e e⁴ / ((4π ε₀)² ħ²) [J].
pub fn hartree_energy() -> f64 {
    let coulomb = 4.0 * PI * E0;
    ME * E.powi(4) / (coulomb * coulomb * HBAR * HBAR)
}

/// Conversion factor from Hartree to electron volts.
pub fn hartree_to_ev() -> f64 {
    hartree_energy() / E
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup_known_and_unknown_names() {
        assert_eq!(lookup("hbar"), Some(HBAR));
        assert_eq!(lookup("a"), Some(A0));
        assert_eq!(lookup("planck"), None);
    }

    #[test]
    fn test_hartree_matches_codata() {
        assert_relative_eq!(hartree_to_ev(), 27.211386, epsilon = 1e-4);
        // Bohr radius follows from the same constants
        let bohr = 4.0 * PI * E0 * HBAR * HBAR / (ME * E * E);
        assert_relative_eq!(bohr, A0, max_relative = 1e-8);
    }
}
