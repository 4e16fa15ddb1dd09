use serde::Serialize;

use crate::error::Result;
use crate::symbolic::{Env, Expr, Symbol};

/// Energy sampled on a grid around the optimal parameter.
#[derive(Clone, Debug, Serialize)]
pub struct EnergyCurve {
    /// Parameter values, equally spaced over `[0.5x, 1.5x]`
    pub parameters: Vec<f64>,
    /// Energy at each parameter value
    pub energies: Vec<f64>,
    /// Location of the minimum
    pub optimal_parameter: f64,
    /// Energy at the minimum
    pub optimal_energy: f64,
}

impl EnergyCurve {
    pub const SAMPLES: usize = 100;

    /// Sample `energy` as a function of `parameter` around `optimum`.
    pub fn sample(energy: &Expr, parameter: &Symbol, optimum: f64) -> Result<Self> {
        let (lo, hi) = (0.5 * optimum, 1.5 * optimum);
        let step = (hi - lo) / (Self::SAMPLES - 1) as f64;
        let mut env = Env::new();
        let mut parameters = Vec::with_capacity(Self::SAMPLES);
        let mut energies = Vec::with_capacity(Self::SAMPLES);
        for i in 0..Self::SAMPLES {
            let x = lo + step * i as f64;
            env.insert(parameter.clone(), x);
            parameters.push(x);
            energies.push(energy.eval_real(&env)?);
        }
        env.insert(parameter.clone(), optimum);
        let optimal_energy = energy.eval_real(&env)?;
        Ok(Self {
            parameters,
            energies,
            optimal_parameter: optimum,
            optimal_energy,
        })
    }

    /// Smallest sampled energy.
    pub fn sampled_minimum(&self) -> f64 {
        self.energies.iter().copied().fold(f64::INFINITY, f64::min)
    }
}
