//! Error type shared by the symbolic engine and the variational pipeline.

use thiserror::Error;

/// Errors raised while normalizing, parameterizing or minimizing.
///
/// Every error is raised at the point of detection and passed up unchanged;
/// nothing in the crate retries.
#[derive(Debug, Error)]
pub enum Error {
    /// The density integral of a form is exactly zero, infinite or undefined.
    #[error("unnormalizable form passed to normalize: {form} (density integral = {integral})")]
    UnnormalizableForm {
        /// The offending form.
        form: String,
        /// The value the density integral reduced to.
        integral: String,
    },

    /// The single-parameter path found no usable critical point.
    #[error("no minimization of hamiltonian {hamiltonian} available")]
    NoMinimum {
        /// The parameterized Hamiltonian.
        hamiltonian: String,
    },

    /// The derivative is outside the class of equations solved in closed form.
    #[error("cannot solve {expression} = 0 for {symbol}: {reason}")]
    Unsolvable {
        expression: String,
        symbol: String,
        reason: String,
    },

    /// Integration variables and bounds disagree in shape or length.
    #[error("{variables} integration variable(s) but {bounds} bound pair(s)")]
    MismatchedBounds { variables: usize, bounds: usize },

    #[error("no integration variables given")]
    EmptyVariables,

    #[error("no parameters given")]
    EmptyParameters,

    /// The initial guess does not match the number of parameters.
    #[error("initial guess has {got} values for {expected} parameters")]
    MismatchedGuess { expected: usize, got: usize },

    /// A free symbol was left without a value during numeric evaluation.
    #[error("symbol {0} has no value during numeric evaluation")]
    UnboundSymbol(String),

    /// Numeric evaluation produced a complex or NaN value.
    #[error("{0} did not evaluate to a finite real number")]
    NonReal(String),

    /// A run file or summary could not be read or written as YAML.
    #[error("yaml error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
