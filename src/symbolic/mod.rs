//! Symbolic engine.
//!
//! A small computer algebra kernel covering what the variational pipeline
//! needs: exact rational arithmetic with canonical sums, products and powers,
//! differentiation, conjugation, substitution, expansion, closed-form
//! definite integration of the families that appear in trial forms, root
//! finding for generalized polynomials, and numeric evaluation with quadrature
//! for integrals that stay unevaluated.

mod calculus;
mod display;
mod eval;
mod expr;
mod integrate;
mod number;
mod ops;
mod quadrature;
mod simplify;
mod solve;

pub use eval::{env_of, Env};
pub use expr::{Constant, Domain, Expr, Func, Integral, Symbol};
pub use number::Rational;

pub(crate) use solve::sign_of;
