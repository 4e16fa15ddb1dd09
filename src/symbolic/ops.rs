//! Arithmetic operators on expressions.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::expr::Expr;

macro_rules! impl_binary_ops {
    ($lhs:ty) => {
        impl<T: Into<Expr>> Add<T> for $lhs {
            type Output = Expr;
            fn add(self, rhs: T) -> Expr {
                Expr::sum([Expr::from(self), rhs.into()])
            }
        }

        impl<T: Into<Expr>> Sub<T> for $lhs {
            type Output = Expr;
            fn sub(self, rhs: T) -> Expr {
                Expr::sum([Expr::from(self), -rhs.into()])
            }
        }

        impl<T: Into<Expr>> Mul<T> for $lhs {
            type Output = Expr;
            fn mul(self, rhs: T) -> Expr {
                Expr::product([Expr::from(self), rhs.into()])
            }
        }

        impl<T: Into<Expr>> Div<T> for $lhs {
            type Output = Expr;
            fn div(self, rhs: T) -> Expr {
                Expr::product([Expr::from(self), rhs.into().recip()])
            }
        }
    };
}

impl_binary_ops!(Expr);
impl_binary_ops!(&Expr);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::product([Expr::integer(-1), self])
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        -self.clone()
    }
}

macro_rules! impl_integer_lhs {
    ($($int:ty),*) => {$(
        impl Add<Expr> for $int {
            type Output = Expr;
            fn add(self, rhs: Expr) -> Expr {
                Expr::from(self) + rhs
            }
        }

        impl Sub<Expr> for $int {
            type Output = Expr;
            fn sub(self, rhs: Expr) -> Expr {
                Expr::from(self) - rhs
            }
        }

        impl Mul<Expr> for $int {
            type Output = Expr;
            fn mul(self, rhs: Expr) -> Expr {
                Expr::from(self) * rhs
            }
        }

        impl Div<Expr> for $int {
            type Output = Expr;
            fn div(self, rhs: Expr) -> Expr {
                Expr::from(self) / rhs
            }
        }
    )*};
}

impl_integer_lhs!(i64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Symbol;

    #[test]
    fn test_operators_canonicalize() {
        let b = Symbol::positive("b").expr();
        assert_eq!(&b + &b, 2 * b.clone());
        assert_eq!(&b - &b, Expr::zero());
        assert_eq!(&b / &b, Expr::one());
        assert_eq!(-(-b.clone()), b);
        assert_eq!(1 - b.clone() + b.clone(), Expr::one());
    }

    #[test]
    fn test_integer_left_operands_infer() {
        let b = Symbol::positive("b").expr();
        assert_eq!((2 * b.clone()).to_string(), "2*b");
        assert_eq!((12 - 3 * b.pow(-2)).terms().len(), 2);
        assert_eq!(-2 * b.clone() / b, Expr::integer(-2));
    }
}
