//! Exact rational arithmetic helpers for the canonical simplifier.

use num_integer::Integer;
use num_traits::Zero;

pub type Rational = num_rational::Rational64;

/// Integers above this are left unfactored.
const FACTOR_LIMIT: i64 = 1_000_000_000_000;

/// Prime factorization by trial division, as (prime, multiplicity) pairs.
pub fn factorize(mut n: i64) -> Option<Vec<(i64, i64)>> {
    if !(1..=FACTOR_LIMIT).contains(&n) {
        return None;
    }
    let mut factors = Vec::new();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            let mut multiplicity = 0;
            while n % p == 0 {
                n /= p;
                multiplicity += 1;
            }
            factors.push((p, multiplicity));
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push((n, 1));
    }
    Some(factors)
}

/// q^n for an integer n, None on overflow or 0^(-n).
pub fn rational_pow(q: Rational, n: i64) -> Option<Rational> {
    if n < 0 {
        if q.is_zero() {
            return None;
        }
        return rational_pow(q.recip(), n.checked_neg()?);
    }
    let n = u32::try_from(n).ok()?;
    let numer = q.numer().checked_pow(n)?;
    let denom = q.denom().checked_pow(n)?;
    Some(Rational::new(numer, denom))
}

pub fn factorial(n: i64) -> Option<i64> {
    (1..=n).try_fold(1i64, |acc, k| acc.checked_mul(k))
}

/// Least common multiple of the denominators.
pub fn common_denominator<'a>(values: impl IntoIterator<Item = &'a Rational>) -> i64 {
    values
        .into_iter()
        .fold(1i64, |acc, q| acc.lcm(q.denom()))
}

pub fn is_odd(n: i64) -> bool {
    n.rem_euclid(2) == 1
}

pub fn to_f64(q: &Rational) -> f64 {
    *q.numer() as f64 / *q.denom() as f64
}

pub fn half() -> Rational {
    Rational::new(1, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorize() {
        assert_eq!(factorize(1), Some(vec![]));
        assert_eq!(factorize(72), Some(vec![(2, 3), (3, 2)]));
        assert_eq!(factorize(97), Some(vec![(97, 1)]));
        assert_eq!(factorize(0), None);
    }

    #[test]
    fn test_rational_pow() {
        assert_eq!(rational_pow(Rational::new(2, 3), 3), Some(Rational::new(8, 27)));
        assert_eq!(rational_pow(Rational::new(2, 3), -2), Some(Rational::new(9, 4)));
        assert_eq!(rational_pow(Rational::zero(), -1), None);
        assert_eq!(rational_pow(Rational::from_integer(10), 40), None);
    }

    #[test]
    fn test_common_denominator() {
        let values = [Rational::new(1, 2), Rational::new(2, 3), Rational::from_integer(4)];
        assert_eq!(common_denominator(values.iter()), 6);
        assert!(is_odd(-3));
        assert!(!is_odd(4));
    }
}
