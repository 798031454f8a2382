use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest denominator used when approximating a float with a rational.
pub const MAX_APPROXIMATION_DENOMINATOR: i64 = 1_000_000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("the result does not fit into a 64 bit fraction")]
    Overflow,
}

/// An exact fraction.
///
/// Invariants:
/// - `den > 0`
/// - `gcd(|num|, den) == 1`, and zero is always `0/1`
///
/// Every constructor normalizes, so two equal values always have the same representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    pub fn new(num: i64, den: i64) -> Result<Self, ArithmeticError> {
        Self::reduce(num as i128, den as i128)
    }

    pub fn from_integer(value: i64) -> Self {
        Rational { num: value, den: 1 }
    }

    pub fn numer(&self) -> i64 {
        self.num
    }

    pub fn denom(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn abs(&self) -> Result<Self, ArithmeticError> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Ok(*self)
        }
    }

    pub fn checked_add(self, rhs: Rational) -> Result<Self, ArithmeticError> {
        let (a, b) = (self.wide(), rhs.wide());
        let num = mul_wide(a.0, b.1)?
            .checked_add(mul_wide(b.0, a.1)?)
            .ok_or(ArithmeticError::Overflow)?;
        Self::reduce(num, a.1 * b.1)
    }

    pub fn checked_sub(self, rhs: Rational) -> Result<Self, ArithmeticError> {
        self.checked_add(rhs.checked_neg()?)
    }

    pub fn checked_mul(self, rhs: Rational) -> Result<Self, ArithmeticError> {
        let (a, b) = (self.wide(), rhs.wide());
        Self::reduce(a.0 * b.0, a.1 * b.1)
    }

    /// Dividing by a zero-numerator fraction is an error, never a zero denominator.
    pub fn checked_div(self, rhs: Rational) -> Result<Self, ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let (a, b) = (self.wide(), rhs.wide());
        Self::reduce(a.0 * b.1, a.1 * b.0)
    }

    pub fn checked_neg(self) -> Result<Self, ArithmeticError> {
        let num = self.num.checked_neg().ok_or(ArithmeticError::Overflow)?;
        Ok(Rational { num, den: self.den })
    }

    pub fn recip(self) -> Result<Self, ArithmeticError> {
        Rational::ONE.checked_div(self)
    }

    /// Exponentiation by squaring. Negative exponents take the reciprocal first.
    pub fn checked_pow(self, exponent: i64) -> Result<Self, ArithmeticError> {
        let mut base = if exponent < 0 { self.recip()? } else { self };
        let mut remaining = exponent.unsigned_abs();
        let mut result = Rational::ONE;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.checked_mul(base)?;
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.checked_mul(base)?;
            }
        }
        Ok(result)
    }

    /// Returns the exact square root if numerator and denominator are perfect squares.
    pub fn exact_sqrt(self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        let num = integer_sqrt(self.num)?;
        let den = integer_sqrt(self.den)?;
        Some(Rational { num, den })
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Best rational approximation with a denominator of at most `max_den`, found with continued fractions.
    /// Returns `None` for values that are not finite or do not fit into 64 bits.
    pub fn approximate(value: f64, max_den: i64) -> Option<Self> {
        if !value.is_finite() || value.abs() >= i64::MAX as f64 {
            return None;
        }
        let (mut h_prev, mut h) = (1_i128, value.floor() as i128);
        let (mut k_prev, mut k) = (0_i128, 1_i128);
        let mut remainder = value - value.floor();
        while remainder > 1e-12 && ((h as f64 / k as f64) - value).abs() > 1e-12 * value.abs().max(1.0)
        {
            let inverted = 1.0 / remainder;
            let term = inverted.floor() as i128;
            let next_k = term * k + k_prev;
            if next_k > max_den as i128 {
                break;
            }
            let next_h = term * h + h_prev;
            (h_prev, h) = (h, next_h);
            (k_prev, k) = (k, next_k);
            remainder = inverted - inverted.floor();
        }
        Self::reduce(h, k).ok()
    }

    /// Parses a plain decimal literal such as `42`, `2.5` or `.5` exactly.
    pub fn from_decimal_str(text: &str) -> Result<Self, ArithmeticError> {
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let mut num: i128 = 0;
        let mut den: i128 = 1;
        for digit in whole.chars().chain(fraction.chars()).filter_map(|c| c.to_digit(10)) {
            num = num
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit as i128))
                .ok_or(ArithmeticError::Overflow)?;
        }
        for _ in fraction.chars() {
            den = den.checked_mul(10).ok_or(ArithmeticError::Overflow)?;
        }
        Self::reduce(num, den)
    }

    fn wide(&self) -> (i128, i128) {
        (self.num as i128, self.den as i128)
    }

    fn reduce(num: i128, den: i128) -> Result<Self, ArithmeticError> {
        if den == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        if num == 0 {
            return Ok(Rational::ZERO);
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        let sign = if den < 0 { -1 } else { 1 };
        let num = i64::try_from(sign * (num / g)).map_err(|_| ArithmeticError::Overflow)?;
        let den = i64::try_from(sign * (den / g)).map_err(|_| ArithmeticError::Overflow)?;
        Ok(Rational { num, den })
    }
}

fn mul_wide(a: i128, b: i128) -> Result<i128, ArithmeticError> {
    a.checked_mul(b).ok_or(ArithmeticError::Overflow)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn integer_sqrt(value: i64) -> Option<i64> {
    let root = (value as f64).sqrt().round() as i64;
    // Float rounding can be off by one for large values
    (root.saturating_sub(1)..=root.saturating_add(1))
        .find(|candidate| *candidate >= 0 && candidate.checked_mul(*candidate) == Some(value))
}

impl Default for Rational {
    fn default() -> Self {
        Rational::ZERO
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::from_integer(value)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.wide(), other.wide());
        (a.0 * b.1).cmp(&(b.0 * a.1))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
