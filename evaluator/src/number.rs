use std::fmt;

use crate::{
    expression::EvalError,
    rational::{Rational, MAX_APPROXIMATION_DENOMINATOR},
};

/// Tolerance below which a floating point value counts as zero.
pub const FLOAT_EPSILON: f64 = 1e-10;

/// The arithmetic domain an expression is evaluated in.
///
/// Implemented for `f64` (approximate) and [`Rational`] (exact).
/// Fallible operations report an [`EvalError`] instead of producing `NaN` or a zero denominator.
pub trait Number: Copy + PartialEq + fmt::Debug + fmt::Display {
    /// The defined "no value" result.
    const SENTINEL: Self;

    fn zero() -> Self;
    fn one() -> Self;
    fn from_integer(value: i64) -> Self;

    /// Parses a number literal consisting of digits and at most one `.`.
    fn parse_literal(text: &str) -> Result<Self, EvalError>;

    /// Converts a floating point value into this domain, `None` if it cannot be represented.
    fn from_f64(value: f64) -> Option<Self>;
    fn to_f64(self) -> f64;

    fn add(self, rhs: Self) -> Result<Self, EvalError>;
    fn sub(self, rhs: Self) -> Result<Self, EvalError>;
    fn mul(self, rhs: Self) -> Result<Self, EvalError>;
    fn div(self, rhs: Self) -> Result<Self, EvalError>;
    fn neg(self) -> Result<Self, EvalError>;
    fn pow(self, exponent: Self) -> Result<Self, EvalError>;
    fn abs(self) -> Result<Self, EvalError>;
    /// `None` for negative values.
    fn sqrt(self) -> Option<Self>;

    /// Zero test: exact for rationals, within [`FLOAT_EPSILON`] for floats.
    fn is_negligible(self) -> bool;

    fn approx_eq(self, other: Self) -> bool;

    /// Rejects values that are not usable as a final result.
    fn check_finite(self) -> Result<Self, EvalError>;

    /// Applies a real function by going through `f64`.
    fn map_real(self, function: impl Fn(f64) -> f64) -> Option<Self> {
        Self::from_f64(function(self.to_f64()))
    }
}

impl Number for f64 {
    const SENTINEL: Self = 0.0;

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_integer(value: i64) -> Self {
        value as f64
    }

    fn parse_literal(text: &str) -> Result<Self, EvalError> {
        text.parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber(text.to_string()))
    }

    fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then_some(value)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn add(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self + rhs)
    }

    fn sub(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self - rhs)
    }

    fn mul(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self * rhs)
    }

    fn div(self, rhs: Self) -> Result<Self, EvalError> {
        if rhs == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        Ok(self / rhs)
    }

    fn neg(self) -> Result<Self, EvalError> {
        Ok(-self)
    }

    fn pow(self, exponent: Self) -> Result<Self, EvalError> {
        Ok(self.powf(exponent))
    }

    fn abs(self) -> Result<Self, EvalError> {
        Ok(f64::abs(self))
    }

    fn sqrt(self) -> Option<Self> {
        (self >= 0.0).then(|| f64::sqrt(self))
    }

    fn is_negligible(self) -> bool {
        f64::abs(self) < FLOAT_EPSILON
    }

    fn approx_eq(self, other: Self) -> bool {
        let scale = 1.0_f64.max(f64::abs(self)).max(f64::abs(other));
        f64::abs(self - other) <= 1e-9 * scale
    }

    fn check_finite(self) -> Result<Self, EvalError> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(EvalError::NotFinite)
        }
    }
}

impl Number for Rational {
    const SENTINEL: Self = Rational::ZERO;

    fn zero() -> Self {
        Rational::ZERO
    }

    fn one() -> Self {
        Rational::ONE
    }

    fn from_integer(value: i64) -> Self {
        Rational::from_integer(value)
    }

    fn parse_literal(text: &str) -> Result<Self, EvalError> {
        let has_digits = text.chars().any(|c| c.is_ascii_digit());
        let is_literal = text.chars().all(|c| c.is_ascii_digit() || c == '.')
            && text.matches('.').count() <= 1;
        if !has_digits || !is_literal {
            return Err(EvalError::InvalidNumber(text.to_string()));
        }
        Ok(Rational::from_decimal_str(text)?)
    }

    fn from_f64(value: f64) -> Option<Self> {
        Rational::approximate(value, MAX_APPROXIMATION_DENOMINATOR)
    }

    fn to_f64(self) -> f64 {
        Rational::to_f64(&self)
    }

    fn add(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self.checked_add(rhs)?)
    }

    fn sub(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self.checked_sub(rhs)?)
    }

    fn mul(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self.checked_mul(rhs)?)
    }

    fn div(self, rhs: Self) -> Result<Self, EvalError> {
        Ok(self.checked_div(rhs)?)
    }

    fn neg(self) -> Result<Self, EvalError> {
        Ok(self.checked_neg()?)
    }

    /// Integer exponents stay exact. Anything else goes through `f64`.
    fn pow(self, exponent: Self) -> Result<Self, EvalError> {
        if exponent.is_integer() {
            return Ok(self.checked_pow(exponent.numer())?);
        }
        self.map_real(|base| base.powf(exponent.to_f64()))
            .ok_or(EvalError::NotRepresentable)
    }

    fn abs(self) -> Result<Self, EvalError> {
        Ok(Rational::abs(&self)?)
    }

    fn sqrt(self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        self.exact_sqrt().or_else(|| self.map_real(f64::sqrt))
    }

    fn is_negligible(self) -> bool {
        self.is_zero()
    }

    fn approx_eq(self, other: Self) -> bool {
        self == other
    }

    fn check_finite(self) -> Result<Self, EvalError> {
        Ok(self)
    }
}
