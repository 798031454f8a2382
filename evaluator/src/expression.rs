//! Recursive descent evaluator.
//!
//! ```text
//! Expression := Term (('+'|'-') Term)*
//! Term       := Factor (('*' Factor | '/' Factor | ImplicitFactor))*
//! Factor     := Power ('^' Factor)?
//! Power      := '(' Expression ')' | '{' Expression '}'
//!             | '-' Power
//!             | Number
//!             | Identifier ['(' Expression ')' | '{' Expression '}']
//! ```
//!
//! The same grammar is evaluated in every [`Number`] domain.

use std::f64::consts;

use thiserror::Error;

use crate::{
    number::Number,
    rational::ArithmeticError,
    scanner::{is_identifier_start, starts_factor, Scanner},
};

/// Deeper nesting than this is rejected instead of risking the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {value:?} at {index}")]
    UnexpectedCharacter { value: char, index: usize },
    #[error("bracket {open:?} at {index} is never closed")]
    UnmatchedBracket { open: char, index: usize },
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("the result is not a finite number")]
    NotFinite,
    #[error("the result cannot be represented exactly")]
    NotRepresentable,
    #[error("expression is nested too deeply")]
    TooDeep,
}

impl From<ArithmeticError> for EvalError {
    fn from(value: ArithmeticError) -> Self {
        match value {
            ArithmeticError::DivisionByZero => EvalError::DivisionByZero,
            ArithmeticError::Overflow => EvalError::Overflow,
        }
    }
}

/// A single variable that identifiers are resolved against before constants and functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding<'a, N> {
    pub name: &'a str,
    pub value: N,
}

impl<'a, N> Binding<'a, N> {
    pub fn new(name: &'a str, value: N) -> Self {
        Self { name, value }
    }
}

/// Evaluates an expression, never failing.
/// Any error yields [`Number::SENTINEL`], which is zero in both domains.
pub fn evaluate<N: Number>(expression: &str, binding: Option<Binding<'_, N>>) -> N {
    match try_evaluate(expression, binding) {
        Ok(value) => value,
        Err(err) => {
            log::trace!("{expression:?} evaluates to the sentinel: {err}");
            N::SENTINEL
        }
    }
}

pub fn try_evaluate<N: Number>(
    expression: &str,
    binding: Option<Binding<'_, N>>,
) -> Result<N, EvalError> {
    let mut parser = ExpressionParser::new(expression, binding);
    let value = parser.parse_expression()?;
    parser.scanner.skip_whitespace();
    if let Some(value) = parser.scanner.peek() {
        return Err(EvalError::UnexpectedCharacter {
            value,
            index: parser.scanner.index(),
        });
    }
    value.check_finite()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Abs,
    Exp,
}

impl UnaryFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => UnaryFunction::Sin,
            "cos" => UnaryFunction::Cos,
            "tan" => UnaryFunction::Tan,
            "asin" => UnaryFunction::Asin,
            "acos" => UnaryFunction::Acos,
            "atan" => UnaryFunction::Atan,
            "sqrt" => UnaryFunction::Sqrt,
            "abs" => UnaryFunction::Abs,
            "exp" => UnaryFunction::Exp,
            _ => return None,
        })
    }

    /// `None` when the argument is outside of the domain.
    pub fn apply<N: Number>(self, argument: N) -> Option<N> {
        match self {
            UnaryFunction::Sin => argument.map_real(f64::sin),
            UnaryFunction::Cos => argument.map_real(f64::cos),
            UnaryFunction::Tan => argument.map_real(f64::tan),
            UnaryFunction::Asin | UnaryFunction::Acos
                if !(-1.0..=1.0).contains(&argument.to_f64()) =>
            {
                None
            }
            UnaryFunction::Asin => argument.map_real(f64::asin),
            UnaryFunction::Acos => argument.map_real(f64::acos),
            UnaryFunction::Atan => argument.map_real(f64::atan),
            UnaryFunction::Sqrt => argument.sqrt(),
            UnaryFunction::Abs => argument.abs().ok(),
            UnaryFunction::Exp => argument.map_real(f64::exp),
        }
    }
}

/// `log` defaults to base 10, `ln` to base e.
/// Requires a positive argument and a positive base other than 1.
pub fn logarithm<N: Number>(argument: N, base: Option<N>, natural: bool) -> Option<N> {
    let argument = argument.to_f64();
    if argument <= 0.0 {
        return None;
    }
    let value = match base.map(Number::to_f64) {
        Some(base) if base <= 0.0 || base == 1.0 => return None,
        Some(base) if base == 2.0 => argument.log2(),
        Some(base) if base == 10.0 => argument.log10(),
        Some(base) => argument.ln() / base.ln(),
        None if natural => argument.ln(),
        None => argument.log10(),
    };
    N::from_f64(value)
}

struct ExpressionParser<'a, N: Number> {
    scanner: Scanner,
    binding: Option<Binding<'a, N>>,
    depth: usize,
}

impl<'a, N: Number> ExpressionParser<'a, N> {
    fn new(expression: &str, binding: Option<Binding<'a, N>>) -> Self {
        Self {
            scanner: Scanner::new(expression),
            binding,
            depth: 0,
        }
    }

    fn parse_expression(&mut self) -> Result<N, EvalError> {
        let mut value = self.parse_term()?;
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.eat('+') {
                value = value.add(self.parse_term()?)?;
            } else if self.scanner.eat('-') {
                value = value.sub(self.parse_term()?)?;
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn parse_term(&mut self) -> Result<N, EvalError> {
        let mut value = self.parse_factor()?;
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.eat('*') {
                value = value.mul(self.parse_factor()?)?;
            } else if self.scanner.eat('/') {
                value = value.div(self.parse_factor()?)?;
            } else if self.scanner.peek().is_some_and(starts_factor) {
                // Implicit multiplication, like 2(3+4) or 3pi
                value = value.mul(self.parse_factor()?)?;
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn parse_factor(&mut self) -> Result<N, EvalError> {
        let base = self.parse_power()?;
        self.scanner.skip_whitespace();
        if self.scanner.eat('^') {
            let exponent = self.nested(Self::parse_factor)?;
            return base.pow(exponent);
        }
        Ok(base)
    }

    fn parse_power(&mut self) -> Result<N, EvalError> {
        self.nested(Self::parse_primary)
    }

    /// Every recursive rule goes through here, so this is where the depth is limited.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<N, EvalError>) -> Result<N, EvalError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(EvalError::TooDeep);
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_primary(&mut self) -> Result<N, EvalError> {
        self.scanner.skip_whitespace();
        let index = self.scanner.index();
        match self.scanner.peek() {
            None => Err(EvalError::UnexpectedEnd),
            Some('(' | '{') => self.parse_group(),
            Some('-') => {
                self.scanner.advance();
                self.parse_power()?.neg()
            }
            Some(value) if value.is_ascii_digit() || value == '.' => {
                N::parse_literal(&self.scanner.consume_number())
            }
            Some(value) if is_identifier_start(value) => self.parse_identifier(),
            Some(value) => Err(EvalError::UnexpectedCharacter { value, index }),
        }
    }

    /// Parses `(expr)` or `{expr}`. The caller has checked that an opening bracket is next.
    fn parse_group(&mut self) -> Result<N, EvalError> {
        let index = self.scanner.index();
        let open = self.scanner.advance().ok_or(EvalError::UnexpectedEnd)?;
        let close = if open == '(' { ')' } else { '}' };
        let value = self.parse_expression()?;
        self.scanner.skip_whitespace();
        if !self.scanner.eat(close) {
            return Err(EvalError::UnmatchedBracket { open, index });
        }
        Ok(value)
    }

    /// A bracketed argument directly after a function name, if there is one.
    fn parse_call_argument(&mut self) -> Result<Option<N>, EvalError> {
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some('(' | '{') => self.parse_group().map(Some),
            _ => Ok(None),
        }
    }

    fn parse_identifier(&mut self) -> Result<N, EvalError> {
        let name = self.scanner.consume_identifier();
        if let Some(binding) = self.binding.filter(|binding| binding.name == name) {
            return Ok(binding.value);
        }
        match name.as_str() {
            "pi" => return N::from_f64(consts::PI).ok_or(EvalError::NotRepresentable),
            "e" => return N::from_f64(consts::E).ok_or(EvalError::NotRepresentable),
            "log" | "ln" => return self.parse_logarithm(name == "ln"),
            _ => (),
        }

        let argument = self.parse_call_argument()?;
        let value = match (UnaryFunction::from_name(&name), argument) {
            (Some(function), Some(argument)) => function.apply(argument),
            // Unknown names and calls without an argument have no value
            _ => None,
        };
        Ok(value.unwrap_or(N::SENTINEL))
    }

    fn parse_logarithm(&mut self, natural: bool) -> Result<N, EvalError> {
        let base = if self.scanner.eat('_') {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some('(' | '{') => Some(self.parse_group()?),
                Some(value) if value.is_ascii_digit() || value == '.' => {
                    Some(N::parse_literal(&self.scanner.consume_number())?)
                }
                Some(value) => {
                    return Err(EvalError::UnexpectedCharacter {
                        value,
                        index: self.scanner.index(),
                    })
                }
                None => return Err(EvalError::UnexpectedEnd),
            }
        } else {
            None
        };
        let value = self
            .parse_call_argument()?
            .and_then(|argument| logarithm(argument, base, natural));
        Ok(value.unwrap_or(N::SENTINEL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_input_is_an_error() {
        assert_eq!(
            try_evaluate::<f64>("2)", None),
            Err(EvalError::UnexpectedCharacter {
                value: ')',
                index: 1
            })
        );
    }

    #[test]
    fn test_unmatched_bracket() {
        assert_eq!(
            try_evaluate::<f64>("(1+2", None),
            Err(EvalError::UnmatchedBracket {
                open: '(',
                index: 0
            })
        );
    }

    #[test]
    fn test_too_deep() {
        let expression = format!("{}1{}", "(".repeat(400), ")".repeat(400));
        assert_eq!(try_evaluate::<f64>(&expression, None), Err(EvalError::TooDeep));
        assert_eq!(evaluate::<f64>(&expression, None), 0.0);
    }

    #[test]
    fn test_long_power_chain_is_too_deep() {
        let expression = vec!["1"; 20_000].join("^");
        assert_eq!(try_evaluate::<f64>(&expression, None), Err(EvalError::TooDeep));
        assert_eq!(evaluate::<f64>(&expression, None), 0.0);

        let expression = format!("{}1", "-".repeat(20_000));
        assert_eq!(evaluate::<f64>(&expression, None), 0.0);
        assert_eq!(try_evaluate::<f64>("2^2^2^2", None), Ok(65536.0));
    }

    #[test]
    fn test_logarithm_domain() {
        assert_eq!(logarithm(8.0, Some(1.0), false), None);
        assert_eq!(logarithm(-1.0, None, true), None);
        assert_eq!(logarithm(100.0, None, false), Some(2.0));
    }
}
