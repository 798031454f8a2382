use thiserror::Error;

use crate::{
    expression::{try_evaluate, Binding, EvalError},
    linear_system::Variable,
    number::Number,
    scanner::identifiers,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquationError {
    #[error("equation {0:?} has no '='")]
    MissingEquals(String),
    #[error("equation {0:?} has more than one '='")]
    MultipleEquals(String),
    #[error("term {0:?} is not linear")]
    NonLinearTerm(String),
    #[error("term {term:?} could not be evaluated")]
    InvalidTerm {
        term: String,
        #[source]
        source: EvalError,
    },
}

/// `a·x + b·y + c·z = d`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRow<N> {
    pub coefficients: [N; 3],
    pub constant: N,
}

impl<N: Number> LinearRow<N> {
    pub fn zero() -> Self {
        Self {
            coefficients: [N::zero(); 3],
            constant: N::zero(),
        }
    }

    pub fn coefficient(&self, variable: Variable) -> N {
        self.coefficients[variable.column()]
    }

    /// Whether the variable has a non-zero coefficient
    pub fn mentions(&self, variable: Variable) -> bool {
        !self.coefficient(variable).is_negligible()
    }
}

/// A term of a sum, with the sign that was in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTerm {
    pub negative: bool,
    pub text: String,
}

/// Parses `left = right` into a row. Terms of the right side are moved to the left,
/// constants of the left side are moved to the right.
pub fn parse_equation<N: Number>(equation: &str) -> Result<LinearRow<N>, EquationError> {
    let mut sides = equation.split('=');
    let (left, right) = match (sides.next(), sides.next(), sides.next()) {
        (Some(left), Some(right), None) => (left, right),
        (_, None, _) => return Err(EquationError::MissingEquals(equation.to_string())),
        _ => return Err(EquationError::MultipleEquals(equation.to_string())),
    };

    let mut row: LinearRow<N> = LinearRow::zero();
    for (side, side_negative) in [(left, false), (right, true)] {
        for term in split_terms(side)? {
            let (variable, coefficient, constant) = analyze_term::<N>(&term.text)?;
            let negative = term.negative != side_negative;
            let signed = |value: N| if negative { value.neg() } else { Ok(value) };
            let wrap = |source: EvalError| EquationError::InvalidTerm {
                term: term.text.clone(),
                source,
            };
            if let Some(variable) = variable {
                let column = variable.column();
                row.coefficients[column] = row.coefficients[column]
                    .add(signed(coefficient).map_err(wrap)?)
                    .map_err(wrap)?;
            }
            row.constant = row
                .constant
                .sub(signed(constant).map_err(wrap)?)
                .map_err(wrap)?;
        }
    }
    Ok(row)
}

/// Splits a side of an equation at the top level `+` and `-` signs.
/// Signs directly after `*`, `/`, `^` or `_` belong to the term, like in `2*-3x`.
pub fn split_terms(side: &str) -> Result<Vec<SignedTerm>, EquationError> {
    let mut terms = Vec::new();
    let mut current = SignedTerm {
        negative: false,
        text: String::new(),
    };
    let mut depth: usize = 0;
    let mut previous: Option<char> = None;

    for value in side.chars() {
        match value {
            '(' | '{' => depth += 1,
            ')' | '}' => depth = depth.saturating_sub(1),
            '+' | '-' if depth == 0 => {
                let starts_term = current.text.trim().is_empty();
                let after_operator = matches!(previous, Some('*' | '/' | '^' | '_'));
                if starts_term {
                    if value == '-' {
                        current.negative = !current.negative;
                    }
                    previous = Some(value);
                    continue;
                }
                if !after_operator {
                    terms.push(std::mem::replace(
                        &mut current,
                        SignedTerm {
                            negative: value == '-',
                            text: String::new(),
                        },
                    ));
                    previous = Some(value);
                    continue;
                }
            }
            _ => (),
        }
        current.text.push(value);
        if !value.is_whitespace() {
            previous = Some(value);
        }
    }

    if current.text.trim().is_empty() {
        // A dangling sign, like in "x+"
        if previous.is_some_and(|value| value == '+' || value == '-') {
            return Err(EquationError::InvalidTerm {
                term: side.to_string(),
                source: EvalError::UnexpectedEnd,
            });
        }
    } else {
        terms.push(current);
    }
    Ok(terms)
}

/// Returns the variable of a term, its coefficient and its constant part.
///
/// The term is evaluated as `f(v)` with the variable bound. The coefficient is `f(1) - f(0)`
/// and the constant is `f(0)`. Terms with more than one variable, or where `f` is not linear, are rejected.
fn analyze_term<N: Number>(text: &str) -> Result<(Option<Variable>, N, N), EquationError> {
    let wrap = |source: EvalError| EquationError::InvalidTerm {
        term: text.to_string(),
        source,
    };

    let mut variable = None;
    for identifier in identifiers(text) {
        match Variable::from_name(&identifier) {
            Some(found) if variable.is_some_and(|known| known != found) => {
                return Err(EquationError::NonLinearTerm(text.to_string()))
            }
            Some(found) => variable = Some(found),
            // Products written without an operator, like "xy"
            None if identifier.chars().all(|c| Variable::from_char(c).is_some()) => {
                return Err(EquationError::NonLinearTerm(text.to_string()))
            }
            None => (),
        }
    }

    let Some(variable) = variable else {
        let constant = try_evaluate::<N>(text, None).map_err(wrap)?;
        return Ok((None, N::zero(), constant));
    };

    let at = |value: i64| {
        try_evaluate(text, Some(Binding::new(variable.name(), N::from_integer(value))))
            .map_err(wrap)
    };
    let (at_zero, at_one, at_two) = (at(0)?, at(1)?, at(2)?);
    let coefficient = at_one.sub(at_zero).map_err(wrap)?;
    let doubled = at_two.sub(at_zero).map_err(wrap)?;
    if !doubled.approx_eq(coefficient.add(coefficient).map_err(wrap)?) {
        return Err(EquationError::NonLinearTerm(text.to_string()));
    }
    Ok((Some(variable), coefficient, at_zero))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::Rational;

    fn term(negative: bool, text: &str) -> SignedTerm {
        SignedTerm {
            negative,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_split_terms() {
        assert_eq!(
            split_terms("2x - 3y+z").unwrap(),
            vec![term(false, "2x "), term(true, " 3y"), term(false, "z")]
        );
        assert_eq!(
            split_terms("-x+(y-1)").unwrap(),
            vec![term(true, "x"), term(false, "(y-1)")]
        );
        assert_eq!(split_terms("2*-3x").unwrap(), vec![term(false, "2*-3x")]);
        assert_eq!(split_terms("").unwrap(), vec![]);
        assert!(split_terms("x+").is_err());
    }

    #[test]
    fn test_parse_equation_moves_terms() {
        let row = parse_equation::<Rational>("2x + 3 = y - 1").unwrap();
        assert_eq!(
            row.coefficients,
            [
                Rational::from_integer(2),
                Rational::from_integer(-1),
                Rational::ZERO
            ]
        );
        assert_eq!(row.constant, Rational::from_integer(-4));
    }

    #[test]
    fn test_parse_equation_fractional_coefficient() {
        let row = parse_equation::<Rational>("3/4x + x/2 = 5").unwrap();
        assert_eq!(row.coefficients[0], Rational::new(5, 4).unwrap());
        assert_eq!(row.constant, Rational::from_integer(5));
    }

    #[test]
    fn test_parse_equation_bracketed_term() {
        let row = parse_equation::<f64>("2(x+1) = 6").unwrap();
        assert_eq!(row.coefficients, [2.0, 0.0, 0.0]);
        assert_eq!(row.constant, 4.0);
    }

    #[test]
    fn test_parse_equation_errors() {
        assert!(matches!(
            parse_equation::<f64>("x+y"),
            Err(EquationError::MissingEquals(_))
        ));
        assert!(matches!(
            parse_equation::<f64>("x=1=2"),
            Err(EquationError::MultipleEquals(_))
        ));
        assert!(matches!(
            parse_equation::<f64>("xy=2"),
            Err(EquationError::NonLinearTerm(_))
        ));
        assert!(matches!(
            parse_equation::<f64>("x^2=4"),
            Err(EquationError::NonLinearTerm(_))
        ));
        assert!(matches!(
            parse_equation::<f64>("x(y+1)=4"),
            Err(EquationError::NonLinearTerm(_))
        ));
    }
}
