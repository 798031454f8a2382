use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    equation::{parse_equation, LinearRow},
    expression::EvalError,
    number::Number,
};

/// Systems with more equations than this are rejected.
pub const MAX_EQUATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum Variable {
    X,
    Y,
    Z,
}

impl Variable {
    pub const ALL: [Variable; 3] = [Variable::X, Variable::Y, Variable::Z];

    pub fn name(self) -> &'static str {
        match self {
            Variable::X => "x",
            Variable::Y => "y",
            Variable::Z => "z",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(value), None) => Self::from_char(value),
            _ => None,
        }
    }

    pub fn from_char(value: char) -> Option<Self> {
        match value {
            'x' => Some(Variable::X),
            'y' => Some(Variable::Y),
            'z' => Some(Variable::Z),
            _ => None,
        }
    }

    pub fn column(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The only channel through which the solver reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum SolveStatus {
    Success,
    InfiniteSolutions,
    NoSolution,
    NoEquations,
    ParseError,
    Underdetermined,
    TooManyEquations,
}

impl SolveStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SolveStatus::Success => "Solved",
            SolveStatus::InfiniteSolutions => "Infinite solutions",
            SolveStatus::NoSolution => "No solution",
            SolveStatus::NoEquations => "No equations",
            SolveStatus::ParseError => "Parse error",
            SolveStatus::Underdetermined => "Underdetermined",
            SolveStatus::TooManyEquations => "Too many equations (max 3)",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution<N> {
    pub status: SolveStatus,
    /// On success, contains every variable. Variables that do not occur are 0.
    pub values: BTreeMap<Variable, N>,
    /// The variables that the system determines, in x, y, z order
    pub solved: Vec<Variable>,
}

impl<N: Number> Solution<N> {
    fn failed(status: SolveStatus) -> Self {
        Self {
            status,
            values: BTreeMap::new(),
            solved: Vec::new(),
        }
    }

    fn success(assigned: &[(Variable, N)]) -> Self {
        let mut values: BTreeMap<Variable, N> =
            Variable::ALL.iter().map(|variable| (*variable, N::zero())).collect();
        values.extend(assigned.iter().copied());
        let mut solved: Vec<Variable> = assigned.iter().map(|(variable, _)| *variable).collect();
        solved.sort();
        Self {
            status: SolveStatus::Success,
            values,
            solved,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SolveStatus::Success
    }

    pub fn get(&self, variable: Variable) -> Option<N> {
        self.values.get(&variable).copied()
    }
}

/// Solves up to three linear equations in `x`, `y` and `z` with Cramer's rule.
///
/// Use `N = Rational` for exact results and `N = f64` for approximate ones.
pub fn solve<N: Number, S: AsRef<str>>(equations: &[S]) -> Solution<N> {
    if equations.is_empty() {
        return Solution::failed(SolveStatus::NoEquations);
    }
    if equations.len() > MAX_EQUATIONS {
        return Solution::failed(SolveStatus::TooManyEquations);
    }

    let mut rows = Vec::with_capacity(equations.len());
    for equation in equations {
        match parse_equation::<N>(equation.as_ref()) {
            Ok(row) => rows.push(row),
            Err(err) => {
                log::debug!("could not parse equation: {err}");
                return Solution::failed(SolveStatus::ParseError);
            }
        }
    }

    let result = match rows.as_slice() {
        [row] => solve_single(row),
        [first, second] => solve_pair(first, second),
        [first, second, third] => solve_triple(first, second, third),
        _ => Ok(Solution::failed(SolveStatus::TooManyEquations)),
    };
    result.unwrap_or_else(|err| {
        log::warn!("solving the linear system failed: {err}");
        Solution::failed(SolveStatus::ParseError)
    })
}

fn solve_single<N: Number>(row: &LinearRow<N>) -> Result<Solution<N>, EvalError> {
    let mentioned: Vec<Variable> = Variable::ALL
        .into_iter()
        .filter(|variable| row.mentions(*variable))
        .collect();
    match mentioned.as_slice() {
        [variable] => {
            let value = row.constant.div(row.coefficient(*variable))?;
            Ok(Solution::success(&[(*variable, value)]))
        }
        _ => Ok(Solution::failed(SolveStatus::Underdetermined)),
    }
}

fn solve_pair<N: Number>(
    first: &LinearRow<N>,
    second: &LinearRow<N>,
) -> Result<Solution<N>, EvalError> {
    let present = |variable: Variable| first.mentions(variable) || second.mentions(variable);
    let (x, y, z) = (
        present(Variable::X),
        present(Variable::Y),
        present(Variable::Z),
    );
    let columns = match (x, y, z) {
        (false, false, true) => (Variable::Z, None),
        (true, false, true) => (Variable::X, Some(Variable::Z)),
        (false, true, true) => (Variable::Y, Some(Variable::Z)),
        _ => (Variable::X, Some(Variable::Y)),
    };

    let column = |row: &LinearRow<N>, variable: Option<Variable>| {
        variable.map_or(N::zero(), |variable| row.coefficient(variable))
    };
    let (a1, b1, d1) = (
        column(first, Some(columns.0)),
        column(first, columns.1),
        first.constant,
    );
    let (a2, b2, d2) = (
        column(second, Some(columns.0)),
        column(second, columns.1),
        second.constant,
    );

    let determinant = determinant2(a1, b1, a2, b2)?;
    let first_numerator = determinant2(d1, b1, d2, b2)?;
    let second_numerator = determinant2(a1, d1, a2, d2)?;

    if determinant.is_negligible() {
        // Parallel lines: either the same line, or they never meet
        let status = if first_numerator.is_negligible() && second_numerator.is_negligible() {
            SolveStatus::InfiniteSolutions
        } else {
            SolveStatus::NoSolution
        };
        return Ok(Solution::failed(status));
    }

    let mut assigned = vec![(columns.0, first_numerator.div(determinant)?)];
    if let Some(variable) = columns.1 {
        assigned.push((variable, second_numerator.div(determinant)?));
    }
    Ok(Solution::success(&assigned))
}

fn solve_triple<N: Number>(
    first: &LinearRow<N>,
    second: &LinearRow<N>,
    third: &LinearRow<N>,
) -> Result<Solution<N>, EvalError> {
    let matrix = [
        first.coefficients,
        second.coefficients,
        third.coefficients,
    ];
    let constants = [first.constant, second.constant, third.constant];

    let determinant = determinant3(&matrix)?;
    if determinant.is_negligible() {
        // No unique solution. Reducing to a smaller system is not attempted.
        return Ok(Solution::failed(SolveStatus::NoSolution));
    }

    let mut assigned = Vec::with_capacity(3);
    for variable in Variable::ALL {
        let mut replaced = matrix;
        for (row, constant) in replaced.iter_mut().zip(constants) {
            row[variable.column()] = constant;
        }
        let value = determinant3(&replaced)?.div(determinant)?;
        assigned.push((variable, value));
    }
    Ok(Solution::success(&assigned))
}

/// `| a b |`
/// `| c d |`
fn determinant2<N: Number>(a: N, b: N, c: N, d: N) -> Result<N, EvalError> {
    a.mul(d)?.sub(b.mul(c)?)
}

fn determinant3<N: Number>(m: &[[N; 3]; 3]) -> Result<N, EvalError> {
    let minor0 = determinant2(m[1][1], m[1][2], m[2][1], m[2][2])?;
    let minor1 = determinant2(m[1][0], m[1][2], m[2][0], m[2][2])?;
    let minor2 = determinant2(m[1][0], m[1][1], m[2][0], m[2][1])?;
    m[0][0]
        .mul(minor0)?
        .sub(m[0][1].mul(minor1)?)?
        .add(m[0][2].mul(minor2)?)
}
