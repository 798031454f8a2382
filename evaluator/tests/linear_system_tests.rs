use approx::assert_relative_eq;
use evaluator::{solve, Rational, SolveStatus, Variable};

fn int(value: i64) -> Rational {
    Rational::from_integer(value)
}

#[test]
fn test_two_by_two() {
    let solution = solve::<Rational, _>(&["x+y=5", "x-y=1"]);
    assert_eq!(solution.status, SolveStatus::Success);
    assert_eq!(solution.get(Variable::X), Some(int(3)));
    assert_eq!(solution.get(Variable::Y), Some(int(2)));
    assert_eq!(solution.get(Variable::Z), Some(int(0)));
    assert_eq!(solution.solved, vec![Variable::X, Variable::Y]);
}

#[test]
fn test_two_by_two_float() {
    let solution = solve::<f64, _>(&["2x+3y=10", "4x-5y=1"]);
    assert_eq!(solution.status, SolveStatus::Success);
    assert_relative_eq!(solution.values[&Variable::X], 53.0 / 22.0, epsilon = 1e-9);
    assert_relative_eq!(solution.values[&Variable::Y], 19.0 / 11.0, epsilon = 1e-9);
}

#[test]
fn test_exact_fractions() {
    let solution = solve::<Rational, _>(&["2x+3y=10", "4x-5y=1"]);
    assert_eq!(solution.get(Variable::X), Some(Rational::new(53, 22).unwrap()));
    assert_eq!(solution.get(Variable::Y), Some(Rational::new(19, 11).unwrap()));

    let solution = solve::<Rational, _>(&["2x+4y=9", "x-y=0"]);
    assert_eq!(solution.get(Variable::X), Some(Rational::new(3, 2).unwrap()));
    assert_eq!(solution.get(Variable::Y), Some(Rational::new(3, 2).unwrap()));
}

#[test]
fn test_trivial_zero_solution() {
    let solution = solve::<Rational, _>(&["2x-14y=0", "8x+9y=0"]);
    assert_eq!(solution.status, SolveStatus::Success);
    assert_eq!(solution.get(Variable::X), Some(int(0)));
    assert_eq!(solution.get(Variable::Y), Some(int(0)));
}

#[test]
fn test_parallel_lines() {
    assert_eq!(
        solve::<Rational, _>(&["x+y=3", "x+y=5"]).status,
        SolveStatus::NoSolution
    );
    assert_eq!(
        solve::<Rational, _>(&["2x+2y=4", "x+y=2"]).status,
        SolveStatus::InfiniteSolutions
    );
    assert_eq!(
        solve::<f64, _>(&["x+y=3", "x+y=5"]).status,
        SolveStatus::NoSolution
    );
    assert_eq!(
        solve::<f64, _>(&["2x+2y=4", "x+y=2"]).status,
        SolveStatus::InfiniteSolutions
    );
}

#[test]
fn test_variable_selection() {
    let solution = solve::<Rational, _>(&["x+z=4", "x-z=2"]);
    assert_eq!(solution.status, SolveStatus::Success);
    assert_eq!(solution.get(Variable::X), Some(int(3)));
    assert_eq!(solution.get(Variable::Z), Some(int(1)));
    assert_eq!(solution.solved, vec![Variable::X, Variable::Z]);

    let solution = solve::<Rational, _>(&["y+z=4", "y-z=2"]);
    assert_eq!(solution.get(Variable::Y), Some(int(3)));
    assert_eq!(solution.get(Variable::Z), Some(int(1)));

    let solution = solve::<Rational, _>(&["2x=6", "3y=9"]);
    assert_eq!(solution.get(Variable::X), Some(int(3)));
    assert_eq!(solution.get(Variable::Y), Some(int(3)));

    // Only z appears, so x and y stay free
    assert_eq!(
        solve::<Rational, _>(&["2z=4", "z=2"]).status,
        SolveStatus::InfiniteSolutions
    );

    // With all three variables present, x and y are solved and z is left out
    let solution = solve::<Rational, _>(&["x+y+z=1", "x-y=0"]);
    assert_eq!(solution.status, SolveStatus::Success);
    let half = Rational::new(1, 2).unwrap();
    assert_eq!(solution.get(Variable::X), Some(half));
    assert_eq!(solution.get(Variable::Y), Some(half));
    assert_eq!(solution.get(Variable::Z), Some(int(0)));
    assert_eq!(solution.solved, vec![Variable::X, Variable::Y]);
}

#[test]
fn test_three_by_three() {
    let solution = solve::<Rational, _>(&["x+y+z=6", "x-y+z=2", "2x+y-z=1"]);
    assert_eq!(solution.status, SolveStatus::Success);
    assert_eq!(solution.get(Variable::X), Some(int(1)));
    assert_eq!(solution.get(Variable::Y), Some(int(2)));
    assert_eq!(solution.get(Variable::Z), Some(int(3)));

    let solution = solve::<f64, _>(&["x+y+z=6", "2y+5z=-4", "2x+5y-z=27"]);
    assert_eq!(solution.status, SolveStatus::Success);
    assert_relative_eq!(solution.values[&Variable::X], 5.0, epsilon = 1e-9);
    assert_relative_eq!(solution.values[&Variable::Y], 3.0, epsilon = 1e-9);
    assert_relative_eq!(solution.values[&Variable::Z], -2.0, epsilon = 1e-9);
}

#[test]
fn test_three_by_three_singular() {
    assert_eq!(
        solve::<Rational, _>(&["x+y+z=1", "2x+2y+2z=2", "x-y=0"]).status,
        SolveStatus::NoSolution
    );
}

#[test]
fn test_single_equation() {
    let solution = solve::<Rational, _>(&["3x=12"]);
    assert_eq!(solution.status, SolveStatus::Success);
    assert_eq!(solution.get(Variable::X), Some(int(4)));
    assert_eq!(solution.solved, vec![Variable::X]);

    let solution = solve::<Rational, _>(&["3x=1"]);
    assert_eq!(solution.get(Variable::X), Some(Rational::new(1, 3).unwrap()));

    assert_eq!(
        solve::<Rational, _>(&["x+2y=5"]).status,
        SolveStatus::Underdetermined
    );
}

#[test]
fn test_status_edges() {
    let no_equations: [&str; 0] = [];
    assert_eq!(
        solve::<Rational, _>(&no_equations).status,
        SolveStatus::NoEquations
    );
    assert_eq!(
        solve::<Rational, _>(&["x+y=5", "x-y=1", "2x+3y=13", "3x-2y=4"]).status,
        SolveStatus::TooManyEquations
    );
    assert_eq!(
        solve::<Rational, _>(&["x+y=5", "x-y"]).status,
        SolveStatus::ParseError
    );
}

#[test]
fn test_constants_on_both_sides() {
    let solution = solve::<Rational, _>(&["x + 1 = y", "x + y = 5"]);
    assert_eq!(solution.get(Variable::X), Some(int(2)));
    assert_eq!(solution.get(Variable::Y), Some(int(3)));
}
