pub mod equation;
pub mod expression;
pub mod linear_system;
pub mod number;
pub mod rational;
pub mod scanner;

pub use expression::{evaluate, try_evaluate, Binding, EvalError};
pub use linear_system::{solve, Solution, SolveStatus, Variable};
pub use number::Number;
pub use rational::{ArithmeticError, Rational};
