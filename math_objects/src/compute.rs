//! Results of math objects. Parts are evaluated in floating point, systems of equations exactly.

use evaluator::{evaluate, scanner::is_identifier, solve, Binding, Rational};

use crate::{
    format::{format_result, format_solution},
    math_object::{strip_braces, MathContent},
    settings::EngineSettings,
};

pub const DEFAULT_SUMMATION_VARIABLE: &str = "i";
pub const DEFAULT_INTEGRATION_VARIABLE: &str = "x";

/// The numeric value of an object. Systems of equations have none and yield 0,
/// as does anything that is undefined.
pub fn compute_result(content: &MathContent, settings: &EngineSettings) -> f64 {
    let value = match content {
        MathContent::Fraction {
            numerator,
            denominator,
        } => fraction(numerator, denominator),
        MathContent::Summation { upper, lower, body } => {
            summation(upper, lower, body, settings.max_summation_terms)
        }
        MathContent::Integral {
            upper,
            lower,
            integrand,
        } => integral(upper, lower, integrand, settings.integral_steps),
        MathContent::SquareRoot { radicand, index } => nth_root(radicand, index),
        MathContent::SystemOfEquations { .. } => 0.0,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Solves a system of equations exactly and formats the outcome.
/// Empty equations are skipped. `None` for every other kind of object.
pub fn compute_system_result(content: &MathContent) -> Option<String> {
    let MathContent::SystemOfEquations { equations } = content else {
        return None;
    };
    let equations: Vec<&str> = equations
        .iter()
        .map(|equation| equation.trim())
        .filter(|equation| !equation.is_empty())
        .collect();
    let solution = solve::<Rational, _>(&equations);
    Some(format_solution(&solution))
}

/// The text that is shown after an object
pub fn result_text(content: &MathContent, settings: &EngineSettings) -> String {
    compute_system_result(content).unwrap_or_else(|| {
        format_result(
            compute_result(content, settings),
            settings.significant_digits,
        )
    })
}

fn value_of(text: &str) -> f64 {
    evaluate::<f64>(text, None)
}

fn fraction(numerator: &str, denominator: &str) -> f64 {
    if denominator.trim().is_empty() {
        return 0.0;
    }
    let denominator = value_of(denominator);
    if denominator == 0.0 {
        return 0.0;
    }
    value_of(numerator) / denominator
}

/// Parses `[var=]value`, like `i=0` or `k = 2`. The variable defaults to `i`.
pub fn parse_lower_limit(text: &str) -> Option<(String, f64)> {
    let (variable, value) = match text.split_once('=') {
        Some((variable, value)) => (variable.trim(), value),
        None => ("", text),
    };
    if value.trim().is_empty() {
        return None;
    }
    let variable = match variable {
        "" => DEFAULT_SUMMATION_VARIABLE,
        variable if is_identifier(variable) => variable,
        _ => return None,
    };
    Some((variable.to_string(), value_of(value)))
}

fn summation(upper: &str, lower: &str, body: &str, max_terms: u64) -> f64 {
    let Some((variable, start)) = parse_lower_limit(lower) else {
        return 0.0;
    };
    let end = value_of(upper);
    if !start.is_finite() || !end.is_finite() || end < start {
        return 0.0;
    }
    let terms = (end - start).floor() + 1.0;
    if terms > max_terms as f64 {
        log::debug!("summation over {terms} terms exceeds the limit of {max_terms}");
        return 0.0;
    }

    // A float index stops advancing above 2^53
    let mut sum = 0.0;
    for step in 0..terms as u64 {
        let index = start + step as f64;
        sum += evaluate(body, Some(Binding::new(&variable, index)));
    }
    sum
}

/// Splits `f(t) dt` into the integrand and the variable of integration.
/// Outer braces are removed first. Without a trailing ` d<var>` the variable is `x`.
pub fn split_integrand(text: &str) -> (&str, &str) {
    let body = strip_braces(text);
    if let Some(position) = body.rfind(" d") {
        let variable = body[position + 2..].trim();
        if is_identifier(variable) {
            return (&body[..position], variable);
        }
    }
    (body, DEFAULT_INTEGRATION_VARIABLE)
}

/// Composite trapezoid rule
fn integral(upper: &str, lower: &str, integrand: &str, steps: u32) -> f64 {
    let (a, b) = (value_of(lower), value_of(upper));
    let (expression, variable) = split_integrand(integrand);
    let steps = steps.max(1);
    let dx = (b - a) / f64::from(steps);
    let f = |x: f64| evaluate(expression, Some(Binding::new(variable, x)));

    let mut sum = (f(a) + f(b)) / 2.0;
    for step in 1..steps {
        sum += f(a + f64::from(step) * dx);
    }
    sum * dx
}

fn nth_root(radicand: &str, index: &str) -> f64 {
    let value = value_of(radicand);
    let index = index.trim();
    if index.is_empty() || index == "2" {
        return if value < 0.0 { 0.0 } else { value.sqrt() };
    }
    let n = value_of(index);
    if n == 0.0 {
        return 0.0;
    }
    if value < 0.0 {
        // Only odd roots of negative numbers are real
        let odd = n.fract() == 0.0 && n.rem_euclid(2.0) == 1.0;
        return if odd { -(-value).powf(1.0 / n) } else { 0.0 };
    }
    value.powf(1.0 / n)
}
