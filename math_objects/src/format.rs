use evaluator::{Rational, Solution};

/// Goes in front of every result, a fullwidth equals sign.
pub const RESULT_PREFIX: &str = " \u{FF1D} ";

pub fn format_result(value: f64, significant_digits: usize) -> String {
    format!("{RESULT_PREFIX}{}", format_number(value, significant_digits))
}

/// Whole numbers are printed without a decimal point, everything else like C's `%g`.
pub fn format_number(value: f64, significant_digits: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format_general(value, significant_digits.max(1))
}

/// `%.<precision>g`: fixed notation unless the exponent is below -4 or not below the precision.
/// Trailing zeros are dropped.
pub fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i64>() else {
        return scientific;
    };
    let digits = i64::try_from(precision).unwrap_or(i64::MAX);

    if exponent < -4 || exponent >= digits {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction_zeros(mantissa),
            exponent.abs()
        )
    } else {
        let decimals = usize::try_from(digits - 1 - exponent).unwrap_or(0);
        trim_fraction_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// `" ＝ x=5/2, y=1"` for solved systems, `" ＝ No solution"` and the like otherwise.
pub fn format_solution(solution: &Solution<Rational>) -> String {
    if !solution.is_success() {
        return format!("{RESULT_PREFIX}{}", solution.status.message());
    }
    let assignments: Vec<String> = solution
        .solved
        .iter()
        .filter_map(|variable| {
            solution
                .get(*variable)
                .map(|value| format!("{variable}={value}"))
        })
        .collect();
    format!("{RESULT_PREFIX}{}", assignments.join(", "))
}
