use serde::{Deserialize, Serialize};

use crate::math_object::MathKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
#[serde(default)]
pub struct EngineSettings {
    /// Width of the filler run that replaces `\sum`, `\int`, `\sys` and `\sqrt`
    pub command_anchor_len: i64,
    pub min_fraction_width: i64,
    /// Subintervals of the trapezoid rule
    pub integral_steps: u32,
    /// Summations with more terms than this evaluate to 0
    pub max_summation_terms: u64,
    pub significant_digits: usize,
    pub fraction_filler: char,
    pub command_filler: char,
}

impl EngineSettings {
    pub fn new() -> Self {
        Self {
            command_anchor_len: 5,
            min_fraction_width: 3,
            integral_steps: 200,
            max_summation_terms: 200,
            significant_digits: 3,
            fraction_filler: '\u{2500}',
            command_filler: '\u{00A0}',
        }
    }

    pub fn filler(&self, kind: MathKind) -> char {
        match kind {
            MathKind::Fraction => self.fraction_filler,
            _ => self.command_filler,
        }
    }

    /// The shortest span an object of this kind may have
    pub fn min_anchor_len(&self, kind: MathKind) -> i64 {
        match kind {
            MathKind::Fraction => self.min_fraction_width.max(1),
            _ => 1,
        }
    }

    /// Span of a fraction whose widest part has `width` characters
    pub fn fraction_anchor_len(&self, width: usize) -> i64 {
        let width = i64::try_from(width).unwrap_or(i64::MAX);
        width.max(self.min_fraction_width)
    }

    pub fn filler_text(&self, kind: MathKind, len: i64) -> String {
        let len = usize::try_from(len).unwrap_or_default();
        std::iter::repeat(self.filler(kind)).take(len).collect()
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new()
    }
}
