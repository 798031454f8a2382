use std::fmt;

use serde::{Deserialize, Serialize};

use crate::anchor::AnchorSpan;

/// Stable handle of an object. Indices change whenever objects are added or removed, ids don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum MathKind {
    Fraction,
    Summation,
    Integral,
    SquareRoot,
    SystemOfEquations,
}

impl MathKind {
    /// How many parts the Tab key cycles through.
    pub fn tab_cycle(&self) -> u8 {
        match self {
            MathKind::Fraction => 2,
            MathKind::SquareRoot => 1,
            MathKind::Summation | MathKind::Integral | MathKind::SystemOfEquations => 3,
        }
    }

    pub fn has_part(&self, slot: PartSlot) -> bool {
        match self {
            MathKind::Fraction | MathKind::SquareRoot => slot != PartSlot::Third,
            MathKind::Summation | MathKind::Integral | MathKind::SystemOfEquations => true,
        }
    }
}

impl fmt::Display for MathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MathKind::Fraction => "fraction",
            MathKind::Summation => "summation",
            MathKind::Integral => "integral",
            MathKind::SquareRoot => "square root",
            MathKind::SystemOfEquations => "system of equations",
        };
        write!(f, "{name}")
    }
}

/// One of the (up to) three editable text slots of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum PartSlot {
    First,
    Second,
    Third,
}

impl PartSlot {
    pub fn number(&self) -> u8 {
        match self {
            PartSlot::First => 1,
            PartSlot::Second => 2,
            PartSlot::Third => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PartSlot::First),
            2 => Some(PartSlot::Second),
            3 => Some(PartSlot::Third),
            _ => None,
        }
    }

    /// The slot after this one, wrapping around after `count` slots.
    pub fn cycle(&self, count: u8) -> Self {
        let next = self.number() % count.max(1) + 1;
        PartSlot::from_number(next).unwrap_or(PartSlot::First)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
#[serde(tag = "type")]
pub enum MathContent {
    Fraction {
        numerator: String,
        denominator: String,
    },
    Summation {
        upper: String,
        lower: String,
        body: String,
    },
    Integral {
        upper: String,
        lower: String,
        integrand: String,
    },
    SquareRoot {
        radicand: String,
        index: String,
    },
    SystemOfEquations {
        equations: [String; 3],
    },
}

impl MathContent {
    pub fn fraction(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        MathContent::Fraction {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    /// What a freshly typed `\sum` starts out as
    pub fn summation() -> Self {
        MathContent::Summation {
            upper: "N".to_string(),
            lower: "i=0".to_string(),
            body: "{}".to_string(),
        }
    }

    /// What a freshly typed `\int` starts out as
    pub fn integral() -> Self {
        MathContent::Integral {
            upper: "b".to_string(),
            lower: "a".to_string(),
            integrand: "{}".to_string(),
        }
    }

    pub fn square_root() -> Self {
        MathContent::SquareRoot {
            radicand: String::new(),
            index: String::new(),
        }
    }

    pub fn system_of_equations() -> Self {
        MathContent::SystemOfEquations {
            equations: Default::default(),
        }
    }

    pub fn kind(&self) -> MathKind {
        match self {
            MathContent::Fraction { .. } => MathKind::Fraction,
            MathContent::Summation { .. } => MathKind::Summation,
            MathContent::Integral { .. } => MathKind::Integral,
            MathContent::SquareRoot { .. } => MathKind::SquareRoot,
            MathContent::SystemOfEquations { .. } => MathKind::SystemOfEquations,
        }
    }

    pub fn part(&self, slot: PartSlot) -> Option<&str> {
        let part = match (self, slot) {
            (MathContent::Fraction { numerator, .. }, PartSlot::First) => numerator,
            (MathContent::Fraction { denominator, .. }, PartSlot::Second) => denominator,
            (MathContent::Summation { upper, .. }, PartSlot::First) => upper,
            (MathContent::Summation { lower, .. }, PartSlot::Second) => lower,
            (MathContent::Summation { body, .. }, PartSlot::Third) => body,
            (MathContent::Integral { upper, .. }, PartSlot::First) => upper,
            (MathContent::Integral { lower, .. }, PartSlot::Second) => lower,
            (MathContent::Integral { integrand, .. }, PartSlot::Third) => integrand,
            (MathContent::SquareRoot { radicand, .. }, PartSlot::First) => radicand,
            (MathContent::SquareRoot { index, .. }, PartSlot::Second) => index,
            (MathContent::SystemOfEquations { equations }, slot) => {
                &equations[usize::from(slot.number() - 1)]
            }
            _ => return None,
        };
        Some(part.as_str())
    }

    pub fn part_mut(&mut self, slot: PartSlot) -> Option<&mut String> {
        match (self, slot) {
            (MathContent::Fraction { numerator, .. }, PartSlot::First) => Some(numerator),
            (MathContent::Fraction { denominator, .. }, PartSlot::Second) => Some(denominator),
            (MathContent::Summation { upper, .. }, PartSlot::First) => Some(upper),
            (MathContent::Summation { lower, .. }, PartSlot::Second) => Some(lower),
            (MathContent::Summation { body, .. }, PartSlot::Third) => Some(body),
            (MathContent::Integral { upper, .. }, PartSlot::First) => Some(upper),
            (MathContent::Integral { lower, .. }, PartSlot::Second) => Some(lower),
            (MathContent::Integral { integrand, .. }, PartSlot::Third) => Some(integrand),
            (MathContent::SquareRoot { radicand, .. }, PartSlot::First) => Some(radicand),
            (MathContent::SquareRoot { index, .. }, PartSlot::Second) => Some(index),
            (MathContent::SystemOfEquations { equations }, slot) => {
                Some(&mut equations[usize::from(slot.number() - 1)])
            }
            _ => None,
        }
    }

    /// An object is blank when the parts that carry its meaning hold nothing.
    /// Placeholders like `{}` count as nothing.
    pub fn is_blank(&self) -> bool {
        fn empty(text: &str) -> bool {
            strip_braces(text).trim().is_empty()
        }
        match self {
            MathContent::Fraction {
                numerator,
                denominator,
            } => numerator.is_empty() && denominator.is_empty(),
            MathContent::Summation { body, .. } => empty(body),
            MathContent::Integral { integrand, .. } => empty(integrand),
            MathContent::SquareRoot { radicand, .. } => empty(radicand),
            MathContent::SystemOfEquations { equations } => {
                equations.iter().all(|equation| empty(equation))
            }
        }
    }

    /// The width in characters that the widest part of a fraction needs
    pub fn fraction_width(&self) -> Option<usize> {
        match self {
            MathContent::Fraction {
                numerator,
                denominator,
            } => Some(numerator.chars().count().max(denominator.chars().count())),
            _ => None,
        }
    }
}

/// Removes one pair of outer `{}`, if there is one.
pub fn strip_braces(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(trimmed)
}

/// A math object, anchored to a run of filler characters in the host buffer.
///
/// The anchor can only be changed through the [`crate::store::MathObjectStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct MathObject {
    pub(crate) id: ObjectId,
    pub(crate) content: MathContent,
    pub(crate) anchor: AnchorSpan,
    /// The last calculated result, already formatted
    #[serde(default)]
    pub(crate) result_text: Option<String>,
}

impl MathObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn content(&self) -> &MathContent {
        &self.content
    }

    pub fn kind(&self) -> MathKind {
        self.content.kind()
    }

    pub fn anchor(&self) -> AnchorSpan {
        self.anchor
    }

    pub fn part(&self, slot: PartSlot) -> Option<&str> {
        self.content.part(slot)
    }

    pub fn result_text(&self) -> Option<&str> {
        self.result_text.as_deref()
    }
}
