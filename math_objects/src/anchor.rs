use serde::{Deserialize, Serialize};

/// The run of buffer characters that a math object occupies, `[start, start + len)`.
///
/// Offsets are signed so that a shift can push a span below zero, which is how the
/// store detects that the text in front of an object was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct AnchorSpan {
    pub start: i64,
    pub len: i64,
}

impl AnchorSpan {
    pub fn new(start: i64, len: i64) -> Self {
        Self { start, len }
    }

    /// Exclusive
    pub fn end(&self) -> i64 {
        self.start + self.len
    }

    pub fn contains(&self, offset: i64) -> bool {
        self.start <= offset && offset < self.end()
    }

    /// Half-open overlap test
    pub fn intersects(&self, start: i64, end: i64) -> bool {
        !(end <= self.start || start >= self.end())
    }

    pub fn overlaps(&self, other: &AnchorSpan) -> bool {
        self.intersects(other.start, other.end())
    }
}
