use math_objects::editing::BufferEdit;
use serde::{Deserialize, Serialize};

/// What the host has to do after handing an input to the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct EditorAction {
    /// Buffer edits in the order they have to be applied. The object store already accounts for them.
    pub edits: Vec<BufferEdit>,
    /// Where the caret goes, before any default handling
    pub caret_after: Option<i64>,
    /// When false, the host handles the input itself and reports the change with `buffer_changed`.
    pub handled: bool,
}

impl EditorAction {
    pub fn unhandled() -> Self {
        Default::default()
    }
}

/// A selection in the host buffer. `end` is where the caret is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct Selection {
    pub start: i64,
    pub end: i64,
}

impl Selection {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn collapsed(caret: i64) -> Self {
        Self::new(caret, caret)
    }

    pub fn caret(&self) -> i64 {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn min(&self) -> i64 {
        self.start.min(self.end)
    }

    pub fn max(&self) -> i64 {
        self.start.max(self.end)
    }

    pub fn len(&self) -> i64 {
        self.max() - self.min()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum EditorKey {
    Backspace,
    Delete,
    Enter,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

impl EditorKey {
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            EditorKey::Left
                | EditorKey::Right
                | EditorKey::Up
                | EditorKey::Down
                | EditorKey::Home
                | EditorKey::End
                | EditorKey::PageUp
                | EditorKey::PageDown
        )
    }
}
