pub mod editable;

use serde::{Deserialize, Serialize};

/// A change to the host text buffer, in character offsets.
///
/// A list of edits is applied in order, each one to the buffer that the previous one left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum BufferEdit {
    Insert {
        offset: i64,
        text: String,
    },
    Delete {
        /// Deletes to the right of the offset
        offset: i64,
        len: i64,
    },
}

impl BufferEdit {
    pub fn insert(offset: i64, text: impl Into<String>) -> Self {
        BufferEdit::Insert {
            offset,
            text: text.into(),
        }
    }

    pub fn delete(offset: i64, len: i64) -> Self {
        BufferEdit::Delete { offset, len }
    }

    pub fn offset(&self) -> i64 {
        match self {
            BufferEdit::Insert { offset, .. } => *offset,
            BufferEdit::Delete { offset, .. } => *offset,
        }
    }

    /// How much longer the buffer gets
    pub fn length_delta(&self) -> i64 {
        match self {
            BufferEdit::Insert { text, .. } => {
                i64::try_from(text.chars().count()).unwrap_or(i64::MAX)
            }
            BufferEdit::Delete { len, .. } => -len,
        }
    }
}
