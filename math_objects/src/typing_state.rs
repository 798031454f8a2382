use serde::{Deserialize, Serialize};

use crate::math_object::{ObjectId, PartSlot};

/// Whether keystrokes go to the host buffer or into a part of a math object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
#[serde(tag = "state")]
pub enum TypingState {
    #[default]
    Idle,
    Editing {
        object: ObjectId,
        part: PartSlot,
    },
}

impl TypingState {
    pub fn is_editing(&self) -> bool {
        matches!(self, TypingState::Editing { .. })
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        match self {
            TypingState::Idle => None,
            TypingState::Editing { object, .. } => Some(*object),
        }
    }

    pub fn active_part(&self) -> Option<PartSlot> {
        match self {
            TypingState::Idle => None,
            TypingState::Editing { part, .. } => Some(*part),
        }
    }
}
