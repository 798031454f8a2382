pub mod anchor;
pub mod compute;
pub mod editing;
pub mod format;
pub mod math_object;
pub mod settings;
pub mod store;
pub mod typing_state;

pub use anchor::AnchorSpan;
pub use math_object::{MathContent, MathKind, MathObject, ObjectId, PartSlot};
pub use settings::EngineSettings;
pub use store::{MathObjectStore, StoreError};
pub use typing_state::TypingState;
