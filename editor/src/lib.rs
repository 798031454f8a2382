mod editor_action;
mod editor_action_builder;
pub mod math_editor;
pub mod trigger;

pub use editor_action::{EditorAction, EditorKey, Selection};
pub use editor_action_builder::EditorActionBuilder;
pub use math_editor::MathEditor;
