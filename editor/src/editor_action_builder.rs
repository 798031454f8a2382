use std::ops::{Deref, DerefMut};

use math_objects::{
    editing::{editable::Editable, BufferEdit},
    MathObject, ObjectId, StoreError,
};

use crate::{editor_action::EditorAction, math_editor::MathEditor};

/// Collects the buffer edits of one editor operation and turns them into an EditorAction at the end.
/// Every edit is applied to the object store as soon as it is added,
/// so that later steps of the same operation see the shifted anchors.
#[must_use]
pub struct EditorActionBuilder<'editor> {
    editor: &'editor mut MathEditor,
    edits: Vec<BufferEdit>,
}

impl<'editor> EditorActionBuilder<'editor> {
    pub fn new(editor: &'editor mut MathEditor) -> Self {
        Self {
            editor,
            edits: Vec::new(),
        }
    }

    pub fn add_edit(&mut self, edit: BufferEdit) {
        self.editor.store.apply_edit(&edit);
        self.edits.push(edit);
    }

    /// Replaces `len` characters at `offset` with `text`
    pub fn replace(&mut self, offset: i64, len: i64, text: String) {
        if len > 0 {
            self.add_edit(BufferEdit::delete(offset, len));
        }
        if !text.is_empty() {
            self.add_edit(BufferEdit::insert(offset, text));
        }
    }

    /// Deletes an object together with its filler characters
    pub fn remove_object(&mut self, id: ObjectId) -> Result<MathObject, StoreError> {
        let object = self
            .editor
            .store
            .get(id)
            .cloned()
            .ok_or(StoreError::UnknownObject(id))?;
        let anchor = object.anchor();
        // Deleting the span drops the object from the store
        self.add_edit(BufferEdit::delete(anchor.start, anchor.len));
        Ok(object)
    }

    /// Grows or shrinks the filler run of an object at its end
    pub fn resize_object(&mut self, id: ObjectId, len: i64) -> Result<(), StoreError> {
        let object = self
            .editor
            .store
            .get(id)
            .ok_or(StoreError::UnknownObject(id))?;
        let (anchor, kind) = (object.anchor(), object.kind());
        if anchor.len == len {
            return Ok(());
        }
        self.editor.store.resize_anchor(id, len)?;
        let edit = if len > anchor.len {
            let filler = self
                .editor
                .store
                .settings()
                .filler_text(kind, len - anchor.len);
            BufferEdit::insert(anchor.end(), filler)
        } else {
            BufferEdit::delete(anchor.start + len, anchor.len - len)
        };
        self.edits.push(edit);
        Ok(())
    }

    pub fn finish(self, caret_after: Option<i64>) -> EditorAction {
        EditorAction {
            edits: self.edits,
            caret_after,
            handled: true,
        }
    }

    /// The host still performs its default handling, after moving the caret
    pub fn finish_unhandled(self, caret_after: Option<i64>) -> EditorAction {
        EditorAction {
            edits: self.edits,
            caret_after,
            handled: false,
        }
    }
}

impl<'editor> Deref for EditorActionBuilder<'editor> {
    type Target = MathEditor;

    fn deref(&self) -> &Self::Target {
        self.editor
    }
}

impl<'editor> DerefMut for EditorActionBuilder<'editor> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.editor
    }
}
