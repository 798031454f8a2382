use log::debug;
use math_objects::{
    EngineSettings, MathContent, MathKind, MathObject, MathObjectStore, ObjectId, PartSlot,
    StoreError, TypingState,
};

use crate::{
    editor_action::{EditorAction, EditorKey, Selection},
    editor_action_builder::EditorActionBuilder,
    trigger::{is_command_trigger, MathCommand, TriggerCollector},
};

/// Turns keystrokes in a host text buffer into math objects.
/// The host owns the text, the editor owns the objects that are anchored in it.
#[cfg_attr(feature = "wasm", wasm_bindgen::prelude::wasm_bindgen)]
#[derive(Debug, Clone, Default)]
pub struct MathEditor {
    pub(crate) store: MathObjectStore,
    pub(crate) triggers: TriggerCollector,
}

impl MathEditor {
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_store(MathObjectStore::new(settings))
    }

    pub fn with_store(store: MathObjectStore) -> Self {
        Self {
            store,
            triggers: TriggerCollector::default(),
        }
    }

    pub fn store(&self) -> &MathObjectStore {
        &self.store
    }

    pub fn into_store(self) -> MathObjectStore {
        self.store
    }

    pub fn objects(&self) -> &[MathObject] {
        self.store.objects()
    }

    pub fn typing_state(&self) -> TypingState {
        self.store.typing_state()
    }

    /// Forgets every object, for example when the host loads a new document
    pub fn reset(&mut self) {
        self.store.clear();
        self.triggers.clear();
    }

    /// The host changed its text by itself
    pub fn buffer_changed(&mut self, offset: i64, delta: i64) {
        self.store.buffer_changed(offset, delta);
    }

    /// Returns the object under the caret, if any
    pub fn selection_changed(&mut self, caret: i64) -> Option<ObjectId> {
        self.triggers.sync(caret);
        self.store.object_at(caret).map(MathObject::id)
    }

    pub fn focus_object(&mut self, id: ObjectId, part: PartSlot) -> Result<EditorAction, StoreError> {
        let kind = self
            .store
            .get(id)
            .ok_or(StoreError::UnknownObject(id))?
            .kind();
        if !kind.has_part(part) {
            return Err(StoreError::PartNotAvailable { kind, part });
        }
        self.triggers.clear();

        let mut builder = EditorActionBuilder::new(self);
        if let Some(active) = builder.store.typing_state().active_object() {
            if active != id {
                leave_editing(&mut builder, active)?;
            }
        }
        builder.store.begin_editing(id, part)?;
        let start = builder.store.get(id).map(|object| object.anchor().start);
        Ok(builder.finish(start))
    }

    pub fn release_focus(&mut self) -> Result<EditorAction, StoreError> {
        self.triggers.clear();
        let Some(active) = self.store.typing_state().active_object() else {
            return Ok(EditorAction::unhandled());
        };
        let mut builder = EditorActionBuilder::new(self);
        leave_editing(&mut builder, active)?;
        Ok(builder.finish_unhandled(None))
    }

    /// Handles a typed character. Unhandled characters are inserted by the host.
    pub fn insert_char(&mut self, selection: Selection, value: char) -> Result<EditorAction, StoreError> {
        if let TypingState::Editing { object, part } = self.store.typing_state() {
            if let Some(action) = self.type_into_part(object, part, value)? {
                return Ok(action);
            }
        }

        if selection.is_collapsed() {
            self.triggers.sync(selection.caret());
        } else {
            self.triggers.clear();
        }
        let caret = selection.caret();

        if value == '=' {
            if let Some(id) = self.store.object_at(caret - 1).map(MathObject::id) {
                self.triggers.clear();
                let mut builder = EditorActionBuilder::new(self);
                builder.store.calculate(id)?;
                let end = builder.store.get(id).map(|object| object.anchor().end());
                return Ok(builder.finish(end));
            }
        }

        if is_command_trigger(value) && !self.triggers.command().is_empty() {
            if let Some(command) = MathCommand::from_text(self.triggers.command()) {
                let start = caret - command.text().chars().count() as i64;
                if start >= 0 {
                    return self.create_command_object(start, caret, command, value);
                }
            }
            self.triggers.clear();
        }

        if value == '/' && !self.triggers.number().is_empty() {
            let digits = self.triggers.number().to_string();
            let start = caret - digits.chars().count() as i64;
            if start >= 0 {
                return self.create_fraction(start, caret, digits);
            }
            self.triggers.clear();
        }

        self.triggers.push(selection.min(), value);
        Ok(EditorAction::unhandled())
    }

    /// Handles a key that does not produce a character
    pub fn key_down(&mut self, selection: Selection, key: EditorKey) -> Result<EditorAction, StoreError> {
        let caret = selection.caret();
        if matches!(key, EditorKey::Backspace | EditorKey::Delete) && !selection.is_collapsed() {
            self.triggers.clear();
            self.store.delete_in_range(selection.min(), selection.max());
            return Ok(EditorAction::unhandled());
        }

        match (key, self.store.typing_state()) {
            (EditorKey::Enter, TypingState::Editing { object, .. }) => self.confirm(object),
            (EditorKey::Backspace, TypingState::Editing { object, part }) => {
                self.erase_in_part(object, part)
            }
            // Parts are only ever shortened from their end
            (EditorKey::Delete, TypingState::Editing { .. }) => Ok(EditorAction {
                handled: true,
                ..Default::default()
            }),
            (EditorKey::Tab, TypingState::Editing { object, part }) => {
                let kind = self
                    .store
                    .get(object)
                    .ok_or(StoreError::UnknownObject(object))?
                    .kind();
                self.store.set_active_part(part.cycle(kind.tab_cycle()))?;
                Ok(EditorActionBuilder::new(self).finish(None))
            }
            (key, TypingState::Editing { object, .. }) if key.is_navigation() => {
                self.triggers.clear();
                let mut builder = EditorActionBuilder::new(self);
                let caret_after = leave_editing(&mut builder, object)?;
                Ok(builder.finish_unhandled(caret_after))
            }
            (EditorKey::Backspace, TypingState::Idle) => match self.store.object_at(caret - 1).map(MathObject::id) {
                Some(id) => self.delete_object(id),
                None => Ok(EditorAction::unhandled()),
            },
            (EditorKey::Delete, TypingState::Idle) => match self.store.object_at(caret).map(MathObject::id) {
                Some(id) => self.delete_object(id),
                None => Ok(EditorAction::unhandled()),
            },
            (key, _) => {
                if key.is_navigation() || key == EditorKey::Tab {
                    self.triggers.clear();
                }
                Ok(EditorAction::unhandled())
            }
        }
    }

    /// Replaces the selection with a finished fraction, without entering it
    pub fn insert_fraction(
        &mut self,
        selection: Selection,
        numerator: &str,
        denominator: &str,
    ) -> Result<EditorAction, StoreError> {
        self.triggers.clear();
        let content = MathContent::fraction(numerator, denominator);
        let len = self
            .store
            .settings()
            .fraction_anchor_len(content.fraction_width().unwrap_or(0));
        let filler = self.store.settings().filler_text(MathKind::Fraction, len);
        let start = selection.min();

        let mut builder = EditorActionBuilder::new(self);
        builder.replace(start, selection.len(), filler);
        builder.store.insert(content, start, len)?;
        Ok(builder.finish(Some(start + len)))
    }

    fn create_command_object(
        &mut self,
        start: i64,
        caret: i64,
        command: MathCommand,
        trigger: char,
    ) -> Result<EditorAction, StoreError> {
        self.triggers.clear();
        let content = command.content();
        let len = self.store.settings().command_anchor_len;
        let filler = self.store.settings().filler_text(content.kind(), len);

        let mut builder = EditorActionBuilder::new(self);
        builder.replace(start, caret - start, filler);
        let id = builder.store.insert(content, start, len)?;
        builder.store.begin_editing(id, command.initial_part(trigger))?;
        debug!("{} turned into {}", command.text(), id);
        Ok(builder.finish(Some(start + len)))
    }

    fn create_fraction(&mut self, start: i64, caret: i64, digits: String) -> Result<EditorAction, StoreError> {
        self.triggers.clear();
        let len = self
            .store
            .settings()
            .fraction_anchor_len(digits.chars().count());
        let filler = self.store.settings().filler_text(MathKind::Fraction, len);

        let mut builder = EditorActionBuilder::new(self);
        builder.replace(start, caret - start, filler);
        let id = builder.store.insert(MathContent::fraction(digits, ""), start, len)?;
        builder.store.begin_editing(id, PartSlot::Second)?;
        Ok(builder.finish(Some(start + len)))
    }

    /// Returns None when the character ends the editing and still has to be handled
    fn type_into_part(
        &mut self,
        object: ObjectId,
        part: PartSlot,
        value: char,
    ) -> Result<Option<EditorAction>, StoreError> {
        let kind = self
            .store
            .get(object)
            .ok_or(StoreError::UnknownObject(object))?
            .kind();
        let mut builder = EditorActionBuilder::new(self);
        match value {
            '\t' => {}
            '=' if kind != MathKind::SystemOfEquations => {
                builder.store.stop_editing();
                builder.store.calculate(object)?;
                let end = builder.store.get(object).map(|object| object.anchor().end());
                return Ok(Some(builder.finish(end)));
            }
            '^' => builder.store.set_active_part(PartSlot::First)?,
            '_' => builder.store.set_active_part(PartSlot::Second)?,
            value if !value.is_control() => {
                push_to_part(builder.store.part_mut(object, part)?, part, value);
                refit_fraction(&mut builder, object)?;
                builder.store.refresh_result(object)?;
                let start = builder.store.get(object).map(|object| object.anchor().start);
                return Ok(Some(builder.finish(start)));
            }
            _ => {
                builder.store.stop_editing();
                return Ok(None);
            }
        }
        Ok(Some(builder.finish(None)))
    }

    fn erase_in_part(&mut self, object: ObjectId, part: PartSlot) -> Result<EditorAction, StoreError> {
        let mut builder = EditorActionBuilder::new(self);
        pop_from_part(builder.store.part_mut(object, part)?, part);

        let current = builder
            .store
            .get(object)
            .ok_or(StoreError::UnknownObject(object))?;
        if current.kind() == MathKind::Fraction && current.content().is_blank() {
            let removed = builder.remove_object(object)?;
            return Ok(builder.finish(Some(removed.anchor().start)));
        }

        refit_fraction(&mut builder, object)?;
        builder.store.refresh_result(object)?;
        let start = builder.store.get(object).map(|object| object.anchor().start);
        Ok(builder.finish(start))
    }

    fn confirm(&mut self, object: ObjectId) -> Result<EditorAction, StoreError> {
        self.triggers.clear();
        let mut builder = EditorActionBuilder::new(self);
        let current = builder
            .store
            .get(object)
            .ok_or(StoreError::UnknownObject(object))?;

        if let MathContent::SystemOfEquations { equations } = current.content() {
            // A system needs at least two equations before Enter does anything
            if equations[0].trim().is_empty() || equations[1].trim().is_empty() {
                return Ok(builder.finish(None));
            }
            builder.store.stop_editing();
            builder.store.calculate(object)?;
            let end = builder.store.get(object).map(|object| object.anchor().end());
            return Ok(builder.finish(end));
        }

        let caret_after = leave_editing(&mut builder, object)?;
        Ok(builder.finish(caret_after))
    }

    fn delete_object(&mut self, id: ObjectId) -> Result<EditorAction, StoreError> {
        self.triggers.clear();
        let mut builder = EditorActionBuilder::new(self);
        let removed = builder.remove_object(id)?;
        Ok(builder.finish(Some(removed.anchor().start)))
    }
}

/// Stops editing `object`. A blank object disappears, any other gets its result refreshed.
/// Returns the offset where the caret belongs afterwards.
fn leave_editing(builder: &mut EditorActionBuilder<'_>, object: ObjectId) -> Result<Option<i64>, StoreError> {
    builder.store.stop_editing();
    let Some(current) = builder.store.get(object) else {
        return Ok(None);
    };
    if current.content().is_blank() {
        let removed = builder.remove_object(object)?;
        debug!("dropped blank {}", removed.id());
        return Ok(Some(removed.anchor().start));
    }
    builder.store.refresh_result(object)?;
    Ok(builder.store.get(object).map(|object| object.anchor().end()))
}

fn refit_fraction(builder: &mut EditorActionBuilder<'_>, object: ObjectId) -> Result<(), StoreError> {
    let width = builder
        .store
        .get(object)
        .and_then(|object| object.content().fraction_width());
    if let Some(width) = width {
        let len = builder.store.settings().fraction_anchor_len(width);
        builder.resize_object(object, len)?;
    }
    Ok(())
}

fn is_braced(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('{') && text.ends_with('}')
}

/// The third part keeps its text inside the braces
fn push_to_part(text: &mut String, part: PartSlot, value: char) {
    if part == PartSlot::Third && is_braced(text) {
        text.insert(text.len() - 1, value);
    } else {
        text.push(value);
    }
}

fn pop_from_part(text: &mut String, part: PartSlot) {
    if part == PartSlot::Third && is_braced(text) {
        let closing = text.len() - 1;
        if let Some((index, _)) = text[1..closing].char_indices().last() {
            text.remove(index + 1);
        }
    } else {
        text.pop();
    }
}
