use thiserror::Error;

use crate::{
    anchor::AnchorSpan,
    compute,
    editing::{editable::Editable, BufferEdit},
    math_object::{MathContent, MathKind, MathObject, ObjectId, PartSlot},
    settings::EngineSettings,
    typing_state::TypingState,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("span {start}..{end} overlaps object {other}")]
    Overlap {
        start: i64,
        end: i64,
        other: ObjectId,
    },
    #[error("anchor start {0} is negative")]
    NegativeStart(i64),
    #[error("a {kind} needs an anchor of at least {min} characters, got {len}")]
    AnchorTooShort { kind: MathKind, len: i64, min: i64 },
    #[error("object {0} does not exist")]
    UnknownObject(ObjectId),
    #[error("a {kind} has no part {part:?}")]
    PartNotAvailable { kind: MathKind, part: PartSlot },
    #[error("object {0} appears more than once")]
    DuplicateId(ObjectId),
}

/// Owns every math object of one editing session.
///
/// Objects are kept ordered by their anchor start, and their spans never overlap.
/// Anchors only move through [`MathObjectStore::shift_after`] and the operations built on it.
#[derive(Debug, Clone, Default)]
pub struct MathObjectStore {
    objects: Vec<MathObject>,
    typing_state: TypingState,
    settings: EngineSettings,
    next_id: u64,
}

impl MathObjectStore {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            objects: Vec::new(),
            typing_state: TypingState::Idle,
            settings,
            next_id: 0,
        }
    }

    /// Rebuilds a store from a snapshot. The snapshot has to satisfy the same invariants as a live store.
    pub fn restore(settings: EngineSettings, mut objects: Vec<MathObject>) -> Result<Self, StoreError> {
        objects.sort_by_key(|object| object.anchor.start);
        let mut store = Self::new(settings);
        for object in objects {
            if store.get(object.id).is_some() {
                return Err(StoreError::DuplicateId(object.id));
            }
            store.validate(object.kind(), object.anchor)?;
            store.next_id = store.next_id.max(object.id.0 + 1);
            store.objects.push(object);
        }
        Ok(store)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Ordered by anchor start
    pub fn objects(&self) -> &[MathObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.typing_state = TypingState::Idle;
    }

    pub fn get(&self, id: ObjectId) -> Option<&MathObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    fn index_of(&self, id: ObjectId) -> Result<usize, StoreError> {
        self.objects
            .iter()
            .position(|object| object.id == id)
            .ok_or(StoreError::UnknownObject(id))
    }

    /// Index of the object whose span contains the offset
    pub fn contains(&self, offset: i64) -> Option<usize> {
        self.objects
            .iter()
            .position(|object| object.anchor.contains(offset))
    }

    pub fn object_at(&self, offset: i64) -> Option<&MathObject> {
        self.contains(offset).map(|index| &self.objects[index])
    }

    pub fn insert(
        &mut self,
        content: MathContent,
        start: i64,
        len: i64,
    ) -> Result<ObjectId, StoreError> {
        let anchor = AnchorSpan::new(start, len);
        let kind = content.kind();
        self.validate(kind, anchor)?;

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let position = self
            .objects
            .partition_point(|object| object.anchor.start < start);
        self.objects.insert(
            position,
            MathObject {
                id,
                content,
                anchor,
                result_text: None,
            },
        );
        log::debug!("created {kind} {id} at {start}..{}", anchor.end());
        Ok(id)
    }

    fn validate(&self, kind: MathKind, anchor: AnchorSpan) -> Result<(), StoreError> {
        if anchor.start < 0 {
            return Err(StoreError::NegativeStart(anchor.start));
        }
        let min = self.settings.min_anchor_len(kind);
        if anchor.len < min {
            return Err(StoreError::AnchorTooShort {
                kind,
                len: anchor.len,
                min,
            });
        }
        if let Some(other) = self.objects.iter().find(|object| object.anchor.overlaps(&anchor)) {
            log::warn!(
                "refusing span {}..{} because it overlaps {}",
                anchor.start,
                anchor.end(),
                other.id
            );
            return Err(StoreError::Overlap {
                start: anchor.start,
                end: anchor.end(),
                other: other.id,
            });
        }
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> MathObject {
        let object = self.objects.remove(index);
        if self.typing_state.active_object() == Some(object.id) {
            self.typing_state = TypingState::Idle;
        }
        object
    }

    /// Forgets an object. The filler characters stay in the buffer.
    pub fn remove(&mut self, id: ObjectId) -> Result<MathObject, StoreError> {
        let index = self.index_of(id)?;
        Ok(self.remove_at(index))
    }

    /// Removes an object together with its filler run. Later objects move back by its length.
    pub fn remove_with_span(&mut self, id: ObjectId) -> Result<MathObject, StoreError> {
        let index = self.index_of(id)?;
        let object = self.remove_at(index);
        self.shift_after(object.anchor.end(), -object.anchor.len);
        log::debug!("removed {} {} with its span", object.kind(), object.id);
        Ok(object)
    }

    /// Moves every object that starts at or after `at` by `delta`.
    /// Objects that would start before the buffer are removed.
    pub fn shift_after(&mut self, at: i64, delta: i64) {
        if delta == 0 {
            return;
        }
        let mut index = 0;
        while index < self.objects.len() {
            let anchor = &mut self.objects[index].anchor;
            if anchor.start >= at {
                anchor.start += delta;
                if anchor.start < 0 {
                    let object = self.remove_at(index);
                    log::debug!("{} {} was shifted out of the buffer", object.kind(), object.id);
                    continue;
                }
            }
            index += 1;
        }
        if delta < 0 {
            self.objects.sort_by_key(|object| object.anchor.start);
        }
    }

    /// Removes every object whose span intersects `[start, end)`. The bounds may come in either order.
    pub fn delete_in_range(&mut self, start: i64, end: i64) {
        if start == end {
            return;
        }
        let (start, end) = (start.min(end), start.max(end));
        for index in (0..self.objects.len()).rev() {
            if self.objects[index].anchor.intersects(start, end) {
                let object = self.remove_at(index);
                log::debug!("{} {} was deleted by an edit", object.kind(), object.id);
            }
        }
    }

    /// To be called after every change of the host buffer.
    ///
    /// A deletion removes the objects in the deleted range. An insertion inside of a filler run
    /// splits it, which destroys that object.
    pub fn buffer_changed(&mut self, offset: i64, delta: i64) {
        if delta < 0 {
            self.delete_in_range(offset, offset - delta);
        } else if delta > 0 {
            for index in (0..self.objects.len()).rev() {
                let anchor = self.objects[index].anchor;
                if anchor.start < offset && offset < anchor.end() {
                    let object = self.remove_at(index);
                    log::debug!("{} {} was split by an insertion", object.kind(), object.id);
                }
            }
        }
        self.shift_after(offset, delta);
    }

    /// Changes the length of a span. Objects after it move along.
    pub fn resize_anchor(&mut self, id: ObjectId, len: i64) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        let object = &self.objects[index];
        let kind = object.kind();
        let anchor = object.anchor;
        let min = self.settings.min_anchor_len(kind);
        if len < min {
            log::warn!("refusing to shrink {id} to {len} characters");
            return Err(StoreError::AnchorTooShort { kind, len, min });
        }
        self.shift_after(anchor.end(), len - anchor.len);
        let index = self.index_of(id)?;
        self.objects[index].anchor.len = len;
        Ok(())
    }

    pub fn part(&self, id: ObjectId, slot: PartSlot) -> Result<&str, StoreError> {
        let object = &self.objects[self.index_of(id)?];
        object.part(slot).ok_or(StoreError::PartNotAvailable {
            kind: object.kind(),
            part: slot,
        })
    }

    pub fn part_mut(&mut self, id: ObjectId, slot: PartSlot) -> Result<&mut String, StoreError> {
        let index = self.index_of(id)?;
        let content = &mut self.objects[index].content;
        let kind = content.kind();
        content
            .part_mut(slot)
            .ok_or(StoreError::PartNotAvailable { kind, part: slot })
    }

    pub fn typing_state(&self) -> TypingState {
        self.typing_state
    }

    pub fn active_object(&self) -> Option<&MathObject> {
        self.typing_state
            .active_object()
            .and_then(|id| self.get(id))
    }

    pub fn begin_editing(&mut self, id: ObjectId, part: PartSlot) -> Result<(), StoreError> {
        let kind = self.objects[self.index_of(id)?].kind();
        if !kind.has_part(part) {
            return Err(StoreError::PartNotAvailable { kind, part });
        }
        self.typing_state = TypingState::Editing { object: id, part };
        Ok(())
    }

    /// Switches the part that receives keystrokes. Does nothing while idle.
    pub fn set_active_part(&mut self, part: PartSlot) -> Result<(), StoreError> {
        match self.typing_state {
            TypingState::Idle => Ok(()),
            TypingState::Editing { object, .. } => self.begin_editing(object, part),
        }
    }

    /// Returns the object that was being edited
    pub fn stop_editing(&mut self) -> Option<ObjectId> {
        let object = self.typing_state.active_object();
        self.typing_state = TypingState::Idle;
        object
    }

    /// Computes the result of an object and caches the formatted text.
    pub fn calculate(&mut self, id: ObjectId) -> Result<&str, StoreError> {
        let index = self.index_of(id)?;
        let text = compute::result_text(&self.objects[index].content, &self.settings);
        log::debug!("calculated {id}: {text:?}");
        Ok(self.objects[index].result_text.insert(text).as_str())
    }

    /// Recomputes the result, but only if one was calculated before.
    pub fn refresh_result(&mut self, id: ObjectId) -> Result<bool, StoreError> {
        let index = self.index_of(id)?;
        if self.objects[index].result_text.is_none() {
            return Ok(false);
        }
        self.calculate(id)?;
        Ok(true)
    }
}

impl Editable for MathObjectStore {
    fn apply_edit(&mut self, edit: &BufferEdit) {
        self.buffer_changed(edit.offset(), edit.length_delta());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_fraction(start: i64) -> (MathObjectStore, ObjectId) {
        let mut store = MathObjectStore::default();
        let id = store
            .insert(MathContent::fraction("1", "3"), start, 3)
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_removing_the_active_object_resets_typing() {
        let (mut store, id) = store_with_fraction(2);
        store.begin_editing(id, PartSlot::Second).unwrap();
        store.delete_in_range(0, 3);
        assert!(store.is_empty());
        assert_eq!(store.typing_state(), TypingState::Idle);
    }

    #[test]
    fn test_part_not_available() {
        let (mut store, id) = store_with_fraction(0);
        assert_eq!(
            store.begin_editing(id, PartSlot::Third),
            Err(StoreError::PartNotAvailable {
                kind: MathKind::Fraction,
                part: PartSlot::Third
            })
        );
        assert!(store.part_mut(id, PartSlot::Third).is_err());
        assert_eq!(store.part(id, PartSlot::First), Ok("1"));
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut store = MathObjectStore::default();
        store
            .insert(MathContent::fraction("1", "2"), 20, 3)
            .unwrap();
        store.insert(MathContent::square_root(), 2, 5).unwrap();
        store
            .insert(MathContent::system_of_equations(), 10, 5)
            .unwrap();
        let starts: Vec<i64> = store
            .objects()
            .iter()
            .map(|object| object.anchor().start)
            .collect();
        assert_eq!(starts, vec![2, 10, 20]);
    }
}
