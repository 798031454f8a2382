use editor::{EditorAction, EditorKey, MathEditor, Selection};
use math_objects::editing::BufferEdit;
use math_objects::{MathContent, MathKind, PartSlot, TypingState};

const FRACTION_FILLER: char = '\u{2500}';
const COMMAND_FILLER: char = '\u{00A0}';

/// A plain text buffer that does what a host control would do
#[derive(Default)]
struct Host {
    text: Vec<char>,
    caret: i64,
    editor: MathEditor,
}

impl Host {
    fn text(&self) -> String {
        self.text.iter().collect()
    }

    fn apply(&mut self, action: &EditorAction) {
        for edit in &action.edits {
            match edit {
                BufferEdit::Insert { offset, text } => {
                    let offset = *offset as usize;
                    self.text.splice(offset..offset, text.chars());
                }
                BufferEdit::Delete { offset, len } => {
                    let offset = *offset as usize;
                    self.text.drain(offset..offset + *len as usize);
                }
            }
        }
        if let Some(caret) = action.caret_after {
            self.caret = caret;
        }
    }

    fn type_char(&mut self, value: char) -> EditorAction {
        let action = self
            .editor
            .insert_char(Selection::collapsed(self.caret), value)
            .unwrap();
        self.apply(&action);
        if !action.handled {
            self.text.insert(self.caret as usize, value);
            self.editor.buffer_changed(self.caret, 1);
            self.caret += 1;
        }
        action
    }

    fn type_text(&mut self, text: &str) {
        for value in text.chars() {
            self.type_char(value);
        }
    }

    fn press(&mut self, key: EditorKey) -> EditorAction {
        let action = self
            .editor
            .key_down(Selection::collapsed(self.caret), key)
            .unwrap();
        self.apply(&action);
        if !action.handled {
            match key {
                EditorKey::Backspace if self.caret > 0 => {
                    self.caret -= 1;
                    self.text.remove(self.caret as usize);
                    self.editor.buffer_changed(self.caret, -1);
                }
                EditorKey::Left if self.caret > 0 => self.caret -= 1,
                EditorKey::Right if (self.caret as usize) < self.text.len() => self.caret += 1,
                _ => {}
            }
            self.editor.selection_changed(self.caret);
        }
        action
    }

    fn only_object(&self) -> &math_objects::MathObject {
        let objects = self.editor.objects();
        assert_eq!(objects.len(), 1);
        &objects[0]
    }
}

fn fillers(filler: char, count: usize) -> String {
    std::iter::repeat(filler).take(count).collect()
}

#[test]
fn number_and_slash_start_a_fraction() {
    let mut host = Host::default();
    host.type_text("12/");

    assert_eq!(host.text(), fillers(FRACTION_FILLER, 3));
    assert_eq!(host.caret, 3);
    let id = host.only_object().id();
    assert_eq!(
        host.editor.typing_state(),
        TypingState::Editing {
            object: id,
            part: PartSlot::Second
        }
    );

    host.type_char('4');
    assert_eq!(host.only_object().content(), &MathContent::fraction("12", "4"));

    host.press(EditorKey::Enter);
    assert_eq!(host.editor.typing_state(), TypingState::Idle);
    assert_eq!(host.caret, 3);

    let action = host.type_char('=');
    assert!(action.handled);
    assert_eq!(host.only_object().result_text(), Some(" \u{FF1D} 3"));
    assert_eq!(host.text(), fillers(FRACTION_FILLER, 3));
}

#[test]
fn fraction_grows_with_its_widest_part() {
    let mut host = Host::default();
    host.type_text("x 7/");
    host.type_text("1234");

    let object = host.only_object();
    assert_eq!(object.anchor().start, 2);
    assert_eq!(object.anchor().len, 4);
    assert_eq!(host.text(), format!("x {}", fillers(FRACTION_FILLER, 4)));

    host.press(EditorKey::Backspace);
    host.press(EditorKey::Backspace);
    assert_eq!(host.only_object().anchor().len, 3);
    assert_eq!(host.text(), format!("x {}", fillers(FRACTION_FILLER, 3)));
}

#[test]
fn summation_command() {
    let mut host = Host::default();
    host.type_text("a\\sum ");

    assert_eq!(host.text(), format!("a{}", fillers(COMMAND_FILLER, 5)));
    assert_eq!(host.caret, 6);
    let object = host.only_object();
    assert_eq!(object.kind(), MathKind::Summation);
    assert_eq!(object.anchor().start, 1);
    assert_eq!(host.editor.typing_state().active_part(), Some(PartSlot::Third));

    host.type_char('i');
    host.type_char('^');
    host.press(EditorKey::Backspace);
    host.type_char('4');
    assert_eq!(
        host.only_object().content(),
        &MathContent::Summation {
            upper: "4".to_string(),
            lower: "i=0".to_string(),
            body: "{i}".to_string(),
        }
    );

    host.press(EditorKey::Enter);
    assert_eq!(host.caret, 6);
    host.type_char('=');
    assert_eq!(host.only_object().result_text(), Some(" \u{FF1D} 10"));
}

#[test]
fn trigger_character_picks_the_part() {
    let mut host = Host::default();
    host.type_text("\\int_");
    assert_eq!(host.editor.typing_state().active_part(), Some(PartSlot::Second));

    let mut host = Host::default();
    host.type_text("\\sqrt^");
    assert_eq!(host.editor.typing_state().active_part(), Some(PartSlot::First));
}

#[test]
fn tab_cycles_parts() {
    let mut host = Host::default();
    host.type_text("\\int ");
    let order: Vec<_> = (0..4)
        .map(|_| {
            host.press(EditorKey::Tab);
            host.editor.typing_state().active_part()
        })
        .collect();
    assert_eq!(
        order,
        vec![
            Some(PartSlot::First),
            Some(PartSlot::Second),
            Some(PartSlot::Third),
            Some(PartSlot::First)
        ]
    );

    let mut host = Host::default();
    host.type_text("3/");
    host.press(EditorKey::Tab);
    assert_eq!(host.editor.typing_state().active_part(), Some(PartSlot::First));
    host.press(EditorKey::Tab);
    assert_eq!(host.editor.typing_state().active_part(), Some(PartSlot::Second));
}

#[test]
fn system_of_equations() {
    let mut host = Host::default();
    host.type_text("\\sys ");
    host.type_text("x+y=5");

    // Only one equation so far
    let action = host.press(EditorKey::Enter);
    assert!(action.handled);
    assert!(host.editor.typing_state().is_editing());
    assert_eq!(host.only_object().result_text(), None);

    host.press(EditorKey::Tab);
    host.type_text("x-y=1");
    host.press(EditorKey::Enter);
    assert_eq!(host.editor.typing_state(), TypingState::Idle);
    assert_eq!(host.caret, 5);
    assert_eq!(
        host.only_object().result_text(),
        Some(" \u{FF1D} x=3, y=2")
    );
}

#[test]
fn equals_sign_inside_fraction_calculates() {
    let mut host = Host::default();
    host.type_text("1/8=");
    assert_eq!(host.editor.typing_state(), TypingState::Idle);
    assert_eq!(host.only_object().result_text(), Some(" \u{FF1D} 0.125"));
    assert_eq!(host.caret, 3);
}

#[test]
fn blank_objects_are_dropped() {
    let mut host = Host::default();
    host.type_text("\\sqrt ");
    host.press(EditorKey::Enter);
    assert!(host.editor.objects().is_empty());
    assert_eq!(host.text(), "");
    assert_eq!(host.caret, 0);

    // Moving away from an untouched integral
    host.type_text("ab\\int ");
    host.press(EditorKey::Left);
    assert!(host.editor.objects().is_empty());
    assert_eq!(host.text(), "ab");
    assert_eq!(host.caret, 1);
}

#[test]
fn erasing_a_fraction_removes_it() {
    let mut host = Host::default();
    host.type_text("7/");
    host.press(EditorKey::Tab);
    host.press(EditorKey::Backspace);

    assert!(host.editor.objects().is_empty());
    assert_eq!(host.editor.typing_state(), TypingState::Idle);
    assert_eq!(host.text(), "");
    assert_eq!(host.caret, 0);
}

#[test]
fn backspace_and_delete_remove_whole_objects() {
    let mut host = Host::default();
    host.type_text("ab");
    let action = host
        .editor
        .insert_fraction(Selection::collapsed(2), "1", "2")
        .unwrap();
    host.apply(&action);
    assert_eq!(host.caret, 5);
    assert_eq!(host.editor.typing_state(), TypingState::Idle);

    host.press(EditorKey::Backspace);
    assert!(host.editor.objects().is_empty());
    assert_eq!(host.text(), "ab");
    assert_eq!(host.caret, 2);

    let action = host
        .editor
        .insert_fraction(Selection::collapsed(0), "355", "113")
        .unwrap();
    host.apply(&action);
    host.caret = 0;
    let action = host.press(EditorKey::Delete);
    assert_eq!(action.edits, vec![BufferEdit::delete(0, 3)]);
    assert_eq!(host.text(), "ab");
}

#[test]
fn moving_the_caret_forgets_the_number() {
    let mut host = Host::default();
    host.type_char('1');
    host.press(EditorKey::Left);
    host.press(EditorKey::Right);
    host.type_char('/');
    assert!(host.editor.objects().is_empty());
    assert_eq!(host.text(), "1/");
}

#[test]
fn typing_in_front_moves_objects() {
    let mut host = Host::default();
    let action = host
        .editor
        .insert_fraction(Selection::collapsed(0), "1", "2")
        .unwrap();
    host.apply(&action);
    host.caret = 0;
    host.type_text("abc");
    assert_eq!(host.only_object().anchor().start, 3);
}

#[test]
fn selection_delete_drops_covered_objects() {
    let mut host = Host::default();
    host.type_text("ab");
    let action = host
        .editor
        .insert_fraction(Selection::collapsed(2), "1", "2")
        .unwrap();
    host.apply(&action);

    let action = host
        .editor
        .key_down(Selection::new(1, 3), EditorKey::Backspace)
        .unwrap();
    assert!(!action.handled);
    assert!(host.editor.objects().is_empty());
}

#[test]
fn focus_change_drops_blank_object() {
    let mut host = Host::default();
    let action = host
        .editor
        .insert_fraction(Selection::collapsed(0), "1", "2")
        .unwrap();
    host.apply(&action);
    let fraction = host.only_object().id();
    host.type_text("\\sqrt ");
    assert_eq!(host.editor.objects().len(), 2);

    let action = host.editor.focus_object(fraction, PartSlot::First).unwrap();
    host.apply(&action);
    assert_eq!(host.only_object().id(), fraction);
    assert_eq!(host.text(), fillers(FRACTION_FILLER, 3));
    assert_eq!(host.caret, 0);
    assert_eq!(
        host.editor.typing_state(),
        TypingState::Editing {
            object: fraction,
            part: PartSlot::First
        }
    );

    assert!(host.editor.focus_object(fraction, PartSlot::Third).is_err());

    let action = host.editor.release_focus().unwrap();
    assert!(!action.handled);
    assert_eq!(host.editor.typing_state(), TypingState::Idle);
}

#[test]
fn reset_forgets_everything() {
    let mut host = Host::default();
    host.type_text("5/");
    host.editor.reset();
    assert!(host.editor.objects().is_empty());
    assert_eq!(host.editor.typing_state(), TypingState::Idle);
}
