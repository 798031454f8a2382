use super::BufferEdit;

pub trait Editable {
    fn apply_edit(&mut self, edit: &BufferEdit);

    fn apply_edits(&mut self, edits: &[BufferEdit]) {
        for edit in edits {
            self.apply_edit(edit);
        }
    }
}
