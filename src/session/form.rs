use unicode_segmentation::UnicodeSegmentation;

/// Which buffer of a form receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Name,
    Description,
    DueDate,
    Note,
}

/// Buffered text for the active add/edit/note form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInput {
    pub field: Field,
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub note: String,
}

impl PendingInput {
    /// Empty buffers with `field` active
    pub fn starting_at(field: Field) -> Self {
        PendingInput {
            field,
            ..Default::default()
        }
    }

    pub fn clear(&mut self) {
        *self = PendingInput::default();
    }

    /// The buffer the active field writes to
    pub fn active(&self) -> &str {
        match self.field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::DueDate => &self.due_date,
            Field::Note => &self.note,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
            Field::DueDate => &mut self.due_date,
            Field::Note => &mut self.note,
        }
    }

    /// Append a typed character to the active buffer
    pub fn push(&mut self, c: char) {
        self.active_mut().push(c);
    }

    /// Remove the last grapheme of the active buffer. No-op when empty.
    pub fn backspace(&mut self) {
        let buf = self.active_mut();
        if let Some((idx, _)) = buf.grapheme_indices(true).next_back() {
            buf.truncate(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_goes_to_active_field() {
        let mut p = PendingInput::starting_at(Field::Name);
        p.push('h');
        p.push('i');
        p.field = Field::Description;
        p.push('x');
        assert_eq!(p.name, "hi");
        assert_eq!(p.description, "x");
        assert_eq!(p.active(), "x");
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut p = PendingInput::default();
        p.backspace();
        assert_eq!(p.name, "");
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let mut p = PendingInput::starting_at(Field::Note);
        for c in "ok e\u{301}".chars() {
            p.push(c);
        }
        p.backspace();
        assert_eq!(p.note, "ok ");
    }

    #[test]
    fn test_clear_resets_field() {
        let mut p = PendingInput::starting_at(Field::DueDate);
        p.push('2');
        p.clear();
        assert_eq!(p, PendingInput::default());
        assert_eq!(p.field, Field::Name);
    }
}
