use crate::model::Field;

pub(crate) const MASK_CHAR: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditAction {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EchoMode {
    Normal,
    Masked(char),
}

/// What the form needs from a single input.
pub(crate) trait InputField {
    fn value(&self) -> &str;
    fn set_value(&mut self, value: &str);
    /// Applies an edit. Returns whether the value changed.
    fn handle_input(&mut self, action: EditAction) -> bool;
    /// Text as it should appear on screen.
    fn display(&self) -> String;
    /// Cursor position in characters.
    fn cursor(&self) -> usize;
}

#[derive(Debug, Clone)]
pub(crate) struct TextField {
    value: String,
    cursor: usize,
    echo: EchoMode,
    char_limit: Option<usize>,
    pub(crate) placeholder: &'static str,
}

impl TextField {
    pub(crate) fn for_field(field: Field) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            echo: if field.masked() {
                EchoMode::Masked(MASK_CHAR)
            } else {
                EchoMode::Normal
            },
            char_limit: field.char_limit(),
            placeholder: field.placeholder(),
        }
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(index, _)| index)
            .unwrap_or(self.value.len())
    }
}

impl InputField for TextField {
    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: &str) {
        self.value = match self.char_limit {
            Some(limit) => value.chars().take(limit).collect(),
            None => value.to_string(),
        };
        self.cursor = self.len();
    }

    fn handle_input(&mut self, action: EditAction) -> bool {
        match action {
            EditAction::Insert(ch) => {
                if ch.is_control() || self.char_limit.is_some_and(|limit| self.len() >= limit) {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.insert(at, ch);
                self.cursor += 1;
                true
            }
            EditAction::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            EditAction::Delete => {
                if self.cursor >= self.len() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            EditAction::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            EditAction::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                false
            }
            EditAction::Home => {
                self.cursor = 0;
                false
            }
            EditAction::End => {
                self.cursor = self.len();
                false
            }
        }
    }

    fn display(&self) -> String {
        match self.echo {
            EchoMode::Normal => self.value.clone(),
            EchoMode::Masked(mask) => std::iter::repeat_n(mask, self.len()).collect(),
        }
    }

    fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(field: Field, text: &str) -> TextField {
        let mut input = TextField::for_field(field);
        for ch in text.chars() {
            input.handle_input(EditAction::Insert(ch));
        }
        input
    }

    #[test]
    fn insert_and_backspace_follow_cursor() {
        let mut input = typed(Field::FilePath, "/tmp");
        input.handle_input(EditAction::Home);
        input.handle_input(EditAction::Right);
        input.handle_input(EditAction::Insert('x'));
        assert_eq!(input.value(), "/xtmp");
        assert_eq!(input.cursor(), 2);
        input.handle_input(EditAction::Backspace);
        assert_eq!(input.value(), "/tmp");
        input.handle_input(EditAction::Delete);
        assert_eq!(input.value(), "/mp");
        input.handle_input(EditAction::End);
        assert!(!input.handle_input(EditAction::Delete));
    }

    #[test]
    fn edits_handle_multibyte_text() {
        let mut input = typed(Field::TargetPath, "/dätä");
        input.handle_input(EditAction::Left);
        input.handle_input(EditAction::Backspace);
        assert_eq!(input.value(), "/dää");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn char_limit_applies_to_username_and_address() {
        let long = "u".repeat(80);
        let input = typed(Field::Username, &long);
        assert_eq!(input.value().chars().count(), 64);
        let mut address = TextField::for_field(Field::Address);
        address.set_value(&long);
        assert_eq!(address.value().len(), 64);
        let path = typed(Field::FilePath, &long);
        assert_eq!(path.value().len(), 80);
    }

    #[test]
    fn password_display_is_masked() {
        let input = typed(Field::Password, "hunter2");
        assert_eq!(input.value(), "hunter2");
        assert_eq!(input.display(), "•••••••");
        assert_eq!(typed(Field::Username, "bob").display(), "bob");
    }

    #[test]
    fn set_value_moves_cursor_to_end() {
        let mut input = typed(Field::FilePath, "/a");
        input.handle_input(EditAction::Home);
        input.set_value("/home/user/project");
        assert_eq!(input.cursor(), "/home/user/project".len());
    }

    #[test]
    fn control_chars_are_ignored() {
        let mut input = TextField::for_field(Field::FilePath);
        assert!(!input.handle_input(EditAction::Insert('\u{7}')));
        assert_eq!(input.value(), "");
    }
}
