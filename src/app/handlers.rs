use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::app::field::{EditAction, InputField};
use crate::model::FormOutcome;

impl App {
    /// Applies one key press. Returns an outcome once the form is finished.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<FormOutcome> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(FormOutcome::Cancelled),
            KeyCode::Char('c') if ctrl => return Some(FormOutcome::Cancelled),
            KeyCode::Char('r') if ctrl => {
                self.cursor_mode = self.cursor_mode.next();
                return None;
            }
            KeyCode::Enter => {
                if self.submit_focused() {
                    return Some(FormOutcome::Submitted(self.submission()));
                }
                self.move_focus(true);
            }
            KeyCode::Down => self.move_focus(true),
            KeyCode::Up | KeyCode::BackTab => self.move_focus(false),
            KeyCode::Right | KeyCode::Tab if self.suggestion.is_some() => {
                self.accept_suggestion();
            }
            KeyCode::Tab => {}
            _ => {
                if let Some(action) = edit_action(key) {
                    self.edit_focused(action);
                }
            }
        }
        None
    }

    fn edit_focused(&mut self, action: EditAction) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if self.fields[field.position()].handle_input(action) {
            self.refresh_suggestion();
        }
    }
}

fn edit_action(key: KeyEvent) -> Option<EditAction> {
    match key.code {
        KeyCode::Char(ch) => {
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                None
            } else {
                Some(EditAction::Insert(ch))
            }
        }
        KeyCode::Backspace => Some(EditAction::Backspace),
        KeyCode::Delete => Some(EditAction::Delete),
        KeyCode::Left => Some(EditAction::Left),
        KeyCode::Right => Some(EditAction::Right),
        KeyCode::Home => Some(EditAction::Home),
        KeyCode::End => Some(EditAction::End),
        _ => None,
    }
}
