use crate::model::{
    FIELD_COUNT, FOCUS_POSITIONS, Field, FormSubmission, HistoryRecord, SUBMIT_POSITION,
    find_suggestion,
};

pub(crate) mod constants;
pub(crate) mod field;
mod handlers;

use field::{InputField, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CursorMode {
    Blink,
    Static,
    Hidden,
}

impl CursorMode {
    pub(crate) fn next(self) -> Self {
        match self {
            CursorMode::Blink => CursorMode::Static,
            CursorMode::Static => CursorMode::Hidden,
            CursorMode::Hidden => CursorMode::Blink,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            CursorMode::Blink => "blink",
            CursorMode::Static => "static",
            CursorMode::Hidden => "hidden",
        }
    }
}

/// State of the transfer form. History is handed in by the caller and handed
/// back with [`App::into_history`] once the form is done.
pub(crate) struct App {
    pub(crate) fields: [TextField; FIELD_COUNT],
    pub(crate) focus: usize,
    pub(crate) suggestion: Option<String>,
    pub(crate) cursor_mode: CursorMode,
    history: HistoryRecord,
}

impl App {
    pub(crate) fn new(history: HistoryRecord) -> Self {
        let mut app = Self {
            fields: Field::ALL.map(TextField::for_field),
            focus: 0,
            suggestion: None,
            cursor_mode: CursorMode::Blink,
            history,
        };
        app.refresh_suggestion();
        app
    }

    pub(crate) fn focused_field(&self) -> Option<Field> {
        Field::from_position(self.focus)
    }

    pub(crate) fn submit_focused(&self) -> bool {
        self.focus == SUBMIT_POSITION
    }

    pub(crate) fn field(&self, field: Field) -> &TextField {
        &self.fields[field.position()]
    }

    #[cfg(test)]
    pub(crate) fn set_field_value(&mut self, field: Field, value: &str) {
        self.fields[field.position()].set_value(value);
        if self.focused_field() == Some(field) {
            self.refresh_suggestion();
        }
    }

    pub(crate) fn submission(&self) -> FormSubmission {
        FormSubmission {
            values: self.fields.each_ref().map(|input| input.value().to_string()),
        }
    }

    pub(crate) fn into_history(self) -> HistoryRecord {
        self.history
    }

    /// Moves focus one position, wrapping past the submit control.
    pub(crate) fn move_focus(&mut self, forward: bool) {
        self.focus = if forward {
            (self.focus + 1) % FOCUS_POSITIONS
        } else if self.focus == 0 {
            FOCUS_POSITIONS - 1
        } else {
            self.focus - 1
        };
        self.refresh_suggestion();
    }

    pub(crate) fn refresh_suggestion(&mut self) {
        self.suggestion = self.focused_field().and_then(|field| {
            let current = self.field(field).value();
            find_suggestion(self.history.suggestions_for(field), current).map(str::to_string)
        });
    }

    /// Replaces the focused field's text with the shown suggestion.
    pub(crate) fn accept_suggestion(&mut self) -> bool {
        let (Some(field), Some(suggestion)) = (self.focused_field(), self.suggestion.take()) else {
            return false;
        };
        self.fields[field.position()].set_value(&suggestion);
        true
    }
}
