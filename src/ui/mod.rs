use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::field::InputField;
use crate::app::{App, CursorMode};
use crate::model::Field;
use crate::ui::constants::{
    FORM_MIN_WIDTH, FORM_TITLE, FORM_WIDTH_PERCENT, INDICATOR_WIDTH, INPUT_WIDTH, LABEL_WIDTH,
    POPUP_PADDING, SUBMIT_LABEL, SUGGESTION_PREFIX,
};
use crate::ui::helpers::{
    blurred_style, button_line, draw_popup, field_line, focused_style, help_style, popup_area,
    visible_window,
};

pub(crate) mod constants;
mod helpers;

pub(crate) fn draw_form(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let width = (area.width.saturating_mul(FORM_WIDTH_PERCENT) / 100)
        .max(FORM_MIN_WIDTH)
        .min(area.width);
    let content_width = width.saturating_sub(2 + POPUP_PADDING.horizontal * 2);
    let value_width = content_width
        .saturating_sub(INDICATOR_WIDTH + LABEL_WIDTH as u16 + 2)
        .min(INPUT_WIDTH) as usize;

    let mut lines = Vec::new();
    let mut cursor_col = None;
    for field in Field::ALL {
        let input = app.field(field);
        let active = app.focused_field() == Some(field);
        let (window, col) = visible_window(&input.display(), input.cursor(), value_width);
        if active {
            cursor_col = Some(col);
        }
        lines.push(field_line(
            field.label(),
            &window,
            input.placeholder,
            active,
            LABEL_WIDTH,
        ));
        if active {
            if let Some(suggestion) = &app.suggestion {
                lines.push(Line::from(Span::styled(
                    format!("    {SUGGESTION_PREFIX}{suggestion}"),
                    blurred_style(),
                )));
            }
        }
    }
    lines.push(Line::from(""));
    lines.push(button_line(SUBMIT_LABEL, app.submit_focused()));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("cursor mode is ", blurred_style()),
        Span::styled(app.cursor_mode.label(), help_style()),
        Span::styled(" (ctrl+r to change style)", blurred_style()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Enter/Up/Down", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to move, "),
        Span::styled("Tab/Right", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to complete, "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to cancel"),
    ]));

    let height = (lines.len() as u16).saturating_add(2 + POPUP_PADDING.vertical * 2);
    let popup = popup_area(area, width, height);
    let inner = draw_popup(frame, popup, FORM_TITLE, focused_style());
    frame.render_widget(Paragraph::new(lines), inner);

    if app.cursor_mode == CursorMode::Hidden {
        return;
    }
    if let (Some(field), Some(col)) = (app.focused_field(), cursor_col) {
        let row = field.position() as u16;
        if row < inner.height {
            let x = inner.x + INDICATOR_WIDTH + LABEL_WIDTH as u16 + 2 + col as u16;
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y + row));
        }
    }
}
