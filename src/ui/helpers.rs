use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear};

use crate::ui::constants::{POPUP_MIN_HEIGHT, POPUP_MIN_WIDTH, POPUP_PADDING};

pub(crate) fn focused_style() -> Style {
    Style::default().fg(Color::Indexed(205))
}

pub(crate) fn blurred_style() -> Style {
    Style::default().fg(Color::Indexed(240))
}

pub(crate) fn help_style() -> Style {
    Style::default().fg(Color::Indexed(244))
}

/// One labeled input row. `display` is already masked when needed; an empty
/// value shows the placeholder instead.
pub(crate) fn field_line(
    label: &str,
    display: &str,
    placeholder: &str,
    active: bool,
    label_width: usize,
) -> Line<'static> {
    let indicator = if active { "> " } else { "  " };
    let text_style = if active {
        focused_style()
    } else {
        Style::default()
    };
    let value = if display.is_empty() {
        Span::styled(placeholder.to_string(), blurred_style())
    } else {
        Span::styled(display.to_string(), text_style)
    };
    Line::from(vec![
        Span::styled(indicator, text_style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{label:<label_width$}: "),
            text_style.add_modifier(Modifier::BOLD),
        ),
        value,
    ])
}

pub(crate) fn button_line(label: &str, active: bool) -> Line<'static> {
    if active {
        Line::from(Span::styled(
            format!("[ {label} ]"),
            focused_style().add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::raw("[ "),
            Span::styled(label.to_string(), blurred_style()),
            Span::raw(" ]"),
        ])
    }
}

/// Slice of `text` that fits in `width` columns while keeping the cursor
/// visible. Returns the slice and the cursor column inside it.
pub(crate) fn visible_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let start = if cursor >= width { cursor + 1 - width } else { 0 };
    let window = text.chars().skip(start).take(width).collect();
    (window, cursor - start)
}

/// Centers a `width` x `height` box in `area`, never larger than `area`.
pub(crate) fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let height = height.max(POPUP_MIN_HEIGHT).min(area.height);
    let width = width.max(POPUP_MIN_WIDTH).min(area.width);
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// Clears `area`, draws a bordered box titled `title` and returns the padded
/// body.
pub(crate) fn draw_popup(frame: &mut Frame<'_>, area: Rect, title: &str, style: Style) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .border_style(style)
        .title(Line::styled(format!(" {title} "), style.add_modifier(Modifier::BOLD)).centered());
    let body = block.inner(area).inner(POPUP_PADDING);
    frame.render_widget(block, area);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn field_line_shows_placeholder_when_empty() {
        let line = field_line("File", "", "FilePath", false, 6);
        assert_eq!(line_text(&line), "  File  : FilePath");
        let line = field_line("File", "/tmp", "FilePath", true, 6);
        assert_eq!(line_text(&line), "> File  : /tmp");
    }

    #[test]
    fn button_line_marks_focus() {
        assert_eq!(line_text(&button_line("Submit", true)), "[ Submit ]");
        assert_eq!(line_text(&button_line("Submit", false)), "[ Submit ]");
        assert_eq!(
            button_line("Submit", true).spans[0].style,
            focused_style().add_modifier(Modifier::BOLD)
        );
    }

    #[test]
    fn visible_window_keeps_cursor_in_view() {
        assert_eq!(visible_window("abc", 3, 10), ("abc".to_string(), 3));
        assert_eq!(visible_window("abcdefgh", 8, 4), ("fgh".to_string(), 3));
        assert_eq!(visible_window("abcdefgh", 2, 4), ("abcd".to_string(), 2));
        assert_eq!(visible_window("abc", 1, 0), (String::new(), 0));
    }

    #[test]
    fn popup_area_centers_and_clamps() {
        let area = Rect::new(0, 0, 40, 20);
        assert_eq!(popup_area(area, 20, 10), Rect::new(10, 5, 20, 10));
        assert_eq!(popup_area(area, 100, 100), area);
        assert_eq!(popup_area(area, 1, 1).width, POPUP_MIN_WIDTH);
    }

    #[test]
    fn draw_popup_returns_padded_body_and_shows_title() {
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(30, 8)).unwrap();
        let mut body = Rect::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                body = draw_popup(frame, area, "Title", focused_style());
            })
            .unwrap();
        assert_eq!(body, Rect::new(3, 2, 24, 4));
        let top: String = (0..30)
            .map(|x| terminal.backend().buffer()[(x, 0)].symbol().to_string())
            .collect();
        assert!(top.contains(" Title "));
    }
}
