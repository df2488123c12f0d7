//! Shared UI building blocks

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of a boxed button
pub const BUTTON_HEIGHT: u16 = 3;

/// Height of one field box plus its error line
pub const FIELD_HEIGHT: u16 = 4;

/// Draw a form field box with its error line underneath.
///
/// The caller hands a `FIELD_HEIGHT`-tall area; the top three rows are the
/// bordered input, the last row carries the field's error, if any.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    error: Option<&str>,
) {
    let input_area = Rect { height: area.height.min(3), ..area };
    let error_area = Rect {
        y: area.y + 3,
        height: area.height.saturating_sub(3),
        ..area
    };

    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let value_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display_value = field.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display_value
    };
    let cursor = if is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, value_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]))
    .block(
        Block::default()
            .title(format!(" {} ", field.label))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(content, input_area);

    if error_area.height > 0 {
        if let Some(message) = error {
            let line = Paragraph::new(Line::from(Span::styled(
                format!("✗ {message}"),
                Style::default().fg(Color::Red),
            )));
            frame.render_widget(line, error_area);
        }
    }
}

/// Draw a read-only selector box (language picker)
pub fn draw_selector(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    is_active: bool,
) {
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let hint = if is_active { "  ◂ ▸ to change" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(content, area);
}

/// Draw a boxed action button
pub fn draw_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_selected: bool,
    accent: Color,
) {
    let (border_style, label_style) = if is_selected {
        (
            Style::default().fg(accent),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Gray),
        )
    };

    let button = Paragraph::new(Line::from(Span::styled(label.to_string(), label_style)))
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(border_style));
    frame.render_widget(button, area);
}
