//! Post-submission success screen

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(success) = &app.state.success else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1), // Vehicle
            Constraint::Length(1), // Driver phone
            Constraint::Length(2), // QR location
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let block = Block::default()
        .title(" Entry Registered ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(block, area);

    let headline = Paragraph::new(Line::from(Span::styled(
        "✔ Gate pass created — show the QR code at the gate",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(headline, chunks[0]);

    frame.render_widget(
        labeled_line("Vehicle", &success.vehicle_number),
        chunks[1],
    );
    frame.render_widget(
        labeled_line("Driver phone", &success.driver_phone),
        chunks[2],
    );

    let qr_path_string = success.qr_saved_to.as_ref().map(|path| path.display().to_string());
    let qr_line = match &qr_path_string {
        Some(path) => labeled_line("QR image", path),
        None => Paragraph::new(Line::from(Span::styled(
            "QR image not saved yet — press d to save it",
            Style::default().fg(Color::Yellow),
        ))),
    };
    frame.render_widget(qr_line, chunks[3]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled("n", Style::default().fg(Color::Cyan)),
        Span::raw(": new entry  "),
        Span::styled("d", Style::default().fg(Color::Cyan)),
        Span::raw(": save QR again  "),
        Span::styled("Ctrl+L", Style::default().fg(Color::Cyan)),
        Span::raw(": sign out"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn labeled_line<'a>(label: &'a str, value: &'a str) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
    ]))
}
