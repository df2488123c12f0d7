//! Login and registration screens

use super::components::{draw_button, draw_field, BUTTON_HEIGHT, FIELD_HEIGHT};
use super::layout::draw_error_banner;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Center a fixed-width column in the given area
fn centered_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let column = centered_column(area, 60);
    let form = &app.state.login_form;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Banner
            Constraint::Length(1),             // Spacer
            Constraint::Length(FIELD_HEIGHT),  // Email
            Constraint::Length(FIELD_HEIGHT),  // Password
            Constraint::Length(BUTTON_HEIGHT), // Buttons
            Constraint::Min(0),
        ])
        .margin(1)
        .split(column);

    let block = Block::default()
        .title(" Sign In ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, column);

    draw_error_banner(frame, chunks[0], app);

    draw_field(
        frame,
        chunks[2],
        &form.email,
        form.active_field_index == 0,
        form.errors.get("email"),
    );
    draw_field(
        frame,
        chunks[3],
        &form.password,
        form.active_field_index == 1,
        form.errors.get("password"),
    );

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[4]);
    let on_buttons = form.is_buttons_row_active();
    draw_button(
        frame,
        buttons[0],
        "Sign In",
        on_buttons && form.selected_button == 0,
        Color::Green,
    );
    draw_button(
        frame,
        buttons[1],
        "Register",
        on_buttons && form.selected_button == 1,
        Color::Blue,
    );
}

pub fn draw_register(frame: &mut Frame, area: Rect, app: &App) {
    let column = centered_column(area, 64);
    let form = &app.state.register_form;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Banner
            Constraint::Length(FIELD_HEIGHT),  // Email
            Constraint::Length(FIELD_HEIGHT),  // Username
            Constraint::Length(FIELD_HEIGHT),  // Password
            Constraint::Length(FIELD_HEIGHT),  // Verify password
            Constraint::Length(FIELD_HEIGHT),  // Phone
            Constraint::Length(FIELD_HEIGHT),  // Company name
            Constraint::Length(BUTTON_HEIGHT), // Buttons
            Constraint::Min(0),
        ])
        .margin(1)
        .split(column);

    let block = Block::default()
        .title(" Create Account ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, column);

    draw_error_banner(frame, chunks[0], app);

    let fields = [
        (&form.email, "email"),
        (&form.username, "username"),
        (&form.password, "password"),
        (&form.verify_password, "verify_password"),
        (&form.phone, "phone"),
        (&form.company_name, "company_name"),
    ];
    for (idx, (field, name)) in fields.into_iter().enumerate() {
        draw_field(
            frame,
            chunks[idx + 1],
            field,
            form.active_field_index == idx,
            form.errors.get(name),
        );
    }

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[7]);
    let on_buttons = form.is_buttons_row_active();
    draw_button(
        frame,
        buttons[0],
        "Create Account",
        on_buttons && form.selected_button == 0,
        Color::Green,
    );
    draw_button(
        frame,
        buttons[1],
        "Back",
        on_buttons && form.selected_button == 1,
        Color::Gray,
    );

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(": next field  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(": back to sign in"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[8]);
}
