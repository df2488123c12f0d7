//! Layout chrome (title bar, error banner, status bar)

use crate::app::App;
use crate::state::{NoticeLevel, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into title bar, content, and status bar.
/// Returns the content area.
pub fn create_layout(frame: &mut Frame, app: &App) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, chunks[0], app);
    chunks[1]
}

fn draw_title_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Gatepass Portal ",
        Style::default().fg(Color::White).bg(Color::Blue),
    )];
    if let Some(session) = &app.state.session {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            session.user.email.clone(),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the form-level error banner into the given area, if one is up
pub fn draw_error_banner(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(message) = &app.state.submit_error {
        let banner = Paragraph::new(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::White).bg(Color::Red),
        )));
        frame.render_widget(banner, area);
    }
}

/// Draw the status bar with hints, the loading flag, and transient notices
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    if app.state.loading {
        spans.push(Span::styled(" ⏳ working… ", Style::default().fg(Color::Yellow)));
    } else {
        let hints = get_view_hints(&app.state.current_view);
        spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    }

    if let Some(notice) = &app.state.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Warning => Color::Yellow,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            notice.message.clone(),
            Style::default().fg(color),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> &'static str {
    match view {
        View::Login => " Tab:next  Enter:sign in  Esc:quit",
        View::Register => " Tab:next  Enter:create  Esc:back",
        View::Entry => " Tab:next  Enter:attach/continue  Esc:back step  ^L:sign out",
        View::Success => " n:new entry  d:save QR  ^L:sign out",
    }
}
