//! UI module for rendering the TUI

mod auth;
mod components;
mod entry;
mod layout;
mod success;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let content = layout::create_layout(frame, app);

    match app.state.current_view {
        View::Login => auth::draw_login(frame, content, app),
        View::Register => auth::draw_register(frame, content, app),
        View::Entry => entry::draw(frame, content, app),
        View::Success => success::draw(frame, content, app),
    }

    layout::draw_status_bar(frame, app);
}
