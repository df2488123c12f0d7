//! The multi-step entry form screen

use super::components::{draw_button, draw_field, draw_selector, BUTTON_HEIGHT, FIELD_HEIGHT};
use super::layout::draw_error_banner;
use crate::app::App;
use crate::state::{DocumentKind, EntryForm, Step};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.entry_form;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Banner
            Constraint::Length(2), // Step indicator
            Constraint::Min(0),    // Step body
        ])
        .split(area);

    draw_error_banner(frame, chunks[0], app);
    draw_step_indicator(frame, chunks[1], form);

    match form.step {
        Step::Vehicle => draw_vehicle_step(frame, chunks[2], form),
        Step::Driver => draw_driver_step(frame, chunks[2], form),
        Step::Documents => draw_documents_step(frame, chunks[2], form),
    }
}

/// One line per step bar: `● Vehicle Information ─ ○ Driver … ─ ○ Documents …`
fn draw_step_indicator(frame: &mut Frame, area: Rect, form: &EntryForm) {
    let mut spans = vec![Span::raw(" ")];
    for (idx, step) in [Step::Vehicle, Step::Driver, Step::Documents]
        .into_iter()
        .enumerate()
    {
        if idx > 0 {
            spans.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
        }
        let (marker, style) = if step == form.step {
            (
                "●",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else if step.index() < form.step.index() {
            ("✓", Style::default().fg(Color::Green))
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(format!("{marker} {}", step.title()), style));
    }

    let description = Line::from(Span::styled(
        format!("   {}", form.step.description()),
        Style::default().fg(Color::DarkGray),
    ));
    let widget = Paragraph::new(vec![Line::from(spans), description]);
    frame.render_widget(widget, area);
}

fn step_block(form: &EntryForm) -> Block<'static> {
    Block::default()
        .title(format!(
            " Step {} of {}: {} ",
            form.step.index() + 1,
            Step::COUNT,
            form.step.title()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn draw_vehicle_step(frame: &mut Frame, area: Rect, form: &EntryForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),  // Vehicle number
            Constraint::Length(BUTTON_HEIGHT), // Buttons
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    frame.render_widget(step_block(form), area);

    draw_field(
        frame,
        chunks[0],
        &form.vehicle_number,
        form.active_field_index == 0,
        form.errors.get("vehicle_number"),
    );

    draw_buttons_row(frame, chunks[1], form, &["Continue"]);
}

fn draw_driver_step(frame: &mut Frame, area: Rect, form: &EntryForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),  // Driver phone
            Constraint::Length(FIELD_HEIGHT),  // Helper phone
            Constraint::Length(3),             // Language selector
            Constraint::Length(BUTTON_HEIGHT), // Buttons
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    frame.render_widget(step_block(form), area);

    draw_field(
        frame,
        chunks[0],
        &form.driver_phone,
        form.active_field_index == 0,
        form.errors.get("driver_phone"),
    );
    draw_field(
        frame,
        chunks[1],
        &form.helper_phone,
        form.active_field_index == 1,
        form.errors.get("helper_phone"),
    );
    draw_selector(
        frame,
        chunks[2],
        "Preferred Language",
        form.language.label(),
        form.is_language_active(),
    );

    draw_buttons_row(frame, chunks[3], form, &["Back", "Continue"]);
}

fn draw_documents_step(frame: &mut Frame, area: Rect, form: &EntryForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT + 1), // Purchase order + attachment line
            Constraint::Length(FIELD_HEIGHT + 1), // Vehicle papers
            Constraint::Length(FIELD_HEIGHT + 1), // Aadhaar card
            Constraint::Length(BUTTON_HEIGHT),    // Buttons
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    frame.render_widget(step_block(form), area);

    let slots = [
        (DocumentKind::PurchaseOrder, &form.purchase_order_input),
        (DocumentKind::VehiclePapers, &form.vehicle_papers_input),
        (DocumentKind::AadhaarCard, &form.aadhaar_card_input),
    ];
    for (idx, (kind, input)) in slots.into_iter().enumerate() {
        draw_document_slot(frame, chunks[idx], form, kind, input, idx);
    }

    draw_buttons_row(frame, chunks[3], form, &["Back", "Submit Entry"]);
}

fn draw_document_slot(
    frame: &mut Frame,
    area: Rect,
    form: &EntryForm,
    kind: DocumentKind,
    input: &crate::state::FormField,
    idx: usize,
) {
    let field_area = Rect {
        height: FIELD_HEIGHT.min(area.height),
        ..area
    };
    let attachment_area = Rect {
        y: area.y + FIELD_HEIGHT,
        height: area.height.saturating_sub(FIELD_HEIGHT),
        ..area
    };

    let name = kind.part_name();
    draw_field(
        frame,
        field_area,
        input,
        form.active_field_index == idx,
        form.errors.get(name),
    );

    if attachment_area.height > 0 {
        let line = match form.documents.get(kind) {
            Some(file) => Line::from(vec![
                Span::styled("  ✔ ", Style::default().fg(Color::Green)),
                Span::styled(file.to_string(), Style::default().fg(Color::Green)),
            ]),
            None => Line::from(Span::styled(
                "  PDF, JPG, JPEG, PNG up to 5MB — Enter to attach",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), attachment_area);
    }
}

fn draw_buttons_row(frame: &mut Frame, area: Rect, form: &EntryForm, labels: &[&str]) {
    let constraints: Vec<Constraint> = labels
        .iter()
        .map(|_| Constraint::Ratio(1, labels.len() as u32))
        .collect();
    let button_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let on_buttons = form.is_buttons_row_active();
    for (idx, label) in labels.iter().enumerate() {
        // Last button is the primary action
        let accent = if idx + 1 == labels.len() {
            Color::Green
        } else {
            Color::Gray
        };
        draw_button(
            frame,
            button_areas[idx],
            label,
            on_buttons && form.selected_button == idx,
            accent,
        );
    }
}
