//! Modal dialog rendering
//!
//! - Request body editor
//! - Organization ID editor

use crate::state::AppState;
use crate::types::InputMode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw whichever modal the current input mode asks for
pub fn render_active_modal(frame: &mut Frame, state: &AppState) {
    match state.input.mode {
        InputMode::EditingBody => render_editor_modal(
            frame,
            state,
            "Enter: Save  |  Ctrl+F: Format  |  Ctrl+L: Clear  |  Esc: Cancel",
        ),
        InputMode::EditingOrgId => render_editor_modal(
            frame,
            state,
            "Enter: Save and re-send  |  Ctrl+L: Clear  |  Esc: Cancel",
        ),
        InputMode::Normal | InputMode::EditingPath | InputMode::EditingEndpoint => {}
    }
}

fn render_editor_modal(frame: &mut Frame, state: &AppState, help_text: &str) {
    let editor = &state.input.editor;
    let modal_area = centered_rect(frame.area(), 0.7, 90, 10);

    // Clear the background behind the modal
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .title(format!(
            " {}{} ",
            editor.kind().title(),
            if editor.is_dirty() { " (modified)" } else { "" }
        ))
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(Color::Rgb(30, 30, 30)).fg(Color::White));

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let (before, after) = editor.split_at_cursor();
    let input = Paragraph::new(Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled("▊", Style::default().fg(Color::Yellow)),
        Span::raw(after.to_string()),
    ]))
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
    .wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[0]);

    // Live validity hint for the body
    if state.input.mode == InputMode::EditingBody {
        let (hint, color) = match editor.validate_json() {
            Ok(()) if editor.content().trim().is_empty() => ("No body".to_string(), Color::DarkGray),
            Ok(()) => ("Valid JSON".to_string(), Color::Green),
            Err(e) => (e, Color::Red),
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(color)),
            chunks[1],
        );
    }

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Rgb(150, 150, 150)))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

fn centered_rect(area: Rect, width_ratio: f32, max_width: u16, height: u16) -> Rect {
    let width = ((area.width as f32 * width_ratio) as u16).min(max_width);
    let height = height.min(area.height);
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
