//! Reusable UI components
//!
//! - Header (endpoint, org, credentials, request status)
//! - Editable text fields with a cursor
//! - Error banner
//! - Footer (status message or command help)

use super::styling;
use crate::editor::FieldEditor;
use crate::state::AppState;
use crate::types::{FailureKind, InputMode, RequestFailure};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Render the application header with endpoint, org and request status
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState, spinner_index: usize) {
    let session = &state.session;

    let status = if state.request.in_flight {
        format!("{} running", SPINNER[spinner_index % SPINNER.len()])
    } else if let Some(response) = &state.request.response {
        format!("{} {}", response.status, response.status_text)
    } else {
        "idle".to_string()
    };

    let org = if session.credentials.org_id.is_empty() {
        "no org"
    } else {
        session.credentials.org_id.as_str()
    };

    let token = if session.credentials.has_token() {
        format!("🔒 {}", session.credentials.masked_token())
    } else {
        "🔓 no token".to_string()
    };

    let header_text = format!(
        "cmapi playground - https://{} | org: {org} | {token} [{status}]",
        session.endpoint
    );

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// A bordered single-line field; shows the editor with a cursor when active
pub fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    prefix: Vec<Span<'static>>,
    value: &str,
    editor: Option<&FieldEditor>,
) {
    let border_style = if editor.is_some() {
        Style::default().fg(styling::focused_border())
    } else {
        Style::default().fg(styling::unfocused_border())
    };

    let mut spans = prefix;
    match editor {
        Some(editor) => {
            let (before, after) = editor.split_at_cursor();
            spans.push(Span::raw(before.to_string()));
            spans.push(Span::styled(
                "▊",
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(after.to_string()));
        }
        None => spans.push(Span::raw(value.to_string())),
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {title} ")),
    );

    frame.render_widget(paragraph, area);
}

/// Inline alert shown while the last request failed
pub fn render_error_banner(
    frame: &mut Frame,
    area: Rect,
    failure: &RequestFailure,
    log_dir: Option<&Path>,
) {
    let text = match failure.kind {
        FailureKind::InvalidBody => failure.message.clone(),
        FailureKind::RequestFailed => match log_dir {
            Some(dir) => format!(
                "Unable to execute request. More information may be visible in the log file: {}",
                dir.display()
            ),
            None => "Unable to execute request. More information may be visible in the log file."
                .to_string(),
        },
    };

    let banner = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .title(" Error "),
        );

    frame.render_widget(banner, area);
}

/// Render the footer: the status message if there is one, otherwise key help
pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = match (&state.ui.status_message, state.input.mode) {
        (Some(message), _) => (message.clone(), Style::default().fg(Color::Magenta)),
        (None, InputMode::Normal) => (
            "/:Path g:Go R:Reset m:Method b:Body s:Send o:Org e:Endpoint | Tab/1-3:View j/k:Move Enter:Open y:Copy q:Quit"
                .to_string(),
            Style::default().fg(Color::Yellow),
        ),
        (None, InputMode::EditingBody) => (
            "Enter:Save  Ctrl+F:Format JSON  Ctrl+L:Clear  Esc:Cancel".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        (None, _) => (
            "Enter:Confirm  Ctrl+W:Delete word  Ctrl+L:Clear  Esc:Cancel".to_string(),
            Style::default().fg(Color::Yellow),
        ),
    };

    let footer = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Commands"));

    frame.render_widget(footer, area);
}
