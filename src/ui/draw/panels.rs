//! Main panel rendering
//!
//! - Request panel (method + path, optional endpoint field)
//! - Response panel (tab bar with indicator, active view)

use super::components::render_field;
use super::{styling, tabs};
use crate::editor::FieldKind;
use crate::state::AppState;
use crate::types::{InputMode, ResponseTab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListState, Paragraph},
    Frame,
};

const TAB_SEPARATOR: &str = "   ";

/// Render the request line: `[METHOD] /path`
pub fn render_request_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let request = &state.request.current;

    let prefix = vec![
        Span::styled(
            format!("{:7}", request.method.as_str()),
            Style::default()
                .fg(styling::method_color(request.method))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    let title = match request.non_empty_body() {
        Some(body) => format!("Path (body: {} bytes)", body.len()),
        None => FieldKind::Path.title().to_string(),
    };

    let editor = (state.input.mode == InputMode::EditingPath).then_some(&state.input.editor);
    render_field(frame, area, &title, prefix, &request.path, editor);
}

/// Whether the endpoint row takes up space this frame
pub fn endpoint_row_visible(state: &AppState) -> bool {
    state.input.mode == InputMode::EditingEndpoint
        || (state.session.endpoint_field_shown && !state.session.is_production())
}

pub fn render_endpoint_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let editor = (state.input.mode == InputMode::EditingEndpoint).then_some(&state.input.editor);
    render_field(
        frame,
        area,
        "Endpoint (e:Hide E:Edit)",
        vec![Span::styled("https://", styling::muted())],
        &state.session.endpoint,
        editor,
    );
}

/// Render the tabbed response area
pub fn render_response_panel(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    outline_list_state: &mut ListState,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styling::focused_border()));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    // Tab labels, indicator line, content
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner_area);

    render_tab_bar(frame, chunks[0], chunks[1], state);

    match state.ui.active_tab {
        ResponseTab::Structured => {
            tabs::render_structured_tab(frame, chunks[2], state, outline_list_state)
        }
        ResponseTab::Raw => tabs::render_raw_tab(frame, chunks[2], state),
        ResponseTab::Request => tabs::render_request_tab(frame, chunks[2], state),
    }
}

/// Labels on one line, and an indicator under the active one on the next
fn render_tab_bar(frame: &mut Frame, labels_area: Rect, indicator_area: Rect, state: &AppState) {
    let active = state.ui.active_tab;

    let mut label_spans = Vec::new();
    let mut indicator = String::new();

    for (idx, tab) in ResponseTab::ALL.iter().enumerate() {
        if idx > 0 {
            label_spans.push(Span::raw(TAB_SEPARATOR));
            indicator.push_str(TAB_SEPARATOR);
        }

        let label = format!("{}:{}", idx + 1, tab.label());
        let width = label.chars().count();

        if *tab == active {
            label_spans.push(Span::styled(label, styling::active_tab()));
            indicator.push_str(&"▔".repeat(width));
        } else {
            label_spans.push(Span::styled(label, styling::muted()));
            indicator.push_str(&" ".repeat(width));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(label_spans)), labels_area);
    frame.render_widget(
        Paragraph::new(indicator).style(styling::active_tab()),
        indicator_area,
    );
}
