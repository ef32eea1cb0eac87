//! Response views
//!
//! - Structured: the HAL outline with collapsible Links/Embedded sections
//! - Raw: pretty response body and `name: value` headers
//! - Request: the request as text and as a curl command

use super::styling;
use crate::format;
use crate::hal::OutlineRow;
use crate::state::AppState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the structured (HAL) view
pub fn render_structured_tab(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    list_state: &mut ListState,
) {
    let rows = state.outline();

    if rows.is_empty() {
        frame.render_widget(placeholder(state), area);
        return;
    }

    let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(outline_line(row))).collect();

    list_state.select(Some(state.ui.outline_selected.min(rows.len() - 1)));

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, list_state);
}

/// Render the raw view: status, body, headers
pub fn render_raw_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(response) = state.request.response.as_ref() else {
        frame.render_widget(placeholder(state), area);
        return;
    };

    let heading = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{} {}", response.status, response.status_text),
                Style::default().fg(styling::status_color(response.status)),
            ),
            Span::raw("  "),
            Span::styled("Duration: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}ms", response.duration.as_millis())),
        ]),
        Line::from(""),
        Line::from(Span::styled("Response Body", heading)),
    ];

    lines.extend(
        format::raw_body(Some(response))
            .lines()
            .map(|line| Line::from(line.to_string())),
    );

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Response Headers", heading)));

    lines.extend(
        format::raw_headers(Some(response))
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Cyan)))),
    );

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.ui.raw_scroll.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(content, area);
}

/// Render the request view
pub fn render_request_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    let request = &state.request.current;
    let endpoint = &state.session.endpoint;
    let org_id = &state.session.credentials.org_id;

    let mut lines: Vec<Line> = format::request_text(request, endpoint, org_id)
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default()
                        .fg(styling::method_color(request.method))
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(line.to_string())
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("curl", styling::muted())));
    lines.extend(
        format::curl_command(request, endpoint, org_id)
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Yellow)))),
    );

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.ui.request_scroll.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(content, area);
}

fn outline_line(row: &OutlineRow) -> Line<'static> {
    let indent = "  ".repeat(row.depth());

    match row {
        OutlineRow::Json { text, .. } => Line::from(vec![
            Span::raw(indent),
            Span::styled(text.clone(), Style::default().fg(Color::White)),
        ]),
        OutlineRow::Section {
            title,
            count,
            expanded,
            ..
        } => {
            let icon = if *expanded { "▼" } else { "▶" };
            let label = match count {
                Some(count) => format!("{icon} {title} ({count})"),
                None => format!("{icon} {title}"),
            };
            Line::from(vec![
                Span::raw(indent),
                Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        }
        OutlineRow::Link { link, .. } => {
            let mut spans = vec![
                Span::raw(indent),
                Span::styled(link.rel.clone(), Style::default().fg(Color::Green)),
                Span::styled(" → ", styling::muted()),
                Span::raw(link.href.clone()),
            ];
            if let Some(title) = &link.title {
                spans.push(Span::styled(format!("  ({title})"), styling::muted()));
            }
            Line::from(spans)
        }
        OutlineRow::Note { text, .. } => Line::from(vec![
            Span::raw(indent),
            Span::styled(
                text.clone(),
                styling::muted().add_modifier(Modifier::ITALIC),
            ),
        ]),
    }
}

fn placeholder(state: &AppState) -> Paragraph<'static> {
    if state.request.in_flight {
        Paragraph::new("⏳ Executing request...").style(Style::default().fg(Color::Cyan))
    } else {
        Paragraph::new("No response").style(styling::muted())
    }
}
