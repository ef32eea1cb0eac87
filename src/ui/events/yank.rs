//! Yank (copy) handlers
//!
//! Copies what the active view shows to the system clipboard:
//! - Structured: the value on the selected row, or a link's request path
//! - Raw: the pretty-printed response body
//! - Request: the request as a curl command

use super::helpers::apply;
use crate::actions::AppAction;
use crate::format;
use crate::hal::OutlineRow;
use crate::state::{read_state, AppState, SharedState};
use crate::types::ResponseTab;
use arboard::Clipboard;

/// Copy the active view's selection to the clipboard and report it in the footer
pub fn handle_yank(state: &SharedState) {
    let Some(text) = yank_text(&read_state(state)) else {
        tracing::debug!("Nothing to yank");
        return;
    };

    let message = match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.clone()))
    {
        Ok(()) => {
            tracing::debug!("Yanked {} bytes", text.len());
            format!("Copied: {}", preview(&text))
        }
        Err(e) => {
            tracing::warn!("Failed to copy to clipboard: {e}");
            format!("Clipboard unavailable: {e}")
        }
    };

    let _ = apply(state, AppAction::SetStatus(message));
}

/// The text the active view would copy, if any
pub fn yank_text(state: &AppState) -> Option<String> {
    match state.ui.active_tab {
        ResponseTab::Structured => state
            .selected_outline_row()
            .and_then(|row| row_text(&row))
            .filter(|text| !text.is_empty()),
        ResponseTab::Raw => state
            .request
            .response
            .as_ref()
            .map(|response| format::raw_body(Some(response))),
        ResponseTab::Request => Some(format::curl_command(
            &state.request.current,
            &state.session.endpoint,
            &state.session.credentials.org_id,
        )),
    }
}

fn row_text(row: &OutlineRow) -> Option<String> {
    match row {
        OutlineRow::Json { text, .. } => Some(extract_json_value(text)),
        OutlineRow::Link { link, .. } => Some(link.target_path()),
        OutlineRow::Section { .. } | OutlineRow::Note { .. } => None,
    }
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > MAX_CHARS || text.lines().nth(1).is_some() {
        let head: String = first_line.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    } else {
        first_line.to_string()
    }
}

/// Extract the value portion from a JSON line
/// Examples:
///   "  "access_token": "abc123"," -> "abc123"
///   "  \"name\": \"John\"" -> "John"
///   "  123" -> "123"
fn extract_json_value(line: &str) -> String {
    let trimmed = line.trim();

    // Key-value pair: keys are always quoted, so split after the closing quote
    if let Some(value_part) = split_after_key(trimmed) {
        return value_part
            .trim()
            .trim_end_matches(',')
            .trim()
            .trim_matches('"')
            .to_string();
    }

    trimmed
        .trim_matches(|c| c == '{' || c == '}' || c == '[' || c == ']' || c == ',')
        .trim()
        .trim_matches('"')
        .to_string()
}

fn split_after_key(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('"')?;
    let mut escaped = false;
    for (idx, c) in rest.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return rest[idx + 1..].strip_prefix(':'),
            _ => escaped = false,
        }
    }
    None
}
