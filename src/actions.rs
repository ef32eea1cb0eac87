use crate::config::validate_host;
use crate::editor::{FieldEditor, FieldKind};
use crate::hal::OutlineRow;
use crate::state::AppState;
use crate::types::{ApiRequest, HttpMethod, InputMode, ResponseTab};

/// Every state change the UI can make
///
/// Input handling produces these; [`apply_action`] is the only place that mutates
/// [`AppState`] in response to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // Request actions
    /// Navigate to a new path: always a bodiless GET
    CommitPath(String),
    /// Re-send the current path as GET
    Go,
    /// Back to `GET /api/programs`
    Reset,
    /// Send the current request as it is
    Send,
    FollowLink(String),
    CycleMethod,
    SetBody(String),
    SetEndpoint(String),
    SetOrgId(String),

    // Tabs
    SelectTab(ResponseTab),
    NextTab,
    PreviousTab,

    // Structured view
    OutlineUp,
    OutlineDown,
    ToggleSection(String),
    /// Toggle the selected section or follow the selected link
    ActivateSelected,
    CollapseAll,

    // Scrolling (lines)
    ScrollUp(usize),
    ScrollDown(usize),

    ToggleEndpointField,

    // Input modes
    StartEditing(FieldKind),
    CommitEdit,
    CancelEditing,

    SetStatus(String),
    ClearStatus,
}

/// What has to happen after an action was applied
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    IssueRequest,
}

/// Apply an action to the application state
pub fn apply_action(action: AppAction, state: &mut AppState) -> Effect {
    match action {
        AppAction::CommitPath(path) => {
            state.request.current = ApiRequest::get(normalize_path(&path));
            Effect::IssueRequest
        }
        AppAction::Go => {
            if refuse_while_running(state) {
                return Effect::None;
            }
            state.request.current.method = HttpMethod::Get;
            Effect::IssueRequest
        }
        AppAction::Reset => {
            if refuse_while_running(state) {
                return Effect::None;
            }
            state.request.current = ApiRequest::default();
            Effect::IssueRequest
        }
        AppAction::Send => Effect::IssueRequest,
        AppAction::FollowLink(path) => {
            state.request.current = ApiRequest::get(normalize_path(&path));
            Effect::IssueRequest
        }
        AppAction::CycleMethod => {
            state.request.current.method = state.request.current.method.next();
            Effect::None
        }
        AppAction::SetBody(body) => {
            state.request.current.body = (!body.trim().is_empty()).then_some(body);
            Effect::None
        }
        AppAction::SetEndpoint(endpoint) => {
            state.session.endpoint = endpoint;
            Effect::None
        }
        AppAction::SetOrgId(org_id) => {
            if state.session.credentials.org_id == org_id {
                return Effect::None;
            }
            state.session.credentials.org_id = org_id;
            Effect::IssueRequest
        }

        // Tabs
        AppAction::SelectTab(tab) => {
            state.ui.active_tab = tab;
            Effect::None
        }
        AppAction::NextTab => {
            state.ui.active_tab = state.ui.active_tab.next();
            Effect::None
        }
        AppAction::PreviousTab => {
            state.ui.active_tab = state.ui.active_tab.previous();
            Effect::None
        }

        // Structured view
        AppAction::OutlineUp => {
            state.ui.outline_selected = state.ui.outline_selected.saturating_sub(1);
            Effect::None
        }
        AppAction::OutlineDown => {
            let last = state.outline().len().saturating_sub(1);
            state.ui.outline_selected = (state.ui.outline_selected + 1).min(last);
            Effect::None
        }
        AppAction::ToggleSection(id) => {
            if !state.ui.expanded_sections.remove(&id) {
                state.ui.expanded_sections.insert(id);
            }
            state.rebuild_outline();
            clamp_outline_selection(state);
            Effect::None
        }
        AppAction::ActivateSelected => match state.selected_outline_row() {
            Some(OutlineRow::Section { id, .. }) => {
                apply_action(AppAction::ToggleSection(id), state)
            }
            Some(OutlineRow::Link { link, .. }) => {
                apply_action(AppAction::FollowLink(link.target_path()), state)
            }
            _ => Effect::None,
        },
        AppAction::CollapseAll => {
            state.ui.expanded_sections.clear();
            state.rebuild_outline();
            clamp_outline_selection(state);
            Effect::None
        }

        // Scrolling
        AppAction::ScrollUp(lines) => {
            match state.ui.active_tab {
                ResponseTab::Structured => {
                    state.ui.outline_selected = state.ui.outline_selected.saturating_sub(lines);
                }
                ResponseTab::Raw => {
                    state.ui.raw_scroll = state.ui.raw_scroll.saturating_sub(lines);
                }
                ResponseTab::Request => {
                    state.ui.request_scroll = state.ui.request_scroll.saturating_sub(lines);
                }
            }
            Effect::None
        }
        AppAction::ScrollDown(lines) => {
            match state.ui.active_tab {
                ResponseTab::Structured => {
                    state.ui.outline_selected = state.ui.outline_selected.saturating_add(lines);
                    clamp_outline_selection(state);
                }
                ResponseTab::Raw => {
                    state.ui.raw_scroll = state.ui.raw_scroll.saturating_add(lines);
                }
                ResponseTab::Request => {
                    state.ui.request_scroll = state.ui.request_scroll.saturating_add(lines);
                }
            }
            Effect::None
        }

        AppAction::ToggleEndpointField => {
            if state.session.is_production() {
                state.ui.status_message =
                    Some("The production endpoint cannot be changed here".to_string());
            } else {
                state.session.endpoint_field_shown = !state.session.endpoint_field_shown;
            }
            Effect::None
        }

        // Input modes
        AppAction::StartEditing(kind) => {
            let (mode, initial) = match kind {
                FieldKind::Path => (InputMode::EditingPath, state.request.current.path.clone()),
                FieldKind::Body => (
                    InputMode::EditingBody,
                    state.request.current.body.clone().unwrap_or_default(),
                ),
                FieldKind::Endpoint => {
                    if !state.session.endpoint_field_shown {
                        return Effect::None;
                    }
                    (InputMode::EditingEndpoint, state.session.endpoint.clone())
                }
                FieldKind::OrgId => (
                    InputMode::EditingOrgId,
                    state.session.credentials.org_id.clone(),
                ),
            };
            state.input.mode = mode;
            state.input.editor = FieldEditor::begin(kind, initial);
            Effect::None
        }
        AppAction::CommitEdit => commit_edit(state),
        AppAction::CancelEditing => {
            state.input.mode = InputMode::Normal;
            state.input.editor = FieldEditor::default();
            Effect::None
        }

        AppAction::SetStatus(message) => {
            state.ui.status_message = Some(message);
            Effect::None
        }
        AppAction::ClearStatus => {
            state.ui.status_message = None;
            Effect::None
        }
    }
}

fn commit_edit(state: &mut AppState) -> Effect {
    let editor = std::mem::take(&mut state.input.editor);
    let value = editor.content().trim().to_string();

    match editor.kind() {
        FieldKind::Endpoint => {
            if let Err(e) = validate_host(&value) {
                // Stay in the field so the user can fix it
                state.ui.status_message = Some(e);
                state.input.editor = editor;
                return Effect::None;
            }
            state.input.mode = InputMode::Normal;
            apply_action(AppAction::SetEndpoint(value), state)
        }
        FieldKind::Path => {
            state.input.mode = InputMode::Normal;
            apply_action(AppAction::CommitPath(value), state)
        }
        FieldKind::Body => {
            state.input.mode = InputMode::Normal;
            if let Err(e) = editor.validate_json() {
                state.ui.status_message = Some(format!("{e} (sending will fail until fixed)"));
            }
            apply_action(AppAction::SetBody(editor.content().to_string()), state)
        }
        FieldKind::OrgId => {
            state.input.mode = InputMode::Normal;
            apply_action(AppAction::SetOrgId(value), state)
        }
    }
}

/// Go and Reset are disabled while a request is running
fn refuse_while_running(state: &mut AppState) -> bool {
    if state.request.in_flight {
        state.ui.status_message = Some("A request is already running".to_string());
    }
    state.request.in_flight
}

fn clamp_outline_selection(state: &mut AppState) {
    let last = state.outline().len().saturating_sub(1);
    state.ui.outline_selected = state.ui.outline_selected.min(last);
}

/// Paths are appended to the host, so they need a leading slash
fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
