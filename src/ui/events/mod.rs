//! Event handling system for the playground
//!
//! This module processes user input and translates it into state-changing actions.
//! It handles two families of input modes:
//! - Normal: navigation and commands
//! - Editing: the path, endpoint, body and org id fields
//!
//! # Architecture
//!
//! Input events generate AppActions that are applied to AppState via the
//! apply_action function in actions.rs. Actions report whether a request has to be
//! issued; the handler passes that [`Effect`] back to the app loop, which is the only
//! place requests are started.
//!
//! # Lock Management
//!
//! Locks on the shared state are taken per action and never held across a
//! blocking terminal read.

mod helpers;
mod yank;

pub use helpers::{apply, apply_many, is_editing};

use crate::actions::{AppAction, Effect};
use crate::editor::{FieldKind, KeySource, TerminalKeys};
use crate::state::{read_state, write_state, SharedState};
use crate::types::{InputMode, ResponseTab};
use crate::ui::draw::styling::SCROLL_LINES_PER_ACTION;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Event handler for managing user input and state updates
#[derive(Debug, Default)]
pub struct EventHandler {
    pub should_quit: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait briefly for one input event and apply it
    pub fn handle_events(&mut self, state: &SharedState) -> Result<Effect> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(Effect::None);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(self.handle_key(state, key)),
            Event::Paste(text) => {
                handle_paste(state, &text);
                Ok(Effect::None)
            }
            _ => Ok(Effect::None),
        }
    }

    /// Dispatch a key press based on the input mode
    pub fn handle_key(&mut self, state: &SharedState, key: KeyEvent) -> Effect {
        self.handle_key_with(state, key, &mut TerminalKeys)
    }

    /// Like [`EventHandler::handle_key`], batching typed characters from `keys`
    fn handle_key_with(
        &mut self,
        state: &SharedState,
        key: KeyEvent,
        keys: &mut impl KeySource,
    ) -> Effect {
        // A status message lives until the next key press
        if read_state(state).ui.status_message.is_some() {
            let _ = apply(state, AppAction::ClearStatus);
        }

        if is_editing(state) {
            handle_editing_key(state, key, keys)
        } else {
            self.handle_normal_key(state, key)
        }
    }

    fn handle_normal_key(&mut self, state: &SharedState, key: KeyEvent) -> Effect {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let structured = read_state(state).ui.active_tab == ResponseTab::Structured;

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                Effect::None
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                Effect::None
            }

            // Scrolling
            KeyCode::Char('d') if ctrl => {
                apply(state, AppAction::ScrollDown(SCROLL_LINES_PER_ACTION))
            }
            KeyCode::Char('u') if ctrl => apply(state, AppAction::ScrollUp(SCROLL_LINES_PER_ACTION)),
            KeyCode::Char('j') | KeyCode::Down if structured => apply(state, AppAction::OutlineDown),
            KeyCode::Char('k') | KeyCode::Up if structured => apply(state, AppAction::OutlineUp),
            KeyCode::Char('j') | KeyCode::Down => apply(state, AppAction::ScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up => apply(state, AppAction::ScrollUp(1)),

            // Request
            KeyCode::Char('/') => apply(state, AppAction::StartEditing(FieldKind::Path)),
            KeyCode::Char('g') => apply(state, AppAction::Go),
            KeyCode::Char('R') => apply(state, AppAction::Reset),
            KeyCode::Char('m') => apply(state, AppAction::CycleMethod),
            KeyCode::Char('b') => apply(state, AppAction::StartEditing(FieldKind::Body)),
            KeyCode::Char('s') => apply(state, AppAction::Send),
            KeyCode::Char('o') => apply(state, AppAction::StartEditing(FieldKind::OrgId)),
            KeyCode::Char('e') => apply(state, AppAction::ToggleEndpointField),
            KeyCode::Char('E') => {
                let mut actions = Vec::new();
                if !read_state(state).session.endpoint_field_shown {
                    actions.push(AppAction::ToggleEndpointField);
                }
                actions.push(AppAction::StartEditing(FieldKind::Endpoint));
                apply_many(state, actions)
            }

            // Tabs
            KeyCode::Tab => apply(state, AppAction::NextTab),
            KeyCode::BackTab => apply(state, AppAction::PreviousTab),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                match ResponseTab::from_index(index) {
                    Some(tab) => apply(state, AppAction::SelectTab(tab)),
                    None => Effect::None,
                }
            }

            // Structured view
            KeyCode::Enter | KeyCode::Char(' ') => apply(state, AppAction::ActivateSelected),
            KeyCode::Char('c') => apply(state, AppAction::CollapseAll),
            KeyCode::Char('y') => {
                yank::handle_yank(state);
                Effect::None
            }

            _ => Effect::None,
        }
    }
}

/// Bracketed paste: the whole text arrives as one event
fn handle_paste(state: &SharedState, text: &str) {
    let mut s = write_state(state);
    if s.input.mode != InputMode::Normal {
        s.input.editor.insert_str_normalized(text);
        tracing::debug!("Pasted {} characters", text.chars().count());
    }
}

fn handle_editing_key(state: &SharedState, key: KeyEvent, keys: &mut impl KeySource) -> Effect {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Enter => apply(state, AppAction::CommitEdit),
        KeyCode::Esc => apply(state, AppAction::CancelEditing),
        KeyCode::Char('f') if ctrl => {
            let formatted = {
                let mut s = write_state(state);
                if s.input.mode != InputMode::EditingBody {
                    return Effect::None;
                }
                s.input.editor.format_json()
            };
            match formatted {
                Ok(()) => Effect::None,
                Err(e) => apply(state, AppAction::SetStatus(e)),
            }
        }
        KeyCode::Char(c) if !ctrl => {
            let batch = write_state(state).input.editor.handle_paste_batch(c, keys);
            if batch.count > 1 {
                tracing::debug!("Pasted {} characters", batch.count);
            }
            match batch.pending {
                Some(next) => handle_editing_key(state, next, keys),
                None => Effect::None,
            }
        }
        _ => {
            let _ = write_state(state).input.editor.handle_key_event(key);
            Effect::None
        }
    }
}
