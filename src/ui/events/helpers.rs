//! Helper functions for event handling
//!
//! - State locking helpers (apply actions)
//! - Edit mode checking

use crate::actions::{apply_action, AppAction, Effect};
use crate::state::{read_state, write_state, SharedState};
use crate::types::InputMode;

/// Check if a field or modal is being edited
pub fn is_editing(state: &SharedState) -> bool {
    read_state(state).input.mode != InputMode::Normal
}

/// Apply a single action to state
pub fn apply(state: &SharedState, action: AppAction) -> Effect {
    let mut s = write_state(state);
    apply_action(action, &mut s)
}

/// Apply multiple actions to state; a request is issued if any of them asks for one
pub fn apply_many(state: &SharedState, actions: Vec<AppAction>) -> Effect {
    let mut s = write_state(state);
    let mut effect = Effect::None;
    for action in actions {
        if apply_action(action, &mut s) == Effect::IssueRequest {
            effect = Effect::IssueRequest;
        }
    }
    effect
}
