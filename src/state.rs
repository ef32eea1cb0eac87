use crate::config::{Settings, PROD_ENDPOINT};
use crate::editor::FieldEditor;
use crate::error::RequestError;
use crate::hal::{build_outline, HalNode, OutlineRow};
use crate::types::{
    ApiRequest, ApiResponse, Credentials, InputMode, Outcome, RequestFailure, ResponseTab,
};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// State shared between the UI loop and request tasks
pub type SharedState = Arc<RwLock<AppState>>;

/// Read lock that survives a panicked writer
pub fn read_state(state: &SharedState) -> RwLockReadGuard<'_, AppState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_state(state: &SharedState) -> RwLockWriteGuard<'_, AppState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub session: SessionState,
    pub request: RequestState,
    pub ui: UiState,
    pub input: InputState,
}

/// Where requests go and who they are sent as
#[derive(Debug, Clone)]
pub struct SessionState {
    pub endpoint: String,
    pub credentials: Credentials,
    /// Whether the endpoint text field is revealed
    pub endpoint_field_shown: bool,
}

impl SessionState {
    pub fn is_production(&self) -> bool {
        self.endpoint == PROD_ENDPOINT
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestState {
    /// The request that the next send will use
    pub current: ApiRequest,
    pub in_flight: bool,
    /// Bumped for every issued request; only the latest one may land
    pub generation: u64,
    pub response: Option<ApiResponse>,
    /// HAL view of `response`, rebuilt whenever a response lands
    pub hal: Option<HalNode>,
    pub failure: Option<RequestFailure>,
}

impl RequestState {
    /// Mark a new request as in flight and return its generation. The last
    /// failure stays visible until this request completes.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Record a finished request. Returns false (and changes nothing) when a newer
    /// request has been issued since this one started.
    pub fn complete(&mut self, generation: u64, outcome: Outcome) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.in_flight = false;
        match outcome {
            Outcome::Success(response) => {
                self.failure = None;
                self.set_response(Some(response));
            }
            Outcome::Failure { error, response } => {
                self.failure = Some(RequestFailure::from(&error));
                self.set_response(response);
            }
        }
        true
    }

    /// Record a request that failed before it could be sent. Anything still in
    /// flight is superseded; the previous response stays on screen.
    pub fn reject(&mut self, error: &RequestError) {
        self.generation += 1;
        self.in_flight = false;
        self.failure = Some(RequestFailure::from(error));
    }

    fn set_response(&mut self, response: Option<ApiResponse>) {
        self.hal = response
            .as_ref()
            .filter(|r| !r.data.is_null())
            .map(|r| HalNode::from_value(&r.data));
        self.response = response;
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub active_tab: ResponseTab,
    /// Ids of open sections in the structured view
    pub expanded_sections: HashSet<String>,
    /// Rows of the structured view, rebuilt by [`AppState::rebuild_outline`]
    pub outline: Vec<OutlineRow>,
    pub outline_selected: usize,
    pub raw_scroll: usize,
    pub request_scroll: usize,
    /// One-line feedback shown in the footer
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mode: InputMode,
    pub editor: FieldEditor,
}

impl AppState {
    pub fn new(settings: Settings, initial_path: impl Into<String>) -> Self {
        Self {
            session: SessionState {
                endpoint: settings.endpoint,
                credentials: settings.credentials,
                endpoint_field_shown: false,
            },
            request: RequestState {
                current: ApiRequest::get(initial_path),
                ..Default::default()
            },
            ui: UiState::default(),
            input: InputState::default(),
        }
    }

    /// Apply a finished request and reset per-response view state
    pub fn apply_outcome(&mut self, generation: u64, outcome: Outcome) -> bool {
        if !self.request.complete(generation, outcome) {
            return false;
        }

        self.ui.expanded_sections.clear();
        self.ui.outline_selected = 0;
        self.ui.raw_scroll = 0;
        self.rebuild_outline();
        true
    }

    /// Re-flatten the current response; needed after a response lands or the
    /// set of expanded sections changes
    pub fn rebuild_outline(&mut self) {
        self.ui.outline = self
            .request
            .hal
            .as_ref()
            .map(|node| build_outline(node, &self.ui.expanded_sections))
            .unwrap_or_default();
    }

    /// Rows of the structured view for the current response
    pub fn outline(&self) -> &[OutlineRow] {
        &self.ui.outline
    }

    pub fn selected_outline_row(&self) -> Option<OutlineRow> {
        self.ui.outline.get(self.ui.outline_selected).cloned()
    }
}
