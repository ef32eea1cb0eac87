use crate::actions::Effect;
use crate::config::Settings;
use crate::location::Location;
use crate::request::execute_request_background;
use crate::state::{read_state, AppState, SharedState};
use crate::ui;
use crate::ui::draw;
use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
    DefaultTerminal, Frame,
};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

#[derive(Debug)]
pub struct App {
    state: SharedState,
    client: reqwest::Client,
    location: Option<Location>,
    log_dir: Option<PathBuf>,
    outline_list_state: ListState,
    spinner_index: usize,
    last_tick: Instant,
    event_handler: ui::EventHandler,
}

impl App {
    pub fn new(
        settings: Settings,
        initial_path: String,
        location: Option<Location>,
        log_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            state: Arc::new(RwLock::new(AppState::new(settings, initial_path))),
            client,
            location,
            log_dir,
            outline_list_state: ListState::default(),
            spinner_index: 0,
            last_tick: Instant::now(),
            event_handler: ui::EventHandler::new(),
        })
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // The initial path is requested right away
        self.issue_request();

        // Main UI loop
        while !self.event_handler.should_quit {
            // Update spinner animation
            if self.last_tick.elapsed().as_millis() > 100 {
                self.spinner_index = (self.spinner_index + 1) % 4;
                self.last_tick = Instant::now();
            }

            terminal.draw(|frame| self.draw(frame))?;

            match self.event_handler.handle_events(&self.state)? {
                Effect::IssueRequest => self.issue_request(),
                Effect::None => {}
            }
        }

        tracing::info!("Quitting");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let state = read_state(&self.state);

        let show_endpoint = draw::endpoint_row_visible(&state);
        let failure = state.request.failure.as_ref();

        // Header, request line, [endpoint], [error], response, footer
        let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
        if show_endpoint {
            constraints.push(Constraint::Length(3));
        }
        if failure.is_some() {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(3));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(frame.area());

        let mut next = 0;
        let mut take = || {
            let area = chunks[next];
            next += 1;
            area
        };

        draw::render_header(frame, take(), &state, self.spinner_index);
        draw::render_request_panel(frame, take(), &state);
        if show_endpoint {
            draw::render_endpoint_panel(frame, take(), &state);
        }
        if let Some(failure) = failure {
            draw::render_error_banner(frame, take(), failure, self.log_dir.as_deref());
        }
        draw::render_response_panel(frame, take(), &state, &mut self.outline_list_state);
        draw::render_footer(frame, take(), &state);

        // Render modals LAST - after everything else
        draw::render_active_modal(frame, &state);
    }

    fn issue_request(&self) {
        execute_request_background(
            Arc::clone(&self.state),
            self.client.clone(),
            self.location.clone(),
        );
    }
}
