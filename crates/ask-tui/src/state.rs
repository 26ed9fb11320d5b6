//! Application state.
//!
//! ```text
//! AppState
//! ├── controller: Controller  (input text + transcript)
//! ├── input: InputState       (cursor)
//! ├── scroll: ScrollState     (transcript viewport)
//! └── model, spinner_frame, should_quit
//! ```

use ask_core::transcript::{AnswerRouting, Controller};

use crate::input::InputState;
use crate::scroll::ScrollState;

pub struct AppState {
    pub controller: Controller,
    pub input: InputState,
    pub scroll: ScrollState,
    /// Model name shown in the status line.
    pub model: String,
    /// Advanced on every tick; drives the pending spinner.
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(model: impl Into<String>, routing: AnswerRouting) -> Self {
        Self {
            controller: Controller::new(routing),
            input: InputState::default(),
            scroll: ScrollState::default(),
            model: model.into(),
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// True while at least one answer call is in flight.
    pub fn is_waiting(&self) -> bool {
        self.controller.transcript().pending_count() > 0
    }
}
