//! Full-screen question/answer TUI.

pub mod effects;
pub mod events;
pub mod input;
pub mod render;
pub mod runtime;
pub mod scroll;
pub mod state;
pub mod terminal;
pub mod text;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
use ask_core::config::Config;
use ask_core::providers::AnswerProvider;
pub use runtime::TuiRuntime;

use crate::state::AppState;

/// Runs the interactive session until the user quits.
///
/// # Errors
/// Returns an error if there is no terminal or terminal I/O fails.
pub fn run_interactive_chat(config: &Config, provider: Arc<dyn AnswerProvider>) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Interactive mode requires a terminal.\n\
             Use `ask exec --prompt '...'` for non-interactive use."
        );
    }

    tracing::info!(model = %provider.model(), routing = ?config.answer_routing, "starting tui");

    let state = AppState::new(provider.model(), config.answer_routing);
    let mut runtime = TuiRuntime::new(state, provider)?;
    let result = runtime.run();
    let asked = runtime.state.controller.transcript().len();
    drop(runtime);

    writeln!(stderr(), "Asked {asked} question(s). Goodbye!")?;
    result
}
