//! Terminal lifecycle.
//!
//! The terminal is restored on normal exit (runtime `Drop`) and on panic
//! (hook installed before entering raw mode).

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Tty = Terminal<CrosstermBackend<Stdout>>;

/// Enters raw mode and the alternate screen, with paste and mouse reporting.
///
/// # Errors
/// Returns an error if the terminal rejects any of the mode changes.
///
/// If a step after raw mode fails, the terminal is restored before the error
/// is returned.
pub fn enter() -> Result<Tty> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    restore_on_err(enter_screen(), || {
        let _ = leave();
    })
}

fn enter_screen() -> Result<Tty> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )
    .context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_on_err<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

/// Puts the terminal back the way the shell expects it. Idempotent.
///
/// # Errors
/// Returns an error if leaving the alternate screen or raw mode fails.
pub fn leave() -> Result<()> {
    // Input features go first, while still in raw mode.
    let _ = execute!(io::stdout(), DisableMouseCapture, DisableBracketedPaste);
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Chains a panic hook that restores the terminal before the panic prints.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = leave();
        previous(info);
    }));
}
