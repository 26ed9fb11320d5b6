//! UI event types.
//!
//! Every input to the reducer is a `UiEvent`: terminal input, frame/tick
//! timing, and results of spawned answer calls arriving through the inbox.

use ask_core::transcript::Settled;
use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum UiEvent {
    /// Start of a loop iteration, with the current terminal size.
    Frame { width: u16, height: u16 },
    /// Animation cadence; also the only event that schedules a redraw.
    Tick,
    /// Raw terminal input.
    Terminal(CrosstermEvent),
    /// An answer call finished (successfully or not).
    AnswerSettled(Settled),
}
