//! UI effect types.
//!
//! Effects are what the reducer asks the runtime to do. The reducer never
//! performs I/O itself.

use ask_core::transcript::Query;

#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Leave the event loop.
    Quit,
    /// Spawn one answer call; its result comes back as `UiEvent::AnswerSettled`.
    Ask(Query),
}
