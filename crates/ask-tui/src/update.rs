//! TUI reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::input::KeyOutcome;
use crate::render;
use crate::scroll::WHEEL_LINES;
use crate::state::AppState;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            handle_frame(app, width, height);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::AnswerSettled(settled) => {
            if app.controller.settle(settled).is_some() {
                app.scroll.scroll_to_bottom();
            }
            vec![]
        }
    }
}

/// Refreshes scroll metrics for the current terminal size.
fn handle_frame(app: &mut AppState, width: u16, height: u16) {
    let area = ratatui::layout::Rect::new(0, 0, width, height);
    let (text_width, viewport) = render::transcript_viewport(area);
    let line_count = render::transcript_lines(app, text_width).len();
    app.scroll.update_metrics(line_count, viewport);
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => app.scroll.scroll_up(WHEEL_LINES),
                MouseEventKind::ScrollDown => app.scroll.scroll_down(WHEEL_LINES),
                _ => {}
            }
            vec![]
        }
        Event::Paste(text) => {
            app.input.paste(app.controller.input_mut(), &text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return vec![UiEffect::Quit],
        KeyCode::Char('c') if ctrl => return vec![UiEffect::Quit],
        KeyCode::PageUp => {
            app.scroll.page_up();
            return vec![];
        }
        KeyCode::PageDown => {
            app.scroll.page_down();
            return vec![];
        }
        _ => {}
    }

    match app.input.handle_key(app.controller.input_mut(), key) {
        KeyOutcome::Submit => submit(app),
        KeyOutcome::Edited | KeyOutcome::Ignored => vec![],
    }
}

fn submit(app: &mut AppState) -> Vec<UiEffect> {
    let Some(query) = app.controller.submit() else {
        return vec![];
    };
    app.input.reset();
    app.scroll.scroll_to_bottom();
    vec![UiEffect::Ask(query)]
}
