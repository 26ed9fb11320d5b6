//! Single-line input editing.
//!
//! The text itself lives in the transcript controller; this module only keeps
//! the cursor and applies keystrokes to a borrowed `String`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

pub const INPUT_PLACEHOLDER: &str = "Ask me anything...";

/// What a key did to the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The commit key was pressed.
    Submit,
    /// Text or cursor changed.
    Edited,
    /// Not an editing key.
    Ignored,
}

/// Cursor position, counted in chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub cursor: usize,
}

impl InputState {
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Display column of the cursor within `text`.
    pub fn cursor_column(&self, text: &str) -> usize {
        text[..byte_index(text, self.cursor)].width()
    }

    /// Inserts `s` at the cursor.
    pub fn insert_str(&mut self, text: &mut String, s: &str) {
        self.clamp(text);
        text.insert_str(byte_index(text, self.cursor), s);
        self.cursor += s.chars().count();
    }

    /// Inserts pasted text, flattening line breaks to spaces.
    pub fn paste(&mut self, text: &mut String, pasted: &str) {
        let flat = pasted.replace("\r\n", " ").replace(['\r', '\n'], " ");
        self.insert_str(text, &flat);
    }

    /// Applies an editing key.
    pub fn handle_key(&mut self, text: &mut String, key: KeyEvent) -> KeyOutcome {
        self.clamp(text);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let len = text.chars().count();

        match key.code {
            KeyCode::Enter
                if !key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                return KeyOutcome::Submit;
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = len,
            KeyCode::Char('u') if ctrl => {
                text.replace_range(..byte_index(text, self.cursor), "");
                self.cursor = 0;
            }
            KeyCode::Char(c) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert_str(text, c.encode_utf8(&mut buf));
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                text.remove(byte_index(text, self.cursor));
            }
            KeyCode::Delete if self.cursor < len => {
                text.remove(byte_index(text, self.cursor));
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            KeyCode::Backspace | KeyCode::Delete => {}
            _ => return KeyOutcome::Ignored,
        }

        KeyOutcome::Edited
    }

    fn clamp(&mut self, text: &str) {
        self.cursor = self.cursor.min(text.chars().count());
    }
}

fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(idx, _)| idx)
}
