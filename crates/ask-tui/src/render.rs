//! Pure view functions.
//!
//! Everything here reads `&AppState` and draws; nothing mutates state or
//! returns effects.

use ask_core::transcript::Answer;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::input::INPUT_PLACEHOLDER;
use crate::state::AppState;
use crate::text::{truncate_with_ellipsis, wrap};

pub const SIDEBAR_TITLE: &str = " Questions ";
pub const SIDEBAR_PLACEHOLDER: &str = "Your questions will appear here...";
pub const TRANSCRIPT_PLACEHOLDER: &str = "Ask something to start...";

const INPUT_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 1;

const KEY_HINT: &str = "Enter send · PgUp/PgDn scroll · Esc quit ";

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
/// Ticks per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 6;

/// Screen regions.
#[derive(Debug, Clone, Copy)]
pub struct Panes {
    pub sidebar: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Sidebar takes a quarter of the width; the rest stacks transcript, input
/// and status line.
pub fn layout(area: Rect) -> Panes {
    let [sidebar, main] =
        Layout::horizontal([Constraint::Percentage(25), Constraint::Percentage(75)]).areas(area);
    let [transcript, input, status] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(main);

    Panes {
        sidebar,
        transcript,
        input,
        status,
    }
}

/// Inner (width, height) of the bordered transcript pane.
pub fn transcript_viewport(area: Rect) -> (usize, usize) {
    let pane = layout(area).transcript;
    (
        usize::from(pane.width.saturating_sub(2)),
        usize::from(pane.height.saturating_sub(2)),
    )
}

pub fn render(app: &AppState, frame: &mut Frame) {
    let panes = layout(frame.area());

    render_sidebar(app, frame, panes.sidebar);
    render_transcript(app, frame, panes.transcript);
    render_input(app, frame, panes.input);
    render_status(app, frame, panes.status);
}

fn spinner(app: &AppState) -> &'static str {
    SPINNER_FRAMES[(app.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len()]
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn render_sidebar(app: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::bordered().title(SIDEBAR_TITLE);
    let inner = block.inner(area);
    let width = usize::from(inner.width);
    let exchanges = app.controller.transcript().exchanges();

    let lines: Vec<Line<'static>> = if exchanges.is_empty() {
        wrap(SIDEBAR_PLACEHOLDER, width)
            .into_iter()
            .map(|line| Line::styled(line, dim()))
            .collect()
    } else {
        // Newest questions stay visible when the list overflows.
        let skip = exchanges.len().saturating_sub(usize::from(inner.height));
        exchanges
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(idx, exchange)| {
                let label = format!("{}. {}", idx + 1, exchange.question().trim());
                let style = if exchange.answer().is_pending() {
                    Style::default().add_modifier(Modifier::ITALIC)
                } else {
                    Style::default()
                };
                Line::styled(truncate_with_ellipsis(&label, width), style)
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Builds the transcript as display lines wrapped to `width`.
pub fn transcript_lines(app: &AppState, width: usize) -> Vec<Line<'static>> {
    let exchanges = app.controller.transcript().exchanges();
    if exchanges.is_empty() {
        return vec![Line::styled(TRANSCRIPT_PLACEHOLDER, dim())];
    }

    let you = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let ai = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    for (idx, exchange) in exchanges.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }

        lines.push(Line::styled("You:", you));
        lines.extend(wrap(exchange.question(), width).into_iter().map(Line::from));

        let answer = exchange.answer();
        let body = match answer {
            Answer::Pending => dim().add_modifier(Modifier::ITALIC),
            Answer::Failed => Style::default().fg(Color::Red),
            Answer::Resolved(_) => Style::default(),
        };
        lines.push(Line::styled("AI:", ai));
        lines.extend(
            wrap(answer.text(), width)
                .into_iter()
                .map(|line| Line::styled(line, body)),
        );
    }
    lines
}

fn render_transcript(app: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::bordered();
    let inner = block.inner(area);
    let lines = transcript_lines(app, usize::from(inner.width));

    let offset = app.scroll.offset_for(lines.len());
    let visible: Vec<Line<'static>> = lines
        .into_iter()
        .skip(offset)
        .take(usize::from(inner.height))
        .collect();

    let block = if app.scroll.is_following() {
        block
    } else {
        block.title_bottom(Line::styled(" ↓ more ", dim()).right_aligned())
    };
    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn render_input(app: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::bordered();
    let inner = block.inner(area);
    let text = app.controller.input();

    if text.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(INPUT_PLACEHOLDER, dim())).block(block),
            area,
        );
        frame.set_cursor_position((inner.x, inner.y));
        return;
    }

    // Scroll horizontally so the cursor stays inside the box.
    let column = app.input.cursor_column(text);
    let width = usize::from(inner.width.max(1));
    let start = column.saturating_sub(width - 1);
    let start_u16 = u16::try_from(start).unwrap_or(u16::MAX);
    let cursor_x = u16::try_from(column - start).unwrap_or(0);

    frame.render_widget(
        Paragraph::new(text.to_string())
            .block(block)
            .scroll((0, start_u16)),
        area,
    );
    frame.set_cursor_position((inner.x + cursor_x, inner.y));
}

fn render_status(app: &AppState, frame: &mut Frame, area: Rect) {
    let transcript = app.controller.transcript();
    let pending = transcript.pending_count();

    let mut spans = vec![
        Span::styled(format!(" {} ", app.model), Style::default().fg(Color::Magenta)),
        Span::styled("· ", dim()),
        Span::raw(format!("{} asked ", transcript.len())),
    ];
    if pending > 0 {
        spans.push(Span::styled("· ", dim()));
        spans.push(Span::styled(
            format!("{} {pending} pending", spinner(app)),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hint = Line::styled(KEY_HINT, dim());
    let [left, right] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(u16::try_from(hint.width()).unwrap_or(0)),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(Line::from(spans)), left);
    frame.render_widget(Paragraph::new(hint), right);
}

#[cfg(test)]
mod tests {
    use ask_core::transcript::{AnswerRouting, Settled};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn screen(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_empty_state_shows_placeholders() {
        let app = AppState::new("gemini-2.5-flash", AnswerRouting::Exchange);

        let out = screen(&app, 160, 20);

        assert!(out.contains("Questions"));
        assert!(out.contains(SIDEBAR_PLACEHOLDER));
        assert!(out.contains(TRANSCRIPT_PLACEHOLDER));
        assert!(out.contains(INPUT_PLACEHOLDER));
        assert!(out.contains("gemini-2.5-flash"));
    }

    #[test]
    fn test_transcript_lines_show_exchange_blocks() {
        let mut app = AppState::new("m", AnswerRouting::Exchange);
        app.controller.input_mut().push_str("What is 2+2?");
        let query = app.controller.submit().unwrap();
        app.controller.input_mut().push_str("And 3+3?");
        app.controller.submit().unwrap();
        app.controller.settle(Settled {
            exchange: query.exchange,
            outcome: Ok("4".to_string()),
        });

        let lines: Vec<String> = transcript_lines(&app, 40).iter().map(line_text).collect();

        assert_eq!(
            lines,
            [
                "You:",
                "What is 2+2?",
                "AI:",
                "4",
                "",
                "You:",
                "And 3+3?",
                "AI:",
                "⏳ Thinking...",
            ]
        );
    }

    #[test]
    fn test_sidebar_lists_questions() {
        let mut app = AppState::new("m", AnswerRouting::Exchange);
        app.controller.input_mut().push_str("first question");
        app.controller.submit().unwrap();

        let out = screen(&app, 160, 20);

        assert!(out.contains("1. first question"));
        assert!(!out.contains(SIDEBAR_PLACEHOLDER));
        assert!(out.contains("1 pending"));
    }
}
