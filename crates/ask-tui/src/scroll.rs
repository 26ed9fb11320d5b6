//! Transcript scroll state.

/// Lines moved per mouse wheel notch.
pub const WHEEL_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// Pinned to the bottom; new content scrolls into view.
    #[default]
    FollowLatest,
    /// The user scrolled away; `offset` is the first visible line.
    Anchored { offset: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Transcript line count at the last frame.
    pub line_count: usize,
    /// Transcript viewport height at the last frame.
    pub viewport: usize,
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.mode == ScrollMode::FollowLatest
    }

    fn max_offset(&self) -> usize {
        self.line_count.saturating_sub(self.viewport)
    }

    /// First visible line for a transcript of `line_count` lines.
    pub fn offset_for(&self, line_count: usize) -> usize {
        let max = line_count.saturating_sub(self.viewport);
        match self.mode {
            ScrollMode::FollowLatest => max,
            ScrollMode::Anchored { offset } => offset.min(max),
        }
    }

    pub fn update_metrics(&mut self, line_count: usize, viewport: usize) {
        self.line_count = line_count;
        self.viewport = viewport;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let offset = self.offset_for(self.line_count).saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    /// Scrolls down, re-pinning to the bottom once it is reached.
    pub fn scroll_down(&mut self, lines: usize) {
        let ScrollMode::Anchored { offset } = self.mode else {
            return;
        };
        let max = self.max_offset();
        let offset = offset.min(max) + lines;
        self.mode = if offset >= max {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Anchored { offset }
        };
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport.max(1));
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrolled(line_count: usize, viewport: usize) -> ScrollState {
        let mut scroll = ScrollState::default();
        scroll.update_metrics(line_count, viewport);
        scroll
    }

    #[test]
    fn test_follow_shows_bottom() {
        let scroll = scrolled(50, 10);
        assert!(scroll.is_following());
        assert_eq!(scroll.offset_for(50), 40);
        assert_eq!(scroll.offset_for(5), 0);
    }

    #[test]
    fn test_scroll_up_anchors() {
        let mut scroll = scrolled(50, 10);
        scroll.scroll_up(WHEEL_LINES);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 37 });

        scroll.scroll_up(100);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 0 });
    }

    #[test]
    fn test_scroll_down_repins_at_bottom() {
        let mut scroll = scrolled(50, 10);
        scroll.page_up();
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 30 });

        scroll.scroll_down(5);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 35 });

        scroll.page_down();
        assert!(scroll.is_following());
    }

    #[test]
    fn test_anchored_offset_clamps_when_content_shrinks() {
        let mut scroll = scrolled(50, 10);
        scroll.mode = ScrollMode::Anchored { offset: 45 };
        assert_eq!(scroll.offset_for(20), 10);
    }
}
