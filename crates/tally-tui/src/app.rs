use std::rc::Rc;

use anyhow::Result;
use ratatui::layout::Rect;

use tally_core::counter::Clock;
use tally_core::{AppConfig, StatsBoard};

use crate::input::Action;
use crate::theme::Theme;
use crate::viewport::PageLayout;

/// Stats page state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub board: StatsBoard,
    /// Page layout for the last known viewport width
    pub layout: PageLayout,
    /// First page row shown at the top of the viewport
    pub scroll: u16,
    /// Size of the page area in the terminal
    pub viewport: Rect,
    pub pending_key: Option<char>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, clock: Rc<dyn Clock>) -> Result<Self> {
        let board = StatsBoard::from_config(&config, clock)?;
        let layout = PageLayout::compute(0, config.ui.hero_height, board.len());
        Ok(Self {
            config,
            theme: Theme::default(),
            board,
            layout,
            scroll: 0,
            viewport: Rect::default(),
            pending_key: None,
            status_message: None,
            should_quit: false,
        })
    }

    /// Record the page area and recompute the layout when the width changes
    pub fn set_viewport(&mut self, area: Rect) {
        if area.width != self.layout.width {
            self.layout =
                PageLayout::compute(area.width, self.config.ui.hero_height, self.board.len());
        }
        self.viewport = area;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn max_scroll(&self) -> u16 {
        self.layout.max_scroll(self.viewport.height)
    }

    /// Run one frame: measure card visibility, then advance the counters
    ///
    /// Returns `true` while any counter needs another frame.
    pub fn update(&mut self) -> bool {
        let triggered = self.layout.report_visibility(
            &mut self.board,
            self.scroll,
            self.viewport.height,
        );
        for element in triggered {
            tracing::debug!(element = element.0, scroll = self.scroll, "Card entered viewport");
        }
        self.board.on_frame()
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.max_scroll() as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as u16;
    }

    fn half_page(&self) -> i32 {
        (self.viewport.height / 2).max(1) as i32
    }

    fn full_page(&self) -> i32 {
        self.viewport.height.max(1) as i32
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Apply an input action
    pub fn apply(&mut self, action: Action) {
        if action != Action::PendingG {
            self.pending_key = None;
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll_by(1),
            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollHalfPageDown => self.scroll_by(self.half_page()),
            Action::ScrollHalfPageUp => self.scroll_by(-self.half_page()),
            Action::ScrollPageDown => self.scroll_by(self.full_page()),
            Action::ScrollPageUp => self.scroll_by(-self.full_page()),
            Action::JumpToTop => self.scroll = 0,
            Action::JumpToBottom => self.scroll = self.max_scroll(),
            Action::PendingG => self.pending_key = Some('g'),
            Action::Replay => {
                self.board.replay();
                self.set_status("Replaying counters");
            }
            Action::None => {}
        }
    }

    /// Release every visibility observation before exit
    pub fn shutdown(&mut self) {
        self.board.teardown();
    }
}
