//! Page geometry and visibility measurement
//!
//! The stats page is laid out in page coordinates (row 0 is the top of the
//! hero block). The terminal shows a window of the page starting at the scroll
//! offset; each card's visible fraction is measured against that window and
//! fed to the counters' visibility port.

use ratatui::layout::Rect;

use tally_core::counter::ElementId;
use tally_core::StatsBoard;

/// Rows taken by one stat card, borders included
pub const CARD_HEIGHT: u16 = 5;
/// Rows taken by the section title and subtitle
pub const HEADER_HEIGHT: u16 = 5;
const CARD_GAP: u16 = 2;
const ROW_GAP: u16 = 1;

/// Cards per row for a page width
pub fn columns_for_width(width: u16) -> u16 {
    if width >= 100 {
        4
    } else if width >= 50 {
        2
    } else {
        1
    }
}

/// Fraction of `element` inside `viewport`, in [0, 1]
pub fn visible_fraction(element: Rect, viewport: Rect) -> f64 {
    let total = element.width as f64 * element.height as f64;
    if total == 0.0 {
        return 0.0;
    }
    let visible = element.intersection(viewport);
    (visible.width as f64 * visible.height as f64 / total).clamp(0.0, 1.0)
}

/// Positions of every page block, in page coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub width: u16,
    pub hero: Rect,
    pub header: Rect,
    pub cards: Vec<Rect>,
    /// Total page height in rows
    pub height: u16,
}

impl PageLayout {
    pub fn compute(width: u16, hero_height: u16, card_count: usize) -> Self {
        let hero = Rect::new(0, 0, width, hero_height);
        let header = Rect::new(0, hero_height, width, HEADER_HEIGHT);
        let grid_y = hero_height.saturating_add(HEADER_HEIGHT);

        let cols = columns_for_width(width).min(card_count.max(1) as u16);
        let card_width = (width.saturating_sub(CARD_GAP * (cols - 1)) / cols).max(1);

        let cards: Vec<Rect> = (0..card_count)
            .map(|idx| {
                let row = idx as u16 / cols;
                let col = idx as u16 % cols;
                Rect::new(
                    col * (card_width + CARD_GAP),
                    grid_y.saturating_add(row * (CARD_HEIGHT + ROW_GAP)),
                    card_width,
                    CARD_HEIGHT,
                )
            })
            .collect();

        let rows = (card_count as u16).div_ceil(cols);
        let height = grid_y.saturating_add(rows * (CARD_HEIGHT + ROW_GAP));

        Self {
            width,
            hero,
            header,
            cards,
            height,
        }
    }

    /// Largest scroll offset that still fills a viewport of `viewport_height`
    pub fn max_scroll(&self, viewport_height: u16) -> u16 {
        self.height.saturating_sub(viewport_height)
    }

    /// The window of the page visible at `scroll`
    pub fn window(&self, scroll: u16, viewport_height: u16) -> Rect {
        Rect::new(0, scroll, self.width, viewport_height)
    }

    /// Measure every card against the window and report to the board
    ///
    /// Returns the elements whose counters were triggered by this pass.
    pub fn report_visibility(
        &self,
        board: &mut StatsBoard,
        scroll: u16,
        viewport_height: u16,
    ) -> Vec<ElementId> {
        let window = self.window(scroll, viewport_height);
        let elements: Vec<ElementId> = board.cards().iter().map(|card| card.element).collect();
        elements
            .into_iter()
            .zip(&self.cards)
            .filter_map(|(element, rect)| {
                board
                    .report_visibility(element, visible_fraction(*rect, window))
                    .then_some(element)
            })
            .collect()
    }
}
