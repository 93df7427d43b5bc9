//! Stats board: the set of counters shown on the page
//!
//! Owns one [`Counter`] per configured stat, the bounds-polling visibility
//! port they are mounted on, the shared clock and the number formatter.
//! Dropping the board releases every observation.

use std::rc::Rc;

use crate::config::AppConfig;
use crate::counter::{
    Clock, Counter, ElementId, GroupingFormatter, NumberFormatter, PollingViewport,
};

/// One stat card: a label and its counter
#[derive(Debug)]
pub struct StatCard {
    pub label: String,
    pub element: ElementId,
    pub counter: Counter,
}

pub struct StatsBoard {
    cards: Vec<StatCard>,
    port: PollingViewport,
    clock: Rc<dyn Clock>,
    formatter: GroupingFormatter,
    threshold: f64,
}

impl std::fmt::Debug for StatsBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsBoard")
            .field("cards", &self.cards)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl StatsBoard {
    /// Build and mount one counter per configured stat
    pub fn from_config(config: &AppConfig, clock: Rc<dyn Clock>) -> crate::Result<Self> {
        config.validate()?;
        let specs = config.counter_specs()?;

        let cards = config
            .stats
            .iter()
            .zip(specs)
            .enumerate()
            .map(|(idx, (stat, spec))| {
                let element = ElementId(idx as u32);
                StatCard {
                    label: stat.label.clone(),
                    element,
                    counter: Counter::new(spec, Some(element)).with_easing(config.counter.easing),
                }
            })
            .collect();

        let mut board = Self {
            cards,
            port: PollingViewport::new(),
            clock,
            formatter: GroupingFormatter::new(config.counter.thousands_separator.clone()),
            threshold: config.counter.visibility_threshold,
        };
        board.mount();
        Ok(board)
    }

    fn mount(&mut self) {
        for card in &mut self.cards {
            card.counter.mount(&mut self.port, self.threshold);
        }
        tracing::debug!(cards = self.cards.len(), "Mounted stat counters");
    }

    pub fn cards(&self) -> &[StatCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn formatter(&self) -> &GroupingFormatter {
        &self.formatter
    }

    /// Feed one visibility sample for a card's element
    pub fn report_visibility(&mut self, element: ElementId, visible_fraction: f64) -> bool {
        self.port.report(element, visible_fraction)
    }

    /// Advance every counter by one frame; `true` while any needs another
    pub fn on_frame(&mut self) -> bool {
        let mut needs_frame = false;
        for card in &mut self.cards {
            needs_frame |= card.counter.on_frame(&self.clock);
        }
        needs_frame
    }

    pub fn is_animating(&self) -> bool {
        self.cards.iter().any(|card| card.counter.is_animating())
    }

    /// Current text of the card at `idx`
    pub fn text(&self, idx: usize) -> Option<String> {
        self.cards
            .get(idx)
            .map(|card| card.counter.render(&self.formatter))
    }

    /// Text the card at `idx` shows once its count-up completes
    pub fn final_text(&self, idx: usize) -> Option<String> {
        self.cards.get(idx).map(|card| {
            let spec = card.counter.spec();
            format!(
                "{}{}{}",
                spec.prefix,
                self.formatter.format(spec.end_value),
                spec.suffix
            )
        })
    }

    /// Reset every counter so it counts up again on its next visibility
    pub fn replay(&mut self) {
        for card in &mut self.cards {
            card.counter.replay(&mut self.port, self.threshold);
        }
        tracing::debug!("Replaying stat counters");
    }

    /// Release all observations and stop every running loop
    pub fn teardown(&mut self) {
        for card in &mut self.cards {
            card.counter.teardown(&mut self.port);
        }
    }
}

impl Drop for StatsBoard {
    fn drop(&mut self) {
        self.teardown();
    }
}
