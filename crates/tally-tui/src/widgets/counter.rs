use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};

use tally_core::counter::{Counter, NumberFormatter};

/// Renders a counter's current text, centered on one line
pub struct CounterWidget<'a> {
    counter: &'a Counter,
    formatter: &'a dyn NumberFormatter,
    style: Style,
}

impl<'a> CounterWidget<'a> {
    pub fn new(counter: &'a Counter, formatter: &'a dyn NumberFormatter) -> Self {
        Self {
            counter,
            formatter,
            style: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for CounterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.counter.render(self.formatter);
        Paragraph::new(Line::from(text))
            .style(self.style)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
