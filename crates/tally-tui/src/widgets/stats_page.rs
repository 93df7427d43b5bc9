use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use tally_core::StatCard;

use super::CounterWidget;
use crate::app::App;
use crate::theme::Theme;

pub struct StatsPageWidget;

impl StatsPageWidget {
    /// Render the visible window of the page into `area`
    ///
    /// The whole page is drawn off-screen in page coordinates and the rows
    /// from `app.scroll` onward are copied into the frame, so partially
    /// visible cards are clipped cleanly.
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let page = Self::render_page(app);

        let buf = frame.buffer_mut();
        let width = area.width.min(app.layout.width);
        for row in 0..area.height {
            let page_y = app.scroll.saturating_add(row);
            if page_y >= app.layout.height {
                break;
            }
            for col in 0..width {
                if let (Some(src), Some(dst)) = (
                    page.cell((col, page_y)),
                    buf.cell_mut((area.x + col, area.y + row)),
                ) {
                    *dst = src.clone();
                }
            }
        }
    }

    /// Draw the full page into a buffer sized to the layout
    pub fn render_page(app: &App) -> Buffer {
        let layout = &app.layout;
        let mut page = Buffer::empty(Rect::new(0, 0, layout.width, layout.height));
        let theme = &app.theme;

        Self::render_hero(&mut page, layout.hero, theme);
        Self::render_header(
            &mut page,
            layout.header,
            &app.config.section.title,
            &app.config.section.subtitle,
            theme,
        );
        for (card, rect) in app.board.cards().iter().zip(&layout.cards) {
            Self::render_card(&mut page, *rect, card, app);
        }
        page
    }

    fn render_hero(buf: &mut Buffer, area: Rect, theme: &Theme) {
        if area.height == 0 {
            return;
        }
        let mut lines = vec![Line::default(); (area.height / 2).saturating_sub(1) as usize];
        lines.push(Line::from(Span::styled(
            "Scroll down to see our numbers",
            Style::default().fg(theme.grey2),
        )));
        lines.push(Line::from(Span::styled("j / ↓", Style::default().fg(theme.grey1))));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.bg0))
            .render(area, buf);
    }

    fn render_header(buf: &mut Buffer, area: Rect, title: &str, subtitle: &str, theme: &Theme) {
        let lines = vec![
            Line::from(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(theme.heading)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                subtitle.to_string(),
                Style::default().fg(theme.fg1),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(theme.bg1))
            .render(area, buf);
    }

    fn render_card(buf: &mut Buffer, area: Rect, card: &StatCard, app: &App) {
        let theme = &app.theme;
        let border = if card.counter.is_visible() {
            theme.card_border_active
        } else {
            theme.card_border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.bg1));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Value
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Label
            ])
            .split(inner);

        CounterWidget::new(&card.counter, app.board.formatter())
            .style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .render(rows[0], buf);

        Paragraph::new(Line::from(Span::styled(
            card.label.clone(),
            Style::default().fg(theme.fg0),
        )))
        .alignment(Alignment::Center)
        .render(rows[2], buf);
    }
}
