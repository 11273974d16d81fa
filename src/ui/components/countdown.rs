use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::exam::timer::TimeRemaining;
use crate::ui::theme::Theme;

const LOW_TIME_SECS: i64 = 5 * 60;

/// Countdown banner. `None` means the deadline could not be derived (start
/// time missing or unparseable); the rest of the screen stays functional
/// and the banner shows "--:--:--".
pub struct Countdown<'a> {
    remaining: Option<TimeRemaining>,
    theme: &'a Theme,
}

impl<'a> Countdown<'a> {
    pub fn new(remaining: Option<TimeRemaining>, theme: &'a Theme) -> Self {
        Self { remaining, theme }
    }
}

impl Widget for Countdown<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Time Left ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let (text, color) = match self.remaining {
            None => ("--:--:--".to_string(), colors.text_dim()),
            Some(r) if r.is_zero() => (format!("{r}  TIME IS UP"), colors.error()),
            Some(r) if r.total_seconds() < LOW_TIME_SECS => (r.to_string(), colors.warning()),
            Some(r) => (r.to_string(), colors.fg()),
        };

        let line = Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        Paragraph::new(line).alignment(Alignment::Center).render(inner, buf);
    }
}
