use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::exam::navigator::{Navigator, SlotStatus};
use crate::exam::session::ExamSession;
use crate::ui::theme::Theme;

/// Grid of numbered question cells for the active section, colored by the
/// navigator's status contract: current, marked, answered, unanswered.
pub struct QuestionPalette<'a> {
    session: &'a ExamSession,
    navigator: &'a Navigator,
    theme: &'a Theme,
}

impl<'a> QuestionPalette<'a> {
    pub fn new(session: &'a ExamSession, navigator: &'a Navigator, theme: &'a Theme) -> Self {
        Self {
            session,
            navigator,
            theme,
        }
    }
}

impl Widget for QuestionPalette<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let section = self.navigator.section;

        let block = Block::bordered()
            .title(format!(" {} Questions ", section.title()))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 6 || inner.height < 2 {
            return;
        }

        let cell_width: u16 = 5;
        let per_row = (inner.width / cell_width).max(1);

        for (i, _) in self.session.slots(section).iter().enumerate() {
            let row = i as u16 / per_row;
            let col = i as u16 % per_row;
            let y = inner.y + row;
            // Reserve the last two rows for the legend
            if y + 2 >= inner.y + inner.height {
                break;
            }
            let x = inner.x + col * cell_width;

            let status = self.navigator.slot_status(self.session, section, i);
            let style = match status {
                SlotStatus::Current => Style::default().fg(colors.current_fg()).bg(colors.current_bg()),
                SlotStatus::Marked => Style::default().fg(colors.bg()).bg(colors.marked()),
                SlotStatus::Answered => Style::default().fg(colors.bg()).bg(colors.answered()),
                SlotStatus::Unanswered => Style::default().fg(colors.fg()).bg(colors.unanswered()),
            };

            let display = format!("[{:>2}]", i + 1);
            buf.set_string(x, y, &display, style);
        }

        let legend_y = inner.y + inner.height - 1;
        let answered = self.session.answered_count();
        let marked = self.session.marked_count();
        let total = self.session.total_questions();
        let legend = format!(" {answered}/{total} answered · {marked} marked");
        buf.set_string(
            inner.x,
            legend_y,
            &legend,
            Style::default().fg(colors.text_dim()),
        );
    }
}
