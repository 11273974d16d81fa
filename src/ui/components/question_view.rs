use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::exam::session::{QuestionSlot, Section};
use crate::ui::answer_input::AnswerInput;
use crate::ui::theme::Theme;

/// Option keys rendered next to MCQ choices; the recorded answer value is
/// the key, matching what the backend scores against.
pub const OPTION_KEYS: &[char] = &['a', 'b', 'c', 'd', 'e', 'f'];

/// The active question: prompt plus either the MCQ option list or the
/// coding answer buffer.
pub struct QuestionView<'a> {
    slot: &'a QuestionSlot,
    section: Section,
    index: usize,
    editor: Option<&'a AnswerInput>,
    theme: &'a Theme,
}

impl<'a> QuestionView<'a> {
    pub fn new(
        slot: &'a QuestionSlot,
        section: Section,
        index: usize,
        editor: Option<&'a AnswerInput>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            slot,
            section,
            index,
            editor,
            theme,
        }
    }

    fn title(&self) -> String {
        let mut title = format!(
            " Q{} · {} · {} pts ",
            self.index + 1,
            self.slot.subject,
            self.slot.question.score
        );
        if self.slot.marked_for_review {
            title.push_str("· marked ");
        }
        title
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let editing = self.editor.is_some();

        let block = Block::bordered()
            .title(self.title())
            .border_style(Style::default().fg(if editing {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 {
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(inner.height / 3), Constraint::Min(3)])
            .split(inner);

        let prompt = Paragraph::new(self.slot.question.prompt.as_str())
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: false });
        prompt.render(layout[0], buf);

        match self.section {
            Section::Mcq => render_options(&self, layout[1], buf),
            Section::Coding => render_code_answer(&self, layout[1], buf),
        }
    }
}

fn render_options(view: &QuestionView, area: Rect, buf: &mut Buffer) {
    let colors = &view.theme.colors;
    let selected = view.slot.answer.as_deref();

    let mut lines: Vec<Line> = Vec::new();
    for (i, option) in view.slot.question.options.iter().enumerate() {
        let key = OPTION_KEYS.get(i).copied().unwrap_or('?');
        let key_str = key.to_string();
        let is_selected = selected == Some(key_str.as_str());
        let marker = if is_selected { "●" } else { "○" };
        let style = if is_selected {
            Style::default()
                .fg(colors.answered())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        lines.push(Line::from(Span::styled(
            format!(" {marker} [{key}] {option}"),
            style,
        )));
        lines.push(Line::from(""));
    }
    if selected.is_some() {
        lines.push(Line::from(Span::styled(
            " [x] clear answer",
            Style::default().fg(colors.text_dim()),
        )));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(area, buf);
}

fn render_code_answer(view: &QuestionView, area: Rect, buf: &mut Buffer) {
    let colors = &view.theme.colors;

    let mut lines: Vec<Line> = Vec::new();
    if let Some(constraints) = &view.slot.question.constraints {
        lines.push(Line::from(Span::styled(
            format!(" Constraints: {constraints}"),
            Style::default().fg(colors.text_dim()),
        )));
        lines.push(Line::from(""));
    }

    let (text, cursor) = match view.editor {
        Some(editor) => (editor.value().to_string(), Some(editor.cursor_pos())),
        None => (
            view.slot.answer.clone().unwrap_or_default(),
            None,
        ),
    };

    if text.is_empty() && cursor.is_none() {
        lines.push(Line::from(Span::styled(
            " (no answer yet — press Enter to write code)",
            Style::default().fg(colors.text_dim()),
        )));
    } else {
        for (row, line_text) in text.split('\n').enumerate() {
            let line = match cursor {
                // Render the cursor as a highlighted cell on its row
                Some((crow, ccol)) if crow == row => cursor_line(line_text, ccol, view.theme),
                _ => Line::from(Span::styled(
                    line_text.to_string(),
                    Style::default().fg(colors.fg()),
                )),
            };
            lines.push(line);
        }
    }

    Paragraph::new(lines).render(area, buf);
}

fn cursor_line<'a>(text: &str, col: usize, theme: &Theme) -> Line<'a> {
    let colors = &theme.colors;
    let chars: Vec<char> = text.chars().collect();
    let before: String = chars.iter().take(col).collect();
    let at: String = chars.get(col).map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
    let after: String = chars.iter().skip(col + 1).collect();

    Line::from(vec![
        Span::styled(before, Style::default().fg(colors.fg())),
        Span::styled(
            at,
            Style::default().fg(colors.current_fg()).bg(colors.current_bg()),
        ),
        Span::styled(after, Style::default().fg(colors.fg())),
    ])
}
