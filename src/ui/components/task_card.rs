use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::session::cards::{CardDrill, CheckOutcome};
use crate::ui::text_area::TextArea;
use crate::ui::theme::Theme;

/// The open task: instruction, expected code, the answer editor, feedback
/// and a live preview of the answer.
pub struct TaskCard<'a> {
    drill: &'a CardDrill,
    editor: &'a TextArea,
    theme: &'a Theme,
}

impl<'a> TaskCard<'a> {
    pub fn new(drill: &'a CardDrill, editor: &'a TextArea, theme: &'a Theme) -> Self {
        Self {
            drill,
            editor,
            theme,
        }
    }
}

fn line_count(text: &str) -> u16 {
    text.lines().count().max(1) as u16
}

impl Widget for TaskCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(task) = self.drill.current_task() else {
            return;
        };
        let index = self.drill.current_index();

        let mut title = vec![Span::styled(
            format!(" {} ", t!("cards.task_title", number = index + 1)),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if self.drill.is_done(index) {
            title.push(Span::styled("\u{2713} ", Style::default().fg(colors.success())));
        }
        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let expected_height = line_count(&task.code_to_type) + 2;
        let input_height = (line_count(self.editor.value()) + 2).max(5);
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(expected_height),
                Constraint::Length(input_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .split(inner);

        Paragraph::new(task.instruction.as_str())
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: true })
            .render(sections[0], buf);

        Paragraph::new(Text::from(task.code_to_type.as_str()))
            .style(Style::default().fg(colors.warning()))
            .block(
                Block::bordered()
                    .title(format!(" {} ", t!("cards.expected")))
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(sections[1], buf);

        let input_block = Block::bordered()
            .title(format!(" {} ", t!("cards.input")))
            .border_style(Style::default().fg(colors.border_focused()));
        let input_inner = input_block.inner(sections[2]);
        Paragraph::new(Text::from(self.editor.value()))
            .style(Style::default().fg(colors.fg()))
            .block(input_block)
            .render(sections[2], buf);
        let (line, col) = self.editor.cursor_position();
        let (cx, cy) = (input_inner.x + col as u16, input_inner.y + line as u16);
        if cx < input_inner.right() && cy < input_inner.bottom() {
            buf[(cx, cy)].set_style(
                Style::default()
                    .fg(colors.text_current_fg())
                    .bg(colors.text_current_bg()),
            );
        }

        let feedback_style = match (self.drill.just_passed, self.drill.outcome()) {
            (true, _) => Style::default().fg(colors.success()),
            (false, Some(CheckOutcome::Match)) | (false, None) => Style::default().fg(colors.fg()),
            (false, Some(_)) => Style::default().fg(colors.error()),
        };
        Paragraph::new(self.drill.feedback().unwrap_or_default())
            .style(feedback_style)
            .render(sections[3], buf);

        let submit = if self.drill.can_submit() {
            Span::styled(
                format!("[ {} ]", t!("cards.submit_ready")),
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                t!("cards.submit_disabled").into_owned(),
                Style::default().fg(colors.text_remaining()),
            )
        };
        Paragraph::new(Line::from(submit)).render(sections[4], buf);

        Paragraph::new(self.drill.preview())
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(format!(" {} ", t!("cards.preview")))
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(sections[5], buf);
    }
}
