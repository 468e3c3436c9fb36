use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

/// Shown once every task of a lesson page is done.
pub struct Completion<'a> {
    lesson: &'a str,
    theme: &'a Theme,
}

impl<'a> Completion<'a> {
    pub fn new(lesson: &'a str, theme: &'a Theme) -> Self {
        Self { lesson, theme }
    }
}

impl Widget for Completion<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("completion.title")))
            .border_style(Style::default().fg(colors.success()))
            .style(Style::default().bg(colors.bg()));

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "\u{2713}",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                t!("completion.body", lesson = self.lesson).into_owned(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("[ {} ]", t!("completion.next_topic")),
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(lines)
            .centered()
            .block(block)
            .render(area, buf);
    }
}
