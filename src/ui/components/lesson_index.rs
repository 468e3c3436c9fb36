use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::course::index::{IndexRow, LessonIndex};
use crate::ui::theme::Theme;

/// First visible row: the scroll anchor's header when set, moved as little
/// as needed to keep the focused row on screen.
pub fn scroll_offset(anchor: Option<usize>, focus: usize, rows: usize, height: usize) -> usize {
    if height == 0 || rows <= height {
        return 0;
    }
    let max_offset = rows - height;
    let mut offset = anchor.unwrap_or(0).min(max_offset);
    if focus < offset {
        offset = focus;
    } else if focus >= offset + height {
        offset = focus + 1 - height;
    }
    offset.min(max_offset)
}

/// Collapsible categories of lessons with completion checkmarks.
pub struct LessonIndexView<'a> {
    index: &'a LessonIndex,
    course_title: &'a str,
    theme: &'a Theme,
}

impl<'a> LessonIndexView<'a> {
    pub fn new(index: &'a LessonIndex, course_title: &'a str, theme: &'a Theme) -> Self {
        Self {
            index,
            course_title,
            theme,
        }
    }

    fn row_line(&self, row: IndexRow, focused: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let marker = if focused { ">" } else { " " };
        let base = if focused {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let check = |done: bool| {
            Span::styled(
                if done { " \u{2713}" } else { "" },
                Style::default().fg(colors.success()),
            )
        };

        match row {
            IndexRow::Category(ci) => {
                let category = &self.index.categories[ci];
                let arrow = if category.expanded { "\u{25be}" } else { "\u{25b8}" };
                Line::from(vec![
                    Span::styled(format!("{marker} {arrow} {}", category.title), base),
                    check(category.complete),
                ])
            }
            IndexRow::Lesson(ci, li) => {
                let lesson = &self.index.categories[ci].lessons[li];
                let mut spans = vec![Span::styled(
                    format!("{marker}     {}", lesson.title),
                    base,
                )];
                if lesson.prefix.is_none() {
                    spans.push(Span::styled(
                        format!(" {}", t!("index.no_link")),
                        Style::default().fg(colors.text_remaining()),
                    ));
                }
                spans.push(check(lesson.complete));
                Line::from(spans)
            }
        }
    }
}

impl Widget for LessonIndexView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = format!(
            " {} | {} ",
            self.course_title,
            t!(
                "index.progress",
                done = self.index.completed_lessons(),
                total = self.index.total_lessons()
            )
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = self.index.visible_rows();
        let focused = self.index.focused_row();
        let focus_pos = rows.iter().position(|r| Some(*r) == focused).unwrap_or(0);
        let anchor = self
            .index
            .scroll_to
            .and_then(|c| rows.iter().position(|r| *r == IndexRow::Category(c)));
        let offset = scroll_offset(anchor, focus_pos, rows.len(), usize::from(inner.height));

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(usize::from(inner.height))
            .map(|(i, row)| self.row_line(*row, i == focus_pos))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
