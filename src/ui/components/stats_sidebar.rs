use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::keyboard::display::key_display_name;
use crate::session::stats::LiveStats;
use crate::ui::theme::Theme;

pub struct StatsSidebar<'a> {
    stats: &'a LiveStats,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(stats: &'a LiveStats, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }
}

/// Problem keys joined for display, or the localized "None".
pub fn problem_keys_text(keys: &[char]) -> String {
    if keys.is_empty() {
        return t!("stream.none").into_owned();
    }
    keys.iter()
        .map(|&ch| key_display_name(ch))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-line summary for terminals too narrow for the sidebar.
pub fn compact_summary(stats: &LiveStats) -> String {
    format!(
        "{} {} | {} {}% | {} {}",
        t!("stream.wpm"),
        stats.wpm,
        t!("stream.accuracy"),
        stats.accuracy,
        t!("stream.finger_errors"),
        stats.finger_errors
    )
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let value = Style::default().fg(colors.accent());

        let accuracy_color = if self.stats.accuracy >= 95 {
            colors.success()
        } else if self.stats.accuracy >= 85 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stream.wpm")), label),
                Span::styled(self.stats.wpm.to_string(), value),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stream.accuracy")), label),
                Span::styled(
                    format!("{}%", self.stats.accuracy),
                    Style::default().fg(accuracy_color),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stream.finger_errors")), label),
                Span::styled(
                    self.stats.finger_errors.to_string(),
                    Style::default().fg(colors.error()),
                ),
            ]),
        ];
        for (finger, count) in &self.stats.finger_breakdown {
            lines.push(Line::from(Span::styled(
                format!("  {:<7}{count}", finger.as_str()),
                Style::default().fg(colors.text_remaining()),
            )));
        }
        lines.extend([
            Line::from(""),
            Line::from(Span::styled(format!("{}:", t!("stream.key_errors")), label)),
            Line::from(Span::styled(
                format!("  {}", problem_keys_text(&self.stats.problem_keys)),
                Style::default().fg(colors.warning()),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stream.rhythm")), label),
                Span::styled(format!("{} ms", self.stats.rhythm_ms), value),
            ]),
        ]);

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_keys_text() {
        assert_eq!(problem_keys_text(&[]), "None");
        assert_eq!(problem_keys_text(&['a', ' ', '\n']), "a, Space, Enter");
    }
}
