use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// One-line bar for the share of the current task already typed.
pub struct ProgressBar<'a> {
    ratio: f64,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(ratio: f64, theme: &'a Theme) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            theme,
        }
    }
}

pub fn filled_cells(ratio: f64, width: u16) -> u16 {
    (ratio.clamp(0.0, 1.0) * f64::from(width)).round() as u16
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let filled = filled_cells(self.ratio, area.width);
        for x in area.x..area.x + area.width {
            let style = if x < area.x + filled {
                Style::default().bg(colors.bar_filled())
            } else {
                Style::default().bg(colors.bar_empty())
            };
            buf[(x, area.y)].set_style(style);
        }

        let label = format!("{:.0}%", self.ratio * 100.0);
        let label_x = area.x + (area.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, area.y, &label, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(0.0, 40), 0);
        assert_eq!(filled_cells(0.5, 40), 20);
        assert_eq!(filled_cells(1.5, 40), 40);
    }
}
