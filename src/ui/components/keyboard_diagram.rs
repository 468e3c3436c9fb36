use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::keyboard::highlight::Highlight;
use crate::keyboard::layout::{self, KeyCap, KeyDescriptor};
use crate::ui::theme::Theme;

/// The full board with the keys for the next character lit, the last
/// mistyped key marked and CapsLock shown while it is on.
pub struct KeyboardDiagram<'a> {
    highlight: &'a Highlight,
    shake: Option<(usize, usize)>,
    theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(highlight: &'a Highlight, shake: Option<(usize, usize)>, theme: &'a Theme) -> Self {
        Self {
            highlight,
            shake,
            theme,
        }
    }
}

fn key_text(desc: &KeyDescriptor) -> String {
    let label = match (desc.cap, desc.shifted_symbol()) {
        (KeyCap::Char(base), Some(shifted)) => format!("{shifted}{base}"),
        (cap, _) => cap.label(),
    };
    let inner = usize::from(desc.width.saturating_sub(1));
    let label: String = label.chars().take(inner).collect();
    format!("{label:^inner$}")
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.highlight.caps_lock {
            " Keyboard [CAPS] "
        } else {
            " Keyboard "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < layout::ROWS.len() as u16 {
            return;
        }

        for (row_idx, row) in layout::ROWS.iter().enumerate() {
            let y = inner.y + row_idx as u16;
            let mut x = inner.x;

            for (col_idx, desc) in row.iter().enumerate() {
                if x + desc.width > inner.x + inner.width {
                    break;
                }
                let pos = (row_idx, col_idx);

                let style = if self.shake == Some(pos) {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.key_shake())
                        .add_modifier(Modifier::BOLD)
                } else if self.highlight.is_active(pos) {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.key_active())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg()).bg(colors.key_bg())
                };

                buf.set_string(x, y, key_text(desc), style);
                x += desc.width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_text_fits_width() {
        for row in layout::ROWS {
            for desc in *row {
                assert_eq!(key_text(desc).chars().count(), usize::from(desc.width - 1));
            }
        }
    }

    #[test]
    fn test_number_keys_show_shifted_symbol() {
        let one = &layout::ROWS[0][1];
        assert_eq!(key_text(one), "!1 ");
    }

    #[test]
    fn test_rows_fit_diagram_width() {
        for row in layout::ROWS {
            let width: u16 = row.iter().map(|d| d.width).sum();
            assert!(width <= crate::ui::layout::KEYBOARD_WIDTH);
        }
    }
}
