use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::keyboard::display::whitespace_glyph;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Typed,
    Current,
    Remaining,
}

pub fn char_state(idx: usize, char_index: usize) -> CharState {
    match idx.cmp(&char_index) {
        std::cmp::Ordering::Less => CharState::Typed,
        std::cmp::Ordering::Equal => CharState::Current,
        std::cmp::Ordering::Greater => CharState::Remaining,
    }
}

/// The current task's text, one styled span per character.
pub struct TypingArea<'a> {
    text: &'a str,
    char_index: usize,
    title: String,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(text: &'a str, char_index: usize, title: String, theme: &'a Theme) -> Self {
        Self {
            text,
            char_index,
            title,
            theme,
        }
    }
}

/// A render token maps a single target character to its display representation.
struct RenderToken {
    display: String,
    is_line_break: bool,
}

fn build_render_tokens(text: &str) -> Vec<RenderToken> {
    text.chars()
        .map(|ch| match whitespace_glyph(ch) {
            Some(glyph) => RenderToken {
                display: glyph.to_string(),
                is_line_break: ch == '\n',
            },
            None => RenderToken {
                display: ch.to_string(),
                is_line_break: false,
            },
        })
        .collect()
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let tokens = build_render_tokens(self.text);

        let mut lines: Vec<Line> = Vec::new();
        let mut current: Vec<Span> = Vec::new();

        for (idx, token) in tokens.into_iter().enumerate() {
            let style = match char_state(idx, self.char_index) {
                CharState::Typed => Style::default().fg(colors.text_typed()),
                CharState::Current => Style::default()
                    .fg(colors.text_current_fg())
                    .bg(colors.text_current_bg())
                    .add_modifier(Modifier::BOLD),
                CharState::Remaining => Style::default().fg(colors.text_remaining()),
            };
            current.push(Span::styled(token.display, style));
            if token.is_line_break {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
        lines.push(Line::from(current));

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_states_split_at_cursor() {
        assert_eq!(char_state(0, 2), CharState::Typed);
        assert_eq!(char_state(2, 2), CharState::Current);
        assert_eq!(char_state(3, 2), CharState::Remaining);
    }

    #[test]
    fn test_render_tokens_basic() {
        let tokens = build_render_tokens("abc");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].display, "b");
        assert!(!tokens[0].is_line_break);
    }

    #[test]
    fn test_render_tokens_whitespace() {
        let tokens = build_render_tokens("a\n\tb");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].display, "\u{21b5}");
        assert!(tokens[1].is_line_break);
        assert_eq!(tokens[2].display, "\u{2192}");
        assert!(!tokens[2].is_line_break);
    }
}
