use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::keyboard::finger::{Finger, Hand};
use crate::ui::theme::Theme;

const LEFT_ORDER: [Finger; 5] = [
    Finger::Pinky,
    Finger::Ring,
    Finger::Middle,
    Finger::Index,
    Finger::Thumb,
];

/// Both hands side by side with the finger for the next key lit.
pub struct FingerGuide<'a> {
    active: Option<(Hand, Finger)>,
    theme: &'a Theme,
}

impl<'a> FingerGuide<'a> {
    pub fn new(active: Option<(Hand, Finger)>, theme: &'a Theme) -> Self {
        Self { active, theme }
    }

    fn hand_spans(&self, hand: Hand) -> Vec<Span<'static>> {
        let colors = &self.theme.colors;
        let mut order = LEFT_ORDER.to_vec();
        if hand == Hand::Right {
            order.reverse();
        }
        order
            .into_iter()
            .map(|finger| {
                let lit = self.active == Some((hand, finger));
                let style = if lit {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.finger_active())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.text_remaining())
                };
                Span::styled(format!(" {} ", finger.as_str()), style)
            })
            .collect()
    }
}

impl Widget for FingerGuide<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans = vec![Span::styled("L ", Style::default().fg(colors.fg()))];
        spans.extend(self.hand_spans(Hand::Left));
        spans.push(Span::raw("  "));
        spans.extend(self.hand_spans(Hand::Right));
        spans.push(Span::styled(" R", Style::default().fg(colors.fg())));

        Paragraph::new(Line::from(spans))
            .centered()
            .render(area, buf);
    }
}
