use crate::keyboard::finger::{Finger, Hand, hand_for_char};
use crate::keyboard::layout::{self, KeyCap};

/// A modifier key reported by the terminal alongside (or instead of) a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeldModifier {
    Shift,
    CapsLock,
    Ctrl,
    Alt,
}

/// Keys and finger to light up for the next character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    /// Active keys as `(row, col)` positions in the layout table.
    pub keys: Vec<(usize, usize)>,
    pub finger: Option<(Hand, Finger)>,
    pub caps_lock: bool,
}

impl Highlight {
    pub fn is_active(&self, pos: (usize, usize)) -> bool {
        self.keys.contains(&pos)
    }
}

/// Resolves highlights and remembers which hand struck last, so consecutive
/// spaces alternate thumbs the way two-thumb typists do.
#[derive(Clone, Debug)]
pub struct Highlighter {
    last_hand: Hand,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            last_hand: Hand::Right,
        }
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        target: Option<char>,
        caps_on: bool,
        held: Option<HeldModifier>,
    ) -> Highlight {
        let mut highlight = Highlight {
            caps_lock: caps_on,
            ..Highlight::default()
        };

        if caps_on && let Some(pos) = layout::position_of(KeyCap::CapsLock, None) {
            highlight.keys.push(pos);
        }

        let Some(ch) = target else {
            return highlight;
        };

        let shifted_base = layout::base_for_shifted(ch);
        let base = shifted_base.unwrap_or(ch);
        let letter_side = hand_for_char(base)
            .or_else(|| hand_for_char(base.to_ascii_lowercase()))
            .or_else(|| hand_for_char(ch));
        let needs_shift = (ch.is_ascii_uppercase() && !caps_on) || shifted_base.is_some();

        let primary = layout::position_for_char(ch);
        if let Some(pos) = primary {
            highlight.keys.push(pos);
        }

        if let Some(side) = letter_side {
            let opposite = Some(side.opposite());
            if needs_shift {
                highlight.keys.extend(layout::position_of(KeyCap::Shift, opposite));
            }
            match held {
                Some(HeldModifier::Ctrl) => {
                    highlight.keys.extend(layout::position_of(KeyCap::Ctrl, opposite));
                }
                Some(HeldModifier::Alt) => {
                    highlight.keys.extend(layout::position_of(KeyCap::Alt, opposite));
                    highlight.keys.extend(layout::position_of(KeyCap::AltGr, opposite));
                }
                _ => {}
            }
        }

        if let Some(desc) = primary.and_then(layout::descriptor_at) {
            let hand = if desc.finger == Finger::Thumb {
                if ch == ' ' {
                    let hand = self.last_hand.opposite();
                    self.last_hand = hand;
                    hand
                } else {
                    desc.side
                }
            } else {
                self.last_hand = desc.side;
                desc.side
            };
            highlight.finger = Some((hand, desc.finger));
        }

        highlight
    }
}
