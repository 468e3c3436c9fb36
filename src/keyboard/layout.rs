use crate::keyboard::finger::{Finger, Hand};

/// What is printed on a physical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCap {
    Char(char),
    Backspace,
    Tab,
    CapsLock,
    Enter,
    Shift,
    Ctrl,
    Fn,
    Win,
    Alt,
    AltGr,
    Space,
}

impl KeyCap {
    pub fn label(self) -> String {
        match self {
            KeyCap::Char(ch) => ch.to_ascii_uppercase().to_string(),
            KeyCap::Backspace => "Bksp".to_string(),
            KeyCap::Tab => "Tab".to_string(),
            KeyCap::CapsLock => "Caps".to_string(),
            KeyCap::Enter => "Enter".to_string(),
            KeyCap::Shift => "Shift".to_string(),
            KeyCap::Ctrl => "Ctrl".to_string(),
            KeyCap::Fn => "Fn".to_string(),
            KeyCap::Win => "Win".to_string(),
            KeyCap::Alt => "Alt".to_string(),
            KeyCap::AltGr => "AltGr".to_string(),
            KeyCap::Space => String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub cap: KeyCap,
    pub finger: Finger,
    pub side: Hand,
    /// Width in terminal cells, including the key's border.
    pub width: u16,
}

impl KeyDescriptor {
    /// Symbol produced by this key with Shift held, for non-letter keys.
    pub fn shifted_symbol(&self) -> Option<char> {
        match self.cap {
            KeyCap::Char(ch) if !ch.is_ascii_alphabetic() => shifted_for_base(ch),
            _ => None,
        }
    }
}

const fn key(ch: char, finger: Finger, side: Hand) -> KeyDescriptor {
    KeyDescriptor {
        cap: KeyCap::Char(ch),
        finger,
        side,
        width: 4,
    }
}

const fn wide(cap: KeyCap, finger: Finger, side: Hand, width: u16) -> KeyDescriptor {
    KeyDescriptor {
        cap,
        finger,
        side,
        width,
    }
}

use Finger::{Index, Middle, Pinky, Ring, Thumb};
use Hand::{Left, Right};

/// 60% ANSI board, top to bottom, left to right.
pub const ROWS: &[&[KeyDescriptor]] = &[
    &[
        key('`', Pinky, Left),
        key('1', Pinky, Left),
        key('2', Ring, Left),
        key('3', Middle, Left),
        key('4', Index, Left),
        key('5', Index, Left),
        key('6', Index, Right),
        key('7', Index, Right),
        key('8', Middle, Right),
        key('9', Ring, Right),
        key('0', Pinky, Right),
        key('-', Pinky, Right),
        key('=', Pinky, Right),
        wide(KeyCap::Backspace, Pinky, Right, 8),
    ],
    &[
        wide(KeyCap::Tab, Pinky, Left, 6),
        key('q', Pinky, Left),
        key('w', Ring, Left),
        key('e', Middle, Left),
        key('r', Index, Left),
        key('t', Index, Left),
        key('y', Index, Right),
        key('u', Index, Right),
        key('i', Middle, Right),
        key('o', Ring, Right),
        key('p', Pinky, Right),
        key('[', Pinky, Right),
        key(']', Pinky, Right),
        key('\\', Pinky, Right),
    ],
    &[
        wide(KeyCap::CapsLock, Pinky, Left, 7),
        key('a', Pinky, Left),
        key('s', Ring, Left),
        key('d', Middle, Left),
        key('f', Index, Left),
        key('g', Index, Left),
        key('h', Index, Right),
        key('j', Index, Right),
        key('k', Middle, Right),
        key('l', Ring, Right),
        key(';', Pinky, Right),
        key('\'', Pinky, Right),
        wide(KeyCap::Enter, Pinky, Right, 8),
    ],
    &[
        wide(KeyCap::Shift, Pinky, Left, 10),
        key('z', Pinky, Left),
        key('x', Ring, Left),
        key('c', Middle, Left),
        key('v', Index, Left),
        key('b', Index, Left),
        key('n', Index, Right),
        key('m', Index, Right),
        key(',', Middle, Right),
        key('.', Ring, Right),
        key('/', Pinky, Right),
        wide(KeyCap::Shift, Pinky, Right, 10),
    ],
    &[
        wide(KeyCap::Ctrl, Pinky, Left, 5),
        wide(KeyCap::Fn, Pinky, Left, 4),
        wide(KeyCap::Win, Thumb, Left, 5),
        wide(KeyCap::Alt, Thumb, Left, 5),
        wide(KeyCap::Space, Thumb, Left, 20),
        wide(KeyCap::AltGr, Thumb, Right, 7),
        wide(KeyCap::Fn, Pinky, Right, 4),
        wide(KeyCap::Ctrl, Pinky, Right, 5),
    ],
];

/// Shifted symbol → the base key that produces it.
pub const SHIFT_MAP: &[(char, char)] = &[
    ('!', '1'),
    ('@', '2'),
    ('#', '3'),
    ('$', '4'),
    ('%', '5'),
    ('^', '6'),
    ('&', '7'),
    ('*', '8'),
    ('(', '9'),
    (')', '0'),
    ('_', '-'),
    ('+', '='),
    ('{', '['),
    ('}', ']'),
    ('|', '\\'),
    (':', ';'),
    ('"', '\''),
    ('<', ','),
    ('>', '.'),
    ('?', '/'),
    ('~', '`'),
];

pub fn base_for_shifted(ch: char) -> Option<char> {
    SHIFT_MAP
        .iter()
        .find(|(shifted, _)| *shifted == ch)
        .map(|&(_, base)| base)
}

pub fn shifted_for_base(ch: char) -> Option<char> {
    SHIFT_MAP
        .iter()
        .find(|(_, base)| *base == ch)
        .map(|&(shifted, _)| shifted)
}

/// Character produced by the key reported as `ch` under the given Shift and
/// CapsLock state. Kitty-protocol terminals report the unshifted base key
/// with the SHIFT modifier, and lowercase letters while CapsLock is on;
/// already-shifted characters pass through unchanged.
pub fn apply_modifiers(ch: char, shift: bool, caps_lock: bool) -> char {
    if ch.is_ascii_lowercase() {
        return if shift != caps_lock {
            ch.to_ascii_uppercase()
        } else {
            ch
        };
    }
    if shift {
        shifted_for_base(ch).unwrap_or(ch)
    } else {
        ch
    }
}

/// Position of the key that types `ch`, as `(row, col)` into [`ROWS`].
pub fn position_for_char(ch: char) -> Option<(usize, usize)> {
    let cap = match ch {
        ' ' => KeyCap::Space,
        '\n' => KeyCap::Enter,
        '\t' => KeyCap::Tab,
        _ => KeyCap::Char(base_for_shifted(ch).unwrap_or(ch.to_ascii_lowercase())),
    };
    position_of(cap, None)
}

/// Position of a key cap, optionally restricted to one side of the board
/// (Shift, Ctrl, Fn appear twice).
pub fn position_of(cap: KeyCap, side: Option<Hand>) -> Option<(usize, usize)> {
    for (row_idx, row) in ROWS.iter().enumerate() {
        for (col_idx, desc) in row.iter().enumerate() {
            if desc.cap == cap && side.is_none_or(|s| s == desc.side) {
                return Some((row_idx, col_idx));
            }
        }
    }
    None
}

pub fn descriptor_at(pos: (usize, usize)) -> Option<&'static KeyDescriptor> {
    ROWS.get(pos.0).and_then(|row| row.get(pos.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::finger::{finger_for_char, hand_for_char};

    #[test]
    fn test_five_rows() {
        assert_eq!(ROWS.len(), 5);
        assert_eq!(ROWS[0].len(), 14);
        assert_eq!(ROWS[3].len(), 12);
    }

    #[test]
    fn test_char_keys_agree_with_finger_and_hand_tables() {
        for row in ROWS {
            for desc in row.iter() {
                if let KeyCap::Char(ch) = desc.cap {
                    assert_eq!(desc.finger, finger_for_char(ch), "finger for {ch:?}");
                    assert_eq!(Some(desc.side), hand_for_char(ch), "hand for {ch:?}");
                }
            }
        }
    }

    #[test]
    fn test_shift_map_round_trip_pairs() {
        assert_eq!(base_for_shifted('?'), Some('/'));
        assert_eq!(shifted_for_base('/'), Some('?'));
        assert_eq!(base_for_shifted('a'), None);
    }

    #[test]
    fn test_apply_modifiers_resolves_base_keys() {
        assert_eq!(apply_modifiers('1', true, false), '!');
        assert_eq!(apply_modifiers(',', true, false), '<');
        assert_eq!(apply_modifiers('\'', true, false), '"');
        assert_eq!(apply_modifiers('a', false, true), 'A');
        assert_eq!(apply_modifiers('a', true, true), 'a');
        assert_eq!(apply_modifiers('a', true, false), 'A');
        assert_eq!(apply_modifiers('1', false, true), '1');
    }

    #[test]
    fn test_apply_modifiers_keeps_already_shifted_chars() {
        assert_eq!(apply_modifiers('!', true, false), '!');
        assert_eq!(apply_modifiers('A', true, false), 'A');
        assert_eq!(apply_modifiers('A', false, true), 'A');
        assert_eq!(apply_modifiers(' ', true, false), ' ');
        assert_eq!(apply_modifiers('<', false, false), '<');
    }

    #[test]
    fn test_position_for_shifted_and_upper() {
        assert_eq!(position_for_char('!'), position_for_char('1'));
        assert_eq!(position_for_char('A'), position_for_char('a'));
        assert_eq!(position_for_char(' '), position_of(KeyCap::Space, None));
        assert_eq!(position_for_char('é'), None);
    }

    #[test]
    fn test_sided_lookup_for_duplicated_keys() {
        let left = position_of(KeyCap::Shift, Some(Hand::Left)).unwrap();
        let right = position_of(KeyCap::Shift, Some(Hand::Right)).unwrap();
        assert_eq!(left, (3, 0));
        assert_eq!(right, (3, 11));
    }

    #[test]
    fn test_shifted_symbol_only_for_non_letters() {
        let one = descriptor_at(position_for_char('1').unwrap()).unwrap();
        assert_eq!(one.shifted_symbol(), Some('!'));
        let q = descriptor_at(position_for_char('q').unwrap()).unwrap();
        assert_eq!(q.shifted_symbol(), None);
    }
}
