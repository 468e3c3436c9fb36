use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn opposite(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Pinky,
    Ring,
    Middle,
    Index,
    Thumb,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Pinky,
        Finger::Ring,
        Finger::Middle,
        Finger::Index,
        Finger::Thumb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Finger::Pinky => "pinky",
            Finger::Ring => "ring",
            Finger::Middle => "middle",
            Finger::Index => "index",
            Finger::Thumb => "thumb",
        }
    }
}

/// Finger class for a typed character. Shifted symbols share the finger of
/// their base key; uppercase letters resolve through their lowercase form.
/// Anything off the table is attributed to the thumb.
pub fn finger_for_char(ch: char) -> Finger {
    use Finger::*;

    match ch.to_ascii_lowercase() {
        '`' | '~' | '1' | '!' | 'q' | 'a' | 'z' => Pinky,
        '2' | '@' | 'w' | 's' | 'x' => Ring,
        '3' | '#' | 'e' | 'd' | 'c' => Middle,
        '4' | '5' | '$' | '%' | 'r' | 'f' | 'v' | 't' | 'g' | 'b' => Index,
        '6' | '7' | '^' | '&' | 'y' | 'h' | 'n' | 'u' | 'j' | 'm' => Index,
        '8' | '*' | 'i' | 'k' | ',' | '<' => Middle,
        '9' | '(' | 'o' | 'l' | '.' | '>' => Ring,
        '0' | ')' | '-' | '_' | '=' | '+' | 'p' | '[' | '{' | ']' | '}' | '\\' | '|' | ';'
        | ':' | '\'' | '"' | '/' | '?' => Pinky,
        '\n' | '\t' => Pinky,
        _ => Thumb,
    }
}

const LEFT_KEYS: &[char] = &[
    '`', '~', '1', '!', '2', '@', '3', '#', '4', '$', '5', '%', 'q', 'w', 'e', 'r', 't', 'a',
    's', 'd', 'f', 'g', 'z', 'x', 'c', 'v', 'b', '\t',
];

const RIGHT_KEYS: &[char] = &[
    '6', '^', '7', '&', '8', '*', '9', '(', '0', ')', '-', '_', '=', '+', 'y', 'u', 'i', 'o',
    'p', '[', '{', ']', '}', '\\', '|', 'h', 'j', 'k', 'l', ';', ':', '\'', '"', 'n', 'm', ',',
    '<', '.', '>', '/', '?', '\n',
];

/// Hand that strikes a character, by membership in the left/right key lists.
/// The space bar belongs to neither hand.
pub fn hand_for_char(ch: char) -> Option<Hand> {
    if LEFT_KEYS.contains(&ch) {
        Some(Hand::Left)
    } else if RIGHT_KEYS.contains(&ch) {
        Some(Hand::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_row_fingers() {
        assert_eq!(finger_for_char('a'), Finger::Pinky);
        assert_eq!(finger_for_char('s'), Finger::Ring);
        assert_eq!(finger_for_char('d'), Finger::Middle);
        assert_eq!(finger_for_char('f'), Finger::Index);
        assert_eq!(finger_for_char('j'), Finger::Index);
        assert_eq!(finger_for_char('k'), Finger::Middle);
        assert_eq!(finger_for_char('l'), Finger::Ring);
        assert_eq!(finger_for_char(';'), Finger::Pinky);
    }

    #[test]
    fn test_uppercase_uses_lowercase_finger() {
        assert_eq!(finger_for_char('Q'), Finger::Pinky);
        assert_eq!(finger_for_char('M'), Finger::Index);
    }

    #[test]
    fn test_shifted_symbols_follow_base_key() {
        assert_eq!(finger_for_char('('), finger_for_char('9'));
        assert_eq!(finger_for_char('<'), finger_for_char(','));
        assert_eq!(finger_for_char('?'), finger_for_char('/'));
    }

    #[test]
    fn test_space_and_unknown_fall_back_to_thumb() {
        assert_eq!(finger_for_char(' '), Finger::Thumb);
        assert_eq!(finger_for_char('é'), Finger::Thumb);
    }

    #[test]
    fn test_hand_membership() {
        assert_eq!(hand_for_char('t'), Some(Hand::Left));
        assert_eq!(hand_for_char('y'), Some(Hand::Right));
        assert_eq!(hand_for_char('"'), Some(Hand::Right));
        assert_eq!(hand_for_char(' '), None);
        assert_eq!(hand_for_char('T'), None);
    }
}
