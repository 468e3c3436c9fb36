/// Human-readable name for a character in stats and messages.
/// Printable characters are shown as themselves.
pub fn key_display_name(ch: char) -> String {
    match ch {
        '\n' => "Enter".to_string(),
        '\t' => "Tab".to_string(),
        ' ' => "Space".to_string(),
        _ => ch.to_string(),
    }
}

/// Glyph used to draw whitespace inside the typing area.
pub fn whitespace_glyph(ch: char) -> Option<&'static str> {
    match ch {
        '\n' => Some("\u{21b5}"), // ↵
        '\t' => Some("\u{2192}"), // →
        _ => None,
    }
}
