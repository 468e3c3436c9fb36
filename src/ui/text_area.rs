use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::typed_char;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    /// The text changed and should be re-checked.
    Changed,
    Submit,
    Cancel,
}

const TAB_SPACES: &str = "  ";

/// Multi-line answer editor for task cards. Enter inserts a newline, Ctrl+S
/// submits and Esc leaves the drill.
#[derive(Clone, Debug, Default)]
pub struct TextArea {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Cursor as `(line, column)` in chars.
    pub fn cursor_position(&self) -> (usize, usize) {
        let before: String = self.text.chars().take(self.cursor).collect();
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map_or(0, |l| l.chars().count());
        (line, col)
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Char('s') if ctrl => return InputResult::Submit,
            KeyCode::Char('u') if ctrl => {
                self.delete_line_back();
                return InputResult::Changed;
            }
            KeyCode::Char('w') if ctrl => {
                self.delete_word_back();
                return InputResult::Changed;
            }
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {}
            KeyCode::Char(ch) => {
                self.insert(typed_char(&key).unwrap_or(ch));
                return InputResult::Changed;
            }
            KeyCode::Enter => {
                self.insert('\n');
                return InputResult::Changed;
            }
            KeyCode::Tab => {
                for ch in TAB_SPACES.chars() {
                    self.insert(ch);
                }
                return InputResult::Changed;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at_cursor();
                    return InputResult::Changed;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    self.remove_at_cursor();
                    return InputResult::Changed;
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = self.line_start(self.cursor),
            KeyCode::End => self.cursor = self.line_end(self.cursor),
            KeyCode::Up => self.move_vertical(false),
            KeyCode::Down => self.move_vertical(true),
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn insert(&mut self, ch: char) {
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert(byte_offset, ch);
        self.cursor += 1;
    }

    fn remove_at_cursor(&mut self) {
        let byte_offset = self.char_to_byte(self.cursor);
        if byte_offset < self.text.len() {
            self.text.remove(byte_offset);
        }
    }

    fn line_start(&self, pos: usize) -> usize {
        let chars = self.chars();
        let mut start = pos.min(chars.len());
        while start > 0 && chars[start - 1] != '\n' {
            start -= 1;
        }
        start
    }

    fn line_end(&self, pos: usize) -> usize {
        let chars = self.chars();
        let mut end = pos.min(chars.len());
        while end < chars.len() && chars[end] != '\n' {
            end += 1;
        }
        end
    }

    fn move_vertical(&mut self, down: bool) {
        let start = self.line_start(self.cursor);
        let col = self.cursor - start;
        let target_start = if down {
            let end = self.line_end(self.cursor);
            if end >= self.len() {
                return;
            }
            end + 1
        } else {
            if start == 0 {
                return;
            }
            self.line_start(start - 1)
        };
        let target_end = self.line_end(target_start);
        self.cursor = (target_start + col).min(target_end);
    }

    fn delete_line_back(&mut self) {
        let start = self.line_start(self.cursor);
        let start_byte = self.char_to_byte(start);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
    }

    /// Delete word before cursor (unix-word-rubout: skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) {
        let chars = self.chars();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn typed(text: &str) -> TextArea {
        let mut area = TextArea::new();
        for ch in text.chars() {
            if ch == '\n' {
                area.handle(key(KeyCode::Enter));
            } else {
                area.handle(key(KeyCode::Char(ch)));
            }
        }
        area
    }

    #[test]
    fn shifted_base_keys_insert_markup() {
        use crossterm::event::{KeyEventKind, KeyEventState};
        let mut area = TextArea::new();
        let shift = |ch| {
            KeyEvent::new_with_kind_and_state(
                KeyCode::Char(ch),
                KeyModifiers::SHIFT,
                KeyEventKind::Press,
                KeyEventState::NONE,
            )
        };
        area.handle(shift(','));
        area.handle(key(KeyCode::Char('p')));
        area.handle(shift('.'));
        area.handle(KeyEvent::new_with_kind_and_state(
            KeyCode::Char('h'),
            KeyModifiers::NONE,
            KeyEventKind::Press,
            KeyEventState::CAPS_LOCK,
        ));
        assert_eq!(area.value(), "<p>H");
    }

    #[test]
    fn enter_inserts_newline() {
        let area = typed("<p>\nhi");
        assert_eq!(area.value(), "<p>\nhi");
        assert_eq!(area.cursor_position(), (1, 2));
    }

    #[test]
    fn submit_and_cancel() {
        let mut area = typed("x");
        assert_eq!(area.handle(ctrl('s')), InputResult::Submit);
        assert_eq!(area.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(area.value(), "x");
    }

    #[test]
    fn backspace_joins_lines_and_stops_at_start() {
        let mut area = typed("a\nb");
        area.handle(key(KeyCode::Backspace));
        area.handle(key(KeyCode::Backspace));
        assert_eq!(area.value(), "a");
        area.handle(key(KeyCode::Backspace));
        assert_eq!(
            area.handle(key(KeyCode::Backspace)),
            InputResult::Continue
        );
        assert_eq!(area.value(), "");
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let mut area = typed("abcd\nxy");
        area.handle(key(KeyCode::Up));
        assert_eq!(area.cursor_position(), (0, 2));
        area.handle(key(KeyCode::End));
        area.handle(key(KeyCode::Down));
        assert_eq!(area.cursor_position(), (1, 2));
        area.handle(key(KeyCode::Home));
        area.handle(key(KeyCode::Char('_')));
        assert_eq!(area.value(), "abcd\n_xy");
    }

    #[test]
    fn ctrl_w_and_ctrl_u() {
        let mut area = typed("first\nfoo bar");
        area.handle(ctrl('w'));
        assert_eq!(area.value(), "first\nfoo ");
        area.handle(ctrl('u'));
        assert_eq!(area.value(), "first\n");
    }

    #[test]
    fn control_chords_do_not_insert() {
        let mut area = TextArea::new();
        assert_eq!(area.handle(ctrl('v')), InputResult::Continue);
        assert_eq!(area.value(), "");
    }

    #[test]
    fn tab_inserts_spaces() {
        let mut area = TextArea::new();
        area.handle(key(KeyCode::Tab));
        assert_eq!(area.value(), "  ");
    }

    #[test]
    fn multibyte_editing() {
        let mut area = typed("héllo");
        area.handle(key(KeyCode::Left));
        area.handle(key(KeyCode::Left));
        area.handle(key(KeyCode::Left));
        area.handle(key(KeyCode::Backspace));
        assert_eq!(area.value(), "hllo");
    }
}
