use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventState, KeyModifiers};

use crate::keyboard::layout::apply_modifiers;

/// The character a key event types, with Shift and CapsLock applied for
/// terminals that report base keys.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch) => Some(apply_modifiers(
            ch,
            key.modifiers.contains(KeyModifiers::SHIFT),
            key.state.contains(KeyEventState::CAPS_LOCK),
        )),
        _ => None,
    }
}

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
}

/// Polls the terminal on its own thread and forwards events to the main
/// loop. Pasted text is dropped here so it never reaches a drill.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
                        Ok(Event::Resize(w, h)) => Some(AppEvent::Resize(w, h)),
                        Ok(Event::Paste(text)) => {
                            log::debug!("dropped paste of {} chars", text.chars().count());
                            None
                        }
                        _ => None,
                    };
                    if let Some(ev) = forwarded
                        && tx.send(ev).is_err()
                    {
                        return;
                    }
                } else if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn kitty(ch: char, modifiers: KeyModifiers, state: KeyEventState) -> KeyEvent {
        KeyEvent::new_with_kind_and_state(KeyCode::Char(ch), modifiers, KeyEventKind::Press, state)
    }

    #[test]
    fn test_typed_char_from_base_key_reports() {
        assert_eq!(typed_char(&kitty('1', KeyModifiers::SHIFT, KeyEventState::NONE)), Some('!'));
        assert_eq!(typed_char(&kitty('.', KeyModifiers::SHIFT, KeyEventState::NONE)), Some('>'));
        assert_eq!(typed_char(&kitty('a', KeyModifiers::NONE, KeyEventState::CAPS_LOCK)), Some('A'));
    }

    #[test]
    fn test_typed_char_from_legacy_reports() {
        assert_eq!(typed_char(&kitty('!', KeyModifiers::SHIFT, KeyEventState::NONE)), Some('!'));
        assert_eq!(typed_char(&kitty('A', KeyModifiers::SHIFT, KeyEventState::NONE)), Some('A'));
        assert_eq!(typed_char(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), None);
    }
}
