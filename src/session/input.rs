use std::time::Instant;

use crate::course::Lesson;
use crate::keyboard::highlight::HeldModifier;
use crate::session::stream::TypingSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Modifier(HeldModifier),
}

/// One key press as seen by the drill, with the CapsLock state the terminal
/// reported alongside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Key,
    pub caps_lock: bool,
}

impl Keystroke {
    pub fn char(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            caps_lock: false,
        }
    }

    pub fn backspace() -> Self {
        Self {
            key: Key::Backspace,
            caps_lock: false,
        }
    }

    pub fn modifier(modifier: HeldModifier) -> Self {
        Self {
            key: Key::Modifier(modifier),
            caps_lock: false,
        }
    }

    pub fn with_caps_lock(mut self, on: bool) -> Self {
        self.caps_lock = on;
        self
    }

    pub fn held_modifier(&self) -> Option<HeldModifier> {
        match self.key {
            Key::Modifier(m) => Some(m),
            _ => None,
        }
    }
}

/// Position of a task inside the drill's lesson list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskRef {
    pub lesson: usize,
    pub task: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    /// Nothing left to type.
    Ignored,
    Modifier,
    Backspace,
    Correct,
    TaskComplete(TaskRef),
    /// The last task of the last lesson was just finished.
    CourseComplete(TaskRef),
    Mismatch { expected: char },
}

/// Apply one keystroke to the session. Pure with respect to storage and
/// rendering: callers persist and redraw based on the returned outcome.
pub fn process_keystroke(
    session: &mut TypingSession,
    lessons: &[Lesson],
    keystroke: Keystroke,
    now: Instant,
) -> KeystrokeOutcome {
    let Some(expected) = session.current_char(lessons) else {
        return KeystrokeOutcome::Ignored;
    };

    let typed = match keystroke.key {
        Key::Modifier(_) => return KeystrokeOutcome::Modifier,
        Key::Backspace => {
            session.state.char_index = session.state.char_index.saturating_sub(1);
            session.last_key_at = Some(now);
            return KeystrokeOutcome::Backspace;
        }
        Key::Char(ch) => ch,
    };

    if session.started_at.is_none() {
        session.started_at = Some(now);
    }
    session.state.total_keystrokes += 1;

    if typed != expected {
        session.state.errors += 1;
        session.tally.record(expected);
        session.last_key_at = Some(now);
        return KeystrokeOutcome::Mismatch { expected };
    }

    session.state.char_index += 1;
    if let Some(last) = session.last_key_at {
        let interval = now.saturating_duration_since(last).as_millis() as u64;
        session.state.keystroke_intervals.push(interval);
    }
    session.last_key_at = Some(now);

    if session.state.char_index < session.current_text_len(lessons) {
        return KeystrokeOutcome::Correct;
    }

    let done = TaskRef {
        lesson: session.state.lesson_index,
        task: session.state.task_index,
    };
    session.reset_task(now);
    session.state.task_index += 1;

    let task_count = lessons
        .get(session.state.lesson_index)
        .map_or(0, |l| l.tasks.len());
    if session.state.task_index >= task_count {
        session.state.task_index = 0;
        session.state.lesson_index += 1;
    }

    if session.state.lesson_index >= lessons.len() {
        KeystrokeOutcome::CourseComplete(done)
    } else {
        KeystrokeOutcome::TaskComplete(done)
    }
}
