use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::course::{Lesson, Task};
use crate::keyboard::finger::{Finger, finger_for_char};
use crate::keyboard::highlight::{HeldModifier, Highlight, Highlighter};
use crate::keyboard::layout;
use crate::session::input::{Keystroke, KeystrokeOutcome, process_keystroke};
use crate::session::stats::LiveStats;
use crate::store::{KeyValueStore, keys};

/// Counters persisted under `{prefix}-<name>` after every change so a
/// reopened drill resumes mid-task.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub lesson_index: usize,
    pub task_index: usize,
    pub char_index: usize,
    pub total_keystrokes: u32,
    pub errors: u32,
    /// Milliseconds between consecutive keystrokes that matched.
    pub keystroke_intervals: Vec<u64>,
}

fn stored_usize(store: &dyn KeyValueStore, key: &str) -> usize {
    store
        .get_int(key)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(0)
}

fn stored_u32(store: &dyn KeyValueStore, key: &str) -> u32 {
    store
        .get_int(key)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

impl SessionState {
    /// Restore from storage. Unparsable values read as zero; positions are
    /// pulled back inside the lesson list so typing can always continue or
    /// the course reads as finished.
    pub fn load(store: &dyn KeyValueStore, prefix: &str, lessons: &[Lesson]) -> Self {
        let intervals = store
            .get(&keys::session_intervals(prefix))
            .and_then(|raw| serde_json::from_str::<Vec<u64>>(&raw).ok())
            .unwrap_or_default();

        let mut state = Self {
            lesson_index: stored_usize(store, &keys::session_lesson_index(prefix)),
            task_index: stored_usize(store, &keys::session_task_index(prefix)),
            char_index: stored_usize(store, &keys::session_char_index(prefix)),
            total_keystrokes: stored_u32(store, &keys::session_total_keystrokes(prefix)),
            errors: stored_u32(store, &keys::session_errors(prefix)),
            keystroke_intervals: intervals,
        };
        state.clamp(lessons);
        state
    }

    fn clamp(&mut self, lessons: &[Lesson]) {
        if self.lesson_index >= lessons.len() {
            self.lesson_index = lessons.len();
            self.task_index = 0;
            self.char_index = 0;
            return;
        }
        if self.task_index >= lessons[self.lesson_index].tasks.len() {
            self.task_index = 0;
            self.char_index = 0;
            self.lesson_index += 1;
            if self.lesson_index >= lessons.len() {
                return;
            }
        }
        let len = lessons[self.lesson_index].tasks[self.task_index]
            .code_to_type
            .chars()
            .count();
        if self.char_index >= len {
            self.char_index = 0;
        }
        self.errors = self.errors.min(self.total_keystrokes);
    }

    /// Every persisted counter as a `(key, value)` pair.
    pub fn entries(&self, prefix: &str) -> Vec<(String, String)> {
        let mut entries = vec![
            (
                keys::session_lesson_index(prefix),
                self.lesson_index.to_string(),
            ),
            (keys::session_task_index(prefix), self.task_index.to_string()),
            (keys::session_char_index(prefix), self.char_index.to_string()),
            (
                keys::session_total_keystrokes(prefix),
                self.total_keystrokes.to_string(),
            ),
            (keys::session_errors(prefix), self.errors.to_string()),
        ];
        match serde_json::to_string(&self.keystroke_intervals) {
            Ok(json) => entries.push((keys::session_intervals(prefix), json)),
            Err(err) => log::warn!("cannot encode keystroke intervals: {err}"),
        }
        entries
    }

    pub fn persist(&self, store: &mut dyn KeyValueStore, prefix: &str) {
        store.put_many(&self.entries(prefix));
    }

    pub fn persist_char_index(&self, store: &mut dyn KeyValueStore, prefix: &str) {
        store.put(&keys::session_char_index(prefix), &self.char_index.to_string());
    }
}

/// Mistakes made during the current task, by finger class and by expected
/// character. Characters keep the order they were first missed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorTally {
    fingers: BTreeMap<Finger, u32>,
    keys: Vec<(char, u32)>,
}

impl ErrorTally {
    pub fn record(&mut self, expected: char) {
        *self.fingers.entry(finger_for_char(expected)).or_insert(0) += 1;
        match self.keys.iter_mut().find(|(ch, _)| *ch == expected) {
            Some((_, count)) => *count += 1,
            None => self.keys.push((expected, 1)),
        }
    }

    pub fn finger_count(&self, finger: Finger) -> u32 {
        self.fingers.get(&finger).copied().unwrap_or(0)
    }

    pub fn finger_total(&self) -> u32 {
        self.fingers.values().sum()
    }

    pub fn finger_breakdown(&self) -> Vec<(Finger, u32)> {
        Finger::ALL
            .iter()
            .map(|&f| (f, self.finger_count(f)))
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    /// Most-missed characters, highest count first. Ties keep first-seen order.
    pub fn top_keys(&self, n: usize) -> Vec<char> {
        let mut ranked = self.keys.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(ch, _)| ch).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.fingers.clear();
        self.keys.clear();
    }
}

/// Everything the keystroke transition reads and writes: the persisted
/// counters plus the in-memory tally and clocks.
#[derive(Clone, Debug, Default)]
pub struct TypingSession {
    pub state: SessionState,
    pub tally: ErrorTally,
    pub started_at: Option<Instant>,
    pub last_key_at: Option<Instant>,
    /// Characters already typed when the task clock started; WPM counts
    /// only what was typed since.
    pub resumed_chars: usize,
}

impl TypingSession {
    pub fn resume(state: SessionState) -> Self {
        Self {
            resumed_chars: state.char_index,
            state,
            ..Self::default()
        }
    }

    /// Characters typed since the task clock started.
    pub fn chars_since_start(&self) -> usize {
        self.state.char_index.saturating_sub(self.resumed_chars)
    }

    pub fn current_task<'a>(&self, lessons: &'a [Lesson]) -> Option<&'a Task> {
        lessons
            .get(self.state.lesson_index)?
            .tasks
            .get(self.state.task_index)
    }

    pub fn current_char(&self, lessons: &[Lesson]) -> Option<char> {
        self.current_task(lessons)?
            .code_to_type
            .chars()
            .nth(self.state.char_index)
    }

    pub fn current_text_len(&self, lessons: &[Lesson]) -> usize {
        self.current_task(lessons)
            .map_or(0, |t| t.code_to_type.chars().count())
    }

    pub fn is_finished(&self, lessons: &[Lesson]) -> bool {
        self.state.lesson_index >= lessons.len()
    }

    /// Clear the per-task counters and restart the task clock.
    pub fn reset_task(&mut self, now: Instant) {
        self.state.char_index = 0;
        self.state.total_keystrokes = 0;
        self.state.errors = 0;
        self.state.keystroke_intervals.clear();
        self.tally.clear();
        self.started_at = Some(now);
        self.resumed_chars = 0;
    }
}

/// Key briefly marked after a wrong keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shake {
    pub key: (usize, usize),
    pub since: Instant,
}

/// Character-stream drill over one lesson page: the session, its storage
/// prefix and the keyboard cues derived from it.
pub struct StreamDrill {
    pub title: String,
    prefix: String,
    lessons: Vec<Lesson>,
    pub session: TypingSession,
    highlighter: Highlighter,
    pub highlight: Highlight,
    pub shake: Option<Shake>,
    held: Option<HeldModifier>,
    caps_lock: bool,
}

impl StreamDrill {
    pub fn open(
        title: &str,
        prefix: &str,
        lessons: Vec<Lesson>,
        store: &dyn KeyValueStore,
    ) -> Self {
        let state = SessionState::load(store, prefix, &lessons);
        log::info!(
            "opening {prefix} at lesson {} task {} char {}",
            state.lesson_index,
            state.task_index,
            state.char_index
        );
        let mut drill = Self {
            title: title.to_string(),
            prefix: prefix.to_string(),
            lessons,
            session: TypingSession::resume(state),
            highlighter: Highlighter::new(),
            highlight: Highlight::default(),
            shake: None,
            held: None,
            caps_lock: false,
        };
        drill.refresh_highlight();
        drill
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.lessons.get(self.session.state.lesson_index)
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.session.current_task(&self.lessons)
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_finished(&self.lessons)
    }

    /// Fraction of the current task typed so far.
    pub fn progress(&self) -> f64 {
        let len = self.session.current_text_len(&self.lessons);
        if len == 0 {
            return if self.is_finished() { 1.0 } else { 0.0 };
        }
        self.session.state.char_index as f64 / len as f64
    }

    pub fn stats(&self, now: Instant) -> LiveStats {
        LiveStats::compute(&self.session, now)
    }

    /// Run one keystroke through the session, then persist and update the
    /// keyboard cues according to what happened.
    pub fn handle(
        &mut self,
        keystroke: Keystroke,
        now: Instant,
        store: &mut dyn KeyValueStore,
    ) -> KeystrokeOutcome {
        self.caps_lock = keystroke.caps_lock;
        self.held = keystroke.held_modifier();

        let outcome = process_keystroke(&mut self.session, &self.lessons, keystroke, now);
        match outcome {
            KeystrokeOutcome::Correct => {
                self.shake = None;
                self.session.state.persist(store, &self.prefix);
            }
            KeystrokeOutcome::TaskComplete(done) | KeystrokeOutcome::CourseComplete(done) => {
                self.shake = None;
                let mut entries = self.session.state.entries(&self.prefix);
                entries.push((keys::task_done(&self.prefix, done.task), "true".to_string()));
                store.put_many(&entries);
                log::info!(
                    "{} finished lesson {} task {}",
                    self.prefix,
                    done.lesson,
                    done.task
                );
            }
            KeystrokeOutcome::Backspace => {
                self.session.state.persist_char_index(store, &self.prefix);
            }
            KeystrokeOutcome::Mismatch { expected } => {
                self.shake = layout::position_for_char(expected).map(|key| Shake { key, since: now });
            }
            KeystrokeOutcome::Modifier | KeystrokeOutcome::Ignored => {}
        }
        self.refresh_highlight();
        outcome
    }

    /// Expire the shake cue once `duration` has passed.
    pub fn tick(&mut self, now: Instant, duration: Duration) {
        if self
            .shake
            .is_some_and(|s| now.saturating_duration_since(s.since) >= duration)
        {
            self.shake = None;
        }
    }

    fn refresh_highlight(&mut self) {
        let target = self.session.current_char(&self.lessons);
        self.highlight = self.highlighter.resolve(target, self.caps_lock, self.held);
    }
}
