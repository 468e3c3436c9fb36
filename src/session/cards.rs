use icu_normalizer::ComposingNormalizerBorrowed;
use rust_i18n::t;

use crate::course::Task;
use crate::session::preview;
use crate::store::{KeyValueStore, keys};

/// Comparison form of task text: NFC, no whitespace, every quote mark
/// folded to `'`, lowercase.
pub fn normalize(s: &str) -> String {
    let composed = ComposingNormalizerBorrowed::new_nfc().normalize(s);
    composed
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '"' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2018}' | '\u{2019}' => '\'',
            c => c,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Match,
    /// The input has a different number of tags than the expected text.
    TagCountHint,
    Mismatch,
}

impl CheckOutcome {
    pub fn message(self) -> Option<String> {
        match self {
            CheckOutcome::Match => None,
            CheckOutcome::TagCountHint => Some(t!("cards.tag_count_hint").into_owned()),
            CheckOutcome::Mismatch => Some(t!("cards.mismatch").into_owned()),
        }
    }
}

pub fn check(input: &str, expected: &str) -> CheckOutcome {
    let input = normalize(input);
    let expected = normalize(expected);
    if input == expected {
        return CheckOutcome::Match;
    }
    let tags = |s: &str| s.matches('<').count();
    if tags(&input) != tags(&expected) {
        CheckOutcome::TagCountHint
    } else {
        CheckOutcome::Mismatch
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submit was not enabled for the current input.
    Rejected,
    Next(usize),
    Finished,
}

/// Task-card drill: one card open at a time, advanced by submitting a
/// matching answer.
pub struct CardDrill {
    pub title: String,
    prefix: String,
    tasks: Vec<Task>,
    current: usize,
    done: Vec<bool>,
    input: String,
    outcome: Option<CheckOutcome>,
    preview: String,
    /// Set by a successful submit, cleared by the next edit.
    pub just_passed: bool,
}

impl CardDrill {
    /// Open the drill at the stored task index. An unparsable or
    /// out-of-range index restarts at the first task and is written back.
    pub fn open(title: &str, prefix: &str, tasks: Vec<Task>, store: &mut dyn KeyValueStore) -> Self {
        let key = keys::task_index(prefix);
        let current = match store.get(&key) {
            None => 0,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(i) if i <= tasks.len() => i,
                _ => {
                    log::warn!("resetting invalid task index {raw:?} for {prefix}");
                    store.put(&key, "0");
                    0
                }
            },
        };
        let done = (0..tasks.len())
            .map(|i| store.get_flag(&keys::task_done(prefix, i)))
            .collect();
        log::info!("opening {prefix} at task {current} of {}", tasks.len());

        Self {
            title: title.to_string(),
            prefix: prefix.to_string(),
            tasks,
            current,
            done,
            input: String::new(),
            outcome: None,
            preview: preview::preview_text(""),
            just_passed: false,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.get(self.current)
    }

    pub fn is_done(&self, index: usize) -> bool {
        self.done.get(index).copied().unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.tasks.len()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn outcome(&self) -> Option<CheckOutcome> {
        self.outcome
    }

    pub fn can_submit(&self) -> bool {
        self.outcome == Some(CheckOutcome::Match)
    }

    pub fn feedback(&self) -> Option<String> {
        if self.just_passed {
            return Some(t!("cards.correct").into_owned());
        }
        self.outcome.and_then(CheckOutcome::message)
    }

    /// Re-check after the learner edited their answer.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.just_passed = false;
        self.preview = preview::preview_text(text);
        self.outcome = self.current_task().map(|task| check(text, &task.code_to_type));
    }

    pub fn submit(&mut self, store: &mut dyn KeyValueStore) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Rejected;
        }
        store.put(&keys::task_done(&self.prefix, self.current), "true");
        if let Some(flag) = self.done.get_mut(self.current) {
            *flag = true;
        }
        self.current += 1;
        store.put(&keys::task_index(&self.prefix), &self.current.to_string());

        self.input.clear();
        self.outcome = None;
        self.preview = preview::preview_text("");
        self.just_passed = true;

        if self.is_finished() {
            log::info!("{} complete", self.prefix);
            SubmitOutcome::Finished
        } else {
            SubmitOutcome::Next(self.current)
        }
    }
}
