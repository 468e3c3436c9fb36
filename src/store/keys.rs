//! Storage key names shared by the lesson index and both drill variants.
//! The lesson index finds a lesson's progress by deriving the same prefix
//! the drill page writes under, so these formats must not drift.

pub fn task_done(prefix: &str, task_index: usize) -> String {
    format!("{prefix}TaskDone{task_index}")
}

pub fn task_index(prefix: &str) -> String {
    format!("{prefix}TaskIndex")
}

pub fn session_lesson_index(prefix: &str) -> String {
    format!("{prefix}-lessonIndex")
}

pub fn session_task_index(prefix: &str) -> String {
    format!("{prefix}-taskIndex")
}

pub fn session_char_index(prefix: &str) -> String {
    format!("{prefix}-charIndex")
}

pub fn session_total_keystrokes(prefix: &str) -> String {
    format!("{prefix}-totalKeystrokes")
}

pub fn session_errors(prefix: &str) -> String {
    format!("{prefix}-errors")
}

pub fn session_intervals(prefix: &str) -> String {
    format!("{prefix}-keystrokeIntervals")
}
