use std::time::{Duration, Instant};

use crate::keyboard::finger::Finger;
use crate::session::stream::TypingSession;

const PROBLEM_KEY_COUNT: usize = 3;

/// Words per minute over the correctly typed characters, five characters a
/// word. Zero until at least a tenth of a second has passed.
pub fn wpm(chars_typed: usize, elapsed: Duration) -> u32 {
    let secs = elapsed.as_secs_f64();
    if secs < 0.1 {
        return 0;
    }
    ((chars_typed as f64 / 5.0) / (secs / 60.0)).round() as u32
}

pub fn accuracy(total_keystrokes: u32, errors: u32) -> u32 {
    if total_keystrokes == 0 {
        return 100;
    }
    let correct = total_keystrokes.saturating_sub(errors) as f64;
    (correct / total_keystrokes as f64 * 100.0)
        .round()
        .clamp(0.0, 100.0) as u32
}

/// Mean interval between keystrokes in whole milliseconds.
pub fn rhythm_ms(intervals: &[u64]) -> u64 {
    if intervals.is_empty() {
        return 0;
    }
    let sum: u64 = intervals.iter().sum();
    (sum as f64 / intervals.len() as f64).round() as u64
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub finger_errors: u32,
    pub finger_breakdown: Vec<(Finger, u32)>,
    pub problem_keys: Vec<char>,
    pub rhythm_ms: u64,
}

impl LiveStats {
    pub fn compute(session: &TypingSession, now: Instant) -> Self {
        let elapsed = session
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        let state = &session.state;
        Self {
            wpm: wpm(session.chars_since_start(), elapsed),
            accuracy: accuracy(state.total_keystrokes, state.errors),
            finger_errors: session.tally.finger_total(),
            finger_breakdown: session.tally.finger_breakdown(),
            problem_keys: session.tally.top_keys(PROBLEM_KEY_COUNT),
            rhythm_ms: rhythm_ms(&state.keystroke_intervals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resumed_chars_do_not_count_toward_wpm() {
        use crate::session::stream::SessionState;

        let start = Instant::now();
        let mut session = TypingSession::resume(SessionState {
            char_index: 40,
            ..SessionState::default()
        });
        session.started_at = Some(start);
        session.state.char_index = 45;
        let stats = LiveStats::compute(&session, start + Duration::from_secs(60));
        assert_eq!(stats.wpm, 1);

        session.reset_task(start);
        assert_eq!(session.resumed_chars, 0);
    }

    #[test]
    fn test_wpm_zero_under_a_tenth_of_a_second() {
        assert_eq!(wpm(10, Duration::from_millis(99)), 0);
        assert_eq!(wpm(0, Duration::from_secs(30)), 0);
    }

    #[test]
    fn test_wpm_five_chars_per_word() {
        assert_eq!(wpm(50, Duration::from_secs(60)), 10);
        assert_eq!(wpm(25, Duration::from_secs(30)), 10);
        assert_eq!(wpm(7, Duration::from_secs(60)), 1);
    }

    #[test]
    fn test_accuracy_bounds() {
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(accuracy(4, 1), 75);
        assert_eq!(accuracy(3, 3), 0);
        assert_eq!(accuracy(3, 1), 67);
        assert_eq!(accuracy(2, 5), 0);
    }

    #[test]
    fn test_rhythm_average() {
        assert_eq!(rhythm_ms(&[]), 0);
        assert_eq!(rhythm_ms(&[100, 200]), 150);
        assert_eq!(rhythm_ms(&[100, 101]), 101);
    }

    #[test]
    fn test_fresh_session_stats() {
        let stats = LiveStats::compute(&TypingSession::default(), Instant::now());
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.finger_errors, 0);
        assert!(stats.problem_keys.is_empty());
        assert_eq!(stats.rhythm_ms, 0);
    }
}
