use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use crate::error::DrillError;

/// Blocking key input makes a truly instant session physically
/// impossible; floor the elapsed time so WPM stays finite anyway.
const MIN_ELAPSED_SECS: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// What a single keypress did to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Keypress {
    /// Correct key, cursor advanced, more characters remain.
    Advanced,
    /// Wrong key; the mistake is charged to the expected character and
    /// the cursor stays put.
    Mistake,
    /// Correct key at the last index; the session is over.
    Completed(SessionResult),
}

/// Metrics derived once, at the Running -> Completed transition.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionResult {
    pub word_count: usize,
    pub total_chars: usize,
    pub total_mistakes: u32,
    pub elapsed_secs: f64,
    pub wpm: f64,
    /// `(1 - mistakes / chars) * 100`. Goes negative when mistakes exceed
    /// the sequence length; deliberately not clamped.
    pub accuracy: f64,
    pub mistakes: HashMap<char, u32>,
}

impl SessionResult {
    pub fn compute(sequence: &str, mistakes: &HashMap<char, u32>, elapsed: Duration) -> Self {
        let word_count = sequence.split(' ').count();
        let total_chars = sequence.chars().count();
        let total_mistakes = mistakes.values().sum();
        let elapsed_secs = elapsed.as_secs_f64().max(MIN_ELAPSED_SECS);
        let wpm = word_count as f64 / elapsed_secs * 60.0;
        let accuracy =
            (total_chars as f64 - f64::from(total_mistakes)) / total_chars as f64 * 100.0;
        Self {
            word_count,
            total_chars,
            total_mistakes,
            elapsed_secs,
            wpm,
            accuracy,
            mistakes: mistakes.clone(),
        }
    }
}

/// One typing session over a generated practice sequence.
///
/// State machine: Idle -> Running -> Completed. The cursor advances only
/// on a correct keypress; every wrong keypress increments the mistake
/// count for the character that was expected, not the one pressed.
#[derive(Debug)]
pub struct Drill {
    sequence: String,
    chars: Vec<char>,
    cursor: usize,
    mistakes: HashMap<char, u32>,
    phase: Phase,
    started_at: Option<SystemTime>,
    result: Option<SessionResult>,
}

impl Drill {
    /// Zero-length sequences are rejected here so the accuracy
    /// computation downstream can never divide by zero.
    pub fn new(sequence: String) -> Result<Self, DrillError> {
        if sequence.is_empty() {
            return Err(DrillError::EmptySequence);
        }
        let chars = sequence.chars().collect();
        Ok(Self {
            sequence,
            chars,
            cursor: 0,
            mistakes: HashMap::new(),
            phase: Phase::Idle,
            started_at: None,
            result: None,
        })
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mistakes(&self) -> &HashMap<char, u32> {
        &self.mistakes
    }

    /// The character the session is currently waiting for.
    pub fn expected_char(&self) -> Option<char> {
        match self.phase {
            Phase::Completed => None,
            _ => self.chars.get(self.cursor).copied(),
        }
    }

    /// Idle -> Running. Captures the start timestamp; the clock runs from
    /// here, before the first keypress is read.
    pub fn start(&mut self) {
        if self.phase == Phase::Idle {
            self.started_at = Some(SystemTime::now());
            self.phase = Phase::Running;
        }
    }

    /// Feed one keypress. Starts the session implicitly if needed.
    /// Keys fed after completion are ignored and re-report the result.
    pub fn on_key(&mut self, c: char) -> Keypress {
        if self.phase == Phase::Idle {
            self.start();
        }
        if self.phase == Phase::Completed {
            if let Some(result) = &self.result {
                return Keypress::Completed(result.clone());
            }
        }

        let expected = self.chars[self.cursor];
        if c != expected {
            *self.mistakes.entry(expected).or_insert(0) += 1;
            return Keypress::Mistake;
        }

        if self.cursor == self.chars.len() - 1 {
            self.phase = Phase::Completed;
            let elapsed = self
                .started_at
                .and_then(|t| t.elapsed().ok())
                .unwrap_or_default();
            let result = SessionResult::compute(&self.sequence, &self.mistakes, elapsed);
            self.result = Some(result.clone());
            return Keypress::Completed(result);
        }

        self.cursor += 1;
        Keypress::Advanced
    }

    /// The session result, available once the drill has completed.
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn drill(sequence: &str) -> Drill {
        Drill::new(sequence.to_string()).unwrap()
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        assert_matches!(Drill::new(String::new()), Err(DrillError::EmptySequence));
    }

    #[test]
    fn test_new_drill_is_idle_at_start_of_sequence() {
        let d = drill("jf fj");
        assert_eq!(d.phase(), Phase::Idle);
        assert_eq!(d.cursor(), 0);
        assert_eq!(d.expected_char(), Some('j'));
        assert!(d.mistakes().is_empty());
        assert!(d.result().is_none());
    }

    #[test]
    fn test_start_transitions_to_running() {
        let mut d = drill("jf");
        d.start();
        assert_eq!(d.phase(), Phase::Running);
        // A second start must not reset the clock or the phase.
        d.start();
        assert_eq!(d.phase(), Phase::Running);
    }

    #[test]
    fn test_correct_key_advances_cursor() {
        let mut d = drill("jf");
        assert_eq!(d.on_key('j'), Keypress::Advanced);
        assert_eq!(d.cursor(), 1);
        assert_eq!(d.expected_char(), Some('f'));
        assert_eq!(d.phase(), Phase::Running);
    }

    #[test]
    fn test_wrong_key_charges_expected_character() {
        let mut d = drill("jf");
        assert_eq!(d.on_key('x'), Keypress::Mistake);
        assert_eq!(d.on_key('z'), Keypress::Mistake);
        assert_eq!(d.cursor(), 0);
        assert_eq!(d.mistakes().get(&'j'), Some(&2));
        assert_eq!(d.mistakes().get(&'x'), None);
    }

    #[test]
    fn test_one_mistake_at_position_zero_still_completes() {
        let mut d = drill("jf");
        assert_eq!(d.on_key('k'), Keypress::Mistake);
        assert_eq!(d.on_key('j'), Keypress::Advanced);
        assert_matches!(d.on_key('f'), Keypress::Completed(_));
        assert_eq!(d.mistakes().get(&'j'), Some(&1));
        assert_eq!(d.result().unwrap().total_mistakes, 1);
    }

    #[test]
    fn test_clean_replay_scores_perfect_accuracy() {
        let mut d = drill("jf fj");
        for c in "jf fj".chars() {
            let _ = d.on_key(c);
        }
        let result = d.result().unwrap();
        assert!(result.mistakes.is_empty());
        assert_eq!(result.total_mistakes, 0);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.word_count, 2);
        assert_eq!(result.total_chars, 5);
    }

    #[test]
    fn test_half_accuracy_for_one_mistake_over_two_chars() {
        let mut d = drill("aa");
        assert_eq!(d.on_key('b'), Keypress::Mistake);
        assert_eq!(d.on_key('a'), Keypress::Advanced);
        let result = match d.on_key('a') {
            Keypress::Completed(result) => result,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(result.total_mistakes, 1);
        assert_eq!(result.accuracy, 50.0);
    }

    #[test]
    fn test_accuracy_goes_negative_without_clamping() {
        let mut d = drill("ab");
        for _ in 0..3 {
            assert_eq!(d.on_key('x'), Keypress::Mistake);
        }
        d.on_key('a');
        let result = match d.on_key('b') {
            Keypress::Completed(result) => result,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(result.total_mistakes, 3);
        assert_eq!(result.accuracy, -50.0);
    }

    #[test]
    fn test_final_correct_key_completes_without_advancing_past_end() {
        let mut d = drill("j");
        assert_matches!(d.on_key('j'), Keypress::Completed(_));
        assert_eq!(d.phase(), Phase::Completed);
        assert_eq!(d.expected_char(), None);
    }

    #[test]
    fn test_keys_after_completion_change_nothing() {
        let mut d = drill("j");
        d.on_key('j');
        let before = d.result().unwrap().clone();
        assert_matches!(d.on_key('x'), Keypress::Completed(_));
        assert_eq!(d.result().unwrap(), &before);
        assert!(d.mistakes().is_empty());
    }

    #[test]
    fn test_mistakes_on_separator_are_charged_to_space() {
        let mut d = drill("jf fj");
        d.on_key('j');
        d.on_key('f');
        assert_eq!(d.on_key('f'), Keypress::Mistake);
        assert_eq!(d.mistakes().get(&' '), Some(&1));
    }

    #[test]
    fn test_result_wpm_matches_word_count_over_elapsed() {
        // "ab cd" typed correctly in exactly two seconds: 2 words -> 60 wpm.
        let result = SessionResult::compute("ab cd", &HashMap::new(), Duration::from_secs(2));
        assert_eq!(result.word_count, 2);
        assert_eq!(result.wpm, 60.0);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.elapsed_secs, 2.0);
    }

    #[test]
    fn test_result_clamps_zero_elapsed_time() {
        let result = SessionResult::compute("jf", &HashMap::new(), Duration::ZERO);
        assert!(result.wpm.is_finite());
        assert!(result.elapsed_secs > 0.0);
    }

    #[test]
    fn test_total_mistakes_sums_the_histogram() {
        let mut mistakes = HashMap::new();
        mistakes.insert('j', 2);
        mistakes.insert('f', 3);
        let result = SessionResult::compute("jf fj jf", &mistakes, Duration::from_secs(1));
        assert_eq!(result.total_mistakes, 5);
        assert_eq!(result.word_count, 3);
    }
}
