//! Grade-to-schedule transitions.
//!
//! A Leitner-style rule set tuned for a single sitting:
//! - no clue: back to box 1, again in 20 seconds
//! - partial: box unchanged, again in 90 seconds
//! - known: one box up, again in 5 minutes per box (10..25 minutes)

use crate::config::{
  BOX_MIN, KNOWN_MINUTES_PER_BOX, NO_CLUE_DELAY_MS, PARTIAL_DELAY_MS, SEEN_CAP,
};
use crate::domain::{clamp_box, Grade, ProgressEntry};

const MS_PER_MINUTE: i64 = 60_000;

/// Apply a rating to a card's progress, returning the new state.
pub fn grade_card(entry: &ProgressEntry, rating: Grade, now: i64) -> ProgressEntry {
  let current_box = clamp_box(entry.box_level);

  let (box_level, delay_ms) = match rating {
    Grade::NoClue => (BOX_MIN, NO_CLUE_DELAY_MS),
    Grade::Partial => (current_box, PARTIAL_DELAY_MS),
    Grade::Known => {
      let promoted = clamp_box(current_box + 1);
      (promoted, promoted * KNOWN_MINUTES_PER_BOX * MS_PER_MINUTE)
    }
  };

  ProgressEntry {
    box_level,
    due: (now + delay_ms) as f64,
    seen: entry.seen.clamp(0, SEEN_CAP).saturating_add(1).min(SEEN_CAP),
    grade: Some(rating.as_u8().into()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const NOW: i64 = 1_700_000_000_000;

  fn entry(box_level: i64, seen: i64) -> ProgressEntry {
    ProgressEntry {
      box_level,
      due: NOW as f64,
      seen,
      grade: Some(0),
    }
  }

  #[test]
  fn test_no_clue_resets_box() {
    for b in 1..=5 {
      let result = grade_card(&entry(b, 4), Grade::NoClue, NOW);
      assert_eq!(result.box_level, 1);
      assert_eq!(result.due - NOW as f64, 20_000.0);
      assert_eq!(result.grade(), Grade::NoClue);
    }
  }

  #[test]
  fn test_partial_keeps_box() {
    let result = grade_card(&entry(3, 2), Grade::Partial, NOW);
    assert_eq!(result.box_level, 3);
    assert_eq!(result.seen, 3);
    assert_eq!(result.grade, Some(1));
    assert_eq!(result.due, (NOW + 90_000) as f64);
  }

  #[test]
  fn test_partial_clamps_out_of_range_box() {
    assert_eq!(grade_card(&entry(0, 0), Grade::Partial, NOW).box_level, 1);
    assert_eq!(grade_card(&entry(8, 0), Grade::Partial, NOW).box_level, 5);
  }

  #[test]
  fn test_known_promotes_and_scales_interval() {
    let result = grade_card(&entry(1, 0), Grade::Known, NOW);
    assert_eq!(result.box_level, 2);
    assert_eq!(result.due - NOW as f64, 600_000.0);

    let result = grade_card(&entry(4, 0), Grade::Known, NOW);
    assert_eq!(result.box_level, 5);
    assert_eq!(result.due - NOW as f64, 1_500_000.0);
  }

  #[test]
  fn test_known_never_decreases_box() {
    let mut state = entry(1, 0);
    let mut previous = state.box_level;
    for _ in 0..10 {
      state = grade_card(&state, Grade::Known, NOW);
      assert!(state.box_level >= previous);
      assert_eq!(state.due - NOW as f64, (300_000 * state.box_level) as f64);
      previous = state.box_level;
    }
    assert_eq!(state.box_level, 5);
    assert_eq!(state.seen, 10);
  }

  #[test]
  fn test_seen_saturates() {
    let result = grade_card(&entry(2, 1_000_000), Grade::Partial, NOW);
    assert_eq!(result.seen, 1_000_000);

    let result = grade_card(&entry(2, -5), Grade::Partial, NOW);
    assert_eq!(result.seen, 1);
  }

  #[test]
  fn test_grading_ignores_previous_due() {
    let mut stale = entry(2, 1);
    stale.due = f64::NAN;
    let result = grade_card(&stale, Grade::NoClue, NOW);
    assert_eq!(result.due, (NOW + 20_000) as f64);
  }
}
