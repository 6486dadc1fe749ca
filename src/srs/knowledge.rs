//! Three-way knowledge classification and deck statistics.

use serde::Serialize;

use crate::domain::{Card, Grade, ProgressEntry, ProgressMap};

/// Classification of a card; a card without progress has no clue yet.
pub fn classify(entry: Option<&ProgressEntry>) -> Grade {
  entry.map_or(Grade::NoClue, ProgressEntry::grade)
}

/// Number of cards per knowledge bucket. Serialized as `{"0": n, "1": n, "2": n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeCounts {
  #[serde(rename = "0")]
  pub no_clue: usize,
  #[serde(rename = "1")]
  pub partial: usize,
  #[serde(rename = "2")]
  pub known: usize,
}

impl KnowledgeCounts {
  pub fn get(&self, grade: Grade) -> usize {
    match grade {
      Grade::NoClue => self.no_clue,
      Grade::Partial => self.partial,
      Grade::Known => self.known,
    }
  }

  pub fn total(&self) -> usize {
    self.no_clue + self.partial + self.known
  }

  fn add(&mut self, grade: Grade) {
    match grade {
      Grade::NoClue => self.no_clue += 1,
      Grade::Partial => self.partial += 1,
      Grade::Known => self.known += 1,
    }
  }
}

/// Tally every card of the deck into exactly one bucket.
pub fn counts(cards: &[Card], progress: &ProgressMap) -> KnowledgeCounts {
  let mut counts = KnowledgeCounts::default();
  for card in cards {
    counts.add(classify(progress.get(&card.id)));
  }
  counts
}
