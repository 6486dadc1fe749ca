//! The active study session and what it shows to the learner.

use rand::Rng;
use serde::Serialize;

use crate::content::format_sources;
use crate::domain::{Card, CardStore, KnowledgeFilter, ProgressMap, RecentHistory, SessionRecord};
use crate::srs::{classify, counts, select_next_card, KnowledgeCounts, Selection};

/// Everything a running session needs, threaded through every operation
/// instead of living in globals.
#[derive(Debug, Clone)]
pub struct StudyContext {
  pub deck: String,
  pub cards: CardStore,
  pub progress: ProgressMap,
  pub filter: KnowledgeFilter,
  /// Index into `cards` of the displayed card
  pub current: Option<usize>,
  pub showing_answer: bool,
  pub recent: RecentHistory,
}

impl StudyContext {
  pub fn new(deck: impl Into<String>, cards: CardStore, progress: ProgressMap) -> Self {
    Self {
      deck: deck.into(),
      cards,
      progress,
      filter: KnowledgeFilter::All,
      current: None,
      showing_answer: false,
      recent: RecentHistory::new(),
    }
  }

  pub fn current_card(&self) -> Option<&Card> {
    self.current.and_then(|idx| self.cards.get(idx))
  }

  /// True if `card` passes the active knowledge filter
  pub fn admits(&self, card: &Card) -> bool {
    self.filter.allows(classify(self.progress.get(&card.id)))
  }

  /// Replace the displayed card with a fresh scheduler pick, face down.
  /// Clears the card when the filter leaves nothing to study.
  pub fn advance<R: Rng>(&mut self, rng: &mut R, now: i64) {
    let picked = match select_next_card(
      self.cards.as_slice(),
      &self.progress,
      self.filter,
      &self.recent,
      now,
      rng,
    ) {
      Selection::Picked(card) => Some(card.id.clone()),
      Selection::NoEligibleCard | Selection::NoCards => None,
    };

    self.showing_answer = false;
    match picked {
      Some(id) => {
        tracing::debug!("Deck {}: picked {}", self.deck, id);
        self.current = self.cards.position(&id);
        self.recent.push(&id);
      }
      None => {
        tracing::debug!("Deck {}: nothing eligible under {:?}", self.deck, self.filter);
        self.current = None;
      }
    }
  }

  pub fn counts(&self) -> KnowledgeCounts {
    counts(self.cards.as_slice(), &self.progress)
  }

  pub fn present(&self) -> Presented {
    match self.current_card() {
      Some(card) => Presented::Card {
        card: card.clone(),
        showing_answer: self.showing_answer,
        source_text: format_sources(&card.sources),
      },
      None => Presented::NoEligibleCard {
        filter: self.filter,
      },
    }
  }

  pub fn to_record(&self, now: i64) -> SessionRecord {
    SessionRecord {
      deck: self.deck.clone(),
      knowledge_filter: self.filter,
      card_id: self.current_card().map(|c| c.id.clone()),
      showing_answer: self.showing_answer,
      last_ids: self.recent.to_vec(),
      saved_at: now,
    }
  }
}

/// What the learner should see next.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Presented {
  Card {
    card: Card,
    #[serde(rename = "showingAnswer")]
    showing_answer: bool,
    #[serde(rename = "sourceText")]
    source_text: String,
  },
  /// The active filter's pool is empty; broaden the filter to continue
  NoEligibleCard { filter: KnowledgeFilter },
}

impl Presented {
  pub fn card(&self) -> Option<&Card> {
    match self {
      Self::Card { card, .. } => Some(card),
      Self::NoEligibleCard { .. } => None,
    }
  }

  pub fn card_id(&self) -> Option<&str> {
    self.card().map(|c| c.id.as_str())
  }
}

/// Result of grading: fresh statistics and the following card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
  pub counts: KnowledgeCounts,
  pub next: Presented,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::ensure_progress;
  use crate::domain::{Grade, Source};
  use crate::testing::cards;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  const NOW: i64 = 1_700_000_000_000;

  fn context(n: usize) -> StudyContext {
    let deck = cards(n);
    let progress = ensure_progress(&deck, &ProgressMap::new(), NOW);
    StudyContext::new("d1", CardStore::new(deck), progress)
  }

  #[test]
  fn test_advance_records_history() {
    let mut ctx = context(5);
    let mut rng = StdRng::seed_from_u64(1);
    ctx.showing_answer = true;

    ctx.advance(&mut rng, NOW);

    let id = ctx.current_card().unwrap().id.clone();
    assert!(!ctx.showing_answer);
    assert_eq!(ctx.recent.to_vec(), vec![id]);
  }

  #[test]
  fn test_advance_clears_card_when_filter_is_empty() {
    let mut ctx = context(3);
    let mut rng = StdRng::seed_from_u64(1);
    ctx.advance(&mut rng, NOW);
    ctx.filter = KnowledgeFilter::Only(Grade::Known);

    ctx.advance(&mut rng, NOW);

    assert!(ctx.current.is_none());
    assert_eq!(
      ctx.present(),
      Presented::NoEligibleCard {
        filter: KnowledgeFilter::Only(Grade::Known)
      }
    );
  }

  #[test]
  fn test_present_json_shape() {
    let deck = vec![Card::new("a", "q", "x").with_sources(vec![Source {
      file: "notes.pdf".into(),
      page: Some(2),
      pages: vec![1],
      note: None,
    }])];
    let progress = ensure_progress(&deck, &ProgressMap::new(), NOW);
    let mut ctx = StudyContext::new("d1", CardStore::new(deck), progress);
    ctx.current = Some(0);
    ctx.showing_answer = true;

    let json = serde_json::to_value(ctx.present()).unwrap();
    assert_eq!(json["status"], "card");
    assert_eq!(json["card"]["id"], "a");
    assert_eq!(json["showingAnswer"], true);
    assert_eq!(json["sourceText"], "Source: notes.pdf (p. 1–2)");

    ctx.current = None;
    ctx.filter = KnowledgeFilter::Only(Grade::Partial);
    let json = serde_json::to_value(ctx.present()).unwrap();
    assert_eq!(json["status"], "no_eligible_card");
    assert_eq!(json["filter"], 1);
  }

  #[test]
  fn test_to_record() {
    let mut ctx = context(2);
    ctx.current = Some(1);
    ctx.recent.push("c1");
    ctx.filter = KnowledgeFilter::Only(Grade::NoClue);

    let record = ctx.to_record(NOW);
    assert_eq!(record.deck, "d1");
    assert_eq!(record.card_id.as_deref(), Some("c1"));
    assert_eq!(record.knowledge_filter, KnowledgeFilter::Only(Grade::NoClue));
    assert_eq!(record.last_ids, vec!["c1"]);
    assert_eq!(record.saved_at, NOW);
  }
}
