//! Study operations over a key-value store, a deck source and a random source.
//!
//! Every state-affecting operation persists the session record before it
//! returns; every grading also persists the deck's progress map.

use rand::Rng;
use serde::{Deserialize, Deserializer};

use crate::content::{validate_deck_id, DeckSource};
use crate::db::{self, ensure_progress, load_progress, load_session, save_progress, save_session, KeyValueStore};
use crate::domain::{CardStore, Grade, KnowledgeFilter, ProgressEntry, ProgressMap, RecentHistory};
use crate::error::{Result, StudyError};
use crate::srs::{grade_card, KnowledgeCounts};

use super::context::{GradeOutcome, Presented, StudyContext};

/// Options for starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StartOptions {
  /// `None` reuses the filter of a resumed session; an explicit `null` means no filter
  #[serde(default, deserialize_with = "explicit_filter")]
  pub filter: Option<KnowledgeFilter>,
  #[serde(default = "default_resume")]
  pub resume: bool,
}

impl Default for StartOptions {
  fn default() -> Self {
    Self {
      filter: None,
      resume: true,
    }
  }
}

impl StartOptions {
  pub fn fresh() -> Self {
    Self {
      filter: None,
      resume: false,
    }
  }

  pub fn with_filter(mut self, filter: KnowledgeFilter) -> Self {
    self.filter = Some(filter);
    self
  }
}

fn default_resume() -> bool {
  true
}

fn explicit_filter<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> std::result::Result<Option<KnowledgeFilter>, D::Error> {
  KnowledgeFilter::deserialize(deserializer).map(Some)
}

/// Single-learner study engine. At most one session is active.
pub struct StudyEngine<S, D, R> {
  store: S,
  decks: D,
  rng: R,
  context: Option<StudyContext>,
}

impl<S: KeyValueStore, D: DeckSource, R: Rng> StudyEngine<S, D, R> {
  pub fn new(store: S, decks: D, rng: R) -> Self {
    Self {
      store,
      decks,
      rng,
      context: None,
    }
  }

  pub fn context(&self) -> Option<&StudyContext> {
    self.context.as_ref()
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Load a deck and show its first card, resuming the stored session of
  /// the same deck when asked to and when it is still valid.
  ///
  /// On failure the previous session, if any, stays active.
  pub fn start_session(&mut self, deck: &str, options: StartOptions, now: i64) -> Result<Presented> {
    validate_deck_id(deck)?;
    let cards = CardStore::new(self.decks.load_deck(deck)?);
    if cards.is_empty() {
      return Err(StudyError::EmptyDeck(deck.to_string()));
    }

    let progress = ensure_progress(cards.as_slice(), &load_progress(&self.store, deck), now);
    save_progress(&mut self.store, deck, &progress);

    let resumed = if options.resume {
      load_session(&self.store).filter(|record| record.deck == deck)
    } else {
      None
    };

    let mut ctx = StudyContext::new(deck, cards, progress);
    ctx.filter = options
      .filter
      .or(resumed.as_ref().map(|r| r.knowledge_filter))
      .unwrap_or_default();

    let mut restored = false;
    if let Some(record) = resumed {
      ctx.recent = RecentHistory::from_ids(
        record
          .last_ids
          .into_iter()
          .filter(|id| ctx.cards.contains(id)),
      );

      let position = record.card_id.as_deref().and_then(|id| ctx.cards.position(id));
      let admitted = position
        .and_then(|idx| ctx.cards.get(idx))
        .is_some_and(|card| ctx.admits(card));
      if admitted {
        ctx.current = position;
        ctx.showing_answer = record.showing_answer;
        restored = true;
      } else if record.card_id.is_some() {
        tracing::debug!("Discarding stale session card for deck {}", deck);
      }
    }

    if !restored {
      ctx.advance(&mut self.rng, now);
    }

    tracing::info!(
      "Started session on deck {} ({} cards, filter {:?}, resumed: {})",
      deck,
      ctx.cards.len(),
      ctx.filter,
      restored
    );

    save_session(&mut self.store, &ctx.to_record(now));
    let presented = ctx.present();
    self.context = Some(ctx);
    Ok(presented)
  }

  /// The card currently displayed, or the empty state of the active filter
  pub fn current(&self) -> Result<Presented> {
    self
      .context
      .as_ref()
      .map(StudyContext::present)
      .ok_or(StudyError::NoActiveSession)
  }

  /// Show a new scheduler pick without grading the current card.
  pub fn pick_next(&mut self, now: i64) -> Result<Presented> {
    let ctx = self.context.as_mut().ok_or(StudyError::NoActiveSession)?;
    ctx.advance(&mut self.rng, now);
    save_session(&mut self.store, &ctx.to_record(now));
    Ok(ctx.present())
  }

  pub fn skip(&mut self, now: i64) -> Result<Presented> {
    self.pick_next(now)
  }

  /// Toggle between question and answer.
  pub fn flip(&mut self, now: i64) -> Result<Presented> {
    let ctx = self.context.as_mut().ok_or(StudyError::NoActiveSession)?;
    if ctx.current.is_none() {
      return Err(StudyError::NoCurrentCard);
    }
    ctx.showing_answer = !ctx.showing_answer;
    save_session(&mut self.store, &ctx.to_record(now));
    Ok(ctx.present())
  }

  /// Grade the displayed card and advance to the next one.
  pub fn apply_grade(&mut self, rating: Grade, now: i64) -> Result<GradeOutcome> {
    let ctx = self.context.as_mut().ok_or(StudyError::NoActiveSession)?;
    let card_id = ctx
      .current_card()
      .map(|card| card.id.clone())
      .ok_or(StudyError::NoCurrentCard)?;

    let entry = ctx
      .progress
      .get(&card_id)
      .copied()
      .unwrap_or_else(|| ProgressEntry::new(now));
    let updated = grade_card(&entry, rating, now);
    tracing::debug!(
      "Graded {} as {}: box {} -> {}",
      card_id,
      rating.as_str(),
      entry.box_level,
      updated.box_level
    );
    ctx.progress.insert(card_id, updated);
    save_progress(&mut self.store, &ctx.deck, &ctx.progress);

    ctx.advance(&mut self.rng, now);
    save_session(&mut self.store, &ctx.to_record(now));

    Ok(GradeOutcome {
      counts: ctx.counts(),
      next: ctx.present(),
    })
  }

  /// Switch the knowledge filter, re-picking if the displayed card no
  /// longer belongs to the pool.
  pub fn set_knowledge_filter(&mut self, filter: KnowledgeFilter, now: i64) -> Result<Presented> {
    let ctx = self.context.as_mut().ok_or(StudyError::NoActiveSession)?;
    ctx.filter = filter;

    let still_admitted = ctx.current_card().is_some_and(|card| ctx.admits(card));
    if !still_admitted {
      ctx.advance(&mut self.rng, now);
    }

    save_session(&mut self.store, &ctx.to_record(now));
    Ok(ctx.present())
  }

  /// Forget the stored progress of one deck. Other decks are left alone.
  ///
  /// An active session on that deck starts over from default progress; if
  /// its displayed card no longer passes the filter, a new one is picked
  /// and the session record follows.
  pub fn reset_progress(&mut self, deck: &str, now: i64) -> Result<()> {
    validate_deck_id(deck)?;
    db::reset_progress(&mut self.store, deck);

    if let Some(ctx) = self.context.as_mut().filter(|ctx| ctx.deck == deck) {
      ctx.progress = ensure_progress(ctx.cards.as_slice(), &ProgressMap::new(), now);

      let still_admitted = ctx.current_card().is_some_and(|card| ctx.admits(card));
      if !still_admitted {
        ctx.advance(&mut self.rng, now);
        save_session(&mut self.store, &ctx.to_record(now));
      }
    }

    tracing::info!("Reset progress of deck {}", deck);
    Ok(())
  }

  /// Knowledge statistics of a deck, with or without an active session.
  pub fn knowledge_counts(&self, deck: &str, now: i64) -> Result<KnowledgeCounts> {
    validate_deck_id(deck)?;
    if let Some(ctx) = self.context.as_ref().filter(|ctx| ctx.deck == deck) {
      return Ok(ctx.counts());
    }

    let cards = CardStore::new(self.decks.load_deck(deck)?);
    let progress = ensure_progress(cards.as_slice(), &load_progress(&self.store, deck), now);
    Ok(crate::srs::counts(cards.as_slice(), &progress))
  }

  /// Leave the study view. The stored record stays for a later resume.
  pub fn end_session(&mut self) {
    if let Some(ctx) = self.context.take() {
      tracing::info!("Ended session on deck {}", ctx.deck);
    }
  }
}
