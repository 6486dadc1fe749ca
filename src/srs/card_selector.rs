//! Weighted card selection with a soft anti-repeat penalty.
//!
//! Selection runs in four steps:
//! 1. restrict the deck to cards allowed by the knowledge filter
//! 2. prefer cards that are due; if none are, rehearse the whole allowed pool
//! 3. weight each candidate by `(6 - box)^2`, scaled down for recently shown cards
//! 4. draw from the cumulative weight distribution

use rand::Rng;

use crate::config::{BOX_MAX, RECENT_PENALTY};
use crate::domain::{clamp_box, Card, KnowledgeFilter, ProgressEntry, ProgressMap, RecentHistory};
use crate::srs::knowledge::classify;

/// A candidate card with its selection weight
#[derive(Debug, Clone)]
pub struct CardWeight<'a> {
  pub card: &'a Card,
  pub weight: f64,
}

/// Outcome of a selection round
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
  Picked(&'a Card),
  /// The deck has cards, but none pass the knowledge filter
  NoEligibleCard,
  /// The deck itself is empty
  NoCards,
}

/// Selection weight: 25 for box 1 down to 1 for box 5
pub fn calculate_card_weight(box_level: i64, recently_shown: bool) -> f64 {
  let distance = (BOX_MAX + 1 - clamp_box(box_level)) as f64;
  let weight = distance * distance;
  if recently_shown {
    weight * RECENT_PENALTY
  } else {
    weight
  }
}

/// Cards whose classification passes the filter, in deck order
pub fn allowed_cards<'a>(
  cards: &'a [Card],
  progress: &ProgressMap,
  filter: KnowledgeFilter,
) -> Vec<&'a Card> {
  cards
    .iter()
    .filter(|c| filter.allows(classify(progress.get(&c.id))))
    .collect()
}

/// Due cards of the allowed set, or the whole allowed set when nothing is due
pub fn candidate_pool<'a>(allowed: &[&'a Card], progress: &ProgressMap, now: i64) -> Vec<&'a Card> {
  let due: Vec<&Card> = allowed
    .iter()
    .copied()
    .filter(|c| entry_for(progress, c, now).is_due(now))
    .collect();

  if due.is_empty() {
    allowed.to_vec()
  } else {
    due
  }
}

/// Select a card using weighted random selection.
/// Higher weight = more likely to be selected.
pub fn weighted_random_select<'a, R: Rng>(
  weights: &[CardWeight<'a>],
  rng: &mut R,
) -> Option<&'a Card> {
  if weights.is_empty() {
    return None;
  }

  let total_weight: f64 = weights.iter().map(|w| w.weight).sum();

  if !(total_weight > 0.0) {
    // Degenerate weights: every candidate is equally likely
    let idx = rng.random_range(0..weights.len());
    return Some(weights[idx].card);
  }

  let mut target = rng.random_range(0.0..total_weight);

  for w in weights {
    if w.weight <= 0.0 {
      continue;
    }
    target -= w.weight;
    if target <= 0.0 {
      return Some(w.card);
    }
  }

  // Rounding can leave a sliver of weight unclaimed
  weights.iter().rev().find(|w| w.weight > 0.0).map(|w| w.card)
}

/// Main entry point: pick the next card to show.
///
/// Pure with respect to the progress map; the caller records the pick in
/// its recent history.
pub fn select_next_card<'a, R: Rng>(
  cards: &'a [Card],
  progress: &ProgressMap,
  filter: KnowledgeFilter,
  recent: &RecentHistory,
  now: i64,
  rng: &mut R,
) -> Selection<'a> {
  if cards.is_empty() {
    return Selection::NoCards;
  }

  let allowed = allowed_cards(cards, progress, filter);
  if allowed.is_empty() {
    return Selection::NoEligibleCard;
  }

  let weights: Vec<CardWeight> = candidate_pool(&allowed, progress, now)
    .into_iter()
    .map(|card| CardWeight {
      card,
      weight: calculate_card_weight(entry_for(progress, card, now).box_level, recent.contains(&card.id)),
    })
    .collect();

  match weighted_random_select(&weights, rng) {
    Some(card) => Selection::Picked(card),
    None => Selection::NoEligibleCard,
  }
}

fn entry_for(progress: &ProgressMap, card: &Card, now: i64) -> ProgressEntry {
  progress
    .get(&card.id)
    .copied()
    .unwrap_or_else(|| ProgressEntry::new(now))
}
