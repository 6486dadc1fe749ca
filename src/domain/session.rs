use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::RECENT_HISTORY_LEN;
use crate::domain::KnowledgeFilter;

/// Most recently shown card ids, newest first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentHistory {
  ids: VecDeque<String>,
}

impl RecentHistory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build from stored ids (newest first), keeping the first occurrence of each
  pub fn from_ids<I: IntoIterator<Item = String>>(ids: I) -> Self {
    let mut history = Self::new();
    for id in ids {
      if history.ids.len() == RECENT_HISTORY_LEN {
        break;
      }
      if !history.contains(&id) {
        history.ids.push_back(id);
      }
    }
    history
  }

  /// Record a shown card: move it to the front and forget the oldest
  pub fn push(&mut self, id: &str) {
    self.ids.retain(|existing| existing != id);
    self.ids.push_front(id.to_string());
    self.ids.truncate(RECENT_HISTORY_LEN);
  }

  pub fn contains(&self, id: &str) -> bool {
    self.ids.iter().any(|existing| existing == id)
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  pub fn to_vec(&self) -> Vec<String> {
    self.ids.iter().cloned().collect()
  }
}

/// Resumable snapshot of the study session, stored under the `session` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
  pub deck: String,
  #[serde(default)]
  pub knowledge_filter: KnowledgeFilter,
  #[serde(default)]
  pub card_id: Option<String>,
  #[serde(default)]
  pub showing_answer: bool,
  #[serde(default)]
  pub last_ids: Vec<String>,
  #[serde(default)]
  pub saved_at: i64,
}
