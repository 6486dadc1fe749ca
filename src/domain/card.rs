use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A citation shown under the answer.
///
/// Display-only, so every field is read leniently: a missing or non-string
/// `file` is empty, and page values that are not whole numbers are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
  #[serde(default, deserialize_with = "lenient_text")]
  pub file: String,
  #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_page")]
  pub page: Option<i64>,
  #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient_pages")]
  pub pages: Vec<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_note")]
  pub note: Option<String>,
}

impl Source {
  pub fn new(file: impl Into<String>) -> Self {
    Self {
      file: file.into(),
      page: None,
      pages: Vec::new(),
      note: None,
    }
  }

  /// All page numbers of this citation, `pages` first, then `page`
  pub fn page_numbers(&self) -> impl Iterator<Item = i64> + '_ {
    self.pages.iter().copied().chain(self.page)
  }
}

/// A normalized question/answer card. Never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  pub id: String,
  pub question: String,
  pub answer: String,
  #[serde(default, deserialize_with = "lenient_sources")]
  pub sources: Vec<Source>,
  /// Deck-specific tags, opaque to the engine
  #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
  pub meta: serde_json::Value,
}

impl Card {
  pub fn new(id: impl Into<String>, question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      question: question.into(),
      answer: answer.into(),
      sources: Vec::new(),
      meta: serde_json::Value::Null,
    }
  }

  pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
    self.sources = sources;
    self
  }

  /// True if id, question and answer all carry text
  pub fn is_complete(&self) -> bool {
    !self.id.trim().is_empty() && !self.question.trim().is_empty() && !self.answer.trim().is_empty()
  }
}

fn page_number(value: &Value) -> Option<i64> {
  value
    .as_f64()
    .filter(|n| n.is_finite() && n.fract() == 0.0)
    .map(|n| n as i64)
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default())
}

fn lenient_note<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}

fn lenient_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.as_ref().and_then(page_number))
}

fn lenient_pages<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(match value {
    Some(Value::Array(items)) => items.iter().filter_map(page_number).collect(),
    _ => Vec::new(),
  })
}

/// Citations that are not objects are skipped; the card itself is kept.
fn lenient_sources<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Source>, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(match value {
    Some(Value::Array(items)) => items
      .into_iter()
      .filter(Value::is_object)
      .filter_map(|item| serde_json::from_value(item).ok())
      .collect(),
    _ => Vec::new(),
  })
}

/// The immutable card list of the active deck, indexed by id.
///
/// Ids are unique: when the input repeats an id, the first card wins.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
  cards: Vec<Card>,
  index: HashMap<String, usize>,
}

impl CardStore {
  pub fn new(cards: Vec<Card>) -> Self {
    let mut store = Self::default();
    for card in cards {
      if store.index.contains_key(&card.id) {
        tracing::warn!("Dropping duplicate card id {}", card.id);
        continue;
      }
      store.index.insert(card.id.clone(), store.cards.len());
      store.cards.push(card);
    }
    store
  }

  pub fn as_slice(&self) -> &[Card] {
    &self.cards
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn position(&self, id: &str) -> Option<usize> {
    self.index.get(id).copied()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.index.contains_key(id)
  }

  pub fn get(&self, index: usize) -> Option<&Card> {
    self.cards.get(index)
  }
}
