//! Per-card learning state and the grade/filter vocabulary.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::config::{BOX_MAX, BOX_MIN, SEEN_CAP};
use crate::error::StudyError;

/// Learner's self-reported recall quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Grade {
  NoClue = 0,
  Partial = 1,
  Known = 2,
}

impl Grade {
  pub fn as_u8(self) -> u8 {
    self as u8
  }

  pub fn from_i64(value: i64) -> Option<Self> {
    match value {
      0 => Some(Self::NoClue),
      1 => Some(Self::Partial),
      2 => Some(Self::Known),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::NoClue => "no_clue",
      Self::Partial => "partial",
      Self::Known => "known",
    }
  }
}

impl From<Grade> for u8 {
  fn from(grade: Grade) -> Self {
    grade.as_u8()
  }
}

impl TryFrom<u8> for Grade {
  type Error = StudyError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::from_i64(i64::from(value)).ok_or(StudyError::InvalidGrade(i64::from(value)))
  }
}

/// Restricts the study pool to cards of one grade. Serialized as `null | 0 | 1 | 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Grade>", into = "Option<Grade>")]
pub enum KnowledgeFilter {
  #[default]
  All,
  Only(Grade),
}

impl KnowledgeFilter {
  pub fn allows(self, grade: Grade) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == grade,
    }
  }
}

impl From<Option<Grade>> for KnowledgeFilter {
  fn from(grade: Option<Grade>) -> Self {
    grade.map_or(Self::All, Self::Only)
  }
}

impl From<KnowledgeFilter> for Option<Grade> {
  fn from(filter: KnowledgeFilter) -> Self {
    match filter {
      KnowledgeFilter::All => None,
      KnowledgeFilter::Only(grade) => Some(grade),
    }
  }
}

/// Learning state of one card.
///
/// Fields are read leniently so that hand-edited or older records still load:
/// any JSON number is accepted (truncated toward zero where an integer is
/// expected) and values of other types count as missing. Range checks happen
/// in `sanitized`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
  #[serde(rename = "box", default = "default_box", deserialize_with = "lenient_box")]
  pub box_level: i64,
  /// Milliseconds since epoch; NaN when missing
  #[serde(default = "missing_due", deserialize_with = "lenient_due")]
  pub due: f64,
  #[serde(default, deserialize_with = "lenient_seen")]
  pub seen: i64,
  /// Raw stored grade; `None` for records written before grades were tracked
  #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_grade")]
  pub grade: Option<i64>,
}

impl ProgressEntry {
  /// Default state of a card that has never been graded
  pub fn new(now: i64) -> Self {
    Self {
      box_level: BOX_MIN,
      due: now as f64,
      seen: 0,
      grade: Some(Grade::NoClue.as_u8().into()),
    }
  }

  /// Clamp every field into its valid range and fill in a missing grade.
  pub fn sanitized(&self, now: i64) -> Self {
    let mut entry = Self {
      box_level: clamp_box(self.box_level),
      due: if self.due.is_finite() { self.due } else { now as f64 },
      seen: self.seen.clamp(0, SEEN_CAP),
      grade: self.grade,
    };
    if self.grade.and_then(Grade::from_i64).is_none() {
      entry.grade = Some(entry.inferred_grade().as_u8().into());
    }
    entry
  }

  /// Classification used by the knowledge filter and statistics
  pub fn grade(&self) -> Grade {
    self
      .grade
      .and_then(Grade::from_i64)
      .unwrap_or_else(|| self.inferred_grade())
  }

  /// Grade implied by a record that predates grade tracking:
  /// never graded is "no clue", promoted past box 1 is "known".
  pub fn inferred_grade(&self) -> Grade {
    if self.seen <= 0 {
      Grade::NoClue
    } else if self.box_level >= 2 {
      Grade::Known
    } else {
      Grade::NoClue
    }
  }

  pub fn is_due(&self, now: i64) -> bool {
    self.due <= now as f64
  }
}

/// Progress of a whole deck, keyed by card id
pub type ProgressMap = BTreeMap<String, ProgressEntry>;

pub fn clamp_box(value: i64) -> i64 {
  value.clamp(BOX_MIN, BOX_MAX)
}

fn default_box() -> i64 {
  BOX_MIN
}

fn missing_due() -> f64 {
  f64::NAN
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
  let value = Option::<serde_json::Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_box<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
  Ok(lenient_number(deserializer)?.map_or(BOX_MIN, |n| n.trunc() as i64))
}

fn lenient_due<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
  Ok(lenient_number(deserializer)?.unwrap_or(f64::NAN))
}

fn lenient_seen<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
  Ok(lenient_number(deserializer)?.map_or(0, |n| n.trunc() as i64))
}

fn lenient_grade<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
  Ok(
    lenient_number(deserializer)?
      .filter(|n| n.fract() == 0.0)
      .map(|n| n as i64),
  )
}
