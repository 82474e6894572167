//! Domain models used by the backend: dimensions, trait letters, questions,
//! assessments, users, results, content pages, and point-earning actions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One of the four fixed personality axes, in canonical order EI, SN, TF, JP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
  Ei,
  Sn,
  Tf,
  Jp,
}

impl Dimension {
  /// Canonical ordering; the primary type code is assembled in this order.
  pub const ALL: [Dimension; 4] = [Dimension::Ei, Dimension::Sn, Dimension::Tf, Dimension::Jp];

  /// The two pole letters, first letter being the tie-break default.
  pub fn letters(self) -> [char; 2] {
    match self {
      Dimension::Ei => ['E', 'I'],
      Dimension::Sn => ['S', 'N'],
      Dimension::Tf => ['T', 'F'],
      Dimension::Jp => ['J', 'P'],
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Dimension::Ei => "EI",
      Dimension::Sn => "SN",
      Dimension::Tf => "TF",
      Dimension::Jp => "JP",
    }
  }

  /// Human trait names for the two poles, in pole order.
  pub fn trait_names(self) -> [&'static str; 2] {
    match self {
      Dimension::Ei => ["extrovert", "introvert"],
      Dimension::Sn => ["sensory", "intuitive"],
      Dimension::Tf => ["thinking", "feeling"],
      Dimension::Jp => ["judging", "perceiving"],
    }
  }

  /// Map an uppercase trait letter to its dimension and pole index (0 or 1).
  /// Anything outside `{E,I,S,N,T,F,J,P}` returns `None`.
  pub fn classify(letter: char) -> Option<(Dimension, usize)> {
    match letter {
      'E' => Some((Dimension::Ei, 0)),
      'I' => Some((Dimension::Ei, 1)),
      'S' => Some((Dimension::Sn, 0)),
      'N' => Some((Dimension::Sn, 1)),
      'T' => Some((Dimension::Tf, 0)),
      'F' => Some((Dimension::Tf, 1)),
      'J' => Some((Dimension::Jp, 0)),
      'P' => Some((Dimension::Jp, 1)),
      _ => None,
    }
  }

  /// The opposite pole letter, e.g. `E` -> `I`.
  pub fn complement(letter: char) -> Option<char> {
    let (dim, side) = Dimension::classify(letter)?;
    Some(dim.letters()[1 - side])
  }
}

/// Per-dimension question counts for one assessment; the denominators of the
/// scoring engine. Derived from the question list, never hard-coded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCounts {
  pub ei: u32,
  pub sn: u32,
  pub tf: u32,
  pub jp: u32,
}

impl DimensionCounts {
  pub fn get(&self, dim: Dimension) -> u32 {
    match dim {
      Dimension::Ei => self.ei,
      Dimension::Sn => self.sn,
      Dimension::Tf => self.tf,
      Dimension::Jp => self.jp,
    }
  }

  pub fn bump(&mut self, dim: Dimension) {
    match dim {
      Dimension::Ei => self.ei += 1,
      Dimension::Sn => self.sn += 1,
      Dimension::Tf => self.tf += 1,
      Dimension::Jp => self.jp += 1,
    }
  }
}

/// Eight trait percentages (0-100). For complete input each complementary
/// pair sums to exactly 100 (see `scoring` for the rounding rule).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScores {
  pub extrovert: u8,
  pub introvert: u8,
  pub sensory: u8,
  pub intuitive: u8,
  pub thinking: u8,
  pub feeling: u8,
  pub judging: u8,
  pub perceiving: u8,
}

impl TraitScores {
  /// The (first, second) pole percentages of one dimension.
  pub fn pair(&self, dim: Dimension) -> (u8, u8) {
    match dim {
      Dimension::Ei => (self.extrovert, self.introvert),
      Dimension::Sn => (self.sensory, self.intuitive),
      Dimension::Tf => (self.thinking, self.feeling),
      Dimension::Jp => (self.judging, self.perceiving),
    }
  }

  pub fn set_pair(&mut self, dim: Dimension, first: u8, second: u8) {
    match dim {
      Dimension::Ei => {
        self.extrovert = first;
        self.introvert = second;
      }
      Dimension::Sn => {
        self.sensory = first;
        self.intuitive = second;
      }
      Dimension::Tf => {
        self.thinking = first;
        self.feeling = second;
      }
      Dimension::Jp => {
        self.judging = first;
        self.perceiving = second;
      }
    }
  }
}

/// Where did an assessment or content page come from?
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BankSource {
  LocalBank, // from user-provided TOML config
  Seed,      // built-in seeds (always available)
}

/// One of the two answer options of a question, tied to a pole letter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionOption {
  pub letter: char,
  pub label: String,
}

/// A single assessment question. The two options map to the two poles of
/// `dimension`; the client submits the chosen option's letter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub dimension: Dimension,
  pub prompt: String,
  pub options: Vec<QuestionOption>,
}

/// An ordered question set. Answer sequences must align with `questions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Assessment {
  pub id: String,
  pub title: String,
  pub source: BankSource,
  pub questions: Vec<Question>,
}

impl Assessment {
  /// Tally the question list by dimension; these are the scoring denominators.
  pub fn dimension_counts(&self) -> DimensionCounts {
    let mut counts = DimensionCounts::default();
    for q in &self.questions {
      counts.bump(q.dimension);
    }
    counts
  }
}

/// Guest and registered users are mutually exclusive kinds of the same record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
  Guest,
  Registered,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
  pub id: String,
  pub kind: UserKind,
  pub name: String,
  pub created_at: DateTime<Utc>,
}

/// A persisted scoring outcome. Immutable once constructed; a newer result
/// for the same user+assessment supersedes it (`active` flips to false).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRecord {
  pub id: String,
  pub user_id: String,
  pub assessment_id: String,
  pub scores: TraitScores,
  pub primary_type: String,
  pub alternative_types: Vec<String>,
  pub active: bool,
  pub created_at: DateTime<Utc>,
}

/// Reading material (type profiles etc.) served by the content endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentPage {
  pub id: String,
  pub title: String,
  pub body: String,
  pub source: BankSource,
  /// Four-letter code this page describes, if it is a type profile.
  pub type_code: Option<String>,
}

/// User actions that earn gamification points.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PointsAction {
  Registration,
  DailyLogin,
  ContentRead,
  TestCompletion,
}

impl PointsAction {
  pub fn label(self) -> &'static str {
    match self {
      PointsAction::Registration => "registration",
      PointsAction::DailyLogin => "daily_login",
      PointsAction::ContentRead => "content_read",
      PointsAction::TestCompletion => "test_completion",
    }
  }
}

/// One append-only ledger entry. `reference` carries the page id for
/// content-read awards so repeat reads can be deduplicated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointsEntry {
  pub action: PointsAction,
  pub points: u32,
  pub day: NaiveDate,
  pub reference: Option<String>,
  pub awarded_at: DateTime<Utc>,
}
