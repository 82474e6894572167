//! Personality scoring: deterministic tally -> percentages -> type selection.
//!
//! Flow:
//! 1) Tally the eight trait letters across the ordered answer sequence
//!    (unrecognized entries are skipped, lowercase is normalized).
//! 2) Per dimension, turn tallies into 0-100 percentages against the
//!    assessment's question counts.
//! 3) Pick the higher-scoring letter per dimension (ties go to the first
//!    pole letter: E, S, T, J) and assemble the four-letter primary type.
//! 4) Offer up to two alternative types for dimensions that are too close
//!    to call, each flipping exactly one dimension of the primary.
//!
//! Rounding rule (pinned by tests): half-away-from-zero via `f64::round`.
//! Sum-to-100 rule: when a dimension's two tallies add up exactly to its
//! denominator, the second percentage is derived as `100 - first`, so
//! complementary pairs always total 100 for complete input. With stray or
//! unrecognized entries both sides are rounded independently.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Dimension, DimensionCounts, TraitScores};

/// Hard cap on offered alternatives, regardless of how many dimensions
/// fall under the closeness threshold.
pub const MAX_ALTERNATIVES: usize = 2;

/// Default percentage-point gap under which a dimension is "close".
pub const DEFAULT_CLOSENESS_THRESHOLD: u8 = 20;

/// Tunable scoring policy. The threshold is configuration, not law: known
/// deployments have run it at 10 and at 20.
#[derive(Clone, Copy, Debug)]
pub struct ScoringConfig {
  pub closeness_threshold: u8,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self { closeness_threshold: DEFAULT_CLOSENESS_THRESHOLD }
  }
}

/// Malformed input. Both variants are caller errors, never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
  #[error("invalid input: empty answer sequence")]
  EmptyAnswers,
  #[error("invalid input: dimension {dimension} has answers but a zero question count")]
  ZeroDenominator { dimension: &'static str },
}

/// Everything the submission handler persists and returns to the client.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ScoringResult {
  pub scores: TraitScores,
  pub primary_type: String,
  pub alternative_types: Vec<String>,
}

/// Score an ordered answer sequence against per-dimension question counts.
///
/// Pure and idempotent; safe to call concurrently. Fails only on an empty
/// sequence or on a zero denominator for a dimension that tallied answers.
pub fn score_answers(
  answers: &[char],
  counts: &DimensionCounts,
  cfg: &ScoringConfig,
) -> Result<ScoringResult, ScoringError> {
  if answers.is_empty() {
    return Err(ScoringError::EmptyAnswers);
  }

  // Single pass: [dimension][pole] tallies. Unrecognized letters are a
  // defined tolerance (skipped), not an error.
  let mut tallies = [[0u32; 2]; 4];
  for &raw in answers {
    if let Some((dim, side)) = Dimension::classify(raw.to_ascii_uppercase()) {
      tallies[dim as usize][side] += 1;
    }
  }

  let mut scores = TraitScores::default();
  let mut primary = String::with_capacity(4);
  let mut close_dims: Vec<Dimension> = Vec::new();

  for dim in Dimension::ALL {
    let [first, second] = tallies[dim as usize];
    let denom = counts.get(dim);
    if denom == 0 {
      if first + second > 0 {
        return Err(ScoringError::ZeroDenominator { dimension: dim.label() });
      }
      // Dimension absent from this assessment: both poles read 0 and the
      // tie-break default letter stands in. Not eligible as "close".
      scores.set_pair(dim, 0, 0);
      primary.push(dim.letters()[0]);
      continue;
    }

    let pct_first = pct(first, denom);
    let pct_second = if first + second == denom {
      100 - pct_first
    } else {
      pct(second, denom)
    };
    scores.set_pair(dim, pct_first, pct_second);

    // Tie goes to the first pole letter.
    let letters = dim.letters();
    primary.push(if pct_first >= pct_second { letters[0] } else { letters[1] });

    if pct_first.abs_diff(pct_second) < cfg.closeness_threshold {
      close_dims.push(dim);
    }
  }

  // One alternative per close dimension, in canonical dimension order,
  // each flipping exactly that dimension; flips are never combined.
  let alternative_types = close_dims
    .iter()
    .take(MAX_ALTERNATIVES)
    .map(|&dim| flip_dimension(&primary, dim))
    .collect();

  Ok(ScoringResult { scores, primary_type: primary, alternative_types })
}

/// `count/denom` as a 0-100 percentage, half rounded away from zero.
/// Clamped so a malformed oversized tally can never exceed 100.
fn pct(count: u32, denom: u32) -> u8 {
  let raw = (count as f64 / denom as f64 * 100.0).round();
  (raw as u32).min(100) as u8
}

fn flip_dimension(primary: &str, dim: Dimension) -> String {
  primary
    .chars()
    .enumerate()
    .map(|(i, c)| {
      if i == dim as usize {
        Dimension::complement(c).unwrap_or(c)
      } else {
        c
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn counts(ei: u32, sn: u32, tf: u32, jp: u32) -> DimensionCounts {
    DimensionCounts { ei, sn, tf, jp }
  }

  fn cfg(threshold: u8) -> ScoringConfig {
    ScoringConfig { closeness_threshold: threshold }
  }

  /// A decisive 8-question spread: E 2/2, N 2/2, T 2/2, P 2/2.
  fn decisive_answers() -> Vec<char> {
    vec!['E', 'E', 'N', 'N', 'T', 'T', 'P', 'P']
  }

  #[test]
  fn decisive_spread_yields_expected_type_and_no_alternatives() {
    let r = score_answers(&decisive_answers(), &counts(2, 2, 2, 2), &cfg(20)).expect("scores");
    assert_eq!(r.primary_type, "ENTP");
    assert_eq!(r.scores.extrovert, 100);
    assert_eq!(r.scores.introvert, 0);
    assert_eq!(r.scores.intuitive, 100);
    assert_eq!(r.scores.perceiving, 100);
    assert!(r.alternative_types.is_empty());
  }

  #[test]
  fn rounding_is_half_away_from_zero() {
    // 1/8 = 12.5% rounds up to 13; the complete pair complements to 87.
    let answers = ['E', 'I', 'I', 'I', 'I', 'I', 'I', 'I'];
    let r = score_answers(&answers, &counts(8, 0, 0, 0), &cfg(0)).expect("scores");
    assert_eq!(r.scores.extrovert, 13);
    assert_eq!(r.scores.introvert, 87);
  }

  #[test]
  fn complete_pairs_always_sum_to_100() {
    for e in 0..=10u32 {
      let mut answers: Vec<char> = vec!['E'; e as usize];
      answers.extend(vec!['I'; (10 - e) as usize]);
      let r = score_answers(&answers, &counts(10, 0, 0, 0), &cfg(0)).expect("scores");
      assert_eq!(r.scores.extrovert as u32 + r.scores.introvert as u32, 100, "e={e}");
    }
  }

  #[test]
  fn fifty_fifty_ties_break_to_first_pole_and_offer_the_flip() {
    // Worked scenario: 5xE + 5xI over 10 EI questions.
    let answers = ['E', 'E', 'E', 'E', 'E', 'I', 'I', 'I', 'I', 'I'];
    let r = score_answers(&answers, &counts(10, 0, 0, 0), &cfg(20)).expect("scores");
    assert_eq!(r.scores.extrovert, 50);
    assert_eq!(r.scores.introvert, 50);
    assert!(r.primary_type.starts_with('E'), "tie must pick E, got {}", r.primary_type);
    assert_eq!(r.alternative_types.len(), 1);
    assert!(r.alternative_types[0].starts_with('I'));
  }

  #[test]
  fn full_tie_defaults_to_estj() {
    let answers = ['E', 'I', 'S', 'N', 'T', 'F', 'J', 'P'];
    let r = score_answers(&answers, &counts(2, 2, 2, 2), &cfg(0)).expect("scores");
    assert_eq!(r.primary_type, "ESTJ");
  }

  #[test]
  fn all_intuitive_is_decisive() {
    let answers = vec!['N'; 20];
    let r = score_answers(&answers, &counts(0, 20, 0, 0), &cfg(20)).expect("scores");
    assert_eq!(r.scores.sensory, 0);
    assert_eq!(r.scores.intuitive, 100);
    assert_eq!(r.primary_type.chars().nth(1), Some('N'));
    // diff = 100, nowhere near close; EI/TF/JP are absent, also not close.
    assert!(r.alternative_types.is_empty());
  }

  #[test]
  fn empty_answers_are_rejected() {
    let err = score_answers(&[], &counts(1, 1, 1, 1), &cfg(20)).unwrap_err();
    assert_eq!(err, ScoringError::EmptyAnswers);
  }

  #[test]
  fn zero_denominator_with_tallied_answers_is_rejected() {
    let err = score_answers(&['T'], &counts(0, 0, 0, 0), &cfg(20)).unwrap_err();
    assert_eq!(err, ScoringError::ZeroDenominator { dimension: "TF" });
  }

  #[test]
  fn unknown_letters_are_skipped_not_fatal() {
    let with_stray = ['E', 'X', 'E', '?', 'I', 'x'];
    let without = ['E', 'E', 'I'];
    let a = score_answers(&with_stray, &counts(4, 0, 0, 0), &cfg(0)).expect("scores");
    let b = score_answers(&without, &counts(4, 0, 0, 0), &cfg(0)).expect("scores");
    assert_eq!(a, b);
    // 2/4 and 1/4, independently rounded since one question went astray.
    assert_eq!(a.scores.extrovert, 50);
    assert_eq!(a.scores.introvert, 25);
  }

  #[test]
  fn lowercase_answers_are_normalized() {
    let r = score_answers(&['e', 'n', 't', 'j'], &counts(1, 1, 1, 1), &cfg(0)).expect("scores");
    assert_eq!(r.primary_type, "ENTJ");
  }

  #[test]
  fn scoring_is_idempotent() {
    let answers = decisive_answers();
    let c = counts(2, 2, 2, 2);
    let a = score_answers(&answers, &c, &cfg(20)).expect("scores");
    let b = score_answers(&answers, &c, &cfg(20)).expect("scores");
    assert_eq!(a, b);
  }

  #[test]
  fn alternatives_cap_at_two_in_dimension_order() {
    // Every dimension splits 1/1: four close dimensions, only two offered.
    let answers = ['E', 'I', 'S', 'N', 'T', 'F', 'J', 'P'];
    let r = score_answers(&answers, &counts(2, 2, 2, 2), &cfg(20)).expect("scores");
    assert_eq!(r.primary_type, "ESTJ");
    assert_eq!(r.alternative_types, vec!["ISTJ".to_string(), "ENTJ".to_string()]);
  }

  #[test]
  fn each_alternative_flips_exactly_one_dimension() {
    // EI decisive; SN and TF close; JP decisive.
    let answers = ['E', 'E', 'E', 'E', 'S', 'S', 'N', 'N', 'T', 'T', 'F', 'F', 'J', 'J', 'J', 'J'];
    let r = score_answers(&answers, &counts(4, 4, 4, 4), &cfg(20)).expect("scores");
    assert_eq!(r.primary_type, "ESTJ");
    assert_eq!(r.alternative_types, vec!["ENTJ".to_string(), "ESFJ".to_string()]);
  }

  #[test]
  fn threshold_is_strict_less_than() {
    // 6/4 over 10: 60 vs 40, diff 20. Not close at threshold 20, close at 21.
    let answers = ['E', 'E', 'E', 'E', 'E', 'E', 'I', 'I', 'I', 'I'];
    let at_20 = score_answers(&answers, &counts(10, 0, 0, 0), &cfg(20)).expect("scores");
    assert!(at_20.alternative_types.is_empty());
    let at_21 = score_answers(&answers, &counts(10, 0, 0, 0), &cfg(21)).expect("scores");
    assert_eq!(at_21.alternative_types.len(), 1);
  }

  #[test]
  fn primary_letters_always_belong_to_their_dimension() {
    let answers = ['I', 'N', 'F', 'P', 'I', 'N', 'F', 'P', 'E', 'S'];
    let r = score_answers(&answers, &counts(3, 3, 2, 2), &cfg(20)).expect("scores");
    assert_eq!(r.primary_type.len(), 4);
    for (i, c) in r.primary_type.chars().enumerate() {
      let (dim, _) = Dimension::classify(c).expect("recognized letter");
      assert_eq!(dim as usize, i);
    }
  }
}
