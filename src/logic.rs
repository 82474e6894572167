//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Validating and scoring answer submissions, persisting the result
//!   - Guest creation and registration (with registration points)
//!   - Daily-login and content-read point flows
//!   - Result and points lookups

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
  Assessment, ContentPage, PointsAction, PointsEntry, ResultRecord, User,
};
use crate::scoring::{score_answers, ScoringError};
use crate::state::AppState;

/// Failures of the submission path. All indicate malformed requests; none
/// are retried.
#[derive(Debug, Error)]
pub enum SubmitError {
  #[error("unknown assessment: {0}")]
  UnknownAssessment(String),
  #[error("unknown user: {0}")]
  UnknownUser(String),
  #[error(transparent)]
  Scoring(#[from] ScoringError),
}

/// Failures of the simpler user/content flows.
#[derive(Debug, Error)]
pub enum ActionError {
  #[error("unknown user: {0}")]
  UnknownUser(String),
  #[error("unknown content page: {0}")]
  UnknownPage(String),
  #[error("display name must not be empty")]
  EmptyName,
}

/// Explicit pre-persistence validation; runs before any entity is built.
/// A count mismatch is tolerated (stray entries are skipped by the engine)
/// but logged, since it usually means a client bug.
fn validate_submission(assessment: &Assessment, answers: &[String]) -> Result<(), SubmitError> {
  if answers.is_empty() {
    return Err(SubmitError::Scoring(ScoringError::EmptyAnswers));
  }
  if answers.len() != assessment.questions.len() {
    warn!(target: "assessment", id = %assessment.id, expected = assessment.questions.len(),
          got = answers.len(), "Answer count differs from question count");
  }
  Ok(())
}

/// Score an ordered answer submission, persist the result (superseding the
/// prior active one), and award test-completion points.
#[instrument(level = "info", skip(state, answers), fields(%user_id, answer_count = answers.len()))]
pub async fn submit_assessment(
  state: &AppState,
  assessment_id: Option<&str>,
  user_id: &str,
  answers: &[String],
) -> Result<(ResultRecord, Option<PointsEntry>), SubmitError> {
  let user = state
    .get_user(user_id)
    .await
    .ok_or_else(|| SubmitError::UnknownUser(user_id.to_string()))?;
  let (assessment, origin) = state
    .choose_assessment(assessment_id)
    .await
    .ok_or_else(|| SubmitError::UnknownAssessment(assessment_id.unwrap_or_default().to_string()))?;

  validate_submission(&assessment, answers)?;

  // First character of each submitted entry; empty entries become an
  // unrecognized placeholder the engine skips.
  let letters: Vec<char> = answers.iter().map(|s| s.chars().next().unwrap_or('?')).collect();
  let counts = assessment.dimension_counts();
  let outcome = score_answers(&letters, &counts, &state.scoring)?;

  let record = ResultRecord {
    id: Uuid::new_v4().to_string(),
    user_id: user.id.clone(),
    assessment_id: assessment.id.clone(),
    scores: outcome.scores,
    primary_type: outcome.primary_type,
    alternative_types: outcome.alternative_types,
    active: true,
    created_at: Utc::now(),
  };
  state.record_result(record.clone()).await;

  let awarded = state
    .award_points(
      &user.id,
      PointsAction::TestCompletion,
      state.points.test_completion,
      Some(assessment.id.clone()),
    )
    .await;

  info!(target: "assessment", user = %user.id, assessment = %assessment.id, %origin,
        primary = %record.primary_type, alternatives = record.alternative_types.len(),
        "Submission scored");
  Ok((record, awarded))
}

#[instrument(level = "info", skip(state))]
pub async fn create_guest(state: &AppState) -> User {
  state.create_guest().await
}

/// Register a named user and award registration points (once).
#[instrument(level = "info", skip(state, name))]
pub async fn register_user(
  state: &AppState,
  name: &str,
) -> Result<(User, Option<PointsEntry>), ActionError> {
  let name = name.trim();
  if name.is_empty() {
    return Err(ActionError::EmptyName);
  }
  let user = state.create_registered(name).await;
  let awarded = state
    .award_points(&user.id, PointsAction::Registration, state.points.registration, None)
    .await;
  Ok((user, awarded))
}

/// Record a login and award daily-login points (once per UTC day).
#[instrument(level = "info", skip(state), fields(%user_id))]
pub async fn record_login(
  state: &AppState,
  user_id: &str,
) -> Result<(User, Option<PointsEntry>), ActionError> {
  let user = state
    .get_user(user_id)
    .await
    .ok_or_else(|| ActionError::UnknownUser(user_id.to_string()))?;
  let awarded = state
    .award_points(&user.id, PointsAction::DailyLogin, state.points.daily_login, None)
    .await;
  Ok((user, awarded))
}

/// Serve a content page and award content-read points (once per page).
#[instrument(level = "info", skip(state), fields(%user_id, %page_id))]
pub async fn read_content(
  state: &AppState,
  user_id: &str,
  page_id: &str,
) -> Result<(ContentPage, Option<PointsEntry>), ActionError> {
  let user = state
    .get_user(user_id)
    .await
    .ok_or_else(|| ActionError::UnknownUser(user_id.to_string()))?;
  let page = state
    .get_content(page_id)
    .await
    .ok_or_else(|| ActionError::UnknownPage(page_id.to_string()))?;
  let awarded = state
    .award_points(&user.id, PointsAction::ContentRead, state.points.content_read, Some(page.id.clone()))
    .await;
  Ok((page, awarded))
}

#[instrument(level = "debug", skip(state))]
pub async fn list_content(state: &AppState) -> Vec<ContentPage> {
  state.list_content().await
}

/// The user's most recent active result, if any.
#[instrument(level = "info", skip(state), fields(%user_id))]
pub async fn latest_result(
  state: &AppState,
  user_id: &str,
) -> Result<Option<ResultRecord>, ActionError> {
  if state.get_user(user_id).await.is_none() {
    return Err(ActionError::UnknownUser(user_id.to_string()));
  }
  Ok(state.latest_active_result(user_id).await)
}

#[instrument(level = "info", skip(state), fields(%user_id))]
pub async fn points_summary(
  state: &AppState,
  user_id: &str,
) -> Result<(u32, Vec<PointsEntry>), ActionError> {
  if state.get_user(user_id).await.is_none() {
    return Err(ActionError::UnknownUser(user_id.to_string()));
  }
  Ok(state.points_summary(user_id).await)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seed_answers(ei: char, sn: char, tf: char, jp: char) -> Vec<String> {
    let mut out = Vec::with_capacity(20);
    for c in [ei, sn, tf, jp] {
      out.extend(std::iter::repeat(c.to_string()).take(5));
    }
    out
  }

  #[tokio::test]
  async fn submit_over_seed_assessment_scores_and_awards_points() {
    let state = AppState::new();
    let user = state.create_guest().await;

    let (record, awarded) =
      submit_assessment(&state, None, &user.id, &seed_answers('E', 'N', 'T', 'J'))
        .await
        .expect("submit");

    assert_eq!(record.primary_type, "ENTJ");
    assert_eq!(record.scores.extrovert, 100);
    assert_eq!(record.scores.intuitive, 100);
    assert!(record.alternative_types.is_empty());
    assert_eq!(awarded.expect("points").points, state.points.test_completion);

    let latest = latest_result(&state, &user.id).await.expect("user").expect("result");
    assert_eq!(latest.id, record.id);
  }

  #[tokio::test]
  async fn resubmission_supersedes_and_still_awards_points() {
    let state = AppState::new();
    let user = state.create_guest().await;

    submit_assessment(&state, None, &user.id, &seed_answers('E', 'N', 'T', 'J'))
      .await
      .expect("first submit");
    let (second, awarded) =
      submit_assessment(&state, None, &user.id, &seed_answers('I', 'S', 'F', 'P'))
        .await
        .expect("second submit");

    assert_eq!(second.primary_type, "ISFP");
    assert!(awarded.is_some(), "test completion points repeat");

    let latest = latest_result(&state, &user.id).await.expect("user").expect("result");
    assert_eq!(latest.primary_type, "ISFP");
  }

  #[tokio::test]
  async fn submit_for_unknown_user_fails() {
    let state = AppState::new();
    let err = submit_assessment(&state, None, "ghost", &seed_answers('E', 'N', 'T', 'J'))
      .await
      .unwrap_err();
    assert!(matches!(err, SubmitError::UnknownUser(_)));
  }

  #[tokio::test]
  async fn submit_with_no_answers_fails_before_persisting() {
    let state = AppState::new();
    let user = state.create_guest().await;
    let err = submit_assessment(&state, None, &user.id, &[]).await.unwrap_err();
    assert!(matches!(err, SubmitError::Scoring(ScoringError::EmptyAnswers)));
    assert!(state.latest_active_result(&user.id).await.is_none());
  }

  #[tokio::test]
  async fn registration_awards_points_and_rejects_blank_names() {
    let state = AppState::new();
    let (user, awarded) = register_user(&state, "ada").await.expect("register");
    assert_eq!(user.name, "ada");
    assert_eq!(awarded.expect("points").points, state.points.registration);

    assert!(matches!(register_user(&state, "   ").await, Err(ActionError::EmptyName)));
  }

  #[tokio::test]
  async fn reading_a_seed_page_awards_points_once() {
    let state = AppState::new();
    let user = state.create_guest().await;

    let (page, first) = read_content(&state, &user.id, "p101").await.expect("read");
    assert_eq!(page.type_code.as_deref(), Some("INTJ"));
    assert!(first.is_some());

    let (_, second) = read_content(&state, &user.id, "p101").await.expect("re-read");
    assert!(second.is_none());
  }

  #[tokio::test]
  async fn login_awards_daily_points_once() {
    let state = AppState::new();
    let user = state.create_guest().await;

    let (_, first) = record_login(&state, &user.id).await.expect("login");
    assert!(first.is_some());
    let (_, second) = record_login(&state, &user.id).await.expect("login");
    assert!(second.is_none());
  }
}
