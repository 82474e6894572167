//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

fn submit_error(e: SubmitError) -> (StatusCode, Json<ErrorOut>) {
  let status = match &e {
    SubmitError::UnknownAssessment(_) | SubmitError::UnknownUser(_) => StatusCode::NOT_FOUND,
    SubmitError::Scoring(_) => StatusCode::BAD_REQUEST,
  };
  (status, Json(ErrorOut { message: e.to_string() }))
}

fn action_error(e: ActionError) -> (StatusCode, Json<ErrorOut>) {
  let status = match &e {
    ActionError::UnknownUser(_) | ActionError::UnknownPage(_) => StatusCode::NOT_FOUND,
    ActionError::EmptyName => StatusCode::BAD_REQUEST,
  };
  (status, Json(ErrorOut { message: e.to_string() }))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(assessment_id = ?q.assessment_id))]
pub async fn http_get_assessment(
  State(state): State<Arc<AppState>>,
  Query(q): Query<AssessmentQuery>,
) -> impl IntoResponse {
  match state.choose_assessment(q.assessment_id.as_deref()).await {
    Some((a, origin)) => {
      info!(target: "assessment", id = %a.id, %origin, questions = a.questions.len(), "HTTP assessment served");
      Json(assessment_out(&a)).into_response()
    }
    None => {
      let id = q.assessment_id.unwrap_or_default();
      (StatusCode::NOT_FOUND, Json(ErrorOut { message: format!("unknown assessment: {id}") }))
        .into_response()
    }
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.user_id, answer_count = body.answers.len()))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitIn>,
) -> impl IntoResponse {
  match submit_assessment(&state, body.assessment_id.as_deref(), &body.user_id, &body.answers).await {
    Ok((record, awarded)) => {
      info!(target: "assessment", user = %body.user_id, primary = %record.primary_type, "HTTP submit scored");
      Json(serde_json::json!({
        "result": result_out(&record),
        "pointsAwarded": awarded.as_ref().map(points_entry_out),
      }))
      .into_response()
    }
    Err(e) => submit_error(e).into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%q.user_id))]
pub async fn http_get_result(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ResultQuery>,
) -> impl IntoResponse {
  match latest_result(&state, &q.user_id).await {
    Ok(Some(record)) => Json(result_out(&record)).into_response(),
    Ok(None) => (
      StatusCode::NOT_FOUND,
      Json(ErrorOut { message: "no active result for this user".into() }),
    )
      .into_response(),
    Err(e) => action_error(e).into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(page_id = ?q.page_id))]
pub async fn http_get_content(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ContentQuery>,
) -> impl IntoResponse {
  match q.page_id {
    Some(id) => match state.get_content(&id).await {
      Some(page) => Json(content_page_out(&page)).into_response(),
      None => (
        StatusCode::NOT_FOUND,
        Json(ErrorOut { message: format!("unknown content page: {id}") }),
      )
        .into_response(),
    },
    None => {
      let pages = list_content(&state).await;
      Json(pages.iter().map(content_summary_out).collect::<Vec<_>>()).into_response()
    }
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.user_id, %body.page_id))]
pub async fn http_post_read_content(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ReadContentIn>,
) -> impl IntoResponse {
  match read_content(&state, &body.user_id, &body.page_id).await {
    Ok((page, awarded)) => Json(serde_json::json!({
      "page": content_page_out(&page),
      "pointsAwarded": awarded.as_ref().map(points_entry_out),
    }))
    .into_response(),
    Err(e) => action_error(e).into_response(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_guest(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let user = create_guest(&state).await;
  Json(serde_json::json!({ "user": user_out(&user), "pointsAwarded": null })).into_response()
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_register(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RegisterIn>,
) -> impl IntoResponse {
  match register_user(&state, &body.name).await {
    Ok((user, awarded)) => Json(serde_json::json!({
      "user": user_out(&user),
      "pointsAwarded": awarded.as_ref().map(points_entry_out),
    }))
    .into_response(),
    Err(e) => action_error(e).into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.user_id))]
pub async fn http_post_login(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LoginIn>,
) -> impl IntoResponse {
  match record_login(&state, &body.user_id).await {
    Ok((user, awarded)) => Json(serde_json::json!({
      "user": user_out(&user),
      "pointsAwarded": awarded.as_ref().map(points_entry_out),
    }))
    .into_response(),
    Err(e) => action_error(e).into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%q.user_id))]
pub async fn http_get_points(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PointsQuery>,
) -> impl IntoResponse {
  match points_summary(&state, &q.user_id).await {
    Ok((total, entries)) => Json(PointsOut {
      user_id: q.user_id.clone(),
      total,
      entries: entries.iter().map(points_entry_out).collect(),
    })
    .into_response(),
    Err(e) => action_error(e).into_response(),
  }
}
