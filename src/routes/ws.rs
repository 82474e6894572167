//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "persona_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "persona_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target = "persona_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => {
            debug!(target = "persona_backend", payload = %trunc_for_log(&txt, 200), "WS invalid JSON");
            ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "persona_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "persona_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::NewGuest => {
      let user = create_guest(state).await;
      ServerWsMessage::User { user: user_out(&user), points_awarded: None }
    }

    ClientWsMessage::Register { name } => match register_user(state, &name).await {
      Ok((user, awarded)) => ServerWsMessage::User {
        user: user_out(&user),
        points_awarded: awarded.as_ref().map(points_entry_out),
      },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::Login { user_id } => match record_login(state, &user_id).await {
      Ok((user, awarded)) => ServerWsMessage::User {
        user: user_out(&user),
        points_awarded: awarded.as_ref().map(points_entry_out),
      },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::GetAssessment { assessment_id } => {
      match state.choose_assessment(assessment_id.as_deref()).await {
        Some((a, origin)) => {
          tracing::info!(target: "assessment", id = %a.id, %origin, "WS assessment served");
          ServerWsMessage::Assessment { assessment: assessment_out(&a) }
        }
        None => ServerWsMessage::Error {
          message: format!("unknown assessment: {}", assessment_id.unwrap_or_default()),
        },
      }
    }

    ClientWsMessage::SubmitAnswers { assessment_id, user_id, answers } => {
      match submit_assessment(state, assessment_id.as_deref(), &user_id, &answers).await {
        Ok((record, awarded)) => {
          tracing::info!(target: "assessment", user = %user_id, primary = %record.primary_type, "WS submit scored");
          ServerWsMessage::Result {
            result: result_out(&record),
            points_awarded: awarded.as_ref().map(points_entry_out),
          }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::GetResult { user_id } => match latest_result(state, &user_id).await {
      Ok(Some(record)) => {
        ServerWsMessage::Result { result: result_out(&record), points_awarded: None }
      }
      Ok(None) => ServerWsMessage::Error { message: "no active result for this user".into() },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::ListContent => {
      let pages = list_content(state).await;
      ServerWsMessage::ContentList { pages: pages.iter().map(content_summary_out).collect() }
    }

    ClientWsMessage::ReadContent { user_id, page_id } => {
      match read_content(state, &user_id, &page_id).await {
        Ok((page, awarded)) => ServerWsMessage::Content {
          page: content_page_out(&page),
          points_awarded: awarded.as_ref().map(points_entry_out),
        },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::GetPoints { user_id } => match points_summary(state, &user_id).await {
      Ok((total, entries)) => ServerWsMessage::Points {
        summary: PointsOut {
          user_id,
          total,
          entries: entries.iter().map(points_entry_out).collect(),
        },
      },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },
  }
}
