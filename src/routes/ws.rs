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
use tracing::{info, error, instrument, debug};

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "jiayou_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "jiayou_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "jiayou_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "jiayou_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "jiayou_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Evaluate { question, correct_answer, student_answer, question_type } => {
      let (Some(correct), Some(student)) = (correct_answer, student_answer) else {
        return ServerWsMessage::Error {
          message: "correctAnswer and studentAnswer are required".into(),
        };
      };
      let result = evaluate_answer(state, &question, &correct, &student, question_type).await;
      tracing::info!(target: "grader", score = result.score, "WS evaluate graded");
      ServerWsMessage::Evaluation { result }
    }

    ClientWsMessage::PinyinInput { text } => {
      let pinyin = do_pinyin(state, &text).await;
      ServerWsMessage::Pinyin { text, pinyin }
    }
  }
}

// Dispatch tests: feed parsed client messages straight into the handler,
// enhancer disabled, and check the single reply per message.
#[cfg(test)]
mod tests {
  use super::*;

  fn offline_state() -> AppState {
    AppState {
      examples: Arc::new(tokio::sync::RwLock::new(vec![])),
      openai: None,
      prompts: Default::default(),
    }
  }

  async fn dispatch(raw: &str, state: &AppState) -> ServerWsMessage {
    match serde_json::from_str::<ClientWsMessage>(raw) {
      Ok(msg) => handle_client_ws(msg, state).await,
      Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
    }
  }

  #[tokio::test]
  async fn ping_gets_pong() {
    let reply = dispatch(r#"{"type":"ping"}"#, &offline_state()).await;
    assert!(matches!(reply, ServerWsMessage::Pong));
  }

  #[tokio::test]
  async fn evaluate_round_trip_grades_the_answer() {
    let raw = r#"{"type":"evaluate","question":"Translate: hello","correctAnswer":"你好","studentAnswer":"你好。","questionType":"free_text"}"#;
    let reply = dispatch(raw, &offline_state()).await;
    match reply {
      ServerWsMessage::Evaluation { result } => {
        assert_eq!(result.score, 75);
        assert!(!result.feedback.is_empty());
      }
      other => panic!("expected evaluation, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn evaluate_without_answers_replies_with_error() {
    let raw = r#"{"type":"evaluate","correctAnswer":"你好"}"#;
    let reply = dispatch(raw, &offline_state()).await;
    match reply {
      ServerWsMessage::Error { message } => assert!(message.contains("studentAnswer")),
      other => panic!("expected error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn pinyin_input_converts_locally() {
    let reply = dispatch(r#"{"type":"pinyin_input","text":"你好"}"#, &offline_state()).await;
    match reply {
      ServerWsMessage::Pinyin { text, pinyin } => {
        assert_eq!(text, "你好");
        assert_eq!(pinyin, "nǐ hǎo");
      }
      other => panic!("expected pinyin, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn invalid_json_replies_with_error() {
    let reply = dispatch("{not json", &offline_state()).await;
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
  }
}
