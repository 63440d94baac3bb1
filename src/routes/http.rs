//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; logs include parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{FewShotExample, VALID_SCORES};
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(kind = ?body.question_type, question_len = body.question.len()))]
pub async fn http_post_evaluate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EvaluateIn>,
) -> Result<Json<EvaluateOut>, (StatusCode, Json<ErrorOut>)> {
  // Absent answers are a caller-contract violation; empty strings are valid
  // inputs and go through to the grader.
  let (Some(correct), Some(student)) = (body.correct_answer, body.student_answer) else {
    warn!(target: "grader", "Rejecting evaluate request with missing answer field");
    return Err((
      StatusCode::BAD_REQUEST,
      Json(ErrorOut { error: "correctAnswer and studentAnswer are required".into() }),
    ));
  };

  let result =
    evaluate_answer(&state, &body.question, &correct, &student, body.question_type).await;
  info!(target: "grader", score = result.score, "HTTP evaluate graded");
  Ok(Json(EvaluateOut { result }))
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_post_pinyin(
  State(state): State<Arc<AppState>>,
  Json(body): Json<PinyinIn>,
) -> impl IntoResponse {
  let pinyin = do_pinyin(&state, &body.text).await;
  Json(PinyinOut { pinyin })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_examples(
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let examples = state.list_examples().await;
  Json(ExamplesOut { examples })
}

#[instrument(level = "info", skip(state, body), fields(score = body.score))]
pub async fn http_post_example(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ExampleIn>,
) -> Result<Json<FewShotExample>, (StatusCode, Json<ErrorOut>)> {
  if !VALID_SCORES.contains(&body.score) {
    warn!(target: "grader", score = body.score, "Rejecting example with invalid score");
    return Err((
      StatusCode::BAD_REQUEST,
      Json(ErrorOut { error: "score must be one of 0, 25, 50, 75, 100".into() }),
    ));
  }

  let ex = FewShotExample {
    id: Uuid::new_v4().to_string(),
    question: body.question,
    correct_answer: body.correct_answer,
    student_answer: body.student_answer,
    score: body.score,
    feedback: body.feedback,
  };
  state.add_example(ex.clone()).await;
  info!(target: "grader", id = %ex.id, "Tutor example stored");
  Ok(Json(ex))
}
