//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Grading answers (deterministic, via `scoring::evaluate`)
//!   - Best-effort feedback enhancement (timeout + one retry, silent fallback)
//!   - The local pinyin helper

use std::time::Duration;

use tracing::{debug, error, instrument};

use crate::domain::{EvaluationResult, Feedback, QuestionKind};
use crate::pinyin::to_pinyin_diacritics;
use crate::scoring;
use crate::state::AppState;
use crate::util::trunc_for_log;

/// Per-attempt budget for the enhancement call. The reqwest client has its
/// own transport timeout; this bounds the whole attempt.
const ENHANCE_TIMEOUT: Duration = Duration::from_secs(8);

/// Grade an answer, then try to polish the feedback text. The score comes
/// from the deterministic grader alone; enhancement can only change wording.
#[instrument(level = "info", skip_all,
             fields(kind = ?kind, answer_len = student_answer.len()))]
pub async fn evaluate_answer(
  state: &AppState,
  question: &str,
  correct_answer: &str,
  student_answer: &str,
  kind: QuestionKind,
) -> EvaluationResult {
  let base = scoring::evaluate(correct_answer, student_answer, kind);
  let feedback =
    enhance_feedback(state, question, correct_answer, student_answer, &base).await;
  base.with_feedback(feedback.into_text())
}

/// Ask OpenAI to rewrite the rule-based feedback. Failure here is routine
/// (no key, timeout, quota, bad payload), so the outcome is a value, not an
/// error: we always come back with usable text.
#[instrument(level = "info", skip_all, fields(score = base.score))]
async fn enhance_feedback(
  state: &AppState,
  question: &str,
  correct_answer: &str,
  student_answer: &str,
  base: &EvaluationResult,
) -> Feedback {
  let Some(oa) = &state.openai else {
    return Feedback::RuleBased(base.feedback.clone());
  };

  let examples = state.sample_examples().await;

  // First attempt on the fast model, one retry on the strong model.
  for model in [oa.fast_model.clone(), oa.strong_model.clone()] {
    let call = oa.enhance_feedback(
      &model,
      &state.prompts,
      question,
      correct_answer,
      student_answer,
      base.score,
      &base.feedback,
      &examples,
    );
    match tokio::time::timeout(ENHANCE_TIMEOUT, call).await {
      Ok(Ok(text)) => {
        debug!(target: "grader", %model, preview = %trunc_for_log(&text, 120), "Feedback enhanced");
        return Feedback::Enhanced(text);
      }
      Ok(Err(e)) => {
        error!(target: "grader", %model, error = %e, "Feedback enhancement failed; will fall back.");
      }
      Err(_) => {
        error!(target: "grader", %model, timeout = ?ENHANCE_TIMEOUT, "Feedback enhancement timed out; will fall back.");
      }
    }
  }

  Feedback::RuleBased(base.feedback.clone())
}

#[instrument(level = "info", skip(_state, text), fields(text_len = text.len()))]
pub async fn do_pinyin(_state: &AppState, text: &str) -> String {
  let p = to_pinyin_diacritics(text);
  debug!(target: "jiayou_backend", text, p, "pinyin conversion.");
  p
}

#[cfg(test)]
mod tests {
  use super::*;

  fn offline_state() -> AppState {
    use std::sync::Arc;
    AppState {
      examples: Arc::new(tokio::sync::RwLock::new(vec![])),
      openai: None,
      prompts: Default::default(),
    }
  }

  // With the enhancer disabled the result must be exactly the rule-based
  // one, and repeat calls must be bit-identical.
  #[tokio::test]
  async fn fallback_keeps_score_and_feedback_stable() {
    let state = offline_state();
    let a = evaluate_answer(&state, "q", "你好", "你好。", QuestionKind::FreeText).await;
    let b = evaluate_answer(&state, "q", "你好", "你好。", QuestionKind::FreeText).await;
    assert_eq!(a.score, 75);
    assert_eq!(a, b);
  }

  #[tokio::test]
  async fn choice_mode_passes_through() {
    let state = offline_state();
    let r = evaluate_answer(&state, "q", "A", "a", QuestionKind::Choice).await;
    assert_eq!(r.score, 0);
  }
}
