//! Domain models used by the backend: question kinds, evaluation results,
//! feedback provenance, and tutor-corrected few-shot examples.

use serde::{Deserialize, Serialize};

/// What kind of question was the student answering?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  /// Multiple choice: the answer either matches exactly or it doesn't.
  Choice,
  /// Free text in Chinese, graded with partial credit.
  FreeText,
}
impl Default for QuestionKind {
  fn default() -> Self { QuestionKind::FreeText }
}

/// The set of scores the grader can emit.
pub const VALID_SCORES: [u8; 5] = [0, 25, 50, 75, 100];

/// Outcome of one evaluation. Produced fresh per call and never mutated;
/// feedback enhancement builds a new value carrying `score` over unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
  pub score: u8,
  pub feedback: String,
}

impl EvaluationResult {
  pub fn new(score: u8, feedback: impl Into<String>) -> Self {
    Self { score, feedback: feedback.into() }
  }

  /// Replace the feedback text, keeping the score untouched.
  pub fn with_feedback(&self, feedback: String) -> Self {
    Self { score: self.score, feedback }
  }
}

/// Where the feedback text came from. Enhancement failure is a routine
/// outcome, so it is a variant here rather than an error path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
  /// Rewritten by the OpenAI enhancer.
  Enhanced(String),
  /// Canonical rule-based text (enhancer disabled, failed, or timed out).
  RuleBased(String),
}

impl Feedback {
  pub fn into_text(self) -> String {
    match self {
      Feedback::Enhanced(t) | Feedback::RuleBased(t) => t,
    }
  }
}

/// A prior tutor-corrected scoring instance. Supplied to the enhancer as
/// contextual guidance; never consulted by the deterministic grader.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FewShotExample {
  pub id: String,
  pub question: String,
  pub correct_answer: String,
  pub student_answer: String,
  pub score: u8,
  pub feedback: String,
}
