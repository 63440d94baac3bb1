//! Loading grader configuration (prompts + optional example bank) from TOML.
//!
//! See `GraderConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GraderConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub examples: Vec<ExampleCfg>,
}

/// Tutor-corrected example entry accepted in TOML configuration.
/// `score` must be one of 0/25/50/75/100; invalid entries are skipped at load.
#[derive(Clone, Debug, Deserialize)]
pub struct ExampleCfg {
  #[serde(default)] pub id: Option<String>,
  pub question: String,
  pub correct_answer: String,
  pub student_answer: String,
  pub score: u8,
  pub feedback: String,
}

/// Prompts used by the feedback enhancer. Defaults are sensible for IGCSE
/// Mandarin grading. You can override them in TOML if you need to tune tone.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub feedback_system: String,
  pub feedback_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      feedback_system: "You are an encouraging Mandarin tutor for IGCSE students. Rewrite the given feedback so it is warm, specific and short (1-2 sentences). NEVER change, mention or contradict the numeric score. Output ONLY the rewritten feedback text.".into(),
      feedback_user_template: "Question: {question}\nCorrect answer: {correct_answer}\nStudent answer: {student_answer}\nScore: {score}/100\nRule-based feedback: {feedback}\n{examples}Rewrite the feedback.".into(),
    }
  }
}

/// Attempt to load `GraderConfig` from GRADER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_grader_config_from_env() -> Option<GraderConfig> {
  let path = std::env::var("GRADER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GraderConfig>(&s) {
      Ok(cfg) => {
        info!(target: "jiayou_backend", %path, "Loaded grader config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "jiayou_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "jiayou_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
