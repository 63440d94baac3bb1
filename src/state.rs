//! Application state: the example bank, prompts, and optional OpenAI client.
//!
//! This module owns:
//!   - the tutor-corrected example bank (seeds + TOML bank + runtime adds)
//!   - the prompts struct (from TOML or defaults)
//!   - optional OpenAI client
//!
//! The deterministic grader itself is stateless; nothing here feeds into
//! scoring, only into the feedback-enhancement prompt.

use std::sync::Arc;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::config::{load_grader_config_from_env, Prompts};
use crate::domain::{FewShotExample, VALID_SCORES};
use crate::openai::OpenAI;
use crate::seeds::seed_examples;
use uuid::Uuid;

/// How many examples we hand to the enhancer per call.
pub const EXAMPLES_PER_PROMPT: usize = 3;

#[derive(Clone)]
pub struct AppState {
    pub examples: Arc<RwLock<Vec<FewShotExample>>>,
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, seed the example bank, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        // Load TOML config if provided (prompts + optional example bank).
        let cfg_opt = load_grader_config_from_env();
        let prompts = cfg_opt
            .as_ref()
            .map(|c| c.prompts.clone())
            .unwrap_or_default();

        let mut bank: Vec<FewShotExample> = Vec::new();

        // Insert config-based examples (if any), validating the score set.
        if let Some(cfg) = &cfg_opt {
            for ec in &cfg.examples {
                if !VALID_SCORES.contains(&ec.score) {
                    error!(target: "grader", score = ec.score, question = %ec.question, "Skipping bank example: score not in 0/25/50/75/100.");
                    continue;
                }
                bank.push(FewShotExample {
                    id: ec.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
                    question: ec.question.clone(),
                    correct_answer: ec.correct_answer.clone(),
                    student_answer: ec.student_answer.clone(),
                    score: ec.score,
                    feedback: ec.feedback.clone(),
                });
            }
        }

        let from_config = bank.len();
        bank.extend(seed_examples());
        info!(target: "grader", config_examples = from_config, seed_examples = bank.len() - from_config, "Startup example inventory");

        // Build optional OpenAI client (if API key present).
        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "jiayou_backend", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "OpenAI feedback enhancement enabled.");
        } else {
            info!(target: "jiayou_backend", "OpenAI disabled (no OPENAI_API_KEY). Serving rule-based feedback.");
        }

        Self {
            examples: Arc::new(RwLock::new(bank)),
            openai,
            prompts,
        }
    }

    /// Append a tutor-corrected example to the bank (in-memory only).
    #[instrument(level = "debug", skip(self, ex), fields(id = %ex.id))]
    pub async fn add_example(&self, ex: FewShotExample) {
        let mut bank = self.examples.write().await;
        bank.push(ex);
    }

    /// Snapshot of the whole bank, for the listing endpoint.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_examples(&self) -> Vec<FewShotExample> {
        self.examples.read().await.clone()
    }

    /// Up to `EXAMPLES_PER_PROMPT` randomly chosen examples for the enhancer.
    #[instrument(level = "debug", skip(self))]
    pub async fn sample_examples(&self) -> Vec<FewShotExample> {
        let bank = self.examples.read().await;
        let mut rng = rand::thread_rng();
        bank.choose_multiple(&mut rng, EXAMPLES_PER_PROMPT)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(id: &str) -> FewShotExample {
        FewShotExample {
            id: id.into(),
            question: "q".into(),
            correct_answer: "你好".into(),
            student_answer: "你好。".into(),
            score: 75,
            feedback: "f".into(),
        }
    }

    #[tokio::test]
    async fn add_and_list_examples() {
        let state = AppState::new();
        let before = state.list_examples().await.len();
        state.add_example(example("t1")).await;
        let bank = state.list_examples().await;
        assert_eq!(bank.len(), before + 1);
        assert!(bank.iter().any(|e| e.id == "t1"));
    }

    #[tokio::test]
    async fn sampling_is_bounded() {
        let state = AppState::new();
        for i in 0..10 {
            state.add_example(example(&format!("s{i}"))).await;
        }
        let sample = state.sample_examples().await;
        assert!(sample.len() <= EXAMPLES_PER_PROMPT);
        assert!(!sample.is_empty());
    }
}
