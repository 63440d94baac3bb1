//! Seed data: built-in tutor-corrected examples for the feedback enhancer.

use crate::domain::FewShotExample;

/// Minimal set of built-in examples that make the enhancer useful even
/// without external config. Scores follow the deterministic grader.
pub fn seed_examples() -> Vec<FewShotExample> {
  vec![
    FewShotExample {
      id: "ex001".into(),
      question: "Translate into Chinese: The weather is great today.".into(),
      correct_answer: "今天天气很好。".into(),
      student_answer: "今天天气很好".into(),
      score: 50,
      feedback: "Good work! Your characters are spot on. Add the full stop 。 to finish the sentence.".into(),
    },
    FewShotExample {
      id: "ex002".into(),
      question: "Translate into Chinese: I want to drink coffee.".into(),
      correct_answer: "我想喝咖啡".into(),
      student_answer: "我想喝茶".into(),
      score: 25,
      feedback: "Keep practicing! 我想喝 is right. Check the word for coffee: 咖啡.".into(),
    },
    FewShotExample {
      id: "ex003".into(),
      question: "Translate into Chinese: Have you eaten?".into(),
      correct_answer: "你吃饭了吗？".into(),
      student_answer: "你吃饭了吗？".into(),
      score: 100,
      feedback: "Perfect! Characters and punctuation both match. 加油!".into(),
    },
  ]
}
