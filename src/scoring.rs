//! Deterministic answer grading.
//!
//! Flow:
//! 1) Trim both answers; exact equality wins immediately.
//! 2) Classify every char as ideograph / punctuation / other.
//! 3) Compare the extracted ideograph sequences, then the punctuation lists.
//! 4) Emit one of {0, 25, 50, 75, 100} plus a canonical feedback line.
//!
//! The function is pure and total: any pair of strings (including empty ones)
//! produces a result, never a panic. Overlap checks are set-membership tests,
//! not alignment or edit distance.
//!
//! Known quirk kept for compatibility: answers with zero ideographs extract
//! to empty ideograph strings, which compare equal, so non-Chinese input is
//! routed through the "characters match" branches. Callers should not rely on
//! graduated scores for non-Chinese content.

use crate::domain::{EvaluationResult, QuestionKind};

/// Classification of a single character for grading purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
  /// CJK Unified Ideograph, U+4E00..=U+9FFF.
  Ideograph,
  /// One of the recognized CJK or ASCII punctuation marks.
  Punctuation,
  /// Anything else (spaces, Latin letters, digits). Ignored by grading.
  Other,
}

/// Punctuation recognized by the grader: common CJK marks plus their ASCII
/// counterparts. Everything outside this set and the ideograph range is
/// ignored.
const PUNCTUATION: [char; 32] = [
  '，', '。', '！', '？', '；', '：', '、',
  '“', '”', '‘', '’', '（', '）', '【', '】', '《', '》',
  ',', '.', '!', '?', ';', ':', '-', '"', '\'', '(', ')', '[', ']', '{', '}',
];

pub fn classify(ch: char) -> CharClass {
  if ('\u{4E00}'..='\u{9FFF}').contains(&ch) {
    CharClass::Ideograph
  } else if PUNCTUATION.contains(&ch) {
    CharClass::Punctuation
  } else {
    CharClass::Other
  }
}

/// All ideographs of `s`, concatenated in original order.
fn extract_ideographs(s: &str) -> String {
  s.chars().filter(|c| classify(*c) == CharClass::Ideograph).collect()
}

/// All recognized punctuation of `s`, in original order.
fn extract_punctuation(s: &str) -> Vec<char> {
  s.chars().filter(|c| classify(*c) == CharClass::Punctuation).collect()
}

// Canonical feedback lines. Wording is product-facing and may be localized,
// but the score-to-tone mapping is fixed:
// 100 perfect, 75 excellent, 50 good, 25 needs work, 0 incorrect.
const MSG_CHOICE_CORRECT: &str = "Correct! Well done.";
const MSG_CHOICE_WRONG: &str =
  "Incorrect. Compare your choice with the correct answer and try again.";
const MSG_EXACT: &str = "Perfect! Your answer is exactly right.";
const MSG_EXTRA_PUNCT: &str =
  "Excellent! All characters are correct. Remove the extra punctuation for a perfect answer.";
const MSG_PARTIAL_PUNCT: &str =
  "Excellent! Characters and some punctuation are correct. Match the punctuation exactly for full marks.";
const MSG_WRONG_PUNCT: &str =
  "Good work! The characters are right, but the punctuation needs to match the correct answer.";
const MSG_PARTIAL: &str =
  "Keep practicing! Part of your answer is correct. Review the correct answer and try again.";
const MSG_INCORRECT: &str = "Incorrect. Review the correct answer carefully and try again.";

/// Grade `student` against `correct`. Pure; deterministic; never fails.
pub fn evaluate(correct: &str, student: &str, kind: QuestionKind) -> EvaluationResult {
  let correct = correct.trim();
  let student = student.trim();

  if let QuestionKind::Choice = kind {
    // Binary mode: exact match or nothing. Case and ordering both count.
    return if correct == student {
      EvaluationResult::new(100, MSG_CHOICE_CORRECT)
    } else {
      EvaluationResult::new(0, MSG_CHOICE_WRONG)
    };
  }

  if correct == student {
    return EvaluationResult::new(100, MSG_EXACT);
  }

  let correct_ideo = extract_ideographs(correct);
  let student_ideo = extract_ideographs(student);
  let correct_punct = extract_punctuation(correct);
  let student_punct = extract_punctuation(student);

  if correct_ideo == student_ideo {
    if correct_punct.is_empty() {
      // Equal ideographs, no punctuation expected. With the student's
      // punctuation also empty we could only get here with non-ideograph
      // noise differences; grade as exact.
      if student_punct.is_empty() {
        return EvaluationResult::new(100, MSG_EXACT);
      }
      return EvaluationResult::new(75, MSG_EXTRA_PUNCT);
    }
    // Existence check over the student's punctuation, not positional.
    let shared = correct_punct.iter().any(|p| student_punct.contains(p));
    return if shared {
      EvaluationResult::new(75, MSG_PARTIAL_PUNCT)
    } else {
      EvaluationResult::new(50, MSG_WRONG_PUNCT)
    };
  }

  let overlap = !correct_ideo.is_empty()
    && !student_ideo.is_empty()
    && correct_ideo.chars().any(|c| student_ideo.contains(c));

  if overlap {
    EvaluationResult::new(25, MSG_PARTIAL)
  } else {
    EvaluationResult::new(0, MSG_INCORRECT)
  }
}
