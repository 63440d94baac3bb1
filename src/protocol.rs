//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{EvaluationResult, FewShotExample, QuestionKind};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Evaluate {
        #[serde(default)]
        question: String,
        #[serde(rename = "correctAnswer")]
        correct_answer: Option<String>,
        #[serde(rename = "studentAnswer")]
        student_answer: Option<String>,
        #[serde(default, rename = "questionType")]
        question_type: QuestionKind,
    },
    PinyinInput {
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Evaluation {
        result: EvaluationResult,
    },
    Pinyin {
        text: String,
        pinyin: String,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

/// Evaluation request. `question` is context for the feedback enhancer only;
/// it never influences the score. The two answers are required on the wire
/// (absent is a client error) but may legitimately be empty strings.
#[derive(Debug, Deserialize)]
pub struct EvaluateIn {
    #[serde(default)]
    pub question: String,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<String>,
    #[serde(rename = "studentAnswer")]
    pub student_answer: Option<String>,
    #[serde(default, rename = "questionType")]
    pub question_type: QuestionKind,
}
#[derive(Serialize)]
pub struct EvaluateOut {
    pub result: EvaluationResult,
}

#[derive(Deserialize)]
pub struct PinyinIn {
    pub text: String,
}
#[derive(Serialize)]
pub struct PinyinOut {
    pub pinyin: String,
}

/// Tutor-corrected example submission.
#[derive(Debug, Deserialize)]
pub struct ExampleIn {
    pub question: String,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    #[serde(rename = "studentAnswer")]
    pub student_answer: String,
    pub score: u8,
    pub feedback: String,
}
#[derive(Serialize)]
pub struct ExamplesOut {
    pub examples: Vec<FewShotExample>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
