// src/models/score.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Outcome of one question after the quiz is submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub number: usize,
    pub question: String,
    /// `None` when the user never picked an answer.
    pub selected_key: Option<String>,
    pub selected_text: Option<String>,
    pub correct_key: String,
    pub correct_text: Option<String>,
    pub is_correct: bool,
}

/// Result of scoring a submitted quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub correct: usize,
    pub total: usize,
    /// `correct / total * 100`, rounded to one decimal place.
    pub percentage: f64,
    pub results: Vec<QuestionResult>,
}

/// DTO for recording an answer selection.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectAnswerRequest {
    /// Option key, e.g. "b".
    #[validate(length(min = 1, max = 16))]
    pub option: String,
}
