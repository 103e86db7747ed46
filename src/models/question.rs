// src/models/question.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One selectable answer of a quiz question, e.g. `("b", "Light into chemical energy")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub key: String,
    pub text: String,
}

/// A multiple-choice question produced by the model.
///
/// Options keep the order in which the model returned them. Built only
/// through `TryFrom<Value>`, which checks the correct key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<AnswerOption>,
    /// Key of the correct option. Always one of `options[..].key`.
    pub correct: String,
}

impl QuizItem {
    /// Looks up the display text of an option key.
    pub fn option_text(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| opt.key == key)
            .map(|opt| opt.text.as_str())
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|opt| opt.key == key)
    }
}

/// Shape of a single element of the `mcqs` array as the model writes it.
#[derive(Debug, Deserialize)]
struct RawQuizItem {
    mcq: String,
    options: Map<String, Value>,
    correct: String,
}

impl TryFrom<Value> for QuizItem {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw: RawQuizItem = serde_json::from_value(value).map_err(|e| e.to_string())?;

        let options: Vec<AnswerOption> = raw
            .options
            .into_iter()
            .map(|(key, text)| AnswerOption {
                key,
                text: match text {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            })
            .collect();

        if options.is_empty() {
            return Err("question has no options".to_string());
        }

        let item = QuizItem {
            question: raw.mcq,
            options,
            correct: raw.correct.trim().to_string(),
        };

        if !item.has_option(&item.correct) {
            return Err(format!(
                "correct key '{}' is not one of the question's options",
                item.correct
            ));
        }

        Ok(item)
    }
}

/// DTO for sending a question to the client (excludes the correct key).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub number: usize,
    pub question: String,
    pub options: Vec<AnswerOption>,
    /// The option key currently recorded for this question, if any.
    pub selected: Option<String>,
}
