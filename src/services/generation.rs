// src/services/generation.rs

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Value, json};

use crate::{
    models::{
        exercise::ExerciseItem,
        generation::{Difficulty, ProgrammingLanguage},
        question::QuizItem,
    },
    services::{
        cache::MemoCache,
        openai::{CompletionBackend, CompletionRequest, GenerationError},
        prompt::build_prompt,
    },
    utils::hash::content_digest,
};

/// What differs between one kind of generated material and another.
pub trait ContentSchema: Send + Sync {
    type Item: Send;

    /// Top-level array field of the completion document.
    fn field(&self) -> &'static str;

    /// Whether the API is asked to constrain output to a JSON object.
    fn json_mode(&self) -> bool;

    /// One example element of the array, shown to the model as a guide.
    fn example_item(&self) -> Value;

    /// Natural-language task description placed after the source text.
    fn task(&self, count: u8, instructions: &str) -> String;

    /// Parses and validates one array element.
    fn parse_item(&self, raw: Value) -> Result<Self::Item, String>;
}

/// Multiple-choice quiz questions (`mcqs`).
#[derive(Debug, Clone, Copy)]
pub struct QuizSchema {
    pub difficulty: Difficulty,
}

impl ContentSchema for QuizSchema {
    type Item = QuizItem;

    fn field(&self) -> &'static str {
        "mcqs"
    }

    fn json_mode(&self) -> bool {
        false
    }

    fn example_item(&self) -> Value {
        json!({
            "mcq": "multiple choice question",
            "options": {
                "a": "choice here",
                "b": "choice here",
                "c": "choice here",
                "d": "choice here"
            },
            "correct": "correct choice option in the form of a, b, c or d"
        })
    }

    fn task(&self, count: u8, instructions: &str) -> String {
        format!(
            "You are an expert at writing multiple-choice quizzes from provided content.\n\
             Using the text above, create a quiz of {count} multiple choice questions \
             with the difficulty level {level}.\n\
             Follow the user's instructions when creating the quiz: {instructions}\n\
             Do not repeat questions, and check that every question agrees with the text.",
            level = self.difficulty.label().to_lowercase(),
        )
    }

    fn parse_item(&self, raw: Value) -> Result<QuizItem, String> {
        QuizItem::try_from(raw)
    }
}

/// Programming exercises (`exercises`).
#[derive(Debug, Clone, Copy)]
pub struct ExerciseSchema {
    pub language: ProgrammingLanguage,
    pub difficulty: Difficulty,
}

impl ContentSchema for ExerciseSchema {
    type Item = ExerciseItem;

    fn field(&self) -> &'static str {
        "exercises"
    }

    fn json_mode(&self) -> bool {
        true
    }

    fn example_item(&self) -> Value {
        json!({
            "problem": "Description of the programming problem",
            "difficulty": "Easy/Medium/Hard",
            "input": "Example input",
            "output": "Expected output",
            "solution": "Example solution code",
            "explanation": "Detailed explanation of the solution"
        })
    }

    fn task(&self, count: u8, _instructions: &str) -> String {
        format!(
            "You are an expert at writing programming exercises from provided content.\n\
             Using the text above, create {count} coding exercises in {language} \
             with {difficulty} difficulty.\n\
             Every exercise must have:\n\
             - a clear problem statement\n\
             - a matching difficulty level\n\
             - an example input\n\
             - the expected output\n\
             - a correct solution\n\
             - a detailed explanation of the solution approach",
            language = self.language,
            difficulty = self.difficulty,
        )
    }

    fn parse_item(&self, raw: Value) -> Result<ExerciseItem, String> {
        ExerciseItem::try_from(raw)
    }
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n(.*?)\n?\s*```\s*$").expect("valid fence regex")
});

/// Removes a markdown code fence wrapped around the whole completion.
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str(),
        None => text.trim(),
    }
}

/// Parses the completion and returns the elements of `field`.
///
/// * Invalid JSON is an error.
/// * A missing field, or one that is not an array, yields an empty vec.
pub fn extract_array(completion: &str, field: &str) -> Result<Vec<Value>, GenerationError> {
    let mut document: Value = serde_json::from_str(strip_code_fence(completion))?;

    match document.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => {
            tracing::warn!("Completion has no '{}' array", field);
            Ok(Vec::new())
        }
    }
}

/// Parses every element, dropping (and logging) the ones that fail validation.
pub fn parse_items<S: ContentSchema + ?Sized>(schema: &S, raw: Vec<Value>) -> Vec<S::Item> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match schema.parse_item(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Dropping {} item {}: {}", schema.field(), idx + 1, e);
                None
            }
        })
        .collect()
}

/// Turns source content into typed items through the completion backend.
#[derive(Clone)]
pub struct Generator {
    backend: Arc<dyn CompletionBackend>,
    cache: Option<MemoCache<String>>,
}

impl Generator {
    /// `cache` memoizes raw completions; `None` always calls the backend.
    pub fn new(backend: Arc<dyn CompletionBackend>, cache: Option<MemoCache<String>>) -> Self {
        Self { backend, cache }
    }

    /// Runs one generation action. No retries: a failure is returned as-is.
    pub async fn generate<S: ContentSchema>(
        &self,
        schema: &S,
        source_text: &str,
        instructions: &str,
        count: u8,
    ) -> Result<Vec<S::Item>, GenerationError> {
        let request = CompletionRequest {
            prompt: build_prompt(schema, source_text, instructions, count),
            json_mode: schema.json_mode(),
        };

        let key = content_digest(&[
            self.backend.model().as_bytes(),
            &[request.json_mode as u8],
            request.prompt.as_bytes(),
        ]);

        let cached = self.cache.as_ref().and_then(|cache| cache.get(&key));
        let completion = match cached {
            Some(completion) => {
                tracing::debug!("Generation cache hit for {} ({})", schema.field(), &key[..12]);
                completion
            }
            None => self.backend.complete(&request).await?,
        };

        let items = parse_items(schema, extract_array(&completion, schema.field())?);

        if items.len() != count as usize {
            tracing::warn!(
                "Requested {} {} but received {}",
                count,
                schema.field(),
                items.len()
            );
        }

        if let Some(cache) = &self.cache {
            if !items.is_empty() {
                cache.insert(key, completion);
            }
        }

        Ok(items)
    }
}
