// src/services/presentation.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    exercise::ExerciseItem,
    generation::{Difficulty, Mode, ProgrammingLanguage},
    question::{PublicQuestion, QuizItem},
    score::ScoreReport,
    session::{ContentOrigin, Material, Phase, Session, SourceContent},
};

const NO_EXPLANATION: &str = "No detailed explanation available.";

/// Badge color for a difficulty label as written by the model.
pub fn difficulty_color(label: &str) -> &'static str {
    match label {
        "Easy" => "green",
        "Medium" => "orange",
        "Hard" => "red",
        _ => "blue",
    }
}

#[derive(Debug, Serialize)]
pub struct ContentSummary {
    pub origin: ContentOrigin,
    pub file_name: Option<String>,
    pub words: usize,
}

impl From<&SourceContent> for ContentSummary {
    fn from(content: &SourceContent) -> Self {
        Self {
            origin: content.origin,
            file_name: content.file_name.clone(),
            words: content.word_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizView {
    pub difficulty: Difficulty,
    pub questions: Vec<PublicQuestion>,
}

/// Questions without their correct keys, plus the selections made so far.
pub fn quiz_view(
    difficulty: Difficulty,
    items: &[QuizItem],
    selections: &[Option<String>],
) -> QuizView {
    QuizView {
        difficulty,
        questions: items
            .iter()
            .enumerate()
            .map(|(idx, item)| PublicQuestion {
                number: idx + 1,
                question: item.question.clone(),
                options: item.options.clone(),
                selected: selections.get(idx).cloned().flatten(),
            })
            .collect(),
    }
}

#[derive(Debug, Serialize)]
pub struct ExerciseCard {
    pub number: usize,
    pub problem: String,
    pub difficulty: String,
    pub difficulty_color: &'static str,
    /// `Input: ...` / `Expected Output: ...` block.
    pub example: String,
    pub solution: String,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct ExercisesView {
    pub heading: String,
    pub language: ProgrammingLanguage,
    pub syntax_hint: String,
    pub exercises: Vec<ExerciseCard>,
}

pub fn exercises_view(
    language: ProgrammingLanguage,
    difficulty: Difficulty,
    items: &[ExerciseItem],
) -> ExercisesView {
    let exercises = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let label = item
                .difficulty
                .clone()
                .unwrap_or_else(|| difficulty.label().to_string());

            ExerciseCard {
                number: idx + 1,
                problem: item.problem.clone(),
                difficulty_color: difficulty_color(&label),
                difficulty: label,
                example: format!("Input: {}\nExpected Output: {}", item.input, item.output),
                solution: item.solution.clone(),
                explanation: item
                    .explanation
                    .clone()
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| NO_EXPLANATION.to_string()),
            }
        })
        .collect();

    ExercisesView {
        heading: format!("Generated {} Exercises", difficulty),
        language,
        syntax_hint: language.syntax_hint(),
        exercises,
    }
}

/// Everything the form page needs to render a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
    pub generating: bool,
    pub content: Option<ContentSummary>,
    pub mode: Option<Mode>,
    pub quiz: Option<QuizView>,
    pub exercises: Option<ExercisesView>,
    pub score: Option<ScoreReport>,
}

pub fn session_view(session: &Session) -> SessionView {
    let (quiz, exercises) = match &session.material {
        Some(Material::Quiz { difficulty, items }) => (
            Some(quiz_view(*difficulty, items, &session.selections)),
            None,
        ),
        Some(Material::Exercises {
            language,
            difficulty,
            items,
        }) => (None, Some(exercises_view(*language, *difficulty, items))),
        None => (None, None),
    };

    SessionView {
        id: session.id,
        created_at: session.created_at,
        phase: session.phase,
        generating: session.generating,
        content: session.content.as_ref().map(ContentSummary::from),
        mode: session.material.as_ref().map(Material::mode),
        quiz,
        exercises,
        score: session.score.clone(),
    }
}
