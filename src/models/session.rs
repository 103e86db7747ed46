// src/models/session.rs

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        exercise::ExerciseItem,
        generation::{Difficulty, Mode, ProgrammingLanguage},
        question::QuizItem,
        score::ScoreReport,
    },
    services::scoring,
};

/// Where the current source content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentOrigin {
    Pdf,
    Text,
}

/// The text used as grounding for generation. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceContent {
    pub text: String,
    pub origin: ContentOrigin,
    pub file_name: Option<String>,
}

impl SourceContent {
    pub fn from_pdf(text: String, file_name: Option<String>) -> Self {
        Self {
            text,
            origin: ContentOrigin::Pdf,
            file_name,
        }
    }

    pub fn from_text(text: String) -> Self {
        Self {
            text,
            origin: ContentOrigin::Text,
            file_name: None,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Generated,
    Scored,
}

/// Items produced by one generation action.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Quiz {
        difficulty: Difficulty,
        items: Vec<QuizItem>,
    },
    Exercises {
        language: ProgrammingLanguage,
        difficulty: Difficulty,
        items: Vec<ExerciseItem>,
    },
}

impl Material {
    pub fn mode(&self) -> Mode {
        match self {
            Material::Quiz { .. } => Mode::Quiz,
            Material::Exercises { .. } => Mode::Exercises,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Material::Quiz { items, .. } => items.len(),
            Material::Exercises { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const STALE_GENERATION: &str =
    "The session changed while generating; the result was discarded. Please generate again.";

/// Handed out by [`Session::begin_generation`] and required to apply the result.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub epoch: u64,
    pub content: SourceContent,
}

/// State of one user's interaction with the application.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub content: Option<SourceContent>,
    pub phase: Phase,
    pub material: Option<Material>,
    /// One slot per quiz item, `None` until the user picks an option.
    pub selections: Vec<Option<String>>,
    pub score: Option<ScoreReport>,
    /// Set while a generation request for this session is in flight.
    pub generating: bool,
    /// Bumped whenever an in-flight generation must no longer apply.
    epoch: u64,
    pub last_active: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            content: None,
            phase: Phase::Idle,
            material: None,
            selections: Vec::new(),
            score: None,
            generating: false,
            epoch: 0,
            last_active: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Replaces the source content. Any generated material belongs to the old
    /// content, so the session falls back to Idle and an in-flight generation
    /// is abandoned.
    pub fn set_content(&mut self, content: SourceContent) {
        self.content = Some(content);
        self.abandon_generation();
        if self.material.is_some() {
            self.clear_material();
        }
    }

    /// Marks a generation as in flight and returns a snapshot of the content.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, AppError> {
        if self.generating {
            return Err(AppError::Conflict(
                "A generation request is already running for this session".to_string(),
            ));
        }

        let content = self
            .content
            .clone()
            .filter(|c| !c.text.trim().is_empty())
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Please upload a PDF or enter text content to generate learning material."
                        .to_string(),
                )
            })?;

        self.epoch += 1;
        self.generating = true;
        Ok(GenerationTicket {
            epoch: self.epoch,
            content,
        })
    }

    /// Idle -> Generated (or Generated/Scored -> Generated for a new round).
    ///
    /// Rejected when the content was replaced or the session reset after the
    /// ticket was issued.
    pub fn complete_generation(&mut self, epoch: u64, material: Material) -> Result<(), AppError> {
        self.check_ticket(epoch)?;
        self.generating = false;
        self.selections = match &material {
            Material::Quiz { items, .. } => vec![None; items.len()],
            Material::Exercises { .. } => Vec::new(),
        };
        self.material = Some(material);
        self.score = None;
        self.phase = Phase::Generated;
        Ok(())
    }

    /// A failed generation leaves the session Idle so the user may retry.
    pub fn fail_generation(&mut self, epoch: u64) -> Result<(), AppError> {
        self.check_ticket(epoch)?;
        self.generating = false;
        self.clear_material();
        Ok(())
    }

    /// Records the option picked for question `index`. Last write wins.
    pub fn select(&mut self, index: usize, option: &str) -> Result<(), AppError> {
        let items = self.quiz_items()?;

        if self.phase == Phase::Scored {
            return Err(AppError::Conflict(
                "Quiz already submitted; start a new round to answer again".to_string(),
            ));
        }

        let item = items
            .get(index)
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", index + 1)))?;

        if !item.has_option(option) {
            return Err(AppError::BadRequest(format!(
                "'{}' is not an option of question {}",
                option,
                index + 1
            )));
        }

        self.selections[index] = Some(option.to_string());
        Ok(())
    }

    /// Generated -> Scored. Submitting again recomputes the same report.
    pub fn submit(&mut self) -> Result<&ScoreReport, AppError> {
        let report = scoring::score(self.quiz_items()?, &self.selections);
        self.phase = Phase::Scored;
        let report = &*self.score.insert(report);
        Ok(report)
    }

    /// Any phase -> Idle. The source content is kept for the next round.
    pub fn reset(&mut self) {
        self.abandon_generation();
        self.clear_material();
    }

    fn check_ticket(&self, epoch: u64) -> Result<(), AppError> {
        if self.generating && self.epoch == epoch {
            Ok(())
        } else {
            Err(AppError::Conflict(STALE_GENERATION.to_string()))
        }
    }

    fn abandon_generation(&mut self) {
        if self.generating {
            self.epoch += 1;
            self.generating = false;
        }
    }

    fn quiz_items(&self) -> Result<&[QuizItem], AppError> {
        match &self.material {
            Some(Material::Quiz { items, .. }) => Ok(items),
            Some(Material::Exercises { .. }) => Err(AppError::Conflict(
                "Exercises are not scored".to_string(),
            )),
            None => Err(AppError::Conflict(
                "No quiz has been generated yet".to_string(),
            )),
        }
    }

    fn clear_material(&mut self) {
        self.material = None;
        self.selections.clear();
        self.score = None;
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerOption;

    fn question(correct: &str) -> QuizItem {
        QuizItem {
            question: "Which?".to_string(),
            options: ["a", "b", "c", "d"]
                .iter()
                .map(|k| AnswerOption {
                    key: k.to_string(),
                    text: format!("option {}", k),
                })
                .collect(),
            correct: correct.to_string(),
        }
    }

    fn generated_session(items: Vec<QuizItem>) -> Session {
        let mut session = Session::new();
        session.set_content(SourceContent::from_text("some text".to_string()));
        let ticket = session.begin_generation().unwrap();
        session
            .complete_generation(
                ticket.epoch,
                Material::Quiz {
                    difficulty: Difficulty::Easy,
                    items,
                },
            )
            .unwrap();
        session
    }

    #[test]
    fn generation_requires_content() {
        let mut session = Session::new();
        assert!(matches!(session.begin_generation(), Err(AppError::BadRequest(_))));

        session.set_content(SourceContent::from_text("   \n".to_string()));
        assert!(matches!(session.begin_generation(), Err(AppError::BadRequest(_))));
        assert!(!session.generating);
    }

    #[test]
    fn only_one_generation_in_flight() {
        let mut session = Session::new();
        session.set_content(SourceContent::from_text("text".to_string()));
        let ticket = session.begin_generation().unwrap();
        assert!(matches!(session.begin_generation(), Err(AppError::Conflict(_))));

        session.fail_generation(ticket.epoch).unwrap();
        assert!(session.begin_generation().is_ok());
    }

    #[test]
    fn generation_initializes_one_empty_slot_per_question() {
        let session = generated_session(vec![question("a"), question("b"), question("c")]);
        assert_eq!(session.phase, Phase::Generated);
        assert_eq!(session.selections, vec![None, None, None]);
    }

    #[test]
    fn last_selection_wins() {
        let mut session = generated_session(vec![question("c")]);
        session.select(0, "b").unwrap();
        session.select(0, "c").unwrap();
        assert_eq!(session.selections, vec![Some("c".to_string())]);
    }

    #[test]
    fn selection_validates_index_and_key() {
        let mut session = generated_session(vec![question("a")]);
        assert!(matches!(session.select(1, "a"), Err(AppError::NotFound(_))));
        assert!(matches!(session.select(0, "z"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn submit_scores_and_blocks_further_selection_until_reset() {
        let mut session = generated_session(vec![question("a"), question("b")]);
        session.select(0, "a").unwrap();

        let report = session.submit().unwrap().clone();
        assert_eq!(report.correct, 1);
        assert_eq!(report.total, 2);
        assert_eq!(session.phase, Phase::Scored);
        assert!(matches!(session.select(1, "b"), Err(AppError::Conflict(_))));

        session.reset();
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.material.is_none());
        assert!(session.score.is_none());
        assert!(session.content.is_some());
    }

    #[test]
    fn failed_generation_returns_to_idle() {
        let mut session = generated_session(vec![question("a")]);
        let ticket = session.begin_generation().unwrap();
        session.fail_generation(ticket.epoch).unwrap();
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.material.is_none());
        assert!(!session.generating);
    }

    #[test]
    fn new_content_discards_material() {
        let mut session = generated_session(vec![question("a")]);
        session.set_content(SourceContent::from_pdf("pdf".to_string(), Some("a.pdf".into())));
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.material.is_none());
    }

    #[test]
    fn exercises_cannot_be_submitted() {
        let mut session = Session::new();
        session.set_content(SourceContent::from_text("loops".to_string()));
        let ticket = session.begin_generation().unwrap();
        session
            .complete_generation(
                ticket.epoch,
                Material::Exercises {
                    language: ProgrammingLanguage::Python,
                    difficulty: Difficulty::Medium,
                    items: Vec::new(),
                },
            )
            .unwrap();
        assert!(matches!(session.submit(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn new_content_abandons_in_flight_generation() {
        let mut session = Session::new();
        session.set_content(SourceContent::from_text("Photosynthesis converts light.".into()));
        let ticket = session.begin_generation().unwrap();

        session.set_content(SourceContent::from_text("The French Revolution began in 1789.".into()));
        assert!(!session.generating);

        let stale = session.complete_generation(
            ticket.epoch,
            Material::Quiz {
                difficulty: Difficulty::Easy,
                items: vec![question("a")],
            },
        );
        assert!(matches!(stale, Err(AppError::Conflict(_))));
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.material.is_none());
    }

    #[test]
    fn reset_abandons_in_flight_generation_and_allows_retry() {
        let mut session = Session::new();
        session.set_content(SourceContent::from_text("text".to_string()));
        let first = session.begin_generation().unwrap();

        session.reset();
        assert!(matches!(session.fail_generation(first.epoch), Err(AppError::Conflict(_))));

        let second = session.begin_generation().unwrap();
        assert_ne!(first.epoch, second.epoch);
        // A late result from the abandoned request must not consume the new ticket.
        assert!(session.fail_generation(first.epoch).is_err());
        assert!(session.generating);
        assert!(session.fail_generation(second.epoch).is_ok());
        assert!(!session.generating);
    }
}
