// src/models/generation.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which kind of learning material a generation action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Quiz,
    Exercises,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(alias = "easy")]
    Easy,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgrammingLanguage {
    #[default]
    #[serde(alias = "python")]
    Python,
    #[serde(alias = "java")]
    Java,
    #[serde(rename = "C++", alias = "cpp", alias = "c++")]
    Cpp,
    #[serde(alias = "javascript")]
    JavaScript,
}

impl ProgrammingLanguage {
    pub fn label(&self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "Python",
            ProgrammingLanguage::Java => "Java",
            ProgrammingLanguage::Cpp => "C++",
            ProgrammingLanguage::JavaScript => "JavaScript",
        }
    }

    /// Hint for syntax highlighting of solution code.
    pub fn syntax_hint(&self) -> String {
        self.label().to_lowercase()
    }
}

impl fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// DTO for a generation action.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateRequest {
    pub mode: Mode,

    /// Free-form user instructions ("Focus on chapter 3", ...).
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub instructions: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// Only used for exercises.
    #[serde(default)]
    pub language: ProgrammingLanguage,

    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = 10))]
    pub count: u8,
}

fn default_count() -> u8 {
    3
}
