// src/services/scoring.rs

use crate::models::{
    question::QuizItem,
    score::{QuestionResult, ScoreReport},
};

/// Scores a quiz by exact key match.
///
/// * One selection slot per item; a missing or `None` slot counts as wrong.
/// * Unanswered questions stay in the denominator.
pub fn score(items: &[QuizItem], selections: &[Option<String>]) -> ScoreReport {
    let mut correct_count = 0;

    let results: Vec<QuestionResult> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let selected = selections.get(idx).cloned().flatten();
            // Simple strict string matching
            let is_correct = selected.as_deref() == Some(item.correct.as_str());
            if is_correct {
                correct_count += 1;
            }

            QuestionResult {
                number: idx + 1,
                question: item.question.clone(),
                selected_text: selected
                    .as_deref()
                    .and_then(|key| item.option_text(key))
                    .map(str::to_string),
                selected_key: selected,
                correct_key: item.correct.clone(),
                correct_text: item.option_text(&item.correct).map(str::to_string),
                is_correct,
            }
        })
        .collect();

    ScoreReport {
        correct: correct_count,
        total: items.len(),
        percentage: percentage(correct_count, items.len()),
        results,
    }
}

/// `correct / total * 100` rounded to one decimal place; an empty quiz scores 0.
pub fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerOption;

    fn item(correct: &str) -> QuizItem {
        QuizItem {
            question: format!("Answer is {}", correct),
            options: ["a", "b", "c", "d"]
                .iter()
                .map(|k| AnswerOption {
                    key: k.to_string(),
                    text: k.to_uppercase(),
                })
                .collect(),
            correct: correct.to_string(),
        }
    }

    fn picks(keys: &[Option<&str>]) -> Vec<Option<String>> {
        keys.iter().map(|k| k.map(str::to_string)).collect()
    }

    #[test]
    fn all_correct_is_full_marks() {
        let items = vec![item("a"), item("b"), item("c"), item("d")];
        let report = score(&items, &picks(&[Some("a"), Some("b"), Some("c"), Some("d")]));
        assert_eq!(report.correct, 4);
        assert_eq!(report.total, 4);
        assert_eq!(report.percentage, 100.0);
        assert!(report.results.iter().all(|r| r.is_correct));
    }

    #[test]
    fn none_correct_is_zero() {
        let items = vec![item("a"), item("b")];
        let report = score(&items, &picks(&[Some("b"), Some("a")]));
        assert_eq!(report.correct, 0);
        assert_eq!(report.percentage, 0.0);
    }

    #[test]
    fn two_of_three_rounds_to_one_decimal() {
        let items = vec![item("a"), item("b"), item("c")];
        let report = score(&items, &picks(&[Some("a"), Some("b"), Some("d")]));
        assert_eq!(report.correct, 2);
        assert_eq!(report.percentage, 66.7);
    }

    #[test]
    fn unanswered_counts_against_the_total() {
        let items = vec![item("a"), item("b")];
        let report = score(&items, &picks(&[Some("a"), None]));
        assert_eq!(report.total, 2);
        assert_eq!(report.percentage, 50.0);

        let second = &report.results[1];
        assert_eq!(second.selected_key, None);
        assert_eq!(second.selected_text, None);
        assert_eq!(second.correct_text.as_deref(), Some("B"));
        assert!(!second.is_correct);
    }

    #[test]
    fn short_selection_vector_is_treated_as_unanswered() {
        let items = vec![item("a"), item("b")];
        let report = score(&items, &[]);
        assert_eq!(report.correct, 0);
        assert_eq!(report.results.len(), 2);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(score(&[], &[]).percentage, 0.0);
    }

    #[test]
    fn comparison_is_exact() {
        let items = vec![item("b")];
        let report = score(&items, &picks(&[Some("B")]));
        assert_eq!(report.correct, 0);
    }
}
