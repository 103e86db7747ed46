// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::score::SelectAnswerRequest,
    services::presentation::session_view,
    state::SessionStore,
};

/// Records the user's answer for one question (0-based index).
///
/// Selecting again for the same question overwrites the previous choice.
pub async fn select_answer(
    State(sessions): State<SessionStore>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let view = sessions
        .update(id, |session| {
            session.select(index, req.option.trim())?;
            Ok(session_view(session))
        })
        .await?;

    Ok(Json(view))
}

/// Submits the quiz and calculates the score.
///
/// * Compares each selection with the question's correct key.
/// * Unanswered questions count as incorrect.
pub async fn submit_quiz(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = sessions
        .update(id, |session| session.submit().cloned())
        .await?;

    tracing::info!(
        "Session {}: scored {}/{} ({:.1}%)",
        id,
        report.correct,
        report.total,
        report.percentage
    );

    Ok(Json(report))
}
