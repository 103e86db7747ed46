// src/handlers/session.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{error::AppError, services::presentation::session_view, state::SessionStore};

/// Starts a new session in the Idle phase.
/// Returns 201 Created and the session view.
pub async fn create_session(
    State(sessions): State<SessionStore>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.create().await;
    tracing::info!("Session {} created", session.id);

    Ok((StatusCode::CREATED, Json(session_view(&session))))
}

/// Retrieves the current state of a session.
pub async fn get_session(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.read(id, session_view).await?;
    Ok(Json(view))
}

/// Ends a session and drops everything it holds.
pub async fn delete_session(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.remove(id).await?;
    tracing::info!("Session {} ended", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Discards generated material and scores so a new round can start.
/// The source content is kept.
pub async fn reset_session(
    State(sessions): State<SessionStore>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions
        .update(id, |session| {
            session.reset();
            Ok(session_view(session))
        })
        .await?;

    Ok(Json(view))
}
