// src/handlers/generation.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        generation::{GenerateRequest, Mode},
        session::{GenerationTicket, Material, SourceContent},
    },
    services::{
        generation::{ExerciseSchema, Generator, QuizSchema},
        openai::GenerationError,
        presentation::{SessionView, session_view},
    },
    state::SessionStore,
};

/// Generates quiz questions or programming exercises from the session content.
///
/// * Requires source content (400 otherwise).
/// * Any API or parse failure returns 502 and leaves the session Idle.
/// * Only one generation per session may be in flight (409).
/// * New content or a reset while generating discards the result (409).
pub async fn generate_material(
    State(sessions): State<SessionStore>,
    State(generator): State<Generator>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenerateRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ticket = sessions.update(id, |session| session.begin_generation()).await?;

    tracing::info!(
        "Session {}: generating {} {:?} ({})",
        id,
        payload.count,
        payload.mode,
        payload.difficulty
    );

    // The task applies the outcome to the session itself, so the session is
    // settled even if this request is dropped before it finishes.
    let epoch = ticket.epoch;
    let task = tokio::spawn(settle_generation(
        sessions.clone(),
        generator,
        id,
        ticket,
        payload,
    ));

    match task.await {
        Ok(result) => result.map(Json),
        Err(e) => {
            tracing::error!("Session {}: generation task failed: {}", id, e);
            sessions
                .update(id, |session| session.fail_generation(epoch))
                .await?;
            Err(AppError::InternalServerError(e.to_string()))
        }
    }
}

async fn settle_generation(
    sessions: SessionStore,
    generator: Generator,
    id: Uuid,
    ticket: GenerationTicket,
    payload: GenerateRequest,
) -> Result<SessionView, AppError> {
    let mode = payload.mode;
    let outcome = run_generation(&generator, &ticket.content, payload).await;

    sessions
        .update(id, move |session| match outcome {
            Ok(material) if !material.is_empty() => {
                let items = material.len();
                session.complete_generation(ticket.epoch, material)?;
                tracing::info!("Session {}: generated {} items", id, items);
                Ok(session_view(session))
            }
            other => {
                match other {
                    Ok(_) => tracing::error!("Session {}: completion contained no items", id),
                    Err(e) => tracing::error!("Session {}: generation failed: {}", id, e),
                }
                session.fail_generation(ticket.epoch)?;
                Err(AppError::BadGateway(failure_message(mode).to_string()))
            }
        })
        .await
        .inspect_err(|e| {
            if let AppError::Conflict(_) = e {
                tracing::info!("Session {}: discarded result of an abandoned generation", id);
            }
        })
}

async fn run_generation(
    generator: &Generator,
    content: &SourceContent,
    payload: GenerateRequest,
) -> Result<Material, GenerationError> {
    let GenerateRequest {
        mode,
        instructions,
        difficulty,
        language,
        count,
    } = payload;

    match mode {
        Mode::Quiz => {
            let schema = QuizSchema { difficulty };
            let items = generator
                .generate(&schema, &content.text, &instructions, count)
                .await?;
            Ok(Material::Quiz { difficulty, items })
        }
        Mode::Exercises => {
            let schema = ExerciseSchema {
                language,
                difficulty,
            };
            let items = generator
                .generate(&schema, &content.text, &instructions, count)
                .await?;
            Ok(Material::Exercises {
                language,
                difficulty,
                items,
            })
        }
    }
}

fn failure_message(mode: Mode) -> &'static str {
    match mode {
        Mode::Quiz => "Failed to generate questions. Please try again.",
        Mode::Exercises => "Failed to generate exercises. Please try again.",
    }
}
