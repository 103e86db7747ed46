// src/handlers/content.rs

use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::session::SourceContent,
    services::{
        pdf::{PdfError, PdfExtractor},
        presentation::ContentSummary,
    },
    state::SessionStore,
};

const EXTRACTION_FAILED: &str = "Could not extract text from the PDF. Please try another file.";
const NO_CONTENT: &str =
    "Please upload a PDF or enter text content to generate learning material.";

/// Captures the source content for a session.
///
/// * Multipart fields: `file` (PDF) and `text` (pasted content).
/// * The PDF wins when both are present.
/// * On failure the previous content is left untouched.
pub async fn upload_content(
    State(sessions): State<SessionStore>,
    State(extractor): State<PdfExtractor>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    // Fail fast before reading a large body for a session that does not exist.
    sessions.read(id, |_| ()).await?;

    let mut file: Option<(Option<String>, Vec<u8>)> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if !data.is_empty() {
                    file = Some((file_name, data.to_vec()));
                }
            }
            "text" => {
                text = Some(field.text().await?);
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let content = match (file, text) {
        (Some((file_name, bytes)), _) => {
            let size = bytes.len();
            let text = extractor.extract(bytes).await.map_err(|e| match e {
                PdfError::Task(msg) => AppError::InternalServerError(msg),
                other => {
                    tracing::warn!("PDF extraction failed ({} bytes): {}", size, other);
                    AppError::BadRequest(EXTRACTION_FAILED.to_string())
                }
            })?;
            SourceContent::from_pdf(text, file_name)
        }
        (None, Some(text)) if !text.trim().is_empty() => SourceContent::from_text(text),
        _ => return Err(AppError::BadRequest(NO_CONTENT.to_string())),
    };

    let summary = ContentSummary::from(&content);
    tracing::info!(
        "Session {}: {:?} content captured, {} words",
        id,
        summary.origin,
        summary.words
    );

    sessions
        .update(id, |session| {
            session.set_content(content);
            Ok(())
        })
        .await?;

    Ok(Json(summary))
}
