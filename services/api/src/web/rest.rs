//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Every mutating endpoint answers with the full `SessionView`, so the
//! client can redraw the current stage from a single response.

use crate::web::protocol::{
    CorrectionRequest, InterestRequest, IssueView, PdfRequest, PdfView, PoemRequest,
    RhymeRequest, RhymeView, RhymesView, SessionView, StatsView, ThemeRequest, VerseIssuesView,
};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use rhyme_workshop_core::{domain::Session, workflow::StageError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

type HandlerError = (StatusCode, String);

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_session_handler,
        get_session_handler,
        delete_session_handler,
        submit_interest_handler,
        refresh_themes_handler,
        choose_theme_handler,
        update_poem_handler,
        check_spelling_handler,
        apply_correction_handler,
        find_rhymes_handler,
        finish_poem_handler,
        generate_pdf_handler,
        download_pdf_handler,
        back_to_writing_handler,
    ),
    components(
        schemas(
            SessionView, StatsView, IssueView, VerseIssuesView, RhymeView, RhymesView, PdfView,
            InterestRequest, ThemeRequest, PoemRequest, CorrectionRequest, RhymeRequest,
            PdfRequest,
        )
    ),
    tags(
        (name = "Oficina de Rimas API", description = "API endpoints for the children's poetry workshop.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Helpers
//=========================================================================================

/// Maps a rejected workflow action to an HTTP status.
fn stage_error(e: StageError) -> HandlerError {
    let status = match &e {
        StageError::WrongStage { .. } => StatusCode::CONFLICT,
        StageError::RenderFailed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    if e.is_validation() {
        info!("Action rejected: {}", e);
    } else {
        warn!("Action failed: {}", e);
    }
    (status, e.to_string())
}

async fn load_session(
    app_state: &AppState,
    session_id: Uuid,
) -> Result<Arc<Mutex<Session>>, HandlerError> {
    app_state.sessions.get(session_id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            format!("Session {} not found", session_id),
        )
    })
}

fn view(session_id: Uuid, session: &Session) -> Json<SessionView> {
    Json(SessionView::from_session(session_id, session))
}

//=========================================================================================
// Session Lifecycle Handlers
//=========================================================================================

/// Start a new workshop session in the `getting_interest` stage.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = SessionView)
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let session_id = app_state.sessions.create().await;
    let session = load_session(&app_state, session_id).await?;
    let session = session.lock().await;
    info!("Created session {}.", session_id);
    Ok((StatusCode::CREATED, view(session_id, &session)))
}

/// Fetch the current state of a session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let session = session.lock().await;
    Ok(view(session_id, &session))
}

/// Discard a session and everything it holds.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    if app_state.sessions.remove(session_id).await {
        info!("Deleted session {}.", session_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            format!("Session {} not found", session_id),
        ))
    }
}

//=========================================================================================
// Interest & Theme Handlers
//=========================================================================================

/// Submit the child's interests and move on to choosing a theme.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/interest",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    request_body = InterestRequest,
    responses(
        (status = 200, description = "Themes generated (or the failure recorded)", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `getting_interest`"),
        (status = 422, description = "Empty interest")
    )
)]
pub async fn submit_interest_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<InterestRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .submit_interest(&mut session, &payload.interest)
        .await
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

/// Ask the assistant for a new list of themes.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/themes/refresh",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Themes regenerated", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `choosing_theme`")
    )
)]
pub async fn refresh_themes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .refresh_themes(&mut session)
        .await
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

/// Pick one of the offered themes and start writing.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/theme",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme chosen", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `choosing_theme`"),
        (status = 422, description = "Theme not offered, or no themes available")
    )
)]
pub async fn choose_theme_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<ThemeRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .choose_theme(&mut session, &payload.theme)
        .await
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

//=========================================================================================
// Writing Handlers
//=========================================================================================

/// Replace the poem with the editor contents.
#[utoipa::path(
    put,
    path = "/sessions/{session_id}/poem",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    request_body = PoemRequest,
    responses(
        (status = 200, description = "Poem saved", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `writing_poem`")
    )
)]
pub async fn update_poem_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<PoemRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .update_poem(&mut session, &payload.text)
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

/// Check the whole poem for spelling and grammar issues.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/spellcheck",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Issues refreshed", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `writing_poem`")
    )
)]
pub async fn check_spelling_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .check_spelling(&mut session)
        .await
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

/// Apply one suggestion and re-check the poem.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/corrections",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    request_body = CorrectionRequest,
    responses(
        (status = 200, description = "Correction applied", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `writing_poem`"),
        (status = 422, description = "The word is not in the poem")
    )
)]
pub async fn apply_correction_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<CorrectionRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .apply_correction(&mut session, &payload.original, &payload.suggestion)
        .await
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

/// Look up rhymes for a word, in the context of the chosen theme.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/rhymes",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    request_body = RhymeRequest,
    responses(
        (status = 200, description = "Rhyme lookup stored", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `writing_poem`"),
        (status = 422, description = "Empty word")
    )
)]
pub async fn find_rhymes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<RhymeRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .find_rhymes(&mut session, &payload.word)
        .await
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

/// Finish writing and move to the finalization stage.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/finish",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Poem finished", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `writing_poem`"),
        (status = 422, description = "The poem is blank")
    )
)]
pub async fn finish_poem_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .finish_poem(&mut session)
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

//=========================================================================================
// Finalization Handlers
//=========================================================================================

/// Style and render the poem as a PDF.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/pdf",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    request_body = PdfRequest,
    responses(
        (status = 200, description = "PDF generated", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `finalizing_poem`"),
        (status = 422, description = "Missing title or author"),
        (status = 502, description = "The PDF could not be rendered")
    )
)]
pub async fn generate_pdf_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<PdfRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .generate_pdf(&mut session, &payload.title, &payload.author)
        .await
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

/// Download the most recently generated PDF.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/pdf",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "The PDF document, served as `application/pdf`"),
        (status = 404, description = "Unknown session, or no PDF generated yet")
    )
)]
pub async fn download_pdf_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let session = session.lock().await;
    let pdf = session.pdf.as_ref().ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            "No PDF has been generated for this session".to_string(),
        )
    })?;

    let disposition = format!("attachment; filename=\"{}\"", pdf.file_name);
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, Bytes::from(pdf.bytes.clone())))
}

/// Go back to editing; any generated PDF is discarded.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/back",
    params(("session_id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Back in `writing_poem`", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session is not in `finalizing_poem`")
    )
)]
pub async fn back_to_writing_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, HandlerError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    app_state
        .workshop
        .back_to_writing(&mut session)
        .map_err(stage_error)?;
    Ok(view(session_id, &session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhyme_workshop_core::domain::Stage;

    #[test]
    fn stage_errors_map_to_distinct_statuses() {
        let wrong = StageError::WrongStage {
            expected: Stage::WritingPoem,
            actual: Stage::GettingInterest,
        };
        assert_eq!(stage_error(wrong).0, StatusCode::CONFLICT);
        assert_eq!(
            stage_error(StageError::RenderFailed("boom".into())).0,
            StatusCode::BAD_GATEWAY
        );
        let (status, message) = stage_error(StageError::BlankPoem);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, "Escreva seu poema antes de concluir!");
    }

    #[test]
    fn api_doc_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/sessions"));
        assert!(paths.iter().any(|p| p.as_str() == "/sessions/{session_id}/pdf"));
        assert_eq!(paths.len(), 12);
    }
}
