pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub use rest::ApiDoc;
pub use state::{spawn_session_sweeper, AppState, SessionStore};

/// Builds the workshop's REST router. CORS and Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(rest::create_session_handler))
        .route(
            "/sessions/{session_id}",
            get(rest::get_session_handler).delete(rest::delete_session_handler),
        )
        .route("/sessions/{session_id}/interest", post(rest::submit_interest_handler))
        .route("/sessions/{session_id}/themes/refresh", post(rest::refresh_themes_handler))
        .route("/sessions/{session_id}/theme", post(rest::choose_theme_handler))
        .route("/sessions/{session_id}/poem", put(rest::update_poem_handler))
        .route("/sessions/{session_id}/spellcheck", post(rest::check_spelling_handler))
        .route("/sessions/{session_id}/corrections", post(rest::apply_correction_handler))
        .route("/sessions/{session_id}/rhymes", post(rest::find_rhymes_handler))
        .route("/sessions/{session_id}/finish", post(rest::finish_poem_handler))
        .route(
            "/sessions/{session_id}/pdf",
            post(rest::generate_pdf_handler).get(rest::download_pdf_handler),
        )
        .route("/sessions/{session_id}/back", post(rest::back_to_writing_handler))
        .with_state(app_state)
}
