//! Shared helpers for the HTTP-level integration tests.
//!
//! The router is built exactly as the binary builds it, with a scripted
//! assistant in place of the real model so responses are deterministic.

#![allow(dead_code)]

use std::sync::Arc;

use api_lib::adapters::{PrintPdfRenderer, UnavailableTextAdapter};
use api_lib::config::Config;
use api_lib::web::{router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use rhyme_workshop_core::domain::{PoemDocument, StyleDescriptor};
use rhyme_workshop_core::ports::{
    GenerationOptions, PoemRenderer, PortError, PortResult, TextGenerationService,
};
use rhyme_workshop_core::workflow::Workshop;
use tower::ServiceExt;

pub const THEMES: &str = r#"["O mar azul", "Futebol na praia", "Um dragão amigo"]"#;
pub const IDEAS: &str = r#"["Que som faz a onda?", "Que cor tem o vento?"]"#;
pub const RHYMES: &str = r#"```json
[{"word": "amar", "definition": "Gostar muito"}, {"word": "MAR", "definition": "Água"}, {"word": "luar", "definition": "Luz da lua"}]
```"#;
pub const STYLE: &str = r##"{"font": "Times", "backgroundColorHex": "#E0F7FA", "textColorHex": "#01579B",
"titleColorHex": "#FF6F00", "borderColorHex": "#0288D1", "borderStyle": "estrelas", "iconName": "sol"}"##;
pub const ISSUES: &str = r#"[{"original": "ten", "suggestions": ["tem", "tens"], "reason": "O verbo ter se escreve com m.", "verseNumber": 1}]"#;

//=========================================================================================
// Fakes
//=========================================================================================

/// Answers each prompt by what it asks for. The spelling review only
/// reports "ten" while the poem still contains it.
pub struct FakeAssistant;

#[async_trait]
impl TextGenerationService for FakeAssistant {
    async fn generate(&self, prompt: &str, _options: GenerationOptions) -> PortResult<String> {
        let reply = if prompt.contains("Crie 10 temas") {
            THEMES
        } else if prompt.contains("10 ideias") {
            IDEAS
        } else if prompt.contains("rimam foneticamente") {
            RHYMES
        } else if prompt.contains("professor de português") {
            if prompt.contains("ten mar") {
                ISSUES
            } else {
                "[]"
            }
        } else if prompt.contains("diretor de arte") {
            STYLE
        } else {
            return Err(PortError::Unexpected(format!("unscripted prompt: {prompt}")));
        };
        Ok(reply.to_string())
    }
}

pub struct BrokenRenderer;

impl PoemRenderer for BrokenRenderer {
    fn render(&self, _poem: &PoemDocument, _style: &StyleDescriptor) -> PortResult<Vec<u8>> {
        Err(PortError::Unexpected("disk full".to_string()))
    }
}

//=========================================================================================
// App Builders
//=========================================================================================

pub fn test_config() -> Arc<Config> {
    Arc::new(Config::from_lookup(|_| None).expect("defaults are valid"))
}

pub fn build_app_with(
    ai: Arc<dyn TextGenerationService>,
    renderer: Arc<dyn PoemRenderer>,
) -> Router {
    let workshop = Workshop::new(ai, renderer);
    router(Arc::new(AppState::new(&test_config(), workshop)))
}

/// The full router with the scripted assistant and the real PDF renderer.
pub fn build_test_app() -> Router {
    build_app_with(Arc::new(FakeAssistant), Arc::new(PrintPdfRenderer::new()))
}

/// The router as it runs without any API key.
pub fn build_offline_app() -> Router {
    build_app_with(
        Arc::new(UnavailableTextAdapter),
        Arc::new(PrintPdfRenderer::new()),
    )
}

pub fn build_broken_renderer_app() -> Router {
    build_app_with(Arc::new(FakeAssistant), Arc::new(BrokenRenderer))
}

//=========================================================================================
// Request Helpers
//=========================================================================================

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Creates a session and returns its `/sessions/{id}` base path.
pub async fn new_session(app: &Router) -> String {
    let response = post(app, "/sessions").await;
    let json = body_json(response).await;
    format!("/sessions/{}", json["session_id"].as_str().unwrap())
}

/// Drives a fresh session to `writing_poem` with the theme "O mar azul".
pub async fn session_writing(app: &Router) -> String {
    let base = new_session(app).await;
    post_json(app, &format!("{base}/interest"), serde_json::json!({"interest": "praia"})).await;
    post_json(app, &format!("{base}/theme"), serde_json::json!({"theme": "O mar azul"})).await;
    base
}
