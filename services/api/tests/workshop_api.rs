//! HTTP-level integration tests for the workshop flow.
//!
//! Tests cover the full happy path, validation warnings, stage conflicts,
//! unknown sessions, the PDF download and degraded operation without a key.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_bytes, body_json, body_text, get, new_session, post, post_json, put_json, send,
    session_writing,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn a_session_goes_from_interest_to_downloaded_pdf() {
    let app = common::build_test_app();

    let response = post(&app, "/sessions").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["stage"], "getting_interest");
    let base = format!("/sessions/{}", json["session_id"].as_str().unwrap());

    let response = post_json(&app, &format!("{base}/interest"), json!({"interest": "  praia  "})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["stage"], "choosing_theme");
    assert_eq!(json["interest_text"], "praia");
    assert_eq!(json["themes"][0], "O mar azul");
    assert!(json["themes_error"].is_null());

    let response = post_json(&app, &format!("{base}/theme"), json!({"theme": "O mar azul"})).await;
    let json = body_json(response).await;
    assert_eq!(json["stage"], "writing_poem");
    assert_eq!(json["chosen_theme"], "O mar azul");
    assert_eq!(json["progression_ideas"].as_array().unwrap().len(), 2);

    let poem = "O sol ten mar\nE a onda vem\n\nCanto no luar";
    let response = put_json(&app, &format!("{base}/poem"), json!({"text": poem})).await;
    let json = body_json(response).await;
    assert_eq!(json["stats"]["verses"], 3);
    assert_eq!(json["stats"]["stanzas"], 2);

    let response = post(&app, &format!("{base}/spellcheck")).await;
    let json = body_json(response).await;
    assert_eq!(json["issues"][0]["verse_number"], 1);
    assert_eq!(json["issues"][0]["issues"][0]["original"], "ten");
    assert_eq!(json["issues"][0]["issues"][0]["suggestions"][0], "tem");

    let response = post_json(
        &app,
        &format!("{base}/corrections"),
        json!({"original": "ten", "suggestion": "tem"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["poem_text"], "O sol tem mar\nE a onda vem\n\nCanto no luar");
    assert_eq!(json["issues"].as_array().unwrap().len(), 0);

    let response = post_json(&app, &format!("{base}/rhymes"), json!({"word": "mar"})).await;
    let json = body_json(response).await;
    assert_eq!(json["rhymes"]["word"], "mar");
    let words: Vec<&str> = json["rhymes"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["word"].as_str().unwrap())
        .collect();
    assert_eq!(words, vec!["amar", "luar"]);

    let response = post(&app, &format!("{base}/finish")).await;
    assert_eq!(body_json(response).await["stage"], "finalizing_poem");

    let response = post_json(
        &app,
        &format!("{base}/pdf"),
        json!({"title": "Meu Poema! #1", "author": "Ana"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pdf"]["file_name"], "Meu_Poema_1.pdf");
    assert_eq!(json["pdf"]["download_url"], format!("{base}/pdf"));

    let response = get(&app, &format!("{base}/pdf")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"Meu_Poema_1.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn going_back_discards_the_pdf_and_keeps_the_poem() {
    let app = common::build_test_app();
    let base = session_writing(&app).await;
    put_json(&app, &format!("{base}/poem"), json!({"text": "Onda azul"})).await;
    post(&app, &format!("{base}/finish")).await;
    post_json(&app, &format!("{base}/pdf"), json!({"title": "Mar", "author": "Rui"})).await;

    let response = post(&app, &format!("{base}/back")).await;
    let json = body_json(response).await;
    assert_eq!(json["stage"], "writing_poem");
    assert_eq!(json["poem_text"], "Onda azul");
    assert!(json["pdf"].is_null());

    let response = get(&app, &format!("{base}/pdf")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Validation warnings (422)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_inputs_are_rejected_without_changing_the_stage() {
    let app = common::build_test_app();
    let base = new_session(&app).await;

    let response = post_json(&app, &format!("{base}/interest"), json!({"interest": "   "})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_text(response).await,
        "Escreva algo que você gosta para a gente começar!"
    );
    assert_eq!(body_json(get(&app, &base).await).await["stage"], "getting_interest");

    post_json(&app, &format!("{base}/interest"), json!({"interest": "praia"})).await;
    let response = post_json(&app, &format!("{base}/theme"), json!({"theme": "Vulcões"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    post_json(&app, &format!("{base}/theme"), json!({"theme": "O mar azul"})).await;
    let response = post(&app, &format!("{base}/finish")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_text(response).await, "Escreva seu poema antes de concluir!");

    let response = post_json(&app, &format!("{base}/rhymes"), json!({"word": " "})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn a_pdf_needs_both_title_and_author() {
    let app = common::build_test_app();
    let base = session_writing(&app).await;
    put_json(&app, &format!("{base}/poem"), json!({"text": "Onda azul"})).await;
    post(&app, &format!("{base}/finish")).await;

    let response = post_json(&app, &format!("{base}/pdf"), json!({"title": "Mar", "author": " "})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_text(response).await,
        "Por favor, preencha o título e o seu nome!"
    );
    assert!(body_json(get(&app, &base).await).await["pdf"].is_null());
}

#[tokio::test]
async fn correcting_a_missing_word_is_a_warning() {
    let app = common::build_test_app();
    let base = session_writing(&app).await;
    put_json(&app, &format!("{base}/poem"), json!({"text": "Onda azul"})).await;

    let response = post_json(
        &app,
        &format!("{base}/corrections"),
        json!({"original": "ten", "suggestion": "tem"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(get(&app, &base).await).await["poem_text"], "Onda azul");
}

// ---------------------------------------------------------------------------
// Stage conflicts (409), unknown sessions (404) and render failures (502)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn actions_outside_their_stage_conflict() {
    let app = common::build_test_app();
    let base = new_session(&app).await;

    let response = put_json(&app, &format!("{base}/poem"), json!({"text": "cedo demais"})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post(&app, &format!("{base}/back")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(&app, &format!("{base}/pdf"), json!({"title": "a", "author": "b"})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_and_deleted_sessions_are_not_found() {
    let app = common::build_test_app();
    let response = get(&app, "/sessions/00000000-0000-0000-0000-000000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let base = new_session(&app).await;
    let response = send(&app, Method::DELETE, &base, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &base).await.status(), StatusCode::NOT_FOUND);
    let response = send(&app, Method::DELETE, &base, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn a_render_failure_is_a_bad_gateway_and_leaves_no_pdf() {
    let app = common::build_broken_renderer_app();
    let base = session_writing(&app).await;
    put_json(&app, &format!("{base}/poem"), json!({"text": "Onda azul"})).await;
    post(&app, &format!("{base}/finish")).await;

    let response = post_json(&app, &format!("{base}/pdf"), json!({"title": "Mar", "author": "Rui"})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(get(&app, &base).await).await;
    assert_eq!(json["stage"], "finalizing_poem");
    assert!(json["pdf"].is_null());
}

// ---------------------------------------------------------------------------
// Running without an assistant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn without_an_assistant_theme_failures_are_visible() {
    let app = common::build_offline_app();
    let base = new_session(&app).await;

    let response = post_json(&app, &format!("{base}/interest"), json!({"interest": "praia"})).await;
    let json = body_json(response).await;
    assert_eq!(json["stage"], "choosing_theme");
    assert_eq!(json["themes"].as_array().unwrap().len(), 0);
    assert!(json["themes_error"].is_string());

    let response = post_json(&app, &format!("{base}/theme"), json!({"theme": "qualquer"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post(&app, &format!("{base}/themes/refresh")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["themes_error"].is_string());
}
