//! HTTP contract of `POST /check` as a game client sees it.

use crate::common::fixture_engine;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use thinklink::Settings;
use thinklink::server::router;
use tower::ServiceExt;

async fn check(body: Value) -> (StatusCode, Value) {
    let settings = Settings::default();
    let app = router(fixture_engine(), &settings.server.cors_origins);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/check")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn related_word_is_matched() {
    let (status, body) = check(json!({
        "target_word": "ocean",
        "user_input": "Sea",
        "total_score": 0
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], true);
    assert!((body["score"].as_f64().unwrap() - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn threshold_rises_with_total_score() {
    let (_, early) = check(json!({
        "target_word": "north",
        "user_input": "south",
        "total_score": 10
    }))
    .await;
    let (_, late) = check(json!({
        "target_word": "north",
        "user_input": "south",
        "total_score": 2500
    }))
    .await;

    assert_eq!(early["matched"], true);
    assert_eq!(late["matched"], false);
    // The raw similarity is reported even when rejected
    assert_eq!(late["score"], 0.5);
}

#[tokio::test]
async fn unknown_and_identical_words_share_one_answer() {
    let expected = json!({ "matched": false, "score": 0.0 });

    let (status, unknown) = check(json!({
        "target_word": "ocean",
        "user_input": "zzqxplorb123",
        "total_score": 0
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown, expected);

    let (_, identical) = check(json!({
        "target_word": "ocean",
        "user_input": "OCEAN",
        "total_score": 0
    }))
    .await;
    assert_eq!(identical, expected);
}

#[tokio::test]
async fn wrongly_typed_fields_are_a_non_match() {
    let (status, body) = check(json!({
        "target_word": "ocean",
        "user_input": "sea",
        "total_score": "lots"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], false);
}
