//! Wire-level tests for the external service clients
//!
//! Each test spins up a real axum server on an ephemeral port playing the
//! role of the external service, so the reqwest clients are exercised over
//! actual HTTP, including the non-2xx-with-JSON-body failure convention.

use axum::routing::{get, post};
use axum::{http::StatusCode, Json, Router};
use moodtune_common::api::{ResolveRequest, ResolvedMedia};
use moodtune_common::catalog::TrackDescriptor;
use moodtune_common::emotion::EmotionLabel;
use moodtune_common::Error;
use moodtune_player::detector::{ExpressionModel, HttpExpressionModel, VideoFrame};
use moodtune_player::resolver::{HttpTrackResolver, TrackResolver};
use serde_json::{json, Value};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_service(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn descriptor() -> TrackDescriptor {
    TrackDescriptor {
        display_name: "Song A".to_string(),
        search_query: "Song A official audio".to_string(),
    }
}

fn frame() -> VideoFrame {
    VideoFrame {
        image_base64: "Zm9vYmFy".to_string(),
    }
}

// ========================================
// Resolution service client
// ========================================

#[tokio::test]
async fn test_resolver_success() {
    let app = Router::new().route(
        "/get_audio_url",
        post(|Json(request): Json<ResolveRequest>| async move {
            // Echo the query back as the title to verify the request body
            Json(json!({
                "status": "success",
                "audio_url": "http://cdn.test/a.mp3",
                "title": request.query,
            }))
        }),
    );
    let base = spawn_service(app).await;

    let resolver = HttpTrackResolver::new(&base, TIMEOUT).unwrap();
    let media = resolver.resolve(&descriptor()).await.unwrap();
    assert_eq!(
        media,
        ResolvedMedia {
            playable_url: "http://cdn.test/a.mp3".to_string(),
            title: "Song A official audio".to_string(),
        }
    );
}

#[tokio::test]
async fn test_resolver_failure_body_with_non_2xx_status() {
    let app = Router::new().route(
        "/get_audio_url",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "status": "fail", "message": "no results" })),
            )
        }),
    );
    let base = spawn_service(app).await;

    let resolver = HttpTrackResolver::new(&base, TIMEOUT).unwrap();
    match resolver.resolve(&descriptor()).await {
        Err(Error::Resolution(reason)) => assert!(reason.contains("no results")),
        other => panic!("expected resolution error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolver_rejects_success_without_audio_url() {
    let app = Router::new().route(
        "/get_audio_url",
        post(|| async { Json(json!({ "status": "success", "title": "Song A" })) }),
    );
    let base = spawn_service(app).await;

    let resolver = HttpTrackResolver::new(&base, TIMEOUT).unwrap();
    match resolver.resolve(&descriptor()).await {
        Err(Error::Resolution(reason)) => assert!(reason.contains("audio_url")),
        other => panic!("expected resolution error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolver_rejects_malformed_body() {
    let app = Router::new().route("/get_audio_url", post(|| async { "not json" }));
    let base = spawn_service(app).await;

    let resolver = HttpTrackResolver::new(&base, TIMEOUT).unwrap();
    assert!(matches!(
        resolver.resolve(&descriptor()).await,
        Err(Error::Resolution(_))
    ));
}

#[tokio::test]
async fn test_resolver_network_error() {
    // Nothing is listening on this port
    let resolver = HttpTrackResolver::new("http://127.0.0.1:1", TIMEOUT).unwrap();
    assert!(matches!(
        resolver.resolve(&descriptor()).await,
        Err(Error::Resolution(_))
    ));
}

// ========================================
// Expression model client
// ========================================

#[tokio::test]
async fn test_model_probe_ready() {
    let app = Router::new().route("/health", get(|| async { Json(json!({ "status": "ok" })) }));
    let base = spawn_service(app).await;

    let model = HttpExpressionModel::new(&base, TIMEOUT).unwrap();
    model.probe_ready().await.unwrap();
}

#[tokio::test]
async fn test_model_probe_fails_on_unhealthy_service() {
    let app = Router::new().route(
        "/health",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_service(app).await;

    let model = HttpExpressionModel::new(&base, TIMEOUT).unwrap();
    assert!(matches!(
        model.probe_ready().await,
        Err(Error::ModelLoad(_))
    ));

    let unreachable = HttpExpressionModel::new("http://127.0.0.1:1", TIMEOUT).unwrap();
    assert!(matches!(
        unreachable.probe_ready().await,
        Err(Error::ModelLoad(_))
    ));
}

#[tokio::test]
async fn test_model_scores_parsed_and_unknown_labels_ignored() {
    let app = Router::new().route(
        "/detect_expressions",
        post(|Json(request): Json<Value>| async move {
            assert_eq!(request["image"], "Zm9vYmFy");
            Json(json!({
                "status": "success",
                "expressions": {
                    "happy": 0.8,
                    "surprise": 0.1,
                    "contempt": 0.05,
                },
            }))
        }),
    );
    let base = spawn_service(app).await;

    let model = HttpExpressionModel::new(&base, TIMEOUT).unwrap();
    let scores = model.score_frame(&frame()).await.unwrap().unwrap();
    assert_eq!(scores.get(&EmotionLabel::Happy), Some(&0.8));
    // The model's "surprise" spelling maps onto the canonical label
    assert_eq!(scores.get(&EmotionLabel::Surprised), Some(&0.1));
    // Labels outside the canonical set are dropped, not errors
    assert_eq!(scores.len(), 2);
}

#[tokio::test]
async fn test_model_no_face_maps_to_none() {
    let app = Router::new().route(
        "/detect_expressions",
        post(|| async { Json(json!({ "status": "no_face" })) }),
    );
    let base = spawn_service(app).await;

    let model = HttpExpressionModel::new(&base, TIMEOUT).unwrap();
    assert_eq!(model.score_frame(&frame()).await.unwrap(), None);
}

#[tokio::test]
async fn test_model_error_status_is_a_detection_error() {
    let app = Router::new().route(
        "/detect_expressions",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": "inference failed" })),
            )
        }),
    );
    let base = spawn_service(app).await;

    let model = HttpExpressionModel::new(&base, TIMEOUT).unwrap();
    assert!(matches!(
        model.score_frame(&frame()).await,
        Err(Error::Detection(_))
    ));
}
