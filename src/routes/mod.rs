//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/evaluate", post(http::http_post_evaluate))
        .route("/api/v1/pinyin", post(http::http_post_pinyin))
        .route(
            "/api/v1/examples",
            get(http::http_get_examples).post(http::http_post_example),
        )
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

// Router-level tests: drive the real router with oneshot requests, enhancer
// disabled so everything stays offline and deterministic.
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn offline_router() -> Router {
        let state = AppState {
            examples: Arc::new(tokio::sync::RwLock::new(crate::seeds::seed_examples())),
            openai: None,
            prompts: Default::default(),
        };
        build_router(Arc::new(state))
    }

    async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let res = offline_router()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn evaluate_grades_free_text() {
        let (status, body) = post_json(
            offline_router(),
            "/api/v1/evaluate",
            json!({
                "question": "Translate: hello",
                "correctAnswer": "你好",
                "studentAnswer": "你好。",
                "questionType": "free_text"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 75);
        assert!(body["result"]["feedback"].as_str().unwrap().len() > 0);
    }

    #[tokio::test]
    async fn evaluate_accepts_empty_answers() {
        // Empty strings are valid inputs, not missing fields.
        let (status, body) = post_json(
            offline_router(),
            "/api/v1/evaluate",
            json!({ "correctAnswer": "", "studentAnswer": "" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 100);
    }

    #[tokio::test]
    async fn evaluate_rejects_missing_answer() {
        let (status, body) = post_json(
            offline_router(),
            "/api/v1/evaluate",
            json!({ "correctAnswer": "你好" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("studentAnswer"));
    }

    #[tokio::test]
    async fn evaluate_choice_is_case_sensitive() {
        let (status, body) = post_json(
            offline_router(),
            "/api/v1/evaluate",
            json!({ "correctAnswer": "A", "studentAnswer": "a", "questionType": "choice" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 0);
    }

    #[tokio::test]
    async fn evaluate_is_deterministic_across_requests() {
        let payload = json!({
            "correctAnswer": "你好，", "studentAnswer": "你好，吗"
        });
        let (_, a) = post_json(offline_router(), "/api/v1/evaluate", payload.clone()).await;
        let (_, b) = post_json(offline_router(), "/api/v1/evaluate", payload).await;
        assert_eq!(a["result"]["score"], 25);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn pinyin_endpoint_converts_locally() {
        let (status, body) =
            post_json(offline_router(), "/api/v1/pinyin", json!({ "text": "你好" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pinyin"], "nǐ hǎo");
    }

    #[tokio::test]
    async fn examples_can_be_added_and_listed() {
        let router = offline_router();
        let (status, created) = post_json(
            router.clone(),
            "/api/v1/examples",
            json!({
                "question": "Translate: goodbye",
                "correctAnswer": "再见",
                "studentAnswer": "在见",
                "score": 25,
                "feedback": "Close! Check the first character."
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();

        let res = router
            .oneshot(Request::builder().uri("/api/v1/examples").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
        let listed: Value = serde_json::from_slice(&bytes).unwrap();
        let ids: Vec<&str> = listed["examples"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&id.as_str()));
    }

    #[tokio::test]
    async fn examples_reject_off_scale_scores() {
        let (status, body) = post_json(
            offline_router(),
            "/api/v1/examples",
            json!({
                "question": "q", "correctAnswer": "你好", "studentAnswer": "你好",
                "score": 60, "feedback": "f"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("score"));
    }
}
