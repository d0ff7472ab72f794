//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Uploaded WAV files can exceed axum's 2 MB default.
const VOICE_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Session lifecycle
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/sessions/{id}/credential", put(handlers::session::set_credential))
        .route("/sessions/{id}/sound", post(handlers::session::enable_sound))
        .route("/sessions/{id}/launch", post(handlers::session::launch))
        .route("/sessions/{id}/reset", post(handlers::session::reset))
        // Chat
        .route(
            "/sessions/{id}/messages",
            get(handlers::chat::list_messages).post(handlers::chat::send_message),
        )
        .route(
            "/sessions/{id}/voice",
            post(handlers::chat::send_voice).layer(DefaultBodyLimit::max(VOICE_BODY_LIMIT)),
        )
        .route("/sessions/{id}/replay", get(handlers::chat::replay));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use pitchbot_types::config::AppConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn gemini_text(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
        })
    }

    fn test_router(server: &MockServer) -> Router {
        let mut config = AppConfig::default();
        config.llm.base_url = server.uri();
        config.llm.api_key_env = "PITCHBOT_ROUTER_TEST_UNSET_KEY".to_string();
        config.speech.recognizer_base_url = server.uri();
        config.speech.recognizer_api_key_env = "PITCHBOT_ROUTER_TEST_UNSET_SPEECH_KEY".to_string();
        config.speech.tts_base_url = server.uri();
        let state = AppState::from_config(config, std::env::temp_dir()).unwrap();
        build_router(state)
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create_session(router: &Router) -> String {
        let (status, json) = call(router, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn launched_session(router: &Router, server: &MockServer) -> String {
        let profile = json!({
            "companyName": "Acme",
            "tagline": "Everything for everyone",
            "description": "Acme sells anvils.",
            "services": ["Anvils", "Rockets"],
            "tone": "cheerful",
            "industry": "Manufacturing",
            "welcomeMessage": "Welcome to Acme!"
        });
        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .and(body_string_contains("Return ONLY JSON."))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gemini_text(&format!("```json\n{profile}\n```"))),
            )
            .mount(server)
            .await;

        let id = create_session(router).await;
        let (status, _) = call(
            router,
            "PUT",
            &format!("/api/v1/sessions/{id}/credential"),
            Some(json!({ "api_key": "test-key-not-real" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = call(
            router,
            "POST",
            &format!("/api/v1/sessions/{id}/launch"),
            Some(json!({ "company_name": "Acme", "website": "acme.test" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["profile"]["companyName"], "Acme");
        assert!(json["data"].get("notice").is_none());
        id
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let (status, json) = call(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_new_session_starts_in_setup() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = create_session(&router).await;

        let (status, json) = call(&router, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["phase"], "setup");
        assert_eq!(json["data"]["has_credential"], false);
        assert_eq!(json["data"]["audio_allowed"], false);
        assert_eq!(json["data"]["transcript"].as_array().unwrap().len(), 0);
        assert_eq!(json["_links"]["messages"], format!("/api/v1/sessions/{id}/messages"));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_session_ids() {
        let server = MockServer::start().await;
        let router = test_router(&server);

        let missing = uuid::Uuid::now_v7();
        let (status, json) = call(&router, "GET", &format!("/api/v1/sessions/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["errors"][0]["code"], "SESSION_NOT_FOUND");

        let (status, json) = call(&router, "GET", "/api/v1/sessions/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_launch_requires_credential_then_both_fields() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = create_session(&router).await;
        let launch = format!("/api/v1/sessions/{id}/launch");

        let (status, json) = call(
            &router,
            "POST",
            &launch,
            Some(json!({ "company_name": "Acme", "website": "acme.test" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "MISSING_CREDENTIAL");
        assert_eq!(json["errors"][0]["message"], "Enter API key to continue");

        call(
            &router,
            "PUT",
            &format!("/api/v1/sessions/{id}/credential"),
            Some(json!({ "api_key": "test-key-not-real" })),
        )
        .await;
        let (status, json) = call(
            &router,
            "POST",
            &launch,
            Some(json!({ "company_name": "Acme", "website": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["message"], "Fill both fields");
    }

    #[tokio::test]
    async fn test_text_chat_flow() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = launched_session(&router, &server).await;

        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .and(body_string_contains("Respond in 2-3 sentences"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(gemini_text("We sell anvils and rockets.")),
            )
            .mount(&server)
            .await;

        let messages = format!("/api/v1/sessions/{id}/messages");
        let (status, json) = call(
            &router,
            "POST",
            &messages,
            Some(json!({ "text": "What do you offer?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["reply"]["status"], "answer");
        assert_eq!(json["data"]["user"]["content"], "What do you offer?");
        assert_eq!(json["data"]["assistant"]["content"], "We sell anvils and rockets.");

        let (status, json) = call(&router, "GET", &messages, None).await;
        assert_eq!(status, StatusCode::OK);
        let turns = json["data"].as_array().unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0]["role"], "assistant");
        assert_eq!(turns[0]["content"], "Welcome to Acme!");
        assert_eq!(turns[1]["role"], "user");
        assert_eq!(turns[2]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_failed_model_call_is_a_transcript_entry() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = launched_session(&router, &server).await;

        Mock::given(method("POST"))
            .and(path(GEMINI_PATH))
            .and(body_string_contains("Respond in 2-3 sentences"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let (status, json) = call(
            &router,
            "POST",
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({ "text": "Hello?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["reply"]["status"], "failed");
        assert_eq!(json["data"]["assistant"]["failed"], true);
        assert!(json["data"]["assistant"]["content"].as_str().unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_messages_require_active_session() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = create_session(&router).await;

        let (status, json) = call(
            &router,
            "POST",
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({ "text": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["errors"][0]["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_voice_checks_sound_before_decoding() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = launched_session(&router, &server).await;
        let voice = format!("/api/v1/sessions/{id}/voice");

        let request = || {
            Request::builder()
                .method("POST")
                .uri(&voice)
                .header(header::CONTENT_TYPE, "audio/wav")
                .body(Body::from("not a wav file"))
                .unwrap()
        };

        let response = router.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        call(&router, "POST", &format!("/api/v1/sessions/{id}/sound"), None).await;
        let response = router.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_replay_returns_mp3() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = launched_session(&router, &server).await;

        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfb, 0x90]))
            .mount(&server)
            .await;

        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{id}/replay"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], &[0xff, 0xfb, 0x90]);
    }

    #[tokio::test]
    async fn test_replay_on_setup_session_conflicts() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = create_session(&router).await;
        let (status, json) = call(&router, "GET", &format!("/api/v1/sessions/{id}/replay"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["errors"][0]["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_reset_and_delete() {
        let server = MockServer::start().await;
        let router = test_router(&server);
        let id = launched_session(&router, &server).await;
        call(&router, "POST", &format!("/api/v1/sessions/{id}/sound"), None).await;

        let (status, json) = call(&router, "POST", &format!("/api/v1/sessions/{id}/reset"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], id.as_str());
        assert_eq!(json["data"]["phase"], "setup");
        assert_eq!(json["data"]["audio_allowed"], false);
        assert_eq!(json["data"]["has_credential"], false);
        assert!(json["data"]["profile"].is_null());

        let (status, json) = call(&router, "DELETE", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["deleted"], true);
        let (status, _) = call(&router, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
