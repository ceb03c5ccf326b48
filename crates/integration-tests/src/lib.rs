//! End-to-end test support for the RMP ordering portal.
//!
//! Each test serves the real router on an ephemeral port and drives it with
//! a cookie-keeping HTTP client, so every [`TestClient`] behaves like its own
//! browser. Product advice is pointed at [`FakeGemini`], a tiny axum app
//! that answers `generateContent` with a canned reply.
//!
//! Run with: `cargo test -p rmp-portal-integration-tests`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use reqwest::Client;
use rmp_portal::config::{GeminiConfig, PortalConfig};
use rmp_portal::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Admin secret used by every test portal.
pub const TEST_ADMIN_PASSWORD: &str = "test-admin-secret";

/// Deep-link recipient used by every test portal.
pub const TEST_WHATSAPP_NUMBER: &str = "919998471567";

/// API key the fake advisor expects.
pub const TEST_API_KEY: &str = "test-gemini-key";

/// Base URL that refuses connections, for network-failure cases.
pub const CLOSED_PORT_URL: &str = "http://127.0.0.1:1";

/// Gemini configuration pointing at `api_base`.
#[must_use]
pub fn gemini_config(api_base: &str, api_key: Option<&str>) -> GeminiConfig {
    GeminiConfig {
        api_key: api_key.map(SecretString::from),
        model: "gemini-test".to_string(),
        api_base: api_base.trim_end_matches('/').to_string(),
        timeout: Duration::from_secs(5),
    }
}

/// Portal configuration for tests.
#[must_use]
pub fn test_config(gemini: GeminiConfig) -> PortalConfig {
    PortalConfig {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        base_url: "http://localhost".to_string(),
        admin_password: SecretString::from(TEST_ADMIN_PASSWORD),
        admin_password_is_default: false,
        session_idle: Duration::from_secs(600),
        whatsapp_number: TEST_WHATSAPP_NUMBER.to_string(),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../portal/static"),
        gemini,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Serve `router` on an ephemeral local port and return its address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

/// A running portal.
pub struct TestPortal {
    pub base_url: String,
}

impl TestPortal {
    /// Start a portal whose advisor is configured by `gemini`.
    pub async fn start(gemini: GeminiConfig) -> Self {
        let state = AppState::new(test_config(gemini)).expect("Failed to build state");
        let addr = serve(rmp_portal::build_router(state)).await;
        Self {
            base_url: format!("http://{addr}"),
        }
    }

    /// Start a portal with no advisory credential.
    pub async fn without_advisor() -> Self {
        Self::start(gemini_config(CLOSED_PORT_URL, None)).await
    }

    /// A new browser for this portal.
    #[must_use]
    pub fn browser(&self) -> TestClient {
        TestClient::new(&self.base_url)
    }
}

/// One browser: a cookie-keeping client that does not follow redirects.
pub struct TestClient {
    pub client: Client,
    pub base_url: String,
}

impl TestClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// GET a fragment the way htmx does.
    pub async fn get_fragment(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("HX-Request", "true")
            .send()
            .await
            .expect("GET failed")
    }

    /// POST a form as a plain browser submission.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// POST a form the way htmx does.
    pub async fn post_fragment(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Body of the current page.
    pub async fn page(&self) -> String {
        self.get("/").await.text().await.expect("page body")
    }

    /// Sign in with the admin secret.
    pub async fn login_admin(&self) {
        let resp = self
            .post_form(
                "/auth/login",
                &[("name", ""), ("phone", ""), ("password", TEST_ADMIN_PASSWORD)],
            )
            .await;
        assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
    }

    /// Sign in as a customer.
    pub async fn login_customer(&self, name: &str, phone: &str) {
        let resp = self
            .post_form(
                "/auth/login",
                &[("name", name), ("phone", phone), ("password", "")],
            )
            .await;
        assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
    }

    /// Poll the advice modal until it stops loading, and return it.
    pub async fn wait_for_advice(&self) -> String {
        for _ in 0..100 {
            let body = self
                .get_fragment("/order/advice")
                .await
                .text()
                .await
                .expect("modal body");
            if !body.contains("every 1s") {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("advice modal never left the loading state");
    }
}

/// What the fake advisor answers with.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// A candidate carrying this text.
    Text(&'static str),
    /// A candidate carrying this text, after a delay.
    Delayed(Duration, &'static str),
    /// An API error with this status.
    Status(u16),
}

/// A request the fake advisor received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// Fake `generateContent` endpoint.
pub struct FakeGemini {
    pub base_url: String,
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeGemini {
    /// Start a fake advisor that always answers with `reply`.
    pub async fn start(reply: FakeReply) -> Self {
        let calls: Arc<Mutex<Vec<RecordedCall>>> = Arc::default();
        let recorded = Arc::clone(&calls);

        let router = Router::new().fallback(
            move |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| {
                let recorded = Arc::clone(&recorded);
                let reply = reply.clone();
                async move {
                    recorded.lock().await.push(RecordedCall {
                        path: uri.path().to_string(),
                        api_key: headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body,
                    });
                    respond(reply).await
                }
            },
        );

        let addr = serve(router).await;
        Self {
            base_url: format!("http://{addr}"),
            calls,
        }
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

async fn respond(reply: FakeReply) -> Response {
    match reply {
        FakeReply::Text(text) => Json(candidate(text)).into_response(),
        FakeReply::Delayed(delay, text) => {
            tokio::time::sleep(delay).await;
            Json(candidate(text)).into_response()
        }
        FakeReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({
                "error": { "code": code, "message": "simulated failure", "status": "UNAVAILABLE" }
            });
            (status, Json(body)).into_response()
        }
    }
}

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
