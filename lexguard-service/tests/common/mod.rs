#![allow(dead_code)]

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use lexguard_service::config::{CorsConfig, LexguardConfig, OpenAiConfig, ProviderKind};
use lexguard_service::services::providers::mock::MockProvider;
use lexguard_service::startup::{build_router, AppState};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Router wired to a mock provider, driven in process.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockProvider>,
}

impl TestApp {
    pub fn new(provider: MockProvider) -> Self {
        Self::with_cors(provider, &CorsConfig::Permissive)
    }

    pub fn with_cors(provider: MockProvider, cors: &CorsConfig) -> Self {
        let provider = Arc::new(provider);
        let router =
            build_router(AppState::new(provider.clone()), cors).expect("Failed to build router");
        Self { router, provider }
    }

    /// Send a CORS preflight for `POST uri` from `origin`.
    pub async fn preflight(&self, uri: &str, origin: &str) -> axum::response::Response {
        let request = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,authorization")
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

pub fn test_config(base_url: &str, provider: ProviderKind) -> LexguardConfig {
    LexguardConfig {
        common: CoreConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        },
        openai: OpenAiConfig {
            api_key: Secret::new("sk-test-key".to_string()),
            model: "gpt-3.5-turbo".to_string(),
            base_url: base_url.to_string(),
        },
        provider,
        cors: CorsConfig::Permissive,
        otlp_endpoint: None,
    }
}

/// A request captured by [`StubOpenAi`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Local stand-in for the chat-completions endpoint. Replies with a fixed
/// status and body and records what it received.
pub struct StubOpenAi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubOpenAi {
    pub async fn spawn(status: StatusCode, body: &str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status,
            body: body.to_string(),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(stub_completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://127.0.0.1:{}/v1", port),
            requests,
        }
    }

    /// Reply with a well-formed completion whose content is `content`.
    pub async fn replying(content: &str) -> Self {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        });
        Self::spawn(StatusCode::OK, &body.to_string()).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn stub_completions(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .unwrap()
        .push(CapturedRequest {
            authorization,
            body,
        });

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}
