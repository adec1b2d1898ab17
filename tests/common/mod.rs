#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use case_status_proxy::{
    AppState,
    config::{ClientCredentials, Config},
    router::create_router,
};
use serde_json::json;
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";

/// 上游中已经是统一格式的响应
pub const NORMALIZED_RECEIPT: &str = "EAC0000000002";
pub const NORMALIZED_BODY: &str = r#"{"case_status":{"receiptNumber":"EAC0000000002","formType":"I-130","current_case_status_text_en":"Case Was Received","hist_case_status":[]},"message":"ok"}"#;
/// 上游返回 500 的受理号
pub const FAILING_RECEIPT: &str = "EAC0000000500";
/// 上游返回非 JSON 文本的受理号
pub const PLAIN_TEXT_RECEIPT: &str = "EAC0000000003";
/// 上游返回 camelCase 格式的受理号
pub const CAMEL_RECEIPT: &str = "EAC0000000001";
/// 上游迟迟不响应的受理号
pub const SLOW_RECEIPT: &str = "EAC0000000408";
pub const SLOW_UPSTREAM_DELAY: Duration = Duration::from_secs(3);
/// 超出错误日志缓冲上限的上游错误页大小
pub const LARGE_ERROR_BODY_LEN: usize = 100_000;

#[derive(Debug, Clone)]
pub enum TokenMode {
    Issue { expires_in: serde_json::Value },
    Reject(StatusCode),
    Malformed,
}

#[derive(Debug, Clone, Copy)]
pub enum SampleMode {
    NotFound,
    Found,
    Fail(StatusCode),
    FailEmpty(StatusCode),
    FailLarge(StatusCode),
}

pub struct MockState {
    pub token_calls: AtomicUsize,
    pub case_calls: AtomicUsize,
    pub token_mode: Mutex<TokenMode>,
    pub sample_mode: Mutex<SampleMode>,
    pub last_form: Mutex<Option<HashMap<String, String>>>,
    pub last_authorization: Mutex<Option<String>>,
    pub last_content_type: Mutex<Option<String>>,
}

impl MockState {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn case_calls(&self) -> usize {
        self.case_calls.load(Ordering::SeqCst)
    }

    pub fn set_token_mode(&self, mode: TokenMode) {
        *self.token_mode.lock().unwrap() = mode;
    }

    pub fn set_sample_mode(&self, mode: SampleMode) {
        *self.sample_mode.lock().unwrap() = mode;
    }
}

pub struct MockUpstream {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    pub fn token_url(&self) -> String {
        format!("{}/oauth/accesstoken", self.base_url)
    }

    pub fn case_status_url(&self) -> String {
        format!("{}/case-status", self.base_url)
    }
}

async fn issue_token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let n = state.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
    *state.last_form.lock().unwrap() = Some(form);

    let mode = state.token_mode.lock().unwrap().clone();
    match mode {
        TokenMode::Issue { expires_in } => Json(json!({
            "access_token": format!("token-{}", n),
            "token_type": "BearerToken",
            "expires_in": expires_in
        }))
        .into_response(),
        TokenMode::Reject(status) => {
            (status, Json(json!({"ErrorCode": "invalid_client"}))).into_response()
        }
        TokenMode::Malformed => Json(json!({"token_type": "BearerToken"})).into_response(),
    }
}

async fn case_status(
    State(state): State<Arc<MockState>>,
    Path(receipt): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.case_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_authorization.lock().unwrap() = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_content_type.lock().unwrap() = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match receipt.as_str() {
        "EAC9999103403" => {
            let mode = *state.sample_mode.lock().unwrap();
            match mode {
                SampleMode::NotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({"code": "NOT_FOUND"})),
                )
                    .into_response(),
                SampleMode::Found => Json(json!({"receiptNumber": receipt})).into_response(),
                SampleMode::Fail(status) => {
                    (status, Json(json!({"fault": "maintenance"}))).into_response()
                }
                SampleMode::FailEmpty(status) => status.into_response(),
                SampleMode::FailLarge(status) => {
                    (status, "x".repeat(LARGE_ERROR_BODY_LEN)).into_response()
                }
            }
        }
        SLOW_RECEIPT => {
            tokio::time::sleep(SLOW_UPSTREAM_DELAY).await;
            Json(json!({"receiptNumber": receipt})).into_response()
        }
        FAILING_RECEIPT => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
        NORMALIZED_RECEIPT => (
            [("content-type", "application/json")],
            NORMALIZED_BODY,
        )
            .into_response(),
        PLAIN_TEXT_RECEIPT => "maintenance window".into_response(),
        CAMEL_RECEIPT => Json(json!({
            "receiptNumber": receipt,
            "formType": "I-485",
            "receivedDate": "2023-04-01",
            "lastUpdatedDate": "2024-03-05",
            "status": "Case Was Approved",
            "statusDescription": "We approved your Form I-485.",
            "caseHistory": [
                {"date": "2023-04-01", "description": "Case Was Received"},
                {"date": "2024-03-05", "description": "Case Was Approved"}
            ]
        }))
        .into_response(),
        _ => Json(json!({
            "receipt_number": receipt,
            "form_type": "I-130",
            "received_date": "2023-01-15",
            "status": "Approved",
            "caseHistory": [{"date": "2024-01-01", "status_description": "Filed"}]
        }))
        .into_response(),
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });
    format!("http://{}", addr)
}

pub async fn start_upstream() -> MockUpstream {
    let state = Arc::new(MockState {
        token_calls: AtomicUsize::new(0),
        case_calls: AtomicUsize::new(0),
        token_mode: Mutex::new(TokenMode::Issue {
            expires_in: json!(3600),
        }),
        sample_mode: Mutex::new(SampleMode::NotFound),
        last_form: Mutex::new(None),
        last_authorization: Mutex::new(None),
        last_content_type: Mutex::new(None),
    });

    let router = Router::new()
        .route("/oauth/accesstoken", post(issue_token))
        .route("/case-status/{receipt}", get(case_status))
        .with_state(state.clone());

    MockUpstream {
        base_url: serve(router).await,
        state,
    }
}

pub fn config_for(upstream: &MockUpstream) -> Config {
    Config {
        server_host: "127.0.0.1".into(),
        server_port: 0,
        credentials: ClientCredentials {
            client_id: CLIENT_ID.into(),
            client_secret: CLIENT_SECRET.into(),
        },
        token_url: upstream.token_url(),
        case_status_url: upstream.case_status_url(),
        request_timeout_secs: 5,
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").into(),
    }
}

pub struct TestApp {
    pub base_url: String,
    pub upstream: MockUpstream,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("request to proxy failed")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_timeout(5).await
}

pub async fn spawn_app_with_timeout(request_timeout_secs: u64) -> TestApp {
    let upstream = start_upstream().await;
    let config = Config {
        request_timeout_secs,
        ..config_for(&upstream)
    };
    let state = AppState::new(config).unwrap();
    let base_url = serve(create_router(state.clone())).await;

    TestApp {
        base_url,
        upstream,
        state,
        client: reqwest::Client::new(),
    }
}
