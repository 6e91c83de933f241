//! Test utilities for mintline-core
//!
//! Provides a mock Mintline API server that serves the description document
//! and canned responses for every built-in operation, recording each request
//! it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Credential the mock server expects
pub const MOCK_API_KEY: &str = "test-key";

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    description: Option<Arc<String>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock Mintline API server for testing and development
pub struct MockApiServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockApiServer {
    /// Start with the embedded Mintline description
    pub async fn start() -> Self {
        Self::start_with_description(Some(
            include_str!("../assets/openapi.json").to_string(),
        ))
        .await
    }

    /// Start with a custom description body; `None` makes the description
    /// endpoint answer 500
    pub async fn start_with_description(description: Option<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            description: description.map(Arc::new),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for one path
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    });

    let path = uri.path();
    if path == "/api/docs/openapi.json" {
        return match &state.description {
            Some(doc) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                doc.as_str().to_string(),
            )
                .into_response(),
            None => (StatusCode::INTERNAL_SERVER_ERROR, "description unavailable").into_response(),
        };
    }

    let authorized = header_text(header::AUTHORIZATION)
        .is_some_and(|v| v == format!("Bearer {}", MOCK_API_KEY));
    if !authorized {
        return failure(StatusCode::UNAUTHORIZED, Some("Invalid API key"));
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["api", "receipts"]) => ok(json!([
            {
                "id": "rcpt_1",
                "vendor": {"name": "Corner Cafe"},
                "totalAmount": "12.50",
                "currency": "USD",
                "purchaseDate": "2024-03-15T10:30:00Z"
            },
            {"id": "rcpt_2", "vendorName": "Hardware Co", "totalAmount": 88}
        ])),
        ("GET", ["api", "receipts", "rcpt_1"]) => ok(json!({
            "id": "rcpt_1",
            "vendor": {"name": "Corner Cafe"},
            "totalAmount": "12.50",
            "currency": "USD",
            "purchaseDate": "2024-03-15",
            "items": [{"description": "Latte", "totalPrice": "5.50"}],
            "matchedTransaction": {"id": "btxn_1", "description": "CORNER CAFE"}
        })),
        ("GET", ["api", "receipts", _]) => failure(StatusCode::NOT_FOUND, Some("Receipt not found")),
        ("GET", ["api", "transactions"]) => ok(json!([])),
        ("GET", ["api", "transactions", id]) => ok(json!({
            "id": id,
            "description": "CORNER CAFE",
            "amount": -12.5,
            "currency": "USD",
            "transactionDate": "2024-03-15",
            "transactionType": "debit"
        })),
        ("GET", ["api", "statements"]) => ok(json!([
            {"id": "stmt_1", "institutionName": "First Credit Union",
             "statementDate": "2024-02-29", "transactionCount": 41}
        ])),
        ("GET", ["api", "matches"]) => ok(json!([
            {"id": "match_1", "receiptId": "rcpt_1", "transactionId": "btxn_1",
             "confidenceScore": 0.93, "status": "proposed"}
        ])),
        ("POST", ["api", "matches", id, "confirm"]) => {
            ok(json!({"id": id, "status": "confirmed"}))
        }
        ("POST", ["api", "matches", id, "reject"]) => {
            let reason = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|b| b.get("reason").cloned());
            ok(json!({"id": id, "status": "rejected", "rejectionReason": reason}))
        }
        ("GET", ["api", "analytics", "spending"]) => ok(json!({
            "period": {"from": "2024-01-01", "to": "2024-03-31"},
            "summary": {"totalAmount": 2345.67, "receiptCount": 12, "averageAmount": 195.47,
                        "minAmount": 4.5, "maxAmount": 900}
        })),
        ("GET", ["api", "analytics", "top-vendors"]) => ok(json!({
            "vendors": [{"name": "Corner Cafe", "total": 1200, "count": 30}]
        })),
        ("GET", ["api", "analytics", "trends"]) => ok(json!({
            "trends": [{"month": "2024-01", "total": 450}]
        })),
        ("GET", ["api", "analytics", "unmatched"]) => ok(json!({
            "proposedMatches": {"count": 1},
            "unmatchedReceipts": {"count": 2, "totalAmount": 40},
            "unmatchedTransactions": {"count": 3, "totalAmount": 1500},
            "largeUnmatchedTransactions": {"threshold": 500, "count": 1},
            "actionItems": {"message": "You have 1 proposed match to review."}
        })),
        ("GET", ["api", "broken"]) => {
            (StatusCode::BAD_GATEWAY, "<html>upstream down</html>").into_response()
        }
        ("GET", ["api", "failing"]) => failure(StatusCode::INTERNAL_SERVER_ERROR, None),
        _ => failure(StatusCode::NOT_FOUND, Some("Route not found")),
    }
}

fn ok(data: Value) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn failure(status: StatusCode, message: Option<&str>) -> Response {
    let body = match message {
        Some(m) => json!({"success": false, "error": {"message": m}}),
        None => json!({"success": false}),
    };
    (status, Json(body)).into_response()
}
