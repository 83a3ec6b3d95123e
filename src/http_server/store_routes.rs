//! Store HTTP Routes
//!
//! Endpoints for typed key-value access:
//! - `POST /get` — exact lookup, or regex search over logical keys
//! - `POST /set` — store a `{type, data}` value at a key
//! - `GET /get_all` — every logical key with its value
//! - `DELETE /del` — remove a key (and its slice elements)

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::store::{SqliteStore, StoreError};
use crate::value::Value;

// ==================
// Shared State
// ==================

/// State shared across handlers
pub struct ApiState {
    pub store: SqliteStore,
}

impl ApiState {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct GetRequest {
    pub key: String,
    /// Treat `key` as a regular expression over logical keys
    #[serde(default)]
    pub use_regex: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetRequest {
    pub key: String,
    #[serde(flatten)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub key: String,
}

/// Business codes in the response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum ApiCode {
    Ok,
    Fail,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum FailReason {
    NoLegalParam,
    InnerError,
}

#[derive(Serialize)]
struct OkEnvelope<T: Serialize> {
    code: ApiCode,
    result: T,
}

#[derive(Serialize)]
struct FailEnvelope {
    code: ApiCode,
    msg: FailReason,
    detail: String,
}

fn ok<T: Serialize>(result: T) -> Response {
    (
        StatusCode::OK,
        Json(OkEnvelope {
            code: ApiCode::Ok,
            result,
        }),
    )
        .into_response()
}

fn fail(status: StatusCode, msg: FailReason, detail: impl Into<String>) -> Response {
    (
        status,
        Json(FailEnvelope {
            code: ApiCode::Fail,
            msg,
            detail: detail.into(),
        }),
    )
        .into_response()
}

/// Bad input gets a 400, everything else is the store's problem
fn store_failure(context: &str, err: StoreError) -> Response {
    match err {
        StoreError::InvalidKey { .. } | StoreError::Value(_) => {
            fail(StatusCode::BAD_REQUEST, FailReason::NoLegalParam, err.to_string())
        }
        other => {
            error!(context, error = %other, "store operation failed");
            fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                FailReason::InnerError,
                other.to_string(),
            )
        }
    }
}

// ==================
// Router
// ==================

/// Build the store router
pub fn store_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/get", post(handle_get))
        .route("/set", post(handle_set))
        .route("/get_all", get(handle_get_all))
        .route("/del", delete(handle_delete))
        .with_state(state)
}

/// Liveness probe, mounted at the server root
pub(super) async fn handle_health() -> Response {
    ok(serde_json::json!({"status": "ok"}))
}

async fn handle_get(State(state): State<Arc<ApiState>>, Json(req): Json<GetRequest>) -> Response {
    if !req.use_regex {
        return match state.store.get(&req.key) {
            Ok(Some(value)) => {
                let mut result = BTreeMap::new();
                result.insert(req.key, value);
                ok(result)
            }
            Ok(None) => fail(
                StatusCode::NOT_FOUND,
                FailReason::NoLegalParam,
                format!("no value at key {:?}", req.key),
            ),
            Err(err) => store_failure("get", err),
        };
    }

    let pattern = match regex::Regex::new(&req.key) {
        Ok(pattern) => pattern,
        Err(err) => {
            return fail(
                StatusCode::BAD_REQUEST,
                FailReason::NoLegalParam,
                format!("bad pattern: {}", err),
            )
        }
    };
    match state.store.get_all() {
        Ok(all) => {
            let matches: BTreeMap<String, Value> = all
                .into_iter()
                .filter(|(key, _)| pattern.is_match(key))
                .collect();
            if matches.is_empty() {
                return fail(
                    StatusCode::NOT_FOUND,
                    FailReason::NoLegalParam,
                    format!("no key matches {:?}", req.key),
                );
            }
            ok(matches)
        }
        Err(err) => store_failure("get", err),
    }
}

async fn handle_set(State(state): State<Arc<ApiState>>, Json(req): Json<SetRequest>) -> Response {
    match state.store.set(&req.key, &req.value) {
        Ok(()) => ok(serde_json::json!({"key": req.key})),
        Err(err) => store_failure("set", err),
    }
}

async fn handle_get_all(State(state): State<Arc<ApiState>>) -> Response {
    match state.store.get_all() {
        Ok(all) => ok(all),
        Err(err) => store_failure("get_all", err),
    }
}

async fn handle_delete(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<DeleteRequest>,
) -> Response {
    match state.store.delete(&req.key) {
        Ok(()) => ok(serde_json::json!({"key": req.key})),
        Err(err) => store_failure("delete", err),
    }
}
