//! HTTP query endpoint
//!
//! A read-only JSON view of the address space. The whole path space is
//! served by one fallback handler; the query string, when present, is a
//! single attribute selector rather than key=value pairs.
//!
//! Status semantics: 200 for served JSON, 204 when a VALUE query hits an
//! unreadable method, 400 for non-GET methods and unknown selectors, 404
//! for unknown paths. Error bodies are empty.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use oscquery_core::{serialize_node, AddressSpace};
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::HostInfo;

/// Attribute selectors honored in the query string
const SELECTORS: [&str; 11] = [
    "FULL_PATH",
    "CONTENTS",
    "TYPE",
    "ACCESS",
    "RANGE",
    "DESCRIPTION",
    "TAGS",
    "CRITICAL",
    "CLIPMODE",
    "VALUE",
    "HOST_INFO",
];

#[derive(Clone)]
pub(crate) struct AppState {
    pub tree: Arc<RwLock<AddressSpace>>,
    pub host_info: Arc<HostInfo>,
}

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(query)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn query(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let selector = uri.query();
    if let Some(selector) = selector {
        if !SELECTORS.contains(&selector) {
            return StatusCode::BAD_REQUEST.into_response();
        }
        // HOST_INFO is a side channel; the path is irrelevant
        if selector == "HOST_INFO" {
            return Json(serde_json::to_value(state.host_info.as_ref()).unwrap_or_default())
                .into_response();
        }
    }

    let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();
    let full_path = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    };

    // Shared lock held across serialization so the response is a
    // self-consistent snapshot of the subtree.
    let tree = state.tree.read();
    let Some(node) = tree.lookup(&full_path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match selector {
        None => Json(serialize_node(node, &full_path)).into_response(),
        Some("VALUE") if !node.access().is_some_and(|access| access.readable()) => {
            StatusCode::NO_CONTENT.into_response()
        }
        Some(selector) => {
            let serialized = serialize_node(node, &full_path);
            let attribute = serialized
                .get(selector)
                .cloned()
                .unwrap_or(JsonValue::Null);
            let mut body = serde_json::Map::new();
            body.insert(selector.to_string(), attribute);
            Json(JsonValue::Object(body)).into_response()
        }
    }
}
