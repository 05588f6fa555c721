// Request-derived context and layers for the router

use axum::http::{header, HeaderMap};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;

use crate::mapping::url::RouteContext;

const FORWARDED_HOST: &str = "x-forwarded-host";
const FORWARDED_PROTO: &str = "x-forwarded-proto";
const REQUEST_ID: &str = "x-request-id";

/// Tracing middleware: one span per request with method, path and status
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Incoming `x-request-id`, or a fresh UUID v4
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Route context for link generation
///
/// A configured public base URL wins; otherwise proxy headers, then `Host`.
/// The scheme defaults to `http` when no proxy reports one. A request with
/// no usable host yields a context whose resolution fails.
pub fn route_context(headers: &HeaderMap, public_base_url: Option<&url::Url>) -> RouteContext {
    if let Some(base) = public_base_url {
        return RouteContext::from_base_url(base);
    }

    let host = first_value(headers, FORWARDED_HOST).or_else(|| first_value(headers, header::HOST.as_str()));
    let scheme = first_value(headers, FORWARDED_PROTO).unwrap_or_else(|| "http".to_string());

    RouteContext {
        scheme: Some(scheme),
        host,
        path_base: String::new(),
    }
}

fn first_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
