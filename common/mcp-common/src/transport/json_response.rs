//! Buffered JSON response mode for the HTTP transport
//!
//! The streamable HTTP service answers each POST with a short-lived SSE
//! stream. In JSON response mode the stream is drained and the JSON-RPC reply
//! it carried is returned as a single `application/json` body instead.
//! Responses that are not event streams (202 for notifications, errors) pass
//! through unchanged.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Upper bound on a buffered reply
const MAX_BUFFERED_BYTES: usize = 16 * 1024 * 1024;

/// Axum middleware converting per-request SSE replies into JSON bodies
pub async fn buffer_sse_reply(mut request: Request, next: Next) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    // The service rejects POSTs that do not accept both media types.
    request.headers_mut().insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/event-stream"),
    );

    let response = next.run(request).await;
    if !is_event_stream(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BUFFERED_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to buffer event stream: {}", e);
            return (StatusCode::BAD_GATEWAY, "Failed to buffer response").into_response();
        }
    };

    let Some(reply) = last_jsonrpc_reply(&String::from_utf8_lossy(&bytes)) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CACHE_CONTROL);
    Response::from_parts(parts, Body::from(reply))
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/event-stream"))
}

/// Extract the data of the last JSON-RPC response event in an SSE body
///
/// Events are separated by blank lines; multi-line `data:` fields are joined
/// with `\n`. Comments, keep-alives, priming events and notifications are
/// skipped.
pub fn last_jsonrpc_reply(stream: &str) -> Option<String> {
    let mut reply = None;
    let mut data: Vec<&str> = Vec::new();

    let mut flush = |data: &mut Vec<&str>| {
        if data.is_empty() {
            return;
        }
        let payload = data.join("\n");
        data.clear();
        if is_jsonrpc_response(&payload) {
            reply = Some(payload);
        }
    };

    for line in stream.lines() {
        if line.is_empty() {
            flush(&mut data);
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }
    flush(&mut data);

    reply
}

fn is_jsonrpc_response(payload: &str) -> bool {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(message)) => {
            message.contains_key("id")
                && (message.contains_key("result") || message.contains_key("error"))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::Request as HttpRequest, middleware, routing::post, Router};
    use tower::ServiceExt;

    const STREAM: &str = "data: \nid: 0\nretry: 3000\n\n\
        : keep-alive\n\n\
        data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\",\"params\":{}}\n\n\
        data: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"ok\":true}}\n\n";

    #[test]
    fn test_picks_response_over_notifications() {
        let reply = last_jsonrpc_reply(STREAM).unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["result"]["ok"], true);
    }

    #[test]
    fn test_multiline_data_is_joined() {
        let stream = "data: {\"jsonrpc\":\"2.0\",\ndata: \"id\":7,\"error\":{\"code\":-1}}\n";
        let reply = last_jsonrpc_reply(stream).unwrap();
        assert!(reply.contains("\"id\":7"));
    }

    #[test]
    fn test_no_reply_in_stream() {
        assert!(last_jsonrpc_reply(": ping\n\n").is_none());
        assert!(last_jsonrpc_reply("").is_none());
    }

    #[tokio::test]
    async fn test_middleware_converts_event_stream() {
        let app = Router::new()
            .route(
                "/mcp",
                post(|| async { ([(header::CONTENT_TYPE, "text/event-stream")], STREAM) }),
            )
            .layer(middleware::from_fn(buffer_sse_reply));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/mcp")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn test_middleware_passes_plain_responses() {
        let app = Router::new()
            .route("/mcp", post(|| async { StatusCode::ACCEPTED }))
            .layer(middleware::from_fn(buffer_sse_reply));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/mcp")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
