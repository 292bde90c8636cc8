//! HTTP response building module
//!
//! Builders for every status the service emits. Builders never panic: a failed
//! build is logged and replaced by a bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ALLOW, CACHE_CONTROL, CONTENT_LENGTH,
    CONTENT_TYPE, SERVER,
};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;
use crate::generator::GeneratorError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Body for a HEAD-aware response: headers are kept, payload dropped
fn body_for(content: Bytes, is_head: bool) -> Full<Bytes> {
    if is_head {
        Full::new(Bytes::new())
    } else {
        Full::new(content)
    }
}

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Short `text/plain` response; `allow` adds an `Allow` header
fn plain_text(status: StatusCode, text: &'static str, allow: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8");
    if allow {
        builder = builder.header(ALLOW, ALLOWED_METHODS);
    }

    builder
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut fallback = Response::new(Full::new(Bytes::from_static(text.as_bytes())));
            *fallback.status_mut() = status;
            fallback
        })
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::NOT_FOUND, "Not Found", false)
}

pub fn build_405_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", true)
}

pub fn build_413_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", false)
}

/// 204 answer to `OPTIONS`, with preflight headers when CORS is on
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
            .header(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
            .header(ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// The embedded UI page
pub fn build_html_response(content: &'static str, is_head: bool) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content.len())
        .header(CACHE_CONTROL, "no-cache")
        .body(body_for(Bytes::from_static(content.as_bytes()), is_head))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build JSON response
///
/// Serialization and builder failures surface as [`GeneratorError::Internal`]
/// so the caller's error path produces the 500 body.
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, GeneratorError> {
    let json = serde_json::to_string(body)?;

    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, json.len())
        .header(CACHE_CONTROL, "no-store")
        .body(body_for(Bytes::from(json), is_head))?)
}

/// Build the JSON error response for a failed generation.
///
/// Client errors carry their message as `error`; anything else becomes a 500
/// with a generic `error` and the failure text in `details`.
pub fn build_error_response(err: &GeneratorError, is_head: bool) -> Response<Full<Bytes>> {
    let (status, body) = if err.is_client_error() {
        (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": err.message() }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": "Internal Server Error",
                "details": err.message(),
            }),
        )
    };
    let json = body.to_string();

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, json.len())
        .body(body_for(Bytes::from(json), is_head))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut fallback = Response::new(Full::new(Bytes::from(
                r#"{"error":"Internal Server Error"}"#,
            )));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

/// Add headers shared by every response (`Server`, CORS origin)
pub fn apply_common_headers(
    mut response: Response<Full<Bytes>>,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    match HeaderValue::from_str(&http_config.server_name) {
        Ok(value) => {
            headers.insert(SERVER, value);
        }
        Err(e) => crate::logger::log_warning(&format!(
            "Invalid server_name '{}': {e}",
            http_config.server_name
        )),
    }
    if http_config.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    response
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_client_error_body() {
        let err = GeneratorError::invalid_argument("too short");
        let response = build_error_response(&err, false);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, serde_json::json!({ "error": "too short" }));
    }

    #[tokio::test]
    async fn test_internal_error_body() {
        let err = GeneratorError::Internal("disk on fire".to_string());
        let response = build_error_response(&err, false);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Internal Server Error", "details": "disk on fire" })
        );
    }

    #[tokio::test]
    async fn test_json_head_keeps_length_drops_body() {
        let response =
            build_json_response(StatusCode::OK, &serde_json::json!({ "uuid": "x" }), true).unwrap();
        assert_eq!(response.headers()[CONTENT_LENGTH], "12");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let response = build_405_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], ALLOWED_METHODS);
    }

    #[test]
    fn test_common_headers() {
        let config = HttpConfig {
            server_name: "utility-generator/0.1".to_string(),
            enable_cors: true,
            max_body_size: 1024,
        };
        let response = apply_common_headers(build_404_response(), &config);
        assert_eq!(response.headers()[SERVER], "utility-generator/0.1");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
