//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path matching
//! and formatting of generator output.

use crate::config::{AppState, GeneratorConfig};
use crate::generator::{GenerationRequest, GeneratorError};
use crate::handler::{query, ui};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub params: query::QueryParams,
    pub is_head: bool,
}

/// What a path resolves to
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Index,
    Generate(GenerationRequest),
    NotFound,
}

/// Main entry point for HTTP request handling
///
/// Never fails: generator errors become JSON error bodies here.
pub fn handle_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let http_config = &state.config.http;
    let method = req.method();
    let is_head = *method == Method::HEAD;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, http_config.enable_cors) {
        return http::apply_common_headers(resp, http_config);
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req, http_config.max_body_size) {
        return http::apply_common_headers(resp, http_config);
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 4. Dispatch
    let ctx = RequestContext {
        path: req.uri().path(),
        params: query::QueryParams::parse(req.uri().query()),
        is_head,
    };

    let response = route_request(&ctx, &state.config.generator).unwrap_or_else(|err| {
        if !err.is_client_error() {
            logger::log_error(&format!("{} failed: {err}", ctx.path));
        }
        http::build_error_response(&err, is_head)
    });

    http::apply_common_headers(response, http_config)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn resolve(ctx: &RequestContext<'_>, defaults: &GeneratorConfig) -> Route {
    match ctx.path {
        "/" => Route::Index,
        "/generate-uuid" => Route::Generate(GenerationRequest::Uuid),
        "/generate-password" => Route::Generate(query::password_request(&ctx.params, defaults)),
        "/generate-qrcode" => Route::Generate(query::qrcode_request(&ctx.params, defaults)),
        _ => Route::NotFound,
    }
}

/// Route request and run the matching generator
fn route_request(
    ctx: &RequestContext<'_>,
    defaults: &GeneratorConfig,
) -> Result<Response<Full<Bytes>>, GeneratorError> {
    match resolve(ctx, defaults) {
        Route::Index => Ok(ui::serve_index(ctx.is_head)),
        Route::Generate(request) => {
            let output = request.execute()?;
            http::build_json_response(StatusCode::OK, &output, ctx.is_head)
        }
        Route::NotFound => Ok(http::build_404_response()),
    }
}
