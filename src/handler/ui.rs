// Web UI - single static page driving the three generator endpoints

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;

const INDEX_HTML: &str = include_str!("index.html");

/// Serve the generator page
pub fn serve_index(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(INDEX_HTML, is_head)
}
