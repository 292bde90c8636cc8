// Connection handling module
// Accepts a single TCP connection and serves HTTP/1.1 requests on it

use std::convert::Infallible;
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Version};
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::generator::GeneratorError;
use crate::handler;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Accept and process a connection, enforcing the connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so concurrent accepts cannot both slip under the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.access_log_enabled() {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve one connection in a spawned task.
///
/// The whole connection (including keep-alive reuse) is bounded by the larger
/// of the read and write timeouts; the counter is decremented when it ends.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let _guard = ConnectionGuard(conn_counter);
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { Ok::<_, Infallible>(serve(&req, &state, peer_addr)) }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }
    });
}

/// Releases one slot of the active connection count when dropped, unwinding included
struct ConnectionGuard(Arc<AtomicUsize>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Route one request and write its access log line
fn serve<B>(req: &Request<B>, state: &AppState, peer_addr: SocketAddr) -> Response<Full<Bytes>> {
    let received_at = Local::now();
    let started = Instant::now();
    let response = catch_handler_panic(state, || handler::handle_request(req, state));

    if state.access_log_enabled() {
        let entry = access_entry(req, &response, peer_addr, received_at, started.elapsed());
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    response
}

/// Run `handle`, turning a panic into the 500 JSON error response
fn catch_handler_panic<F>(state: &AppState, handle: F) -> Response<Full<Bytes>>
where
    F: FnOnce() -> Response<Full<Bytes>>,
{
    panic::catch_unwind(AssertUnwindSafe(handle)).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "request handler panicked".to_string());
        logger::log_error(&format!("Request handler panicked: {detail}"));

        let err = GeneratorError::Internal(detail);
        http::apply_common_headers(http::build_error_response(&err, false), &state.config.http)
    })
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    received_at: DateTime<Local>,
    elapsed: Duration,
) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    AccessLogEntry {
        client: peer_addr.ip(),
        received_at,
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(ToString::to_string),
        version: version_label(req.version()),
        status: response.status().as_u16(),
        bytes_sent: response.body().size_hint().exact().unwrap_or(0),
        referer: header("referer"),
        user_agent: header("user-agent"),
        elapsed,
    }
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else if version == Version::HTTP_09 {
        "0.9"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_access_entry_from_exchange() {
        let config = Config::load_from("does-not-exist/utilgen-test").unwrap();
        let state = AppState::new(&config);
        let req = Request::builder()
            .uri("/generate-password?length=4")
            .header("user-agent", "curl/8.5.0")
            .body(())
            .unwrap();
        let response = handler::handle_request(&req, &state);

        let entry = access_entry(
            &req,
            &response,
            "10.0.0.7:5000".parse().unwrap(),
            Local::now(),
            Duration::from_micros(250),
        );
        assert_eq!(entry.client.to_string(), "10.0.0.7");
        assert_eq!(entry.path, "/generate-password");
        assert_eq!(entry.query.as_deref(), Some("length=4"));
        assert_eq!(entry.status, 400);
        assert!(entry.bytes_sent > 0);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
        assert!(entry.referer.is_none());
        assert_eq!(entry.elapsed, Duration::from_micros(250));
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_500() {
        use http_body_util::BodyExt;

        let config = Config::load_from("does-not-exist/utilgen-test").unwrap();
        let state = AppState::new(&config);
        let response = catch_handler_panic(&state, || panic!("pool exploded"));
        assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "Internal Server Error", "details": "pool exploded" })
        );
    }

    #[test]
    fn test_handler_without_panic_passes_through() {
        let config = Config::load_from("does-not-exist/utilgen-test").unwrap();
        let state = AppState::new(&config);
        let response = catch_handler_panic(&state, http::build_404_response);
        assert_eq!(response.status(), hyper::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_guard_releases_slot_on_unwind() {
        let counter = Arc::new(AtomicUsize::new(1));
        let task_counter = Arc::clone(&counter);
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let _guard = ConnectionGuard(task_counter);
            panic!("connection task failed");
        }));
        assert!(outcome.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_2), "2");
    }
}
