//! Access log line rendering
//!
//! `combined` and `common` follow the Apache/Nginx layouts, `json` emits one
//! object per line, and any other string is treated as a `$variable` pattern.

use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request, captured after the response was built
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub client: IpAddr,
    pub received_at: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    /// Protocol version label such as `1.1`
    pub version: &'static str,
    pub status: u16,
    pub bytes_sent: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub elapsed: Duration,
}

impl AccessLogEntry {
    /// Render the entry in the named format or as a custom pattern
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.common_line(),
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                dash_if_none(self.referer.as_deref()),
                dash_if_none(self.user_agent.as_deref()),
            ),
            "json" => self.json_line(),
            pattern => self.expand(pattern),
        }
    }

    fn target(&self) -> String {
        self.query
            .as_deref()
            .map_or_else(|| self.path.clone(), |q| format!("{}?{q}", self.path))
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.target(), self.version)
    }

    fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.client,
            self.received_at.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.bytes_sent,
        )
    }

    fn json_line(&self) -> String {
        serde_json::json!({
            "remote_addr": self.client.to_string(),
            "time": self.received_at.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.version,
            "status": self.status,
            "body_bytes": self.bytes_sent,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX),
        })
        .to_string()
    }

    /// Expand `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time` (seconds, 3
    /// decimals), `$status`, `$body_bytes_sent`, `$http_referer` and
    /// `$http_user_agent`.
    fn expand(&self, pattern: &str) -> String {
        // `$request` must come after every variable it prefixes
        let variables = [
            ("$remote_addr", self.client.to_string()),
            ("$time_local", self.received_at.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.received_at.to_rfc3339()),
            ("$request_time", format!("{:.3}", self.elapsed.as_secs_f64())),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.target()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.bytes_sent.to_string()),
            ("$http_referer", dash_if_none(self.referer.as_deref()).to_string()),
            ("$http_user_agent", dash_if_none(self.user_agent.as_deref()).to_string()),
        ];

        variables
            .iter()
            .fold(pattern.to_string(), |line, (name, value)| line.replace(name, value))
    }
}

fn dash_if_none(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AccessLogEntry {
        AccessLogEntry {
            client: "192.168.1.1".parse().unwrap(),
            received_at: Local::now(),
            method: "GET".to_string(),
            path: "/generate-password".to_string(),
            query: Some("length=20&numbers=true".to_string()),
            version: "1.1",
            status: 400,
            bytes_sent: 68,
            referer: Some("http://localhost:8080/".to_string()),
            user_agent: Some("curl/8.5.0".to_string()),
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_format_combined() {
        let line = sample().format("combined");
        assert!(line.starts_with("192.168.1.1 - - ["));
        assert!(line.contains("\"GET /generate-password?length=20&numbers=true HTTP/1.1\" 400 68"));
        assert!(line.ends_with("\"http://localhost:8080/\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_format_common_omits_headers() {
        let line = sample().format("common");
        assert!(line.ends_with("400 68"));
        assert!(!line.contains("curl"));
    }

    #[test]
    fn test_format_json() {
        let line = sample().format("json");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["status"], 400);
        assert_eq!(value["path"], "/generate-password");
        assert_eq!(value["query"], "length=20&numbers=true");
        assert_eq!(value["request_time_us"], 12_000);
    }

    #[test]
    fn test_format_custom() {
        let line = sample().format("$request_method $request_uri $status $request_time");
        assert_eq!(line, "GET /generate-password?length=20&numbers=true 400 0.012");
    }

    #[test]
    fn test_format_custom_without_query() {
        let mut entry = sample();
        entry.query = None;
        entry.user_agent = None;
        assert_eq!(entry.format("$request|$http_user_agent"), "GET /generate-password HTTP/1.1|-");
    }
}
