// Configuration types
// One struct per config file section

use serde::Deserialize;

/// Root of the layered configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub generator: GeneratorConfig,
}

/// `[server]` - listen address and runtime sizing
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; CPU core count when unset
    pub workers: Option<usize>,
}

/// `[logging]`
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Write one access log line per request
    pub access_log: bool,
    /// Log the header count of every request
    pub show_headers: bool,
    /// `combined`, `common`, `json`, or a custom `$variable` pattern
    pub access_log_format: String,
    /// Access/info log file; stdout when unset
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error/warning log file; stderr when unset
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// `[performance]` - connection limits and timeouts (seconds)
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Zero disables HTTP keep-alive
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    /// Connections beyond this are dropped on accept
    pub max_connections: Option<u64>,
}

/// `[http]` - response-wide settings
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    /// Send `Access-Control-Allow-Origin: *`
    pub enable_cors: bool,
    /// Largest accepted `Content-Length`, in bytes
    pub max_body_size: u64,
}

/// `[generator]` - defaults applied at the request boundary
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Password length used when `length` is missing, unparseable or zero
    pub default_password_length: usize,
    /// Pixel size requested from the QR rendering service
    pub qr_size: u32,
    /// Text encoded when `text` is missing or empty
    pub default_qr_text: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_password_length: 16,
            qr_size: crate::generator::DEFAULT_QR_SIZE,
            default_qr_text: "Hello, World!".to_string(),
        }
    }
}
