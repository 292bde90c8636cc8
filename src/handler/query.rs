//! Query string parsing
//!
//! Decodes `application/x-www-form-urlencoded` parameters and turns them into
//! generation requests with the same leniency browsers show.

use crate::config::GeneratorConfig;
use crate::generator::{GenerationRequest, PasswordOptions};

/// Decoded query parameters in arrival order
#[derive(Debug, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// True only for the literal string `"true"`
    pub fn flag(&self, name: &str) -> bool {
        self.get(name) == Some("true")
    }
}

/// Build the password request: lenient `length`, four class flags.
///
/// The exclusion refinements are not reachable from the query string.
pub fn password_request(params: &QueryParams, defaults: &GeneratorConfig) -> GenerationRequest {
    GenerationRequest::Password {
        length: parse_length(params.get("length"), defaults.default_password_length),
        options: PasswordOptions {
            lowercase: params.flag("lowercase"),
            uppercase: params.flag("uppercase"),
            numbers: params.flag("numbers"),
            symbols: params.flag("symbols"),
            ..PasswordOptions::default()
        },
    }
}

/// Build the QR request; missing or empty `text` uses the configured default
pub fn qrcode_request(params: &QueryParams, defaults: &GeneratorConfig) -> GenerationRequest {
    let text = params
        .get("text")
        .filter(|t| !t.is_empty())
        .unwrap_or(defaults.default_qr_text.as_str());

    GenerationRequest::QrCode {
        text: text.to_string(),
        size: Some(defaults.qr_size),
    }
}

/// Resolve `length` the way `parseInt(raw) || default` does.
///
/// Missing, unparseable and zero values fall back to `default`. Negative values
/// map to 0 so the generator rejects them with its usual message.
pub fn parse_length(raw: Option<&str>, default: usize) -> usize {
    match raw.and_then(parse_int_prefix) {
        None | Some((_, 0)) => default,
        Some((true, _)) => 0,
        Some((false, n)) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

/// Parse the leading integer of `s` as `(is_negative, magnitude)`.
///
/// Leading whitespace and a sign are accepted, a `0x` prefix switches to hex,
/// and parsing stops at the first non-digit. Overflow saturates.
fn parse_int_prefix(s: &str) -> Option<(bool, u64)> {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: Option<u64> = None;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        let acc = value.unwrap_or(0);
        value = Some(
            acc.checked_mul(u64::from(radix))
                .and_then(|v| v.checked_add(u64::from(d)))
                .unwrap_or(u64::MAX),
        );
    }

    value.map(|v| (negative, v))
}
