//! QR code image links
//!
//! Rendering is delegated to api.qrserver.com; only the URL is built here.

const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

pub const DEFAULT_QR_SIZE: u32 = 350;

/// Build the image URL for `text` rendered at `size`x`size` pixels.
///
/// Neither the text length nor the size is checked; the rendering service
/// decides what it accepts.
pub fn qr_code_url(text: &str, size: u32) -> String {
    format!(
        "{QR_SERVICE_URL}?size={size}x{size}&data={}",
        encode_uri_component(text)
    )
}

/// Percent-encode `s` with the same unreserved set as `encodeURIComponent`
pub fn encode_uri_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(b)),
            _ => {
                out.push('%');
                out.push(char::from(HEX[usize::from(b >> 4)]));
                out.push(char::from(HEX[usize::from(b & 0x0F)]));
            }
        }
    }
    out
}
