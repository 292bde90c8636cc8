//! Generator module
//!
//! Stateless value generators: UUIDs, passwords and QR code image links.
//! Nothing here performs I/O or keeps state between calls.

pub mod charset;
mod error;
mod identifier;
pub mod password;
pub mod qrcode;
mod request;

pub use error::GeneratorError;
pub use password::PasswordOptions;
pub use qrcode::DEFAULT_QR_SIZE;
pub use request::GenerationRequest;
