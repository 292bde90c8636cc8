//! Request handler module
//!
//! Maps request paths and query parameters onto the generators and formats
//! their output as HTTP responses.

pub mod query;
pub mod router;
mod ui;

// Re-export main entry point
pub use router::handle_request;
