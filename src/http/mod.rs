//! HTTP protocol layer module
//!
//! Protocol-level helpers for the static file responses: MIME lookup, ETag
//! handling, Range parsing, and status response builders. Decoupled from the
//! routing logic in `handler`.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used functions
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_413_response, build_416_response, build_500_response, build_options_response,
};
