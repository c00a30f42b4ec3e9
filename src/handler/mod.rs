//! Request handler module
//!
//! Request entry point plus the SPA fallback rule: serve the requested file
//! if it exists, otherwise serve the configured fallback document.

pub mod router;
pub mod spa;

// Re-export main entry point
pub use router::handle_request;
