//! Static file server for single-page applications.
//!
//! Serves files from a configured document root over HTTP/1.1. Any request
//! path that does not resolve to an existing regular file is answered with
//! the configured fallback document (`/index.html` by default), so that a
//! client-side router can own arbitrary deep-link URLs.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
