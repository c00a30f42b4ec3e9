// Server module entry point
// Provides listener creation and connection handling

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the module file keeps the short name on disk
#[path = "loop.rs"]
pub mod accept;

// Re-export commonly used entry points
pub use accept::run_accept_loop;
pub use listener::create_reusable_listener;
