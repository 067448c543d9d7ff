//! Request handler module
//!
//! Routing dispatch plus the GitHub organizations proxy.

pub mod proxy;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
