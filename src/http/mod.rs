//! HTTP protocol layer module
//!
//! Response builders shared by the router and the proxy handler.

pub mod response;

pub use response::{
    build_404_response, build_405_response, build_error_response, build_health_response,
    build_options_response, build_relay_response,
};
