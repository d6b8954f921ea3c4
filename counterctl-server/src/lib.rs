//! counterctl-server: HTTP front end for the persisted counter
//!
//! Serves the home and counter pages, the form triggers behind the
//! Increment / Reset buttons, and a small JSON API over the same operations.

pub mod http;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
