//! HTTP development server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, span)
//!     → handlers.rs
//!         /_router/routes, /_router/resolve → JSON
//!         any other GET → Navigator::resolve → HTML shell or 404
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use handlers::{AppState, X_ROUTE};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, HttpServer};
