//! Declarative hierarchical view router.
//!
//! Route tables are declared per application section (admin, user, ...),
//! composed into one validated tree, and resolved against locations to
//! produce the chain of views to render.
//!
//! # Architecture Overview
//!
//! ```text
//!   [[sections]] / app tables
//!          │
//!          ▼
//!   ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!   │   routing    │───▶│  navigation  │───▶│    views     │
//!   │ compose/tree │    │  navigator   │    │ lazy loading │
//!   └──────────────┘    │   history    │    └──────────────┘
//!                       └──────┬───────┘
//!                              │
//!                              ▼
//!                       ┌──────────────┐
//!                       │     http     │  history-mode dev server
//!                       └──────────────┘
//!
//!   Cross-cutting: config, lifecycle, observability
//! ```

// Core subsystems
pub mod app;
pub mod navigation;
pub mod routing;
pub mod views;

// Serving
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::RouterAppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use navigation::{HistoryMode, NavigationError, NavigationTarget, Navigator};
pub use routing::{compose, ComposeOptions, RouteMatch, RouteRecord, RouteSection, RouteTree};
