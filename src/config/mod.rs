//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! router.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterAppConfig (validated, immutable)
//!     → lifecycle::startup composes the route tree from it
//!
//! On change:
//!     watcher.rs detects change
//!     → loader.rs loads and validates
//!     → new tree composed
//!     → Navigator::reload swaps it in atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    LogFormat, ObservabilityConfig, RouterAppConfig, RouterConfig, ServerConfig, ViewsConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
