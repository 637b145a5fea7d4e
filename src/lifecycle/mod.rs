//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Compose route tree → Build navigator → Start server
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Reload (reload.rs):
//!     Config change → Compose → Swap tree (or keep the old one)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then the tree, then listeners
//! - Every long-running task listens on the same `Shutdown`

pub mod reload;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use reload::{apply_config, spawn_reload_task};
pub use shutdown::Shutdown;
pub use signals::{spawn_signal_handler, wait_for_signal};
pub use startup::{build_tree, compose_options, init_navigator, load_shell, StartupError};
