//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! push / replace / go(delta)
//!     → navigator.rs (resolve target against the current RouteTree)
//!     → views::ViewRegistry (await every view of the matched chain)
//!     → history.rs (commit entry)
//!     → watch channel (publish current route to subscribers)
//! ```
//!
//! # Design Decisions
//! - One navigator per process, created by `lifecycle::startup`
//! - A navigation is committed only after its views are ready

pub mod history;
pub mod navigator;

pub use history::{History, HistoryMode};
pub use navigator::{NavigationError, NavigationTarget, Navigator};
