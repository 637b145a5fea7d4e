//! View loading subsystem.
//!
//! # Data Flow
//! ```text
//! Navigator (after resolve)
//!     → registry.rs (cached? return; in flight? wait; else start load)
//!     → loader.rs (file system or in-memory source)
//!     → View handed back to the navigator, which commits the navigation
//! ```

pub mod loader;
pub mod registry;

pub use loader::{FsViewLoader, StaticViewLoader, View, ViewError, ViewLoader};
pub use registry::ViewRegistry;
