//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Composition (at startup / on reload):
//!     RouteSection[] (app literals or [[sections]] config)
//!     → compose.rs (join paths, validate names and collisions)
//!     → matcher.rs (compile path patterns)
//!     → Freeze as immutable RouteTree
//!
//! Resolution:
//!     location (path, query, fragment)
//!     → router.rs (depth-first lookup)
//!     → matcher.rs (evaluate segments, bind params)
//!     → Return: RouteMatch or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod compose;
pub mod matcher;
pub mod record;
pub mod router;

pub use compose::{compose, ComposeError, ComposeOptions, CompositionError};
pub use matcher::{Params, PathPattern, PatternError};
pub use record::{RouteRecord, RouteSection, ViewRef};
pub use router::{MatchedRecord, ResolveError, RouteMatch, RouteSummary, RouteTree};
