//! Built-in route tables of the application.
//!
//! Two role sections, declared in this order:
//! - `admin`: back-office layout with user and product management
//! - `user`: public layout with home, about and contact pages
//!
//! A config file with `[[sections]]` replaces these tables entirely.

mod admin;
mod user;

pub use admin::admin_section;
pub use user::user_section;

use crate::routing::RouteSection;

/// All built-in sections, in precedence order.
pub fn sections() -> Vec<RouteSection> {
    vec![admin_section(), user_section()]
}
