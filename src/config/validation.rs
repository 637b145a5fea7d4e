//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses
//! - Check section naming
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RouterAppConfig → Result<(), Vec<ValidationError>>
//! - Route table rules (names, collisions, patterns) belong to
//!   `routing::compose`, which runs when the tree is built

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterAppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("router.base must start with `/`, got `{0}`")]
    InvalidBase(String),

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("sections[{0}].name must not be empty")]
    UnnamedSection(usize),

    #[error("section `{0}` is declared more than once")]
    DuplicateSection(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &RouterAppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if !config.router.base.starts_with('/') {
        errors.push(ValidationError::InvalidBase(config.router.base.clone()));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.views.root.trim().is_empty() {
        errors.push(ValidationError::Empty("views.root"));
    }
    if config.views.extension.trim().is_empty() {
        errors.push(ValidationError::Empty("views.extension"));
    }
    if matches!(&config.router.not_found_view, Some(v) if v.trim().is_empty()) {
        errors.push(ValidationError::Empty("router.not_found_view"));
    }

    let mut names = HashSet::new();
    for (i, section) in config.sections.iter().enumerate() {
        if section.name.trim().is_empty() {
            errors.push(ValidationError::UnnamedSection(i));
        } else if !names.insert(section.name.as_str()) {
            errors.push(ValidationError::DuplicateSection(section.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
