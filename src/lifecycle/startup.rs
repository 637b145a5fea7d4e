//! Startup orchestration.
//!
//! # Responsibilities
//! - Compose the route tree from configuration (or the built-in tables)
//! - Build the view loader and the navigator
//! - Load the HTML shell served by the development server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The navigator is created here once and passed around by `Arc`

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::app;
use crate::config::RouterAppConfig;
use crate::navigation::Navigator;
use crate::routing::{compose, ComposeOptions, CompositionError, RouteTree, ViewRef};
use crate::views::FsViewLoader;

/// Page served for matched locations when no shell file is configured.
pub const DEFAULT_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>view-router</title>
</head>
<body>
  <div id="app"></div>
</body>
</html>
"#;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error("failed to read shell `{path}`: {source}")]
    Shell {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Composition options derived from the router settings.
pub fn compose_options(config: &RouterAppConfig) -> ComposeOptions {
    ComposeOptions {
        sensitive: config.router.sensitive,
        not_found: config.router.not_found_view.as_deref().map(ViewRef::new),
    }
}

/// Compose the configured sections, or the built-in ones when none are set.
pub fn build_tree(config: &RouterAppConfig) -> Result<RouteTree, CompositionError> {
    let sections = if config.sections.is_empty() {
        tracing::debug!("No sections configured, using built-in route tables");
        app::sections()
    } else {
        config.sections.clone()
    };
    compose(sections, &compose_options(config))
}

/// Build the process-wide navigator.
pub fn init_navigator(config: &RouterAppConfig) -> Result<Arc<Navigator>, StartupError> {
    let tree = build_tree(config)?;
    let loader = Arc::new(FsViewLoader::new(
        config.views.root.clone(),
        config.views.extension.clone(),
    ));

    tracing::info!(
        routes = tree.len(),
        history = ?config.router.history,
        base = %config.router.base,
        views_root = %config.views.root,
        "Navigator initialized"
    );

    Ok(Arc::new(Navigator::new(
        tree,
        loader,
        config.router.history,
        config.router.base.clone(),
    )))
}

/// Read the configured HTML shell, falling back to `DEFAULT_SHELL`.
pub async fn load_shell(config: &RouterAppConfig) -> Result<Arc<str>, StartupError> {
    match &config.server.shell_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let html = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| StartupError::Shell { path, source })?;
            Ok(html.into())
        }
        None => Ok(DEFAULT_SHELL.into()),
    }
}
