//! Route table hot reload.
//!
//! # Data Flow
//! ```text
//! ConfigWatcher (valid config)
//!     → build_tree (compose sections)
//!     → Navigator::reload (atomic swap)
//! ```
//!
//! A config that loads but does not compose is logged and dropped; the
//! running tree stays in place.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::RouterAppConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::startup::build_tree;
use crate::navigation::Navigator;
use crate::routing::CompositionError;

/// Compose `config` and swap the result into `navigator`.
pub fn apply_config(navigator: &Navigator, config: &RouterAppConfig) -> Result<(), CompositionError> {
    match build_tree(config) {
        Ok(tree) => {
            navigator.reload(tree);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected route table; keeping current tree");
            Err(e)
        }
    }
}

/// Apply every config from `updates` until shutdown or the channel closes.
pub fn spawn_reload_task(
    mut updates: mpsc::UnboundedReceiver<RouterAppConfig>,
    navigator: Arc<Navigator>,
    shutdown: &Shutdown,
) -> JoinHandle<()> {
    let mut stop = shutdown.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(config) = updates.recv() => {
                    let _ = apply_config(&navigator, &config);
                }
                _ = stop.recv() => break,
                else => break,
            }
        }
        tracing::debug!("Config reload task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RouteRecord, RouteSection};
    use crate::views::StaticViewLoader;
    use crate::navigation::HistoryMode;
    use std::time::Duration;

    fn navigator() -> Arc<Navigator> {
        let tree = build_tree(&RouterAppConfig::default()).unwrap();
        Arc::new(Navigator::new(
            tree,
            Arc::new(StaticViewLoader::new()),
            HistoryMode::Memory,
            "/",
        ))
    }

    fn docs_config() -> RouterAppConfig {
        let mut config = RouterAppConfig::default();
        config.sections = vec![RouteSection::new(
            "docs",
            vec![RouteRecord::new("/docs", "page/docs").named("docs")],
        )];
        config
    }

    fn clashing_config() -> RouterAppConfig {
        let mut config = RouterAppConfig::default();
        config.sections = vec![
            RouteSection::new("a", vec![RouteRecord::new("/a", "page/a").named("page")]),
            RouteSection::new("b", vec![RouteRecord::new("/b", "page/b").named("page")]),
        ];
        config
    }

    #[test]
    fn test_valid_config_swaps_tree() {
        let nav = navigator();
        apply_config(&nav, &docs_config()).unwrap();

        assert_eq!(nav.resolve("/docs").unwrap().name.as_deref(), Some("docs"));
        assert!(nav.resolve("/admin/users").is_err());
    }

    #[test]
    fn test_bad_composition_keeps_current_tree() {
        let nav = navigator();
        assert!(apply_config(&nav, &clashing_config()).is_err());

        assert_eq!(nav.resolve("/admin/users").unwrap().name.as_deref(), Some("admin-user"));
        assert!(nav.resolve("/a").is_err());
    }

    #[tokio::test]
    async fn test_task_applies_updates_until_shutdown() {
        let nav = navigator();
        let shutdown = Shutdown::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = spawn_reload_task(rx, nav.clone(), &shutdown);

        tx.send(clashing_config()).unwrap();
        tx.send(docs_config()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), async {
            while nav.resolve("/docs").is_err() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }
}
