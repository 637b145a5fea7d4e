//! The navigation engine.
//!
//! # Responsibilities
//! - Resolve locations and named targets against the current route tree
//! - Await every view of the matched chain before committing a navigation
//! - Track history and publish the current route to subscribers
//!
//! # Design Decisions
//! - Constructed once at startup and shared by `Arc`; no global instance
//! - Resolution is synchronous; only view loading suspends
//! - The newest navigation wins: an older one that finishes loading later
//!   is reported as superseded and not committed
//! - The history lock is never held across an await

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use arc_swap::ArcSwap;
use thiserror::Error;
use tokio::sync::watch;

use crate::navigation::history::{History, HistoryMode};
use crate::observability::metrics;
use crate::routing::{Params, ResolveError, RouteMatch, RouteTree};
use crate::views::{ViewError, ViewLoader, ViewRegistry};

/// Where to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// App-relative location, e.g. `/admin/users?page=2`.
    Path(String),
    /// Named route with parameters.
    Named { name: String, params: Params },
}

impl NavigationTarget {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: Params::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Named { params, .. } = &mut self {
            params.insert(key.into(), value.into());
        }
        self
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

/// Errors that can occur while navigating.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to load views for `{path}`: {source}")]
    ViewLoad {
        path: String,
        #[source]
        source: ViewError,
    },

    #[error("navigation to `{0}` was superseded by a newer navigation")]
    Superseded(String),

    #[error("no history entry {0} steps away")]
    HistoryOutOfRange(isize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Push,
    Replace,
    Go(isize),
}

/// Router instance: resolves, navigates and exposes the current route.
#[derive(Debug)]
pub struct Navigator {
    tree: ArcSwap<RouteTree>,
    views: ViewRegistry,
    mode: HistoryMode,
    base: String,
    history: Mutex<History>,
    current: watch::Sender<Option<Arc<RouteMatch>>>,
    latest: AtomicU64,
}

impl Navigator {
    pub fn new(
        tree: RouteTree,
        loader: Arc<dyn ViewLoader>,
        mode: HistoryMode,
        base: impl Into<String>,
    ) -> Self {
        let (current, _) = watch::channel(None);
        metrics::record_route_count(tree.len());
        Self {
            tree: ArcSwap::from_pointee(tree),
            views: ViewRegistry::new(loader),
            mode,
            base: base.into(),
            history: Mutex::new(History::new()),
            current,
            latest: AtomicU64::new(0),
        }
    }

    /// Snapshot of the active route tree.
    pub fn tree(&self) -> Arc<RouteTree> {
        self.tree.load_full()
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve an app-relative location without navigating.
    pub fn resolve(&self, location: &str) -> Result<RouteMatch, ResolveError> {
        let result = self.tree.load().resolve(location);
        metrics::record_resolution(result.is_ok());
        result
    }

    /// Resolve a navigation target without navigating.
    pub fn resolve_target(&self, target: &NavigationTarget) -> Result<RouteMatch, ResolveError> {
        match target {
            NavigationTarget::Path(location) => self.resolve(location),
            NavigationTarget::Named { name, params } => {
                let result = self.tree.load().resolve_named(name, params);
                metrics::record_resolution(result.is_ok());
                result
            }
        }
    }

    /// Resolve a browser location for the configured history mode.
    pub fn resolve_location(&self, location: &str) -> Result<RouteMatch, ResolveError> {
        self.resolve(&self.mode.location_to_path(&self.base, location))
    }

    /// Link for a target in the configured history mode.
    pub fn href(&self, target: &NavigationTarget) -> Result<String, ResolveError> {
        let route = self.resolve_target(target)?;
        Ok(self.mode.href(&self.base, &route.full_path))
    }

    /// Navigate to a target, adding a history entry.
    pub async fn push(
        &self,
        target: impl Into<NavigationTarget>,
    ) -> Result<Arc<RouteMatch>, NavigationError> {
        let route = self.resolve_target(&target.into())?;
        self.navigate(route, Commit::Push).await
    }

    /// Navigate to a target, replacing the current history entry.
    pub async fn replace(
        &self,
        target: impl Into<NavigationTarget>,
    ) -> Result<Arc<RouteMatch>, NavigationError> {
        let route = self.resolve_target(&target.into())?;
        self.navigate(route, Commit::Replace).await
    }

    /// Move `delta` entries through history.
    pub async fn go(&self, delta: isize) -> Result<Arc<RouteMatch>, NavigationError> {
        let location = self
            .lock_history()
            .peek(delta)
            .map(str::to_string)
            .ok_or(NavigationError::HistoryOutOfRange(delta))?;
        let route = self.resolve(&location)?;
        self.navigate(route, Commit::Go(delta)).await
    }

    pub async fn back(&self) -> Result<Arc<RouteMatch>, NavigationError> {
        self.go(-1).await
    }

    pub async fn forward(&self) -> Result<Arc<RouteMatch>, NavigationError> {
        self.go(1).await
    }

    /// The route of the last committed navigation.
    pub fn current_route(&self) -> Option<Arc<RouteMatch>> {
        self.current.borrow().clone()
    }

    /// Observe committed navigations.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RouteMatch>>> {
        self.current.subscribe()
    }

    /// Current history entries and position.
    pub fn history(&self) -> History {
        self.lock_history().clone()
    }

    /// Swap in a new route tree. Cached views are dropped; the current route
    /// stays published until the next navigation.
    pub fn reload(&self, tree: RouteTree) {
        tracing::info!(routes = tree.len(), "Route tree reloaded");
        metrics::record_route_count(tree.len());
        self.tree.store(Arc::new(tree));
        self.views.clear();
    }

    async fn navigate(
        &self,
        route: RouteMatch,
        commit: Commit,
    ) -> Result<Arc<RouteMatch>, NavigationError> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let start = Instant::now();

        tracing::debug!(
            path = %route.full_path,
            name = ?route.name,
            views = route.matched.len(),
            "Navigation started"
        );

        let loaded = self.views.get_all(route.views()).await;
        if let Err(source) = loaded {
            metrics::record_navigation("view_error", start);
            tracing::warn!(path = %route.full_path, error = %source, "Navigation aborted");
            return Err(NavigationError::ViewLoad {
                path: route.full_path,
                source,
            });
        }

        if self.latest.load(Ordering::SeqCst) != ticket {
            metrics::record_navigation("superseded", start);
            tracing::debug!(path = %route.full_path, "Navigation superseded");
            return Err(NavigationError::Superseded(route.full_path));
        }

        {
            let mut history = self.lock_history();
            match commit {
                Commit::Push => history.push(route.full_path.clone()),
                Commit::Replace => history.replace(route.full_path.clone()),
                Commit::Go(delta) => {
                    if history.go(delta).is_none() {
                        return Err(NavigationError::HistoryOutOfRange(delta));
                    }
                }
            }
        }

        let route = Arc::new(route);
        self.current.send_replace(Some(route.clone()));
        metrics::record_navigation("ok", start);
        tracing::info!(path = %route.full_path, name = ?route.name, "Navigated");
        Ok(route)
    }

    fn lock_history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
