//! Lazy, memoized view loading.
//!
//! # Responsibilities
//! - Load each view on first use
//! - Share one in-flight load between concurrent navigations
//! - Cache successful loads until the registry is cleared
//!
//! # Design Decisions
//! - One `OnceCell` per view reference, stored in a `DashMap`
//! - Failed loads are not cached and are not retried automatically; the
//!   next navigation to the view tries again
//! - No cancellation: a started load runs to completion

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use futures_util::future::try_join_all;
use tokio::sync::OnceCell;

use crate::observability::metrics;
use crate::routing::ViewRef;
use crate::views::loader::{View, ViewError, ViewLoader};

/// Cache of loaded views in front of a `ViewLoader`.
#[derive(Debug)]
pub struct ViewRegistry {
    loader: Arc<dyn ViewLoader>,
    cache: DashMap<ViewRef, Arc<OnceCell<Arc<View>>>>,
}

impl ViewRegistry {
    pub fn new(loader: Arc<dyn ViewLoader>) -> Self {
        Self {
            loader,
            cache: DashMap::new(),
        }
    }

    /// Get a view, loading it on first use.
    pub async fn get(&self, view: &ViewRef) -> Result<Arc<View>, ViewError> {
        // Clone the cell out so the map shard is not held across the await.
        let cell = self.cache.entry(view.clone()).or_default().clone();

        cell.get_or_try_init(|| async {
            let start = Instant::now();
            tracing::debug!(view = %view, "Loading view");

            match self.loader.load(view).await {
                Ok(loaded) => {
                    metrics::record_view_load(true, start);
                    tracing::debug!(view = %view, elapsed = ?start.elapsed(), "View loaded");
                    Ok(Arc::new(loaded))
                }
                Err(e) => {
                    metrics::record_view_load(false, start);
                    tracing::warn!(view = %view, error = %e, "View failed to load");
                    Err(e)
                }
            }
        })
        .await
        .map(Arc::clone)
    }

    /// Load several views concurrently, preserving order.
    pub async fn get_all<'a>(
        &self,
        views: impl IntoIterator<Item = &'a ViewRef>,
    ) -> Result<Vec<Arc<View>>, ViewError> {
        try_join_all(views.into_iter().map(|v| self.get(v))).await
    }

    /// True once a view has been loaded successfully.
    pub fn is_loaded(&self, view: &ViewRef) -> bool {
        self.cache
            .get(view)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    /// Number of views currently loaded.
    pub fn loaded_count(&self) -> usize {
        self.cache.iter().filter(|e| e.value().initialized()).count()
    }

    /// Drop every cached view.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::loader::StaticViewLoader;
    use futures_util::future::{BoxFuture, FutureExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingLoader {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl ViewLoader for CountingLoader {
        fn load<'a>(&'a self, view: &'a ViewRef) -> BoxFuture<'a, Result<View, ViewError>> {
            async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                if self.fail_first && call == 0 {
                    return Err(ViewError::Failed {
                        view: view.clone(),
                        reason: "boom".into(),
                    });
                }
                Ok(View {
                    reference: view.clone(),
                    source: "ok".into(),
                })
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_loads_once_and_caches() {
        let loader = Arc::new(CountingLoader::default());
        let registry = ViewRegistry::new(loader.clone());
        let view = ViewRef::new("page/home");

        assert!(!registry.is_loaded(&view));
        let (a, b) = tokio::join!(registry.get(&view), registry.get(&view));
        assert!(a.is_ok() && b.is_ok());
        registry.get(&view).await.unwrap();

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_loaded(&view));
        assert_eq!(registry.loaded_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let loader = Arc::new(CountingLoader {
            fail_first: true,
            ..Default::default()
        });
        let registry = ViewRegistry::new(loader.clone());
        let view = ViewRef::new("page/flaky");

        assert!(matches!(registry.get(&view).await, Err(ViewError::Failed { .. })));
        assert!(!registry.is_loaded(&view));

        registry.get(&view).await.unwrap();
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_all_and_clear() {
        let loader = StaticViewLoader::new()
            .with_view("layout/user", "layout")
            .with_view("page/user/home", "home");
        let registry = ViewRegistry::new(Arc::new(loader));
        let views = [ViewRef::new("layout/user"), ViewRef::new("page/user/home")];

        let loaded = registry.get_all(&views).await.unwrap();
        assert_eq!(&*loaded[0].source, "layout");
        assert_eq!(&*loaded[1].source, "home");
        assert_eq!(registry.loaded_count(), 2);

        registry.clear();
        assert_eq!(registry.loaded_count(), 0);
    }
}
