//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use tokio::sync::Notify;

use view_router::app;
use view_router::navigation::{HistoryMode, Navigator};
use view_router::routing::{compose, ComposeOptions, RouteTree, ViewRef};
use view_router::views::{StaticViewLoader, View, ViewError, ViewLoader};

/// Every view referenced by the built-in tables.
pub const APP_VIEWS: &[&str] = &[
    "layout/admin",
    "page/admin/users",
    "page/admin/products",
    "layout/user",
    "page/user/home",
    "page/user/about",
    "page/user/contact",
];

/// In-memory loader holding every built-in view.
pub fn app_views() -> StaticViewLoader {
    APP_VIEWS
        .iter()
        .fold(StaticViewLoader::new(), |loader, view| {
            loader.with_view(*view, format!("<section>{}</section>", view))
        })
}

/// The built-in route tree.
pub fn app_tree() -> RouteTree {
    compose(app::sections(), &ComposeOptions::default()).unwrap()
}

/// Navigator over the built-in tables with the given loader.
pub fn navigator(loader: Arc<dyn ViewLoader>) -> Arc<Navigator> {
    Arc::new(Navigator::new(app_tree(), loader, HistoryMode::Memory, "/"))
}

/// Loader that counts loads and holds one view until released.
#[derive(Debug)]
pub struct GatedLoader {
    inner: StaticViewLoader,
    gated: ViewRef,
    entered: Notify,
    release: Notify,
    loads: AtomicUsize,
}

impl GatedLoader {
    pub fn new(inner: StaticViewLoader, gated: &str) -> Self {
        Self {
            inner,
            gated: ViewRef::new(gated),
            entered: Notify::new(),
            release: Notify::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Resolves once a load of the gated view has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the pending gated load finish.
    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ViewLoader for GatedLoader {
    fn load<'a>(&'a self, view: &'a ViewRef) -> BoxFuture<'a, Result<View, ViewError>> {
        async move {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if *view == self.gated {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.load(view).await
        }
        .boxed()
    }
}
