//! View loaders.
//!
//! # Responsibilities
//! - Turn a `ViewRef` into loaded view source, asynchronously
//! - Keep file-backed references inside the configured root
//!
//! Loaders are not cached; `ViewRegistry` memoizes them.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use thiserror::Error;

use crate::routing::ViewRef;

/// A loaded view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub reference: ViewRef,
    pub source: Arc<str>,
}

/// Errors that can occur while loading a view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view `{0}` not found")]
    NotFound(ViewRef),

    #[error("view reference `{0}` escapes the view root")]
    InvalidReference(ViewRef),

    #[error("failed to read view `{view}`: {source}")]
    Io {
        view: ViewRef,
        #[source]
        source: std::io::Error,
    },

    #[error("view `{view}` failed to load: {reason}")]
    Failed { view: ViewRef, reason: String },
}

/// Asynchronous view resolution.
pub trait ViewLoader: Send + Sync + std::fmt::Debug {
    /// Load a view. Called at most once per successful load by the registry.
    fn load<'a>(&'a self, view: &'a ViewRef) -> BoxFuture<'a, Result<View, ViewError>>;
}

/// Loads views from `<root>/<reference>.<extension>`.
#[derive(Debug, Clone)]
pub struct FsViewLoader {
    root: PathBuf,
    extension: String,
}

impl FsViewLoader {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// File backing a view, or `None` if the reference would leave the root.
    pub fn path_for(&self, view: &ViewRef) -> Option<PathBuf> {
        let relative = Path::new(view.as_str().trim_start_matches('/'));
        let mut path = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if path == self.root {
            return None;
        }
        if !self.extension.is_empty() {
            // Append rather than replace, so `page/v1.2` keeps its dot suffix.
            let mut file_name = path.file_name()?.to_os_string();
            file_name.push(".");
            file_name.push(&self.extension);
            path.set_file_name(file_name);
        }
        Some(path)
    }
}

impl ViewLoader for FsViewLoader {
    fn load<'a>(&'a self, view: &'a ViewRef) -> BoxFuture<'a, Result<View, ViewError>> {
        async move {
            let path = self
                .path_for(view)
                .ok_or_else(|| ViewError::InvalidReference(view.clone()))?;

            match tokio::fs::read_to_string(&path).await {
                Ok(source) => Ok(View {
                    reference: view.clone(),
                    source: source.into(),
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(ViewError::NotFound(view.clone()))
                }
                Err(source) => Err(ViewError::Io {
                    view: view.clone(),
                    source,
                }),
            }
        }
        .boxed()
    }
}

/// In-memory views, keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct StaticViewLoader {
    views: HashMap<ViewRef, Arc<str>>,
}

impl StaticViewLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, view: impl Into<ViewRef>, source: impl Into<Arc<str>>) -> Self {
        self.views.insert(view.into(), source.into());
        self
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl ViewLoader for StaticViewLoader {
    fn load<'a>(&'a self, view: &'a ViewRef) -> BoxFuture<'a, Result<View, ViewError>> {
        let result = self
            .views
            .get(view)
            .map(|source| View {
                reference: view.clone(),
                source: source.clone(),
            })
            .ok_or_else(|| ViewError::NotFound(view.clone()));
        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("view-router-views-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_path_for_stays_in_root() {
        let loader = FsViewLoader::new("/srv/views", "html");
        assert_eq!(
            loader.path_for(&ViewRef::new("page/user/home")),
            Some(PathBuf::from("/srv/views/page/user/home.html"))
        );
        assert_eq!(loader.path_for(&ViewRef::new("../secret")), None);
        assert_eq!(loader.path_for(&ViewRef::new("page/../../etc/passwd")), None);
        assert_eq!(loader.path_for(&ViewRef::new("")), None);
    }

    #[test]
    fn test_path_for_keeps_dotted_names() {
        let loader = FsViewLoader::new("/srv/views", "html");
        assert_eq!(
            loader.path_for(&ViewRef::new("page/v1.2")),
            Some(PathBuf::from("/srv/views/page/v1.2.html"))
        );

        let bare = FsViewLoader::new("/srv/views", "");
        assert_eq!(
            bare.path_for(&ViewRef::new("page/v1.2")),
            Some(PathBuf::from("/srv/views/page/v1.2"))
        );
    }

    #[tokio::test]
    async fn test_fs_loader_reads_views() {
        let root = temp_root();
        std::fs::create_dir_all(root.join("page")).unwrap();
        std::fs::write(root.join("page/home.html"), "<h1>home</h1>").unwrap();

        let loader = FsViewLoader::new(&root, "html");
        let view = loader.load(&ViewRef::new("page/home")).await.unwrap();
        assert_eq!(&*view.source, "<h1>home</h1>");

        let missing = loader.load(&ViewRef::new("page/missing")).await;
        assert!(matches!(missing, Err(ViewError::NotFound(_))));

        let escaping = loader.load(&ViewRef::new("../home")).await;
        assert!(matches!(escaping, Err(ViewError::InvalidReference(_))));

        std::fs::remove_dir_all(&root).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_static_loader() {
        let loader = StaticViewLoader::new().with_view("page/about", "about");
        assert_eq!(loader.len(), 1);

        let view = loader.load(&ViewRef::new("page/about")).await.unwrap();
        assert_eq!(&*view.source, "about");
        assert!(loader.load(&ViewRef::new("page/other")).await.is_err());
    }
}
