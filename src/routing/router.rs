//! Route tree lookup.
//!
//! # Responsibilities
//! - Store the compiled route hierarchy
//! - Resolve a location to the matched record chain plus parameter bindings
//! - Build paths for named routes
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - Depth-first, declaration order: children are tried before their parent,
//!   the first full match wins
//! - O(n) scan over compiled patterns (route tables are small)
//! - Explicit `NoMatch` rather than a silent default

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::routing::matcher::{normalize_path, split_segments, Params, PathPattern, PatternError};
use crate::routing::record::ViewRef;

/// Base used to parse app-relative locations such as `/about?tab=1#top`.
const LOCATION_BASE: &str = "http://router.local/";

/// Errors produced while resolving a location or a named route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no route matches `{0}`")]
    NoMatch(String),

    #[error("invalid location `{location}`: {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("no route named `{0}`")]
    UnknownName(String),

    #[error("cannot build path for route `{name}`: {source}")]
    Params {
        name: String,
        #[source]
        source: PatternError,
    },
}

/// A compiled route record.
#[derive(Debug, Clone)]
pub struct RouteNode {
    pub section: String,
    pub name: Option<String>,
    pub view: ViewRef,
    pub pattern: PathPattern,
    pub meta: BTreeMap<String, String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// One entry of `RouteMatch::matched`, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRecord {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub view: ViewRef,
}

/// Result of resolving a location against the route tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// Normalized request path.
    pub path: String,
    /// Path plus query string and fragment.
    pub full_path: String,
    pub name: Option<String>,
    pub section: String,
    pub params: Params,
    /// Decoded query parameters. For a repeated key the last value wins;
    /// `full_path` keeps the raw query string.
    pub query: BTreeMap<String, String>,
    pub hash: Option<String>,
    /// Record chain from the outermost layout to the matched record.
    pub matched: Vec<MatchedRecord>,
    /// Meta labels merged from outermost to innermost.
    pub meta: BTreeMap<String, String>,
}

impl RouteMatch {
    /// View of the innermost matched record.
    pub fn view(&self) -> Option<&ViewRef> {
        self.matched.last().map(|r| &r.view)
    }

    /// Views of the whole chain, outermost first.
    pub fn views(&self) -> impl Iterator<Item = &ViewRef> {
        self.matched.iter().map(|r| &r.view)
    }
}

/// Flattened view of a route for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub section: String,
    pub depth: usize,
    pub views: Vec<ViewRef>,
}

/// Split form of a location.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    path: String,
    full_path: String,
    query: BTreeMap<String, String>,
    hash: Option<String>,
}

impl Location {
    fn parse(location: &str) -> Result<Self, ResolveError> {
        let invalid = |reason: String| ResolveError::InvalidLocation {
            location: location.to_string(),
            reason,
        };

        // Anything carrying a scheme is a full URL, not an app location.
        if Url::parse(location).is_ok() {
            return Err(invalid("expected an app path, got an absolute URL".to_string()));
        }

        // Collapse leading slashes so `//about` is a path, not a host.
        let relative = format!("/{}", location.trim_start_matches(['/', '\\']));
        let url = Url::parse(LOCATION_BASE)
            .and_then(|base| base.join(&relative))
            .map_err(|e| invalid(e.to_string()))?;

        let path = normalize_path(url.path());
        let mut full_path = path.clone();
        if let Some(q) = url.query().filter(|q| !q.is_empty()) {
            full_path.push('?');
            full_path.push_str(q);
        }
        let hash = url.fragment().filter(|h| !h.is_empty()).map(str::to_string);
        if let Some(h) = &hash {
            full_path.push('#');
            full_path.push_str(h);
        }

        Ok(Self {
            path,
            full_path,
            query: url.query_pairs().into_owned().collect(),
            hash,
        })
    }
}

/// Immutable, compiled route hierarchy.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
    roots: Vec<usize>,
    names: HashMap<String, usize>,
    sensitive: bool,
}

impl RouteTree {
    pub(crate) fn from_parts(
        nodes: Vec<RouteNode>,
        roots: Vec<usize>,
        names: HashMap<String, usize>,
        sensitive: bool,
    ) -> Self {
        Self {
            nodes,
            roots,
            names,
            sensitive,
        }
    }

    /// Number of records in the tree, nested ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn node(&self, id: usize) -> Option<&RouteNode> {
        self.nodes.get(id)
    }

    /// Top-level records in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &RouteNode> {
        self.roots.iter().map(|&id| &self.nodes[id])
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteNode> {
        self.names.get(name).map(|&id| &self.nodes[id])
    }

    /// Resolve an app-relative location (`/admin/users?page=2#top`).
    pub fn resolve(&self, location: &str) -> Result<RouteMatch, ResolveError> {
        let location = Location::parse(location)?;
        let segments = split_segments(&location.path);

        let (id, params) = self
            .find(&self.roots, &segments)
            .ok_or_else(|| ResolveError::NoMatch(location.path.clone()))?;

        Ok(self.build_match(id, params, location))
    }

    /// Resolve a named route with explicit parameters.
    ///
    /// The named record is matched directly, even when an earlier record
    /// would win for the built path.
    pub fn resolve_named(&self, name: &str, params: &Params) -> Result<RouteMatch, ResolveError> {
        let id = *self
            .names
            .get(name)
            .ok_or_else(|| ResolveError::UnknownName(name.to_string()))?;
        let path = self.nodes[id]
            .pattern
            .build(params)
            .map_err(|source| ResolveError::Params {
                name: name.to_string(),
                source,
            })?;

        let location = Location::parse(&path)?;
        let segments = split_segments(&location.path);
        let bound = self.nodes[id]
            .pattern
            .matches(&segments, self.sensitive)
            .ok_or_else(|| ResolveError::NoMatch(location.path.clone()))?;

        Ok(self.build_match(id, bound, location))
    }

    /// Path of a named route with the given parameters substituted.
    pub fn path_for(&self, name: &str, params: &Params) -> Result<String, ResolveError> {
        let node = self
            .by_name(name)
            .ok_or_else(|| ResolveError::UnknownName(name.to_string()))?;
        node.pattern.build(params).map_err(|source| ResolveError::Params {
            name: name.to_string(),
            source,
        })
    }

    /// All records, depth-first in declaration order.
    pub fn routes(&self) -> Vec<RouteSummary> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect(root, 0, &mut out);
        }
        out
    }

    fn collect(&self, id: usize, depth: usize, out: &mut Vec<RouteSummary>) {
        let node = &self.nodes[id];
        out.push(RouteSummary {
            path: node.pattern.to_string(),
            name: node.name.clone(),
            section: node.section.clone(),
            depth,
            views: self.chain(id).into_iter().map(|i| self.nodes[i].view.clone()).collect(),
        });
        for &child in &node.children {
            self.collect(child, depth + 1, out);
        }
    }

    fn find(&self, ids: &[usize], segments: &[&str]) -> Option<(usize, Params)> {
        for &id in ids {
            let node = &self.nodes[id];
            if let Some(hit) = self.find(&node.children, segments) {
                return Some(hit);
            }
            if let Some(params) = node.pattern.matches(segments, self.sensitive) {
                return Some((id, params));
            }
        }
        None
    }

    /// Ancestor chain of a node, outermost first.
    fn chain(&self, id: usize) -> Vec<usize> {
        let mut chain = vec![id];
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.nodes[parent].parent;
        }
        chain.reverse();
        chain
    }

    fn build_match(&self, id: usize, params: Params, location: Location) -> RouteMatch {
        let chain = self.chain(id);
        let mut meta = BTreeMap::new();
        let matched = chain
            .iter()
            .map(|&i| {
                let node = &self.nodes[i];
                meta.extend(node.meta.iter().map(|(k, v)| (k.clone(), v.clone())));
                MatchedRecord {
                    path: node.pattern.to_string(),
                    name: node.name.clone(),
                    view: node.view.clone(),
                }
            })
            .collect();

        let leaf = &self.nodes[id];
        RouteMatch {
            path: location.path,
            full_path: location.full_path,
            name: leaf.name.clone(),
            section: leaf.section.clone(),
            params,
            query: location.query,
            hash: location.hash,
            matched,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::compose::{compose, ComposeOptions};
    use crate::routing::record::{RouteRecord, RouteSection};

    fn tree() -> RouteTree {
        let sections = vec![
            RouteSection::new(
                "admin",
                vec![RouteRecord::new("/admin", "layout/admin")
                    .meta("role", "admin")
                    .children([
                        RouteRecord::new("users", "page/admin/users").named("admin-user"),
                        RouteRecord::new("users/:id", "page/admin/user").named("admin-user-detail"),
                    ])],
            ),
            RouteSection::new(
                "user",
                vec![RouteRecord::new("/", "layout/user").children([
                    RouteRecord::new("", "page/home").named("home"),
                    RouteRecord::new("/about", "page/about").named("about"),
                ])],
            ),
        ];
        compose(sections, &ComposeOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_child_wins_over_layout() {
        let m = tree().resolve("/").unwrap();
        assert_eq!(m.name.as_deref(), Some("home"));
        assert_eq!(m.matched.len(), 2);
        assert_eq!(m.matched[0].view, ViewRef::new("layout/user"));
        assert_eq!(m.view(), Some(&ViewRef::new("page/home")));
    }

    #[test]
    fn test_layout_matches_itself_without_child() {
        let m = tree().resolve("/admin").unwrap();
        assert!(m.name.is_none());
        assert_eq!(m.section, "admin");
        assert_eq!(m.matched.len(), 1);
    }

    #[test]
    fn test_params_query_and_hash() {
        let m = tree().resolve("/admin/users/7?tab=roles&x=1#top").unwrap();
        assert_eq!(m.name.as_deref(), Some("admin-user-detail"));
        assert_eq!(m.params["id"], "7");
        assert_eq!(m.query["tab"], "roles");
        assert_eq!(m.hash.as_deref(), Some("top"));
        assert_eq!(m.path, "/admin/users/7");
        assert_eq!(m.full_path, "/admin/users/7?tab=roles&x=1#top");
        assert_eq!(m.meta["role"], "admin");
    }

    #[test]
    fn test_repeated_slashes_collapse() {
        let tree = tree();
        assert_eq!(tree.resolve("//about").unwrap().name.as_deref(), Some("about"));

        let m = tree.resolve("//admin//users/7?tab=x").unwrap();
        assert_eq!(m.name.as_deref(), Some("admin-user-detail"));
        assert_eq!(m.path, "/admin/users/7");
        assert_eq!(m.full_path, "/admin/users/7?tab=x");

        assert_eq!(tree.resolve("about").unwrap().name.as_deref(), Some("about"));
        assert_eq!(tree.resolve("?x=1").unwrap().name.as_deref(), Some("home"));
    }

    #[test]
    fn test_absolute_urls_are_rejected() {
        for location in ["https://evil.example/about", "http://router.local/about", "mailto:a@b.c"] {
            assert!(
                matches!(
                    tree().resolve(location),
                    Err(ResolveError::InvalidLocation { .. })
                ),
                "accepted {}",
                location
            );
        }
    }

    #[test]
    fn test_repeated_query_key_keeps_last_value() {
        let m = tree().resolve("/about?tag=a&tag=b").unwrap();
        assert_eq!(m.query["tag"], "b");
        assert_eq!(m.full_path, "/about?tag=a&tag=b");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(
            tree().resolve("/missing/page").unwrap_err(),
            ResolveError::NoMatch("/missing/page".to_string())
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let tree = tree();
        assert_eq!(tree.resolve("/about").unwrap(), tree.resolve("/about").unwrap());
    }

    #[test]
    fn test_resolve_named() {
        let tree = tree();
        let mut params = Params::new();
        params.insert("id".into(), "42".into());

        let m = tree.resolve_named("admin-user-detail", &params).unwrap();
        assert_eq!(m.path, "/admin/users/42");
        assert_eq!(m.params["id"], "42");

        assert_eq!(
            tree.resolve_named("nope", &params).unwrap_err(),
            ResolveError::UnknownName("nope".to_string())
        );
        assert!(matches!(
            tree.resolve_named("admin-user-detail", &Params::new()),
            Err(ResolveError::Params { .. })
        ));
    }

    #[test]
    fn test_routes_listing_is_depth_first() {
        let paths: Vec<String> = tree().routes().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["/admin", "/admin/users", "/admin/users/:id", "/", "/", "/about"]
        );
    }
}
