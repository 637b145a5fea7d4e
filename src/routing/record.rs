//! Declarative route records.
//!
//! Records are plain data: they are written as literals (see `crate::app`) or
//! deserialized from the `[[sections]]` tables of the config file, and only
//! become routable once `compose` has validated and compiled them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a lazily loaded view, e.g. `"page/user/home"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewRef(String);

impl ViewRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A single route declaration with optional nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Absolute (`/admin`) or relative (`users`, `""`) path.
    pub path: String,

    /// Unique identifier for programmatic navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// View rendered for this record.
    pub view: ViewRef,

    /// Free-form labels, merged outermost-first on a match.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,

    /// Nested records, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>, view: impl Into<ViewRef>) -> Self {
        Self {
            path: path.into(),
            name: None,
            view: view.into(),
            meta: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, child: RouteRecord) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RouteRecord>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A named, ordered group of top-level records (e.g. "admin", "user").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSection {
    pub name: String,

    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

impl RouteSection {
    pub fn new(name: impl Into<String>, routes: Vec<RouteRecord>) -> Self {
        Self {
            name: name.into(),
            routes,
        }
    }
}
