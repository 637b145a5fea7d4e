//! Route table composition.
//!
//! # Responsibilities
//! - Merge ordered sections into one route tree
//! - Resolve child paths against their parents and compile patterns
//! - Reject configuration errors before the tree is accepted
//!
//! # Design Decisions
//! - Returns all composition errors, not just the first
//! - Section order and record order are preserved; that order is the
//!   resolution precedence
//! - Overlapping nested records in different subtrees are allowed (earlier
//!   wins) but logged, since they only work because of ordering

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::routing::matcher::{join_paths, PathPattern, PatternError};
use crate::routing::record::{RouteRecord, RouteSection, ViewRef};
use crate::routing::router::{RouteNode, RouteTree};

/// Section appended when a not-found view is configured.
pub const FALLBACK_SECTION: &str = "fallback";

/// Name of the generated catch-all record.
pub const NOT_FOUND_ROUTE: &str = "not-found";

/// Options applied while composing.
#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    /// Compare static segments case-sensitively.
    pub sensitive: bool,
    /// View for a catch-all record appended after all sections.
    pub not_found: Option<ViewRef>,
}

/// A single configuration error found while composing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("no route sections to compose")]
    NoSections,

    #[error("section `{0}` declares no routes")]
    EmptySection(String),

    #[error("section `{0}` is declared more than once")]
    DuplicateSection(String),

    #[error("section `{section}`: invalid path `{path}`: {source}")]
    InvalidPath {
        section: String,
        path: String,
        #[source]
        source: PatternError,
    },

    #[error("section `{section}`: route `{path}` has an empty view reference")]
    EmptyView { section: String, path: String },

    #[error("route name `{name}` is used by both `{first}` and `{second}`")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("top-level path `{path}` is declared by section `{first}` and again by section `{second}`")]
    DuplicateTopLevel {
        path: String,
        first: String,
        second: String,
    },

    #[error("section `{section}`: sibling routes collide on `{path}`")]
    SiblingCollision { section: String, path: String },
}

/// All errors found while composing a route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionError {
    errors: Vec<ComposeError>,
}

impl CompositionError {
    pub fn errors(&self) -> &[ComposeError] {
        &self.errors
    }
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid route table: ")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompositionError {}

/// Compose ordered sections into a validated route tree.
pub fn compose(
    sections: impl IntoIterator<Item = RouteSection>,
    options: &ComposeOptions,
) -> Result<RouteTree, CompositionError> {
    let mut sections: Vec<RouteSection> = sections.into_iter().collect();
    let mut builder = TreeBuilder::new(options.sensitive);

    if sections.is_empty() {
        builder.errors.push(ComposeError::NoSections);
    }
    if let Some(view) = &options.not_found {
        sections.push(fallback_section(view.clone()));
    }

    let mut section_names = HashSet::new();
    let mut top_level: HashMap<String, String> = HashMap::new();

    for section in &sections {
        if !section_names.insert(section.name.as_str()) {
            builder
                .errors
                .push(ComposeError::DuplicateSection(section.name.clone()));
        }
        if section.routes.is_empty() {
            builder
                .errors
                .push(ComposeError::EmptySection(section.name.clone()));
        }

        for record in &section.routes {
            let Some(id) = builder.add(&section.name, record, "/", None) else {
                continue;
            };
            let pattern = &builder.nodes[id].pattern;
            match top_level.entry(pattern.shape(options.sensitive)) {
                Entry::Occupied(first) => builder.errors.push(ComposeError::DuplicateTopLevel {
                    path: pattern.to_string(),
                    first: first.get().clone(),
                    second: section.name.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(section.name.clone());
                }
            }
            builder.roots.push(id);
        }
    }

    if !builder.errors.is_empty() {
        return Err(CompositionError {
            errors: builder.errors,
        });
    }

    tracing::info!(
        sections = sections.len(),
        routes = builder.nodes.len(),
        named = builder.names.len(),
        "Route table composed"
    );

    Ok(RouteTree::from_parts(
        builder.nodes,
        builder.roots,
        builder.names,
        options.sensitive,
    ))
}

fn fallback_section(view: ViewRef) -> RouteSection {
    RouteSection::new(
        FALLBACK_SECTION,
        vec![RouteRecord::new("/:pathMatch*", view).named(NOT_FOUND_ROUTE)],
    )
}

struct TreeBuilder {
    nodes: Vec<RouteNode>,
    roots: Vec<usize>,
    names: HashMap<String, usize>,
    shapes: HashMap<String, usize>,
    sensitive: bool,
    errors: Vec<ComposeError>,
}

impl TreeBuilder {
    fn new(sensitive: bool) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            names: HashMap::new(),
            shapes: HashMap::new(),
            sensitive,
            errors: Vec::new(),
        }
    }

    /// Compile a record and its children. Returns `None` when the record's
    /// own path is malformed; its subtree is skipped in that case.
    fn add(
        &mut self,
        section: &str,
        record: &RouteRecord,
        parent_path: &str,
        parent: Option<usize>,
    ) -> Option<usize> {
        let absolute = join_paths(parent_path, &record.path);
        let pattern = match PathPattern::parse(&absolute) {
            Ok(p) => p,
            Err(source) => {
                self.errors.push(ComposeError::InvalidPath {
                    section: section.to_string(),
                    path: absolute,
                    source,
                });
                return None;
            }
        };

        if record.view.as_str().trim().is_empty() {
            self.errors.push(ComposeError::EmptyView {
                section: section.to_string(),
                path: absolute.clone(),
            });
        }

        let id = self.nodes.len();
        let shape = pattern.shape(self.sensitive);
        self.nodes.push(RouteNode {
            section: section.to_string(),
            name: record.name.clone(),
            view: record.view.clone(),
            pattern,
            meta: record.meta.clone(),
            parent,
            children: Vec::new(),
        });

        if let Some(name) = &record.name {
            match self.names.entry(name.clone()) {
                Entry::Occupied(first) => self.errors.push(ComposeError::DuplicateName {
                    name: name.clone(),
                    first: self.nodes[*first.get()].pattern.to_string(),
                    second: absolute.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }

        match self.shapes.get(&shape) {
            Some(&earlier) if parent.is_some() && !self.is_ancestor(earlier, id) => {
                tracing::warn!(
                    path = %absolute,
                    section = %section,
                    shadowed_by = %self.nodes[earlier].section,
                    "Route overlaps an earlier declaration; the earlier one takes precedence"
                );
            }
            Some(_) => {}
            None => {
                self.shapes.insert(shape, id);
            }
        }

        let mut sibling_shapes = HashSet::new();
        for child in &record.children {
            let Some(child_id) = self.add(section, child, &absolute, Some(id)) else {
                continue;
            };
            let child_pattern = &self.nodes[child_id].pattern;
            if !sibling_shapes.insert(child_pattern.shape(self.sensitive)) {
                self.errors.push(ComposeError::SiblingCollision {
                    section: section.to_string(),
                    path: child_pattern.to_string(),
                });
            }
            self.nodes[id].children.push(child_id);
        }

        Some(id)
    }

    fn is_ancestor(&self, candidate: usize, id: usize) -> bool {
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            if parent == candidate {
                return true;
            }
            current = self.nodes[parent].parent;
        }
        false
    }
}
