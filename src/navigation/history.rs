//! Navigation history.
//!
//! # Responsibilities
//! - Keep the stack of visited locations and the current position
//! - Translate app paths to links and browser locations back to app paths
//!
//! # Design Decisions
//! - `push` drops forward entries, like a browser
//! - Moving outside the stack is an error, not a clamp

use serde::{Deserialize, Serialize};

/// How app paths appear in browser locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// `/base/about`
    #[default]
    Web,
    /// `/base/#/about`
    Hash,
    /// Paths are kept in memory only.
    Memory,
}

impl HistoryMode {
    /// Link for an app path (`full_path` may carry query and fragment).
    pub fn href(&self, base: &str, full_path: &str) -> String {
        let base = base.trim_end_matches('/');
        match self {
            HistoryMode::Web => format!("{}{}", base, full_path),
            HistoryMode::Hash => format!("{}/#{}", base, full_path),
            HistoryMode::Memory => full_path.to_string(),
        }
    }

    /// App path for a browser location (the inverse of `href`).
    pub fn location_to_path(&self, base: &str, location: &str) -> String {
        match self {
            HistoryMode::Web => strip_base(base, location),
            HistoryMode::Hash => match location.split_once('#') {
                Some((_, fragment)) if fragment.starts_with('/') => fragment.to_string(),
                Some((_, fragment)) => format!("/{}", fragment),
                None => "/".to_string(),
            },
            HistoryMode::Memory => location.to_string(),
        }
    }
}

fn strip_base(base: &str, location: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return location.to_string();
    }
    match location.strip_prefix(base) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with(['/', '?', '#']) => {
            if rest.starts_with('/') {
                rest.to_string()
            } else {
                format!("/{}", rest)
            }
        }
        _ => location.to_string(),
    }
}

/// Stack of visited app paths.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    position: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry, if anything has been visited.
    pub fn location(&self) -> Option<&str> {
        self.entries.get(self.position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Append an entry after the current one, discarding forward entries.
    pub fn push(&mut self, full_path: impl Into<String>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.position + 1);
        }
        self.entries.push(full_path.into());
        self.position = self.entries.len() - 1;
    }

    /// Overwrite the current entry (or add the first one).
    pub fn replace(&mut self, full_path: impl Into<String>) {
        match self.entries.get_mut(self.position) {
            Some(entry) => *entry = full_path.into(),
            None => self.push(full_path),
        }
    }

    /// Entry `delta` steps away, without moving.
    pub fn peek(&self, delta: isize) -> Option<&str> {
        let target = self.position.checked_add_signed(delta)?;
        self.entries.get(target).map(String::as_str)
    }

    /// Move `delta` steps; returns the new current entry.
    pub fn go(&mut self, delta: isize) -> Option<&str> {
        let target = self.position.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.position = target;
        self.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href() {
        assert_eq!(HistoryMode::Web.href("/", "/about"), "/about");
        assert_eq!(HistoryMode::Web.href("/app/", "/about?x=1"), "/app/about?x=1");
        assert_eq!(HistoryMode::Hash.href("/", "/about"), "/#/about");
        assert_eq!(HistoryMode::Hash.href("/app", "/about"), "/app/#/about");
        assert_eq!(HistoryMode::Memory.href("/app", "/about"), "/about");
    }

    #[test]
    fn test_location_to_path() {
        assert_eq!(HistoryMode::Web.location_to_path("/", "/about"), "/about");
        assert_eq!(HistoryMode::Web.location_to_path("/app", "/app/about"), "/about");
        assert_eq!(HistoryMode::Web.location_to_path("/app", "/app"), "/");
        assert_eq!(HistoryMode::Web.location_to_path("/app", "/app?x=1"), "/?x=1");
        assert_eq!(HistoryMode::Web.location_to_path("/app", "/application"), "/application");
        assert_eq!(HistoryMode::Hash.location_to_path("/", "/#/contact"), "/contact");
        assert_eq!(HistoryMode::Hash.location_to_path("/", "/"), "/");
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = History::new();
        assert!(history.location().is_none());

        history.push("/");
        history.push("/about");
        history.push("/contact");
        assert_eq!(history.go(-2), Some("/"));

        history.push("/admin");
        assert_eq!(history.len(), 2);
        assert_eq!(history.location(), Some("/admin"));
        assert_eq!(history.go(1), None);
    }

    #[test]
    fn test_replace_and_bounds() {
        let mut history = History::new();
        history.replace("/");
        history.replace("/about");
        assert_eq!(history.len(), 1);
        assert_eq!(history.location(), Some("/about"));

        assert_eq!(history.peek(-1), None);
        assert_eq!(history.go(-1), None);
        assert_eq!(history.position(), 0);
    }
}
