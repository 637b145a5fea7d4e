//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse absolute route paths into typed segments
//! - Match request path segments, extracting parameter bindings
//! - Build concrete paths from a pattern and parameters (named navigation)
//!
//! # Syntax
//! - `about`: static segment
//! - `:id`: required parameter (exactly one segment)
//! - `:id?`: optional parameter (zero or one segment)
//! - `:rest*`: catch-all (zero or more trailing segments), `*` = `:pathMatch*`
//!
//! # Design Decisions
//! - Static matching is case-insensitive unless the router is `sensitive`
//! - Parameter values are percent-decoded; names are never case-folded
//! - No regex: matching is a small backtracking walk over segments

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Parameter bindings extracted from a matched path.
pub type Params = BTreeMap<String, String>;

/// Errors raised while parsing a path pattern or building a path from one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("parameter name is empty in segment `{0}`")]
    EmptyParamName(String),

    #[error("invalid parameter name `{0}`")]
    InvalidParamName(String),

    #[error("catch-all parameter `{0}` must be the last segment")]
    CatchAllNotLast(String),

    #[error("parameter `{0}` is declared more than once")]
    DuplicateParam(String),

    #[error("missing required parameter `{0}`")]
    MissingParam(String),
}

/// A single segment of a compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Param(String),
    Optional(String),
    CatchAll(String),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw == "*" {
            return Ok(Segment::CatchAll("pathMatch".to_string()));
        }

        let Some(param) = raw.strip_prefix(':') else {
            return Ok(Segment::Static(raw.to_string()));
        };

        let (name, suffix) = match param.char_indices().last() {
            Some((i, c @ ('?' | '*'))) => (&param[..i], Some(c)),
            _ => (param, None),
        };

        if name.is_empty() {
            return Err(PatternError::EmptyParamName(raw.to_string()));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PatternError::InvalidParamName(name.to_string()));
        }

        let name = name.to_string();
        Ok(match suffix {
            Some('?') => Segment::Optional(name),
            Some(_) => Segment::CatchAll(name),
            None => Segment::Param(name),
        })
    }

    fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param(n) | Segment::Optional(n) | Segment::CatchAll(n) => Some(n),
        }
    }
}

/// A parsed, absolute route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse an absolute path such as `/admin/users/:id`.
    ///
    /// The path is normalized first, so `/admin//users/` parses the same as
    /// `/admin/users`.
    pub fn parse(path: &str) -> Result<Self, PatternError> {
        let raw = normalize_path(path);
        let segments = split_segments(&raw)
            .into_iter()
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen: Vec<&str> = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            if let Segment::CatchAll(name) = segment {
                if i + 1 != segments.len() {
                    return Err(PatternError::CatchAllNotLast(name.clone()));
                }
            }
            if let Some(name) = segment.param_name() {
                if seen.contains(&name) {
                    return Err(PatternError::DuplicateParam(name.to_string()));
                }
                seen.push(name);
            }
        }

        Ok(Self { raw, segments })
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the pattern has no parameters.
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Static(_)))
    }

    /// The pattern with parameter names erased, used for collision checks.
    ///
    /// `/users/:id` and `/users/:slug` share the shape `/users/:`.
    pub fn shape(&self, sensitive: bool) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Static(text) if sensitive => format!("/{}", text),
                Segment::Static(text) => format!("/{}", text.to_lowercase()),
                Segment::Param(_) => "/:".to_string(),
                Segment::Optional(_) => "/:?".to_string(),
                Segment::CatchAll(_) => "/:*".to_string(),
            })
            .collect()
    }

    /// Match already-split path segments, returning parameter bindings.
    pub fn matches(&self, path: &[&str], sensitive: bool) -> Option<Params> {
        let mut params = Params::new();
        match_from(&self.segments, path, sensitive, &mut params).then_some(params)
    }

    /// Build a concrete path from parameters.
    pub fn build(&self, params: &Params) -> Result<String, PatternError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => {
                    out.push('/');
                    out.push_str(text);
                }
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| PatternError::MissingParam(name.clone()))?;
                    out.push('/');
                    out.push_str(&urlencoding::encode(value));
                }
                Segment::Optional(name) => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        out.push('/');
                        out.push_str(&urlencoding::encode(value));
                    }
                }
                Segment::CatchAll(name) => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        for part in value.split('/').filter(|p| !p.is_empty()) {
                            out.push('/');
                            out.push_str(&urlencoding::encode(part));
                        }
                    }
                }
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn match_from(pattern: &[Segment], path: &[&str], sensitive: bool, params: &mut Params) -> bool {
    let Some((segment, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match segment {
        Segment::Static(text) => match path.split_first() {
            Some((head, tail)) if static_eq(text, head, sensitive) => {
                match_from(rest, tail, sensitive, params)
            }
            _ => false,
        },
        Segment::Param(name) => {
            let Some((head, tail)) = path.split_first() else {
                return false;
            };
            if !match_from(rest, tail, sensitive, params) {
                return false;
            }
            params.insert(name.clone(), decode(head));
            true
        }
        Segment::Optional(name) => {
            if let Some((head, tail)) = path.split_first() {
                if match_from(rest, tail, sensitive, params) {
                    params.insert(name.clone(), decode(head));
                    return true;
                }
            }
            match_from(rest, path, sensitive, params)
        }
        Segment::CatchAll(name) => {
            let value = path.iter().map(|p| decode(p)).collect::<Vec<_>>().join("/");
            params.insert(name.clone(), value);
            true
        }
    }
}

fn static_eq(expected: &str, actual: &str, sensitive: bool) -> bool {
    if sensitive {
        expected == decode(actual)
    } else {
        expected.eq_ignore_ascii_case(&decode(actual))
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Normalize a path to canonical form: leading `/`, no empty segments,
/// no trailing `/` except for the root.
pub fn normalize_path(path: &str) -> String {
    let joined = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Split a path into its non-empty segments.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Join a child route path onto its parent's absolute path.
///
/// Absolute children keep their own path, an empty child resolves to the
/// parent path, relative children are appended.
pub fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        normalize_path(child)
    } else if child.is_empty() {
        normalize_path(parent)
    } else {
        normalize_path(&format!("{}/{}", parent, child))
    }
}
