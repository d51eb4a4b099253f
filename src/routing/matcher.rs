//! Route matching logic.
//!
//! # Responsibilities
//! - Parse path patterns (`/video/:id`, `/*realm/v/:id`) at registration
//! - Match a URL path against a pattern and extract parameters
//! - Combine a path pattern with required query parameters
//! - Build URLs back from a pattern and arguments
//!
//! # Design Decisions
//! - Path matching is case-sensitive and segment-wise
//! - A single trailing slash is insignificant (`/~about/` == `/~about`)
//! - Segments are percent-decoded before comparison
//! - At most one wildcard per pattern; it may sit anywhere and matches
//!   zero or more segments
//! - No regex, matching is a single pass over the segments

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use url::Url;

use crate::error::PatternError;

/// Trait for matching URLs against conditions.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns the extracted parameters if the URL matches this condition.
    fn matches(&self, url: &Url) -> Option<Params>;
}

/// Parameters extracted by a match, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard(String),
}

/// A compiled path pattern.
///
/// `:name` captures exactly one non-empty segment, `*name` captures any
/// number of segments (joined with `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    wildcard: Option<usize>,
}

impl PathPattern {
    /// Compile a pattern.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        };

        let mut segments = Vec::new();
        let mut wildcard = None;
        let mut names = HashSet::new();

        for raw in split_raw(rest) {
            let segment = if let Some(name) = raw.strip_prefix(':') {
                Segment::Param(name.to_string())
            } else if let Some(name) = raw.strip_prefix('*') {
                if wildcard.is_some() {
                    return Err(PatternError::MultipleWildcards(pattern.to_string()));
                }
                wildcard = Some(segments.len());
                Segment::Wildcard(name.to_string())
            } else {
                Segment::Literal(raw.to_string())
            };

            if let Segment::Param(name) | Segment::Wildcard(name) = &segment {
                if name.is_empty() {
                    return Err(PatternError::EmptyParam(pattern.to_string()));
                }
                if !names.insert(name.clone()) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
            wildcard,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a URL path (as returned by [`Url::path`]).
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let rest = path.strip_prefix('/').unwrap_or(path);
        let decoded = split_raw(rest)
            .map(|s| urlencoding::decode(s).ok())
            .collect::<Option<Vec<Cow<'_, str>>>>()?;

        let mut params = Params::new();
        match self.wildcard {
            None => {
                if decoded.len() != self.segments.len() {
                    return None;
                }
                for (segment, value) in self.segments.iter().zip(&decoded) {
                    bind(segment, value, &mut params)?;
                }
            }
            Some(w) => {
                let fixed = self.segments.len() - 1;
                if decoded.len() < fixed {
                    return None;
                }
                let tail_len = fixed - w;
                let tail_start = decoded.len() - tail_len;

                for (segment, value) in self.segments[..w].iter().zip(&decoded[..w]) {
                    bind(segment, value, &mut params)?;
                }
                if let Segment::Wildcard(name) = &self.segments[w] {
                    params.insert(name.clone(), decoded[w..tail_start].join("/"));
                }
                for (segment, value) in self.segments[w + 1..].iter().zip(&decoded[tail_start..]) {
                    bind(segment, value, &mut params)?;
                }
            }
        }
        Some(params)
    }

    /// Build a path from this pattern. Every parameter must be supplied;
    /// extra arguments are ignored.
    pub fn url_for(&self, args: &[(&str, &str)]) -> Result<String, PatternError> {
        let lookup = |name: &str| {
            args.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| PatternError::MissingArgument {
                    pattern: self.source.clone(),
                    name: name.to_string(),
                })
        };

        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => parts.push(lit.clone()),
                Segment::Param(name) => parts.push(urlencoding::encode(lookup(name)?).into_owned()),
                Segment::Wildcard(name) => parts.extend(
                    lookup(name)?
                        .split('/')
                        .filter(|s| !s.is_empty())
                        .map(|s| urlencoding::encode(s).into_owned()),
                ),
            }
        }
        Ok(format!("/{}", parts.join("/")))
    }
}

impl Matcher for PathPattern {
    fn matches(&self, url: &Url) -> Option<Params> {
        self.match_path(url.path())
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Requires a non-empty query parameter on top of another matcher. The
/// decoded value is added to the parameters under the same name.
#[derive(Debug)]
pub struct WithQuery {
    inner: Box<dyn Matcher>,
    name: String,
}

impl WithQuery {
    pub fn new(inner: impl Matcher + 'static, name: impl Into<String>) -> Self {
        Self {
            inner: Box::new(inner),
            name: name.into(),
        }
    }
}

impl Matcher for WithQuery {
    fn matches(&self, url: &Url) -> Option<Params> {
        let mut params = self.inner.matches(url)?;
        let value = url
            .query_pairs()
            .find(|(key, _)| key == self.name.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())?;
        params.insert(self.name.clone(), value);
        Some(params)
    }
}

/// Splits the part after the leading slash into segments, dropping one
/// trailing slash. The root path yields no segments.
fn split_raw(rest: &str) -> impl Iterator<Item = &str> {
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.split('/').filter(move |_| !rest.is_empty())
}

fn bind(segment: &Segment, value: &str, params: &mut Params) -> Option<()> {
    match segment {
        Segment::Literal(lit) => (lit == value).then_some(()),
        Segment::Param(name) => {
            if value.is_empty() {
                return None;
            }
            params.insert(name.clone(), value);
            Some(())
        }
        // Handled by the caller.
        Segment::Wildcard(_) => Some(()),
    }
}
