//! Route tables and route matching.
//!
//! [`RouteTable`] is the declarative form: views and redirect rules keyed by
//! path pattern. [`RouteTable::build`] compiles it into [`CompiledRoutes`],
//! which matches locations with `matchit`. Patterns use `{name}` for a
//! single segment and `{*name}` for the remainder of the path.
//!
//! ```
//! use armature_router_engine::{Element, RouteTable, view_fn};
//!
//! let routes = RouteTable::new()
//!     .route("/", view_fn(|_| Ok(Element::text("home"))))
//!     .route("/users/{id}", view_fn(|cx| {
//!         Ok(Element::text(cx.param("id").unwrap_or_default().to_string()))
//!     }))
//!     .redirect("/people/{id}", "/users/{id}")
//!     .build()
//!     .unwrap();
//! # let _ = routes;
//! ```

use crate::element::View;
use crate::error::{Result, SsrError};
use async_trait::async_trait;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Result of matching a location against a route table.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Redirect to the given target (pathname + search).
    Redirect(String),
    NotFound,
    Matched(RouteMatch),
}

/// A matched route.
#[derive(Clone)]
pub struct RouteMatch {
    /// The location as requested.
    pub location: String,
    /// Location without search or fragment.
    pub pathname: String,
    /// Search string including the leading `?`, or empty.
    pub search: String,
    /// The pattern that matched.
    pub pattern: String,
    /// Percent-decoded path parameters.
    pub params: HashMap<String, String>,
    pub view: Arc<dyn View>,
}

impl RouteMatch {
    /// Parse the search string into percent-decoded key/value pairs.
    pub fn query(&self) -> HashMap<String, String> {
        self.search
            .trim_start_matches('?')
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (decode(key), decode(value)),
                None => (decode(part), String::new()),
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn for_test(pattern: &str) -> Self {
        use crate::element::{Element, view_fn};

        Self {
            location: pattern.to_string(),
            pathname: pattern.to_string(),
            search: String::new(),
            pattern: pattern.to_string(),
            params: HashMap::new(),
            view: view_fn(|_| Ok(Element::text("test"))),
        }
    }
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("location", &self.location)
            .field("pathname", &self.pathname)
            .field("search", &self.search)
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// The route-matching capability the engine consumes.
#[async_trait]
pub trait RouteMatcher: Send + Sync {
    async fn match_location(&self, location: &str) -> Result<MatchOutcome>;
}

#[derive(Clone)]
enum RouteEntry {
    View { pattern: String, view: Arc<dyn View> },
    Redirect { from: String, to: String },
}

impl RouteEntry {
    fn pattern(&self) -> &str {
        match self {
            RouteEntry::View { pattern, .. } => pattern,
            RouteEntry::Redirect { from, .. } => from,
        }
    }

    fn prefixed(self, prefix: &str) -> Self {
        match self {
            RouteEntry::View { pattern, view } => RouteEntry::View {
                pattern: join_paths(prefix, &pattern),
                view,
            },
            RouteEntry::Redirect { from, to } => RouteEntry::Redirect {
                from: join_paths(prefix, &from),
                to,
            },
        }
    }
}

/// Declarative route table.
#[derive(Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `view` for locations matching `pattern`.
    pub fn route(mut self, pattern: impl Into<String>, view: Arc<dyn View>) -> Self {
        self.entries.push(RouteEntry::View {
            pattern: pattern.into(),
            view,
        });
        self
    }

    /// Redirect locations matching `from` to `to`.
    ///
    /// `{name}` segments in `to` are filled from the matched parameters. The
    /// incoming search string is carried over unless `to` has its own.
    pub fn redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.entries.push(RouteEntry::Redirect {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Mount every entry of `table` under `prefix`.
    pub fn nest(mut self, prefix: &str, table: RouteTable) -> Self {
        self.entries
            .extend(table.entries.into_iter().map(|entry| entry.prefixed(prefix)));
        self
    }

    /// Compile the table. Malformed or conflicting patterns are a configuration error.
    pub fn build(self) -> Result<CompiledRoutes> {
        let mut router = matchit::Router::new();

        for (index, entry) in self.entries.iter().enumerate() {
            let pattern = entry.pattern();
            if !pattern.starts_with('/') {
                return Err(SsrError::Configuration(format!(
                    "router-resolver: route pattern must start with '/': {}",
                    pattern
                )));
            }
            router
                .insert(normalize_pathname(pattern), index)
                .map_err(|e| {
                    SsrError::Configuration(format!(
                        "router-resolver: invalid route {}: {}",
                        pattern, e
                    ))
                })?;
        }

        Ok(CompiledRoutes {
            router,
            entries: self.entries,
        })
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(RouteEntry::pattern))
            .finish()
    }
}

/// A compiled [`RouteTable`].
pub struct CompiledRoutes {
    router: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
}

impl CompiledRoutes {
    /// Match a location synchronously.
    pub fn resolve(&self, location: &str) -> MatchOutcome {
        let (pathname, search) = split_location(location);

        let Ok(matched) = self.router.at(&pathname) else {
            return MatchOutcome::NotFound;
        };

        match &self.entries[*matched.value] {
            RouteEntry::View { pattern, view } => {
                let params = matched
                    .params
                    .iter()
                    .map(|(key, value)| (key.to_string(), decode(value)))
                    .collect();
                MatchOutcome::Matched(RouteMatch {
                    location: location.to_string(),
                    pathname,
                    search,
                    pattern: pattern.clone(),
                    params,
                    view: view.clone(),
                })
            }
            // redirect targets are URLs, so the raw segments are kept
            RouteEntry::Redirect { to, .. } => {
                let params: HashMap<&str, &str> = matched.params.iter().collect();
                let target = fill_params(to, &params);
                if target.contains('?') {
                    MatchOutcome::Redirect(target)
                } else {
                    MatchOutcome::Redirect(format!("{}{}", target, search))
                }
            }
        }
    }
}

#[async_trait]
impl RouteMatcher for CompiledRoutes {
    async fn match_location(&self, location: &str) -> Result<MatchOutcome> {
        Ok(self.resolve(location))
    }
}

impl fmt::Debug for CompiledRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoutes")
            .field("routes", &self.entries.len())
            .finish()
    }
}

/// Split a location into pathname and search, dropping any fragment.
fn split_location(location: &str) -> (String, String) {
    let location = location.split('#').next().unwrap_or_default();
    let (pathname, search) = match location.split_once('?') {
        Some((pathname, query)) if !query.is_empty() => (pathname, format!("?{}", query)),
        Some((pathname, _)) => (pathname, String::new()),
        None => (location, String::new()),
    };
    (normalize_pathname(pathname), search)
}

fn normalize_pathname(pathname: &str) -> String {
    let trimmed = pathname.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn join_paths(prefix: &str, pattern: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if pattern == "/" || pattern.is_empty() {
        normalize_pathname(prefix)
    } else if pattern.starts_with('/') {
        format!("{}{}", prefix, pattern)
    } else {
        format!("{}/{}", prefix, pattern)
    }
}

fn decode(value: &str) -> String {
    urlencoding::decode(value)
        .unwrap_or(Cow::Borrowed(value))
        .into_owned()
}

/// Replace `{name}` and `{*name}` tokens in one left-to-right pass.
///
/// Inserted values are never rescanned; unknown tokens are kept as written.
fn fill_params(target: &str, params: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(target.len());
    let mut rest = target;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let token = &rest[open..];
        let Some(close) = token.find('}') else {
            rest = token;
            break;
        };
        let name = &token[1..close];
        match params.get(name.strip_prefix('*').unwrap_or(name)) {
            Some(value) => out.push_str(value),
            None => out.push_str(&token[..=close]),
        }
        rest = &token[close + 1..];
    }

    out.push_str(rest);
    out
}
