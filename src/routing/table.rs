use http::Method;
use tracing::{debug, trace};

use crate::matcher::{self, Match, PathTree};
use crate::{Error, Result};

use super::payload::Payload;
use super::registration::{Registration, RouteSink};
use super::route::Route;

/// Maps path patterns to their [`Payload`].
///
/// Built with `&mut self` during setup, then shared read-only for [`RouteTable::resolve`].
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    tree: PathTree<Payload<H>>,
}

/// One `(path, payload)` pair yielded when iterating a table.
#[derive(Debug, PartialEq)]
pub struct RouteDefinition<'a, H> {
    pub path: &'a str,
    pub payload: &'a Payload<H>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            tree: PathTree::new(),
        }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the payload of `path`, or overwrites the same-named methods and metadata keys of
    /// the existing one.
    pub fn add(&mut self, path: &str, payload: Payload<H>) -> Result<()> {
        debug!(
            "Adding route {path} for methods {:?}",
            payload.allowed_methods()
        );
        self.tree
            .get_or_insert_with(path, Payload::default)?
            .update(payload);
        Ok(())
    }

    /// Starts a registration on `path`, finished by [`Registration::view`].
    pub fn register(&mut self, path: impl Into<String>) -> Registration<'_, Self, H> {
        Registration::new(self, path.into())
    }

    pub fn get(&self, path: &str) -> Option<&Payload<H>> {
        self.tree.get(path)
    }

    /// Raw matcher lookup, without method dispatch.
    pub fn lookup(&self, path: &str) -> Option<Match<'_, Payload<H>>> {
        self.tree.lookup(path)
    }

    /// Resolves a request.
    ///
    /// `Ok(None)` when no pattern matches `path`, [`Error::MethodNotAllowed`] when one does
    /// but has no binding for `method`.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<Option<Route<'_, H>>> {
        let Some(found) = self.tree.lookup(path) else {
            trace!("No route matches {path}");
            return Ok(None);
        };
        let Some(binding) = found.payload.binding(method) else {
            trace!("Route {} does not accept {method}", found.pattern);
            return Err(Error::MethodNotAllowed {
                method: method.clone(),
                path: found.pattern.to_string(),
                allowed: found.payload.allowed_methods(),
            });
        };
        trace!("Resolved {method} {path} to {}", found.pattern);
        Ok(Some(Route {
            path: path.to_string(),
            pattern: found.pattern,
            binding,
            params: found.params,
            metadata: &found.payload.metadata,
        }))
    }

    /// Methods accepted by the route matching `path`.
    pub fn allowed_methods(&self, path: &str) -> Option<Vec<Method>> {
        self.tree
            .lookup(path)
            .map(|found| found.payload.allowed_methods())
    }

    pub fn iter(&self) -> RouteDefinitions<'_, H> {
        RouteDefinitions(self.tree.iter())
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl<H: Clone> RouteTable<H> {
    /// Builds a new table holding this table's routes followed by `other`'s.
    /// On a shared path and method, or a shared metadata key, `other` wins.
    pub fn merge(&self, other: &impl AsRef<RouteTable<H>>) -> RouteTable<H> {
        let other = other.as_ref();
        debug!(
            "Merging route tables of {} and {} routes",
            self.len(),
            other.len()
        );
        let mut tree = self.tree.clone();
        tree.extend_from(&other.tree, |mine, theirs| mine.update(theirs.clone()));
        RouteTable { tree }
    }
}

impl<H> AsRef<RouteTable<H>> for RouteTable<H> {
    fn as_ref(&self) -> &RouteTable<H> {
        self
    }
}

impl<H> RouteSink<H> for RouteTable<H> {
    fn add_route(&mut self, path: &str, payload: Payload<H>) -> Result<()> {
        self.add(path, payload)
    }
}

impl<H: Clone> std::ops::Add<&RouteTable<H>> for &RouteTable<H> {
    type Output = RouteTable<H>;

    fn add(self, other: &RouteTable<H>) -> RouteTable<H> {
        self.merge(other)
    }
}

/// Iterator over the routes of a table, in matcher traversal order.
pub struct RouteDefinitions<'a, H>(matcher::Iter<'a, Payload<H>>);

impl<'a, H> Iterator for RouteDefinitions<'a, H> {
    type Item = RouteDefinition<'a, H>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(path, payload)| RouteDefinition { path, payload })
    }
}

impl<'a, H> IntoIterator for &'a RouteTable<H> {
    type Item = RouteDefinition<'a, H>;
    type IntoIter = RouteDefinitions<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
