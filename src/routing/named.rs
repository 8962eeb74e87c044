//! Route tables with reverse routing.
//!
//! A [`NamedRouteTable`] records which path every route name was registered on.
//! A name is bound to a single path for the life of the table: re-registering it on
//! the same path is a no-op, on another path a [`Error::NamingConflict`].

use std::collections::HashMap;

use http::Method;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::matcher::{pattern, Match};
use crate::{Error, Result};

use super::payload::Payload;
use super::registration::{Registration, RouteSink};
use super::route::Route;
use super::table::{RouteDefinition, RouteDefinitions, RouteTable};

/// Route name to path pattern, in binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameRegistry {
    names: IndexMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when `name` is already bound to a path other than `path`.
    pub fn check(&self, name: &str, path: &str) -> Result<()> {
        match self.names.get(name) {
            Some(bound) if bound != path => Err(Error::NamingConflict {
                name: name.to_string(),
                path: bound.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn bind(&mut self, name: &str, path: &str) -> Result<()> {
        self.check(name, path)?;
        if !self.names.contains_key(name) {
            self.names.insert(name.to_string(), path.to_string());
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Key-wise union. Fails without building anything if both sides bind a name to
    /// different paths.
    pub fn union(&self, other: &NameRegistry) -> Result<NameRegistry> {
        for (name, path) in other.iter() {
            self.check(name, path)?;
        }
        let mut names = self.names.clone();
        for (name, path) in &other.names {
            names
                .entry(name.clone())
                .or_insert_with(|| path.clone());
        }
        Ok(NameRegistry { names })
    }
}

/// A [`RouteTable`] that also tracks route names.
#[derive(Debug, Clone)]
pub struct NamedRouteTable<H> {
    routes: RouteTable<H>,
    names: NameRegistry,
}

impl<H> Default for NamedRouteTable<H> {
    fn default() -> Self {
        Self {
            routes: RouteTable::new(),
            names: NameRegistry::new(),
        }
    }
}

impl<H> NamedRouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `payload` like [`RouteTable::add`], binding its `name` metadata to `path`.
    /// A conflicting name rejects the whole add.
    pub fn add(&mut self, path: &str, payload: Payload<H>) -> Result<()> {
        let name = payload.checked_name()?.map(str::to_string);
        if let Some(name) = &name {
            if let Err(err) = self.names.check(name, path) {
                warn!("Rejected route {path}: {err}");
                return Err(err);
            }
        }
        self.routes.add(path, payload)?;
        if let Some(name) = name {
            self.names.bind(&name, path)?;
        }
        Ok(())
    }

    pub fn register(&mut self, path: impl Into<String>) -> Registration<'_, Self, H> {
        Registration::new(self, path.into())
    }

    /// Builds the path of route `name`, filling its placeholders from `params`.
    /// Extra parameters are ignored.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let template = self.names.get(name).ok_or_else(|| Error::UnknownRoute {
            name: name.to_string(),
        })?;
        let params = params.iter().copied().collect::<HashMap<_, _>>();
        pattern::expand(template, |key| params.get(key).copied()).map_err(|parameter| {
            Error::MissingParameter {
                name: name.to_string(),
                parameter,
            }
        })
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// `(name, path)` pairs, in the order names were first bound.
    pub fn names_mapping(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter()
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    pub fn routes(&self) -> &RouteTable<H> {
        &self.routes
    }

    pub fn get(&self, path: &str) -> Option<&Payload<H>> {
        self.routes.get(path)
    }

    pub fn lookup(&self, path: &str) -> Option<Match<'_, Payload<H>>> {
        self.routes.lookup(path)
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Result<Option<Route<'_, H>>> {
        self.routes.resolve(method, path)
    }

    pub fn iter(&self) -> RouteDefinitions<'_, H> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H: Clone> NamedRouteTable<H> {
    /// Merges routes like [`RouteTable::merge`] and unions the name registries.
    ///
    /// Names are checked before anything is built: one name bound to different paths on
    /// each side fails the whole merge. The registry keeps every name even when the merged
    /// payload of a path only carries `other`'s `name` value.
    pub fn merge(&self, other: &NamedRouteTable<H>) -> Result<NamedRouteTable<H>> {
        let names = self.names.union(&other.names).inspect_err(|err| {
            warn!("Refused to merge route tables: {err}");
        })?;
        debug!("Merging {} and {} route names", self.names.len(), other.names.len());
        Ok(NamedRouteTable {
            routes: self.routes.merge(&other.routes),
            names,
        })
    }
}

impl<H> AsRef<RouteTable<H>> for NamedRouteTable<H> {
    fn as_ref(&self) -> &RouteTable<H> {
        &self.routes
    }
}

impl<H> RouteSink<H> for NamedRouteTable<H> {
    fn add_route(&mut self, path: &str, payload: Payload<H>) -> Result<()> {
        self.add(path, payload)
    }
}

impl<H: Clone> std::ops::Add<&NamedRouteTable<H>> for &NamedRouteTable<H> {
    type Output = Result<NamedRouteTable<H>>;

    fn add(self, other: &NamedRouteTable<H>) -> Self::Output {
        self.merge(other)
    }
}

impl<'a, H> IntoIterator for &'a NamedRouteTable<H> {
    type Item = RouteDefinition<'a, H>;
    type IntoIter = RouteDefinitions<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
