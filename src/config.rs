//! Route manifests.
//!
//! A manifest declares routes whose handlers are endpoint identifiers:
//!
//! ```json
//! {
//!   "routes": [
//!     { "path": "/hello", "endpoint": "hello", "name": "hello" },
//!     { "path": "/form", "methods": ["GET", "POST"], "endpoint": "form" },
//!     { "path": "/item/{id:digit}", "name": "item",
//!       "operations": { "GET": "item.show", "DELETE": "item.delete" } }
//!   ]
//! }
//! ```

use std::{fs, path::Path, str::FromStr};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::routing::view::parse_method;
use crate::{Endpoint, Error, Metadata, NamedRouteTable, Operations, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteManifest {
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    #[serde(default)]
    pub methods: Option<Vec<String>>,
    #[serde(default)]
    pub name: Option<String>,
    /// Plain endpoint, registered under `methods`.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Per-method endpoints. Exclusive with `endpoint`.
    #[serde(default)]
    pub operations: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl RouteManifest {
    pub fn new(routes: Vec<RouteConfig>) -> Self {
        Self { routes }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading route manifest from {}", path.display());
        fs::read_to_string(path)?.parse()
    }

    /// Builds the table, registering routes in manifest order.
    pub fn into_table(self) -> Result<NamedRouteTable<String>> {
        let mut table = NamedRouteTable::new();
        for route in self.routes {
            route.register_on(&mut table)?;
        }
        Ok(table)
    }
}

impl FromStr for RouteManifest {
    type Err = Error;

    fn from_str(manifest: &str) -> Result<Self> {
        Ok(serde_json::from_str(manifest)?)
    }
}

impl RouteConfig {
    fn register_on(self, table: &mut NamedRouteTable<String>) -> Result<()> {
        let mut registration = table.register(self.path.clone());
        if let Some(methods) = self.methods {
            registration = registration.methods(methods);
        }
        if let Some(name) = self.name {
            registration = registration.name(name);
        }
        for (key, value) in self.metadata {
            registration = registration.with(key, value);
        }
        match (self.endpoint, self.operations) {
            (Some(endpoint), None) => {
                registration.view(Endpoint(endpoint))?;
            }
            (None, Some(operations)) => {
                let operations = operations
                    .into_iter()
                    .map(|(method, endpoint)| -> Result<_> { Ok((parse_method(&method)?, endpoint)) })
                    .collect::<Result<Vec<_>>>()?;
                registration.view(Operations(operations))?;
            }
            _ => {
                return Err(Error::Manifest(format!(
                    "route '{}' needs exactly one of 'endpoint' or 'operations'",
                    self.path
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ConfigurationError;

    const MANIFEST: &str = r#"{
        "routes": [
            { "path": "/hello", "endpoint": "hello", "name": "hello" },
            { "path": "/form", "methods": ["GET", "POST"], "endpoint": "form",
              "metadata": { "auth": true } },
            { "path": "/item/{id:digit}", "name": "item",
              "operations": { "GET": "item.show", "DELETE": "item.delete" } }
        ]
    }"#;

    #[test]
    fn test_into_table() {
        let table = MANIFEST.parse::<RouteManifest>().unwrap().into_table().unwrap();
        assert_eq!(
            table.iter().map(|route| route.path).collect::<Vec<_>>(),
            vec!["/hello", "/form", "/item/{id:digit}"]
        );
        assert_eq!(
            table.names_mapping().collect::<Vec<_>>(),
            vec![("hello", "/hello"), ("item", "/item/{id:digit}")]
        );

        let route = table.resolve(&Method::DELETE, "/item/7").unwrap().unwrap();
        assert_eq!(route.handler(), "item.delete");
        assert_eq!(route.param("id"), Some("7"));

        let route = table.resolve(&Method::POST, "/form").unwrap().unwrap();
        assert_eq!(route.binding.metadata().get("auth"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_endpoint_and_operations_are_exclusive() {
        let manifest: RouteManifest =
            r#"{ "routes": [{ "path": "/x", "endpoint": "x", "operations": { "GET": "y" } }] }"#
                .parse()
                .unwrap();
        assert!(matches!(manifest.into_table(), Err(Error::Manifest(_))));
    }

    #[test]
    fn test_operations_reject_methods() {
        let manifest: RouteManifest = r#"{ "routes": [
            { "path": "/x", "methods": ["GET"], "operations": { "GET": "y" } }
        ] }"#
            .parse()
            .unwrap();
        assert!(matches!(
            manifest.into_table(),
            Err(Error::Configuration(ConfigurationError::MethodsWithResource))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!("{".parse::<RouteManifest>(), Err(Error::Json(_))));
    }
}
