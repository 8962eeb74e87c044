//! Path based HTTP route registry.
//!
//! Route tables map path patterns and HTTP methods to handlers, resolve requests to a
//! handler plus the placeholder values of the path, and merge with other tables to
//! compose sub-applications.
//!
//! # Example usage
//!
//! ```
//! use http::Method;
//! use route_table::{Endpoint, NamedRouteTable, Resource, ResourceView};
//!
//! struct Item;
//!
//! impl Resource<&'static str> for Item {
//!     fn get(&self) -> Option<&'static str> {
//!         Some("show item")
//!     }
//!
//!     fn delete(&self) -> Option<&'static str> {
//!         Some("delete item")
//!     }
//! }
//!
//! let mut browser = NamedRouteTable::new();
//! browser.register("/").name("index").view(Endpoint("index")).unwrap();
//!
//! let mut api = NamedRouteTable::new();
//! api.register("/item/{id:digit}")
//!     .name("item")
//!     .view(ResourceView(Item))
//!     .unwrap();
//!
//! let app = browser.merge(&api).unwrap();
//! let route = app.resolve(&Method::DELETE, "/item/42").unwrap().unwrap();
//! assert_eq!(*route.handler(), "delete item");
//! assert_eq!(route.param("id"), Some("42"));
//!
//! let err = app.resolve(&Method::POST, "/item/42").unwrap_err();
//! assert_eq!(err.allowed_methods(), Some(&[Method::GET, Method::DELETE][..]));
//!
//! assert_eq!(app.url_for("item", &[("id", "7")]).unwrap(), "/item/7");
//! ```
pub mod config;
mod error;
pub mod logging;
pub mod matcher;
pub mod routing;

pub use config::{RouteConfig, RouteManifest};
pub use error::{ConfigurationError, Error, Result};
pub use routing::{
    Endpoint, HandlerBinding, Metadata, NameRegistry, NamedRouteTable, Operations, Payload,
    Resource, ResourceView, Route, RouteDefinition, RouteSink, RouteTable, View,
};
