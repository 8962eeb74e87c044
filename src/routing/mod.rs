//! Route registration, resolution and merging.
//!
//! ```text
//! register(path).methods(..).name(..).view(v)
//!     → view::extract (method, handler) pairs
//!     → Payload { method → HandlerBinding, metadata }
//!     → RouteTable::add (overwrite same keys, keep the rest)
//!
//! resolve(method, path)
//!     → PathTree lookup  → None:  no match
//!     → method dispatch  → Err:   MethodNotAllowed { allowed }
//!                        → Some:  Route { binding, params }
//! ```

mod named;
mod payload;
mod registration;
mod route;
mod table;
pub mod view;

pub use named::{NameRegistry, NamedRouteTable};
pub use payload::{HandlerBinding, Metadata, Payload, NAME_KEY};
pub use registration::{Registration, RouteSink};
pub use route::Route;
pub use table::{RouteDefinition, RouteDefinitions, RouteTable};
pub use view::{Endpoint, Operations, Resource, ResourceView, View};
