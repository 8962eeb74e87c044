use std::marker::PhantomData;

use serde_json::Value;

use crate::{ConfigurationError, Result};

use super::payload::{HandlerBinding, Metadata, Payload, NAME_KEY};
use super::view::{extract, View};

/// A table routes can be added to.
pub trait RouteSink<H> {
    fn add_route(&mut self, path: &str, payload: Payload<H>) -> Result<()>;
}

/// Builder returned by `register`.
///
/// ```
/// use route_table::{Endpoint, RouteTable};
///
/// let mut routes = RouteTable::new();
/// let view = routes
///     .register("/items/{id:digit}")
///     .methods(["GET", "DELETE"])
///     .name("item")
///     .view(Endpoint("item"))
///     .unwrap();
/// assert_eq!(view, Endpoint("item"));
/// assert_eq!(routes.get("/items/{id:digit}").unwrap().name(), Some("item"));
/// ```
#[must_use = "a registration does nothing until `view` is called"]
pub struct Registration<'t, T: ?Sized, H> {
    table: &'t mut T,
    path: String,
    methods: Option<Vec<String>>,
    metadata: Metadata,
    _handler: PhantomData<H>,
}

impl<'t, T: ?Sized, H> Registration<'t, T, H> {
    pub(crate) fn new(table: &'t mut T, path: String) -> Self {
        Self {
            table,
            path,
            methods: None,
            metadata: Metadata::new(),
            _handler: PhantomData,
        }
    }
}

impl<'t, T, H> Registration<'t, T, H>
where
    T: RouteSink<H> + ?Sized,
    H: Clone,
{
    /// Methods a plain endpoint is registered under. Defaults to `GET`.
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.with(NAME_KEY, name.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Registers `view` and hands it back.
    ///
    /// The `name` key goes to the path level metadata, every other key is carried by each
    /// handler binding.
    pub fn view<V: View<H>>(self, view: V) -> Result<V> {
        let methods = self
            .methods
            .as_ref()
            .map(|methods| methods.iter().map(String::as_str).collect::<Vec<_>>());
        let handlers = extract(&view, methods.as_deref())?;

        let mut metadata = self.metadata;
        let mut payload = Payload::new();
        if let Some(name) = metadata.shift_remove(NAME_KEY) {
            if !name.is_string() {
                return Err(ConfigurationError::InvalidName(name.to_string()).into());
            }
            payload.metadata.insert(NAME_KEY.to_string(), name);
        }
        for (method, handler) in handlers {
            payload = payload.with_binding(
                HandlerBinding::new(method, handler).with_metadata(metadata.clone()),
            );
        }
        self.table.add_route(&self.path, payload)?;
        Ok(view)
    }
}
