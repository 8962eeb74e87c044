use http::Method;
use indexmap::IndexMap;
use serde_json::Value;

use crate::ConfigurationError;

/// Open, insertion ordered metadata attached to routes.
pub type Metadata = IndexMap<String, Value>;

/// Path level metadata key tracked by named route tables.
pub const NAME_KEY: &str = "name";

/// A handler registered for one method of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerBinding<H> {
    method: Method,
    handler: H,
    metadata: Metadata,
}

impl<H> HandlerBinding<H> {
    pub fn new(method: Method, handler: H) -> Self {
        Self {
            method,
            handler,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Everything stored for one path pattern: a binding per method plus path level metadata.
///
/// Bindings are keyed by their own method, so they only enter through
/// [`Payload::with_binding`].
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<H> {
    methods: IndexMap<Method, HandlerBinding<H>>,
    pub metadata: Metadata,
}

impl<H> Default for Payload<H> {
    fn default() -> Self {
        Self {
            methods: IndexMap::new(),
            metadata: Metadata::new(),
        }
    }
}

impl<H> Payload<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `binding` under its own method, replacing any previous binding for it.
    pub fn with_binding(mut self, binding: HandlerBinding<H>) -> Self {
        self.methods.insert(binding.method.clone(), binding);
        self
    }

    /// Shorthand for a binding without metadata.
    pub fn with_handler(self, method: Method, handler: H) -> Self {
        self.with_binding(HandlerBinding::new(method, handler))
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_metadata(NAME_KEY, name.into())
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Like [`Payload::name`], but a `name` that is not a string is an error.
    pub fn checked_name(&self) -> Result<Option<&str>, ConfigurationError> {
        match self.metadata.get(NAME_KEY) {
            None => Ok(None),
            Some(Value::String(name)) => Ok(Some(name.as_str())),
            Some(other) => Err(ConfigurationError::InvalidName(other.to_string())),
        }
    }

    /// Bindings in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = &HandlerBinding<H>> {
        self.methods.values()
    }

    pub fn binding(&self, method: &Method) -> Option<&HandlerBinding<H>> {
        self.methods.get(method)
    }

    /// Registered methods, in registration order.
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.methods.keys().cloned().collect()
    }

    /// Overwrites same-named methods and metadata keys with `other`'s, keeps the rest.
    pub fn update(&mut self, other: Payload<H>) {
        self.methods.extend(other.methods);
        self.metadata.extend(other.metadata);
    }
}
